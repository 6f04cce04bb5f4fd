//! Product Model

use serde::{Deserialize, Serialize};

/// Product entity as served by the remote catalog
///
/// Identity is `id`; a product is never mutated after fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    /// Discount in percent (0-100)
    #[serde(default)]
    pub discount_percentage: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub stock: i64,
    /// Some upstream items carry no brand
    #[serde(default)]
    pub brand: String,
    /// Category slug
    pub category: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub images: Vec<String>,
}

/// One page of the paginated product listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub skip: u64,
    #[serde(default)]
    pub limit: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_deserializes_camel_case_wire_format() {
        let json = r#"{
            "id": 1,
            "title": "iPhone 9",
            "description": "An apple mobile",
            "price": 549.0,
            "discountPercentage": 12.96,
            "rating": 4.69,
            "stock": 94,
            "brand": "Apple",
            "category": "smartphones",
            "thumbnail": "https://example.com/thumb.jpg",
            "images": ["https://example.com/1.jpg"]
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, 1);
        assert_eq!(product.discount_percentage, 12.96);
        assert_eq!(product.category, "smartphones");
        assert_eq!(product.images.len(), 1);
    }

    #[test]
    fn product_tolerates_missing_optional_fields() {
        // The upstream API omits brand (and sometimes images) for some items
        let json = r#"{
            "id": 2,
            "title": "Plain item",
            "price": 9.99,
            "category": "groceries"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.brand, "");
        assert!(product.images.is_empty());
        assert_eq!(product.stock, 0);
    }

    #[test]
    fn page_defaults_pagination_metadata() {
        let page: ProductPage = serde_json::from_str(r#"{"products": []}"#).unwrap();
        assert_eq!(page.total, 0);
        assert!(page.products.is_empty());
    }
}
