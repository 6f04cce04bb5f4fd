//! Typed catalog API endpoints

use crate::{ClientConfig, ClientResult, HttpClient};
use async_trait::async_trait;
use shared::{Category, Product, ProductPage};

/// Remote catalog operations consumed by the sync engine.
///
/// A trait seam so the engine can run against a scripted mock in tests.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// List products with pagination
    async fn list_products(&self, skip: u64, limit: u64) -> ClientResult<ProductPage>;

    /// List all products in a category (complete snapshot, no pagination)
    async fn products_by_category(&self, slug: &str) -> ClientResult<ProductPage>;

    /// Full-text product search
    async fn search(&self, query: &str) -> ClientResult<ProductPage>;

    /// List all categories
    async fn list_categories(&self) -> ClientResult<Vec<Category>>;

    /// Fetch a single product by id
    async fn product_by_id(&self, id: i64) -> ClientResult<Product>;
}

/// HTTP-backed catalog client
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: HttpClient,
}

impl CatalogClient {
    /// Create a new catalog client from configuration
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: HttpClient::new(config),
        }
    }
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn list_products(&self, skip: u64, limit: u64) -> ClientResult<ProductPage> {
        self.http
            .get(
                "/products",
                &[("skip", skip.to_string()), ("limit", limit.to_string())],
            )
            .await
    }

    async fn products_by_category(&self, slug: &str) -> ClientResult<ProductPage> {
        self.http
            .get(&format!("/products/category/{slug}"), &[])
            .await
    }

    async fn search(&self, query: &str) -> ClientResult<ProductPage> {
        // reqwest percent-encodes query parameters
        self.http
            .get("/products/search", &[("q", query.to_string())])
            .await
    }

    async fn list_categories(&self) -> ClientResult<Vec<Category>> {
        self.http.get("/products/categories", &[]).await
    }

    async fn product_by_id(&self, id: i64) -> ClientResult<Product> {
        self.http.get(&format!("/products/{id}"), &[]).await
    }
}
