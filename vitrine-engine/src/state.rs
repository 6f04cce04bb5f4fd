//! Catalog state container
//!
//! Single source of truth for what a UI renders. Reducer-style transitions
//! behind an async RwLock, plus a watch-channel revision counter so
//! observers can await re-render signals.

use shared::{Category, Product};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, watch};

/// Browsing context; governs which buffer and pagination rules apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseMode {
    All,
    Category(String),
    Search(String),
}

/// Aggregate catalog state (the UI snapshot)
#[derive(Debug, Clone)]
pub struct CatalogState {
    /// Append-only across pages; cleared on refresh
    pub all_products: Vec<Product>,
    /// Category slug -> complete snapshot, independently replaceable
    pub products_by_category: HashMap<String, Vec<Product>>,
    pub categories: Vec<Category>,
    /// Active category filter; exclusive with a non-empty `search_query`
    pub selected_category: Option<String>,
    pub search_query: String,
    /// Next page index to request (all-products mode only)
    pub current_page: u32,
    pub has_more: bool,
    // Transient UI signals, never persisted
    pub loading: bool,
    pub refreshing: bool,
    pub error: Option<String>,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self {
            all_products: Vec::new(),
            products_by_category: HashMap::new(),
            categories: Vec::new(),
            selected_category: None,
            search_query: String::new(),
            current_page: 0,
            has_more: true,
            loading: false,
            refreshing: false,
            error: None,
        }
    }
}

impl CatalogState {
    /// Active browsing mode, derived from the selector fields
    pub fn mode(&self) -> BrowseMode {
        if let Some(slug) = &self.selected_category {
            BrowseMode::Category(slug.clone())
        } else if !self.search_query.trim().is_empty() {
            BrowseMode::Search(self.search_query.clone())
        } else {
            BrowseMode::All
        }
    }

    /// Products for the active mode (what a UI would render)
    pub fn visible_products(&self) -> &[Product] {
        match &self.selected_category {
            Some(slug) => self
                .products_by_category
                .get(slug)
                .map(Vec::as_slice)
                .unwrap_or_default(),
            None => &self.all_products,
        }
    }
}

/// Shared, observable catalog state
///
/// Cloning is shallow; all clones see the same state.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    inner: Arc<RwLock<CatalogState>>,
    revision: watch::Sender<u64>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::with_state(CatalogState::default())
    }

    /// Start from a restored state (transient flags assumed cleared)
    pub fn with_state(state: CatalogState) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(RwLock::new(state)),
            revision,
        }
    }

    /// Subscribe to re-render signals
    pub fn changed(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Read-only copy of the current state
    pub async fn snapshot(&self) -> CatalogState {
        self.inner.read().await.clone()
    }

    /// Apply a transition and bump the revision. The lock is never held
    /// across an await point.
    async fn mutate<F: FnOnce(&mut CatalogState)>(&self, f: F) {
        {
            let mut state = self.inner.write().await;
            f(&mut state);
        }
        self.revision.send_modify(|rev| *rev += 1);
    }

    pub async fn set_loading(&self, loading: bool) {
        self.mutate(|s| s.loading = loading).await;
    }

    pub async fn set_refreshing(&self, refreshing: bool) {
        self.mutate(|s| s.refreshing = refreshing).await;
    }

    pub async fn set_error(&self, error: Option<String>) {
        self.mutate(|s| s.error = error).await;
    }

    pub async fn set_categories(&self, categories: Vec<Category>) {
        self.mutate(|s| s.categories = categories).await;
    }

    /// Select a category (or None for the all-products view). Clears the
    /// search query and resets pagination so the mode is never ambiguous.
    pub async fn select_category(&self, slug: Option<&str>) {
        self.mutate(|s| {
            s.selected_category = slug.map(str::to_string);
            s.search_query.clear();
            s.current_page = 0;
            s.has_more = true;
        })
        .await;
    }

    /// Set the search query. Clears any selected category and resets
    /// pagination; category buffers are left alone (orthogonal state).
    pub async fn set_search_query(&self, query: &str) {
        self.mutate(|s| {
            s.search_query = query.to_string();
            s.selected_category = None;
            s.current_page = 0;
            s.has_more = true;
        })
        .await;
    }

    /// Replace a buffer: a category's snapshot, or the all-products view
    pub async fn set_products(&self, products: Vec<Product>, category: Option<&str>) {
        self.mutate(|s| match category {
            Some(slug) => {
                s.products_by_category.insert(slug.to_string(), products);
            }
            None => s.all_products = products,
        })
        .await;
    }

    /// Append to a buffer (pagination)
    pub async fn append_products(&self, products: Vec<Product>, category: Option<&str>) {
        self.mutate(|s| match category {
            Some(slug) => s
                .products_by_category
                .entry(slug.to_string())
                .or_default()
                .extend(products),
            None => s.all_products.extend(products),
        })
        .await;
    }

    pub async fn set_current_page(&self, page: u32) {
        self.mutate(|s| s.current_page = page).await;
    }

    pub async fn set_has_more(&self, has_more: bool) {
        self.mutate(|s| s.has_more = has_more).await;
    }

    /// Drop all accumulated buffers and reset pagination
    pub async fn reset_products(&self) {
        self.mutate(|s| {
            s.all_products.clear();
            s.products_by_category.clear();
            s.current_page = 0;
            s.has_more = true;
        })
        .await;
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, category: &str) -> Product {
        Product {
            id,
            title: format!("p{id}"),
            description: String::new(),
            price: 1.0,
            discount_percentage: 0.0,
            rating: 0.0,
            stock: 1,
            brand: String::new(),
            category: category.to_string(),
            thumbnail: String::new(),
            images: Vec::new(),
        }
    }

    #[tokio::test]
    async fn selecting_category_clears_search_and_resets_pagination() {
        let store = CatalogStore::new();
        store.set_search_query("phone").await;
        store.set_current_page(3).await;
        store.set_has_more(false).await;

        store.select_category(Some("electronics")).await;

        let state = store.snapshot().await;
        assert_eq!(state.selected_category.as_deref(), Some("electronics"));
        assert_eq!(state.search_query, "");
        assert_eq!(state.current_page, 0);
        assert!(state.has_more);
        assert_eq!(state.mode(), BrowseMode::Category("electronics".into()));
    }

    #[tokio::test]
    async fn setting_search_clears_category_but_keeps_its_buffer() {
        let store = CatalogStore::new();
        store.select_category(Some("electronics")).await;
        store
            .set_products(vec![product(1, "electronics")], Some("electronics"))
            .await;

        store.set_search_query("phone").await;

        let state = store.snapshot().await;
        assert_eq!(state.selected_category, None);
        assert_eq!(state.search_query, "phone");
        assert_eq!(state.mode(), BrowseMode::Search("phone".into()));
        // Orthogonal buffer survives the mode switch
        assert_eq!(state.products_by_category["electronics"].len(), 1);
    }

    #[tokio::test]
    async fn append_preserves_order() {
        let store = CatalogStore::new();
        store
            .set_products(vec![product(1, "a"), product(2, "a")], None)
            .await;
        store.append_products(vec![product(3, "a")], None).await;

        let state = store.snapshot().await;
        let ids: Vec<i64> = state.all_products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn reset_clears_buffers_and_pagination() {
        let store = CatalogStore::new();
        store.set_products(vec![product(1, "a")], None).await;
        store.set_products(vec![product(2, "b")], Some("b")).await;
        store.set_current_page(2).await;
        store.set_has_more(false).await;

        store.reset_products().await;

        let state = store.snapshot().await;
        assert!(state.all_products.is_empty());
        assert!(state.products_by_category.is_empty());
        assert_eq!(state.current_page, 0);
        assert!(state.has_more);
    }

    #[tokio::test]
    async fn visible_products_follows_mode() {
        let store = CatalogStore::new();
        store.set_products(vec![product(1, "a")], None).await;
        store.set_products(vec![product(2, "b")], Some("b")).await;

        assert_eq!(store.snapshot().await.visible_products()[0].id, 1);

        store.select_category(Some("b")).await;
        assert_eq!(store.snapshot().await.visible_products()[0].id, 2);

        // An unfetched category renders empty, not the all-products buffer
        store.select_category(Some("c")).await;
        assert!(store.snapshot().await.visible_products().is_empty());
    }

    #[tokio::test]
    async fn mutations_bump_the_revision() {
        let store = CatalogStore::new();
        let mut rx = store.changed();
        let before = *rx.borrow_and_update();

        store.set_loading(true).await;
        rx.changed().await.unwrap();
        assert!(*rx.borrow() > before);
    }

    #[tokio::test]
    async fn blank_search_is_all_mode() {
        let store = CatalogStore::new();
        store.set_search_query("   ").await;
        assert_eq!(store.snapshot().await.mode(), BrowseMode::All);
    }
}
