//! Fetch orchestration
//!
//! Every operation follows the same cache-then-network protocol: publish a
//! still-valid cached value immediately (provisional), always issue the
//! network request, then publish the authoritative result and update
//! pagination. Completions holding a stale sequence ticket are dropped, so
//! a slow early response can never clobber a fresher one. `loading` is
//! cleared on every exit path.

use crate::cache::TtlCache;
use crate::persist::StatePersistence;
use crate::sequence::RequestSequencer;
use crate::state::{BrowseMode, CatalogStore};
use shared::{Category, Product};
use std::sync::Arc;
use vitrine_client::CatalogApi;

/// Default products requested per page
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Sequence scope for the all-products view; search shares it because both
/// render into the same slot
const VIEW_SCOPE: &str = "view";

/// Sequence scope for the category list
const CATEGORIES_SCOPE: &str = "categories";

fn category_scope(slug: &str) -> String {
    format!("category_{slug}")
}

fn products_page_key(page: u32) -> String {
    format!("products_page_{page}")
}

fn category_key(slug: &str) -> String {
    format!("category_{}", slug.to_lowercase())
}

fn search_key(query: &str) -> String {
    format!("search_{}", query.to_lowercase())
}

/// Cache key for the category list
const CATEGORIES_KEY: &str = "categories";

/// Drives the cache-then-network protocol and owns all state mutation
pub struct FetchOrchestrator {
    api: Arc<dyn CatalogApi>,
    cache: TtlCache,
    store: CatalogStore,
    sequencer: RequestSequencer,
    persistence: Option<StatePersistence>,
    page_size: u64,
}

impl FetchOrchestrator {
    pub fn new(api: Arc<dyn CatalogApi>, cache: TtlCache, store: CatalogStore) -> Self {
        Self {
            api,
            cache,
            store,
            sequencer: RequestSequencer::new(),
            persistence: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Persist the products partition after authoritative publishes
    pub fn with_persistence(mut self, persistence: StatePersistence) -> Self {
        self.persistence = Some(persistence);
        self
    }

    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size;
        self
    }

    /// Initial load: categories and the first product page, concurrently.
    pub async fn load_initial(&self) {
        tokio::join!(self.load_categories(), self.load_products(0, true));
    }

    /// Fetch one page of the all-products listing.
    ///
    /// Page 0 with `refresh` clears the accumulated buffer before
    /// repopulating (never interleaving old and new data); later pages
    /// append. `has_more` is derived from "page non-empty", which conflates
    /// end-of-results with an empty listing — accepted imprecision.
    pub async fn load_products(&self, page: u32, refresh: bool) {
        let ticket = self.sequencer.begin(VIEW_SCOPE);

        if refresh {
            self.store.reset_products().await;
        }
        self.store.set_loading(true).await;

        let key = products_page_key(page);

        // Provisional publish: a cached first page renders immediately while
        // the network round-trip is in flight.
        if page == 0
            && let Some(products) = self.cache.get::<Vec<Product>>(&key)
            && self.sequencer.is_latest(VIEW_SCOPE, ticket)
        {
            self.store.set_products(products, None).await;
        }

        let skip = u64::from(page) * self.page_size;
        match self.api.list_products(skip, self.page_size).await {
            Ok(page_data) => {
                let products = page_data.products;
                self.cache.set(&key, &products);

                if self.sequencer.is_latest(VIEW_SCOPE, ticket) {
                    let has_more = !products.is_empty();
                    if page == 0 || refresh {
                        self.store.set_products(products, None).await;
                    } else {
                        self.store.append_products(products, None).await;
                    }
                    self.store.set_current_page(page + 1).await;
                    self.store.set_has_more(has_more).await;
                    self.store.set_error(None).await;
                    self.save_state().await;
                } else {
                    tracing::debug!("Dropping stale response for products page {page}");
                }
            }
            Err(e) => {
                tracing::error!("Failed to fetch products page {page}: {e}");
                if self.sequencer.is_latest(VIEW_SCOPE, ticket) {
                    self.store.set_error(Some(e.to_string())).await;
                }
            }
        }

        self.store.set_loading(false).await;
    }

    /// Advance pagination in the all-products view. No-op while a fetch is
    /// running, when the listing is exhausted, or outside All mode.
    pub async fn load_next_page(&self) {
        let snapshot = self.store.snapshot().await;
        if snapshot.loading || !snapshot.has_more || snapshot.mode() != BrowseMode::All {
            return;
        }
        self.load_products(snapshot.current_page, false).await;
    }

    /// Fetch a category's complete product snapshot.
    ///
    /// The buffer is always replaced, never appended: category responses are
    /// treated as complete, non-paginated snapshots. `None` returns to the
    /// all-products view.
    pub async fn load_category(&self, slug: Option<&str>) {
        let Some(slug) = slug else {
            self.store.select_category(None).await;
            self.load_products(0, true).await;
            return;
        };

        let scope = category_scope(slug);
        let ticket = self.sequencer.begin(&scope);

        self.store.select_category(Some(slug)).await;
        self.store.set_loading(true).await;

        let key = category_key(slug);

        if let Some(products) = self.cache.get::<Vec<Product>>(&key)
            && self.sequencer.is_latest(&scope, ticket)
        {
            self.store.set_products(products, Some(slug)).await;
        }

        match self.api.products_by_category(slug).await {
            Ok(page) => {
                let products = page.products;
                self.cache.set(&key, &products);

                if self.sequencer.is_latest(&scope, ticket) {
                    self.store.set_products(products, Some(slug)).await;
                    self.store.set_error(None).await;
                    self.save_state().await;
                } else {
                    tracing::debug!("Dropping stale response for category {slug}");
                }
            }
            Err(e) => {
                tracing::error!("Failed to fetch category {slug}: {e}");
                if self.sequencer.is_latest(&scope, ticket) {
                    self.store.set_error(Some(e.to_string())).await;
                }
            }
        }

        self.store.set_loading(false).await;
    }

    /// Search the catalog. Results replace the all-products view and never
    /// paginate; a blank query means "search cleared" and falls back to the
    /// all-products protocol at page 0.
    pub async fn search(&self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            self.store.set_search_query("").await;
            self.load_products(0, true).await;
            return;
        }

        let ticket = self.sequencer.begin(VIEW_SCOPE);

        self.store.set_search_query(query).await;
        self.store.set_loading(true).await;

        let key = search_key(query);

        if let Some(products) = self.cache.get::<Vec<Product>>(&key)
            && self.sequencer.is_latest(VIEW_SCOPE, ticket)
        {
            self.store.set_products(products, None).await;
            self.store.set_has_more(false).await;
        }

        match self.api.search(query).await {
            Ok(page) => {
                let products = page.products;
                self.cache.set(&key, &products);

                if self.sequencer.is_latest(VIEW_SCOPE, ticket) {
                    self.store.set_products(products, None).await;
                    self.store.set_has_more(false).await;
                    self.store.set_error(None).await;
                    self.save_state().await;
                } else {
                    tracing::debug!("Dropping stale search response for {query:?}");
                }
            }
            Err(e) => {
                tracing::error!("Search for {query:?} failed: {e}");
                if self.sequencer.is_latest(VIEW_SCOPE, ticket) {
                    self.store.set_error(Some(e.to_string())).await;
                }
            }
        }

        self.store.set_loading(false).await;
    }

    /// Fetch the category list.
    pub async fn load_categories(&self) {
        let ticket = self.sequencer.begin(CATEGORIES_SCOPE);
        self.store.set_loading(true).await;

        if let Some(categories) = self.cache.get::<Vec<Category>>(CATEGORIES_KEY)
            && self.sequencer.is_latest(CATEGORIES_SCOPE, ticket)
        {
            self.store.set_categories(categories).await;
        }

        match self.api.list_categories().await {
            Ok(categories) => {
                self.cache.set(CATEGORIES_KEY, &categories);

                if self.sequencer.is_latest(CATEGORIES_SCOPE, ticket) {
                    self.store.set_categories(categories).await;
                    self.store.set_error(None).await;
                    self.save_state().await;
                }
            }
            Err(e) => {
                tracing::error!("Failed to fetch categories: {e}");
                if self.sequencer.is_latest(CATEGORIES_SCOPE, ticket) {
                    self.store.set_error(Some(e.to_string())).await;
                }
            }
        }

        self.store.set_loading(false).await;
    }

    /// Pull-to-refresh: re-run the active mode's protocol and refresh the
    /// category list. Drives `refreshing` rather than `loading`.
    pub async fn refresh(&self) {
        self.store.set_refreshing(true).await;

        match self.store.snapshot().await.mode() {
            BrowseMode::Search(query) => self.search(&query).await,
            BrowseMode::Category(slug) => self.load_category(Some(&slug)).await,
            BrowseMode::All => self.load_products(0, true).await,
        }
        self.load_categories().await;

        self.store.set_refreshing(false).await;
    }

    /// Best-effort persistence of the products partition
    async fn save_state(&self) {
        if let Some(persistence) = &self.persistence {
            let snapshot = self.store.snapshot().await;
            persistence.save(&snapshot);
        }
    }
}
