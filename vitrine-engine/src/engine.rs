//! Application-root engine container
//!
//! Owns every component and wires them together; the UI layer talks only to
//! this facade. Created once at startup by the application root and dropped
//! at process exit — there is no global singleton.

use crate::cache::TtlCache;
use crate::config::EngineConfig;
use crate::debounce::SearchDebouncer;
use crate::orchestrator::FetchOrchestrator;
use crate::persist::StatePersistence;
use crate::state::{CatalogState, CatalogStore};
use crate::storage::{KvStore, StorageResult};
use std::sync::Arc;
use tokio::sync::watch;
use vitrine_client::{CatalogApi, CatalogClient, ClientConfig};

/// The catalog engine: state + orchestration + debounced search behind the
/// UI intent surface
pub struct CatalogEngine {
    store: CatalogStore,
    orchestrator: Arc<FetchOrchestrator>,
    debouncer: SearchDebouncer,
}

impl CatalogEngine {
    /// Build the engine from configuration: opens the embedded database,
    /// sweeps expired cache entries, restores persisted state and wires the
    /// HTTP client.
    pub fn open(config: &EngineConfig) -> StorageResult<Self> {
        std::fs::create_dir_all(&config.data_dir)?;
        let kv = KvStore::open(config.db_path())?;

        let client_config =
            ClientConfig::new(&config.api_base_url).with_timeout(config.request_timeout_secs);
        let api: Arc<dyn CatalogApi> = Arc::new(CatalogClient::new(&client_config));

        Ok(Self::with_parts(config, kv, api))
    }

    /// Assemble the engine from explicit collaborators. Tests inject mocks
    /// and in-memory storage here.
    pub fn with_parts(config: &EngineConfig, kv: KvStore, api: Arc<dyn CatalogApi>) -> Self {
        let cache = TtlCache::new(kv.clone()).with_ttl(config.cache_ttl_ms);
        cache.purge_expired();

        let persistence = StatePersistence::new(kv);
        let store = CatalogStore::with_state(persistence.restore());

        let orchestrator = Arc::new(
            FetchOrchestrator::new(api, cache, store.clone())
                .with_page_size(config.page_size)
                .with_persistence(persistence),
        );
        let debouncer = SearchDebouncer::with_delay(
            Arc::clone(&orchestrator),
            std::time::Duration::from_millis(config.debounce_ms),
        );

        Self {
            store,
            orchestrator,
            debouncer,
        }
    }

    // ========== UI intents ==========

    /// Initial load: categories plus the first product page
    pub async fn load_initial(&self) {
        self.orchestrator.load_initial().await;
    }

    /// Pull-to-refresh: re-run the active mode's fetch and the category list
    pub async fn refresh(&self) {
        self.orchestrator.refresh().await;
    }

    /// Advance pagination in the all-products listing
    pub async fn load_next_page(&self) {
        self.orchestrator.load_next_page().await;
    }

    /// Select a category; `None` returns to the all-products view
    pub async fn select_category(&self, slug: Option<&str>) {
        self.orchestrator.load_category(slug).await;
    }

    /// Search-field input: the query is visible in state immediately, the
    /// fetch itself is debounced. Blank text clears the search right away.
    pub async fn set_search_text(&self, text: &str) {
        if !text.trim().is_empty() {
            self.store.set_search_query(text).await;
        }
        self.debouncer.on_input(text).await;
    }

    // ========== Observation ==========

    /// Read-only snapshot of the catalog state
    pub async fn snapshot(&self) -> CatalogState {
        self.store.snapshot().await
    }

    /// Await re-render signals
    pub fn changed(&self) -> watch::Receiver<u64> {
        self.store.changed()
    }

    /// The underlying state store
    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    /// The orchestrator, for callers driving fetches directly
    pub fn orchestrator(&self) -> &Arc<FetchOrchestrator> {
        &self.orchestrator
    }
}
