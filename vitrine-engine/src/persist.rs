//! Durable catalog state
//!
//! Persists the products partition of [`CatalogState`] — never the transient
//! UI flags, never cache envelopes — under a versioned JSON envelope,
//! restored at startup. A missing or corrupt envelope yields a fresh state;
//! an older schema version runs through the migration hooks first.

use crate::state::CatalogState;
use crate::storage::KvStore;
use serde::{Deserialize, Serialize};
use shared::{Category, Product};
use std::collections::HashMap;

/// Reserved KV key for the persisted state envelope
pub const STATE_KEY: &str = "state_products";

/// Current persisted schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Durable subset of the catalog state
#[derive(Debug, Serialize, Deserialize)]
pub struct PersistedCatalog {
    pub all_products: Vec<Product>,
    pub products_by_category: HashMap<String, Vec<Product>>,
    pub categories: Vec<Category>,
    pub selected_category: Option<String>,
    pub search_query: String,
    pub current_page: u32,
    pub has_more: bool,
}

impl From<&CatalogState> for PersistedCatalog {
    fn from(state: &CatalogState) -> Self {
        Self {
            all_products: state.all_products.clone(),
            products_by_category: state.products_by_category.clone(),
            categories: state.categories.clone(),
            selected_category: state.selected_category.clone(),
            search_query: state.search_query.clone(),
            current_page: state.current_page,
            has_more: state.has_more,
        }
    }
}

impl PersistedCatalog {
    /// Rebuild runtime state; transient flags start cleared
    pub fn into_state(self) -> CatalogState {
        CatalogState {
            all_products: self.all_products,
            products_by_category: self.products_by_category,
            categories: self.categories,
            selected_category: self.selected_category,
            search_query: self.search_query,
            current_page: self.current_page,
            has_more: self.has_more,
            loading: false,
            refreshing: false,
            error: None,
        }
    }
}

/// Catalog state persistence over the KV store
#[derive(Clone)]
pub struct StatePersistence {
    store: KvStore,
}

impl StatePersistence {
    pub fn new(store: KvStore) -> Self {
        Self { store }
    }

    /// Persist the durable subset. Best-effort: failures are logged.
    pub fn save(&self, state: &CatalogState) {
        let envelope = serde_json::json!({
            "schema_version": SCHEMA_VERSION,
            "state": PersistedCatalog::from(state),
        });

        match serde_json::to_string(&envelope) {
            Ok(raw) => {
                if let Err(e) = self.store.set(STATE_KEY, &raw) {
                    tracing::warn!("Failed to persist catalog state: {e}");
                }
            }
            Err(e) => tracing::warn!("Failed to serialize catalog state: {e}"),
        }
    }

    /// Restore the persisted state, or a fresh one when absent or corrupt.
    pub fn restore(&self) -> CatalogState {
        let raw = match self.store.get(STATE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return CatalogState::default(),
            Err(e) => {
                tracing::warn!("Failed to read persisted state: {e}");
                return CatalogState::default();
            }
        };

        let mut envelope: serde_json::Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Persisted state is unreadable, starting fresh: {e}");
                return CatalogState::default();
            }
        };

        let version = envelope
            .get("schema_version")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(0) as u32;

        if version > SCHEMA_VERSION {
            tracing::warn!("Persisted state v{version} is newer than supported, starting fresh");
            return CatalogState::default();
        }
        if version < SCHEMA_VERSION {
            envelope = migrate(version, envelope);
        }

        let state = envelope
            .get_mut("state")
            .map(serde_json::Value::take)
            .unwrap_or(serde_json::Value::Null);

        match serde_json::from_value::<PersistedCatalog>(state) {
            Ok(persisted) => {
                tracing::info!(
                    products = persisted.all_products.len(),
                    categories = persisted.categories.len(),
                    "Restored catalog state"
                );
                persisted.into_state()
            }
            Err(e) => {
                tracing::warn!("Persisted state failed to deserialize, starting fresh: {e}");
                CatalogState::default()
            }
        }
    }
}

/// Upgrade an older envelope to the current schema, one version at a time.
fn migrate(mut version: u32, mut envelope: serde_json::Value) -> serde_json::Value {
    while version < SCHEMA_VERSION {
        tracing::info!("Migrating persisted state v{version} -> v{}", version + 1);
        envelope = match version {
            // v0 envelopes predate versioning: the payload was the state itself
            0 => serde_json::json!({ "schema_version": 1, "state": envelope }),
            _ => envelope,
        };
        version += 1;
    }
    envelope
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64) -> Product {
        Product {
            id,
            title: format!("p{id}"),
            description: String::new(),
            price: 1.0,
            discount_percentage: 0.0,
            rating: 0.0,
            stock: 1,
            brand: String::new(),
            category: "a".into(),
            thumbnail: String::new(),
            images: Vec::new(),
        }
    }

    #[test]
    fn round_trip_keeps_products_and_drops_transients() {
        let store = KvStore::open_in_memory().unwrap();
        let persistence = StatePersistence::new(store);

        let mut state = CatalogState::default();
        state.all_products = vec![product(1), product(2)];
        state.selected_category = Some("electronics".into());
        state.current_page = 2;
        state.loading = true;
        state.error = Some("transient".into());

        persistence.save(&state);
        let restored = persistence.restore();

        assert_eq!(restored.all_products.len(), 2);
        assert_eq!(restored.selected_category.as_deref(), Some("electronics"));
        assert_eq!(restored.current_page, 2);
        assert!(!restored.loading);
        assert_eq!(restored.error, None);
    }

    #[test]
    fn missing_or_corrupt_envelope_starts_fresh() {
        let store = KvStore::open_in_memory().unwrap();
        let persistence = StatePersistence::new(store.clone());

        assert!(persistence.restore().all_products.is_empty());

        store.set(STATE_KEY, "not json at all").unwrap();
        let restored = persistence.restore();
        assert!(restored.all_products.is_empty());
        assert!(restored.has_more);
    }

    #[test]
    fn v0_envelope_migrates() {
        let store = KvStore::open_in_memory().unwrap();

        // Pre-versioning layout: the bare state, no envelope
        let bare = serde_json::json!({
            "all_products": [product(9)],
            "products_by_category": {},
            "categories": [],
            "selected_category": null,
            "search_query": "",
            "current_page": 0,
            "has_more": true,
        });
        store.set(STATE_KEY, &bare.to_string()).unwrap();

        let restored = StatePersistence::new(store).restore();
        assert_eq!(restored.all_products.len(), 1);
        assert_eq!(restored.all_products[0].id, 9);
    }

    #[test]
    fn newer_version_is_not_downgraded() {
        let store = KvStore::open_in_memory().unwrap();
        let envelope = serde_json::json!({
            "schema_version": SCHEMA_VERSION + 1,
            "state": { "whatever": true },
        });
        store.set(STATE_KEY, &envelope.to_string()).unwrap();

        let restored = StatePersistence::new(store).restore();
        assert!(restored.all_products.is_empty());
    }
}
