//! TTL cache over the KV store
//!
//! Values are stored as a JSON envelope `{ data, stored_at }`. Expired or
//! unreadable entries behave as cache misses; storage failures never
//! propagate past this layer — the cache is an optimization, not a
//! correctness dependency.

use crate::storage::KvStore;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Cache entry lifetime: 24 hours
pub const CACHE_TTL_MS: i64 = 24 * 60 * 60 * 1000;

/// Prefix that keeps cache entries apart from other KV keys
const CACHE_PREFIX: &str = "cache_";

/// Time source, injectable for expiry tests
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// Wall-clock time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        shared::util::now_millis()
    }
}

/// Storage envelope for cached values
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry<T> {
    data: T,
    stored_at: i64,
}

/// Probe for the eviction sweep: only the timestamp matters
#[derive(Deserialize)]
struct StoredAtProbe {
    stored_at: i64,
}

/// TTL-bounded cache
///
/// Keys are opaque caller-built strings (`products_page_0`,
/// `category_electronics`, `search_phone`, ...); the cache attaches no
/// meaning to them.
#[derive(Clone)]
pub struct TtlCache {
    store: KvStore,
    ttl_ms: i64,
    clock: Arc<dyn Clock>,
}

impl TtlCache {
    pub fn new(store: KvStore) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: KvStore, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            ttl_ms: CACHE_TTL_MS,
            clock,
        }
    }

    /// Override the entry lifetime
    pub fn with_ttl(mut self, ttl_ms: i64) -> Self {
        self.ttl_ms = ttl_ms;
        self
    }

    fn storage_key(key: &str) -> String {
        format!("{CACHE_PREFIX}{key}")
    }

    /// Look up a value. Missing, expired and unreadable entries are misses;
    /// reads never delete.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(&Self::storage_key(key)) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Cache read failed for {key}: {e}");
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Cache entry {key} is unreadable: {e}");
                return None;
            }
        };

        if self.clock.now_millis() - entry.stored_at > self.ttl_ms {
            return None;
        }

        Some(entry.data)
    }

    /// Store a value, stamping the current time. Best-effort: failures are
    /// logged and swallowed.
    pub fn set<T: Serialize>(&self, key: &str, data: &T) {
        let data = match serde_json::to_value(data) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Cache serialization failed for {key}: {e}");
                return;
            }
        };

        let entry = CacheEntry {
            data,
            stored_at: self.clock.now_millis(),
        };

        let raw = match serde_json::to_string(&entry) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Cache serialization failed for {key}: {e}");
                return;
            }
        };

        if let Err(e) = self.store.set(&Self::storage_key(key), &raw) {
            tracing::warn!("Cache write failed for {key}: {e}");
        }
    }

    /// Delete expired and unreadable cache entries.
    ///
    /// Run once at startup; reads never delete, keeping the hot path to a
    /// single storage round-trip. Non-cache keys are left alone.
    pub fn purge_expired(&self) {
        let keys = match self.store.keys() {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!("Cache sweep could not list keys: {e}");
                return;
            }
        };

        let now = self.clock.now_millis();
        let mut removed = 0usize;

        for key in keys.iter().filter(|k| k.starts_with(CACHE_PREFIX)) {
            let stale = match self.store.get(key) {
                Ok(Some(raw)) => match serde_json::from_str::<StoredAtProbe>(&raw) {
                    Ok(probe) => now - probe.stored_at > self.ttl_ms,
                    // Unreadable entries go too
                    Err(_) => true,
                },
                _ => false,
            };

            if stale {
                match self.store.delete(key) {
                    Ok(()) => removed += 1,
                    Err(e) => tracing::warn!("Cache sweep failed to delete {key}: {e}"),
                }
            }
        }

        if removed > 0 {
            tracing::info!("Evicted {removed} expired cache entries");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI64, Ordering};

    struct ManualClock(AtomicI64);

    impl ManualClock {
        fn at(millis: i64) -> Arc<Self> {
            Arc::new(Self(AtomicI64::new(millis)))
        }

        fn advance(&self, millis: i64) {
            self.0.fetch_add(millis, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now_millis(&self) -> i64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    fn cache_with_clock() -> (TtlCache, Arc<ManualClock>, KvStore) {
        let store = KvStore::open_in_memory().unwrap();
        let clock = ManualClock::at(1_000_000);
        let cache = TtlCache::with_clock(store.clone(), clock.clone());
        (cache, clock, store)
    }

    #[test]
    fn round_trip_within_ttl() {
        let (cache, clock, _) = cache_with_clock();

        cache.set("k", &vec![1, 2, 3]);
        clock.advance(CACHE_TTL_MS); // exactly at the boundary is still valid
        assert_eq!(cache.get::<Vec<i32>>("k"), Some(vec![1, 2, 3]));
    }

    #[test]
    fn expired_entry_is_a_miss() {
        let (cache, clock, _) = cache_with_clock();

        cache.set("k", &"value".to_string());
        clock.advance(CACHE_TTL_MS + 1);
        assert_eq!(cache.get::<String>("k"), None);
    }

    #[test]
    fn repeated_get_does_not_refresh_stored_at() {
        let (cache, clock, _) = cache_with_clock();

        cache.set("k", &7u32);
        clock.advance(CACHE_TTL_MS - 10);
        assert_eq!(cache.get::<u32>("k"), Some(7));
        assert_eq!(cache.get::<u32>("k"), Some(7));

        // If a read had re-stamped the entry, this would still hit
        clock.advance(11);
        assert_eq!(cache.get::<u32>("k"), None);
    }

    #[test]
    fn unreadable_entry_is_a_miss_but_not_deleted() {
        let (cache, _, store) = cache_with_clock();

        store.set("cache_k", "not json").unwrap();
        assert_eq!(cache.get::<u32>("k"), None);
        // Reads never delete
        assert_eq!(store.get("cache_k").unwrap().as_deref(), Some("not json"));
    }

    #[test]
    fn purge_removes_expired_and_garbage_only() {
        let (cache, clock, store) = cache_with_clock();

        cache.set("old", &1u32);
        store.set("cache_garbage", "{{{").unwrap();
        store.set("state_products", "keep me").unwrap();

        clock.advance(CACHE_TTL_MS + 1);
        cache.set("fresh", &2u32);

        cache.purge_expired();

        assert_eq!(store.get("cache_old").unwrap(), None);
        assert_eq!(store.get("cache_garbage").unwrap(), None);
        assert!(store.get("cache_fresh").unwrap().is_some());
        // The persistence key is not cache territory
        assert_eq!(
            store.get("state_products").unwrap().as_deref(),
            Some("keep me")
        );
    }

    #[test]
    fn typed_values_round_trip() {
        let (cache, _, _) = cache_with_clock();

        let categories = vec![shared::Category {
            slug: "smartphones".into(),
            name: "Smartphones".into(),
            url: String::new(),
        }];
        cache.set("categories", &categories);
        assert_eq!(cache.get::<Vec<shared::Category>>("categories"), Some(categories));
    }
}
