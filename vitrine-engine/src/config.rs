//! Engine configuration

use crate::cache::CACHE_TTL_MS;
use crate::debounce::DEBOUNCE_MS;
use crate::orchestrator::DEFAULT_PAGE_SIZE;
use std::path::PathBuf;
use vitrine_client::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

/// Engine configuration
///
/// Every field can be overridden through environment variables:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | VITRINE_DATA_DIR | ./data | Embedded database directory |
/// | VITRINE_API_BASE_URL | https://dummyjson.com | Remote catalog endpoint |
/// | VITRINE_REQUEST_TIMEOUT_SECS | 10 | Network request timeout |
/// | VITRINE_DEBOUNCE_MS | 500 | Search quiet window |
/// | VITRINE_CACHE_TTL_MS | 86400000 | Cache entry lifetime (24h) |
/// | VITRINE_PAGE_SIZE | 10 | Products requested per page |
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory holding the embedded database
    pub data_dir: PathBuf,
    /// Remote catalog API base URL
    pub api_base_url: String,
    /// Network request timeout (seconds)
    pub request_timeout_secs: u64,
    /// Search debounce quiet window (milliseconds)
    pub debounce_ms: u64,
    /// Cache entry lifetime (milliseconds)
    pub cache_ttl_ms: i64,
    /// Products requested per page
    pub page_size: u64,
}

impl EngineConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        Self {
            data_dir: std::env::var("VITRINE_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
            api_base_url: std::env::var("VITRINE_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.into()),
            request_timeout_secs: std::env::var("VITRINE_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            debounce_ms: std::env::var("VITRINE_DEBOUNCE_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEBOUNCE_MS),
            cache_ttl_ms: std::env::var("VITRINE_CACHE_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(CACHE_TTL_MS),
            page_size: std::env::var("VITRINE_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }

    /// Path of the embedded database file
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("vitrine.redb")
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            api_base_url: DEFAULT_BASE_URL.into(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            debounce_ms: DEBOUNCE_MS,
            cache_ttl_ms: CACHE_TTL_MS,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
