//! Vitrine Client - HTTP client for the remote catalog API
//!
//! Provides typed network calls against the catalog endpoints
//! (list/paginate, by-category, search, categories).

pub mod catalog;
pub mod config;
pub mod error;
pub mod http;

pub use catalog::{CatalogApi, CatalogClient};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
