//! Shared types for the Vitrine catalog engine
//!
//! Data models and utility functions used by both the API client and the
//! sync engine.

pub mod models;
pub mod util;

// Re-exports
pub use models::{Category, Product, ProductPage};
