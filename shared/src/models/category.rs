//! Category Model

use serde::{Deserialize, Serialize};

/// Category entity
///
/// `slug` is the stable lookup key into per-category product lists; `name`
/// and `url` are display-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub url: String,
}
