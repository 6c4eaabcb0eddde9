//! Taxonomy rows and their unordered post links.

use serde::{Deserialize, Serialize};

/// Category or tag. `name` is globally unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    pub id: i64,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostTaxonomy {
    pub post_id: i64,
    pub taxonomy_id: i64,
}
