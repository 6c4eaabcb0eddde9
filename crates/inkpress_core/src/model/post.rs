//! Post and authorship rows.

use serde::{Deserialize, Serialize};

/// Content record with its primary owner denormalized onto the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub description: String,
    /// Primary owner.
    pub user_id: i64,
    /// Copy of the primary owner's username at the time of the last write.
    pub username: String,
    /// Globally unique.
    pub url: String,
    pub created_at: i64,
    pub changed_at: i64,
}

/// Authorship link. `sort_order == 0` marks the primary author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPost {
    pub post_id: i64,
    pub user_id: i64,
    pub sort_order: i32,
}

impl UserPost {
    pub fn is_primary(&self) -> bool {
        self.sort_order == 0
    }
}
