//! User account row.

use serde::{Deserialize, Serialize};

/// Account identity. `username` and `email` are globally unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub email: String,
    /// Opaque credential hash; never produced or checked by the store.
    #[serde(skip_serializing, default)]
    pub hashed_password: String,
    pub role: String,
    pub password_changed_at: i64,
    pub created_at: i64,
}
