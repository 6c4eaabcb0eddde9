//! Storage core for the Inkpress content backend.
//! Owns the schema, single-table queries and the transactional operations
//! that keep users, posts, media and taxonomies consistent.

pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod query;
pub mod service;
pub mod store;

pub use config::{ConfigError, StoreConfig};
pub use context::{CancelReason, OpContext};
pub use db::{open_db, open_db_in_memory, open_db_with_config, DbError, DbResult};
pub use error::{Conflict, ErrorKind, RowRef, StoreError, StoreResult};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status, LoggingError};
pub use query::{Page, Queries};
pub use service::media_service::MediaService;
pub use service::post_service::{NewPost, PostDetail, PostPatch, PostService};
pub use service::taxonomy_service::TaxonomyService;
pub use service::user_service::{UserPatch, UserService};
pub use store::{SqliteStore, Store};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
