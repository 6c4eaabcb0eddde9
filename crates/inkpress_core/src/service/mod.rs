//! Caller-side use cases.
//!
//! # Responsibility
//! - Prepare full parameter records from requests (merging patches,
//!   resolving owners) and invoke one store operation per request.
//! - Keep request handling decoupled from SQL and transactions.

pub mod media_service;
pub mod post_service;
pub mod taxonomy_service;
pub mod user_service;
