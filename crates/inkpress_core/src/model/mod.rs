//! Row models for the content store.
//!
//! # Responsibility
//! - Define the typed rows that query and store operations return.
//!
//! # Invariants
//! - Every row is identified by a database-assigned `i64` id, except
//!   sessions which carry a caller-generated UUID.
//! - `Post::username` and `Session::username` mirror the owning user's
//!   current username; the store keeps them in sync.
//! - Timestamps are Unix epoch milliseconds.

pub mod media;
pub mod post;
pub mod session;
pub mod taxonomy;
pub mod user;

pub use media::{Image, Media, PostImage, PostMedia};
pub use post::{Post, UserPost};
pub use session::Session;
pub use taxonomy::{PostTaxonomy, Taxonomy};
pub use user::User;
