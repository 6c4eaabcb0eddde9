//! Transactional orchestration over the query layer.
//!
//! # Responsibility
//! - Expose one method per multi-table operation, each running as a single
//!   transaction through `exec_tx`.
//! - Give pass-through autocommit access to every single-table query.
//! - Keep denormalized owner usernames and link rows consistent with the
//!   rows they mirror or reference.
//!
//! # Invariants
//! - Steps inside one operation run in a fixed order and only through the
//!   transaction-bound `Queries` handle they are given.
//! - Link rows are always removed before the rows they reference.
//! - Every error reaches the caller; nothing is retried or swallowed.
//! - Ownership checks run inside the transaction that performs the
//!   mutation they guard.

use crate::context::OpContext;
use crate::error::StoreResult;
use crate::model::{PostImage, PostMedia, PostTaxonomy, User};
use crate::query::{
    CreateImageParams, CreateMediaParams, CreatePostParams, CreateTaxonomyParams, Queries,
};
use rusqlite::Connection;

mod media;
mod posts;
mod taxonomies;
mod tx;
mod users;

pub use media::{ImageLink, MediaLink};
pub use posts::{CreatePostTxParams, CreatePostTxResult};
pub(crate) use posts::{replace_post_images, replace_post_media, replace_post_taxonomies};
pub use taxonomies::TaxonomyLink;
pub use users::{UpdateUserTxParams, UserTransfer};

/// Store capability consumed by use-case services.
pub trait Store {
    /// Runs `work` in one transaction: commit on `Ok`, rollback on `Err`.
    fn exec_tx<T, F>(&self, ctx: &OpContext, op: &'static str, work: F) -> StoreResult<T>
    where
        F: FnOnce(&Queries<'_>) -> StoreResult<T>;

    /// Autocommit handle for single-statement reads and writes.
    fn queries<'a>(&'a self, ctx: &'a OpContext) -> Queries<'a>;

    /// Creates a post with its authors only.
    fn create_post_tx(
        &self,
        ctx: &OpContext,
        post: &CreatePostParams,
        author_ids: &[i64],
    ) -> StoreResult<CreatePostTxResult>;

    /// Creates a post with authors and any taxonomy, media and image links.
    fn create_post_with_links_tx(
        &self,
        ctx: &OpContext,
        arg: &CreatePostTxParams,
    ) -> StoreResult<CreatePostTxResult>;

    fn create_post_with_media_tx(
        &self,
        ctx: &OpContext,
        post: &CreatePostParams,
        author_ids: &[i64],
        media_ids: &[i64],
    ) -> StoreResult<CreatePostTxResult>;

    fn create_post_with_images_tx(
        &self,
        ctx: &OpContext,
        post: &CreatePostParams,
        author_ids: &[i64],
        image_ids: &[i64],
    ) -> StoreResult<CreatePostTxResult>;

    fn create_post_with_taxonomies_tx(
        &self,
        ctx: &OpContext,
        post: &CreatePostParams,
        author_ids: &[i64],
        taxonomy_ids: &[i64],
    ) -> StoreResult<CreatePostTxResult>;

    /// Removes a post and every link row that references it.
    fn delete_post_tx(&self, ctx: &OpContext, post_id: i64) -> StoreResult<()>;

    /// Removes a user and everything it owns. Callers check existence first.
    fn delete_user_tx(&self, ctx: &OpContext, user_id: i64) -> StoreResult<()>;

    /// Removes a user after handing its content to `to_user_id`.
    fn delete_user_with_transfer_tx(
        &self,
        ctx: &OpContext,
        user_id: i64,
        to_user_id: i64,
    ) -> StoreResult<UserTransfer>;

    /// Applies a full user record, propagating a changed username.
    fn update_user_tx(&self, ctx: &OpContext, arg: &UpdateUserTxParams) -> StoreResult<User>;

    fn update_post_media_tx(
        &self,
        ctx: &OpContext,
        post_id: i64,
        media_ids: &[i64],
    ) -> StoreResult<Vec<PostMedia>>;

    fn update_post_images_tx(
        &self,
        ctx: &OpContext,
        post_id: i64,
        image_ids: &[i64],
    ) -> StoreResult<Vec<PostImage>>;

    fn update_post_taxonomies_tx(
        &self,
        ctx: &OpContext,
        post_id: i64,
        taxonomy_ids: &[i64],
    ) -> StoreResult<Vec<PostTaxonomy>>;

    fn create_media_and_link_tx(
        &self,
        ctx: &OpContext,
        new_media: &CreateMediaParams,
        post_id: i64,
        sort_order: i32,
    ) -> StoreResult<MediaLink>;

    fn create_image_and_link_tx(
        &self,
        ctx: &OpContext,
        new_image: &CreateImageParams,
        post_id: i64,
        sort_order: i32,
    ) -> StoreResult<ImageLink>;

    /// Links a taxonomy by name, creating it only when the name is new.
    fn create_taxonomy_and_link_tx(
        &self,
        ctx: &OpContext,
        taxonomy: &CreateTaxonomyParams,
        post_id: i64,
    ) -> StoreResult<TaxonomyLink>;

    /// Deletes media owned by `user_id`; other users get `Forbidden`.
    fn delete_media_tx(&self, ctx: &OpContext, media_id: i64, user_id: i64) -> StoreResult<()>;

    fn delete_image_tx(&self, ctx: &OpContext, image_id: i64, user_id: i64) -> StoreResult<()>;

    fn delete_taxonomy_tx(&self, ctx: &OpContext, taxonomy_id: i64) -> StoreResult<()>;
}

/// SQLite-backed store borrowing one connection.
#[derive(Clone, Copy)]
pub struct SqliteStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStore<'conn> {
    /// Creates a store from an opened and migrated connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl Store for SqliteStore<'_> {
    fn exec_tx<T, F>(&self, ctx: &OpContext, op: &'static str, work: F) -> StoreResult<T>
    where
        F: FnOnce(&Queries<'_>) -> StoreResult<T>,
    {
        tx::run_in_transaction(self.conn, ctx, op, work)
    }

    fn queries<'a>(&'a self, ctx: &'a OpContext) -> Queries<'a> {
        Queries::new(self.conn, ctx)
    }

    fn create_post_tx(
        &self,
        ctx: &OpContext,
        post: &CreatePostParams,
        author_ids: &[i64],
    ) -> StoreResult<CreatePostTxResult> {
        let arg = CreatePostTxParams::new(post.clone(), author_ids.to_vec());
        self.exec_tx(ctx, "create_post", |q| posts::create_post_with_links(q, &arg))
    }

    fn create_post_with_links_tx(
        &self,
        ctx: &OpContext,
        arg: &CreatePostTxParams,
    ) -> StoreResult<CreatePostTxResult> {
        self.exec_tx(ctx, "create_post_with_links", |q| {
            posts::create_post_with_links(q, arg)
        })
    }

    fn create_post_with_media_tx(
        &self,
        ctx: &OpContext,
        post: &CreatePostParams,
        author_ids: &[i64],
        media_ids: &[i64],
    ) -> StoreResult<CreatePostTxResult> {
        let arg = CreatePostTxParams::new(post.clone(), author_ids.to_vec())
            .with_media(media_ids.to_vec());
        self.exec_tx(ctx, "create_post_with_media", |q| {
            posts::create_post_with_links(q, &arg)
        })
    }

    fn create_post_with_images_tx(
        &self,
        ctx: &OpContext,
        post: &CreatePostParams,
        author_ids: &[i64],
        image_ids: &[i64],
    ) -> StoreResult<CreatePostTxResult> {
        let arg = CreatePostTxParams::new(post.clone(), author_ids.to_vec())
            .with_images(image_ids.to_vec());
        self.exec_tx(ctx, "create_post_with_images", |q| {
            posts::create_post_with_links(q, &arg)
        })
    }

    fn create_post_with_taxonomies_tx(
        &self,
        ctx: &OpContext,
        post: &CreatePostParams,
        author_ids: &[i64],
        taxonomy_ids: &[i64],
    ) -> StoreResult<CreatePostTxResult> {
        let arg = CreatePostTxParams::new(post.clone(), author_ids.to_vec())
            .with_taxonomies(taxonomy_ids.to_vec());
        self.exec_tx(ctx, "create_post_with_taxonomies", |q| {
            posts::create_post_with_links(q, &arg)
        })
    }

    fn delete_post_tx(&self, ctx: &OpContext, post_id: i64) -> StoreResult<()> {
        self.exec_tx(ctx, "delete_post", |q| posts::delete_post(q, post_id))
    }

    fn delete_user_tx(&self, ctx: &OpContext, user_id: i64) -> StoreResult<()> {
        self.exec_tx(ctx, "delete_user", |q| users::delete_user(q, user_id))
    }

    fn delete_user_with_transfer_tx(
        &self,
        ctx: &OpContext,
        user_id: i64,
        to_user_id: i64,
    ) -> StoreResult<UserTransfer> {
        self.exec_tx(ctx, "delete_user_with_transfer", |q| {
            users::delete_user_with_transfer(q, user_id, to_user_id)
        })
    }

    fn update_user_tx(&self, ctx: &OpContext, arg: &UpdateUserTxParams) -> StoreResult<User> {
        self.exec_tx(ctx, "update_user", |q| users::update_user(q, arg))
    }

    fn update_post_media_tx(
        &self,
        ctx: &OpContext,
        post_id: i64,
        media_ids: &[i64],
    ) -> StoreResult<Vec<PostMedia>> {
        self.exec_tx(ctx, "update_post_media", |q| {
            posts::replace_post_media(q, post_id, media_ids)
        })
    }

    fn update_post_images_tx(
        &self,
        ctx: &OpContext,
        post_id: i64,
        image_ids: &[i64],
    ) -> StoreResult<Vec<PostImage>> {
        self.exec_tx(ctx, "update_post_images", |q| {
            posts::replace_post_images(q, post_id, image_ids)
        })
    }

    fn update_post_taxonomies_tx(
        &self,
        ctx: &OpContext,
        post_id: i64,
        taxonomy_ids: &[i64],
    ) -> StoreResult<Vec<PostTaxonomy>> {
        self.exec_tx(ctx, "update_post_taxonomies", |q| {
            posts::replace_post_taxonomies(q, post_id, taxonomy_ids)
        })
    }

    fn create_media_and_link_tx(
        &self,
        ctx: &OpContext,
        new_media: &CreateMediaParams,
        post_id: i64,
        sort_order: i32,
    ) -> StoreResult<MediaLink> {
        self.exec_tx(ctx, "create_media_and_link", |q| {
            media::create_media_and_link(q, new_media, post_id, sort_order)
        })
    }

    fn create_image_and_link_tx(
        &self,
        ctx: &OpContext,
        new_image: &CreateImageParams,
        post_id: i64,
        sort_order: i32,
    ) -> StoreResult<ImageLink> {
        self.exec_tx(ctx, "create_image_and_link", |q| {
            media::create_image_and_link(q, new_image, post_id, sort_order)
        })
    }

    fn create_taxonomy_and_link_tx(
        &self,
        ctx: &OpContext,
        taxonomy: &CreateTaxonomyParams,
        post_id: i64,
    ) -> StoreResult<TaxonomyLink> {
        self.exec_tx(ctx, "create_taxonomy_and_link", |q| {
            taxonomies::create_taxonomy_and_link(q, taxonomy, post_id)
        })
    }

    fn delete_media_tx(&self, ctx: &OpContext, media_id: i64, user_id: i64) -> StoreResult<()> {
        self.exec_tx(ctx, "delete_media", |q| {
            media::delete_media(q, media_id, user_id)
        })
    }

    fn delete_image_tx(&self, ctx: &OpContext, image_id: i64, user_id: i64) -> StoreResult<()> {
        self.exec_tx(ctx, "delete_image", |q| {
            media::delete_image(q, image_id, user_id)
        })
    }

    fn delete_taxonomy_tx(&self, ctx: &OpContext, taxonomy_id: i64) -> StoreResult<()> {
        self.exec_tx(ctx, "delete_taxonomy", |q| {
            taxonomies::delete_taxonomy(q, taxonomy_id)
        })
    }
}
