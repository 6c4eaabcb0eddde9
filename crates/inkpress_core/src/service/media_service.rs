//! Media and image use-case service.

use crate::context::OpContext;
use crate::error::StoreResult;
use crate::query::{CreateImageParams, CreateMediaParams};
use crate::store::{ImageLink, MediaLink, Store};

pub struct MediaService<S: Store> {
    store: S,
}

impl<S: Store> MediaService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Stores an uploaded file's metadata and attaches it to a post.
    pub fn attach_media(
        &self,
        ctx: &OpContext,
        media: &CreateMediaParams,
        post_id: i64,
        sort_order: i32,
    ) -> StoreResult<MediaLink> {
        self.store
            .create_media_and_link_tx(ctx, media, post_id, sort_order)
    }

    pub fn attach_image(
        &self,
        ctx: &OpContext,
        image: &CreateImageParams,
        post_id: i64,
        sort_order: i32,
    ) -> StoreResult<ImageLink> {
        self.store
            .create_image_and_link_tx(ctx, image, post_id, sort_order)
    }

    /// Missing media is reported as not-found before ownership is checked.
    pub fn delete_media(&self, ctx: &OpContext, media_id: i64, user_id: i64) -> StoreResult<()> {
        self.store.queries(ctx).get_media(media_id)?;
        self.store.delete_media_tx(ctx, media_id, user_id)
    }

    pub fn delete_image(&self, ctx: &OpContext, image_id: i64, user_id: i64) -> StoreResult<()> {
        self.store.queries(ctx).get_image(image_id)?;
        self.store.delete_image_tx(ctx, image_id, user_id)
    }
}
