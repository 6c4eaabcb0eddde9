//! Media and image steps: create-and-link and owner-checked deletion.

use crate::error::{RowRef, StoreError, StoreResult};
use crate::model::{Image, Media, PostImage, PostMedia};
use crate::query::{CreateImageParams, CreateMediaParams, Queries};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaLink {
    pub media: Media,
    pub link: PostMedia,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLink {
    pub image: Image,
    pub link: PostImage,
}

pub(super) fn create_media_and_link(
    q: &Queries<'_>,
    arg: &CreateMediaParams,
    post_id: i64,
    sort_order: i32,
) -> StoreResult<MediaLink> {
    let media = q.create_media(arg)?;
    q.get_post(post_id)?;
    let link = q.create_post_media(post_id, media.id, sort_order)?;
    Ok(MediaLink { media, link })
}

pub(super) fn create_image_and_link(
    q: &Queries<'_>,
    arg: &CreateImageParams,
    post_id: i64,
    sort_order: i32,
) -> StoreResult<ImageLink> {
    let image = q.create_image(arg)?;
    q.get_post(post_id)?;
    let link = q.create_post_image(post_id, image.id, sort_order)?;
    Ok(ImageLink { image, link })
}

/// Owner check and removal happen in the same transaction, so a concurrent
/// ownership transfer cannot slip between them.
pub(super) fn delete_media(q: &Queries<'_>, media_id: i64, user_id: i64) -> StoreResult<()> {
    let media = q.get_media(media_id)?;
    if media.user_id != user_id {
        return Err(StoreError::Forbidden {
            resource: RowRef::Media(media_id),
            user_id,
        });
    }
    q.delete_post_media_by_media(media_id)?;
    q.delete_media(media_id)
}

pub(super) fn delete_image(q: &Queries<'_>, image_id: i64, user_id: i64) -> StoreResult<()> {
    let image = q.get_image(image_id)?;
    if image.user_id != user_id {
        return Err(StoreError::Forbidden {
            resource: RowRef::Image(image_id),
            user_id,
        });
    }
    q.delete_post_images_by_image(image_id)?;
    q.delete_image(image_id)
}
