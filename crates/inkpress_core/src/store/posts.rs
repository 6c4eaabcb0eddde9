//! Post creation, deletion and link replacement steps.

use crate::error::{StoreError, StoreResult};
use crate::model::{Post, PostImage, PostMedia, PostTaxonomy, UserPost};
use crate::query::{CreatePostParams, Queries};
use std::collections::HashSet;

/// Input for creating a post together with its authorship and links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePostTxParams {
    /// Post row. `username` is replaced by the owner's current username
    /// read inside the transaction.
    pub post: CreatePostParams,
    /// Ordered author ids. Must not be empty. The post owner is always
    /// stored as primary author whatever its position here.
    pub author_ids: Vec<i64>,
    pub taxonomy_ids: Vec<i64>,
    pub media_ids: Vec<i64>,
    pub image_ids: Vec<i64>,
}

impl CreatePostTxParams {
    pub fn new(post: CreatePostParams, author_ids: Vec<i64>) -> Self {
        Self {
            post,
            author_ids,
            taxonomy_ids: Vec::new(),
            media_ids: Vec::new(),
            image_ids: Vec::new(),
        }
    }

    pub fn with_taxonomies(mut self, taxonomy_ids: Vec<i64>) -> Self {
        self.taxonomy_ids = taxonomy_ids;
        self
    }

    pub fn with_media(mut self, media_ids: Vec<i64>) -> Self {
        self.media_ids = media_ids;
        self
    }

    pub fn with_images(mut self, image_ids: Vec<i64>) -> Self {
        self.image_ids = image_ids;
        self
    }
}

/// Every row a post creation wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePostTxResult {
    pub post: Post,
    pub user_posts: Vec<UserPost>,
    pub post_taxonomies: Vec<PostTaxonomy>,
    pub post_media: Vec<PostMedia>,
    pub post_images: Vec<PostImage>,
}

/// Owner lookup, post row, then authorship, then taxonomy, media and image
/// links.
pub(super) fn create_post_with_links(
    q: &Queries<'_>,
    arg: &CreatePostTxParams,
) -> StoreResult<CreatePostTxResult> {
    if arg.author_ids.is_empty() {
        return Err(StoreError::InvalidInput(
            "a post needs at least one author".to_string(),
        ));
    }

    let owner = q.get_user(arg.post.user_id)?;
    let post = q.create_post(&CreatePostParams {
        username: owner.username,
        ..arg.post.clone()
    })?;
    let user_posts = link_authors(q, &post, &arg.author_ids)?;
    let post_taxonomies = link_taxonomies(q, post.id, &arg.taxonomy_ids)?;
    let post_media = link_media(q, post.id, &arg.media_ids)?;
    let post_images = link_images(q, post.id, &arg.image_ids)?;

    Ok(CreatePostTxResult {
        post,
        user_posts,
        post_taxonomies,
        post_media,
        post_images,
    })
}

/// Owner at order 0, every other distinct author at its 1-based position.
fn link_authors(q: &Queries<'_>, post: &Post, author_ids: &[i64]) -> StoreResult<Vec<UserPost>> {
    let mut seen = HashSet::from([post.user_id]);
    let mut links = vec![q.create_user_post(post.id, post.user_id, 0)?];
    for (index, author_id) in author_ids.iter().copied().enumerate() {
        if !seen.insert(author_id) {
            continue;
        }
        links.push(q.create_user_post(post.id, author_id, order_at(index + 1)?)?);
    }
    Ok(links)
}

/// Repeated ids after the first occurrence are skipped.
fn link_taxonomies(
    q: &Queries<'_>,
    post_id: i64,
    taxonomy_ids: &[i64],
) -> StoreResult<Vec<PostTaxonomy>> {
    let mut links = Vec::with_capacity(taxonomy_ids.len());
    for taxonomy_id in distinct(taxonomy_ids) {
        q.get_taxonomy(taxonomy_id)?;
        links.push(q.create_post_taxonomy(post_id, taxonomy_id)?);
    }
    Ok(links)
}

/// Media at the 0-based position of their first occurrence among distinct ids.
fn link_media(q: &Queries<'_>, post_id: i64, media_ids: &[i64]) -> StoreResult<Vec<PostMedia>> {
    let mut links = Vec::with_capacity(media_ids.len());
    for (index, media_id) in distinct(media_ids).enumerate() {
        q.get_media(media_id)?;
        links.push(q.create_post_media(post_id, media_id, order_at(index)?)?);
    }
    Ok(links)
}

fn link_images(q: &Queries<'_>, post_id: i64, image_ids: &[i64]) -> StoreResult<Vec<PostImage>> {
    let mut links = Vec::with_capacity(image_ids.len());
    for (index, image_id) in distinct(image_ids).enumerate() {
        q.get_image(image_id)?;
        links.push(q.create_post_image(post_id, image_id, order_at(index)?)?);
    }
    Ok(links)
}

fn distinct(ids: &[i64]) -> impl Iterator<Item = i64> + '_ {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(move |id| seen.insert(*id))
}

fn order_at(position: usize) -> StoreResult<i32> {
    i32::try_from(position)
        .map_err(|_| StoreError::InvalidInput(format!("link position {position} is out of range")))
}

/// Link rows first, the post row last.
pub(super) fn delete_post(q: &Queries<'_>, post_id: i64) -> StoreResult<()> {
    q.delete_user_posts_by_post(post_id)?;
    q.delete_post_media_by_post(post_id)?;
    q.delete_post_images_by_post(post_id)?;
    q.delete_post_taxonomies_by_post(post_id)?;
    q.delete_post(post_id)
}

/// Replaces all media links of an existing post.
pub(crate) fn replace_post_media(
    q: &Queries<'_>,
    post_id: i64,
    media_ids: &[i64],
) -> StoreResult<Vec<PostMedia>> {
    q.get_post(post_id)?;
    q.delete_post_media_by_post(post_id)?;
    link_media(q, post_id, media_ids)
}

pub(crate) fn replace_post_images(
    q: &Queries<'_>,
    post_id: i64,
    image_ids: &[i64],
) -> StoreResult<Vec<PostImage>> {
    q.get_post(post_id)?;
    q.delete_post_images_by_post(post_id)?;
    link_images(q, post_id, image_ids)
}

pub(crate) fn replace_post_taxonomies(
    q: &Queries<'_>,
    post_id: i64,
    taxonomy_ids: &[i64],
) -> StoreResult<Vec<PostTaxonomy>> {
    q.get_post(post_id)?;
    q.delete_post_taxonomies_by_post(post_id)?;
    link_taxonomies(q, post_id, taxonomy_ids)
}
