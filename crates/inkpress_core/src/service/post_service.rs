//! Post use-case service.
//!
//! # Responsibility
//! - Turn create/update/delete requests into exactly one store operation
//!   each; a post update and its link replacements share one transaction.
//! - Merge partial updates into full replacement records.
//!
//! # Invariants
//! - The first author id is the primary owner of a new post.
//! - A post update never changes the post owner.

use crate::context::OpContext;
use crate::error::{StoreError, StoreResult};
use crate::model::{Image, Media, Post, Taxonomy, UserPost};
use crate::query::{CreatePostParams, UpdatePostParams};
use crate::store::{
    replace_post_images, replace_post_media, replace_post_taxonomies, CreatePostTxParams,
    CreatePostTxResult, Store,
};

/// Request to create a post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub description: String,
    pub url: String,
    /// Ordered authors; the first one owns the post.
    pub author_ids: Vec<i64>,
    pub taxonomy_ids: Vec<i64>,
    pub media_ids: Vec<i64>,
    pub image_ids: Vec<i64>,
}

/// Partial post update. `None` keeps the current value or link set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub taxonomy_ids: Option<Vec<i64>>,
    pub media_ids: Option<Vec<i64>>,
    pub image_ids: Option<Vec<i64>>,
}

/// A post with everything linked to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDetail {
    pub post: Post,
    pub authors: Vec<UserPost>,
    pub taxonomies: Vec<Taxonomy>,
    pub media: Vec<Media>,
    pub images: Vec<Image>,
}

pub struct PostService<S: Store> {
    store: S,
}

impl<S: Store> PostService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates a post owned by the first author, picking the narrowest
    /// create operation for the links supplied.
    pub fn create_post(&self, ctx: &OpContext, request: NewPost) -> StoreResult<CreatePostTxResult> {
        let Some(&owner_id) = request.author_ids.first() else {
            return Err(StoreError::InvalidInput(
                "author_ids must contain at least one id".to_string(),
            ));
        };
        // Username is filled from the owner row inside the transaction.
        let post = CreatePostParams {
            title: request.title,
            content: request.content,
            description: request.description,
            user_id: owner_id,
            username: String::new(),
            url: request.url,
        };
        let links = [
            !request.taxonomy_ids.is_empty(),
            !request.media_ids.is_empty(),
            !request.image_ids.is_empty(),
        ];

        match links {
            [false, false, false] => self.store.create_post_tx(ctx, &post, &request.author_ids),
            [true, false, false] => self.store.create_post_with_taxonomies_tx(
                ctx,
                &post,
                &request.author_ids,
                &request.taxonomy_ids,
            ),
            [false, true, false] => self.store.create_post_with_media_tx(
                ctx,
                &post,
                &request.author_ids,
                &request.media_ids,
            ),
            [false, false, true] => self.store.create_post_with_images_tx(
                ctx,
                &post,
                &request.author_ids,
                &request.image_ids,
            ),
            _ => {
                let arg = CreatePostTxParams::new(post, request.author_ids)
                    .with_taxonomies(request.taxonomy_ids)
                    .with_media(request.media_ids)
                    .with_images(request.image_ids);
                self.store.create_post_with_links_tx(ctx, &arg)
            }
        }
    }

    pub fn get_post(&self, ctx: &OpContext, post_id: i64) -> StoreResult<PostDetail> {
        let q = self.store.queries(ctx);
        Ok(PostDetail {
            post: q.get_post(post_id)?,
            authors: q.list_user_posts_by_post(post_id)?,
            taxonomies: q.list_taxonomies_for_post(post_id)?,
            media: q.list_media_by_post(post_id)?,
            images: q.list_images_by_post(post_id)?,
        })
    }

    /// Merges `patch` into the stored post and replaces any link sets the
    /// patch names, all in one transaction.
    pub fn update_post(&self, ctx: &OpContext, post_id: i64, patch: PostPatch) -> StoreResult<Post> {
        let PostPatch {
            title,
            content,
            description,
            url,
            taxonomy_ids,
            media_ids,
            image_ids,
        } = patch;

        self.store.exec_tx(ctx, "update_post", |q| {
            let current = q.get_post(post_id)?;
            let post = q.update_post(&UpdatePostParams {
                id: current.id,
                title: title.unwrap_or(current.title),
                content: content.unwrap_or(current.content),
                description: description.unwrap_or(current.description),
                url: url.unwrap_or(current.url),
            })?;

            if let Some(ids) = &taxonomy_ids {
                replace_post_taxonomies(q, post_id, ids)?;
            }
            if let Some(ids) = &media_ids {
                replace_post_media(q, post_id, ids)?;
            }
            if let Some(ids) = &image_ids {
                replace_post_images(q, post_id, ids)?;
            }
            Ok(post)
        })
    }

    pub fn delete_post(&self, ctx: &OpContext, post_id: i64) -> StoreResult<()> {
        self.store.queries(ctx).get_post(post_id)?;
        self.store.delete_post_tx(ctx, post_id)
    }
}
