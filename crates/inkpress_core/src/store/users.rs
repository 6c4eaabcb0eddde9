//! User lifecycle steps: update with propagation, nuclear delete and
//! delete with ownership transfer.

use crate::error::{Conflict, StoreError, StoreResult};
use crate::model::User;
use crate::query::{Queries, UpdateUserParams};

/// Full replacement record plus whether username/email uniqueness must be
/// checked against other users before writing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUserTxParams {
    pub user: UpdateUserParams,
    pub check_uniqueness: bool,
}

/// Row counts moved by a delete-with-transfer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserTransfer {
    pub posts: usize,
    pub authorships: usize,
    pub media: usize,
    pub images: usize,
}

pub(super) fn update_user(q: &Queries<'_>, arg: &UpdateUserTxParams) -> StoreResult<User> {
    let next = &arg.user;
    if arg.check_uniqueness {
        ensure_unique(q.get_user_by_username(&next.username), next.id, || {
            Conflict::Username(next.username.clone())
        })?;
        ensure_unique(q.get_user_by_email(&next.email), next.id, || {
            Conflict::Email(next.email.clone())
        })?;
    }

    let current = q.get_user(next.id)?;
    let updated = q.update_user(next)?;

    if !updated.username.is_empty() && updated.username != current.username {
        q.update_post_username_for_user(updated.id, &updated.username)?;
        q.update_session_username_for_user(updated.id, &updated.username)?;
    }
    Ok(updated)
}

/// A hit on another user's row is a conflict; a miss is fine.
fn ensure_unique(
    lookup: StoreResult<User>,
    user_id: i64,
    conflict: impl FnOnce() -> Conflict,
) -> StoreResult<()> {
    match lookup {
        Ok(existing) if existing.id != user_id => Err(StoreError::Conflict(conflict())),
        Ok(_) => Ok(()),
        Err(err) if err.is_not_found() => Ok(()),
        Err(err) => Err(err),
    }
}

/// Sessions, authorship, media, posts, then the user.
pub(super) fn delete_user(q: &Queries<'_>, user_id: i64) -> StoreResult<()> {
    q.delete_sessions_for_user(user_id)?;
    q.delete_user_posts_by_user(user_id)?;

    for media_id in q.list_media_ids_by_user(user_id)? {
        q.delete_post_media_by_media(media_id)?;
    }
    q.delete_media_by_user(user_id)?;
    for image_id in q.list_image_ids_by_user(user_id)? {
        q.delete_post_images_by_image(image_id)?;
    }
    q.delete_images_by_user(user_id)?;

    for post_id in q.list_post_ids_by_user(user_id)? {
        q.delete_user_posts_by_post(post_id)?;
        q.delete_post_media_by_post(post_id)?;
        q.delete_post_images_by_post(post_id)?;
        q.delete_post_taxonomies_by_post(post_id)?;
    }
    q.delete_posts_by_user(user_id)?;

    q.delete_user(user_id)
}

/// Hands posts, authorship, media and images to `to_user_id`, then removes
/// the departing user's sessions and row.
pub(super) fn delete_user_with_transfer(
    q: &Queries<'_>,
    user_id: i64,
    to_user_id: i64,
) -> StoreResult<UserTransfer> {
    if user_id == to_user_id {
        return Err(StoreError::InvalidInput(format!(
            "cannot transfer content of user {user_id} to itself"
        )));
    }
    let heir = q.get_user(to_user_id)?;

    let transfer = UserTransfer {
        posts: q.transfer_post_owner(user_id, heir.id, &heir.username)?,
        authorships: q.transfer_user_posts(user_id, heir.id)?,
        media: q.transfer_media_owner(user_id, heir.id)?,
        images: q.transfer_image_owner(user_id, heir.id)?,
    };

    q.delete_sessions_for_user(user_id)?;
    q.delete_user(user_id)?;
    Ok(transfer)
}
