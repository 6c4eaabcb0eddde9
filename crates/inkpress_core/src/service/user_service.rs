//! User use-case service.
//!
//! # Responsibility
//! - Merge partial user updates and decide when uniqueness must be checked.
//! - Choose between nuclear delete and delete with transfer.
//!
//! # Invariants
//! - Username/email uniqueness is checked before insert and whenever an
//!   update changes either value.
//! - A changed credential hash stamps `password_changed_at`.

use crate::context::OpContext;
use crate::error::{Conflict, StoreError, StoreResult};
use crate::model::User;
use crate::query::{CreateUserParams, UpdateUserParams};
use crate::store::{Store, UpdateUserTxParams, UserTransfer};
use std::time::{SystemTime, UNIX_EPOCH};

/// Partial user update. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub hashed_password: Option<String>,
    pub role: Option<String>,
}

pub struct UserService<S: Store> {
    store: S,
}

impl<S: Store> UserService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Inserts a user after checking username and email are free.
    pub fn create_user(&self, ctx: &OpContext, arg: &CreateUserParams) -> StoreResult<User> {
        self.store.exec_tx(ctx, "create_user", |q| {
            ensure_free(q.get_user_by_username(&arg.username), || {
                Conflict::Username(arg.username.clone())
            })?;
            ensure_free(q.get_user_by_email(&arg.email), || {
                Conflict::Email(arg.email.clone())
            })?;
            q.create_user(arg)
        })
    }

    pub fn update_user(&self, ctx: &OpContext, user_id: i64, patch: UserPatch) -> StoreResult<User> {
        let current = self.store.queries(ctx).get_user(user_id)?;
        let arg = merge_user_patch(&current, patch, now_epoch_ms());
        self.store.update_user_tx(ctx, &arg)
    }

    /// Deletes a user, handing its content to `transfer_to` when given.
    pub fn delete_user(
        &self,
        ctx: &OpContext,
        user_id: i64,
        transfer_to: Option<i64>,
    ) -> StoreResult<Option<UserTransfer>> {
        self.store.queries(ctx).get_user(user_id)?;
        match transfer_to {
            Some(to_user_id) => self
                .store
                .delete_user_with_transfer_tx(ctx, user_id, to_user_id)
                .map(Some),
            None => self.store.delete_user_tx(ctx, user_id).map(|()| None),
        }
    }
}

fn ensure_free(lookup: StoreResult<User>, conflict: impl FnOnce() -> Conflict) -> StoreResult<()> {
    match lookup {
        Ok(_) => Err(StoreError::Conflict(conflict())),
        Err(err) if err.is_not_found() => Ok(()),
        Err(err) => Err(err),
    }
}

fn merge_user_patch(current: &User, patch: UserPatch, now_ms: i64) -> UpdateUserTxParams {
    let mut next = UpdateUserParams::from(current);
    if let Some(username) = patch.username {
        next.username = username;
    }
    if let Some(full_name) = patch.full_name {
        next.full_name = full_name;
    }
    if let Some(email) = patch.email {
        next.email = email;
    }
    if let Some(role) = patch.role {
        next.role = role;
    }
    if let Some(hashed_password) = patch.hashed_password {
        if hashed_password != current.hashed_password {
            next.password_changed_at = now_ms;
        }
        next.hashed_password = hashed_password;
    }

    let check_uniqueness = next.username != current.username || next.email != current.email;
    UpdateUserTxParams {
        user: next,
        check_uniqueness,
    }
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
