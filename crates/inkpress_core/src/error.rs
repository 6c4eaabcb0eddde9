//! Store error taxonomy.
//!
//! # Responsibility
//! - Give callers distinguishable error kinds (not-found, conflict,
//!   ownership, infrastructure) without inspecting message text.
//! - Classify engine constraint failures by SQLite extended result code.
//!
//! # Invariants
//! - Proactive uniqueness checks and engine-reported unique violations both
//!   surface as `StoreError::Conflict`.
//! - A failed rollback never hides the error that triggered it.

use crate::context::CancelReason;
use crate::db::DbError;
use rusqlite::ffi;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type StoreResult<T> = Result<T, StoreError>;

/// Identifies the row a not-found or ownership error refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowRef {
    User(i64),
    Username(String),
    Email(String),
    Post(i64),
    Media(i64),
    Image(i64),
    Taxonomy(i64),
    TaxonomyName(String),
    PostTaxonomy { post_id: i64, taxonomy_id: i64 },
    Session(Uuid),
}

impl RowRef {
    /// Table-level name of the referenced entity.
    pub fn entity(&self) -> &'static str {
        match self {
            Self::User(_) | Self::Username(_) | Self::Email(_) => "user",
            Self::Post(_) => "post",
            Self::Media(_) => "media",
            Self::Image(_) => "image",
            Self::Taxonomy(_) | Self::TaxonomyName(_) => "taxonomy",
            Self::PostTaxonomy { .. } => "post taxonomy",
            Self::Session(_) => "session",
        }
    }

    fn key(&self) -> String {
        match self {
            Self::User(id)
            | Self::Post(id)
            | Self::Media(id)
            | Self::Image(id)
            | Self::Taxonomy(id) => id.to_string(),
            Self::Username(value) | Self::Email(value) | Self::TaxonomyName(value) => {
                format!("'{value}'")
            }
            Self::PostTaxonomy {
                post_id,
                taxonomy_id,
            } => format!("{post_id}/{taxonomy_id}"),
            Self::Session(id) => id.to_string(),
        }
    }
}

impl Display for RowRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.entity(), self.key())
    }
}

/// A uniqueness rule that a write would break.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conflict {
    Username(String),
    Email(String),
    TaxonomyName(String),
    PostUrl(String),
    /// Engine-reported unique or primary-key violation on `table`.
    Constraint { table: &'static str },
}

impl Display for Conflict {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Username(name) => write!(f, "username '{name}' already exists"),
            Self::Email(email) => write!(f, "email '{email}' already exists"),
            Self::TaxonomyName(name) => write!(f, "taxonomy '{name}' already exists"),
            Self::PostUrl(url) => write!(f, "post url '{url}' already exists"),
            Self::Constraint { table } => write!(f, "duplicate row in `{table}`"),
        }
    }
}

/// Coarse classification callers translate into responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Forbidden,
    InvalidInput,
    Internal,
}

impl ErrorKind {
    /// Stable lowercase label used in log events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Forbidden => "forbidden",
            Self::InvalidInput => "invalid_input",
            Self::Internal => "internal",
        }
    }
}

#[derive(Debug)]
pub enum StoreError {
    /// Connection, lock or other engine failure, passed through unchanged.
    Db(DbError),
    /// A referenced row does not exist.
    NotFound(RowRef),
    /// A uniqueness rule would be violated.
    Conflict(Conflict),
    /// `user_id` does not own `resource`.
    Forbidden { resource: RowRef, user_id: i64 },
    /// A row in `table` is still referenced, or references a missing row.
    ForeignKey { table: &'static str },
    /// Caller supplied arguments the operation cannot act on.
    InvalidInput(String),
    /// Persisted data cannot be converted into a row type.
    InvalidData(String),
    /// The caller's context was cancelled or expired.
    Cancelled(CancelReason),
    /// Rolling back after `cause` failed as well.
    Rollback {
        cause: Box<StoreError>,
        rollback: DbError,
    },
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Db(_)
            | Self::ForeignKey { .. }
            | Self::InvalidData(_)
            | Self::Cancelled(_)
            | Self::Rollback { .. } => ErrorKind::Internal,
        }
    }

    /// True when the engine aborted the call because another connection held
    /// a conflicting lock. Retrying is up to the caller.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Db(err) => err.is_lock_conflict(),
            Self::Rollback { cause, .. } => cause.is_transient(),
            _ => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Maps an engine error raised while writing to `table`, turning
    /// constraint failures into typed variants.
    pub(crate) fn from_write(err: rusqlite::Error, table: &'static str) -> Self {
        let extended_code = match &err {
            rusqlite::Error::SqliteFailure(failure, _) => Some(failure.extended_code),
            _ => None,
        };
        match extended_code {
            Some(ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY) => {
                Self::Conflict(Conflict::Constraint { table })
            }
            Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => Self::ForeignKey { table },
            _ => Self::Db(DbError::Sqlite(err)),
        }
    }

    /// Names the rule behind an engine-reported conflict when the table has
    /// only one unique column besides its key.
    pub(crate) fn or_conflict(self, conflict: Conflict) -> Self {
        match self {
            Self::Conflict(Conflict::Constraint { .. }) => Self::Conflict(conflict),
            other => other,
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(row) => write!(f, "{} not found: {}", row.entity(), row.key()),
            Self::Conflict(conflict) => write!(f, "{conflict}"),
            Self::Forbidden { resource, user_id } => {
                write!(f, "permission denied: user {user_id} does not own {resource}")
            }
            Self::ForeignKey { table } => {
                write!(f, "foreign key constraint failed on `{table}`")
            }
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::Cancelled(reason) => write!(f, "{reason}"),
            Self::Rollback { cause, rollback } => {
                write!(f, "tx err: {cause}, rb err: {rollback}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Rollback { cause, .. } => Some(cause.as_ref()),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<CancelReason> for StoreError {
    fn from(value: CancelReason) -> Self {
        Self::Cancelled(value)
    }
}
