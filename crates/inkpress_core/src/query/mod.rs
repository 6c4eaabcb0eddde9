//! Single-table query layer.
//!
//! # Responsibility
//! - Expose one method per single-table statement (create/get/list/update/
//!   delete/count/search) over typed parameters and rows.
//! - Run against whatever connection it is bound to: a plain connection
//!   (autocommit) or an open transaction.
//!
//! # Invariants
//! - Every statement checks the bound `OpContext` before it runs.
//! - Read-one methods return `StoreError::NotFound` for missing rows; delete
//!   methods succeed when nothing matched.
//! - Constraint failures are mapped by result code, see `StoreError`.

use crate::context::OpContext;
use crate::error::{RowRef, StoreError, StoreResult};
use rusqlite::{Connection, Params, Row};

mod images;
mod media;
mod posts;
mod sessions;
mod taxonomies;
mod user_posts;
mod users;

pub use images::{CreateImageParams, UpdateImageParams};
pub use media::{CreateMediaParams, UpdateMediaParams};
pub use posts::{CreatePostParams, UpdatePostParams};
pub use sessions::CreateSessionParams;
pub use taxonomies::{CreateTaxonomyParams, UpdateTaxonomyParams};
pub use users::{CreateUserParams, UpdateUserParams};

const DEFAULT_PAGE_LIMIT: u32 = 20;
const PAGE_LIMIT_MAX: u32 = 100;

/// Limit/offset window for list and search queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u32,
    pub offset: u32,
}

impl Page {
    /// Builds a page, defaulting a zero limit to 20 and capping it at 100.
    pub fn new(limit: u32, offset: u32) -> Self {
        let limit = match limit {
            0 => DEFAULT_PAGE_LIMIT,
            value => value.min(PAGE_LIMIT_MAX),
        };
        Self { limit, offset }
    }

    pub fn first(limit: u32) -> Self {
        Self::new(limit, 0)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_LIMIT)
    }
}

/// Query handle bound to one connection or transaction and one context.
#[derive(Clone, Copy)]
pub struct Queries<'a> {
    conn: &'a Connection,
    ctx: &'a OpContext,
}

impl<'a> Queries<'a> {
    pub fn new(conn: &'a Connection, ctx: &'a OpContext) -> Self {
        Self { conn, ctx }
    }

    /// Handle that never observes cancellation.
    pub fn standalone(conn: &'a Connection) -> Self {
        Self::new(conn, OpContext::background())
    }

    pub fn context(&self) -> &'a OpContext {
        self.ctx
    }

    fn ready(&self) -> StoreResult<&'a Connection> {
        match self.ctx.done() {
            Some(reason) => Err(StoreError::Cancelled(reason)),
            None => Ok(self.conn),
        }
    }

    fn fetch_one<T, P: Params>(
        &self,
        sql: &str,
        params: P,
        missing: RowRef,
        parse: fn(&Row<'_>) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut stmt = self.ready()?.prepare_cached(sql)?;
        let mut rows = stmt.query(params)?;
        match rows.next()? {
            Some(row) => parse(row),
            None => Err(StoreError::NotFound(missing)),
        }
    }

    fn fetch_all<T, P: Params>(
        &self,
        sql: &str,
        params: P,
        parse: fn(&Row<'_>) -> StoreResult<T>,
    ) -> StoreResult<Vec<T>> {
        let mut stmt = self.ready()?.prepare_cached(sql)?;
        let mut rows = stmt.query(params)?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse(row)?);
        }
        Ok(items)
    }

    fn fetch_i64<P: Params>(&self, sql: &str, params: P) -> StoreResult<i64> {
        let mut stmt = self.ready()?.prepare_cached(sql)?;
        let value = stmt.query_row(params, |row| row.get(0))?;
        Ok(value)
    }

    fn fetch_ids<P: Params>(&self, sql: &str, params: P) -> StoreResult<Vec<i64>> {
        self.fetch_all(sql, params, |row| Ok(row.get(0)?))
    }

    /// Runs an `INSERT ... RETURNING` statement.
    fn insert_returning<T, P: Params>(
        &self,
        sql: &str,
        params: P,
        table: &'static str,
        parse: fn(&Row<'_>) -> StoreResult<T>,
    ) -> StoreResult<T> {
        self.write_returning(sql, params, table, parse)?
            .ok_or_else(|| StoreError::InvalidData(format!("insert into `{table}` returned no row")))
    }

    /// Runs an `UPDATE ... RETURNING` statement that targets one row.
    fn update_returning<T, P: Params>(
        &self,
        sql: &str,
        params: P,
        table: &'static str,
        missing: RowRef,
        parse: fn(&Row<'_>) -> StoreResult<T>,
    ) -> StoreResult<T> {
        self.write_returning(sql, params, table, parse)?
            .ok_or(StoreError::NotFound(missing))
    }

    fn write_returning<T, P: Params>(
        &self,
        sql: &str,
        params: P,
        table: &'static str,
        parse: fn(&Row<'_>) -> StoreResult<T>,
    ) -> StoreResult<Option<T>> {
        let mut stmt = self.ready()?.prepare_cached(sql)?;
        let mut rows = stmt
            .query(params)
            .map_err(|err| StoreError::from_write(err, table))?;
        match rows
            .next()
            .map_err(|err| StoreError::from_write(err, table))?
        {
            Some(row) => parse(row).map(Some),
            None => Ok(None),
        }
    }

    /// Runs a write without result rows and returns the affected row count.
    fn execute<P: Params>(&self, sql: &str, params: P, table: &'static str) -> StoreResult<usize> {
        let mut stmt = self.ready()?.prepare_cached(sql)?;
        stmt.execute(params)
            .map_err(|err| StoreError::from_write(err, table))
    }
}

/// Builds a `%term%` pattern for case-insensitive `LIKE ... ESCAPE '\'`
/// search. Wildcards in `term` match literally.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.trim().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
