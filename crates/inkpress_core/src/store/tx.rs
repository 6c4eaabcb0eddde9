//! Transaction runner.
//!
//! # Responsibility
//! - Wrap one unit of work in a single `BEGIN IMMEDIATE` transaction.
//! - Commit on success; roll back and surface the error on failure.
//!
//! # Invariants
//! - The unit of work only ever sees a `Queries` handle bound to the open
//!   transaction.
//! - A failed rollback is reported together with the error that caused it.
//! - Nothing here retries or reclassifies errors.

use crate::context::OpContext;
use crate::error::{StoreError, StoreResult};
use crate::query::Queries;
use log::{debug, error, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::time::Instant;

/// Runs `work` inside one immediate transaction on `conn`.
///
/// `op` names the orchestration operation in log events.
pub(crate) fn run_in_transaction<T, F>(
    conn: &Connection,
    ctx: &OpContext,
    op: &'static str,
    work: F,
) -> StoreResult<T>
where
    F: FnOnce(&Queries<'_>) -> StoreResult<T>,
{
    if let Some(reason) = ctx.done() {
        return Err(reason.into());
    }

    let started_at = Instant::now();
    // Reserved lock from BEGIN; no read-to-write upgrade inside the work.
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;

    let outcome = work(&Queries::new(&tx, ctx));
    match outcome {
        Ok(value) => match tx.commit() {
            Ok(()) => {
                debug!(
                    "event=tx_commit module=store status=ok op={op} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(value)
            }
            Err(err) => {
                let err = StoreError::from(err);
                warn!(
                    "event=tx_commit module=store status=error op={op} duration_ms={} error_kind={} transient={}",
                    started_at.elapsed().as_millis(),
                    err.kind().as_str(),
                    err.is_transient()
                );
                Err(err)
            }
        },
        Err(cause) => match tx.rollback() {
            Ok(()) => {
                warn!(
                    "event=tx_rollback module=store status=ok op={op} duration_ms={} error_kind={} transient={}",
                    started_at.elapsed().as_millis(),
                    cause.kind().as_str(),
                    cause.is_transient()
                );
                Err(cause)
            }
            Err(rollback) => {
                error!(
                    "event=tx_rollback module=store status=error op={op} duration_ms={} error_kind={}",
                    started_at.elapsed().as_millis(),
                    cause.kind().as_str()
                );
                Err(StoreError::Rollback {
                    cause: Box::new(cause),
                    rollback: rollback.into(),
                })
            }
        },
    }
}
