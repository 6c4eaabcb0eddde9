//! Cancellation and deadline propagation for store calls.
//!
//! # Responsibility
//! - Carry a caller-owned cancel signal and optional deadline into every
//!   statement a store operation issues.
//!
//! # Invariants
//! - Clones share the same cancel flag; cancelling one cancels all.
//! - A context never becomes live again once it reports `Some(reason)`.

use once_cell::sync::Lazy;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

static BACKGROUND: Lazy<OpContext> = Lazy::new(OpContext::new);

/// Why a context stopped accepting work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    Cancelled,
    DeadlineExceeded,
}

impl Display for CancelReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cancelled => write!(f, "operation cancelled"),
            Self::DeadlineExceeded => write!(f, "deadline exceeded"),
        }
    }
}

/// Per-request cancellation handle.
#[derive(Debug, Clone, Default)]
pub struct OpContext {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl OpContext {
    /// Creates a live context without a deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared context that is never cancelled.
    pub fn background() -> &'static OpContext {
        &BACKGROUND
    }

    /// Derives a context that expires `timeout` from now, keeping the
    /// parent's cancel flag and the earlier of both deadlines.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Derives a context that expires at `deadline`.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(current) if current < deadline => current,
            _ => deadline,
        };
        Self {
            cancelled: Arc::clone(&self.cancelled),
            deadline: Some(deadline),
        }
    }

    /// Signals cancellation to this context and every clone of it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns the reason this context is done, or `None` while it is live.
    pub fn done(&self) -> Option<CancelReason> {
        if self.cancelled.load(Ordering::SeqCst) {
            return Some(CancelReason::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(CancelReason::DeadlineExceeded),
            _ => None,
        }
    }
}
