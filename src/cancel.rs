//! Cooperative cancellation shared between the collector and the engine.
//!
//! A [`CancelToken`] carries an optional absolute deadline plus a manual
//! cancel flag. The collector hands a fresh token to the engine with every
//! `solve` call; the engine is expected to check it inside its search loop,
//! not only between solutions, so that an unproductive search can be cut
//! at the deadline rather than at the next solution boundary.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Cancellation handle scoped to one engine call.
///
/// Cloning is cheap and shares the same cancel flag, so the collector and
/// the engine-side iterator observe cancellation consistently.
#[derive(Debug, Clone)]
pub struct CancelToken {
    deadline: Option<Instant>,
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Token that trips once `deadline` passes.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Token with no deadline; trips only on an explicit [`cancel`].
    ///
    /// Program loading uses this: consult work is bounded by program size,
    /// not search space, so no budget is imposed.
    ///
    /// [`cancel`]: CancelToken::cancel
    pub fn unbounded() -> Self {
        Self {
            deadline: None,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Trip the token manually.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether the token has tripped, by flag or by deadline.
    pub fn is_cancelled(&self) -> bool {
        if self.cancelled.load(Ordering::Relaxed) {
            return true;
        }
        match self.deadline {
            Some(deadline) => Instant::now() >= deadline,
            None => false,
        }
    }

    /// The absolute deadline, if one was set.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline. `None` for unbounded tokens.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }
}
