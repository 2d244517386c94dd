//! Cooperative cancellation for long simulation runs.
//!
//! The simulator polls a [`CancellationToken`] every
//! [`CANCEL_CHECK_INTERVAL`] samples, bounding the latency between a cancel
//! request and the run returning.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Number of samples drawn between two cancellation checks.
pub const CANCEL_CHECK_INTERVAL: usize = 1024;

/// Shared flag requesting that a running simulation stop.
///
/// Clones share the same flag, so one clone can be handed to the thread
/// running the simulation and another kept by the requester.
///
/// # Examples
///
/// ```rust
/// use valuation_mc::mc::CancellationToken;
///
/// let token = CancellationToken::new();
/// let handle = token.clone();
///
/// assert!(!token.is_cancelled());
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token that is not cancelled.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Idempotent.
    #[inline]
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called on any clone.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
