//! Cooperative cancellation for long-running traversals.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::GraphError;

/// Shared flag polled by the explorer at every recursion step.
///
/// Clones observe the same flag, so a handle kept by the host can abort a
/// traversal running elsewhere.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token that has not been cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Returns `Err(GraphError::Cancelled)` once cancellation was requested.
    ///
    /// # Errors
    /// Returns [`GraphError::Cancelled`] when the token has been tripped.
    pub fn check(&self) -> Result<(), GraphError> {
        if self.is_cancelled() {
            Err(GraphError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Exposes the underlying flag for signal handler registration.
    #[must_use]
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }
}
