//! Cooperative cancellation of a comparison run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A stop signal scoped to one comparison run.
///
/// Clones share the same flag, so the caller keeps one handle to cancel with
/// and hands clones to the parse workers. Create a fresh token for every run:
/// once set, a token stays set.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
