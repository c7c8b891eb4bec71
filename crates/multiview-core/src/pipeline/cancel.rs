use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{MultiviewError, Result};

/// Cooperative cancellation flag shared between a request and its caller.
///
/// The pipeline checks it before every backend call and at each stage
/// boundary. A call already in flight runs until its own timeout.
#[derive(Clone, Debug, Default)]
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

    /// `Err(Cancelled)` once [`cancel`](Self::cancel) has been called.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(MultiviewError::Cancelled)
        } else {
            Ok(())
        }
    }
}
