//! Cooperative cancellation
//!
//! Long running steps poll the token at I/O boundaries (between download
//! chunks, before transform, before promotion). Scoped guards do the cleanup.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{AppstowError, Result};

/// Shared flag requesting that an in-flight operation stop
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Fail with [`AppstowError::Cancelled`] once cancellation was requested
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(AppstowError::Cancelled)
        } else {
            Ok(())
        }
    }
}
