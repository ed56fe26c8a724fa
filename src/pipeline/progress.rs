// Advisory progress reporting and cooperative cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// One progress update: `completed` of `total` units for `label`.
///
/// Page-level updates carry (page, page_count) for one document; batch
/// updates carry (document_index, document_count). Within one batch call,
/// successive updates of the same granularity never decrease.
#[derive(Debug, Clone, Copy)]
pub struct Progress<'a> {
    pub completed: u32,
    pub total: u32,
    pub label: &'a str,
}

/// Caller-supplied progress callback. Purely advisory; no effect on
/// correctness.
pub type ProgressFn<'a> = dyn Fn(Progress<'_>) + 'a;

/// Cooperative cancellation flag, checked between pages and between
/// documents. Cloning shares the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trip the flag. In-flight work stops at its next check point.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Per-call context: optional progress sink and optional cancel token.
#[derive(Default)]
pub struct JobContext<'a> {
    progress: Option<&'a ProgressFn<'a>>,
    cancel: Option<&'a CancelToken>,
}

impl<'a> JobContext<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_progress(mut self, progress: &'a ProgressFn<'a>) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_cancel(mut self, cancel: &'a CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn cancel_token(&self) -> Option<&'a CancelToken> {
        self.cancel
    }

    /// Deliver a progress update to the sink, if any.
    pub fn report(&self, completed: u32, total: u32, label: &str) {
        if let Some(progress) = self.progress {
            progress(Progress {
                completed,
                total,
                label,
            });
        }
    }

    /// Err(`Cancelled`) once the token has tripped.
    pub fn check_cancelled(&self) -> crate::error::Result<()> {
        match self.cancel {
            Some(token) if token.is_cancelled() => Err(crate::error::SqueezeError::Cancelled),
            _ => Ok(()),
        }
    }
}
