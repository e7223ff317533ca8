//! Progress reporting for the loading and aggregation steps.
//!
//! Pipeline steps report through [`ProgressCallback`] so that they stay
//! unaware of how (or whether) progress is drawn. The CLI plugs in
//! `indicatif` bars; tests use [`NullProgress`].

use std::sync::Arc;

/// Receiver for progress updates from a long-running step.
pub trait ProgressCallback: Send + Sync {
    /// Set the total expected units of work, once known.
    fn set_total(&self, total: u64);

    /// Advance progress by `delta` units.
    fn inc(&self, delta: u64);

    /// Update the message displayed alongside the progress indicator.
    fn set_message(&self, msg: String);

    /// Mark the step as complete with a final message.
    fn finish(&self, msg: String);
}

/// Progress receiver that discards every update.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}

/// Returns a shared [`NullProgress`].
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
