//! Port for the operator-visible failure log.
//!
//! Implementations keep the last N [`ErrorRecord`]s, durably if they can, so
//! the next session can replay them. Recording is synchronous and never
//! fails from the caller's point of view.

use synclab_domain::ErrorRecord;

pub trait ErrorSink: Send + Sync {
    /// Record a failure. Best-effort.
    fn record(&self, record: &ErrorRecord);

    /// Retained records, oldest first.
    fn recent(&self) -> Vec<ErrorRecord>;
}

/// Sink that drops everything.
pub struct NoErrorSink;

impl ErrorSink for NoErrorSink {
    fn record(&self, _record: &ErrorRecord) {}

    fn recent(&self) -> Vec<ErrorRecord> {
        Vec::new()
    }
}
