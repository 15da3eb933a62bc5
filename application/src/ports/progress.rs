//! Progress notification port
//!
//! Lets the presentation layer follow a round as it runs. Every method has a
//! no-op default so implementors pick what they display.

use crate::gateway::CompletionError;
use synclab_domain::{AgentDescriptor, TranscriptEntry};

pub trait RoundProgressNotifier: Send + Sync {
    /// Called once the execution queue is known.
    fn on_round_start(&self, _queue: &[AgentDescriptor]) {}

    fn on_turn_start(&self, _agent: &AgentDescriptor) {}

    fn on_turn_complete(&self, _agent: &AgentDescriptor, _entry: &TranscriptEntry) {}

    fn on_turn_failed(&self, _agent: &AgentDescriptor, _error: &CompletionError) {}

    fn on_round_complete(&self, _completed: usize, _failed: usize) {}

    /// `automatic` is false for operator-requested passes.
    fn on_reconcile_start(&self, _automatic: bool) {}

    fn on_reconcile_complete(&self, _entry: Option<&TranscriptEntry>) {}

    fn on_reconcile_failed(&self, _error: &CompletionError) {}
}

/// No-op progress notifier
pub struct NoRoundProgress;

impl RoundProgressNotifier for NoRoundProgress {}
