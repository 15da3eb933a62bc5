//! Reconcile use case
//!
//! Re-derives the objective and scratchpad from the recent conversation and
//! the current artifact. Only those two fields are ever written, and only
//! when the returned value differs from what is stored.

use crate::config::OrchestrationParams;
use crate::gateway::{CompletionError, CompletionGateway};
use crate::ports::agent_completion::ReconcileRequest;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::error_sink::{ErrorSink, NoErrorSink};
use crate::ports::progress::{NoRoundProgress, RoundProgressNotifier};
use crate::state::{SharedStateStore, SharedTranscript};
use std::fmt;
use std::sync::Arc;
use synclab_domain::{ContextField, ContextPatch, NewEntry, TranscriptEntry};
use thiserror::Error;
use tracing::{info, warn};

/// Who asked for the pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileTrigger {
    /// Operator request. Always leaves a transcript entry.
    Manual,
    /// Significant artifact change. Silent when nothing changed.
    Automatic,
}

impl ReconcileTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReconcileTrigger::Manual => "manual",
            ReconcileTrigger::Automatic => "auto",
        }
    }

    pub fn is_automatic(&self) -> bool {
        matches!(self, ReconcileTrigger::Automatic)
    }
}

impl fmt::Display for ReconcileTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug, Clone)]
pub enum ReconcileError {
    #[error("Reconciliation failed: {error}")]
    Completion {
        error: CompletionError,
        /// Failure entry appended to the transcript.
        entry: TranscriptEntry,
    },
}

impl ReconcileError {
    pub fn completion_error(&self) -> &CompletionError {
        match self {
            ReconcileError::Completion { error, .. } => error,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    pub trigger: ReconcileTrigger,
    /// Fields that were actually overwritten.
    pub changed: Vec<ContextField>,
    pub rationale: String,
    /// Synthesis entry, absent for a silent automatic no-op.
    pub entry: Option<TranscriptEntry>,
}

impl ReconcileOutcome {
    pub fn is_noop(&self) -> bool {
        self.changed.is_empty()
    }
}

pub struct ReconcileUseCase {
    gateway: Arc<CompletionGateway>,
    store: Arc<SharedStateStore>,
    transcript: SharedTranscript,
    params: OrchestrationParams,
    error_sink: Arc<dyn ErrorSink>,
    logger: Arc<dyn ConversationLogger>,
}

impl ReconcileUseCase {
    pub fn new(
        gateway: Arc<CompletionGateway>,
        store: Arc<SharedStateStore>,
        transcript: SharedTranscript,
    ) -> Self {
        Self {
            gateway,
            store,
            transcript,
            params: OrchestrationParams::default(),
            error_sink: Arc::new(NoErrorSink),
            logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_params(mut self, params: OrchestrationParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_error_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.error_sink = sink;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub async fn execute(
        &self,
        trigger: ReconcileTrigger,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        self.execute_with_progress(trigger, &NoRoundProgress).await
    }

    pub async fn execute_with_progress(
        &self,
        trigger: ReconcileTrigger,
        progress: &dyn RoundProgressNotifier,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        info!(%trigger, "Starting reconciliation");
        progress.on_reconcile_start(trigger.is_automatic());

        let request = ReconcileRequest {
            transcript: self.transcript.recent(self.params.reconcile_window).await,
            state: self.store.snapshot(),
        };

        let response = match self.gateway.reconcile(&request).await {
            Ok(response) => response,
            Err(error) => {
                warn!(%trigger, kind = %error.kind, "Reconciliation failed: {}", error.message);
                self.error_sink
                    .record(&error.to_record(format!("reconcile:{}", trigger)));
                let entry = self
                    .transcript
                    .append(NewEntry::failure(format!(
                        "Synchronization failed. {} {}",
                        error,
                        error.hint()
                    )))
                    .await;
                progress.on_reconcile_failed(&error);
                return Err(ReconcileError::Completion { error, entry });
            }
        };

        // Blank fields carry no proposal. Values are merged verbatim; the
        // store skips any that equal the current ones byte for byte.
        let mut patch = ContextPatch::new();
        if !response.objective.trim().is_empty() {
            patch = patch.objective(response.objective.as_str());
        }
        if !response.scratchpad.trim().is_empty() {
            patch = patch.scratchpad(response.scratchpad.as_str());
        }
        let changed = self.store.merge(&patch);
        let rationale = response.rationale.trim().to_string();

        let names: Vec<&str> = changed.iter().map(|f| f.as_str()).collect();
        self.logger.log(ConversationEvent::reconciliation(
            trigger.as_str(),
            &names,
            &rationale,
        ));

        let entry = if changed.is_empty() && trigger.is_automatic() {
            info!("Reconciliation made no changes");
            None
        } else {
            let summary = if changed.is_empty() {
                "Synchronized shared state: no changes.".to_string()
            } else {
                format!("Synchronized shared state: updated {}.", names.join(", "))
            };
            let content = if rationale.is_empty() {
                summary
            } else {
                format!("{} {}", summary, rationale)
            };
            info!(changed = ?names, "Reconciliation applied");
            Some(self.transcript.append(NewEntry::synthesis(content)).await)
        };

        progress.on_reconcile_complete(entry.as_ref());
        Ok(ReconcileOutcome {
            trigger,
            changed,
            rationale,
            entry,
        })
    }
}
