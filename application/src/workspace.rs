//! Workspace facade
//!
//! One session's worth of wiring: the shared store, transcript and roster,
//! plus the use cases that act on them. The presentation layer talks to this
//! and nothing else.

use crate::config::{OrchestrationParams, SyncParams};
use crate::gateway::CompletionGateway;
use crate::ports::agent_completion::AgentCompletion;
use crate::ports::clock::{Clock, SystemClock};
use crate::ports::conversation_logger::{ConversationLogger, NoConversationLogger};
use crate::ports::error_sink::{ErrorSink, NoErrorSink};
use crate::ports::progress::RoundProgressNotifier;
use crate::state::{SharedRoster, SharedStateStore, SharedTranscript};
use crate::use_cases::reconcile::{
    ReconcileError, ReconcileOutcome, ReconcileTrigger, ReconcileUseCase,
};
use crate::use_cases::run_round::{RoundError, RoundOutcome, RunRoundUseCase};
use crate::use_cases::sync_coordinator::SyncCoordinator;
use std::sync::Arc;
use synclab_domain::{
    AgentDescriptor, AgentRole, AgentRoster, AgentStatus, Author, ContextField, ContextPatch,
    ContextState, ErrorRecord, NewEntry, Priority, TargetSelector, TranscriptEntry,
};
use tracing::info;

/// Result of [`Workspace::post`].
#[derive(Debug, Clone)]
pub struct PostOutcome {
    /// The operator's own entry.
    pub entry: TranscriptEntry,
    pub round: RoundOutcome,
}

pub struct WorkspaceBuilder {
    completion: Arc<dyn AgentCompletion>,
    roster: AgentRoster,
    initial: ContextState,
    params: OrchestrationParams,
    sync_params: SyncParams,
    error_sink: Arc<dyn ErrorSink>,
    logger: Arc<dyn ConversationLogger>,
    clock: Arc<dyn Clock>,
}

impl WorkspaceBuilder {
    pub fn new(completion: Arc<dyn AgentCompletion>) -> Self {
        Self {
            completion,
            roster: AgentRoster::default_roster(),
            initial: ContextState::default(),
            params: OrchestrationParams::default(),
            sync_params: SyncParams::default(),
            error_sink: Arc::new(NoErrorSink),
            logger: Arc::new(NoConversationLogger),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn roster(mut self, roster: AgentRoster) -> Self {
        self.roster = roster;
        self
    }

    pub fn initial_state(mut self, state: ContextState) -> Self {
        self.initial = state;
        self
    }

    pub fn params(mut self, params: OrchestrationParams) -> Self {
        self.params = params;
        self
    }

    pub fn sync_params(mut self, params: SyncParams) -> Self {
        self.sync_params = params;
        self
    }

    pub fn error_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.error_sink = sink;
        self
    }

    pub fn conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn build(self) -> Workspace {
        let gateway = Arc::new(CompletionGateway::new(
            self.completion,
            self.params.call_timeout,
        ));
        let store = Arc::new(SharedStateStore::new(self.initial));
        let transcript = SharedTranscript::new();
        let roster = SharedRoster::new(self.roster);

        let run_round = RunRoundUseCase::new(
            gateway.clone(),
            store.clone(),
            transcript.clone(),
            roster.clone(),
        )
        .with_params(self.params.clone())
        .with_error_sink(self.error_sink.clone())
        .with_conversation_logger(self.logger.clone());

        let reconcile = Arc::new(
            ReconcileUseCase::new(gateway.clone(), store.clone(), transcript.clone())
                .with_params(self.params)
                .with_error_sink(self.error_sink.clone())
                .with_conversation_logger(self.logger),
        );

        let sync = Arc::new(SyncCoordinator::new(
            reconcile.clone(),
            store.clone(),
            self.clock,
            &self.sync_params,
        ));

        Workspace {
            gateway,
            store,
            transcript,
            roster,
            run_round,
            reconcile,
            sync,
            error_sink: self.error_sink,
        }
    }
}

pub struct Workspace {
    gateway: Arc<CompletionGateway>,
    store: Arc<SharedStateStore>,
    transcript: SharedTranscript,
    roster: SharedRoster,
    run_round: RunRoundUseCase,
    reconcile: Arc<ReconcileUseCase>,
    sync: Arc<SyncCoordinator>,
    error_sink: Arc<dyn ErrorSink>,
}

impl Workspace {
    pub fn builder(completion: Arc<dyn AgentCompletion>) -> WorkspaceBuilder {
        WorkspaceBuilder::new(completion)
    }

    pub fn has_credential(&self) -> bool {
        self.gateway.has_credential()
    }

    /// Append an operator message and run a round. A leading `@role`
    /// addresses a single agent, muted or not.
    pub async fn post(
        &self,
        text: &str,
        progress: &dyn RoundProgressNotifier,
    ) -> Result<PostOutcome, RoundError> {
        let (selector, _) = TargetSelector::from_message(text);
        // Resolve first so a bad mention leaves no trace in the transcript.
        self.roster.execution_queue(&selector).await?;

        let entry = self
            .transcript
            .append(NewEntry::message(Author::Operator, text.trim()))
            .await;
        let round = self
            .run_round
            .execute_with_progress(&selector, progress)
            .await?;
        Ok(PostOutcome { entry, round })
    }

    pub async fn run_round(
        &self,
        selector: &TargetSelector,
        progress: &dyn RoundProgressNotifier,
    ) -> Result<RoundOutcome, RoundError> {
        self.run_round.execute_with_progress(selector, progress).await
    }

    /// Operator-requested reconciliation. Always leaves a transcript entry.
    pub async fn reconcile_now(
        &self,
        progress: &dyn RoundProgressNotifier,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        self.reconcile
            .execute_with_progress(ReconcileTrigger::Manual, progress)
            .await
    }

    /// Replace the active artifact, as if an agent had written it.
    pub fn set_artifact(&self, name: &str, content: &str) -> Vec<ContextField> {
        self.store.merge(
            &ContextPatch::new()
                .artifact_name(name)
                .artifact_content(content),
        )
    }

    pub async fn set_priority(&self, role: &AgentRole, priority: Priority) -> Result<(), RoundError> {
        self.roster.set_priority(role, priority).await?;
        info!(agent = %role, %priority, "Priority changed");
        Ok(())
    }

    pub async fn set_muted(&self, role: &AgentRole, muted: bool) -> Result<(), RoundError> {
        self.roster.set_muted(role, muted).await?;
        info!(agent = %role, muted, "Mute changed");
        Ok(())
    }

    pub async fn roster(&self) -> Vec<(AgentDescriptor, AgentStatus)> {
        self.roster.snapshot().await
    }

    pub fn state(&self) -> ContextState {
        self.store.snapshot()
    }

    pub async fn transcript(&self) -> Vec<TranscriptEntry> {
        self.transcript.entries().await
    }

    /// Replace the shared state with defaults. The transcript is kept.
    pub async fn reset(&self) {
        self.sync.reset_baseline("").await;
        self.store.replace(ContextState::default());
        info!("Shared state reset");
    }

    pub fn recent_errors(&self) -> Vec<ErrorRecord> {
        self.error_sink.recent()
    }

    pub fn store(&self) -> Arc<SharedStateStore> {
        self.store.clone()
    }

    pub fn sync(&self) -> Arc<SyncCoordinator> {
        self.sync.clone()
    }
}
