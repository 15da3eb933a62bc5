//! Run Round use case
//!
//! Runs the execution queue for one round, one agent at a time. Each turn
//! sees the transcript and shared state as left by every earlier turn in the
//! same round; a failed turn is recorded and the round moves on.

use crate::config::OrchestrationParams;
use crate::gateway::{CompletionError, CompletionGateway};
use crate::ports::agent_completion::TurnRequest;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::error_sink::{ErrorSink, NoErrorSink};
use crate::ports::progress::{NoRoundProgress, RoundProgressNotifier};
use crate::state::{SharedRoster, SharedStateStore, SharedTranscript};
use std::sync::Arc;
use synclab_domain::{
    AgentDescriptor, AgentRole, AgentStatus, Author, ContextField, DomainError, NewEntry,
    TargetSelector, TranscriptEntry, WorkspaceToolExecutor,
};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that stop a round before any agent runs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoundError {
    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    #[error("No unmuted agents to run")]
    NoAgents,

    #[error(transparent)]
    Domain(DomainError),
}

impl From<DomainError> for RoundError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::UnknownAgent(role) => RoundError::UnknownAgent(role),
            DomainError::NoAgents => RoundError::NoAgents,
            other => RoundError::Domain(other),
        }
    }
}

/// What happened to one agent's turn
#[derive(Debug, Clone)]
pub enum TurnReport {
    Completed {
        role: AgentRole,
        entry: TranscriptEntry,
        /// Fields the turn's tool calls actually changed.
        changed: Vec<ContextField>,
    },
    Failed {
        role: AgentRole,
        error: CompletionError,
        /// The failure entry appended to the transcript.
        entry: TranscriptEntry,
    },
}

impl TurnReport {
    pub fn role(&self) -> &AgentRole {
        match self {
            TurnReport::Completed { role, .. } | TurnReport::Failed { role, .. } => role,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, TurnReport::Failed { .. })
    }
}

/// Result of a round: one report per queued agent, in execution order
#[derive(Debug, Clone, Default)]
pub struct RoundOutcome {
    pub turns: Vec<TurnReport>,
}

impl RoundOutcome {
    pub fn completed(&self) -> usize {
        self.turns.iter().filter(|t| !t.is_failed()).count()
    }

    pub fn failed(&self) -> usize {
        self.turns.iter().filter(|t| t.is_failed()).count()
    }

    /// Execution order of the round.
    pub fn order(&self) -> Vec<AgentRole> {
        self.turns.iter().map(|t| t.role().clone()).collect()
    }
}

/// Use case for running one round of agent turns
pub struct RunRoundUseCase {
    gateway: Arc<CompletionGateway>,
    store: Arc<SharedStateStore>,
    transcript: SharedTranscript,
    roster: SharedRoster,
    executor: WorkspaceToolExecutor,
    params: OrchestrationParams,
    error_sink: Arc<dyn ErrorSink>,
    logger: Arc<dyn ConversationLogger>,
}

impl RunRoundUseCase {
    pub fn new(
        gateway: Arc<CompletionGateway>,
        store: Arc<SharedStateStore>,
        transcript: SharedTranscript,
        roster: SharedRoster,
    ) -> Self {
        Self {
            gateway,
            store,
            transcript,
            roster,
            executor: WorkspaceToolExecutor::new(),
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

    /// Execute a round with default (no-op) progress
    pub async fn execute(&self, selector: &TargetSelector) -> Result<RoundOutcome, RoundError> {
        self.execute_with_progress(selector, &NoRoundProgress).await
    }

    /// Execute a round with progress callbacks
    pub async fn execute_with_progress(
        &self,
        selector: &TargetSelector,
        progress: &dyn RoundProgressNotifier,
    ) -> Result<RoundOutcome, RoundError> {
        let queue = self.roster.execution_queue(selector).await?;
        let order: Vec<&str> = queue.iter().map(|a| a.role.as_str()).collect();
        info!(agents = queue.len(), "Starting round");
        debug!(?order, "Execution queue");
        progress.on_round_start(&queue);

        let mut outcome = RoundOutcome::default();
        for agent in &queue {
            let report = self.run_turn(agent, progress).await;
            outcome.turns.push(report);
        }

        info!(
            completed = outcome.completed(),
            failed = outcome.failed(),
            "Round finished"
        );
        progress.on_round_complete(outcome.completed(), outcome.failed());
        Ok(outcome)
    }

    async fn run_turn(
        &self,
        agent: &AgentDescriptor,
        progress: &dyn RoundProgressNotifier,
    ) -> TurnReport {
        let role = agent.role.clone();
        self.roster.set_status(&role, AgentStatus::Thinking).await;
        progress.on_turn_start(agent);

        let request = TurnRequest {
            agent: agent.clone(),
            transcript: self.transcript.recent(self.params.turn_window).await,
            state: self.store.snapshot(),
            tools: self.executor.tool_spec().clone(),
        };

        match self.gateway.run_turn(&request).await {
            Ok(response) => {
                // Re-read the store: a reconciliation may have committed while
                // this call was in flight.
                let effects = self
                    .executor
                    .apply_all(&response.tool_calls, &self.store.snapshot());
                let changed = self.store.merge(&effects.patch);

                for invocation in &effects.invocations {
                    if !invocation.is_success() {
                        warn!(
                            agent = %role,
                            tool = %invocation.tool_name,
                            outcome = %invocation.outcome,
                            "Tool call failed"
                        );
                    }
                    self.logger
                        .log(ConversationEvent::tool_invocation(&role, invocation));
                }

                let entry = self
                    .transcript
                    .append(
                        NewEntry::message(Author::Agent(role.clone()), response.text)
                            .with_tool_invocations(effects.invocations),
                    )
                    .await;

                self.roster.set_status(&role, AgentStatus::Idle).await;
                self.logger.log(ConversationEvent::turn_completed(&entry));
                progress.on_turn_complete(agent, &entry);
                debug!(agent = %role, ?changed, "Turn completed");

                TurnReport::Completed {
                    role,
                    entry,
                    changed,
                }
            }
            Err(error) => {
                warn!(agent = %role, kind = %error.kind, "Turn failed: {}", error.message);
                self.error_sink
                    .record(&error.to_record(format!("turn:{}", role.as_str())));

                let entry = self
                    .transcript
                    .append(NewEntry::failure(format!(
                        "{} could not respond. {} {}",
                        agent.display_name,
                        error,
                        error.hint()
                    )))
                    .await;

                self.roster.set_status(&role, AgentStatus::Failed).await;
                self.logger.log(ConversationEvent::turn_failed(
                    &role,
                    error.kind,
                    &error.message,
                ));
                progress.on_turn_failed(agent, &error);

                TurnReport::Failed { role, error, entry }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::agent_completion::TurnResponse;
    use crate::test_support::{RecordingErrorSink, RecordingLogger, ScriptedCompletion};
    use std::time::Duration;
    use synclab_domain::{
        AgentRoster, ContextState, EntryKind, ErrorKind, InvocationStatus, Priority,
        ProviderFailure, ToolCall,
    };

    struct Fixture {
        completion: Arc<ScriptedCompletion>,
        store: Arc<SharedStateStore>,
        transcript: SharedTranscript,
        roster: SharedRoster,
        sink: Arc<RecordingErrorSink>,
        logger: Arc<RecordingLogger>,
        use_case: RunRoundUseCase,
    }

    fn fixture(completion: ScriptedCompletion, roster: AgentRoster) -> Fixture {
        let completion = Arc::new(completion);
        let gateway = Arc::new(CompletionGateway::new(
            completion.clone(),
            Duration::from_secs(5),
        ));
        let store = Arc::new(SharedStateStore::default());
        let transcript = SharedTranscript::new();
        let roster = SharedRoster::new(roster);
        let sink = Arc::new(RecordingErrorSink::default());
        let logger = Arc::new(RecordingLogger::default());
        let use_case = RunRoundUseCase::new(
            gateway,
            store.clone(),
            transcript.clone(),
            roster.clone(),
        )
        .with_error_sink(sink.clone())
        .with_conversation_logger(logger.clone());

        Fixture {
            completion,
            store,
            transcript,
            roster,
            sink,
            logger,
            use_case,
        }
    }

    fn agent(name: &str, priority: Priority) -> synclab_domain::AgentDescriptor {
        synclab_domain::AgentDescriptor::new(name.parse().unwrap(), format!("You are {}", name))
            .with_priority(priority)
    }

    fn ok(text: &str) -> Result<TurnResponse, ProviderFailure> {
        Ok(TurnResponse::text(text))
    }

    #[tokio::test]
    async fn test_round_runs_in_priority_order() {
        let roster = AgentRoster::new(vec![
            agent("high", Priority::High),
            agent("low", Priority::Low),
            agent("normal", Priority::Normal),
        ])
        .unwrap();
        let f = fixture(
            ScriptedCompletion::new().turn(ok("h")).turn(ok("n")).turn(ok("l")),
            roster,
        );

        let outcome = f.use_case.execute(&TargetSelector::AllUnmuted).await.unwrap();
        let order: Vec<String> = outcome.order().iter().map(|r| r.as_str().to_string()).collect();
        assert_eq!(order, vec!["high", "normal", "low"]);

        let asked: Vec<String> = (0..3)
            .map(|i| f.completion.turn_request(i).agent.role.as_str().to_string())
            .collect();
        assert_eq!(asked, order);
    }

    #[tokio::test]
    async fn test_muted_agent_is_skipped() {
        let roster = AgentRoster::new(vec![
            agent("loud", Priority::Low),
            agent("quiet", Priority::High).muted(true),
        ])
        .unwrap();
        let f = fixture(ScriptedCompletion::new().turn(ok("hi")), roster);

        let outcome = f.use_case.execute(&TargetSelector::AllUnmuted).await.unwrap();
        assert_eq!(outcome.turns.len(), 1);
        assert_eq!(f.completion.turn_count(), 1);
        assert_eq!(outcome.turns[0].role().as_str(), "loud");
    }

    #[tokio::test]
    async fn test_later_agent_sees_earlier_tool_effects_and_message() {
        let f = fixture(
            ScriptedCompletion::new()
                .turn(Ok(TurnResponse::text("Noted the plan").with_tool_call(
                    ToolCall::new("update_context").with_arg("scratchpad", "X"),
                )))
                .turn(ok("I see X"))
                .turn(ok("Agreed")),
            AgentRoster::default_roster(),
        );

        let outcome = f.use_case.execute(&TargetSelector::AllUnmuted).await.unwrap();
        assert_eq!(outcome.completed(), 3);

        let second = f.completion.turn_request(1);
        assert_eq!(second.state.scratchpad, "X");
        assert_eq!(second.transcript.len(), 1);
        assert_eq!(second.transcript[0].content, "Noted the plan");
        assert_eq!(
            second.transcript[0].tool_invocations[0].status,
            InvocationStatus::Success
        );

        let third = f.completion.turn_request(2);
        assert_eq!(third.transcript.len(), 2);
        assert_eq!(f.store.snapshot().scratchpad, "X");

        match &outcome.turns[0] {
            TurnReport::Completed { changed, .. } => {
                assert_eq!(changed, &vec![ContextField::Scratchpad])
            }
            other => panic!("expected completed turn, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failed_turn_appends_one_entry_and_round_continues() {
        let f = fixture(
            ScriptedCompletion::new()
                .turn(Err(ProviderFailure::status(401, "invalid api key")))
                .turn(ok("still here"))
                .turn(ok("me too")),
            AgentRoster::default_roster(),
        );

        let outcome = f.use_case.execute(&TargetSelector::AllUnmuted).await.unwrap();
        assert_eq!(outcome.failed(), 1);
        assert_eq!(outcome.completed(), 2);
        assert_eq!(f.completion.turn_count(), 3);

        let entries = f.transcript.entries().await;
        let failures: Vec<_> = entries.iter().filter(|e| e.is_failure()).collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].kind, EntryKind::Failure);
        assert!(failures[0].content.contains("[AUTH]"));
        assert!(failures[0].content.contains(ErrorKind::Auth.hint()));
        assert_eq!(entries.len(), 3);

        let records = f.sink.recent();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, ErrorKind::Auth);
        assert_eq!(records[0].context, "turn:architect");

        assert_eq!(
            f.roster.status(&AgentRole::Architect).await,
            AgentStatus::Failed
        );
        assert_eq!(f.roster.status(&AgentRole::Engineer).await, AgentStatus::Idle);
        assert!(f.logger.types().contains(&"turn_failed"));
    }

    #[tokio::test]
    async fn test_bad_tool_call_does_not_fail_turn() {
        let f = fixture(
            ScriptedCompletion::new().turn(Ok(TurnResponse::text("trying")
                .with_tool_call(ToolCall::new("delete_everything"))
                .with_tool_call(ToolCall::new("update_context").with_arg("objective", "Ship")))),
            AgentRoster::default_roster(),
        );

        let outcome = f
            .use_case
            .execute(&TargetSelector::Single(AgentRole::Engineer))
            .await
            .unwrap();
        assert_eq!(outcome.completed(), 1);

        let entry = f.transcript.entries().await.pop().unwrap();
        assert_eq!(entry.tool_invocations.len(), 2);
        assert_eq!(entry.tool_invocations[0].status, InvocationStatus::Failure);
        assert!(entry.tool_invocations[0].outcome.contains("delete_everything"));
        assert_eq!(f.store.snapshot().objective, "Ship");
        assert_eq!(
            f.logger.types(),
            vec!["tool_invocation", "tool_invocation", "turn_completed"]
        );
    }

    #[tokio::test]
    async fn test_turn_window_bounds_transcript() {
        let f = fixture(ScriptedCompletion::new().turn(ok("done")), AgentRoster::default_roster());
        for i in 0..20 {
            f.transcript
                .append(NewEntry::message(Author::Operator, format!("msg {}", i)))
                .await;
        }
        let use_case = f
            .use_case
            .with_params(OrchestrationParams::default().with_turn_window(5));

        use_case
            .execute(&TargetSelector::Single(AgentRole::Critic))
            .await
            .unwrap();
        let request = f.completion.turn_request(0);
        assert_eq!(request.transcript.len(), 5);
        assert_eq!(request.transcript[4].content, "msg 19");
    }

    #[tokio::test]
    async fn test_unknown_target_is_an_error() {
        let f = fixture(ScriptedCompletion::new(), AgentRoster::default_roster());
        let err = f
            .use_case
            .execute(&TargetSelector::Single(AgentRole::Custom("ghost".into())))
            .await
            .unwrap_err();
        assert!(matches!(err, RoundError::UnknownAgent(_)));
        assert_eq!(f.completion.turn_count(), 0);
        assert!(f.transcript.is_empty().await);
    }

    #[tokio::test]
    async fn test_all_muted_round_has_no_agents() {
        let roster = AgentRoster::new(vec![agent("solo", Priority::Normal).muted(true)]).unwrap();
        let f = fixture(ScriptedCompletion::new(), roster);
        let err = f.use_case.execute(&TargetSelector::AllUnmuted).await.unwrap_err();
        assert_eq!(err, RoundError::NoAgents);
    }

    #[tokio::test]
    async fn test_turn_sees_state_snapshot() {
        let f = fixture(ScriptedCompletion::new().turn(ok("ok")), AgentRoster::default_roster());
        f.store.replace(ContextState::default().with_objective("Ship the parser"));
        f.use_case
            .execute(&TargetSelector::Single(AgentRole::Architect))
            .await
            .unwrap();
        assert_eq!(f.completion.turn_request(0).state.objective, "Ship the parser");
        assert!(f.completion.turn_request(0).tools.get("update_context").is_some());
    }
}
