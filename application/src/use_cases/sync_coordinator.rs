//! Sync coordinator
//!
//! Drives the [`SyncTrigger`] state machine from store changes and runs an
//! automatic [`ReconcileUseCase`] pass when an artifact edit turns out to be
//! significant. Time comes from the [`Clock`] port; the background loop only
//! decides when to call [`SyncCoordinator::tick`].

use crate::config::SyncParams;
use crate::ports::clock::Clock;
use crate::state::SharedStateStore;
use crate::use_cases::reconcile::{
    ReconcileError, ReconcileOutcome, ReconcileTrigger, ReconcileUseCase,
};
use std::sync::Arc;
use std::time::Instant;
use synclab_domain::{ChangeAssessment, SyncDecision, SyncPhase, SyncTrigger};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// What a [`tick`](SyncCoordinator::tick) did.
#[derive(Debug)]
pub enum SyncEvent {
    /// Checked and found too small to reconcile.
    Skipped(ChangeAssessment),
    Reconciled {
        assessment: ChangeAssessment,
        result: Result<ReconcileOutcome, ReconcileError>,
    },
}

pub struct SyncCoordinator {
    trigger: Mutex<SyncTrigger>,
    reconcile: Arc<ReconcileUseCase>,
    store: Arc<SharedStateStore>,
    clock: Arc<dyn Clock>,
    enabled: bool,
}

impl SyncCoordinator {
    /// The store's current artifact becomes the initial baseline.
    pub fn new(
        reconcile: Arc<ReconcileUseCase>,
        store: Arc<SharedStateStore>,
        clock: Arc<dyn Clock>,
        params: &SyncParams,
    ) -> Self {
        let baseline = store.snapshot().artifact_content;
        Self {
            trigger: Mutex::new(SyncTrigger::new(params.trigger_config(), baseline)),
            reconcile,
            store,
            clock,
            enabled: params.enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Feed the latest artifact content into the trigger.
    pub async fn observe_artifact(&self, content: &str) {
        if !self.enabled {
            return;
        }
        let mut trigger = self.trigger.lock().await;
        trigger.on_artifact_mutation(content, self.clock.now());
        debug!(phase = ?trigger.phase(), "Artifact mutation observed");
    }

    /// Check the debounce deadline and, if a significant change is due,
    /// run the reconciliation pass to completion.
    pub async fn tick(&self) -> Option<SyncEvent> {
        let decision = self.trigger.lock().await.poll(self.clock.now())?;

        match decision {
            SyncDecision::Skip { assessment } => {
                debug!(
                    edits = assessment.edits,
                    strategy = ?assessment.strategy,
                    "Artifact change below threshold"
                );
                Some(SyncEvent::Skipped(assessment))
            }
            SyncDecision::Reconcile {
                ticket,
                snapshot,
                assessment,
            } => {
                info!(
                    edits = assessment.edits,
                    strategy = ?assessment.strategy,
                    "Significant artifact change, reconciling"
                );
                let result = self.reconcile.execute(ReconcileTrigger::Automatic).await;
                self.trigger
                    .lock()
                    .await
                    .finish(ticket, &snapshot, self.clock.now());
                Some(SyncEvent::Reconciled { assessment, result })
            }
        }
    }

    /// Drop pending work and treat `content` as already reconciled.
    pub async fn reset_baseline(&self, content: &str) {
        self.trigger.lock().await.reset_baseline(content);
    }

    pub async fn phase(&self) -> SyncPhase {
        self.trigger.lock().await.phase()
    }

    /// Significance checks performed so far.
    pub async fn checks(&self) -> u64 {
        self.trigger.lock().await.checks()
    }

    async fn deadline(&self) -> Option<Instant> {
        self.trigger.lock().await.deadline()
    }

    /// Watch the store and tick at debounce deadlines until cancelled.
    pub fn spawn(self: Arc<Self>, cancel: CancellationToken) -> JoinHandle<()> {
        let mut rx = self.store.subscribe();
        let mut last_seen = rx.borrow_and_update().state.artifact_content.clone();

        tokio::spawn(async move {
            loop {
                let deadline = self.deadline().await;
                let wait = async {
                    match deadline {
                        Some(at) => {
                            tokio::time::sleep_until(tokio::time::Instant::from_std(at)).await
                        }
                        None => std::future::pending::<()>().await,
                    }
                };

                tokio::select! {
                    _ = cancel.cancelled() => break,
                    changed = rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let content = rx.borrow_and_update().state.artifact_content.clone();
                        if content != last_seen {
                            self.observe_artifact(&content).await;
                            last_seen = content;
                        }
                    }
                    _ = wait => {
                        self.tick().await;
                    }
                }
            }
            debug!("Sync coordinator stopped");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::CompletionGateway;
    use crate::ports::agent_completion::ReconcileResponse;
    use crate::state::SharedTranscript;
    use crate::test_support::{ManualClock, ScriptedCompletion};
    use std::time::Duration;
    use synclab_domain::{ContextPatch, ContextState, ProviderFailure};

    const BASE: &str = "a\nb\nc";
    const BIG_EDIT: &str = "a\nb\nc\n1\n2\n3\n4\n5";

    struct Fixture {
        completion: Arc<ScriptedCompletion>,
        store: Arc<SharedStateStore>,
        transcript: SharedTranscript,
        clock: Arc<ManualClock>,
        coordinator: SyncCoordinator,
    }

    fn fixture(completion: ScriptedCompletion, params: SyncParams) -> Fixture {
        let completion = Arc::new(completion);
        let gateway = Arc::new(CompletionGateway::new(
            completion.clone(),
            Duration::from_secs(5),
        ));
        let store = Arc::new(SharedStateStore::new(
            ContextState::default()
                .with_objective("Ship")
                .with_artifact("notes.md", BASE),
        ));
        let transcript = SharedTranscript::new();
        let reconcile = Arc::new(ReconcileUseCase::new(
            gateway,
            store.clone(),
            transcript.clone(),
        ));
        let clock = Arc::new(ManualClock::new());
        let coordinator = SyncCoordinator::new(reconcile, store.clone(), clock.clone(), &params);
        Fixture {
            completion,
            store,
            transcript,
            clock,
            coordinator,
        }
    }

    fn refined() -> Result<ReconcileResponse, ProviderFailure> {
        Ok(ReconcileResponse::new("Ship v2", "notes", "artifact grew"))
    }

    #[tokio::test]
    async fn test_burst_produces_single_reconcile() {
        let f = fixture(ScriptedCompletion::new().reconcile(refined()), SyncParams::default());

        f.coordinator.observe_artifact("a\nb\nc\n1").await;
        f.clock.advance(Duration::from_secs(1));
        f.coordinator.observe_artifact("a\nb\nc\n1\n2").await;
        f.clock.advance(Duration::from_secs(1));
        f.coordinator.observe_artifact(BIG_EDIT).await;

        f.clock.advance(Duration::from_secs(2));
        assert!(f.coordinator.tick().await.is_none());

        f.clock.advance(Duration::from_secs(1));
        let event = f.coordinator.tick().await.unwrap();
        match event {
            SyncEvent::Reconciled { assessment, result } => {
                assert_eq!(assessment.edits, 5);
                assert!(result.is_ok());
            }
            other => panic!("expected reconcile, got {:?}", other),
        }
        assert_eq!(f.coordinator.checks().await, 1);
        assert_eq!(f.completion.reconcile_count(), 1);
        assert_eq!(f.store.snapshot().objective, "Ship v2");
        assert_eq!(f.coordinator.phase().await, SyncPhase::Idle);
    }

    #[tokio::test]
    async fn test_small_edit_is_skipped_without_calling_provider() {
        let f = fixture(ScriptedCompletion::new(), SyncParams::default());
        f.coordinator.observe_artifact("a\nb\nc\nd").await;
        f.clock.advance(Duration::from_secs(3));

        let event = f.coordinator.tick().await.unwrap();
        assert!(matches!(event, SyncEvent::Skipped(_)));
        assert_eq!(f.completion.reconcile_count(), 0);
        assert!(f.transcript.is_empty().await);
    }

    #[tokio::test]
    async fn test_failed_reconcile_still_returns_to_idle() {
        let f = fixture(
            ScriptedCompletion::new().reconcile(Err(ProviderFailure::Timeout)),
            SyncParams::default(),
        );
        f.coordinator.observe_artifact(BIG_EDIT).await;
        f.clock.advance(Duration::from_secs(3));

        let event = f.coordinator.tick().await.unwrap();
        assert!(matches!(
            event,
            SyncEvent::Reconciled { result: Err(_), .. }
        ));
        assert_eq!(f.coordinator.phase().await, SyncPhase::Idle);
        assert_eq!(f.store.snapshot().objective, "Ship");

        // The failed attempt still advanced the baseline.
        f.coordinator.observe_artifact(BIG_EDIT).await;
        assert_eq!(f.coordinator.phase().await, SyncPhase::Idle);
    }

    #[tokio::test]
    async fn test_disabled_sync_ignores_mutations() {
        let f = fixture(ScriptedCompletion::new(), SyncParams::default().with_enabled(false));
        f.coordinator.observe_artifact(BIG_EDIT).await;
        f.clock.advance(Duration::from_secs(10));
        assert!(f.coordinator.tick().await.is_none());
    }

    #[tokio::test]
    async fn test_background_loop_reconciles_store_changes() {
        let completion = Arc::new(ScriptedCompletion::new().reconcile(refined()));
        let gateway = Arc::new(CompletionGateway::new(
            completion.clone(),
            Duration::from_secs(5),
        ));
        let store = Arc::new(SharedStateStore::new(
            ContextState::default().with_artifact("notes.md", BASE),
        ));
        let reconcile = Arc::new(ReconcileUseCase::new(
            gateway,
            store.clone(),
            SharedTranscript::new(),
        ));
        let params = SyncParams::default().with_debounce(Duration::from_millis(20));
        let coordinator = Arc::new(SyncCoordinator::new(
            reconcile,
            store.clone(),
            Arc::new(crate::ports::clock::SystemClock),
            &params,
        ));

        let cancel = CancellationToken::new();
        let handle = coordinator.clone().spawn(cancel.clone());

        store.merge(&ContextPatch::new().artifact_content(BIG_EDIT));

        for _ in 0..200 {
            if completion.reconcile_count() == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(completion.reconcile_count(), 1);

        cancel.cancel();
        handle.await.unwrap();
    }
}
