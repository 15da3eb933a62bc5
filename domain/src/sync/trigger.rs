//! Debounced reconciliation trigger.
//!
//! A pure state machine driven by explicit `now` instants so it can be
//! exercised without waiting on a real clock:
//!
//! ```text
//!            mutation (≠ baseline)           deadline reached, significant
//!   Idle ─────────────────────────▶ Pending ─────────────────────────────▶ Running
//!    ▲                               │  ▲ │                                  │
//!    │   deadline reached,           │  └─┘ mutation: restart debounce       │
//!    │   not significant             │                                     finish
//!    └───────────────────────────────┘◀──────────────────────────────────────┘
//! ```
//!
//! The baseline only advances when a reconciliation attempt finishes, so
//! small edits that were judged insignificant keep accumulating against the
//! old baseline.

use crate::change::{ChangeAssessment, ChangeDetector, DetectorConfig};
use std::time::{Duration, Instant};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerConfig {
    pub debounce: Duration,
    pub detector: DetectorConfig,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            detector: DetectorConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    DebouncePending { deadline: Instant },
    Running,
}

/// Identifies one reconciliation run handed out by [`SyncTrigger::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncTicket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncDecision {
    /// Change is significant; run reconciliation then call
    /// [`SyncTrigger::finish`] with the ticket.
    Reconcile {
        ticket: SyncTicket,
        snapshot: String,
        assessment: ChangeAssessment,
    },
    /// Change checked and found too small. Baseline unchanged.
    Skip { assessment: ChangeAssessment },
}

#[derive(Debug)]
pub struct SyncTrigger {
    config: TriggerConfig,
    detector: ChangeDetector,
    phase: SyncPhase,
    baseline: String,
    /// Latest artifact content seen since the last check.
    pending: Option<String>,
    /// A mutation arrived while a reconciliation was in flight.
    dirty_while_running: bool,
    running: Option<SyncTicket>,
    next_ticket: u64,
    checks: u64,
}

impl SyncTrigger {
    pub fn new(config: TriggerConfig, baseline: impl Into<String>) -> Self {
        Self {
            detector: ChangeDetector::new(config.detector),
            config,
            phase: SyncPhase::Idle,
            baseline: baseline.into(),
            pending: None,
            dirty_while_running: false,
            running: None,
            next_ticket: 1,
            checks: 0,
        }
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    pub fn baseline(&self) -> &str {
        &self.baseline
    }

    /// Number of significance checks performed so far.
    pub fn checks(&self) -> u64 {
        self.checks
    }

    pub fn deadline(&self) -> Option<Instant> {
        match self.phase {
            SyncPhase::DebouncePending { deadline } => Some(deadline),
            _ => None,
        }
    }

    /// Record a new artifact content.
    pub fn on_artifact_mutation(&mut self, content: &str, now: Instant) {
        if self.phase == SyncPhase::Running {
            self.pending = Some(content.to_string());
            self.dirty_while_running = true;
            return;
        }

        if content == self.baseline {
            // Reverted to what was last reconciled; nothing left to check.
            self.pending = None;
            self.phase = SyncPhase::Idle;
            return;
        }

        self.pending = Some(content.to_string());
        self.phase = SyncPhase::DebouncePending {
            deadline: now + self.config.debounce,
        };
    }

    /// Advance the machine. Returns a decision once the debounce deadline
    /// has passed.
    pub fn poll(&mut self, now: Instant) -> Option<SyncDecision> {
        let SyncPhase::DebouncePending { deadline } = self.phase else {
            return None;
        };
        if now < deadline {
            return None;
        }

        let Some(current) = self.pending.take() else {
            self.phase = SyncPhase::Idle;
            return None;
        };

        self.checks += 1;
        let assessment = self.detector.assess(&self.baseline, &current);
        if !assessment.significant {
            self.phase = SyncPhase::Idle;
            return Some(SyncDecision::Skip { assessment });
        }

        let ticket = SyncTicket(self.next_ticket);
        self.next_ticket += 1;
        self.running = Some(ticket);
        self.phase = SyncPhase::Running;
        Some(SyncDecision::Reconcile {
            ticket,
            snapshot: current,
            assessment,
        })
    }

    /// Mark a reconciliation attempt as done, successful or not.
    ///
    /// Stale tickets (superseded by [`reset_baseline`](Self::reset_baseline))
    /// are ignored.
    pub fn finish(&mut self, ticket: SyncTicket, snapshot: &str, now: Instant) {
        if self.running != Some(ticket) {
            return;
        }
        self.running = None;
        self.baseline = snapshot.to_string();
        self.phase = SyncPhase::Idle;

        if std::mem::take(&mut self.dirty_while_running)
            && let Some(latest) = self.pending.take()
        {
            self.on_artifact_mutation(&latest, now);
        }
    }

    /// Forget all pending work and start over from `baseline`.
    pub fn reset_baseline(&mut self, baseline: impl Into<String>) {
        self.baseline = baseline.into();
        self.pending = None;
        self.dirty_while_running = false;
        self.running = None;
        self.phase = SyncPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trigger(baseline: &str) -> SyncTrigger {
        SyncTrigger::new(TriggerConfig::default(), baseline)
    }

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    const BASE: &str = "a\nb\nc";
    const BIG_EDIT: &str = "a\nb\nc\n1\n2\n3\n4\n5";

    #[test]
    fn test_mutation_equal_to_baseline_is_ignored() {
        let t0 = Instant::now();
        let mut trigger = trigger(BASE);
        trigger.on_artifact_mutation(BASE, t0);
        assert_eq!(trigger.phase(), SyncPhase::Idle);
        assert!(trigger.poll(t0 + secs(10)).is_none());
        assert_eq!(trigger.checks(), 0);
    }

    #[test]
    fn test_nothing_fires_before_deadline() {
        let t0 = Instant::now();
        let mut trigger = trigger(BASE);
        trigger.on_artifact_mutation(BIG_EDIT, t0);
        assert!(trigger.poll(t0 + Duration::from_millis(2999)).is_none());
        assert!(matches!(trigger.phase(), SyncPhase::DebouncePending { .. }));
        assert!(trigger.poll(t0 + secs(3)).is_some());
    }

    #[test]
    fn test_burst_of_mutations_yields_one_check_against_old_baseline() {
        let t0 = Instant::now();
        let mut trigger = trigger(BASE);

        trigger.on_artifact_mutation("a\nb\nc\n1", t0);
        trigger.on_artifact_mutation("a\nb\nc\n1\n2", t0 + secs(1));
        trigger.on_artifact_mutation(BIG_EDIT, t0 + secs(2));

        // The first deadline has been pushed back by later mutations.
        assert!(trigger.poll(t0 + secs(3)).is_none());
        assert_eq!(trigger.deadline(), Some(t0 + secs(5)));

        let decision = trigger.poll(t0 + secs(5)).unwrap();
        assert_eq!(trigger.checks(), 1);
        match decision {
            SyncDecision::Reconcile {
                snapshot,
                assessment,
                ..
            } => {
                assert_eq!(snapshot, BIG_EDIT);
                // Measured against the pre-burst baseline: five appended lines.
                assert_eq!(assessment.edits, 5);
            }
            other => panic!("expected reconcile, got {:?}", other),
        }
        assert!(trigger.poll(t0 + secs(60)).is_none());
        assert_eq!(trigger.checks(), 1);
    }

    #[test]
    fn test_insignificant_change_keeps_baseline() {
        let t0 = Instant::now();
        let mut trigger = trigger(BASE);

        trigger.on_artifact_mutation("a\nb\nc\n1", t0);
        let decision = trigger.poll(t0 + secs(3)).unwrap();
        assert!(matches!(decision, SyncDecision::Skip { .. }));
        assert_eq!(trigger.phase(), SyncPhase::Idle);
        assert_eq!(trigger.baseline(), BASE);

        // Further small edits accumulate toward the next check.
        trigger.on_artifact_mutation(BIG_EDIT, t0 + secs(4));
        let decision = trigger.poll(t0 + secs(7)).unwrap();
        assert!(matches!(decision, SyncDecision::Reconcile { .. }));
        assert_eq!(trigger.checks(), 2);
    }

    #[test]
    fn test_finish_advances_baseline() {
        let t0 = Instant::now();
        let mut trigger = trigger(BASE);
        trigger.on_artifact_mutation(BIG_EDIT, t0);
        let Some(SyncDecision::Reconcile {
            ticket, snapshot, ..
        }) = trigger.poll(t0 + secs(3))
        else {
            panic!("expected reconcile");
        };
        assert_eq!(trigger.phase(), SyncPhase::Running);

        trigger.finish(ticket, &snapshot, t0 + secs(4));
        assert_eq!(trigger.phase(), SyncPhase::Idle);
        assert_eq!(trigger.baseline(), BIG_EDIT);
    }

    #[test]
    fn test_mutation_while_running_rearms_after_finish() {
        let t0 = Instant::now();
        let mut trigger = trigger(BASE);
        trigger.on_artifact_mutation(BIG_EDIT, t0);
        let Some(SyncDecision::Reconcile {
            ticket, snapshot, ..
        }) = trigger.poll(t0 + secs(3))
        else {
            panic!("expected reconcile");
        };

        trigger.on_artifact_mutation("rewritten", t0 + secs(4));
        assert_eq!(trigger.phase(), SyncPhase::Running);

        trigger.finish(ticket, &snapshot, t0 + secs(5));
        assert_eq!(trigger.deadline(), Some(t0 + secs(8)));
    }

    #[test]
    fn test_revert_cancels_pending_debounce() {
        let t0 = Instant::now();
        let mut trigger = trigger(BASE);
        trigger.on_artifact_mutation(BIG_EDIT, t0);
        trigger.on_artifact_mutation(BASE, t0 + secs(1));
        assert_eq!(trigger.phase(), SyncPhase::Idle);
        assert!(trigger.poll(t0 + secs(10)).is_none());
    }

    #[test]
    fn test_reset_invalidates_running_ticket() {
        let t0 = Instant::now();
        let mut trigger = trigger(BASE);
        trigger.on_artifact_mutation(BIG_EDIT, t0);
        let Some(SyncDecision::Reconcile { ticket, .. }) = trigger.poll(t0 + secs(3)) else {
            panic!("expected reconcile");
        };

        trigger.reset_baseline("");
        trigger.finish(ticket, BIG_EDIT, t0 + secs(4));
        assert_eq!(trigger.baseline(), "");
        assert_eq!(trigger.phase(), SyncPhase::Idle);
    }
}
