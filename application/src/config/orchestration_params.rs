//! Orchestration parameters: transcript windows and call timeouts.
//!
//! [`OrchestrationParams`] groups the static knobs used by
//! [`RunRoundUseCase`](crate::use_cases::run_round::RunRoundUseCase) and
//! [`ReconcileUseCase`](crate::use_cases::reconcile::ReconcileUseCase).

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Transcript entries sent with each agent turn.
pub const DEFAULT_TURN_WINDOW: usize = 12;
/// Transcript entries sent with each reconciliation pass.
pub const DEFAULT_RECONCILE_WINDOW: usize = 40;
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestrationParams {
    /// Most recent transcript entries sent with an agent turn.
    pub turn_window: usize,
    /// Most recent transcript entries sent with a reconciliation pass.
    pub reconcile_window: usize,
    /// Upper bound on a single completion call.
    pub call_timeout: Duration,
}

impl Default for OrchestrationParams {
    fn default() -> Self {
        Self {
            turn_window: DEFAULT_TURN_WINDOW,
            reconcile_window: DEFAULT_RECONCILE_WINDOW,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }
}

impl OrchestrationParams {
    // ==================== Builder Methods ====================

    pub fn with_turn_window(mut self, window: usize) -> Self {
        self.turn_window = window;
        self
    }

    pub fn with_reconcile_window(mut self, window: usize) -> Self {
        self.reconcile_window = window;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = OrchestrationParams::default();
        assert_eq!(params.turn_window, 12);
        assert_eq!(params.reconcile_window, 40);
        assert!(params.reconcile_window > params.turn_window);
        assert_eq!(params.call_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_builder() {
        let params = OrchestrationParams::default()
            .with_turn_window(4)
            .with_call_timeout(Duration::from_millis(50));
        assert_eq!(params.turn_window, 4);
        assert_eq!(params.reconcile_window, 40);
        assert_eq!(params.call_timeout, Duration::from_millis(50));
    }
}
