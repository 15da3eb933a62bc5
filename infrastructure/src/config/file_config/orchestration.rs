//! Orchestration configuration (`[orchestration]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;
use synclab_application::OrchestrationParams;

/// Raw orchestration configuration from TOML
///
/// # Example
///
/// ```toml
/// [orchestration]
/// turn_window = 12
/// reconcile_window = 40
/// call_timeout_seconds = 60
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOrchestrationConfig {
    /// Transcript entries an agent sees on its turn
    pub turn_window: usize,
    /// Transcript entries a reconciliation pass sees
    pub reconcile_window: usize,
    /// Upper bound on a single completion call
    pub call_timeout_seconds: u64,
}

impl Default for FileOrchestrationConfig {
    fn default() -> Self {
        let params = OrchestrationParams::default();
        Self {
            turn_window: params.turn_window,
            reconcile_window: params.reconcile_window,
            call_timeout_seconds: params.call_timeout.as_secs(),
        }
    }
}

impl FileOrchestrationConfig {
    pub fn to_params(&self) -> OrchestrationParams {
        OrchestrationParams::default()
            .with_turn_window(self.turn_window)
            .with_reconcile_window(self.reconcile_window)
            .with_call_timeout(Duration::from_secs(self.call_timeout_seconds))
    }
}
