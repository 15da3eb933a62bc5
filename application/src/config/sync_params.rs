//! Synchronization and persistence timing.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use synclab_domain::change::DetectorConfig;
use synclab_domain::sync::{DEFAULT_DEBOUNCE, TriggerConfig};

pub const DEFAULT_SAVE_DEBOUNCE: Duration = Duration::from_millis(500);

/// Automatic reconciliation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncParams {
    /// When false, artifact edits never trigger reconciliation on their own.
    pub enabled: bool,
    pub debounce: Duration,
    pub detector: DetectorConfig,
    /// Quiet period before the state is written to persistence.
    pub save_debounce: Duration,
}

impl Default for SyncParams {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce: DEFAULT_DEBOUNCE,
            detector: DetectorConfig::default(),
            save_debounce: DEFAULT_SAVE_DEBOUNCE,
        }
    }
}

impl SyncParams {
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_detector(mut self, detector: DetectorConfig) -> Self {
        self.detector = detector;
        self
    }

    pub fn with_save_debounce(mut self, debounce: Duration) -> Self {
        self.save_debounce = debounce;
        self
    }

    pub fn trigger_config(&self) -> TriggerConfig {
        TriggerConfig {
            debounce: self.debounce,
            detector: self.detector,
        }
    }
}
