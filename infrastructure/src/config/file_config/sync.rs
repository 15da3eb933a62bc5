//! Synchronization configuration (`[sync]` section)

use serde::{Deserialize, Serialize};
use synclab_domain::DetectorConfig;

/// Raw synchronization configuration from TOML
///
/// # Example
///
/// ```toml
/// [sync]
/// enabled = true
/// debounce_ms = 3000
/// line_ceiling = 600      # above this, the cheap heuristic replaces the line diff
/// edit_threshold = 5      # line edits that count as significant
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSyncConfig {
    pub enabled: bool,
    pub debounce_ms: u64,
    pub line_ceiling: usize,
    pub edit_threshold: usize,
}

impl Default for FileSyncConfig {
    fn default() -> Self {
        let detector = DetectorConfig::default();
        Self {
            enabled: true,
            debounce_ms: 3000,
            line_ceiling: detector.line_ceiling,
            edit_threshold: detector.edit_threshold,
        }
    }
}

impl FileSyncConfig {
    pub fn detector(&self) -> DetectorConfig {
        DetectorConfig {
            line_ceiling: self.line_ceiling,
            edit_threshold: self.edit_threshold,
        }
    }
}
