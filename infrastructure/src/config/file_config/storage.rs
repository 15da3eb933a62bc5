//! Storage configuration (`[storage]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const APP_DIR: &str = "synclab";

/// Raw storage configuration from TOML
///
/// # Example
///
/// ```toml
/// [storage]
/// state_path = "./.synclab/state.json"
/// error_log_path = "./.synclab/errors.jsonl"
/// error_log_capacity = 50
/// conversation_log_path = "./.synclab/conversation.jsonl"
/// save_debounce_ms = 500
/// ```
///
/// Unset state and error log paths fall back to the platform data
/// directory. The conversation log is only written when a path is given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    pub state_path: Option<PathBuf>,
    pub error_log_path: Option<PathBuf>,
    /// Error records kept for replay
    pub error_log_capacity: usize,
    pub conversation_log_path: Option<PathBuf>,
    pub save_debounce_ms: u64,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        Self {
            state_path: None,
            error_log_path: None,
            error_log_capacity: 50,
            conversation_log_path: None,
            save_debounce_ms: 500,
        }
    }
}

impl FileStorageConfig {
    pub fn resolved_state_path(&self) -> Option<PathBuf> {
        self.state_path
            .clone()
            .or_else(|| data_dir().map(|d| d.join("state.json")))
    }

    pub fn resolved_error_log_path(&self) -> Option<PathBuf> {
        self.error_log_path
            .clone()
            .or_else(|| data_dir().map(|d| d.join("errors.jsonl")))
    }
}

fn data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join(APP_DIR))
}
