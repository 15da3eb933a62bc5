//! Raw TOML configuration data types
//!
//! These structs mirror the config file exactly. Conversion into
//! application parameters and the agent roster happens here as well, so
//! the binary never touches raw strings.

mod agents;
mod orchestration;
mod provider;
mod storage;
mod sync;

pub use agents::FileAgentEntry;
pub use orchestration::FileOrchestrationConfig;
pub use provider::FileProviderConfig;
pub use storage::FileStorageConfig;
pub use sync::FileSyncConfig;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;
use synclab_application::SyncParams;
use synclab_domain::AgentRoster;
use thiserror::Error;

/// Configuration errors that prevent startup
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("{0} cannot be 0")]
    ZeroValue(&'static str),

    #[error("provider.model cannot be empty")]
    EmptyModelName,

    #[error("invalid agent role '{role}': {reason}")]
    InvalidRole { role: String, reason: String },

    #[error("duplicate agent role: {0}")]
    DuplicateRole(String),

    #[error("agent {0} has an empty persona")]
    EmptyPersona(String),

    #[error("invalid agent roster: {0}")]
    Roster(String),
}

/// A problem that does not prevent startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    /// Dotted path of the offending field
    pub field: String,
    pub message: String,
}

impl ConfigWarning {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub provider: FileProviderConfig,
    pub orchestration: FileOrchestrationConfig,
    pub sync: FileSyncConfig,
    pub storage: FileStorageConfig,
    /// Empty means the default Architect/Engineer/Critic roster
    pub agents: Vec<FileAgentEntry>,
}

impl FileConfig {
    /// Validate the entire configuration.
    ///
    /// Hard errors stop at the first one found; warnings are collected.
    pub fn validate(&self) -> Result<Vec<ConfigWarning>, ConfigValidationError> {
        let zero_checks = [
            (self.orchestration.turn_window == 0, "orchestration.turn_window"),
            (
                self.orchestration.reconcile_window == 0,
                "orchestration.reconcile_window",
            ),
            (
                self.orchestration.call_timeout_seconds == 0,
                "orchestration.call_timeout_seconds",
            ),
            (self.provider.timeout_seconds == 0, "provider.timeout_seconds"),
            (self.sync.line_ceiling == 0, "sync.line_ceiling"),
            (self.sync.edit_threshold == 0, "sync.edit_threshold"),
            (
                self.storage.error_log_capacity == 0,
                "storage.error_log_capacity",
            ),
        ];
        if let Some((_, field)) = zero_checks.iter().find(|(zero, _)| *zero) {
            return Err(ConfigValidationError::ZeroValue(*field));
        }

        if self.provider.model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName);
        }

        let (_, warnings) = self.build_roster()?;
        Ok(warnings)
    }

    /// Build the agent roster from `[[agents]]`.
    pub fn build_roster(&self) -> Result<(AgentRoster, Vec<ConfigWarning>), ConfigValidationError> {
        if self.agents.is_empty() {
            return Ok((AgentRoster::default_roster(), vec![]));
        }

        let mut seen = HashSet::new();
        let mut descriptors = Vec::with_capacity(self.agents.len());
        let mut warnings = Vec::new();
        for entry in &self.agents {
            let (descriptor, entry_warnings) = entry.to_descriptor()?;
            if !seen.insert(descriptor.role.clone()) {
                return Err(ConfigValidationError::DuplicateRole(
                    descriptor.role.to_string(),
                ));
            }
            warnings.extend(entry_warnings);
            descriptors.push(descriptor);
        }

        let roster = AgentRoster::new(descriptors)
            .map_err(|e| ConfigValidationError::Roster(e.to_string()))?;
        Ok((roster, warnings))
    }

    pub fn sync_params(&self) -> SyncParams {
        SyncParams::default()
            .with_enabled(self.sync.enabled)
            .with_debounce(Duration::from_millis(self.sync.debounce_ms))
            .with_detector(self.sync.detector())
            .with_save_debounce(Duration::from_millis(self.storage.save_debounce_ms))
    }
}
