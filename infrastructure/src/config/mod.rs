//! Configuration file loading for synclab
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `SYNCLAB_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./synclab.toml` or `./.synclab.toml`
//! 4. Global: `$XDG_CONFIG_HOME/synclab/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, ConfigWarning, FileAgentEntry, FileConfig, FileOrchestrationConfig,
    FileProviderConfig, FileStorageConfig, FileSyncConfig,
};
pub use loader::ConfigLoader;
