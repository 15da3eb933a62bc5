//! Application-level configuration.
//!
//! - [`OrchestrationParams`] - transcript windows and call timeout
//! - [`SyncParams`] - automatic reconciliation and save debouncing

pub mod orchestration_params;
pub mod sync_params;

pub use orchestration_params::OrchestrationParams;
pub use sync_params::SyncParams;
