//! Ports (interfaces) for external dependencies
//!
//! Traits implemented by the infrastructure and presentation layers.

pub mod agent_completion;
pub mod clock;
pub mod conversation_logger;
pub mod error_sink;
pub mod persistence;
pub mod progress;
