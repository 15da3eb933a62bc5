//! Completion provider adapters implementing the `AgentCompletion` port.

pub mod openai;

#[cfg(feature = "openai")]
pub use openai::OpenAiCompatibleCompletion;
