//! OpenAI-compatible completion provider.

#[cfg(feature = "openai")]
mod adapter;
pub mod types;

#[cfg(feature = "openai")]
pub use adapter::OpenAiCompatibleCompletion;
