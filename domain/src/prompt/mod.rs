//! Prompt domain
//!
//! Text handed to the completion provider for agent turns and reconciliation.

mod template;

pub use template::{MAX_ARTIFACT_PROMPT_BYTES, PromptTemplate};
