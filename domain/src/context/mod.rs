//! Shared context domain
//!
//! The objective, scratchpad and single active artifact that all agents
//! collaborate on, plus the partial-update type used to merge into it.

pub mod entities;
pub mod value_objects;

pub use entities::ContextState;
pub use value_objects::{ArtifactStats, ContextField, ContextPatch};
