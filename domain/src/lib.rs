//! Domain layer for synclab
//!
//! This crate contains the core types and algorithms. It has no dependencies
//! on infrastructure or presentation concerns, and performs no I/O.
//!
//! # Core Concepts
//!
//! ## Shared context
//!
//! A single [`ContextState`] (objective, scratchpad, one active artifact) is
//! what every agent reads and writes. Changes flow through [`ContextPatch`].
//!
//! ## Rounds and turns
//!
//! A round runs the [`AgentRoster`]'s execution queue one agent at a time,
//! highest [`Priority`] first. Each turn may return [`ToolCall`]s which the
//! [`WorkspaceToolExecutor`] turns into a patch.
//!
//! ## Change-triggered reconciliation
//!
//! The [`SyncTrigger`] debounces artifact edits and asks the
//! [`ChangeDetector`] whether the edit is significant enough to rewrite the
//! objective and scratchpad.

pub mod agent;
pub mod change;
pub mod context;
pub mod core;
pub mod failure;
pub mod prompt;
pub mod sync;
pub mod tool;
pub mod transcript;
pub mod util;

// Re-export commonly used types
pub use agent::{AgentDescriptor, AgentRole, AgentRoster, AgentStatus, Priority, TargetSelector};
pub use change::{ChangeAssessment, ChangeDetector, DetectionStrategy, DetectorConfig};
pub use context::{ArtifactStats, ContextField, ContextPatch, ContextState};
pub use core::error::DomainError;
pub use failure::{ErrorKind, ErrorRecord, ProviderFailure};
pub use prompt::PromptTemplate;
pub use sync::{SyncDecision, SyncPhase, SyncTicket, SyncTrigger, TriggerConfig};
pub use tool::{
    InvocationStatus, ToolCall, ToolDefinition, ToolError, ToolInvocation, ToolSpec,
    TurnEffects, WorkspaceTool, WorkspaceToolExecutor, workspace_tool_spec,
};
pub use transcript::{Author, EntryId, EntryKind, NewEntry, Transcript, TranscriptEntry};
