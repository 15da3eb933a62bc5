//! Tool domain module
//!
//! Defines how an agent's output becomes a state mutation.
//!
//! ```text
//! ┌──────────────┐    ┌───────────────┐    ┌────────────────────┐
//! │ ToolCall     │───▶│ WorkspaceTool │───▶│ ToolInvocation     │
//! │ (untyped)    │    │ (closed union)│    │ + ContextPatch     │
//! └──────────────┘    └───────────────┘    └────────────────────┘
//! ```
//!
//! Only two capabilities exist: [`UPDATE_CONTEXT`] merges any subset of the
//! context fields, [`INSPECT_ARTIFACT`] reports artifact size. Unknown names
//! are resolved through the alias table in [`ToolSpec`] and otherwise become
//! a failed invocation, never a crash.

pub mod entities;
pub mod executor;
pub mod invocation;
pub mod value_objects;

pub use entities::{
    INSPECT_ARTIFACT, ToolAccess, ToolCall, ToolDefinition, ToolParameter, ToolSpec,
    UPDATE_CONTEXT, workspace_tool_spec,
};
pub use executor::{ToolApplication, TurnEffects, WorkspaceTool, WorkspaceToolExecutor};
pub use invocation::{InvocationStatus, ToolInvocation};
pub use value_objects::ToolError;
