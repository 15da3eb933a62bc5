//! Workspace tool executor.
//!
//! Turns untyped [`ToolCall`]s into the closed [`WorkspaceTool`] union and
//! applies them to a [`ContextState`] snapshot. Nothing here touches the
//! shared store: the executor returns the invocation record plus the patch
//! the caller should merge.

use super::entities::{INSPECT_ARTIFACT, ToolCall, ToolSpec, UPDATE_CONTEXT, workspace_tool_spec};
use super::invocation::ToolInvocation;
use super::value_objects::ToolError;
use crate::context::{ContextField, ContextPatch, ContextState};

/// The fixed set of capabilities an agent turn may invoke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceTool {
    /// Merge any subset of the four context fields.
    UpdateContext {
        patch: ContextPatch,
        /// Argument keys that are not context fields.
        ignored: Vec<String>,
    },
    /// Report artifact name, byte length and line count.
    InspectArtifact,
}

/// Result of applying one call.
#[derive(Debug, Clone)]
pub struct ToolApplication {
    pub invocation: ToolInvocation,
    /// Empty for read-only and failed calls.
    pub patch: ContextPatch,
}

/// Result of applying every call of one turn, in order.
#[derive(Debug, Clone, Default)]
pub struct TurnEffects {
    pub invocations: Vec<ToolInvocation>,
    /// All successful mutations folded into one patch, later calls winning.
    pub patch: ContextPatch,
}

impl TurnEffects {
    pub fn failures(&self) -> usize {
        self.invocations.iter().filter(|i| !i.is_success()).count()
    }
}

#[derive(Debug, Clone)]
pub struct WorkspaceToolExecutor {
    spec: ToolSpec,
}

impl Default for WorkspaceToolExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkspaceToolExecutor {
    pub fn new() -> Self {
        Self {
            spec: workspace_tool_spec(),
        }
    }

    pub fn tool_spec(&self) -> &ToolSpec {
        &self.spec
    }

    /// Validate a raw call into a [`WorkspaceTool`].
    pub fn parse(&self, call: &ToolCall) -> Result<WorkspaceTool, ToolError> {
        if let Some(error) = &call.argument_error {
            return Err(ToolError::invalid_argument(format!(
                "Could not decode arguments for {}",
                call.tool_name
            ))
            .with_details(error.clone()));
        }

        match self.spec.resolve(&call.tool_name) {
            Some(UPDATE_CONTEXT) => {
                let mut patch = ContextPatch::new();
                let mut ignored = Vec::new();
                let mut keys: Vec<&String> = call.arguments.keys().collect();
                keys.sort();
                for key in keys {
                    let Ok(field) = key.parse::<ContextField>() else {
                        ignored.push(key.clone());
                        continue;
                    };
                    match &call.arguments[key] {
                        serde_json::Value::Null => {}
                        serde_json::Value::String(value) => patch.set(field, value.clone()),
                        other => {
                            return Err(ToolError::invalid_argument(format!(
                                "{} must be a string, got {}",
                                field,
                                json_type_name(other)
                            )));
                        }
                    }
                }
                Ok(WorkspaceTool::UpdateContext { patch, ignored })
            }
            Some(INSPECT_ARTIFACT) => Ok(WorkspaceTool::InspectArtifact),
            _ => {
                let mut available: Vec<&str> = self.spec.names().collect();
                available.sort();
                Err(ToolError::unknown_tool(&call.tool_name)
                    .with_details(format!("available: {}", available.join(", "))))
            }
        }
    }

    /// Apply one call against `state`, producing a finalized invocation.
    ///
    /// Unknown tools and bad arguments become failure outcomes; this never
    /// panics or returns an error.
    pub fn apply(&self, call: &ToolCall, state: &ContextState) -> ToolApplication {
        let mut invocation = ToolInvocation::pending(call);
        let mut patch = ContextPatch::new();

        match self.parse(call) {
            Ok(WorkspaceTool::UpdateContext {
                patch: update,
                ignored,
            }) => {
                let mut outcome = if update.is_empty() {
                    "No fields provided; nothing changed".to_string()
                } else {
                    let names: Vec<&str> = update.fields().iter().map(|f| f.as_str()).collect();
                    format!("Updated {}", names.join(", "))
                };
                if !ignored.is_empty() {
                    outcome.push_str(&format!(" (ignored: {})", ignored.join(", ")));
                }
                invocation.succeed(outcome);
                patch = update;
            }
            Ok(WorkspaceTool::InspectArtifact) => {
                invocation.succeed(state.artifact_stats().to_string());
            }
            Err(error) => invocation.fail(error.to_string()),
        }

        ToolApplication { invocation, patch }
    }

    /// Apply a turn's calls in order.
    ///
    /// Each call sees the effects of the calls before it, so an inspect after
    /// an update reports the updated artifact.
    pub fn apply_all(&self, calls: &[ToolCall], state: &ContextState) -> TurnEffects {
        let mut working = state.clone();
        let mut effects = TurnEffects::default();

        for call in calls {
            let application = self.apply(call, &working);
            working.apply(&application.patch);
            effects.patch = std::mem::take(&mut effects.patch).merge(application.patch);
            effects.invocations.push(application.invocation);
        }

        effects
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
