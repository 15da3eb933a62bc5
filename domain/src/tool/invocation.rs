//! Tool invocation lifecycle.
//!
//! ```text
//! Pending ──> Success
//!        └──> Failure
//! ```
//!
//! An invocation is created `Pending` from a [`ToolCall`] and finalized by the
//! executor before the owning transcript entry is appended.

use super::entities::ToolCall;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvocationStatus {
    Pending,
    Success,
    Failure,
}

impl InvocationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvocationStatus::Pending => "pending",
            InvocationStatus::Success => "success",
            InvocationStatus::Failure => "failure",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, InvocationStatus::Pending)
    }
}

/// Record of one tool call and what came of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
    pub tool_name: String,
    #[serde(default)]
    pub arguments: HashMap<String, serde_json::Value>,
    pub status: InvocationStatus,
    /// Human-readable description of the result or failure.
    #[serde(default)]
    pub outcome: String,
}

impl ToolInvocation {
    pub fn pending(call: &ToolCall) -> Self {
        Self {
            call_id: call.id.clone(),
            tool_name: call.tool_name.clone(),
            arguments: call.arguments.clone(),
            status: InvocationStatus::Pending,
            outcome: String::new(),
        }
    }

    /// Transition Pending → Success. No-op once terminal.
    pub fn succeed(&mut self, outcome: impl Into<String>) {
        if self.status == InvocationStatus::Pending {
            self.status = InvocationStatus::Success;
            self.outcome = outcome.into();
        }
    }

    /// Transition Pending → Failure. No-op once terminal.
    pub fn fail(&mut self, outcome: impl Into<String>) {
        if self.status == InvocationStatus::Pending {
            self.status = InvocationStatus::Failure;
            self.outcome = outcome.into();
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == InvocationStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_to_success() {
        let mut invocation = ToolInvocation::pending(&ToolCall::new("inspect_artifact"));
        assert_eq!(invocation.status, InvocationStatus::Pending);
        assert!(!invocation.status.is_terminal());

        invocation.succeed("ok");
        assert!(invocation.is_success());
        assert_eq!(invocation.outcome, "ok");
    }

    #[test]
    fn test_terminal_state_is_final() {
        let mut invocation = ToolInvocation::pending(&ToolCall::new("x"));
        invocation.fail("unknown");
        invocation.succeed("late");
        assert_eq!(invocation.status, InvocationStatus::Failure);
        assert_eq!(invocation.outcome, "unknown");
    }

    #[test]
    fn test_pending_copies_call_fields() {
        let call = ToolCall::new("update_context")
            .with_id("c1")
            .with_arg("objective", "x");
        let invocation = ToolInvocation::pending(&call);
        assert_eq!(invocation.call_id.as_deref(), Some("c1"));
        assert_eq!(invocation.arguments.len(), 1);
    }
}
