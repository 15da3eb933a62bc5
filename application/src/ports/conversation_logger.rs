//! Port for structured conversation logging.
//!
//! Separate from `tracing` diagnostics: this records what was said and done
//! in a machine-readable form (one JSON object per event).

use serde_json::{Value, json};
use synclab_domain::{AgentRole, ErrorKind, ToolInvocation, TranscriptEntry};

/// A structured conversation event.
///
/// Each event has a type string and a JSON payload; writers add the
/// timestamp.
#[derive(Debug, Clone)]
pub struct ConversationEvent {
    /// Event type identifier (`turn_completed`, `turn_failed`, ...).
    pub event_type: &'static str,
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    pub fn turn_completed(entry: &TranscriptEntry) -> Self {
        Self::new(
            "turn_completed",
            json!({
                "entry_id": entry.id.value(),
                "author": entry.author.to_string(),
                "content": entry.content,
                "tool_calls": entry.tool_invocations.len(),
            }),
        )
    }

    pub fn turn_failed(role: &AgentRole, kind: ErrorKind, message: &str) -> Self {
        Self::new(
            "turn_failed",
            json!({
                "role": role.as_str(),
                "kind": kind.as_str(),
                "message": message,
            }),
        )
    }

    pub fn tool_invocation(role: &AgentRole, invocation: &ToolInvocation) -> Self {
        Self::new(
            "tool_invocation",
            json!({
                "role": role.as_str(),
                "tool": invocation.tool_name,
                "arguments": invocation.arguments,
                "status": invocation.status.as_str(),
                "outcome": invocation.outcome,
            }),
        )
    }

    pub fn reconciliation(trigger: &str, changed: &[&str], rationale: &str) -> Self {
        Self::new(
            "reconciliation",
            json!({
                "trigger": trigger,
                "changed": changed,
                "rationale": rationale,
            }),
        )
    }
}

/// Port for logging conversation events.
///
/// `log` is synchronous and infallible; implementations swallow their own
/// write errors.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
