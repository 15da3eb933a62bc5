//! Agent completion port
//!
//! Defines the interface to the language-model provider: one call per agent
//! turn and one per reconciliation pass. Adapters live in the infrastructure
//! layer and report raw [`ProviderFailure`]s; classification happens in the
//! [`CompletionGateway`](crate::gateway::CompletionGateway).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use synclab_domain::{
    AgentDescriptor, ContextState, ProviderFailure, ToolCall, ToolSpec, TranscriptEntry,
};

/// Everything an agent sees for one turn.
#[derive(Debug, Clone)]
pub struct TurnRequest {
    pub agent: AgentDescriptor,
    /// Most recent transcript entries, oldest first.
    pub transcript: Vec<TranscriptEntry>,
    pub state: ContextState,
    pub tools: ToolSpec,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnResponse {
    pub text: String,
    pub tool_calls: Vec<ToolCall>,
}

impl TurnResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tool_calls: Vec::new(),
        }
    }

    pub fn with_tool_call(mut self, call: ToolCall) -> Self {
        self.tool_calls.push(call);
        self
    }

    /// Neither text nor tool calls.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.tool_calls.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ReconcileRequest {
    pub transcript: Vec<TranscriptEntry>,
    pub state: ContextState,
}

/// Structured result of a reconciliation call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileResponse {
    pub objective: String,
    pub scratchpad: String,
    /// Shown to the operator, never merged into state.
    pub rationale: String,
}

impl ReconcileResponse {
    pub fn new(
        objective: impl Into<String>,
        scratchpad: impl Into<String>,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            objective: objective.into(),
            scratchpad: scratchpad.into(),
            rationale: rationale.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.objective.trim().is_empty()
            && self.scratchpad.trim().is_empty()
            && self.rationale.trim().is_empty()
    }
}

/// Gateway to the completion provider.
#[async_trait]
pub trait AgentCompletion: Send + Sync {
    /// Run one agent turn.
    async fn run(&self, request: &TurnRequest) -> Result<TurnResponse, ProviderFailure>;

    /// Run one reconciliation pass.
    async fn reconcile(
        &self,
        request: &ReconcileRequest,
    ) -> Result<ReconcileResponse, ProviderFailure>;

    /// Whether a credential is configured. Checked before every call.
    fn has_credential(&self) -> bool {
        true
    }
}
