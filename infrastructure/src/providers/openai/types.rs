//! Chat-completions wire types and conversions.
//!
//! Kept free of HTTP so request building and response parsing can be tested
//! without the network.

use crate::tools::JsonSchemaToolConverter;
use serde::{Deserialize, Deserializer, Serialize};
use synclab_application::ports::agent_completion::{
    ReconcileRequest, ReconcileResponse, TurnRequest, TurnResponse,
};
use synclab_domain::util::one_line_preview;
use synclab_domain::{PromptTemplate, ProviderFailure, ToolCall};
use tracing::warn;

const ERROR_BODY_PREVIEW_CHARS: usize = 300;

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tool_calls: Vec<WireToolCall>,
}

impl ChatMessage {
    fn new(role: &str, content: String) -> Self {
        Self {
            role: role.to_string(),
            content: Some(content),
            tool_calls: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireToolCall {
    #[serde(default)]
    pub id: Option<String>,
    pub function: WireFunction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireFunction {
    pub name: String,
    /// JSON-encoded argument object, as a string
    #[serde(default, deserialize_with = "null_as_default")]
    pub arguments: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

/// Some compatible servers send `null` where the field is simply absent.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Request for one agent turn: persona and state in the system message, the
/// transcript window in the user message, workspace tools as functions.
pub fn turn_request(model: &str, temperature: Option<f32>, request: &TurnRequest) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage::new(
                "system",
                PromptTemplate::agent_system(&request.agent, &request.state, &request.tools),
            ),
            ChatMessage::new(
                "user",
                PromptTemplate::turn_prompt(&request.agent, &request.transcript),
            ),
        ],
        temperature,
        tools: JsonSchemaToolConverter.all_tools_schema(&request.tools),
        response_format: None,
    }
}

pub fn reconcile_request(
    model: &str,
    temperature: Option<f32>,
    request: &ReconcileRequest,
) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage::new("system", PromptTemplate::reconcile_system().to_string()),
            ChatMessage::new(
                "user",
                PromptTemplate::reconcile_prompt(&request.transcript, &request.state),
            ),
        ],
        temperature,
        tools: Vec::new(),
        response_format: Some(serde_json::json!({ "type": "json_object" })),
    }
}

fn first_message(response: ChatResponse) -> Result<ChatMessage, ProviderFailure> {
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or(ProviderFailure::EmptyResponse)
}

pub fn parse_turn_response(response: ChatResponse) -> Result<TurnResponse, ProviderFailure> {
    let message = first_message(response)?;
    Ok(TurnResponse {
        text: message.content.unwrap_or_default(),
        tool_calls: message.tool_calls.into_iter().map(convert_tool_call).collect(),
    })
}

/// Decode the argument string. Anything but a JSON object is kept as a
/// flagged call so the executor can report it back to the agent.
pub fn convert_tool_call(wire: WireToolCall) -> ToolCall {
    let WireToolCall { id, function } = wire;
    let mut call = if function.arguments.trim().is_empty() {
        ToolCall::new(&function.name)
    } else {
        match serde_json::from_str::<serde_json::Value>(&function.arguments) {
            Ok(serde_json::Value::Object(map)) => {
                let mut call = ToolCall::new(&function.name);
                call.arguments = map.into_iter().collect();
                call
            }
            Ok(other) => {
                warn!(tool = %function.name, "Tool arguments are not an object");
                ToolCall::malformed(
                    &function.name,
                    format!("arguments must be a JSON object, got {}", other),
                )
            }
            Err(e) => {
                warn!(tool = %function.name, "Tool arguments are not valid JSON: {}", e);
                ToolCall::malformed(&function.name, format!("arguments are not valid JSON: {}", e))
            }
        }
    };
    if let Some(id) = id {
        call = call.with_id(id);
    }
    call
}

pub fn parse_reconcile_response(
    response: ChatResponse,
) -> Result<ReconcileResponse, ProviderFailure> {
    let content = first_message(response)?.content.unwrap_or_default();
    if content.trim().is_empty() {
        return Err(ProviderFailure::EmptyResponse);
    }
    serde_json::from_str(json_object_slice(&content))
        .map_err(|e| ProviderFailure::malformed(format!("reconciliation result: {}", e)))
}

/// The outermost `{...}` of `content`, tolerating code fences around it.
fn json_object_slice(content: &str) -> &str {
    match (content.find('{'), content.rfind('}')) {
        (Some(start), Some(end)) if start < end => &content[start..=end],
        _ => content,
    }
}

/// Failure for a non-2xx response, preferring the provider's own message.
pub fn status_failure(code: u16, body: &str) -> ProviderFailure {
    let message = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) => one_line_preview(body, ERROR_BODY_PREVIEW_CHARS),
    };
    ProviderFailure::status(code, message)
}
