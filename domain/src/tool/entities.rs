//! Tool domain entities

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Name of the state-mutation tool.
pub const UPDATE_CONTEXT: &str = "update_context";
/// Name of the zero-argument state-read tool.
pub const INSPECT_ARTIFACT: &str = "inspect_artifact";

/// Whether a tool only reads shared state or may change it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolAccess {
    Read,
    Write,
}

impl ToolAccess {
    pub fn as_str(&self) -> &str {
        match self {
            ToolAccess::Read => "read",
            ToolAccess::Write => "write",
        }
    }

    pub fn mutates(&self) -> bool {
        matches!(self, ToolAccess::Write)
    }
}

impl std::fmt::Display for ToolAccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Definition of a tool advertised to the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "update_context")
    pub name: String,
    /// Human-readable description
    pub description: String,
    pub access: ToolAccess,
    /// Parameter specifications
    pub parameters: Vec<ToolParameter>,
}

/// Parameter specification for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    pub description: String,
    pub required: bool,
    /// Parameter type hint (e.g., "string", "number")
    pub param_type: String,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, access: ToolAccess) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            access,
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn mutates_state(&self) -> bool {
        self.access.mutates()
    }
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: "string".to_string(),
        }
    }

    pub fn with_type(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = param_type.into();
        self
    }
}

/// Specification of the tools agents may call
#[derive(Debug, Clone, Default)]
pub struct ToolSpec {
    tools: HashMap<String, ToolDefinition>,
    /// Alias → canonical name mapping (e.g. "update_state" → "update_context")
    aliases: HashMap<String, String>,
}

impl ToolSpec {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            aliases: HashMap::new(),
        }
    }

    pub fn register(mut self, tool: ToolDefinition) -> Self {
        self.tools.insert(tool.name.clone(), tool);
        self
    }

    /// Register multiple aliases at once (builder pattern)
    pub fn register_aliases(
        mut self,
        mappings: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Self {
        for (alias, canonical) in mappings {
            self.aliases.insert(alias.into(), canonical.into());
        }
        self
    }

    /// Resolve a name: returns canonical name if it's a registered tool,
    /// or resolves alias, or None if unknown
    pub fn resolve<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        if self.tools.contains_key(name) {
            Some(name)
        } else {
            self.aliases.get(name).map(|s| s.as_str())
        }
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    pub fn all(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(|s| s.as_str())
    }
}

/// The two workspace tools every agent is offered, plus the aliases models
/// tend to invent for them.
pub fn workspace_tool_spec() -> ToolSpec {
    ToolSpec::new()
        .register(
            ToolDefinition::new(
                UPDATE_CONTEXT,
                "Update the shared project state. Provide only the fields you want to \
                 change; omitted fields are left as they are. artifact_content replaces \
                 the whole artifact.",
                ToolAccess::Write,
            )
            .with_parameter(ToolParameter::new("objective", "New project objective", false))
            .with_parameter(ToolParameter::new(
                "scratchpad",
                "New shared scratchpad notes",
                false,
            ))
            .with_parameter(ToolParameter::new(
                "artifact_name",
                "Name of the active artifact",
                false,
            ))
            .with_parameter(ToolParameter::new(
                "artifact_content",
                "Full new content of the active artifact",
                false,
            )),
        )
        .register(ToolDefinition::new(
            INSPECT_ARTIFACT,
            "Report the active artifact's name, size in bytes and line count.",
            ToolAccess::Read,
        ))
        .register_aliases([
            ("update_state", UPDATE_CONTEXT),
            ("update_project_context", UPDATE_CONTEXT),
            ("updateContext", UPDATE_CONTEXT),
            ("read_artifact", INSPECT_ARTIFACT),
            ("read_context", INSPECT_ARTIFACT),
            ("inspectArtifact", INSPECT_ARTIFACT),
        ])
}

/// A call to a tool with arguments, as returned by an agent turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-assigned id, when the provider supplies one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub tool_name: String,
    #[serde(default)]
    pub arguments: HashMap<String, serde_json::Value>,
    /// Set when the provider returned arguments that could not be decoded
    /// into an object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub argument_error: Option<String>,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            id: None,
            tool_name: tool_name.into(),
            arguments: HashMap::new(),
            argument_error: None,
        }
    }

    /// A call whose raw arguments were unusable.
    pub fn malformed(tool_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            argument_error: Some(error.into()),
            ..Self::new(tool_name)
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    /// Get a string argument
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }
}
