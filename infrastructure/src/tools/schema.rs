//! JSON Schema tool converter.
//!
//! Renders the workspace [`ToolSpec`] as function tools in the
//! OpenAI-compatible chat-completions format.

use synclab_domain::{ToolDefinition, ToolSpec};

/// Converts tool definitions into `{"type": "function", ...}` entries.
///
/// Handles param_type → JSON Schema type mapping:
/// - `"string"` → `"string"`
/// - `"number"` → `"number"`
/// - `"integer"` → `"integer"`
/// - `"boolean"` → `"boolean"`
/// - anything else → `"string"`
///
/// Aliases are accepted on the way back in but never advertised.
pub struct JsonSchemaToolConverter;

impl JsonSchemaToolConverter {
    pub fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in &tool.parameters {
            let schema_type = match param.param_type.as_str() {
                "number" => "number",
                "integer" => "integer",
                "boolean" => "boolean",
                _ => "string",
            };

            properties.insert(
                param.name.clone(),
                serde_json::json!({
                    "type": schema_type,
                    "description": param.description,
                }),
            );

            if param.required {
                required.push(serde_json::json!(param.name));
            }
        }

        serde_json::json!({
            "type": "function",
            "function": {
                "name": tool.name,
                "description": tool.description,
                "parameters": {
                    "type": "object",
                    "properties": properties,
                    "required": required,
                    "additionalProperties": false,
                }
            }
        })
    }

    /// All tools, sorted by name so requests are stable.
    pub fn all_tools_schema(&self, spec: &ToolSpec) -> Vec<serde_json::Value> {
        let mut tools: Vec<&ToolDefinition> = spec.all().collect();
        tools.sort_by_key(|t| &t.name);
        tools.into_iter().map(|t| self.tool_to_schema(t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use synclab_domain::tool::{ToolAccess, ToolParameter};
    use synclab_domain::workspace_tool_spec;

    #[test]
    fn test_tool_to_schema() {
        let converter = JsonSchemaToolConverter;
        let tool = ToolDefinition::new("set_limit", "Set a limit", ToolAccess::Write)
            .with_parameter(ToolParameter::new("label", "Label", true))
            .with_parameter(ToolParameter::new("max", "Maximum", false).with_type("integer"));

        let schema = converter.tool_to_schema(&tool);

        assert_eq!(schema["type"], "function");
        let function = &schema["function"];
        assert_eq!(function["name"], "set_limit");
        assert_eq!(function["description"], "Set a limit");
        assert_eq!(function["parameters"]["type"], "object");
        assert_eq!(function["parameters"]["properties"]["label"]["type"], "string");
        assert_eq!(function["parameters"]["properties"]["max"]["type"], "integer");

        let required = function["parameters"]["required"].as_array().unwrap();
        assert_eq!(required.len(), 1);
        assert_eq!(required[0], "label");
    }

    #[test]
    fn test_workspace_tools_schema() {
        let converter = JsonSchemaToolConverter;
        let tools = converter.all_tools_schema(&workspace_tool_spec());

        let names: Vec<&str> = tools
            .iter()
            .map(|t| t["function"]["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["inspect_artifact", "update_context"]);

        let update = &tools[1]["function"]["parameters"];
        for field in ["objective", "scratchpad", "artifact_name", "artifact_content"] {
            assert_eq!(update["properties"][field]["type"], "string", "{}", field);
        }
        assert!(update["required"].as_array().unwrap().is_empty());
        assert!(tools[0]["function"]["parameters"]["properties"]
            .as_object()
            .unwrap()
            .is_empty());
    }
}
