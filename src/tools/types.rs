// Core types for tool execution system
//
// Declarations are sent to the model as Gemini function declarations

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Tool declaration (name, description, parameter schema)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: ToolInputSchema,
}

/// JSON Schema for tool input parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInputSchema {
    #[serde(rename = "type")]
    pub schema_type: String, // Always "object"
    pub properties: Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

impl ToolInputSchema {
    /// Create a simple schema with required string parameters
    pub fn simple(params: Vec<(&str, &str)>) -> Self {
        params
            .into_iter()
            .fold(Self::empty(), |schema, (name, desc)| {
                schema.with_string(name, desc, true)
            })
    }

    /// Schema with no parameters
    pub fn empty() -> Self {
        Self {
            schema_type: "object".to_string(),
            properties: Value::Object(serde_json::Map::new()),
            required: Vec::new(),
        }
    }

    /// Add a string parameter
    pub fn with_string(self, name: &str, description: &str, required: bool) -> Self {
        self.with_property(
            name,
            json!({ "type": "string", "description": description }),
            required,
        )
    }

    /// Add an array-of-strings parameter
    pub fn with_string_array(self, name: &str, description: &str, required: bool) -> Self {
        self.with_property(
            name,
            json!({
                "type": "array",
                "items": { "type": "string", "description": description },
                "description": description
            }),
            required,
        )
    }

    fn with_property(mut self, name: &str, schema: Value, required: bool) -> Self {
        if let Value::Object(properties) = &mut self.properties {
            properties.insert(name.to_string(), schema);
        }
        if required {
            self.required.push(name.to_string());
        }
        self
    }
}

/// Function call issued by the model: tool name plus named arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub args: Value,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, args: Value) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

/// Tool execution result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub name: String,
    pub content: String,
    pub is_error: bool,
}

impl ToolResult {
    pub fn success(name: String, content: String) -> Self {
        Self {
            name,
            content,
            is_error: false,
        }
    }

    pub fn error(name: String, error_message: String) -> Self {
        Self {
            name,
            content: error_message,
            is_error: true,
        }
    }

    /// Response payload handed back to the model: `{"result": ..}` or `{"error": ..}`
    pub fn response_payload(&self) -> Value {
        if self.is_error {
            json!({ "error": self.content })
        } else {
            json!({ "result": self.content })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_result_success() {
        let result = ToolResult::success("write_file".to_string(), "Success".to_string());
        assert_eq!(result.name, "write_file");
        assert_eq!(result.content, "Success");
        assert!(!result.is_error);
        assert_eq!(result.response_payload(), json!({"result": "Success"}));
    }

    #[test]
    fn test_tool_result_error() {
        let result = ToolResult::error("nope".to_string(), "Unknown function: nope".to_string());
        assert!(result.is_error);
        assert_eq!(
            result.response_payload(),
            json!({"error": "Unknown function: nope"})
        );
    }

    #[test]
    fn test_simple_input_schema() {
        let schema = ToolInputSchema::simple(vec![
            ("file_path", "Path to the file to write"),
            ("content", "Content to write to the file"),
        ]);

        assert_eq!(schema.schema_type, "object");
        assert_eq!(schema.required, vec!["file_path", "content"]);
        assert_eq!(schema.properties["content"]["type"], "string");
    }

    #[test]
    fn test_optional_and_array_parameters() {
        let schema = ToolInputSchema::empty()
            .with_string("file_path", "Script path", true)
            .with_string_array("args", "Script arguments", false);

        assert_eq!(schema.required, vec!["file_path"]);
        assert_eq!(schema.properties["args"]["type"], "array");
        assert_eq!(schema.properties["args"]["items"]["type"], "string");

        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(json["type"], "object");
    }

    #[test]
    fn test_empty_required_is_omitted() {
        let schema = ToolInputSchema::empty().with_string("directory", "Dir", false);
        let json = serde_json::to_value(&schema).unwrap();
        assert!(json.get("required").is_none());
    }
}
