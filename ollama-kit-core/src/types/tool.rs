//! Tool/function calling types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A tool call parsed out of model output
///
/// Models prompted in raw mode answer with a JSON array of these, e.g.
/// `[{"name":"add","arguments":{"a":1,"b":2}}]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallSpec {
    /// Name of the tool to call
    pub name: String,
    /// Arguments keyed by parameter name
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl ToolCallSpec {
    /// Create a new tool call spec
    pub fn new(name: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// Definition of a tool the model may call
///
/// Serializes to Ollama's native shape:
/// `{"type":"function","function":{"name":…,"description":…,"parameters":…}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Tool kind, always `"function"` for Ollama
    #[serde(rename = "type")]
    pub kind: String,
    /// The function definition
    pub function: FunctionSpec,
}

/// Function definition for a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSpec {
    /// The name of the function
    pub name: String,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// JSON Schema for the parameters
    pub parameters: Value,
}

impl ToolSpec {
    /// Create a function tool definition
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
    ) -> Self {
        Self {
            kind: "function".to_string(),
            function: FunctionSpec {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }

    /// The function name
    pub fn name(&self) -> &str {
        &self.function.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_spec_native_shape() {
        let spec = ToolSpec::function(
            "add",
            "Add two numbers",
            json!({"type": "object", "properties": {"a": {"type": "number"}}}),
        );

        let value = serde_json::to_value(&spec).unwrap();
        assert_eq!(value["type"], "function");
        assert_eq!(value["function"]["name"], "add");
        assert_eq!(value["function"]["parameters"]["type"], "object");
        assert_eq!(spec.name(), "add");
    }

    #[test]
    fn test_tool_call_spec_defaults_arguments() {
        let spec: ToolCallSpec = serde_json::from_value(json!({"name": "now"})).unwrap();
        assert_eq!(spec.name, "now");
        assert!(spec.arguments.is_empty());
    }
}
