//! Message types for chat conversations

use crate::types::tool::ToolCallSpec;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// The role of a message in a conversation
///
/// Ollama accepts arbitrary role names, so besides the well-known roles a
/// [`Role::Custom`] variant carries any other name verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// System message (instructions)
    System,
    /// User message
    #[default]
    User,
    /// Assistant message
    Assistant,
    /// Tool message (function result)
    Tool,
    /// Any other role name
    Custom(String),
}

impl Role {
    /// Create a custom role
    pub fn custom(name: impl Into<String>) -> Self {
        Role::from(name.into())
    }

    /// The wire name of this role
    pub fn as_str(&self) -> &str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
            Role::Custom(name) => name,
        }
    }
}

impl From<String> for Role {
    fn from(name: String) -> Self {
        match name.as_str() {
            "system" => Role::System,
            "user" => Role::User,
            "assistant" => Role::Assistant,
            "tool" => Role::Tool,
            _ => Role::Custom(name),
        }
    }
}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        Role::from(name.to_string())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Custom(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A native tool call attached to an assistant message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// The function the model wants to call
    pub function: FunctionCall,
}

/// Function name and arguments of a native tool call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Function name
    pub name: String,
    /// Arguments as a JSON object
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl From<ToolCall> for ToolCallSpec {
    fn from(call: ToolCall) -> Self {
        ToolCallSpec {
            name: call.function.name,
            arguments: call.function.arguments,
        }
    }
}

/// A message in a conversation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The role of the message sender
    pub role: Role,
    /// Text content
    #[serde(default)]
    pub content: String,
    /// Base64-encoded images
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    /// Tool calls requested by the assistant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
}

impl ChatMessage {
    /// Create a simple text message
    pub fn new(role: impl Into<Role>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
            images: None,
            tool_calls: None,
        }
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Create a tool result message
    pub fn tool(content: impl Into<String>) -> Self {
        Self::new(Role::Tool, content)
    }

    /// Attach base64-encoded images
    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.images = Some(images);
        self
    }

    /// Tool calls as dispatchable specs
    pub fn tool_call_specs(&self) -> Vec<ToolCallSpec> {
        self.tool_calls
            .iter()
            .flatten()
            .cloned()
            .map(ToolCallSpec::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_round_trip() {
        assert_eq!(serde_json::to_value(Role::Assistant).unwrap(), json!("assistant"));
        assert_eq!(
            serde_json::from_value::<Role>(json!("system")).unwrap(),
            Role::System
        );

        let custom: Role = serde_json::from_value(json!("narrator")).unwrap();
        assert_eq!(custom, Role::Custom("narrator".into()));
        assert_eq!(serde_json::to_value(&custom).unwrap(), json!("narrator"));
    }

    #[test]
    fn test_custom_role_normalizes_known_names() {
        assert_eq!(Role::custom("tool"), Role::Tool);
        assert_eq!(Role::custom("critic").as_str(), "critic");
    }

    #[test]
    fn test_message_serialization_skips_empty_fields() {
        let value = serde_json::to_value(ChatMessage::user("hi")).unwrap();
        assert_eq!(value, json!({"role": "user", "content": "hi"}));
    }

    #[test]
    fn test_tool_call_specs_from_native_calls() {
        let message: ChatMessage = serde_json::from_value(json!({
            "role": "assistant",
            "content": "",
            "tool_calls": [
                {"function": {"name": "add", "arguments": {"a": 1, "b": 2}}}
            ]
        }))
        .unwrap();

        let specs = message.tool_call_specs();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].name, "add");
        assert_eq!(specs[0].arguments["b"], json!(2));
    }
}
