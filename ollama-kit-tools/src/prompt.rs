//! Raw-mode prompt rendering for tool calling

use ollama_kit_core::{Error, Result, ToolSpec};

/// Builds a raw prompt that advertises tools to the model
///
/// Renders as
/// `[AVAILABLE_TOOLS] [..specs..] [/AVAILABLE_TOOLS][INST] prompt [/INST]`,
/// the layout Mistral-style models answer with a `[TOOL_CALLS]` array.
#[derive(Debug, Clone, Default)]
pub struct ToolPrompt {
    tools: Vec<ToolSpec>,
    prompt: String,
}

impl ToolPrompt {
    /// Create a prompt with no tools
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            tools: Vec::new(),
            prompt: prompt.into(),
        }
    }

    /// Advertise a tool
    pub fn tool(mut self, spec: ToolSpec) -> Self {
        self.tools.push(spec);
        self
    }

    /// Advertise several tools
    pub fn tools(mut self, specs: impl IntoIterator<Item = ToolSpec>) -> Self {
        self.tools.extend(specs);
        self
    }

    /// Render the raw prompt
    pub fn render(&self) -> Result<String> {
        let tools = serde_json::to_string(&self.tools).map_err(|e| Error::Serialization {
            message: format!("Failed to serialize tool definitions: {e}"),
            source: Some(e),
        })?;
        Ok(format!(
            "[AVAILABLE_TOOLS] {tools} [/AVAILABLE_TOOLS][INST] {} [/INST]",
            self.prompt
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_layout() {
        let prompt = ToolPrompt::new("What is 1 + 2?")
            .tool(ToolSpec::function(
                "add",
                "Add two integers",
                json!({"type": "object"}),
            ))
            .render()
            .unwrap();

        assert!(prompt.starts_with("[AVAILABLE_TOOLS] [{\"type\":\"function\""));
        assert!(prompt.contains("\"name\":\"add\""));
        assert!(prompt.ends_with("[/AVAILABLE_TOOLS][INST] What is 1 + 2? [/INST]"));
    }

    #[test]
    fn test_render_without_tools() {
        assert_eq!(
            ToolPrompt::new("hi").render().unwrap(),
            "[AVAILABLE_TOOLS] [] [/AVAILABLE_TOOLS][INST] hi [/INST]"
        );
    }
}
