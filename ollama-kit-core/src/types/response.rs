//! Final results of generate and chat calls

use crate::types::message::{ChatMessage, Role};
use crate::types::stream::{AccumulatedParts, GenerationStats};
use crate::types::tool::ToolCallSpec;
use std::fmt;
use std::time::Duration;

/// The complete result of a generate call
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateResult {
    /// Concatenated response text
    pub response: String,
    /// HTTP status of the response
    pub http_status: u16,
    /// Wall-clock time from dispatch to the terminal chunk
    pub response_time: Duration,
    /// Model that answered
    pub model: String,
    /// Why generation stopped
    pub done_reason: Option<String>,
    /// Context for a follow-up call
    pub context: Option<Vec<i64>>,
    /// Final statistics
    pub stats: Option<GenerationStats>,
}

impl GenerateResult {
    /// Build a result from accumulated stream parts
    pub fn from_parts(parts: AccumulatedParts, http_status: u16, response_time: Duration) -> Self {
        Self {
            response: parts.text,
            http_status,
            response_time,
            model: parts.model,
            done_reason: parts.done_reason,
            context: parts.context,
            stats: parts.stats,
        }
    }
}

impl fmt::Display for GenerateResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.response)
    }
}

/// The complete result of a chat call
#[derive(Debug, Clone, PartialEq)]
pub struct ChatResult {
    /// Concatenated assistant text
    pub response: String,
    /// HTTP status of the response
    pub http_status: u16,
    /// Wall-clock time from dispatch to the terminal chunk
    pub response_time: Duration,
    /// Model that answered
    pub model: String,
    /// The assistant reply
    pub message: ChatMessage,
    /// The request history with the reply appended once
    pub history: Vec<ChatMessage>,
    /// Why generation stopped
    pub done_reason: Option<String>,
    /// Final statistics
    pub stats: Option<GenerationStats>,
}

impl ChatResult {
    /// Build a result from accumulated parts and the request's history
    ///
    /// The history is copied and exactly one assistant message is appended.
    pub fn from_parts(
        parts: AccumulatedParts,
        history: &[ChatMessage],
        http_status: u16,
        response_time: Duration,
    ) -> Self {
        let message = ChatMessage {
            role: Role::Assistant,
            content: parts.text.clone(),
            images: None,
            tool_calls: if parts.tool_calls.is_empty() {
                None
            } else {
                Some(parts.tool_calls)
            },
        };

        let mut history = history.to_vec();
        history.push(message.clone());

        Self {
            response: parts.text,
            http_status,
            response_time,
            model: parts.model,
            message,
            history,
            done_reason: parts.done_reason,
            stats: parts.stats,
        }
    }

    /// Native tool calls requested by the assistant
    pub fn tool_calls(&self) -> Vec<ToolCallSpec> {
        self.message.tool_call_specs()
    }

    /// Check if the assistant requested tool calls
    pub fn has_tool_calls(&self) -> bool {
        self.message
            .tool_calls
            .as_ref()
            .is_some_and(|calls| !calls.is_empty())
    }
}

impl fmt::Display for ChatResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.response)?;
        if self.has_tool_calls() {
            write!(f, " [+{} tool calls]", self.tool_calls().len())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::message::{FunctionCall, ToolCall};
    use serde_json::Map;

    fn parts(text: &str) -> AccumulatedParts {
        AccumulatedParts {
            text: text.to_string(),
            model: "llama3".to_string(),
            done_reason: Some("stop".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_chat_result_appends_reply_once() {
        let history = vec![ChatMessage::system("be nice"), ChatMessage::user("hi")];
        let result =
            ChatResult::from_parts(parts("hello!"), &history, 200, Duration::from_millis(5));

        assert_eq!(history.len(), 2);
        assert_eq!(result.history.len(), 3);
        assert_eq!(result.history[2], ChatMessage::assistant("hello!"));
        assert_eq!(result.message.content, "hello!");
        assert!(!result.has_tool_calls());
        assert_eq!(result.to_string(), "hello!");
    }

    #[test]
    fn test_chat_result_keeps_tool_calls() {
        let mut with_calls = parts("");
        with_calls.tool_calls = vec![ToolCall {
            function: FunctionCall {
                name: "now".into(),
                arguments: Map::new(),
            },
        }];

        let result = ChatResult::from_parts(with_calls, &[], 200, Duration::ZERO);
        assert!(result.has_tool_calls());
        assert_eq!(result.tool_calls()[0].name, "now");
        assert_eq!(result.to_string(), " [+1 tool calls]");
    }

    #[test]
    fn test_generate_result_from_parts() {
        let result = GenerateResult::from_parts(parts("42"), 200, Duration::from_secs(1));
        assert_eq!(result.response, "42");
        assert_eq!(result.model, "llama3");
        assert_eq!(result.done_reason.as_deref(), Some("stop"));
        assert_eq!(result.http_status, 200);
    }
}
