//! Extraction of tool calls from raw model output

use ollama_kit_core::{Error, Result, ToolCallSpec};

/// Marker some models emit in front of a tool-call array
pub const TOOL_CALLS_MARKER: &str = "[TOOL_CALLS]";

/// Parse model output into a batch of tool calls.
///
/// Every occurrence of [`TOOL_CALLS_MARKER`] is removed, then the remainder
/// must be a JSON array of `{"name": .., "arguments": {..}}` objects. `[]` is
/// a valid empty batch; empty output is not.
pub fn parse_tool_calls(text: &str) -> Result<Vec<ToolCallSpec>> {
    let stripped = text.replace(TOOL_CALLS_MARKER, "");
    let payload = stripped.trim();

    if payload.is_empty() {
        return Err(Error::MalformedToolCall {
            message: "model output contains no tool calls".to_string(),
            source: None,
        });
    }

    serde_json::from_str(payload).map_err(|e| Error::MalformedToolCall {
        message: format!("expected a JSON array of tool calls: {e}"),
        source: Some(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_with_marker() {
        let calls =
            parse_tool_calls(r#"[TOOL_CALLS][{"name":"add","arguments":{"a":1,"b":2}}]"#).unwrap();

        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "add");
        assert_eq!(calls[0].arguments["a"], json!(1));
    }

    #[test]
    fn test_parse_without_marker_and_whitespace() {
        let calls = parse_tool_calls(
            "  [{\"name\":\"now\",\"arguments\":{}}, {\"name\":\"add\",\"arguments\":{\"a\":1}}]\n",
        )
        .unwrap();
        let names: Vec<_> = calls.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["now", "add"]);
    }

    #[test]
    fn test_empty_array_is_valid() {
        assert!(parse_tool_calls("[]").unwrap().is_empty());
        assert!(parse_tool_calls("[TOOL_CALLS] []").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_output() {
        for text in ["", "[TOOL_CALLS]", "Sure! Let me add those.", r#"{"name":"add"}"#] {
            let err = parse_tool_calls(text).unwrap_err();
            assert!(
                matches!(err, Error::MalformedToolCall { .. }),
                "unexpected error for {text:?}: {err:?}"
            );
        }
    }
}
