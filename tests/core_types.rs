//! Tests for core types

use ollama_kit::*;
use serde_json::json;

#[test]
fn test_message_creation() {
    let msg = ChatMessage::user("Hello, world!");
    assert_eq!(msg.role, Role::User);
    assert_eq!(msg.content, "Hello, world!");
    assert!(msg.images.is_none());
}

#[test]
fn test_custom_role_round_trip() {
    let msg = ChatMessage::new(Role::custom("narrator"), "Once upon a time");
    let value = serde_json::to_value(&msg).unwrap();
    assert_eq!(value["role"], "narrator");

    let back: ChatMessage = serde_json::from_value(value).unwrap();
    assert_eq!(back.role, Role::Custom("narrator".to_string()));
}

#[test]
fn test_request_builder() {
    let request = ChatRequest::builder("llama3")
        .system("You are helpful")
        .user("Hello")
        .options(Options::builder().num_predict(100).seed(1).build())
        .build();

    assert_eq!(request.messages.len(), 2);
    assert_eq!(request.model, "llama3");
    assert_eq!(request.options.get("num_predict"), Some(&json!(100)));
    assert_eq!(request.options.get("seed"), Some(&json!(1)));
}

#[test]
fn test_tool_creation() {
    let tool = ToolSpec::function(
        "get_weather",
        "Get the weather for a location",
        json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "The city and state"
                }
            },
            "required": ["location"]
        }),
    );

    assert_eq!(tool.name(), "get_weather");
    assert_eq!(tool.kind, "function");
    assert!(tool.function.parameters.is_object());
}

#[test]
fn test_accumulator_matches_concatenation() {
    let lines = [
        r#"{"model":"llama3","response":"The","done":false}"#,
        r#"{"model":"llama3","response":" sky","done":false}"#,
        r#"{"model":"llama3","response":" is blue.","done":false}"#,
        r#"{"model":"llama3","response":"","done":true,"done_reason":"stop","eval_count":4}"#,
    ];

    let mut acc = StreamAccumulator::new();
    let mut expected = String::new();
    for line in lines {
        let chunk: GenerateChunk = serde_json::from_str(line).unwrap();
        expected.push_str(&chunk.response);
        acc.push(&chunk).unwrap();
    }

    assert!(acc.is_done());
    assert_eq!(acc.text(), expected);
    assert_eq!(acc.stats().and_then(|s| s.eval_count), Some(4));
}

#[test]
fn test_error_variants() {
    let not_found = Error::ToolNotFound {
        name: "sub".to_string(),
    };
    assert_eq!(not_found.to_string(), "Tool not found: sub");
    assert!(!not_found.is_retryable());
    assert!(Error::transport("connection refused").is_retryable());
}
