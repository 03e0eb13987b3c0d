//! Types for structured output functionality

use crate::error::{Error, Result};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Trait for types that can be used as structured output from a model.
///
/// The schema is sent as the request's `format` so the server constrains the
/// model's output to it.
pub trait StructuredOutput: Serialize + DeserializeOwned + Send + Sync {
    /// Returns the JSON Schema for this type.
    fn schema() -> Value;

    /// Returns example instances of this type.
    ///
    /// Examples can be embedded in prompts to show the expected shape.
    fn examples() -> Vec<Self> {
        vec![]
    }
}

/// Format specification for structured responses.
///
/// On the wire this is either the string `"json"` or a JSON Schema object.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResponseFormat {
    /// Request any valid JSON response.
    #[default]
    Json,
    /// Request a response matching a specific JSON Schema.
    JsonSchema(Value),
}

impl ResponseFormat {
    /// Build the schema format for a structured output type
    pub fn for_type<T: StructuredOutput>() -> Self {
        ResponseFormat::JsonSchema(T::schema())
    }
}

impl Serialize for ResponseFormat {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ResponseFormat::Json => serializer.serialize_str("json"),
            ResponseFormat::JsonSchema(schema) => schema.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ResponseFormat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(s) if s == "json" => Ok(ResponseFormat::Json),
            schema @ Value::Object(_) => Ok(ResponseFormat::JsonSchema(schema)),
            other => Err(de::Error::custom(format!(
                "expected \"json\" or a schema object, got {other}"
            ))),
        }
    }
}

/// Parse response text into a caller-specified shape
pub fn parse_structured<T: DeserializeOwned>(text: &str) -> Result<T> {
    serde_json::from_str(text.trim()).map_err(|e| Error::StructuredResponse {
        message: format!(
            "failed to parse response into {}: {}",
            std::any::type_name::<T>(),
            e
        ),
        source: Some(e),
    })
}

/// A raw result together with its structured interpretation.
///
/// The raw result is always available; `value` holds the parsed payload or
/// the [`Error::StructuredResponse`] describing why parsing failed.
#[derive(Debug)]
pub struct Structured<R, T> {
    /// The raw result
    pub result: R,
    /// The parsed payload
    pub value: Result<T>,
}

impl<R, T: DeserializeOwned> Structured<R, T> {
    /// Parse `text` and pair it with the raw result
    pub fn parse(result: R, text: &str) -> Self {
        let value = parse_structured(text);
        Self { result, value }
    }
}

impl<R, T> Structured<R, T> {
    /// The parsed payload, if parsing succeeded
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref().ok()
    }

    /// Consume and return the parsed payload or the parse error
    pub fn into_value(self) -> Result<T> {
        self.value
    }

    /// Split into the raw result and the parse outcome
    pub fn into_parts(self) -> (R, Result<T>) {
        (self.result, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestStruct {
        name: String,
        age: u32,
        active: bool,
    }

    impl StructuredOutput for TestStruct {
        fn schema() -> Value {
            json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "age": { "type": "integer", "minimum": 0 },
                    "active": { "type": "boolean" }
                },
                "required": ["name", "age", "active"]
            })
        }

        fn examples() -> Vec<Self> {
            vec![TestStruct {
                name: "Alice".to_string(),
                age: 30,
                active: true,
            }]
        }
    }

    #[test]
    fn test_response_format_default() {
        assert_eq!(ResponseFormat::default(), ResponseFormat::Json);
    }

    #[test]
    fn test_response_format_wire_shape() {
        assert_eq!(serde_json::to_value(ResponseFormat::Json).unwrap(), json!("json"));

        let format = ResponseFormat::for_type::<TestStruct>();
        let value = serde_json::to_value(&format).unwrap();
        assert_eq!(value["properties"]["age"]["type"], "integer");

        let back: ResponseFormat = serde_json::from_value(value).unwrap();
        assert_eq!(back, format);
    }

    #[test]
    fn test_response_format_rejects_other_values() {
        assert!(serde_json::from_value::<ResponseFormat>(json!(7)).is_err());
        assert!(serde_json::from_value::<ResponseFormat>(json!("yaml")).is_err());
    }

    #[test]
    fn test_structured_parse_success() {
        let structured: Structured<&str, TestStruct> = Structured::parse(
            "raw",
            r#" {"name":"Bob","age":25,"active":false} "#,
        );

        assert_eq!(structured.value().map(|v| v.age), Some(25));
        assert_eq!(structured.result, "raw");
    }

    #[test]
    fn test_structured_parse_failure_keeps_raw() {
        let structured: Structured<String, TestStruct> =
            Structured::parse("not json".to_string(), "not json");

        let (raw, value) = structured.into_parts();
        assert_eq!(raw, "not json");
        assert!(matches!(value, Err(Error::StructuredResponse { .. })));
    }

    #[test]
    fn test_structured_output_examples() {
        assert_eq!(TestStruct::examples().len(), 1);
        assert_eq!(TestStruct::schema()["type"], "object");
    }
}
