//! Conversion of typed requests to wire bodies

use crate::error::serialization_error;
use ollama_kit_core::Result;
use serde::Serialize;
use serde_json::Value;

/// Serialize a request and set its `stream` flag
pub(crate) fn to_body<R: Serialize>(request: &R, stream: bool) -> Result<Value> {
    let mut body = serde_json::to_value(request).map_err(serialization_error)?;
    if let Some(obj) = body.as_object_mut() {
        obj.insert("stream".to_string(), Value::Bool(stream));
    }
    Ok(body)
}
