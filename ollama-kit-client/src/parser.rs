//! Decoding of single response records

use crate::error::upstream_error;
use ollama_kit_core::{Error, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decode one JSON record from a response line or buffered body.
///
/// A record carrying a non-null `"error"` is the server reporting a failure
/// in-band and becomes [`Error::Upstream`] with the record as body.
pub(crate) fn decode_record<T: DeserializeOwned>(line: &str, status: u16) -> Result<T> {
    let value: Value = serde_json::from_str(line).map_err(|e| Error::decode(line, e))?;

    if value.get("error").is_some_and(|error| !error.is_null()) {
        return Err(upstream_error(status, line));
    }

    serde_json::from_value(value).map_err(|e| Error::decode(line, e))
}
