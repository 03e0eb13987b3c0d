//! Conversions from transport and codec errors to the core error

use ollama_kit_core::Error;

/// Convert a reqwest error to a transport error
pub fn transport_error(error: reqwest::Error) -> Error {
    let message = if error.is_timeout() {
        format!("request timed out: {error}")
    } else if error.is_connect() {
        format!("connection failed: {error}")
    } else {
        error.to_string()
    };

    Error::Transport {
        message,
        source: Some(Box::new(error)),
    }
}

/// Convert a serde_json error raised while encoding a request
pub fn serialization_error(error: serde_json::Error) -> Error {
    Error::Serialization {
        message: error.to_string(),
        source: Some(error),
    }
}

/// Build an upstream error from a status and raw body
pub fn upstream_error(status: u16, body: impl Into<String>) -> Error {
    Error::Upstream {
        status,
        body: body.into(),
    }
}
