//! Error types for tool handlers

use ollama_kit_core::BoxError;
use thiserror::Error;

/// Error returned by a tool handler
///
/// The registry wraps it into [`ollama_kit_core::Error::ToolInvocation`]
/// together with the tool name.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Arguments did not match what the handler expects
    #[error("Invalid arguments: {message}")]
    InvalidArguments {
        /// Error message
        message: String,
        /// Underlying error if available
        #[source]
        source: Option<serde_json::Error>,
    },

    /// The handler ran and failed
    #[error("Execution failed: {message}")]
    ExecutionFailed {
        /// Error message
        message: String,
        /// Underlying error if available
        #[source]
        source: Option<BoxError>,
    },

    /// The handler's return value could not be converted to JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ToolError {
    /// Create an invalid-arguments error
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        ToolError::InvalidArguments {
            message: message.into(),
            source: None,
        }
    }

    /// Create an execution error without an underlying cause
    pub fn failed(message: impl Into<String>) -> Self {
        ToolError::ExecutionFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap any error as an execution failure
    pub fn from_source(source: impl Into<BoxError>) -> Self {
        let source = source.into();
        ToolError::ExecutionFailed {
            message: source.to_string(),
            source: Some(source),
        }
    }
}

/// Result type for tool handlers
pub type Result<T> = std::result::Result<T, ToolError>;
