//! Error types for the Ollama Kit library

use std::error::Error as StdError;
use thiserror::Error;

/// Boxed error used for foreign causes (tool handlers, callbacks, transports)
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// The main error type for all Ollama Kit operations
///
/// Every public operation returns `Result<T, Error>`. Variants carry enough
/// context (status code, raw body, tool name, offending line) for the caller
/// to act without re-issuing the request.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Connectivity, timeout or I/O failure while talking to the server
    #[error("Transport error: {message}")]
    Transport {
        /// Error message
        message: String,
        /// Underlying error if available
        #[source]
        source: Option<BoxError>,
    },

    /// The server answered with a non-success status, or reported an error in-band
    #[error("Upstream error (HTTP {status}): {body}")]
    Upstream {
        /// HTTP status code
        status: u16,
        /// Raw response body (or the offending stream line)
        body: String,
    },

    /// A response body or stream line could not be decoded
    #[error("Decode error: {message} (line: {line:?})")]
    Decode {
        /// The offending line or body
        line: String,
        /// Error message
        message: String,
        /// Underlying JSON error if available
        #[source]
        source: Option<serde_json::Error>,
    },

    /// A request body could not be encoded
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message
        message: String,
        /// Underlying error if available
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Model output named a tool that is not registered
    #[error("Tool not found: {name}")]
    ToolNotFound {
        /// Name of the missing tool
        name: String,
    },

    /// Model output could not be parsed as a list of tool calls
    #[error("Malformed tool call: {message}")]
    MalformedToolCall {
        /// Error message
        message: String,
        /// Underlying JSON error if available
        #[source]
        source: Option<serde_json::Error>,
    },

    /// A registered tool handler failed
    #[error("Tool invocation failed for '{name}': {source}")]
    ToolInvocation {
        /// Name of the tool that failed
        name: String,
        /// The handler's error
        #[source]
        source: BoxError,
    },

    /// The final response text does not match the requested structure
    #[error("Structured response error: {message}")]
    StructuredResponse {
        /// Error message
        message: String,
        /// Underlying JSON error if available
        #[source]
        source: Option<serde_json::Error>,
    },

    /// A per-chunk callback asked to abort the stream
    #[error("Chunk callback failed: {0}")]
    Callback(#[source] BoxError),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Local file access failed (e.g. reading an image)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The operation was cancelled by the caller
    #[error("Operation cancelled")]
    Cancelled,
}

impl Error {
    /// Create a transport error without an underlying cause
    pub fn transport(message: impl Into<String>) -> Self {
        Error::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Create a decode error for the given line
    pub fn decode(line: impl Into<String>, source: serde_json::Error) -> Self {
        Error::Decode {
            line: line.into(),
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Wrap an arbitrary error returned from a chunk callback
    pub fn callback(source: impl Into<BoxError>) -> Self {
        Error::Callback(source.into())
    }

    /// HTTP status carried by an upstream error
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the caller may reasonably retry the operation.
    ///
    /// Only transport failures qualify; nothing is retried internally.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Transport { .. })
    }
}

/// Result type alias for Ollama Kit operations
pub type Result<T> = std::result::Result<T, Error>;
