//! Constants for the Ollama client

use std::time::Duration;

/// Default Ollama base URL
pub const OLLAMA_DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Port assumed when `OLLAMA_HOST` names only a host
pub const OLLAMA_DEFAULT_PORT: u16 = 11434;

/// Environment variable holding the server address
pub const OLLAMA_HOST_ENV: &str = "OLLAMA_HOST";

/// Default timeout for a buffered request, or for the headers of a streamed one
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Default timeout for establishing a connection
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Buffered text fragments between a background generation and its handle
pub const CHUNK_CHANNEL_CAPACITY: usize = 64;

/// Tracing target for request dispatch and model management
pub const TRACING_TARGET_CLIENT: &str = "ollama_kit_client";

/// Tracing target for stream decoding and accumulation
pub const TRACING_TARGET_STREAM: &str = "ollama_kit_client::stream";

/// API paths
pub mod paths {
    /// List local models
    pub const TAGS: &str = "api/tags";
    /// List loaded models
    pub const PS: &str = "api/ps";
    /// Pull a model
    pub const PULL: &str = "api/pull";
    /// Show model information
    pub const SHOW: &str = "api/show";
    /// Create a model
    pub const CREATE: &str = "api/create";
    /// Delete a model
    pub const DELETE: &str = "api/delete";
    /// Generate a completion
    pub const GENERATE: &str = "api/generate";
    /// Chat completion
    pub const CHAT: &str = "api/chat";
    /// Embeddings (batch)
    pub const EMBED: &str = "api/embed";
    /// Embeddings (legacy, single)
    pub const EMBEDDINGS: &str = "api/embeddings";
}
