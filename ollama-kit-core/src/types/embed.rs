//! Embedding types

use crate::types::options::Options;
use serde::{Deserialize, Serialize};

/// Input to embed: one text or a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmbedInput {
    /// A single text
    Single(String),
    /// Several texts, embedded in order
    Batch(Vec<String>),
}

impl From<&str> for EmbedInput {
    fn from(text: &str) -> Self {
        EmbedInput::Single(text.to_string())
    }
}

impl From<String> for EmbedInput {
    fn from(text: String) -> Self {
        EmbedInput::Single(text)
    }
}

impl From<Vec<String>> for EmbedInput {
    fn from(texts: Vec<String>) -> Self {
        EmbedInput::Batch(texts)
    }
}

/// Request body for `/api/embed`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedRequest {
    /// Model name
    pub model: String,
    /// Text(s) to embed
    pub input: EmbedInput,
    /// Truncate inputs that exceed the context length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truncate: Option<bool>,
    /// Model options
    #[serde(default, skip_serializing_if = "Options::is_empty")]
    pub options: Options,
    /// How long the model stays loaded after the call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_alive: Option<String>,
}

impl EmbedRequest {
    /// Create a request for one or more inputs
    pub fn new(model: impl Into<String>, input: impl Into<EmbedInput>) -> Self {
        Self {
            model: model.into(),
            input: input.into(),
            truncate: None,
            options: Options::default(),
            keep_alive: None,
        }
    }

    /// Set truncation
    pub fn truncate(mut self, truncate: bool) -> Self {
        self.truncate = Some(truncate);
        self
    }

    /// Set model options
    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }
}

/// Response body of `/api/embed`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedResponse {
    /// Model name
    #[serde(default)]
    pub model: String,
    /// One vector per input, in input order
    pub embeddings: Vec<Vec<f64>>,
    /// Total server-side duration in nanoseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_duration: Option<u64>,
    /// Model load duration in nanoseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_duration: Option<u64>,
    /// Number of input tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_eval_count: Option<u64>,
}

/// Request body for the legacy `/api/embeddings` endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingsRequest {
    /// Model name
    pub model: String,
    /// Text to embed
    pub prompt: String,
    /// Model options
    #[serde(default, skip_serializing_if = "Options::is_empty")]
    pub options: Options,
}

/// Response body of the legacy `/api/embeddings` endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingsResponse {
    /// The embedding vector
    pub embedding: Vec<f64>,
}
