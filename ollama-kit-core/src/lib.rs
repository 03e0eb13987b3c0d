//! Core types for the Ollama Kit client library
//!
//! This crate holds the wire types shared by the client and tools crates and
//! the single error type every operation returns.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod types;

// Re-export commonly used items
pub use error::{BoxError, Error, Result};
pub use types::{
    embed::{EmbedInput, EmbedRequest, EmbedResponse, EmbeddingsRequest, EmbeddingsResponse},
    message::{ChatMessage, FunctionCall, Role, ToolCall},
    model::{
        CreateModelRequest, ListModelsResponse, ListRunningResponse, ModelDetails, ModelInfo,
        ModelName, ModelSummary, PullProgress, RunningModel,
    },
    options::{Options, OptionsBuilder},
    request::{ChatRequest, ChatRequestBuilder, GenerateRequest, GenerateRequestBuilder},
    response::{ChatResult, GenerateResult},
    stream::{
        AccumulatedParts, ChatChunk, GenerateChunk, GenerationStats, StreamAccumulator,
        StreamChunk,
    },
    structured::{parse_structured, ResponseFormat, Structured, StructuredOutput},
    tool::{FunctionSpec, ToolCallSpec, ToolSpec},
};
