//! HTTP client for the Ollama API
//!
//! [`Ollama`] wraps a local or remote Ollama server: streamed and buffered
//! generate and chat calls, model management, embeddings, and a tool-calling
//! layer backed by [`ollama_kit_tools::ToolRegistry`].
//!
//! Streamed endpoints answer with line-delimited JSON. [`ChunkStream`]
//! decodes those lines lazily and [`accumulator::accumulate`] folds them
//! into a final result while handing each chunk to a callback.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod accumulator;
pub mod api;
pub mod client;
pub mod config;
pub mod config_builder;
pub mod constants;
pub mod error;
pub mod http;
pub mod images;
pub mod ndjson;
pub mod task;

mod converter;
mod parser;

// Re-export main types
pub use api::ToolsResult;
pub use client::{Ollama, OllamaBuilder};
pub use config::{Credentials, OllamaConfig};
pub use config_builder::OllamaConfigBuilder;
pub use http::{
    HttpClient, HttpRequest, HttpResponse, ReqwestClient, ResponseStream, StreamingResponse,
};
pub use ndjson::ChunkStream;
pub use task::GenerationTask;
