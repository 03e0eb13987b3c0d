//! Ollama Kit - a Rust client library for the Ollama API
//!
//! This crate talks to a local or remote Ollama server over HTTP: buffered
//! and streamed generation, chat turns, model management, embeddings, and a
//! tool-calling layer that dispatches model-emitted calls to registered
//! handlers.
//!
//! # Features
//!
//! - **Streaming**: line-delimited JSON decoded lazily, with per-chunk callbacks
//! - **Tool Calling**: parse `[TOOL_CALLS]` output and invoke registered handlers
//! - **Structured Output**: constrain responses to a JSON schema and parse them
//! - **Model Management**: list, pull, show, create and delete models
//!
//! # Quick Start
//!
//! ```no_run
//! # use ollama_kit::prelude::*;
//! #
//! # #[tokio::main]
//! # async fn main() -> Result<(), ollama_kit::Error> {
//! #     #[cfg(feature = "client")]
//! #     {
//!     let ollama = Ollama::new()?;
//!
//!     let request = GenerateRequest::new("llama3", "Why is the sky blue?");
//!     let result = ollama
//!         .generate_with(&request, |chunk| {
//!             print!("{}", chunk.response);
//!             Ok(())
//!         })
//!         .await?;
//!
//!     println!("\n({} ms)", result.response_time.as_millis());
//! #     }
//! #     Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Re-export core types
pub use ollama_kit_core::*;

#[cfg(feature = "client")]
#[cfg_attr(docsrs, doc(cfg(feature = "client")))]
pub mod client {
    //! HTTP client for the Ollama API
    pub use ollama_kit_client::*;
}

#[cfg(feature = "tools")]
#[cfg_attr(docsrs, doc(cfg(feature = "tools")))]
pub mod tools {
    //! Tool registry and dispatch
    pub use ollama_kit_tools::*;
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use ollama_kit_core::{
        ChatMessage, ChatRequest, ChatResult, Error, GenerateChunk, GenerateRequest,
        GenerateResult, Options, ResponseFormat, Role, StreamChunk, StructuredOutput,
    };

    #[cfg(feature = "client")]
    pub use ollama_kit_client::{Credentials, GenerationTask, Ollama, OllamaConfig, ToolsResult};

    #[cfg(feature = "tools")]
    pub use ollama_kit_tools::{FunctionHandler, ToolHandler, ToolRegistry, ToolSpec};
}
