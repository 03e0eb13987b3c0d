//! Tool calling for the Ollama Kit client library
//!
//! This crate turns model output into function calls: it parses the JSON
//! tool-call array a model emits, resolves each name against a
//! [`ToolRegistry`], and invokes the registered handlers in order.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod handler;
pub mod parse;
pub mod prompt;
pub mod registry;
pub mod results;

/// Tracing target for tool registration and dispatch
pub const TRACING_TARGET_TOOLS: &str = "ollama_kit_tools";

// Re-export core types from ollama-kit-core
pub use ollama_kit_core::{ToolCallSpec, ToolSpec};

// Re-export main types
pub use error::ToolError;
pub use handler::{Arguments, AsyncToolFunction, FunctionHandler, ToolHandler};
pub use parse::{parse_tool_calls, TOOL_CALLS_MARKER};
pub use prompt::ToolPrompt;
pub use registry::ToolRegistry;
pub use results::{ToolOutput, ToolResults};
