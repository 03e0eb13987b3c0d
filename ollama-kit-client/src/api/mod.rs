//! Endpoint operations on [`Ollama`](crate::Ollama), grouped by API area

pub mod chat;
pub mod embed;
pub mod generate;
pub mod models;

pub use generate::ToolsResult;
