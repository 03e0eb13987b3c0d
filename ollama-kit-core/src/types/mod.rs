//! Core types used throughout the Ollama Kit library

pub mod embed;
pub mod message;
pub mod model;
pub mod options;
pub mod request;
pub mod response;
pub mod stream;
pub mod structured;
pub mod tool;
