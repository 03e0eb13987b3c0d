//! Streaming types for incremental responses

use crate::error::{Error, Result};
use crate::types::message::{ChatMessage, ToolCall};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One decoded line of a streamed response
///
/// Implemented by every record type the line decoder can produce, so the same
/// decoder serves generate, chat and pull-progress streams.
pub trait StreamChunk: DeserializeOwned + Send + 'static {
    /// The text fragment carried by this chunk
    fn text(&self) -> &str;

    /// Whether this is the terminal chunk
    fn is_done(&self) -> bool;

    /// Model that produced the chunk
    fn model(&self) -> Option<&str> {
        None
    }

    /// Why generation stopped (terminal chunk only)
    fn done_reason(&self) -> Option<&str> {
        None
    }

    /// Timing and token statistics (terminal chunk only)
    fn stats(&self) -> Option<&GenerationStats> {
        None
    }

    /// Conversation context (generate, terminal chunk only)
    fn context(&self) -> Option<&[i64]> {
        None
    }

    /// Native tool calls carried by the chunk
    fn tool_calls(&self) -> &[ToolCall] {
        &[]
    }
}

/// Timing and token statistics reported on the terminal chunk
///
/// Durations are in nanoseconds, as sent by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Total time spent on the request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_duration: Option<u64>,
    /// Time spent loading the model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_duration: Option<u64>,
    /// Number of tokens in the prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_eval_count: Option<u64>,
    /// Time spent evaluating the prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_eval_duration: Option<u64>,
    /// Number of tokens generated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eval_count: Option<u64>,
    /// Time spent generating
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eval_duration: Option<u64>,
}

impl GenerationStats {
    /// Whether the server reported any statistic
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Total server-side duration
    pub fn total(&self) -> Option<Duration> {
        self.total_duration.map(Duration::from_nanos)
    }

    /// Generation throughput in tokens per second
    pub fn tokens_per_second(&self) -> Option<f64> {
        match (self.eval_count, self.eval_duration) {
            (Some(count), Some(nanos)) if nanos > 0 => {
                Some(count as f64 / Duration::from_nanos(nanos).as_secs_f64())
            }
            _ => None,
        }
    }
}

/// A streamed line from `/api/generate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateChunk {
    /// Model name
    #[serde(default)]
    pub model: String,
    /// Server timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Text fragment
    #[serde(default)]
    pub response: String,
    /// Terminal marker
    #[serde(default)]
    pub done: bool,
    /// Why generation stopped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done_reason: Option<String>,
    /// Context for a follow-up call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Vec<i64>>,
    /// Statistics (terminal chunk only)
    #[serde(flatten)]
    pub stats: GenerationStats,
}

impl StreamChunk for GenerateChunk {
    fn text(&self) -> &str {
        &self.response
    }

    fn is_done(&self) -> bool {
        self.done
    }

    fn model(&self) -> Option<&str> {
        Some(&self.model).filter(|m| !m.is_empty()).map(String::as_str)
    }

    fn done_reason(&self) -> Option<&str> {
        self.done_reason.as_deref()
    }

    fn stats(&self) -> Option<&GenerationStats> {
        Some(&self.stats).filter(|s| !s.is_empty())
    }

    fn context(&self) -> Option<&[i64]> {
        self.context.as_deref()
    }
}

/// A streamed line from `/api/chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatChunk {
    /// Model name
    #[serde(default)]
    pub model: String,
    /// Server timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Partial assistant message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<ChatMessage>,
    /// Terminal marker
    #[serde(default)]
    pub done: bool,
    /// Why generation stopped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done_reason: Option<String>,
    /// Statistics (terminal chunk only)
    #[serde(flatten)]
    pub stats: GenerationStats,
}

impl StreamChunk for ChatChunk {
    fn text(&self) -> &str {
        self.message.as_ref().map(|m| m.content.as_str()).unwrap_or("")
    }

    fn is_done(&self) -> bool {
        self.done
    }

    fn model(&self) -> Option<&str> {
        Some(&self.model).filter(|m| !m.is_empty()).map(String::as_str)
    }

    fn done_reason(&self) -> Option<&str> {
        self.done_reason.as_deref()
    }

    fn stats(&self) -> Option<&GenerationStats> {
        Some(&self.stats).filter(|s| !s.is_empty())
    }

    fn tool_calls(&self) -> &[ToolCall] {
        self.message
            .as_ref()
            .and_then(|m| m.tool_calls.as_deref())
            .unwrap_or(&[])
    }
}

/// Folds a sequence of chunks into the pieces of a final result
///
/// The accumulated text is the ordered concatenation of every chunk's
/// fragment up to and including the terminal chunk. Chunks after the
/// terminal one are rejected.
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    text: String,
    model: Option<String>,
    done: bool,
    done_reason: Option<String>,
    stats: Option<GenerationStats>,
    context: Option<Vec<i64>>,
    tool_calls: Vec<ToolCall>,
    chunks: usize,
}

impl StreamAccumulator {
    /// Create a new accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one chunk into the accumulator
    pub fn push<C: StreamChunk>(&mut self, chunk: &C) -> Result<()> {
        if self.done {
            return Err(Error::Decode {
                line: chunk.text().to_string(),
                message: "chunk received after terminal chunk".to_string(),
                source: None,
            });
        }

        self.text.push_str(chunk.text());
        self.tool_calls.extend_from_slice(chunk.tool_calls());
        self.chunks += 1;

        if self.model.is_none() {
            self.model = chunk.model().map(str::to_string);
        }

        if chunk.is_done() {
            self.done = true;
            self.done_reason = chunk.done_reason().map(str::to_string);
            self.stats = chunk.stats().cloned();
            self.context = chunk.context().map(<[i64]>::to_vec);
        }
        Ok(())
    }

    /// Fail unless the terminal chunk has been seen
    pub fn ensure_done(&self) -> Result<()> {
        if self.done {
            Ok(())
        } else {
            Err(Error::Decode {
                line: String::new(),
                message: "stream ended before terminal chunk".to_string(),
                source: None,
            })
        }
    }

    /// Whether the terminal chunk has been seen
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// The accumulated text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of chunks folded so far
    pub fn chunk_count(&self) -> usize {
        self.chunks
    }

    /// Model reported by the stream
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Why generation stopped
    pub fn done_reason(&self) -> Option<&str> {
        self.done_reason.as_deref()
    }

    /// Final statistics
    pub fn stats(&self) -> Option<&GenerationStats> {
        self.stats.as_ref()
    }

    /// Final context
    pub fn context(&self) -> Option<&[i64]> {
        self.context.as_deref()
    }

    /// Native tool calls seen across all chunks
    pub fn tool_calls(&self) -> &[ToolCall] {
        &self.tool_calls
    }

    /// Take the accumulated parts
    pub fn into_parts(self) -> AccumulatedParts {
        AccumulatedParts {
            text: self.text,
            model: self.model.unwrap_or_default(),
            done_reason: self.done_reason,
            stats: self.stats,
            context: self.context,
            tool_calls: self.tool_calls,
        }
    }
}

/// Everything an accumulator collected, by value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccumulatedParts {
    /// Concatenated text
    pub text: String,
    /// Model name, empty if the server never reported one
    pub model: String,
    /// Why generation stopped
    pub done_reason: Option<String>,
    /// Final statistics
    pub stats: Option<GenerationStats>,
    /// Final context
    pub context: Option<Vec<i64>>,
    /// Native tool calls
    pub tool_calls: Vec<ToolCall>,
}
