//! Line-delimited JSON stream decoding

use crate::constants::TRACING_TARGET_STREAM;
use crate::http::ResponseStream;
use crate::parser::decode_record;
use futures_core::Stream;
use ollama_kit_core::{Error, Result, StreamChunk};
use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context, Poll};

/// A lazy stream of decoded chunks read from a line-delimited JSON body
///
/// Lines are split at the byte level, so a UTF-8 sequence spanning two
/// network reads is reassembled before decoding. Blank lines are skipped and
/// a trailing `\r` is dropped. The stream ends after the terminal chunk or
/// after the first error.
pub struct ChunkStream<T> {
    inner: ResponseStream,
    buffer: Vec<u8>,
    status: u16,
    finished: bool,
    _chunk: PhantomData<fn() -> T>,
}

impl<T: StreamChunk> ChunkStream<T> {
    /// Decode `inner`, attributing in-band errors to `status`
    pub fn new(inner: ResponseStream, status: u16) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
            status,
            finished: false,
            _chunk: PhantomData,
        }
    }

    /// HTTP status of the response being decoded
    pub fn status(&self) -> u16 {
        self.status
    }

    fn take_line(&mut self) -> Option<Vec<u8>> {
        let newline = self.buffer.iter().position(|&b| b == b'\n')?;
        let mut line: Vec<u8> = self.buffer.drain(..=newline).collect();
        line.pop();
        Some(line)
    }

    fn decode(&self, raw: &[u8]) -> Option<Result<T>> {
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        let line = match std::str::from_utf8(raw) {
            Ok(line) => line.trim(),
            Err(e) => {
                return Some(Err(Error::Decode {
                    line: String::from_utf8_lossy(raw).into_owned(),
                    message: format!("Invalid UTF-8 in response: {e}"),
                    source: None,
                }))
            }
        };

        if line.is_empty() {
            return None;
        }

        tracing::trace!(target: TRACING_TARGET_STREAM, line, "Decoding stream line");
        Some(decode_record(line, self.status))
    }

    fn emit(&mut self, item: Result<T>) -> Poll<Option<Result<T>>> {
        match &item {
            Ok(chunk) if chunk.is_done() => self.finished = true,
            Ok(_) => {}
            Err(error) => {
                tracing::debug!(
                    target: TRACING_TARGET_STREAM,
                    error = %error,
                    "Stream decoding failed"
                );
                self.finished = true;
            }
        }
        Poll::Ready(Some(item))
    }
}

impl<T: StreamChunk> Stream for ChunkStream<T> {
    type Item = Result<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            if this.finished {
                return Poll::Ready(None);
            }

            // Process complete lines
            while let Some(line) = this.take_line() {
                if let Some(item) = this.decode(&line) {
                    return this.emit(item);
                }
            }

            match this.inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => this.buffer.extend_from_slice(&bytes),
                Poll::Ready(Some(Err(error))) => return this.emit(Err(error)),
                Poll::Ready(None) => {
                    // Process any unterminated final line
                    let rest = std::mem::take(&mut this.buffer);
                    this.finished = true;
                    return match this.decode(&rest) {
                        Some(item) => this.emit(item),
                        None => Poll::Ready(None),
                    };
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

impl<T> std::fmt::Debug for ChunkStream<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkStream")
            .field("status", &self.status)
            .field("buffered", &self.buffer.len())
            .field("finished", &self.finished)
            .finish()
    }
}
