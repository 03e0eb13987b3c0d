//! Background generation with a cancellable handle

use crate::client::Ollama;
use crate::constants::{paths, CHUNK_CHANNEL_CAPACITY, TRACING_TARGET_STREAM};
use crate::converter::to_body;
use futures::StreamExt;
use ollama_kit_core::{
    Error, GenerateChunk, GenerateRequest, GenerateResult, Result, StreamAccumulator,
};
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Handle to a generation running on a spawned task
///
/// Text fragments are delivered through [`next_chunk`](Self::next_chunk) as
/// they arrive. Dropping the handle cancels the generation.
#[derive(Debug)]
pub struct GenerationTask {
    chunks: mpsc::Receiver<String>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<Result<GenerateResult>>>,
}

impl GenerationTask {
    pub(crate) fn spawn(client: Ollama, request: GenerateRequest) -> Self {
        let (tx, rx) = mpsc::channel(CHUNK_CHANNEL_CAPACITY);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run(client, request, tx, cancel.clone()));

        Self {
            chunks: rx,
            cancel,
            handle: Some(handle),
        }
    }

    /// Next text fragment, or `None` once the generation ended or was cancelled
    pub async fn next_chunk(&mut self) -> Option<String> {
        if self.cancel.is_cancelled() {
            return None;
        }
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            chunk = self.chunks.recv() => chunk,
        }
    }

    /// Stop the generation and close the connection
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether [`cancel`](Self::cancel) was called
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Whether the background task has finished
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the final result
    ///
    /// Fragments not yet read through [`next_chunk`](Self::next_chunk) are
    /// discarded; the result carries the full text. Once
    /// [`cancel`](Self::cancel) was called this is always
    /// [`Error::Cancelled`], even if the generation had already finished.
    pub async fn join(mut self) -> Result<GenerateResult> {
        self.chunks.close();

        let Some(handle) = self.handle.take() else {
            return Err(Error::Cancelled);
        };

        let result = match handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(Error::Cancelled),
            Err(e) => Err(Error::Transport {
                message: format!("generation task failed: {e}"),
                source: Some(Box::new(e)),
            }),
        };

        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        result
    }
}

impl Drop for GenerationTask {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run(
    client: Ollama,
    request: GenerateRequest,
    tx: mpsc::Sender<String>,
    cancel: CancellationToken,
) -> Result<GenerateResult> {
    let started = Instant::now();
    let body = to_body(&request, true)?;

    let mut stream = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(Error::Cancelled),
        stream = client.open_stream::<GenerateChunk>(paths::GENERATE, body) => stream?,
    };
    let status = stream.status();

    let mut acc = StreamAccumulator::new();
    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            next = stream.next() => Some(next),
        };

        let Some(next) = next else {
            tracing::debug!(
                target: TRACING_TARGET_STREAM,
                model = %request.model,
                chunks = acc.chunk_count(),
                "Background generation cancelled"
            );
            return Err(Error::Cancelled);
        };

        let Some(chunk) = next else { break };
        let chunk = chunk?;
        acc.push(&chunk)?;

        if !chunk.response.is_empty() {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                // A closed receiver only means nobody is reading fragments
                _ = tx.send(chunk.response) => {}
            }
        }

        if acc.is_done() {
            break;
        }
    }

    acc.ensure_done()?;
    Ok(GenerateResult::from_parts(
        acc.into_parts(),
        status,
        started.elapsed(),
    ))
}
