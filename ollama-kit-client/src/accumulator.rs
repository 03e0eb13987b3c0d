//! Folding a chunk stream into one final result

use crate::constants::TRACING_TARGET_STREAM;
use futures::{Stream, StreamExt};
use ollama_kit_core::{Result, StreamAccumulator, StreamChunk};

/// Drain `stream` into an accumulator, calling `on_chunk` for every chunk.
///
/// The callback sees each chunk after it has been folded in; an error it
/// returns aborts the stream. Fails with a decode error if the stream ends
/// before the terminal chunk.
pub async fn accumulate<T, S, F>(mut stream: S, mut on_chunk: F) -> Result<StreamAccumulator>
where
    T: StreamChunk,
    S: Stream<Item = Result<T>> + Unpin,
    F: FnMut(&T) -> Result<()>,
{
    let mut acc = StreamAccumulator::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        acc.push(&chunk)?;
        on_chunk(&chunk)?;

        if acc.is_done() {
            break;
        }
    }

    acc.ensure_done()?;

    tracing::trace!(
        target: TRACING_TARGET_STREAM,
        chunks = acc.chunk_count(),
        chars = acc.text().len(),
        "Stream accumulated"
    );
    Ok(acc)
}
