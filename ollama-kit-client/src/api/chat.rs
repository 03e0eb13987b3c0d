//! `/api/chat` operations

use crate::client::Ollama;
use crate::constants::{paths, TRACING_TARGET_CLIENT};
use crate::converter::to_body;
use crate::ndjson::ChunkStream;
use ollama_kit_core::{
    ChatChunk, ChatRequest, ChatResult, ResponseFormat, Result, Structured, StructuredOutput,
};

impl Ollama {
    /// Run one chat turn in a single buffered call
    ///
    /// The result's history is the request's messages followed by exactly one
    /// assistant message; the request itself is left untouched.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResult> {
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Chatting"
        );

        let body = to_body(request, false)?;
        let (acc, status, elapsed) = self.run_sync::<ChatChunk>(paths::CHAT, body).await?;
        Ok(ChatResult::from_parts(
            acc.into_parts(),
            &request.messages,
            status,
            elapsed,
        ))
    }

    /// Run one chat turn as a stream, calling `on_chunk` for every chunk
    pub async fn chat_with<F>(&self, request: &ChatRequest, on_chunk: F) -> Result<ChatResult>
    where
        F: FnMut(&ChatChunk) -> Result<()>,
    {
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            model = %request.model,
            messages = request.messages.len(),
            "Chatting (streamed)"
        );

        let body = to_body(request, true)?;
        let (acc, status, elapsed) = self.run_streamed(paths::CHAT, body, on_chunk).await?;
        Ok(ChatResult::from_parts(
            acc.into_parts(),
            &request.messages,
            status,
            elapsed,
        ))
    }

    /// Open a chat turn and return its chunks for the caller to poll
    pub async fn chat_stream(&self, request: &ChatRequest) -> Result<ChunkStream<ChatChunk>> {
        let body = to_body(request, true)?;
        self.open_stream(paths::CHAT, body).await
    }

    /// Run one chat turn constrained to `T`'s schema and parse the reply
    pub async fn chat_structured<T: StructuredOutput>(
        &self,
        request: &ChatRequest,
    ) -> Result<Structured<ChatResult, T>> {
        let mut request = request.clone();
        request.format = Some(ResponseFormat::for_type::<T>());

        let result = self.chat(&request).await?;
        let text = result.response.clone();
        Ok(Structured::parse(result, &text))
    }

    /// Stream one chat turn constrained to `T`'s schema, then parse the reply
    ///
    /// `on_chunk` sees the JSON text as it arrives; parsing happens once the
    /// terminal chunk has been folded in.
    pub async fn chat_structured_with<T, F>(
        &self,
        request: &ChatRequest,
        on_chunk: F,
    ) -> Result<Structured<ChatResult, T>>
    where
        T: StructuredOutput,
        F: FnMut(&ChatChunk) -> Result<()>,
    {
        let mut request = request.clone();
        request.format = Some(ResponseFormat::for_type::<T>());

        let result = self.chat_with(&request, on_chunk).await?;
        let text = result.response.clone();
        Ok(Structured::parse(result, &text))
    }
}
