//! `/api/generate` operations

use crate::client::Ollama;
use crate::constants::{paths, TRACING_TARGET_CLIENT};
use crate::converter::to_body;
use crate::ndjson::ChunkStream;
use crate::task::GenerationTask;
use ollama_kit_core::{
    GenerateChunk, GenerateRequest, GenerateResult, Options, ResponseFormat, Result, Structured,
    StructuredOutput,
};
use ollama_kit_tools::{ToolPrompt, ToolResults};

/// The model output of a tool-calling generation and what the tools returned
#[derive(Debug, Clone)]
pub struct ToolsResult {
    /// The raw generation
    pub model_result: GenerateResult,
    /// Tool outputs, in the order the model listed the calls
    pub tool_results: ToolResults,
}

impl Ollama {
    /// Generate a completion in a single buffered call
    pub async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResult> {
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            model = %request.model,
            raw = request.raw,
            "Generating"
        );

        let body = to_body(request, false)?;
        let (acc, status, elapsed) = self
            .run_sync::<GenerateChunk>(paths::GENERATE, body)
            .await?;
        Ok(GenerateResult::from_parts(acc.into_parts(), status, elapsed))
    }

    /// Generate a completion as a stream, calling `on_chunk` for every chunk
    ///
    /// The result's text is the concatenation of every chunk's fragment.
    pub async fn generate_with<F>(
        &self,
        request: &GenerateRequest,
        on_chunk: F,
    ) -> Result<GenerateResult>
    where
        F: FnMut(&GenerateChunk) -> Result<()>,
    {
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            model = %request.model,
            raw = request.raw,
            "Generating (streamed)"
        );

        let body = to_body(request, true)?;
        let (acc, status, elapsed) = self
            .run_streamed(paths::GENERATE, body, on_chunk)
            .await?;
        Ok(GenerateResult::from_parts(acc.into_parts(), status, elapsed))
    }

    /// Open a generation and return its chunks for the caller to poll
    pub async fn generate_stream(
        &self,
        request: &GenerateRequest,
    ) -> Result<ChunkStream<GenerateChunk>> {
        let body = to_body(request, true)?;
        self.open_stream(paths::GENERATE, body).await
    }

    /// Generate a completion constrained to `T`'s schema and parse it
    pub async fn generate_structured<T: StructuredOutput>(
        &self,
        request: &GenerateRequest,
    ) -> Result<Structured<GenerateResult, T>> {
        let mut request = request.clone();
        request.format = Some(ResponseFormat::for_type::<T>());

        let result = self.generate(&request).await?;
        let text = result.response.clone();
        Ok(Structured::parse(result, &text))
    }

    /// Stream a completion constrained to `T`'s schema, then parse it
    pub async fn generate_structured_with<T, F>(
        &self,
        request: &GenerateRequest,
        on_chunk: F,
    ) -> Result<Structured<GenerateResult, T>>
    where
        T: StructuredOutput,
        F: FnMut(&GenerateChunk) -> Result<()>,
    {
        let mut request = request.clone();
        request.format = Some(ResponseFormat::for_type::<T>());

        let result = self.generate_with(&request, on_chunk).await?;
        let text = result.response.clone();
        Ok(Structured::parse(result, &text))
    }

    /// Generate in raw mode and dispatch the tool calls found in the output
    ///
    /// `prompt` is sent verbatim; [`Ollama::tool_prompt`] renders one that
    /// advertises the registered tools.
    pub async fn generate_with_tools(
        &self,
        model: &str,
        prompt: &str,
        options: Options,
    ) -> Result<ToolsResult> {
        let request = GenerateRequest::builder(model, prompt)
            .raw(true)
            .options(options)
            .build();

        let model_result = self.generate(&request).await?;
        let tool_results = self.tools().dispatch_all(&model_result.response).await?;

        Ok(ToolsResult {
            model_result,
            tool_results,
        })
    }

    /// Render a raw prompt advertising every described registered tool
    pub async fn tool_prompt(&self, prompt: &str) -> Result<String> {
        ToolPrompt::new(prompt)
            .tools(self.tools().specs().await)
            .render()
    }

    /// Start a generation in the background
    ///
    /// Must be called within a tokio runtime.
    pub fn generate_async(&self, request: GenerateRequest) -> GenerationTask {
        GenerationTask::spawn(self.clone(), request)
    }
}
