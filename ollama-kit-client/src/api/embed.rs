//! Embedding operations

use crate::client::Ollama;
use crate::constants::{paths, TRACING_TARGET_CLIENT};
use crate::error::serialization_error;
use ollama_kit_core::{
    EmbedRequest, EmbedResponse, EmbeddingsRequest, EmbeddingsResponse, Options, Result,
};
use reqwest::Method;

impl Ollama {
    /// Embed one or more inputs with `/api/embed`
    pub async fn embed(&self, request: &EmbedRequest) -> Result<EmbedResponse> {
        let body = serde_json::to_value(request).map_err(serialization_error)?;
        let http_request = self.request(Method::POST, paths::EMBED)?.json(body);
        let response: EmbedResponse = self.send(http_request).await?.error_for_status()?.json()?;

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            model = %request.model,
            vectors = response.embeddings.len(),
            "Embedding completed"
        );
        Ok(response)
    }

    /// Embed a single prompt with the legacy `/api/embeddings` endpoint
    pub async fn embeddings(&self, model: &str, prompt: &str) -> Result<Vec<f64>> {
        let request = EmbeddingsRequest {
            model: model.to_string(),
            prompt: prompt.to_string(),
            options: Options::default(),
        };
        let body = serde_json::to_value(&request).map_err(serialization_error)?;
        let http_request = self.request(Method::POST, paths::EMBEDDINGS)?.json(body);
        let response: EmbeddingsResponse =
            self.send(http_request).await?.error_for_status()?.json()?;
        Ok(response.embedding)
    }
}
