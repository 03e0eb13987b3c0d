//! Model management operations

use crate::client::Ollama;
use crate::constants::{paths, TRACING_TARGET_CLIENT};
use crate::converter::to_body;
use crate::error::{serialization_error, upstream_error};
use futures::StreamExt;
use ollama_kit_core::{
    CreateModelRequest, Error, ListModelsResponse, ListRunningResponse, ModelInfo, ModelName,
    ModelSummary, PullProgress, Result, RunningModel, StreamChunk,
};
use reqwest::Method;

impl Ollama {
    /// Check that the server answers.
    ///
    /// Returns `Ok(false)` when the server cannot be reached or answers with
    /// anything but 200.
    pub async fn ping(&self) -> Result<bool> {
        let request = self.request(Method::GET, paths::TAGS)?;
        match self.send(request).await {
            Ok(response) => Ok(response.status == 200),
            Err(Error::Transport { message, .. }) => {
                tracing::debug!(
                    target: TRACING_TARGET_CLIENT,
                    error = %message,
                    "Ping failed"
                );
                Ok(false)
            }
            Err(other) => Err(other),
        }
    }

    /// List models available locally
    pub async fn list_models(&self) -> Result<Vec<ModelSummary>> {
        let request = self.request(Method::GET, paths::TAGS)?;
        let response = self.send(request).await?.error_for_status()?;
        Ok(response.json::<ListModelsResponse>()?.models)
    }

    /// List models currently loaded in memory
    pub async fn list_running(&self) -> Result<Vec<RunningModel>> {
        let request = self.request(Method::GET, paths::PS)?;
        let response = self.send(request).await?.error_for_status()?;
        Ok(response.json::<ListRunningResponse>()?.models)
    }

    /// Show a model's Modelfile, template, parameters and details
    pub async fn show_model(&self, name: &str) -> Result<ModelInfo> {
        let body = to_body(&ModelName::new(name), false)?;
        let request = self.request(Method::POST, paths::SHOW)?.json(body);
        let response = self.send(request).await?.error_for_status()?;
        response.json()
    }

    /// Pull a model from the registry, reporting progress as it streams
    ///
    /// Completes once the server reports `success`.
    pub async fn pull_model<F>(&self, name: &str, mut on_progress: F) -> Result<()>
    where
        F: FnMut(&PullProgress) -> Result<()>,
    {
        let body = to_body(&ModelName::new(name), true)?;
        let mut stream = self.open_stream::<PullProgress>(paths::PULL, body).await?;

        let mut succeeded = false;
        while let Some(progress) = stream.next().await {
            let progress = progress?;
            if self.config().verbose {
                tracing::info!(
                    target: TRACING_TARGET_CLIENT,
                    model = name,
                    status = %progress.status,
                    percent = progress.percent(),
                    "Pulling model"
                );
            } else {
                tracing::trace!(
                    target: TRACING_TARGET_CLIENT,
                    model = name,
                    status = %progress.status,
                    "Pulling model"
                );
            }
            on_progress(&progress)?;
            succeeded = progress.is_done();
        }

        if !succeeded {
            return Err(Error::Decode {
                line: String::new(),
                message: format!("pull of '{name}' ended before success"),
                source: None,
            });
        }
        Ok(())
    }

    /// Create a model from a Modelfile
    ///
    /// The server can answer 200 and still report a failure in the body, so
    /// any body mentioning `error` is treated as one.
    pub async fn create_model(&self, request: &CreateModelRequest) -> Result<()> {
        let body = to_body(request, false)?;
        let http_request = self.request(Method::POST, paths::CREATE)?.json(body);
        let response = self.send(http_request).await?;
        let text = response.text();

        if response.status != 200 || text.contains("error") {
            return Err(upstream_error(response.status, text));
        }

        if self.config().verbose {
            tracing::info!(
                target: TRACING_TARGET_CLIENT,
                model = %request.name,
                response = %text,
                "Model created"
            );
        }
        Ok(())
    }

    /// Delete a model
    ///
    /// Deleting a model that does not exist succeeds.
    pub async fn delete_model(&self, name: &str) -> Result<()> {
        let body = serde_json::to_value(ModelName::new(name))
            .map_err(serialization_error)?;
        let request = self.request(Method::DELETE, paths::DELETE)?.json(body);
        let response = self.send(request).await?;

        if response.status == 404 {
            let text = response.text();
            if text.contains("model") && text.contains("not found") {
                tracing::debug!(
                    target: TRACING_TARGET_CLIENT,
                    model = name,
                    "Model already absent"
                );
                return Ok(());
            }
            return Err(upstream_error(response.status, text));
        }

        response.error_for_status()?;
        tracing::debug!(target: TRACING_TARGET_CLIENT, model = name, "Model deleted");
        Ok(())
    }
}
