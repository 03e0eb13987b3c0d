//! The Ollama client

use crate::accumulator::accumulate;
use crate::config::OllamaConfig;
use crate::constants::TRACING_TARGET_CLIENT;
use crate::http::{HttpClient, HttpRequest, HttpResponse, ReqwestClient};
use crate::ndjson::ChunkStream;
use crate::parser::decode_record;
use ollama_kit_core::{Error, Result, StreamAccumulator, StreamChunk, ToolSpec};
use ollama_kit_tools::{ToolHandler, ToolRegistry};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Client for an Ollama server
///
/// Cheap to clone; clones share the HTTP connection pool and the tool
/// registry.
#[derive(Clone)]
pub struct Ollama {
    config: Arc<OllamaConfig>,
    http: Arc<dyn HttpClient>,
    headers: HeaderMap,
    tools: ToolRegistry,
}

impl Ollama {
    /// Create a client for the default local server
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a client from a configuration
    pub fn with_config(config: OllamaConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }

    /// Create a client for the server named by `OLLAMA_HOST`
    pub fn from_env() -> Result<Self> {
        Self::with_config(OllamaConfig::from_env()?)
    }

    /// Create a new client builder
    pub fn builder() -> OllamaBuilder {
        OllamaBuilder::default()
    }

    /// The client configuration
    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    /// The tool registry used by [`Ollama::generate_with_tools`]
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Register a tool with its definition
    pub async fn register_tool(&self, spec: ToolSpec, handler: impl ToolHandler + 'static) {
        self.tools.register_tool(spec, handler).await;
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url> {
        self.config.endpoint(path)
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> Result<HttpRequest> {
        Ok(HttpRequest::new(method, self.endpoint(path)?, self.headers.clone()))
    }

    pub(crate) async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.http.send(request).await
    }

    /// Send a buffered request and fold its single record into an accumulator
    pub(crate) async fn run_sync<T: StreamChunk>(
        &self,
        path: &str,
        body: Value,
    ) -> Result<(StreamAccumulator, u16, Duration)> {
        let started = Instant::now();
        let request = self.request(Method::POST, path)?.json(body);

        let response = self.http.send(request).await?.error_for_status()?;
        let chunk: T = decode_record(&response.text(), response.status)?;

        let mut acc = StreamAccumulator::new();
        acc.push(&chunk)?;
        acc.ensure_done()?;

        let elapsed = started.elapsed();
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            endpoint = path,
            status = response.status,
            elapsed_ms = elapsed.as_millis() as u64,
            "Request completed"
        );
        Ok((acc, response.status, elapsed))
    }

    /// Open a streamed request and return its decoded chunks
    pub(crate) async fn open_stream<T: StreamChunk>(
        &self,
        path: &str,
        body: Value,
    ) -> Result<ChunkStream<T>> {
        let request = self.request(Method::POST, path)?.json(body);
        let response = self.http.send_stream(request).await?;

        tracing::trace!(
            target: TRACING_TARGET_CLIENT,
            endpoint = path,
            status = response.status,
            "Stream opened"
        );
        Ok(ChunkStream::new(response.body, response.status))
    }

    /// Stream a request to completion, calling `on_chunk` for every chunk
    pub(crate) async fn run_streamed<T, F>(
        &self,
        path: &str,
        body: Value,
        on_chunk: F,
    ) -> Result<(StreamAccumulator, u16, Duration)>
    where
        T: StreamChunk,
        F: FnMut(&T) -> Result<()>,
    {
        let started = Instant::now();
        let stream = self.open_stream::<T>(path, body).await?;
        let status = stream.status();

        let acc = accumulate(stream, on_chunk).await?;

        let elapsed = started.elapsed();
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            endpoint = path,
            status,
            chunks = acc.chunk_count(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Stream completed"
        );
        Ok((acc, status, elapsed))
    }
}

impl std::fmt::Debug for Ollama {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ollama")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Ollama`]
#[derive(Default)]
pub struct OllamaBuilder {
    config: Option<OllamaConfig>,
    http_client: Option<Arc<dyn HttpClient>>,
    tools: Option<ToolRegistry>,
}

impl OllamaBuilder {
    /// Set the configuration
    pub fn config(mut self, config: OllamaConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use a custom HTTP client
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Share an existing tool registry
    pub fn tool_registry(mut self, tools: ToolRegistry) -> Self {
        self.tools = Some(tools);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<Ollama> {
        let config = self.config.unwrap_or_default();

        let http: Arc<dyn HttpClient> = match self.http_client {
            Some(client) => client,
            None => Arc::new(ReqwestClient::from_config(&config)?),
        };

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(auth) = config.credentials.authorization_header() {
            let mut value = HeaderValue::from_str(&auth)
                .map_err(|e| Error::Configuration(format!("Invalid credentials: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            base_url = %config.base_url,
            "Ollama client created"
        );

        Ok(Ollama {
            config: Arc::new(config),
            http,
            headers,
            tools: self.tools.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credentials;

    #[test]
    fn test_builder_defaults() {
        let client = Ollama::new().unwrap();
        assert_eq!(client.config().base_url().as_str(), "http://localhost:11434/");
        assert!(client.headers.get(AUTHORIZATION).is_none());
        assert_eq!(
            client.endpoint("api/tags").unwrap().as_str(),
            "http://localhost:11434/api/tags"
        );
    }

    #[test]
    fn test_basic_auth_header() {
        let config = OllamaConfig::builder()
            .credentials(Credentials::basic("user", "pass"))
            .build()
            .unwrap();
        let client = Ollama::with_config(config).unwrap();

        let header = client.headers.get(AUTHORIZATION).unwrap();
        assert!(header.is_sensitive());
        assert_eq!(header.to_str().unwrap(), "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn test_invalid_credentials() {
        let config = OllamaConfig::builder()
            .credentials(Credentials::bearer("bad\ntoken"))
            .build()
            .unwrap();
        assert!(matches!(
            Ollama::with_config(config),
            Err(Error::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_clones_share_tools() {
        use ollama_kit_tools::FunctionHandler;

        let client = Ollama::new().unwrap();
        let clone = client.clone();
        clone
            .register_tool(
                ToolSpec::function("now", "Current time", serde_json::json!({})),
                FunctionHandler::from_fn(|_| Ok(Value::Null)),
            )
            .await;
        assert!(client.tools().contains("now").await);
    }
}
