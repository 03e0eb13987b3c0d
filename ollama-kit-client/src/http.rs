//! HTTP client abstraction and the reqwest implementation

use crate::config::OllamaConfig;
use crate::error::{transport_error, upstream_error};
use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use ollama_kit_core::{Error, Result};
use reqwest::header::HeaderMap;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::pin::Pin;
use std::time::Duration;
use url::Url;

/// Type alias for response byte streams
pub type ResponseStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// A request handed to an [`HttpClient`]
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL
    pub url: Url,
    /// Headers to send
    pub headers: HeaderMap,
    /// JSON body, if any
    pub body: Option<Value>,
}

impl HttpRequest {
    /// Create a request without a body
    pub fn new(method: Method, url: Url, headers: HeaderMap) -> Self {
        Self {
            method,
            url,
            headers,
            body: None,
        }
    }

    /// Attach a JSON body
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// A fully buffered response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw body
    pub body: Bytes,
}

impl HttpResponse {
    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, lossily decoded
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Turn a non-2xx response into [`Error::Upstream`]
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(upstream_error(self.status, self.text()))
        }
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| Error::decode(self.text(), e))
    }
}

/// A response whose body is consumed incrementally
pub struct StreamingResponse {
    /// HTTP status code
    pub status: u16,
    /// Body bytes as they arrive
    pub body: ResponseStream,
}

impl std::fmt::Debug for StreamingResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// HTTP client abstraction
#[async_trait::async_trait]
pub trait HttpClient: Send + Sync {
    /// Send a request and buffer the whole response, whatever its status
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;

    /// Send a request and stream the response body.
    ///
    /// Non-2xx responses are buffered and returned as [`Error::Upstream`].
    async fn send_stream(&self, request: HttpRequest) -> Result<StreamingResponse>;
}

/// Default HTTP client implementation using reqwest
///
/// The request timeout bounds buffered calls end to end. Streamed calls are
/// only bounded until the response headers arrive, so a long generation or
/// model pull is never cut off while chunks are still coming in.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
    request_timeout: Option<Duration>,
}

impl ReqwestClient {
    /// Create a client with default timeouts
    pub fn new() -> Result<Self> {
        Self::from_config(&OllamaConfig::default())
    }

    /// Create a client honoring the configured timeouts and user agent
    pub fn from_config(config: &OllamaConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(transport_error)?;

        Ok(Self {
            client,
            request_timeout: Some(config.request_timeout),
        })
    }

    /// Wrap an existing reqwest client, keeping its own timeouts
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            request_timeout: None,
        }
    }

    fn prepare(&self, request: HttpRequest) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        builder
    }
}

#[async_trait::async_trait]
impl HttpClient for ReqwestClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self.prepare(request);
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(transport_error)?;
        Ok(HttpResponse { status, body })
    }

    async fn send_stream(&self, request: HttpRequest) -> Result<StreamingResponse> {
        let pending = self.prepare(request).send();
        let response = match self.request_timeout {
            Some(timeout) => tokio::time::timeout(timeout, pending)
                .await
                .map_err(|_| Error::transport(format!("request timed out after {timeout:?}")))?,
            None => pending.await,
        }
        .map_err(transport_error)?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(upstream_error(status.as_u16(), text));
        }

        Ok(StreamingResponse {
            status: status.as_u16(),
            body: Box::pin(response.bytes_stream().map_err(transport_error)),
        })
    }
}
