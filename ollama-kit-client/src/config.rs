//! Ollama client configuration

use crate::config_builder::OllamaConfigBuilder;
use crate::constants::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT, OLLAMA_DEFAULT_BASE_URL, OLLAMA_DEFAULT_PORT,
    OLLAMA_HOST_ENV,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use ollama_kit_core::{Error, Result};
use std::fmt;
use std::time::Duration;
use url::Url;

/// Authentication credentials for the Ollama server
///
/// Local servers usually need none; servers behind a reverse proxy often
/// use basic auth.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Credentials {
    /// No authentication
    #[default]
    None,
    /// HTTP basic authentication
    Basic {
        /// User name
        username: String,
        /// Password
        password: String,
    },
    /// Bearer token authentication
    Bearer(String),
}

impl Credentials {
    /// Create basic authentication credentials
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Create bearer token credentials
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer(token.into())
    }

    /// Value of the `Authorization` header, if any
    pub fn authorization_header(&self) -> Option<String> {
        match self {
            Credentials::None => None,
            Credentials::Basic { username, password } => Some(format!(
                "Basic {}",
                STANDARD.encode(format!("{username}:{password}"))
            )),
            Credentials::Bearer(token) => Some(format!("Bearer {token}")),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::None => f.write_str("None"),
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Credentials::Bearer(_) => f.debug_tuple("Bearer").field(&"<redacted>").finish(),
        }
    }
}

/// Configuration for the Ollama client
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub(crate) base_url: Url,
    /// Timeout for a buffered request end to end.
    ///
    /// Streamed calls only wait this long for the response headers; the body
    /// may keep streaming for as long as the server sends chunks.
    pub request_timeout: Duration,
    /// Timeout for establishing a connection
    pub connect_timeout: Duration,
    /// User agent sent with every request
    pub user_agent: String,
    /// Authentication
    pub credentials: Credentials,
    /// Log server progress (model pulls, create output) at info level
    pub verbose: bool,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: Self::default_user_agent(),
            credentials: Credentials::None,
            verbose: true,
        }
    }
}

impl OllamaConfig {
    /// Create a new configuration builder
    pub fn builder() -> OllamaConfigBuilder {
        OllamaConfigBuilder::new()
    }

    /// Configuration for a server at `url`, other settings default
    pub fn with_base_url(url: &str) -> Result<Self> {
        Self::builder().base_url(url).build()
    }

    /// Configuration from the `OLLAMA_HOST` environment variable.
    ///
    /// Accepts the same forms as the Ollama CLI: a full URL, `host:port`, or
    /// a bare host. Falls back to the default address when unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var(OLLAMA_HOST_ENV) {
            Ok(host) if !host.trim().is_empty() => Self::with_base_url(&host_to_url(host.trim())),
            _ => Ok(Self::default()),
        }
    }

    /// Base URL of the server; its path always ends with `/`
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an API path against the base URL
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| Error::Configuration(format!("Invalid endpoint '{path}': {e}")))
    }

    pub(crate) fn default_base_url() -> Url {
        Url::parse(OLLAMA_DEFAULT_BASE_URL).expect("Valid default URL")
    }

    pub(crate) fn default_user_agent() -> String {
        format!("ollama-kit/{}", env!("CARGO_PKG_VERSION"))
    }
}

/// Parse a base URL, normalizing its path to end with exactly one `/`
pub(crate) fn parse_base_url(url: &str) -> Result<Url> {
    let mut parsed = Url::parse(url.trim())
        .map_err(|e| Error::Configuration(format!("Invalid base URL '{url}': {e}")))?;

    if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::Configuration(format!(
            "Invalid base URL '{url}': expected an http(s) URL"
        )));
    }

    let path = format!("{}/", parsed.path().trim_end_matches('/'));
    parsed.set_path(&path);
    Ok(parsed)
}

fn host_to_url(host: &str) -> String {
    if host.contains("://") {
        return host.to_string();
    }
    if host.contains(':') {
        format!("http://{host}")
    } else {
        format!("http://{host}:{OLLAMA_DEFAULT_PORT}")
    }
}
