//! Builder for the client configuration

use crate::config::{parse_base_url, Credentials, OllamaConfig};
use crate::constants::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT};
use ollama_kit_core::{Error, Result};
use std::time::Duration;

/// Builder for [`OllamaConfig`]
#[derive(Debug, Default)]
pub struct OllamaConfigBuilder {
    base_url: Option<String>,
    request_timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    user_agent: Option<String>,
    credentials: Option<Credentials>,
    verbose: Option<bool>,
}

impl OllamaConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Set the connect timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set credentials
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Use HTTP basic authentication
    pub fn basic_auth(self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials(Credentials::basic(username, password))
    }

    /// Enable or disable verbose progress logging
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<OllamaConfig> {
        let base_url = match self.base_url {
            Some(url) => parse_base_url(&url)?,
            None => OllamaConfig::default_base_url(),
        };

        let request_timeout = self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);
        if request_timeout.is_zero() {
            return Err(Error::Configuration(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        let connect_timeout = self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT);
        if connect_timeout.is_zero() {
            return Err(Error::Configuration(
                "Connect timeout must be greater than 0".to_string(),
            ));
        }

        Ok(OllamaConfig {
            base_url,
            request_timeout,
            connect_timeout,
            user_agent: self
                .user_agent
                .unwrap_or_else(OllamaConfig::default_user_agent),
            credentials: self.credentials.unwrap_or_default(),
            verbose: self.verbose.unwrap_or(true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = OllamaConfig::builder()
            .base_url("http://remote-ollama:11434")
            .request_timeout(Duration::from_secs(30))
            .basic_auth("user", "pass")
            .verbose(false)
            .user_agent("tests/1.0")
            .build()
            .unwrap();

        assert_eq!(config.base_url.as_str(), "http://remote-ollama:11434/");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, DEFAULT_CONNECT_TIMEOUT);
        assert_eq!(config.credentials, Credentials::basic("user", "pass"));
        assert_eq!(config.user_agent, "tests/1.0");
        assert!(!config.verbose);
    }

    #[test]
    fn test_validation_zero_timeout() {
        let result = OllamaConfig::builder()
            .request_timeout(Duration::ZERO)
            .build();
        assert!(matches!(result, Err(Error::Configuration(_))));

        let result = OllamaConfig::builder()
            .connect_timeout(Duration::ZERO)
            .build();
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_invalid_base_url() {
        let result = OllamaConfig::builder().base_url("not-a-valid-url").build();
        assert!(result.is_err());
    }
}
