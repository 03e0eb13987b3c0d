//! Image helpers for multimodal requests
//!
//! Ollama takes images as base64 strings in the `images` field of generate
//! requests and chat messages.

use crate::client::Ollama;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use ollama_kit_core::Result;
use reqwest::header::HeaderMap;
use reqwest::Method;
use std::path::Path;
use url::Url;

/// Encode raw image bytes
pub fn encode_bytes(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Read and encode an image file
pub async fn encode_file(path: impl AsRef<Path>) -> Result<String> {
    let bytes = tokio::fs::read(path).await?;
    Ok(encode_bytes(&bytes))
}

impl Ollama {
    /// Download an image and encode it
    ///
    /// The image is fetched without the client's credentials.
    pub async fn fetch_image(&self, url: &str) -> Result<String> {
        let url = Url::parse(url).map_err(|e| {
            ollama_kit_core::Error::Configuration(format!("Invalid image URL '{url}': {e}"))
        })?;
        let request = crate::http::HttpRequest::new(Method::GET, url, HeaderMap::new());
        let response = self.send(request).await?.error_for_status()?;
        Ok(encode_bytes(&response.body))
    }
}
