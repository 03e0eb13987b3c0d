//! Model management types

use crate::types::stream::StreamChunk;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Family and quantization details of a model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelDetails {
    /// Model this one was derived from
    #[serde(default)]
    pub parent_model: String,
    /// Weights format, e.g. `gguf`
    #[serde(default)]
    pub format: String,
    /// Primary family
    #[serde(default)]
    pub family: String,
    /// All families
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub families: Option<Vec<String>>,
    /// Parameter count, e.g. `8.0B`
    #[serde(default)]
    pub parameter_size: String,
    /// Quantization, e.g. `Q4_0`
    #[serde(default)]
    pub quantization_level: String,
}

/// A locally available model, as listed by `/api/tags`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    /// Model name including tag
    pub name: String,
    /// Model identifier
    #[serde(default)]
    pub model: String,
    /// Last modification time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
    /// Size on disk in bytes
    #[serde(default)]
    pub size: u64,
    /// Content digest
    #[serde(default)]
    pub digest: String,
    /// Model details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ModelDetails>,
}

/// Response body of `/api/tags`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListModelsResponse {
    /// Available models
    #[serde(default)]
    pub models: Vec<ModelSummary>,
}

/// A model currently loaded in memory, as listed by `/api/ps`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunningModel {
    /// Model name including tag
    pub name: String,
    /// Model identifier
    #[serde(default)]
    pub model: String,
    /// Size in bytes
    #[serde(default)]
    pub size: u64,
    /// Content digest
    #[serde(default)]
    pub digest: String,
    /// Model details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ModelDetails>,
    /// When the model will be unloaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Bytes resident in VRAM
    #[serde(default)]
    pub size_vram: u64,
}

/// Response body of `/api/ps`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListRunningResponse {
    /// Loaded models
    #[serde(default)]
    pub models: Vec<RunningModel>,
}

/// Response body of `/api/show`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// License text
    #[serde(default)]
    pub license: String,
    /// Modelfile source
    #[serde(default)]
    pub modelfile: String,
    /// Parameter lines from the Modelfile
    #[serde(default)]
    pub parameters: String,
    /// Prompt template
    #[serde(default)]
    pub template: String,
    /// System message
    #[serde(default)]
    pub system: String,
    /// Model details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ModelDetails>,
    /// Architecture-specific metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_info: Option<Map<String, Value>>,
    /// Last modification time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

/// One progress record streamed by `/api/pull`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullProgress {
    /// Human-readable status, `"success"` on completion
    pub status: String,
    /// Layer digest being downloaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    /// Total bytes of the layer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    /// Bytes downloaded so far
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<u64>,
}

impl PullProgress {
    /// Completion percentage of the current layer
    pub fn percent(&self) -> Option<f64> {
        match (self.completed, self.total) {
            (Some(done), Some(total)) if total > 0 => Some(done as f64 * 100.0 / total as f64),
            _ => None,
        }
    }
}

impl StreamChunk for PullProgress {
    fn text(&self) -> &str {
        &self.status
    }

    fn is_done(&self) -> bool {
        self.status == "success"
    }
}

/// Request body for `/api/create`
///
/// Either the Modelfile contents or a server-side path to one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateModelRequest {
    /// Name of the model to create
    pub name: String,
    /// Modelfile contents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modelfile: Option<String>,
    /// Path to a Modelfile on the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl CreateModelRequest {
    /// Create from Modelfile contents
    pub fn from_modelfile(name: impl Into<String>, modelfile: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modelfile: Some(modelfile.into()),
            path: None,
        }
    }

    /// Create from a Modelfile path on the server
    pub fn from_path(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modelfile: None,
            path: Some(path.into()),
        }
    }
}

/// Body sent to the name-addressed endpoints (`show`, `pull`, `delete`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelName {
    /// Model name including tag
    pub name: String,
}

impl ModelName {
    /// Wrap a model name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
