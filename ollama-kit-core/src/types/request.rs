//! Request types for generate and chat calls
//!
//! Requests are plain data. The streaming flag is not part of them: the
//! client decides it per call and writes it into the wire body.

use crate::types::message::ChatMessage;
use crate::types::options::Options;
use crate::types::structured::ResponseFormat;
use crate::types::tool::ToolSpec;
use serde::{Deserialize, Serialize};

/// A request to `/api/generate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Model name, e.g. `llama3:8b`
    pub model: String,
    /// The prompt to complete
    pub prompt: String,
    /// Text after the model response (fill-in-the-middle)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    /// Base64-encoded images for multimodal models
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    /// System message overriding the Modelfile's
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// Prompt template overriding the Modelfile's
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Context returned by a previous generate call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Vec<i64>>,
    /// Send the prompt without any template applied
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub raw: bool,
    /// Expected response format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ResponseFormat>,
    /// Model options
    #[serde(default, skip_serializing_if = "Options::is_empty")]
    pub options: Options,
    /// How long the model stays loaded after the call, e.g. `"5m"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_alive: Option<String>,
}

impl GenerateRequest {
    /// Create a request with only a model and a prompt
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            suffix: None,
            images: Vec::new(),
            system: None,
            template: None,
            context: None,
            raw: false,
            format: None,
            options: Options::default(),
            keep_alive: None,
        }
    }

    /// Create a new request builder
    pub fn builder(model: impl Into<String>, prompt: impl Into<String>) -> GenerateRequestBuilder {
        GenerateRequestBuilder {
            request: Self::new(model, prompt),
        }
    }
}

/// Builder for [`GenerateRequest`]
pub struct GenerateRequestBuilder {
    request: GenerateRequest,
}

impl GenerateRequestBuilder {
    /// Set the suffix
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.request.suffix = Some(suffix.into());
        self
    }

    /// Add a base64-encoded image
    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.request.images.push(image.into());
        self
    }

    /// Add several base64-encoded images
    pub fn images(mut self, images: impl IntoIterator<Item = String>) -> Self {
        self.request.images.extend(images);
        self
    }

    /// Set the system message
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.request.system = Some(system.into());
        self
    }

    /// Set the prompt template
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.request.template = Some(template.into());
        self
    }

    /// Continue from a previous call's context
    pub fn context(mut self, context: Vec<i64>) -> Self {
        self.request.context = Some(context);
        self
    }

    /// Enable or disable raw mode
    pub fn raw(mut self, raw: bool) -> Self {
        self.request.raw = raw;
        self
    }

    /// Set the response format
    pub fn format(mut self, format: ResponseFormat) -> Self {
        self.request.format = Some(format);
        self
    }

    /// Set model options
    pub fn options(mut self, options: Options) -> Self {
        self.request.options = options;
        self
    }

    /// Set the keep-alive duration
    pub fn keep_alive(mut self, keep_alive: impl Into<String>) -> Self {
        self.request.keep_alive = Some(keep_alive.into());
        self
    }

    /// Build the request
    pub fn build(self) -> GenerateRequest {
        self.request
    }
}

/// A request to `/api/chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model name
    pub model: String,
    /// Conversation history, oldest first
    pub messages: Vec<ChatMessage>,
    /// Native tool definitions the model may call
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolSpec>,
    /// Expected response format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ResponseFormat>,
    /// Model options
    #[serde(default, skip_serializing_if = "Options::is_empty")]
    pub options: Options,
    /// How long the model stays loaded after the call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_alive: Option<String>,
}

impl ChatRequest {
    /// Create a request from a model and a message history
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            tools: Vec::new(),
            format: None,
            options: Options::default(),
            keep_alive: None,
        }
    }

    /// Create a new request builder
    pub fn builder(model: impl Into<String>) -> ChatRequestBuilder {
        ChatRequestBuilder {
            request: Self::new(model, Vec::new()),
        }
    }

    /// Check if the request offers tools to the model
    pub fn has_tools(&self) -> bool {
        !self.tools.is_empty()
    }
}

/// Builder for [`ChatRequest`]
pub struct ChatRequestBuilder {
    request: ChatRequest,
}

impl ChatRequestBuilder {
    /// Add a message
    pub fn message(mut self, message: ChatMessage) -> Self {
        self.request.messages.push(message);
        self
    }

    /// Add multiple messages
    pub fn messages(mut self, messages: impl IntoIterator<Item = ChatMessage>) -> Self {
        self.request.messages.extend(messages);
        self
    }

    /// Add a system message
    pub fn system(self, content: impl Into<String>) -> Self {
        self.message(ChatMessage::system(content))
    }

    /// Add a user message
    pub fn user(self, content: impl Into<String>) -> Self {
        self.message(ChatMessage::user(content))
    }

    /// Add an assistant message
    pub fn assistant(self, content: impl Into<String>) -> Self {
        self.message(ChatMessage::assistant(content))
    }

    /// Offer a tool to the model
    pub fn tool(mut self, tool: ToolSpec) -> Self {
        self.request.tools.push(tool);
        self
    }

    /// Offer several tools to the model
    pub fn tools(mut self, tools: impl IntoIterator<Item = ToolSpec>) -> Self {
        self.request.tools.extend(tools);
        self
    }

    /// Set the response format
    pub fn format(mut self, format: ResponseFormat) -> Self {
        self.request.format = Some(format);
        self
    }

    /// Set model options
    pub fn options(mut self, options: Options) -> Self {
        self.request.options = options;
        self
    }

    /// Set the keep-alive duration
    pub fn keep_alive(mut self, keep_alive: impl Into<String>) -> Self {
        self.request.keep_alive = Some(keep_alive.into());
        self
    }

    /// Build the request
    pub fn build(self) -> ChatRequest {
        self.request
    }
}
