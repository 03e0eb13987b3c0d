//! Generation options

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form model options sent as the `options` object
///
/// Ollama accepts any Modelfile parameter here, so the map is open-ended.
/// [`OptionsBuilder`] covers the common keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options(Map<String, Value>);

impl Options {
    /// Create empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new options builder
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::default()
    }

    /// Set an arbitrary option
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Look up an option
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether no option is set
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The underlying map
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Options {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Builder for [`Options`]
#[derive(Default)]
pub struct OptionsBuilder {
    options: Options,
}

impl OptionsBuilder {
    /// Set temperature
    pub fn temperature(self, temperature: f32) -> Self {
        self.custom("temperature", temperature)
    }

    /// Set top-p
    pub fn top_p(self, p: f32) -> Self {
        self.custom("top_p", p)
    }

    /// Set top-k
    pub fn top_k(self, k: u32) -> Self {
        self.custom("top_k", k)
    }

    /// Set the random seed
    pub fn seed(self, seed: u64) -> Self {
        self.custom("seed", seed)
    }

    /// Set the context window size
    pub fn num_ctx(self, tokens: u32) -> Self {
        self.custom("num_ctx", tokens)
    }

    /// Set the maximum number of tokens to predict
    pub fn num_predict(self, tokens: i32) -> Self {
        self.custom("num_predict", tokens)
    }

    /// Set the repeat penalty
    pub fn repeat_penalty(self, penalty: f32) -> Self {
        self.custom("repeat_penalty", penalty)
    }

    /// Set stop sequences
    pub fn stop(self, sequences: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let stop: Vec<String> = sequences.into_iter().map(Into::into).collect();
        self.custom("stop", stop)
    }

    /// Set any other option by name
    pub fn custom(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key, value);
        self
    }

    /// Build the options
    pub fn build(self) -> Options {
        self.options
    }
}
