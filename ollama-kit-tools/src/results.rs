//! Results of a dispatched tool-call batch

use ollama_kit_core::ToolCallSpec;
use serde::Serialize;
use serde_json::Value;

/// The output of one tool call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolOutput {
    /// The call as parsed from model output
    pub call: ToolCallSpec,
    /// What the handler returned
    pub output: Value,
}

/// Outputs of a batch, in the order the model listed the calls
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ToolResults {
    outputs: Vec<ToolOutput>,
}

impl ToolResults {
    /// Create an empty result set
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, call: ToolCallSpec, output: Value) {
        self.outputs.push(ToolOutput { call, output });
    }

    /// Output recorded for exactly this call
    pub fn get(&self, call: &ToolCallSpec) -> Option<&Value> {
        self.outputs
            .iter()
            .find(|entry| &entry.call == call)
            .map(|entry| &entry.output)
    }

    /// Output of the first call to the named tool
    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        self.outputs
            .iter()
            .find(|entry| entry.call.name == name)
            .map(|entry| &entry.output)
    }

    /// Number of calls
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    /// Whether the batch was empty
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// Iterate over outputs in call order
    pub fn iter(&self) -> std::slice::Iter<'_, ToolOutput> {
        self.outputs.iter()
    }

    /// Take the outputs
    pub fn into_vec(self) -> Vec<ToolOutput> {
        self.outputs
    }
}

impl IntoIterator for ToolResults {
    type Item = ToolOutput;
    type IntoIter = std::vec::IntoIter<ToolOutput>;

    fn into_iter(self) -> Self::IntoIter {
        self.outputs.into_iter()
    }
}

impl<'a> IntoIterator for &'a ToolResults {
    type Item = &'a ToolOutput;
    type IntoIter = std::slice::Iter<'a, ToolOutput>;

    fn into_iter(self) -> Self::IntoIter {
        self.outputs.iter()
    }
}
