//! Tool registry for managing available tools

use crate::handler::ToolHandler;
use crate::parse::parse_tool_calls;
use crate::results::ToolResults;
use crate::TRACING_TARGET_TOOLS;
use ollama_kit_core::{Error, Result, ToolCallSpec, ToolSpec};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

struct RegisteredTool {
    spec: Option<ToolSpec>,
    handler: Arc<dyn ToolHandler>,
}

/// Registry mapping tool names to handlers
///
/// Cloning shares the underlying map. Registering a name that already exists
/// replaces the previous handler; nothing is removed implicitly.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Arc<RwLock<HashMap<String, RegisteredTool>>>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under a name
    pub async fn register(&self, name: impl Into<String>, handler: impl ToolHandler + 'static) {
        self.insert(name.into(), None, Arc::new(handler)).await;
    }

    /// Register a handler together with its definition
    pub async fn register_tool(&self, spec: ToolSpec, handler: impl ToolHandler + 'static) {
        let name = spec.name().to_string();
        self.insert(name, Some(spec), Arc::new(handler)).await;
    }

    async fn insert(&self, name: String, spec: Option<ToolSpec>, handler: Arc<dyn ToolHandler>) {
        let mut tools = self.tools.write().await;
        let replaced = tools
            .insert(name.clone(), RegisteredTool { spec, handler })
            .is_some();

        tracing::debug!(
            target: TRACING_TARGET_TOOLS,
            tool = %name,
            replaced,
            "Registered tool"
        );
    }

    /// Look up the handler for a name
    pub async fn resolve(&self, name: &str) -> Option<Arc<dyn ToolHandler>> {
        let tools = self.tools.read().await;
        tools.get(name).map(|entry| entry.handler.clone())
    }

    /// Remove a tool, returning its handler
    pub async fn remove(&self, name: &str) -> Option<Arc<dyn ToolHandler>> {
        let mut tools = self.tools.write().await;
        tools.remove(name).map(|entry| entry.handler)
    }

    /// Check if a tool exists
    pub async fn contains(&self, name: &str) -> bool {
        let tools = self.tools.read().await;
        tools.contains_key(name)
    }

    /// Registered names, sorted
    pub async fn names(&self) -> Vec<String> {
        let tools = self.tools.read().await;
        let mut names: Vec<String> = tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Definitions of the tools registered with one, sorted by name
    pub async fn specs(&self) -> Vec<ToolSpec> {
        let tools = self.tools.read().await;
        let mut specs: Vec<ToolSpec> = tools
            .values()
            .filter_map(|entry| entry.spec.clone())
            .collect();
        specs.sort_by(|a, b| a.name().cmp(b.name()));
        specs
    }

    /// Get the number of registered tools
    pub async fn len(&self) -> usize {
        let tools = self.tools.read().await;
        tools.len()
    }

    /// Check if the registry is empty
    pub async fn is_empty(&self) -> bool {
        let tools = self.tools.read().await;
        tools.is_empty()
    }

    /// Invoke a single call
    pub async fn invoke(&self, call: &ToolCallSpec) -> Result<Value> {
        let handler = self
            .resolve(&call.name)
            .await
            .ok_or_else(|| Error::ToolNotFound {
                name: call.name.clone(),
            })?;

        Self::run(handler, call).await
    }

    /// Invoke a batch of calls in order.
    ///
    /// Every name is resolved before any handler runs, so an unknown tool
    /// fails the batch with no side effects. A handler error aborts the rest.
    pub async fn dispatch(&self, calls: Vec<ToolCallSpec>) -> Result<ToolResults> {
        let resolved = {
            let tools = self.tools.read().await;
            let mut resolved = Vec::with_capacity(calls.len());
            for call in calls {
                let handler = match tools.get(&call.name) {
                    Some(entry) => entry.handler.clone(),
                    None => {
                        tracing::warn!(
                            target: TRACING_TARGET_TOOLS,
                            tool = %call.name,
                            "Model called an unregistered tool"
                        );
                        return Err(Error::ToolNotFound { name: call.name });
                    }
                };
                resolved.push((call, handler));
            }
            resolved
        };

        let mut results = ToolResults::new();
        for (call, handler) in resolved {
            let output = Self::run(handler, &call).await?;
            results.push(call, output);
        }
        Ok(results)
    }

    /// Parse model output into tool calls and dispatch them
    pub async fn dispatch_all(&self, model_text: &str) -> Result<ToolResults> {
        let calls = parse_tool_calls(model_text)?;
        tracing::debug!(
            target: TRACING_TARGET_TOOLS,
            calls = calls.len(),
            "Dispatching tool calls"
        );
        self.dispatch(calls).await
    }

    async fn run(handler: Arc<dyn ToolHandler>, call: &ToolCallSpec) -> Result<Value> {
        tracing::trace!(
            target: TRACING_TARGET_TOOLS,
            tool = %call.name,
            "Invoking tool"
        );

        handler
            .invoke(call.arguments.clone())
            .await
            .map_err(|e| Error::ToolInvocation {
                name: call.name.clone(),
                source: Box::new(e),
            })
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry").finish_non_exhaustive()
    }
}
