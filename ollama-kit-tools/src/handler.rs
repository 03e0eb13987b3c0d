//! Tool handler trait and closure-backed implementations

use crate::error::{Result, ToolError};
use async_trait::async_trait;
use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::future::Future;
use std::sync::Arc;

/// Arguments passed to a tool, keyed by parameter name
pub type Arguments = Map<String, Value>;

/// Type alias for async tool functions
pub type AsyncToolFunction =
    Arc<dyn Fn(Arguments) -> BoxFuture<'static, Result<Value>> + Send + Sync>;

/// Something the registry can invoke when the model calls a tool
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Run the tool with the parsed arguments
    async fn invoke(&self, arguments: Arguments) -> Result<Value>;
}

/// A handler backed by a closure
#[derive(Clone)]
pub struct FunctionHandler {
    func: AsyncToolFunction,
}

impl FunctionHandler {
    /// Create from an already boxed async function
    pub fn new(func: AsyncToolFunction) -> Self {
        Self { func }
    }

    /// Create from a synchronous function
    pub fn from_fn<F>(func: F) -> Self
    where
        F: Fn(Arguments) -> Result<Value> + Send + Sync + 'static,
    {
        let func = Arc::new(func);
        Self::new(Arc::new(move |args| {
            let func = func.clone();
            Box::pin(async move { func(args) })
        }))
    }

    /// Create from an async function
    pub fn from_async<F, Fut>(func: F) -> Self
    where
        F: Fn(Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        Self::new(Arc::new(move |args| Box::pin(func(args))))
    }

    /// Create from a function over typed arguments and return value
    ///
    /// Arguments are deserialized from the argument map; a mismatch fails
    /// with [`ToolError::InvalidArguments`] before the function runs.
    pub fn typed<A, R, F>(func: F) -> Self
    where
        A: DeserializeOwned,
        R: Serialize,
        F: Fn(A) -> Result<R> + Send + Sync + 'static,
    {
        Self::from_fn(move |args| {
            let args: A = serde_json::from_value(Value::Object(args)).map_err(|e| {
                ToolError::InvalidArguments {
                    message: e.to_string(),
                    source: Some(e),
                }
            })?;
            Ok(serde_json::to_value(func(args)?)?)
        })
    }
}

#[async_trait]
impl ToolHandler for FunctionHandler {
    async fn invoke(&self, arguments: Arguments) -> Result<Value> {
        (self.func)(arguments).await
    }
}

impl std::fmt::Debug for FunctionHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionHandler").finish_non_exhaustive()
    }
}
