use async_trait::async_trait;
use serde_json::Value;

use crate::errors::{ToolError, ToolResult};
use crate::models::tool::Tool;

/// A locally executable capability. The descriptor it owns is the one
/// advertised to the model, so name and dispatch can never diverge.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// The descriptor advertised to the model
    fn descriptor(&self) -> Tool;

    /// Execute the tool with parsed arguments
    async fn call(&self, arguments: Value) -> ToolResult<Value>;
}

/// The ordered set of handlers one assistant exposes.
#[derive(Default)]
pub struct ToolRegistry {
    handlers: Vec<Box<dyn ToolHandler>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Register a handler. Duplicate names are rejected up front rather
    /// than shadowing at dispatch time.
    pub fn register(&mut self, handler: Box<dyn ToolHandler>) -> ToolResult<()> {
        let name = handler.descriptor().name;
        if self
            .handlers
            .iter()
            .any(|existing| existing.descriptor().name == name)
        {
            return Err(ToolError::Internal(format!("duplicate tool name: {}", name)));
        }
        self.handlers.push(handler);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&dyn ToolHandler> {
        self.handlers
            .iter()
            .find(|handler| handler.descriptor().name == name)
            .map(|handler| &**handler)
    }

    /// Descriptors in registration order.
    pub fn descriptors(&self) -> Vec<Tool> {
        self.handlers
            .iter()
            .map(|handler| handler.descriptor())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Extract a required string argument.
pub(crate) fn required_str(arguments: &Value, key: &str) -> ToolResult<String> {
    arguments
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ToolError::InvalidParameters(format!("missing string argument '{}'", key)))
}

/// Extract a required numeric argument.
pub(crate) fn required_f64(arguments: &Value, key: &str) -> ToolResult<f64> {
    arguments
        .get(key)
        .and_then(Value::as_f64)
        .ok_or_else(|| ToolError::InvalidParameters(format!("missing number argument '{}'", key)))
}
