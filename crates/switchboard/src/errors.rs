use serde::{Deserialize, Serialize};
use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug, Clone, Deserialize, Serialize)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Tool execution failed: {0}")]
    ExecutionError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ToolResult<T> = Result<T, ToolError>;

/// Errors surfaced by the run driver while polling a run to completion.
#[derive(Error, Debug)]
pub enum DriverError {
    /// The run completed but the thread held no assistant message.
    #[error("run completed without an assistant reply")]
    NoAssistantReply,

    #[error("run did not reach a terminal status within {0} polls")]
    PollLimitExceeded(u32),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error(transparent)]
    Api(#[from] anyhow::Error),
}
