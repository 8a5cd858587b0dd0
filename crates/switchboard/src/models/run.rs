use serde::{Deserialize, Serialize};

use super::tool::ToolCall;

/// Server-side status of a run. The remote service owns the state machine;
/// the driver only reacts to what it reads back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Completed,
    Failed,
    Cancelled,
    /// Any status string this client does not recognize.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Run {
    pub id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub required_action: Option<RequiredAction>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequiredAction {
    pub submit_tool_outputs: SubmitToolOutputs,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitToolOutputs {
    pub tool_calls: Vec<RequestedCall>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestedCall {
    pub id: String,
    pub function: RequestedFunction,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestedFunction {
    pub name: String,
    pub arguments: String,
}

impl Run {
    /// The pending calls of a `requires_action` run, in the order the
    /// service issued them. Empty for every other status.
    pub fn pending_tool_calls(&self) -> Vec<ToolCall> {
        self.required_action
            .as_ref()
            .map(|action| {
                action
                    .submit_tool_outputs
                    .tool_calls
                    .iter()
                    .map(|call| {
                        ToolCall::new(&call.id, &call.function.name, &call.function.arguments)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}
