use std::time::Duration;

use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::assistants::AssistantsApi;
use crate::errors::{DriverError, ToolError};
use crate::models::message::Role;
use crate::models::run::RunStatus;
use crate::models::tool::{ToolCall, ToolOutput};
use crate::toolbox::ToolRegistry;

const DEFAULT_ASSISTANT_NAME: &str = "Chat Assistant";
const DEFAULT_INSTRUCTIONS: &str = "You are a personal Chat Assistant";
const DEFAULT_RUN_INSTRUCTIONS: &str = "Please address the user as Bot.";

/// Polling schedule for a run. The default polls every five seconds
/// with no upper bound; set `max_polls` to turn a stuck run into a
/// `PollLimitExceeded` error instead of waiting forever.
#[derive(Debug, Clone)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_polls: Option<u32>,
}

impl PollPolicy {
    pub fn new(interval: Duration, max_polls: Option<u32>) -> Self {
        Self {
            interval,
            max_polls,
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_polls: None,
        }
    }
}

/// Drives one question through the remote assistant: creates the
/// assistant, thread, and run, then polls the run to completion,
/// dispatching any requested tool calls to the local registry.
pub struct RunDriver {
    api: Box<dyn AssistantsApi>,
    registry: ToolRegistry,
    policy: PollPolicy,
    name: String,
    instructions: String,
    run_instructions: String,
}

impl RunDriver {
    pub fn new(api: Box<dyn AssistantsApi>, registry: ToolRegistry, policy: PollPolicy) -> Self {
        Self {
            api,
            registry,
            policy,
            name: DEFAULT_ASSISTANT_NAME.to_string(),
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
            run_instructions: DEFAULT_RUN_INSTRUCTIONS.to_string(),
        }
    }

    /// Set the assistant's name and system instructions.
    pub fn with_persona<N, I>(mut self, name: N, instructions: I) -> Self
    where
        N: Into<String>,
        I: Into<String>,
    {
        self.name = name.into();
        self.instructions = instructions.into();
        self
    }

    /// Set the per-run instructions.
    pub fn with_run_instructions<S: Into<String>>(mut self, instructions: S) -> Self {
        self.run_instructions = instructions.into();
        self
    }

    /// Ask a single question: one assistant, one thread, one run.
    ///
    /// Any status other than `completed` or `requires_action` (including
    /// `failed` and `cancelled`) waits one extra interval and polls again;
    /// only the poll policy bounds that wait.
    pub async fn ask(&self, question: &str) -> Result<String, DriverError> {
        let assistant_id = self
            .api
            .create_assistant(&self.name, &self.instructions, &self.registry.descriptors())
            .await?;
        let thread_id = self.api.create_thread().await?;
        self.api.add_user_message(&thread_id, question).await?;
        let run_id = self
            .api
            .create_run(&thread_id, &assistant_id, &self.run_instructions)
            .await?
            .id;

        let mut polls = 0u32;
        loop {
            sleep(self.policy.interval).await;
            polls += 1;
            if let Some(max) = self.policy.max_polls {
                if polls > max {
                    return Err(DriverError::PollLimitExceeded(max));
                }
            }

            let run = self.api.get_run(&thread_id, &run_id).await?;
            match run.status {
                RunStatus::Completed => {
                    let messages = self.api.list_messages(&thread_id).await?;
                    return messages
                        .iter()
                        .find(|message| message.role == Role::Assistant)
                        .and_then(|message| message.text().map(str::to_string))
                        .ok_or(DriverError::NoAssistantReply);
                }
                RunStatus::RequiresAction => {
                    let calls = run.pending_tool_calls();
                    let outputs = self.dispatch(&calls).await?;
                    self.api
                        .submit_tool_outputs(&thread_id, &run_id, &outputs)
                        .await?;
                }
                status => {
                    debug!(?status, "run not ready, waiting");
                    sleep(self.policy.interval).await;
                }
            }
        }
    }

    /// Execute a batch of tool calls in order. Every call that resolves
    /// to a registered handler yields exactly one output; a name the
    /// registry does not know is skipped, leaving the batch short.
    pub async fn dispatch(&self, calls: &[ToolCall]) -> Result<Vec<ToolOutput>, ToolError> {
        let mut outputs = Vec::with_capacity(calls.len());
        for call in calls {
            let Some(handler) = self.registry.get(&call.name) else {
                warn!(name = %call.name, "model requested an unregistered tool, skipping");
                continue;
            };

            let arguments = call.parse_arguments().map_err(|e| {
                ToolError::InvalidParameters(format!("tool call {}: {}", call.id, e))
            })?;
            debug!(name = %call.name, %arguments, "invoking tool");

            let result = handler.call(arguments).await?;
            outputs.push(ToolOutput {
                tool_call_id: call.id.clone(),
                output: serialize_output(result),
            });
        }
        Ok(outputs)
    }
}

/// A string result passes through verbatim; anything else is
/// JSON-encoded. Never double-encodes.
fn serialize_output(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}
