use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use super::config::AssistantsConfig;
use crate::models::message::{MessageList, ThreadMessage};
use crate::models::run::Run;
use crate::models::tool::{Tool, ToolOutput};

/// The operations the run driver consumes from the conversation service.
///
/// The HTTP client below is the real implementation; tests script a mock.
#[async_trait]
pub trait AssistantsApi: Send + Sync {
    /// Create an assistant advertising the given tool set; returns its id.
    async fn create_assistant(
        &self,
        name: &str,
        instructions: &str,
        tools: &[Tool],
    ) -> Result<String>;

    /// Create a conversation thread; returns its id.
    async fn create_thread(&self) -> Result<String>;

    /// Append a user message to a thread.
    async fn add_user_message(&self, thread_id: &str, content: &str) -> Result<()>;

    /// Start a run of the assistant against a thread.
    async fn create_run(&self, thread_id: &str, assistant_id: &str, instructions: &str)
        -> Result<Run>;

    /// Fetch the current authoritative state of a run.
    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run>;

    /// List the messages of a thread, newest first.
    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>>;

    /// Submit one batch of outputs for a `requires_action` run.
    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<()>;
}

pub struct AssistantsClient {
    client: Client,
    config: AssistantsConfig,
}

impl AssistantsClient {
    pub fn new(config: AssistantsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(600)) // 10 minutes timeout
            .build()?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/openai/{}?api-version={}",
            self.config.endpoint.trim_end_matches('/'),
            path,
            self.config.api_version
        )
    }

    async fn post(&self, path: &str, payload: Value) -> Result<Value> {
        let response = self
            .client
            .post(self.url(path))
            .header("api-key", &self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        Self::read_json(response).await
    }

    async fn get(&self, path: &str) -> Result<Value> {
        let response = self
            .client
            .get(self.url(path))
            .header("api-key", &self.config.api_key)
            .send()
            .await?;

        Self::read_json(response).await
    }

    async fn read_json(response: reqwest::Response) -> Result<Value> {
        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            status if status == StatusCode::TOO_MANY_REQUESTS || status.as_u16() >= 500 => {
                Err(anyhow!("Server error: {}", status))
            }
            status => Err(anyhow!("Request failed: {}", status)),
        }
    }
}

fn id_from(body: &Value) -> Result<String> {
    body.get("id")
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or_else(|| anyhow!("response missing id: {}", body))
}

/// Convert tool descriptors to the service's function-tool specification.
fn tools_to_api_spec(tools: &[Tool]) -> Vec<Value> {
    tools
        .iter()
        .map(|tool| {
            json!({
                "type": "function",
                "function": {
                    "name": tool.name,
                    "description": tool.description,
                    "parameters": tool.parameters,
                }
            })
        })
        .collect()
}

#[async_trait]
impl AssistantsApi for AssistantsClient {
    async fn create_assistant(
        &self,
        name: &str,
        instructions: &str,
        tools: &[Tool],
    ) -> Result<String> {
        let body = self
            .post(
                "assistants",
                json!({
                    "name": name,
                    "instructions": instructions,
                    "model": self.config.model,
                    "tools": tools_to_api_spec(tools),
                }),
            )
            .await?;
        id_from(&body)
    }

    async fn create_thread(&self) -> Result<String> {
        let body = self.post("threads", json!({})).await?;
        id_from(&body)
    }

    async fn add_user_message(&self, thread_id: &str, content: &str) -> Result<()> {
        self.post(
            &format!("threads/{}/messages", thread_id),
            json!({"role": "user", "content": content}),
        )
        .await?;
        Ok(())
    }

    async fn create_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
        instructions: &str,
    ) -> Result<Run> {
        let body = self
            .post(
                &format!("threads/{}/runs", thread_id),
                json!({"assistant_id": assistant_id, "instructions": instructions}),
            )
            .await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        let body = self
            .get(&format!("threads/{}/runs/{}", thread_id, run_id))
            .await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>> {
        let body = self.get(&format!("threads/{}/messages", thread_id)).await?;
        let list: MessageList = serde_json::from_value(body)?;
        Ok(list.data)
    }

    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<()> {
        self.post(
            &format!("threads/{}/runs/{}/submit_tool_outputs", thread_id, run_id),
            json!({"tool_outputs": outputs}),
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::run::RunStatus;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(host: &str) -> AssistantsConfig {
        AssistantsConfig::new(host, "test-key", "2024-02-15-preview", "gpt-35-turbo-16k")
    }

    #[tokio::test]
    async fn test_create_assistant_sends_tool_spec() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/openai/assistants"))
            .and(query_param("api-version", "2024-02-15-preview"))
            .and(body_partial_json(json!({
                "model": "gpt-35-turbo-16k",
                "tools": [{"type": "function", "function": {"name": "get_promotions"}}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "asst_1"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = AssistantsClient::new(test_config(&server.uri())).unwrap();
        let tool = Tool::new(
            "get_promotions",
            "Get the sales promotions for the customer",
            json!({"type": "object", "properties": {}}),
        );
        let id = client
            .create_assistant("Chat Assistant", "You are a personal Chat Assistant", &[tool])
            .await
            .unwrap();
        assert_eq!(id, "asst_1");
    }

    #[tokio::test]
    async fn test_get_run_parses_pending_calls() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/openai/threads/thread_1/runs/run_1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "run_1",
                "status": "requires_action",
                "required_action": {
                    "type": "submit_tool_outputs",
                    "submit_tool_outputs": {
                        "tool_calls": [{
                            "id": "call_1",
                            "type": "function",
                            "function": {"name": "get_stock_price", "arguments": "{\"symbol\": \"MSFT\"}"}
                        }]
                    }
                }
            })))
            .mount(&server)
            .await;

        let client = AssistantsClient::new(test_config(&server.uri())).unwrap();
        let run = client.get_run("thread_1", "run_1").await.unwrap();
        assert_eq!(run.status, RunStatus::RequiresAction);
        let calls = run.pending_tool_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "get_stock_price");
    }

    #[tokio::test]
    async fn test_submit_tool_outputs_posts_batch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/openai/threads/thread_1/runs/run_1/submit_tool_outputs"))
            .and(body_partial_json(json!({
                "tool_outputs": [{"tool_call_id": "call_1", "output": "42"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "run_1", "status": "queued"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = AssistantsClient::new(test_config(&server.uri())).unwrap();
        let outputs = vec![ToolOutput {
            tool_call_id: "call_1".to_string(),
            output: "42".to_string(),
        }];
        client
            .submit_tool_outputs("thread_1", "run_1", &outputs)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/openai/threads"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = AssistantsClient::new(test_config(&server.uri())).unwrap();
        let result = client.create_thread().await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Server error: 500"));
    }

    #[tokio::test]
    async fn test_request_failed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/openai/threads/thread_1/messages"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = AssistantsClient::new(test_config(&server.uri())).unwrap();
        let result = client.list_messages("thread_1").await;
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Request failed: 404"));
    }
}
