use async_trait::async_trait;
use serde_json::{json, Value};

use super::registry::{required_str, ToolHandler};
use crate::errors::{ToolError, ToolResult};
use crate::models::tool::Tool;
use crate::retrieval::SearchClient;

/// Answers a question from the knowledge base: retrieves the top hits
/// for the question (or its sub-queries) and joins their content into
/// one passage for the model.
pub struct KnowledgeBase {
    search: SearchClient,
}

impl KnowledgeBase {
    pub fn new(search: SearchClient) -> Self {
        Self { search }
    }
}

#[async_trait]
impl ToolHandler for KnowledgeBase {
    fn descriptor(&self) -> Tool {
        Tool::new(
            "get_answer_from_kb",
            "Answer customer query using the data from knowledge base",
            json!({
                "type": "object",
                "properties": {
                    "question": {
                        "type": "string",
                        "description": "customer query to be answered using the knowledge base"
                    }
                },
                "required": ["question"]
            }),
        )
    }

    async fn call(&self, arguments: Value) -> ToolResult<Value> {
        let question = required_str(&arguments, "question")?;
        let hits = self
            .search
            .retrieve(&question)
            .await
            .map_err(|e| ToolError::ExecutionError(e.to_string()))?;

        let combined = hits
            .iter()
            .filter_map(|hit| hit.content.as_deref())
            .collect::<Vec<_>>()
            .join("\n");

        Ok(Value::String(combined))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::{QueryKind, SearchConfig};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn search_client(host: &str) -> SearchClient {
        let config = SearchConfig {
            endpoint: host.to_string(),
            api_key: "test-key".to_string(),
            api_version: "2023-11-01".to_string(),
            index: "kb-index".to_string(),
            query_kind: QueryKind::Simple,
            top_k: 5,
            semantic_configuration: None,
            vector_fields: None,
        };
        SearchClient::new(config, None).unwrap()
    }

    #[tokio::test]
    async fn test_joins_hit_contents() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/indexes/kb-index/docs/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [
                    {"id": "a", "content": "5G needs a compatible device."},
                    {"id": "b", "content": "Coverage maps are online."},
                    {"id": "c"}
                ]
            })))
            .mount(&server)
            .await;

        let handler = KnowledgeBase::new(search_client(&server.uri()));
        let result = handler
            .call(json!({"question": "how do I qualify for 5G?"}))
            .await
            .unwrap();

        assert_eq!(
            result,
            Value::String("5G needs a compatible device.\nCoverage maps are online.".to_string())
        );
    }

    #[tokio::test]
    async fn test_search_failure_fails_the_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let handler = KnowledgeBase::new(search_client(&server.uri()));
        let result = handler.call(json!({"question": "anything"})).await;
        assert!(matches!(result, Err(ToolError::ExecutionError(_))));
    }
}
