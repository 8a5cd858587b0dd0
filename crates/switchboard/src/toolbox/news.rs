use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tracing::warn;

use super::registry::{required_str, ToolHandler};
use crate::errors::{ToolError, ToolResult};
use crate::models::tool::Tool;

/// Connection settings for the news search endpoint.
#[derive(Debug, Clone)]
pub struct NewsConfig {
    pub endpoint: String,
    pub api_key: String,
}

impl NewsConfig {
    pub fn new<E: Into<String>, K: Into<String>>(endpoint: E, api_key: K) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            endpoint: env::var("BING_SEARCH_ENDPOINT").context("BING_SEARCH_ENDPOINT must be set")?,
            api_key: env::var("BING_SEARCH_KEY").context("BING_SEARCH_KEY must be set")?,
        })
    }
}

/// Fetches the latest news articles mentioning a company. A failing or
/// empty upstream response degrades to an empty article list.
pub struct CompanyNews {
    client: Client,
    config: NewsConfig,
}

impl CompanyNews {
    pub fn new(config: NewsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl ToolHandler for CompanyNews {
    fn descriptor(&self) -> Tool {
        Tool::new(
            "get_latest_company_news",
            "Fetches the latest news articles related to a specified company",
            json!({
                "type": "object",
                "properties": {
                    "company_name": {
                        "type": "string",
                        "description": "The name of the company"
                    }
                },
                "required": ["company_name"]
            }),
        )
    }

    async fn call(&self, arguments: Value) -> ToolResult<Value> {
        let company_name = required_str(&arguments, "company_name")?;

        let response = self
            .client
            .get(&self.config.endpoint)
            .header("Ocp-Apim-Subscription-Key", &self.config.api_key)
            .query(&[("q", company_name.as_str()), ("mkt", "en-US")])
            .send()
            .await
            .map_err(|e| ToolError::ExecutionError(e.to_string()))?;

        if response.status() != StatusCode::OK {
            warn!(status = %response.status(), "news search failed, returning no articles");
            return Ok(json!([]));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ToolError::ExecutionError(e.to_string()))?;

        Ok(body.get("news").cloned().unwrap_or_else(|| json!([])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_returns_news_section() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "Microsoft"))
            .and(header("Ocp-Apim-Subscription-Key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "news": {"value": [{"name": "Quarterly results"}]}
            })))
            .mount(&server)
            .await;

        let handler = CompanyNews::new(NewsConfig::new(server.uri(), "test-key")).unwrap();
        let result = handler
            .call(json!({"company_name": "Microsoft"}))
            .await
            .unwrap();
        assert_eq!(result["value"][0]["name"], "Quarterly results");
    }

    #[tokio::test]
    async fn test_upstream_failure_degrades_to_empty_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let handler = CompanyNews::new(NewsConfig::new(server.uri(), "test-key")).unwrap();
        let result = handler
            .call(json!({"company_name": "Microsoft"}))
            .await
            .unwrap();
        assert_eq!(result, json!([]));
    }
}
