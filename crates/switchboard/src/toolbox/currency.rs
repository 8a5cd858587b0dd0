use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::registry::{required_f64, ToolHandler};
use crate::errors::ToolResult;
use crate::models::tool::Tool;

pub const DEFAULT_EXCHANGE_HOST: &str = "https://api.exchangerate-api.com";

#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    pub host: String,
}

impl ExchangeConfig {
    pub fn new<S: Into<String>>(host: S) -> Self {
        Self { host: host.into() }
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self::new(DEFAULT_EXCHANGE_HOST)
    }
}

/// Converts a USD amount to GBP at the current exchange rate.
///
/// A failing rate lookup produces an `"Error: …"` string result rather
/// than failing the call, so the model can relay the problem.
pub struct UsdToGbp {
    client: Client,
    config: ExchangeConfig,
}

impl UsdToGbp {
    pub fn new(config: ExchangeConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self { client, config })
    }

    async fn fetch_gbp_rate(&self) -> anyhow::Result<f64> {
        let url = format!("{}/v4/latest/USD", self.config.host.trim_end_matches('/'));
        let body: Value = self.client.get(&url).send().await?.json().await?;
        body["rates"]["GBP"]
            .as_f64()
            .ok_or_else(|| anyhow!("rate response missing rates.GBP"))
    }
}

#[async_trait]
impl ToolHandler for UsdToGbp {
    fn descriptor(&self) -> Tool {
        Tool::new(
            "usd_to_gbp",
            "Converts an amount in USD to GBP using the current exchange rate",
            json!({
                "type": "object",
                "properties": {
                    "usd_amount": {
                        "type": "number",
                        "description": "The amount in USD to be converted"
                    }
                },
                "required": ["usd_amount"]
            }),
        )
    }

    async fn call(&self, arguments: Value) -> ToolResult<Value> {
        let usd_amount = required_f64(&arguments, "usd_amount")?;
        match self.fetch_gbp_rate().await {
            Ok(rate) => Ok(json!(usd_amount * rate)),
            Err(e) => Ok(Value::String(format!("Error: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_converts_with_fetched_rate() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/latest/USD"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "rates": {"GBP": 0.5, "EUR": 0.92}
            })))
            .mount(&server)
            .await;

        let handler = UsdToGbp::new(ExchangeConfig::new(server.uri())).unwrap();
        let result = handler.call(json!({"usd_amount": 150.0})).await.unwrap();
        assert_eq!(result, json!(75.0));
    }

    #[tokio::test]
    async fn test_failure_becomes_error_string() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"rates": {}})))
            .mount(&server)
            .await;

        let handler = UsdToGbp::new(ExchangeConfig::new(server.uri())).unwrap();
        let result = handler.call(json!({"usd_amount": 150.0})).await.unwrap();

        let Value::String(text) = result else {
            panic!("expected a string result");
        };
        assert!(text.starts_with("Error:"));
    }
}
