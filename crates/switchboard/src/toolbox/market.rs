use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use super::registry::{required_str, ToolHandler};
use crate::errors::{ToolError, ToolResult};
use crate::models::tool::Tool;

pub const DEFAULT_QUOTE_HOST: &str = "https://query1.finance.yahoo.com";

#[derive(Debug, Clone)]
pub struct QuoteConfig {
    pub host: String,
}

impl QuoteConfig {
    pub fn new<S: Into<String>>(host: S) -> Self {
        Self { host: host.into() }
    }
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self::new(DEFAULT_QUOTE_HOST)
    }
}

/// Fetches the latest market price for a ticker symbol from a
/// Yahoo-style chart endpoint.
pub struct StockPrice {
    client: Client,
    config: QuoteConfig,
}

impl StockPrice {
    pub fn new(config: QuoteConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl ToolHandler for StockPrice {
    fn descriptor(&self) -> Tool {
        Tool::new(
            "get_stock_price",
            "Retrieve the latest closing price of a stock using its ticker symbol",
            json!({
                "type": "object",
                "properties": {
                    "symbol": {
                        "type": "string",
                        "description": "The ticker symbol of the stock"
                    }
                },
                "required": ["symbol"]
            }),
        )
    }

    async fn call(&self, arguments: Value) -> ToolResult<Value> {
        let symbol = required_str(&arguments, "symbol")?;
        let url = format!(
            "{}/v8/finance/chart/{}",
            self.config.host.trim_end_matches('/'),
            symbol
        );

        let response = self
            .client
            .get(&url)
            .query(&[("range", "1d"), ("interval", "1d")])
            .send()
            .await
            .map_err(|e| ToolError::ExecutionError(e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(ToolError::ExecutionError(format!(
                "quote request failed: {}",
                response.status()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ToolError::ExecutionError(e.to_string()))?;

        let price = body["chart"]["result"][0]["meta"]["regularMarketPrice"]
            .as_f64()
            .ok_or_else(|| ToolError::ExecutionError("quote response missing price".to_string()))?;

        Ok(json!(price))
    }
}
