use std::time::Duration;

use anyhow::{anyhow, Result};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use super::config::EmbeddingsConfig;

/// Client for the embeddings deployment used by vector query modes.
pub struct EmbeddingsClient {
    client: Client,
    config: EmbeddingsConfig,
}

impl EmbeddingsClient {
    pub fn new(config: EmbeddingsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(600)) // 10 minutes timeout
            .build()?;

        Ok(Self { client, config })
    }

    /// Embed one query string. The service may return several vectors;
    /// all are passed through to the search payload.
    pub async fn embed(&self, query: &str) -> Result<Vec<Vec<f32>>> {
        let url = format!(
            "{}/openai/deployments/{}/embeddings?api-version={}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.deployment,
            self.config.api_version
        );

        let response = self
            .client
            .post(&url)
            .header("api-key", &self.config.api_key)
            .json(&json!({"input": query}))
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(anyhow!("failed to get embedding: {}", response.status()));
        }

        let body: Value = response.json().await?;
        let data = body
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow!("embedding response missing data array"))?;

        data.iter()
            .map(|item| {
                item.get("embedding")
                    .and_then(Value::as_array)
                    .map(|values| {
                        values
                            .iter()
                            .filter_map(Value::as_f64)
                            .map(|value| value as f32)
                            .collect()
                    })
                    .ok_or_else(|| anyhow!("embedding response missing embedding vector"))
            })
            .collect()
    }
}
