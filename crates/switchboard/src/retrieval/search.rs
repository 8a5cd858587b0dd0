use std::time::Duration;

use anyhow::{anyhow, Result};
use futures::future::try_join_all;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use super::config::{QueryKind, SearchConfig};
use super::embeddings::EmbeddingsClient;
use super::hit::SearchHit;
use super::merge::round_robin_merge;

/// Client for the search index, fanning a question out over its
/// sub-queries and merging the ranked results.
pub struct SearchClient {
    client: Client,
    config: SearchConfig,
    embeddings: Option<EmbeddingsClient>,
}

impl SearchClient {
    pub fn new(config: SearchConfig, embeddings: Option<EmbeddingsClient>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(600)) // 10 minutes timeout
            .build()?;

        Ok(Self {
            client,
            config,
            embeddings,
        })
    }

    /// Retrieve up to `top_k` hits for a question, which may be a JSON
    /// array of sub-queries. Sub-queries are searched concurrently;
    /// results are collected before merging, so the round-robin order
    /// only depends on sub-query order.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<SearchHit>> {
        let queries = parse_query_list(question);
        let searches = queries.iter().map(|query| self.search_one(query));
        let per_query = try_join_all(searches).await?;

        Ok(round_robin_merge(
            per_query,
            self.config.top_k,
            SearchHit::identity,
        ))
    }

    async fn search_one(&self, query: &str) -> Result<Vec<SearchHit>> {
        let payload = self.build_payload(query).await?;
        let url = format!(
            "{}/indexes/{}/docs/search?api-version={}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.index,
            self.config.api_version
        );

        let response = self
            .client
            .post(&url)
            .header("api-key", &self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(anyhow!(
                "failed to query search index: {}",
                response.status()
            ));
        }

        let body: Value = response.json().await?;
        let docs = body
            .get("value")
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow!("search response missing value array"))?;

        Ok(docs.iter().map(SearchHit::from_document).collect())
    }

    async fn build_payload(&self, query: &str) -> Result<Value> {
        let mut payload = json!({
            "top": self.config.top_k,
            "queryLanguage": "en-us",
        });
        let map = payload.as_object_mut().unwrap();

        match self.config.query_kind {
            QueryKind::Simple => {
                map.insert("search".to_string(), json!(query));
                map.insert("queryType".to_string(), json!("simple"));
            }
            QueryKind::Semantic => {
                map.insert("search".to_string(), json!(query));
                map.insert("queryType".to_string(), json!("semantic"));
                map.insert(
                    "semanticConfiguration".to_string(),
                    json!(self.config.semantic_configuration),
                );
            }
            kind @ (QueryKind::Vector
            | QueryKind::VectorSimpleHybrid
            | QueryKind::VectorSemanticHybrid) => {
                // Vectors are attached only when both the target fields and
                // an embeddings client are configured; otherwise the request
                // falls back to whatever text ranking the mode carries.
                if let (Some(fields), Some(embeddings)) =
                    (&self.config.vector_fields, &self.embeddings)
                {
                    let vectors = embeddings.embed(query).await?;
                    let payload_vectors: Vec<Value> = vectors
                        .iter()
                        .map(|vector| {
                            json!({"value": vector, "fields": fields, "k": self.config.top_k})
                        })
                        .collect();
                    map.insert("vectors".to_string(), json!(payload_vectors));
                }

                if kind == QueryKind::VectorSimpleHybrid {
                    map.insert("search".to_string(), json!(query));
                } else if kind == QueryKind::VectorSemanticHybrid {
                    map.insert("search".to_string(), json!(query));
                    map.insert("queryType".to_string(), json!("semantic"));
                    map.insert(
                        "semanticConfiguration".to_string(),
                        json!(self.config.semantic_configuration),
                    );
                }
            }
        }

        Ok(payload)
    }
}

/// A JSON array of strings is a set of independent sub-queries;
/// anything else is one literal query.
pub fn parse_query_list(raw: &str) -> Vec<String> {
    serde_json::from_str::<Vec<String>>(raw).unwrap_or_else(|_| vec![raw.to_string()])
}
