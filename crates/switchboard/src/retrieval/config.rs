use anyhow::{anyhow, Context, Result};
use std::env;

/// How the search index ranks a query. Vector modes require an
/// embeddings client; hybrid modes combine vectors with keyword or
/// semantic ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Simple,
    Semantic,
    Vector,
    VectorSimpleHybrid,
    VectorSemanticHybrid,
}

impl QueryKind {
    pub fn wire_name(&self) -> &'static str {
        match self {
            QueryKind::Simple => "simple",
            QueryKind::Semantic => "semantic",
            QueryKind::Vector => "vector",
            QueryKind::VectorSimpleHybrid => "vectorSimpleHybrid",
            QueryKind::VectorSemanticHybrid => "vectorSemanticHybrid",
        }
    }

    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "simple" => Ok(QueryKind::Simple),
            "semantic" => Ok(QueryKind::Semantic),
            "vector" => Ok(QueryKind::Vector),
            "vectorSimpleHybrid" => Ok(QueryKind::VectorSimpleHybrid),
            "vectorSemanticHybrid" => Ok(QueryKind::VectorSemanticHybrid),
            other => Err(anyhow!("unsupported query type: {}", other)),
        }
    }

    pub fn needs_vectors(&self) -> bool {
        matches!(
            self,
            QueryKind::Vector | QueryKind::VectorSimpleHybrid | QueryKind::VectorSemanticHybrid
        )
    }

    pub fn is_semantic(&self) -> bool {
        matches!(self, QueryKind::Semantic | QueryKind::VectorSemanticHybrid)
    }
}

/// Connection and ranking settings for the search index.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub endpoint: String,
    pub api_key: String,
    pub api_version: String,
    pub index: String,
    pub query_kind: QueryKind,
    pub top_k: usize,
    pub semantic_configuration: Option<String>,
    pub vector_fields: Option<String>,
}

impl SearchConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let query_kind = match env::var("AZURE_SEARCH_QUERY_TYPE") {
            Ok(name) => QueryKind::parse(&name)?,
            Err(_) => QueryKind::VectorSemanticHybrid,
        };
        let top_k = match env::var("AZURE_SEARCH_TOP_K") {
            Ok(value) => value
                .parse()
                .context("AZURE_SEARCH_TOP_K must be a positive integer")?,
            Err(_) => 5,
        };

        Ok(Self {
            endpoint: env::var("AZURE_SEARCH_SERVICE_ENDPOINT")
                .context("AZURE_SEARCH_SERVICE_ENDPOINT must be set")?,
            api_key: env::var("AZURE_SEARCH_ADMIN_KEY")
                .context("AZURE_SEARCH_ADMIN_KEY must be set")?,
            api_version: env::var("AZURE_SEARCH_VERSION")
                .context("AZURE_SEARCH_VERSION must be set")?,
            index: env::var("AZURE_SEARCH_INDEX_NAME")
                .context("AZURE_SEARCH_INDEX_NAME must be set")?,
            query_kind,
            top_k,
            semantic_configuration: env::var("AZURE_SEARCH_SEMANTIC_CONFIG").ok(),
            vector_fields: env::var("AZURE_SEARCH_VECTOR_FIELDS").ok(),
        })
    }
}

/// Connection settings for the embeddings deployment.
#[derive(Debug, Clone)]
pub struct EmbeddingsConfig {
    pub endpoint: String,
    pub api_key: String,
    pub api_version: String,
    pub deployment: String,
}

impl EmbeddingsConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            endpoint: env::var("AZURE_OPENAI_ENDPOINT")
                .context("AZURE_OPENAI_ENDPOINT must be set")?,
            api_key: env::var("AZURE_OPENAI_KEY").context("AZURE_OPENAI_KEY must be set")?,
            api_version: env::var("AZURE_OPENAI_VERSION")
                .context("AZURE_OPENAI_VERSION must be set")?,
            deployment: env::var("AZURE_OPENAI_EMBEDDING_MODEL")
                .context("AZURE_OPENAI_EMBEDDING_MODEL must be set")?,
        })
    }
}
