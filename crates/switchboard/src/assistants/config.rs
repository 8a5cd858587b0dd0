use anyhow::{Context, Result};
use std::env;

pub const DEFAULT_MODEL: &str = "gpt-35-turbo-16k";

/// Connection settings for the assistants service. Built explicitly and
/// passed in at construction; only callers touch the environment.
#[derive(Debug, Clone)]
pub struct AssistantsConfig {
    pub endpoint: String,
    pub api_key: String,
    pub api_version: String,
    pub model: String,
}

impl AssistantsConfig {
    pub fn new<E, K, V, M>(endpoint: E, api_key: K, api_version: V, model: M) -> Self
    where
        E: Into<String>,
        K: Into<String>,
        V: Into<String>,
        M: Into<String>,
    {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            api_version: api_version.into(),
            model: model.into(),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            endpoint: env::var("AZURE_OPENAI_ENDPOINT")
                .context("AZURE_OPENAI_ENDPOINT must be set")?,
            api_key: env::var("AZURE_OPENAI_KEY").context("AZURE_OPENAI_KEY must be set")?,
            api_version: env::var("AZURE_OPENAI_VERSION")
                .context("AZURE_OPENAI_VERSION must be set")?,
            model: env::var("AZURE_OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
        })
    }
}
