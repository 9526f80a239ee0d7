use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::OpenAIConfig;
use crate::traits::{ChatClient, ChatRequest, ChatResponse, CompletionPayload};
use crate::transport::{self, DEFAULT_REQUEST_TIMEOUT};

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Chat completions against api.openai.com or any compatible server
pub struct OpenAIClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAIClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_timeout(api_key, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            anyhow::bail!("OpenAI API key is empty");
        }
        Ok(Self {
            http: transport::http_client(timeout)?,
            api_key,
            base_url: OPENAI_API_BASE.to_string(),
        })
    }

    pub fn from_config(config: OpenAIConfig) -> Result<Self> {
        let client = Self::new(config.api_key)?;
        Ok(match config.base_url {
            Some(base_url) => client.with_base_url(base_url),
            None => client,
        })
    }

    /// Proxies, local servers and tests
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ChatClient for OpenAIClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let payload = CompletionPayload::new(&request, true);
        tracing::debug!(model = %request.model, messages = request.messages.len(), "OpenAI chat completion");

        let http_request = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key);
        transport::send_completion(http_request, &payload, "OpenAI").await
    }
}
