use anyhow::Result;
use async_trait::async_trait;

use crate::config::AzureConfig;
use crate::traits::{ChatClient, ChatRequest, ChatResponse, CompletionPayload};
use crate::transport::{self, DEFAULT_REQUEST_TIMEOUT};

/// Chat completions through an Azure OpenAI resource.
///
/// The request's `model` names the deployment and goes into the URL; the
/// key travels in the `api-key` header.
#[derive(Debug)]
pub struct AzureOpenAIClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
    api_version: String,
}

impl AzureOpenAIClient {
    pub fn new(config: AzureConfig) -> Result<Self> {
        let AzureConfig {
            api_key,
            endpoint,
            api_version,
        } = config;

        for (value, name) in [(&api_key, "API key"), (&endpoint, "Endpoint"), (&api_version, "API version")] {
            if value.trim().is_empty() {
                anyhow::bail!("Azure OpenAI {} is required", name);
            }
        }

        Ok(Self {
            http: transport::http_client(DEFAULT_REQUEST_TIMEOUT)?,
            api_key,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_version,
        })
    }

    fn completions_url(&self, deployment: &str) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, deployment, self.api_version
        )
    }
}

#[async_trait]
impl ChatClient for AzureOpenAIClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let payload = CompletionPayload::new(&request, false);
        tracing::debug!(deployment = %request.model, "Azure OpenAI chat completion");

        let http_request = self
            .http
            .post(self.completions_url(&request.model))
            .header("api-key", &self.api_key);
        transport::send_completion(http_request, &payload, "Azure OpenAI").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completions_url() {
        let client = AzureOpenAIClient::new(AzureConfig::new(
            "k",
            "https://res.openai.azure.com/",
            "2024-02-15-preview",
        ))
        .unwrap();

        assert_eq!(
            client.completions_url("digest-gpt4o"),
            "https://res.openai.azure.com/openai/deployments/digest-gpt4o/chat/completions?api-version=2024-02-15-preview"
        );
    }
}
