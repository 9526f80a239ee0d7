use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::azure_openai::AzureOpenAIClient;
use crate::openai::OpenAIClient;
use crate::traits::ChatClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderType {
    OpenAI,
    AzureOpenAI,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenAIConfig {
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl OpenAIConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AzureConfig {
    pub api_key: String,
    /// e.g. `https://my-resource.openai.azure.com`
    pub endpoint: String,
    pub api_version: String,
}

impl AzureConfig {
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, api_version: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            api_version: api_version.into(),
        }
    }
}

/// Which backend answers `TextGenerator` prompts; chosen once at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProviderConfig {
    #[serde(rename = "openai")]
    OpenAI(OpenAIConfig),
    #[serde(rename = "azure_openai")]
    AzureOpenAI(AzureConfig),
}

impl ProviderConfig {
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self::OpenAI(OpenAIConfig::new(api_key))
    }

    pub fn azure_openai(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        Self::AzureOpenAI(AzureConfig::new(api_key, endpoint, api_version))
    }

    pub fn provider_type(&self) -> ProviderType {
        match self {
            Self::OpenAI(_) => ProviderType::OpenAI,
            Self::AzureOpenAI(_) => ProviderType::AzureOpenAI,
        }
    }
}

pub struct ClientFactory;

impl ClientFactory {
    pub fn create_chat_client(config: ProviderConfig) -> Result<Arc<dyn ChatClient>> {
        let provider = config.provider_type();
        let client: Arc<dyn ChatClient> = match config {
            ProviderConfig::OpenAI(openai) => Arc::new(OpenAIClient::from_config(openai)?),
            ProviderConfig::AzureOpenAI(azure) => Arc::new(AzureOpenAIClient::new(azure)?),
        };
        tracing::debug!(provider = ?provider, "Chat client created");
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_serde() {
        let json = r#"{"type":"openai","api_key":"k","base_url":"http://localhost:9000/v1"}"#;
        let config: ProviderConfig = serde_json::from_str(json).unwrap();
        assert_eq!(
            config,
            ProviderConfig::OpenAI(OpenAIConfig::new("k").with_base_url("http://localhost:9000/v1"))
        );

        let json = r#"{"type":"azure_openai","api_key":"k","endpoint":"https://e","api_version":"v"}"#;
        let config: ProviderConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.provider_type(), ProviderType::AzureOpenAI);
    }

    #[test]
    fn test_factory_builds_both_providers() {
        assert!(ClientFactory::create_chat_client(ProviderConfig::openai("k")).is_ok());
        assert!(ClientFactory::create_chat_client(ProviderConfig::azure_openai(
            "k",
            "https://res.openai.azure.com",
            "2024-02-15-preview"
        ))
        .is_ok());
    }

    #[test]
    fn test_factory_rejects_incomplete_azure_config() {
        let err = ClientFactory::create_chat_client(ProviderConfig::azure_openai("k", "", "v"))
            .err()
            .unwrap();
        assert!(err.to_string().contains("Endpoint"));
    }
}
