use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::traits::{ChatClient, ChatOptions, ChatRequest, TextGenerator};
use crate::types::Message;

pub const DEFAULT_GENERATOR_SYSTEM_PROMPT: &str = "Вы - полезный помощник с искусственным интеллектом, \
который обобщает сообщения чата. Сделайте все возможное, чтобы предоставить полезную информацию о том, \
что обсуждалось в предоставленных сообщениях чата.";

/// `TextGenerator` backed by a chat-completion client.
///
/// Sends a fixed system message plus the prompt and returns the first
/// choice trimmed of surrounding whitespace.
pub struct ChatGenerator {
    client: Arc<dyn ChatClient>,
    model: String,
    system_prompt: String,
    options: ChatOptions,
}

impl ChatGenerator {
    pub fn new(client: Arc<dyn ChatClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            system_prompt: DEFAULT_GENERATOR_SYSTEM_PROMPT.to_string(),
            options: ChatOptions::new().max_tokens(100),
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_options(mut self, options: ChatOptions) -> Self {
        self.options = options;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for ChatGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest::new(
            self.model.clone(),
            vec![
                Message::system(self.system_prompt.as_str()),
                Message::human(prompt),
            ],
        )
        .with_options(self.options);

        let response = self.client.chat(request).await?;

        if let Some(usage) = &response.usage {
            tracing::debug!(
                model = %self.model,
                total_tokens = usage.total_tokens,
                "Generation finished"
            );
        }

        let content = response
            .content
            .context("LLM returned no content")?;

        Ok(content.trim().to_string())
    }
}
