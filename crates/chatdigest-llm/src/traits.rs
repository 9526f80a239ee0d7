use crate::types::{Content, Message};
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A chat-completions backend (OpenAI, Azure OpenAI, ...)
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;
}

/// The summarization capability consumed by the digest pipeline.
///
/// One prompt in, one trimmed reply out. Implementations are picked once at
/// startup; callers never branch on the provider.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Model name, or the deployment name on Azure
    pub model: String,
    pub messages: Vec<Message>,
    pub options: ChatOptions,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            options: ChatOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ChatOptions) -> Self {
        self.options = options;
        self
    }
}

/// Sampling knobs; unset values are left to the provider
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChatOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl ChatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn temperature(self, temperature: f32) -> Self {
        Self {
            temperature: Some(temperature),
            ..self
        }
    }

    pub fn max_tokens(self, max_tokens: u32) -> Self {
        Self {
            max_tokens: Some(max_tokens),
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatResponse {
    /// First choice only; `None` when the model produced no text
    pub content: Option<String>,
    pub finish_reason: Option<String>,
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Request body of the OpenAI chat-completions API, shared by compatible providers
#[derive(Debug, Serialize)]
pub(crate) struct CompletionPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
}

impl<'a> CompletionPayload<'a> {
    /// `with_model` is false where the URL already names the model (Azure)
    pub(crate) fn new(request: &'a ChatRequest, with_model: bool) -> Self {
        // o1 and gpt-5 families reject temperature and rename max_tokens
        let reasoning = request.model.starts_with("o1") || request.model.starts_with("gpt-5");
        let options = request.options;

        Self {
            model: with_model.then_some(request.model.as_str()),
            messages: &request.messages,
            temperature: options.temperature.filter(|_| !reasoning),
            max_tokens: options.max_tokens.filter(|_| !reasoning),
            max_completion_tokens: options.max_tokens.filter(|_| reasoning),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionReply {
    choices: Vec<ReplyChoice>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
struct ReplyChoice {
    message: ReplyMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<Content>,
}

impl From<CompletionReply> for ChatResponse {
    fn from(reply: CompletionReply) -> Self {
        let (content, finish_reason) = match reply.choices.into_iter().next() {
            Some(choice) => (
                choice
                    .message
                    .content
                    .filter(|content| !content.is_empty())
                    .map(|content| content.to_plain_text()),
                choice.finish_reason,
            ),
            None => (None, None),
        };
        Self {
            content,
            finish_reason,
            usage: reply.usage,
        }
    }
}
