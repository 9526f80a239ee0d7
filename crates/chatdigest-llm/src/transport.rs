use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::RequestBuilder;

use crate::traits::{ChatResponse, CompletionPayload, CompletionReply};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .context("Failed to create HTTP client")
}

/// Send an authenticated chat-completions request and decode the reply.
///
/// `provider` only labels errors and log lines.
pub(crate) async fn send_completion(
    request: RequestBuilder,
    payload: &CompletionPayload<'_>,
    provider: &'static str,
) -> Result<ChatResponse> {
    let response = request
        .json(payload)
        .send()
        .await
        .with_context(|| format!("Failed to reach {}", provider))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(provider, status = %status, "Chat completion rejected");
        anyhow::bail!("{} API error ({}): {}", provider, status, body);
    }

    let reply: ChatResponse = response
        .json::<CompletionReply>()
        .await
        .with_context(|| format!("Failed to parse {} response", provider))?
        .into();

    if let Some(usage) = &reply.usage {
        tracing::debug!(
            provider,
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "Chat completion finished"
        );
    }
    Ok(reply)
}
