use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use chatdigest_digest::{ChatGateway, ChatInfo};

use super::types::{
    ApiResponse, Chat, ChatMember, ChatMemberRequest, ChatRequest, GetUpdatesRequest,
    SendMessageRequest, Update,
};

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// HTTP client for the Telegram Bot API
pub struct TelegramClient {
    client: Client,
    base_url: String,
}

impl TelegramClient {
    /// `request_timeout` must exceed the getUpdates long-poll timeout
    pub fn new(token: &str, api_url: &str, request_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
        })
    }

    /// Long-poll for updates after `offset`
    pub async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Update>> {
        self.call(
            "getUpdates",
            &GetUpdatesRequest {
                offset,
                timeout: timeout_secs,
                allowed_updates: vec!["message"],
            },
        )
        .await
    }

    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        thread_id: Option<i64>,
        reply_to: Option<i64>,
        html: bool,
    ) -> Result<()> {
        let request = SendMessageRequest {
            chat_id,
            text,
            parse_mode: html.then_some("HTML"),
            message_thread_id: thread_id,
            reply_to_message_id: reply_to,
        };
        let _: serde_json::Value = self.call("sendMessage", &request).await?;
        Ok(())
    }

    pub async fn get_chat(&self, chat_id: i64) -> Result<Chat> {
        self.call("getChat", &ChatRequest { chat_id }).await
    }

    pub async fn get_chat_member(&self, chat_id: i64, user_id: i64) -> Result<ChatMember> {
        self.call("getChatMember", &ChatMemberRequest { chat_id, user_id })
            .await
    }

    async fn call<B: Serialize, T: DeserializeOwned>(&self, method: &str, body: &B) -> Result<T> {
        let url = format!("{}/{}", self.base_url, method);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send {} request", method))?;

        let status = response.status();
        let envelope: ApiResponse<T> = response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response (status {})", method, status))?;

        if !envelope.ok {
            let description = envelope
                .description
                .unwrap_or_else(|| "no description".to_string());
            tracing::error!(method, status = %status, description = %description, "Telegram API request failed");
            anyhow::bail!("Telegram API error in {}: {} - {}", method, status, description);
        }

        envelope
            .result
            .with_context(|| format!("Telegram API returned no result for {}", method))
    }
}

#[async_trait]
impl ChatGateway for TelegramClient {
    async fn chat_info(&self, conversation_id: i64) -> Result<ChatInfo> {
        let chat = self.get_chat(conversation_id).await?;
        Ok(ChatInfo {
            is_forum: chat.is_forum.unwrap_or(false),
        })
    }

    async fn deliver(&self, conversation_id: i64, thread_id: Option<i64>, html: &str) -> Result<()> {
        self.send_message(conversation_id, html, thread_id, None, true)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn client(url: &str) -> TelegramClient {
        TelegramClient::new("123:abc", url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_deliver_sends_html_into_thread() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/bot123:abc/sendMessage")
            .match_body(Matcher::PartialJson(json!({
                "chat_id": -100500,
                "text": "<b>hi</b>",
                "parse_mode": "HTML",
                "message_thread_id": 7
            })))
            .with_status(200)
            .with_body(r#"{"ok": true, "result": {"message_id": 1}}"#)
            .create_async()
            .await;

        client(&server.url())
            .deliver(-100500, Some(7), "<b>hi</b>")
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_chat_info_reads_forum_flag() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/bot123:abc/getChat")
            .with_status(200)
            .with_body(r#"{"ok": true, "result": {"id": -100500, "type": "supergroup", "is_forum": true}}"#)
            .create_async()
            .await;

        let info = client(&server.url()).chat_info(-100500).await.unwrap();

        assert!(info.is_forum);
    }

    #[tokio::test]
    async fn test_api_error_is_surfaced() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/bot123:abc/getChatMember")
            .with_status(400)
            .with_body(r#"{"ok": false, "error_code": 400, "description": "Bad Request: user not found"}"#)
            .create_async()
            .await;

        let err = client(&server.url()).get_chat_member(-100500, 1).await.unwrap_err();

        assert!(err.to_string().contains("user not found"));
    }

    #[tokio::test]
    async fn test_get_updates() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/bot123:abc/getUpdates")
            .match_body(Matcher::PartialJson(json!({ "offset": 15, "timeout": 0 })))
            .with_status(200)
            .with_body(
                json!({
                    "ok": true,
                    "result": [{
                        "update_id": 15,
                        "message": {
                            "message_id": 1,
                            "chat": {"id": 1, "type": "private"},
                            "date": 1700000000,
                            "text": "hi"
                        }
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let updates = client(&server.url()).get_updates(15, 0).await.unwrap();

        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].update_id, 15);
    }
}
