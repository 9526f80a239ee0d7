use anyhow::Result;
use async_trait::async_trait;

/// What the digest pipeline needs to know about a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChatInfo {
    pub is_forum: bool,
}

/// Messaging platform boundary used by digests
#[async_trait]
pub trait ChatGateway: Send + Sync {
    async fn chat_info(&self, conversation_id: i64) -> Result<ChatInfo>;

    /// Send an HTML-formatted message; `thread_id` of `None` targets the main thread
    async fn deliver(&self, conversation_id: i64, thread_id: Option<i64>, html: &str) -> Result<()>;
}
