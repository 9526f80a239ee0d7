//! In-memory fakes for the generator and chat boundary

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chatdigest_llm::TextGenerator;

use crate::gateway::{ChatGateway, ChatInfo};

/// Replies with a fixed label; fails for prompts containing a marker
pub struct ScriptedGenerator {
    reply: String,
    fail_marker: Option<String>,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            fail_marker: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_on(mut self, marker: impl Into<String>) -> Self {
        self.fail_marker = Some(marker.into());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.fail_marker {
            Some(marker) if prompt.contains(marker.as_str()) => Err(anyhow!("scripted failure")),
            _ => Ok(self.reply.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub conversation_id: i64,
    pub thread_id: Option<i64>,
    pub text: String,
}

/// Records deliveries instead of sending them
#[derive(Default)]
pub struct RecordingGateway {
    forums: BTreeSet<i64>,
    unknown: BTreeSet<i64>,
    fail_delivery: bool,
    sent: Mutex<Vec<Delivery>>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_forum(mut self, conversation_id: i64) -> Self {
        self.forums.insert(conversation_id);
        self
    }

    /// Chat lookups for this conversation fail
    pub fn with_unknown_chat(mut self, conversation_id: i64) -> Self {
        self.unknown.insert(conversation_id);
        self
    }

    pub fn failing_delivery(mut self) -> Self {
        self.fail_delivery = true;
        self
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ChatGateway for RecordingGateway {
    async fn chat_info(&self, conversation_id: i64) -> Result<ChatInfo> {
        if self.unknown.contains(&conversation_id) {
            return Err(anyhow!("chat not found"));
        }
        Ok(ChatInfo {
            is_forum: self.forums.contains(&conversation_id),
        })
    }

    async fn deliver(&self, conversation_id: i64, thread_id: Option<i64>, html: &str) -> Result<()> {
        if self.fail_delivery {
            return Err(anyhow!("delivery refused"));
        }
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(Delivery {
                conversation_id,
                thread_id,
                text: html.to_string(),
            });
        }
        Ok(())
    }
}
