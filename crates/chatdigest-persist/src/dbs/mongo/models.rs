use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{timestamp, StoredMessage, StoredSettings, ThreadKey};

/// One log entry in the `messages` collection.
///
/// `date` stays an ISO-8601 string so the record keeps the `{user, text, date}`
/// shape shared with other store backends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoMessage {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub conversation_id: i64,
    pub thread_id: i64,
    pub user: String,
    pub text: String,
    pub date: String,
}

impl MongoMessage {
    pub fn from_stored(key: ThreadKey, message: StoredMessage) -> Self {
        Self {
            id: ObjectId::new(),
            conversation_id: key.conversation_id,
            thread_id: key.thread_id,
            user: message.author,
            text: message.text,
            date: timestamp::format(&message.timestamp),
        }
    }

    pub fn into_stored(self) -> Result<StoredMessage> {
        Ok(StoredMessage {
            timestamp: timestamp::parse(&self.date)?,
            author: self.user,
            text: self.text,
        })
    }
}

/// Membership row for the `chats` collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoConversation {
    #[serde(rename = "_id")]
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_seen: Option<String>,
}

/// Membership row for `threads` and `selected_topics`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoThreadRef {
    pub conversation_id: i64,
    pub thread_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_seen: Option<String>,
}

/// The per-conversation settings hash in `summary_state`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MongoSummaryState {
    #[serde(rename = "_id")]
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_summary_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_topic_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_interval: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_enabled: Option<bool>,
}

impl MongoSummaryState {
    pub fn into_stored(self) -> Result<StoredSettings> {
        let last_summary_time = self
            .last_summary_time
            .as_deref()
            .map(timestamp::parse)
            .transpose()?;

        Ok(StoredSettings {
            enabled: self.summary_enabled,
            interval_minutes: self.summary_interval,
            summary_topic_id: self.summary_topic_id,
            last_summary_time,
        })
    }
}
