use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use std::fmt;

use super::timestamp;

/// Thread id of a conversation's default (unthreaded) stream
pub const MAIN_THREAD_ID: i64 = 0;

/// Identifies one append-only message log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ThreadKey {
    pub conversation_id: i64,
    pub thread_id: i64,
}

impl ThreadKey {
    pub fn new(conversation_id: i64, thread_id: i64) -> Self {
        Self { conversation_id, thread_id }
    }

    pub fn main(conversation_id: i64) -> Self {
        Self::new(conversation_id, MAIN_THREAD_ID)
    }

    pub fn is_main(&self) -> bool {
        self.thread_id == MAIN_THREAD_ID
    }
}

impl fmt::Display for ThreadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.conversation_id, self.thread_id)
    }
}

/// One ingested chat message, immutable once stored.
///
/// Serialized as `{user, text, date}` with an ISO-8601 UTC date; naive dates
/// found in existing data are read as UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMessage {
    #[serde(rename = "user")]
    pub author: String,
    pub text: String,
    #[serde(rename = "date", with = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl StoredMessage {
    pub fn new(author: impl Into<String>, text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            author: author.into(),
            text: text.into(),
            timestamp,
        }
    }
}

/// A message as handed to the summarizer: timestamp already applied and dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine {
    pub author: String,
    pub text: String,
}

impl From<StoredMessage> for ChatLine {
    fn from(msg: StoredMessage) -> Self {
        Self {
            author: msg.author,
            text: msg.text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_record_layout() {
        let msg = StoredMessage::new(
            "Anna",
            "hello",
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
        );
        let value = serde_json::to_value(&msg).unwrap();

        assert_eq!(value["user"], "Anna");
        assert_eq!(value["text"], "hello");
        assert_eq!(value["date"], "2024-05-01T12:30:00+00:00");
    }

    #[test]
    fn test_naive_date_is_read_as_utc() {
        let msg = serde_json::from_str::<StoredMessage>(r#"{"user":"Oleg","text":"hi","date":"2024-05-01T12:30:00.250000"}"#).unwrap();
        assert_eq!(
            msg.timestamp,
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap() + chrono::Duration::milliseconds(250)
        );
    }

    #[test]
    fn test_offset_date_is_normalized() {
        let msg = serde_json::from_str::<StoredMessage>(r#"{"user":"Oleg","text":"hi","date":"2024-05-01T15:30:00+03:00"}"#).unwrap();
        assert_eq!(msg.timestamp, Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap());
    }

    #[test]
    fn test_malformed_date_is_rejected() {
        assert!(serde_json::from_str::<StoredMessage>(r#"{"user":"Oleg","text":"hi","date":"yesterday"}"#).is_err());
    }

    #[test]
    fn test_thread_key_display() {
        assert_eq!(ThreadKey::new(-1001234, 7).to_string(), "-1001234:7");
        assert!(ThreadKey::main(5).is_main());
    }
}
