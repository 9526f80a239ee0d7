use chrono::{DateTime, Utc};

use crate::error::BotResult;
use crate::state::AppState;
use crate::telegram::{ChatKind, Message};

/// Store a text message from a group, supergroup or private chat.
///
/// Returns whether the message was stored.
pub async fn ingest_message(state: &AppState, message: &Message) -> BotResult<bool> {
    if message.chat.kind == ChatKind::Channel {
        return Ok(false);
    }
    let Some(text) = message.text.as_deref() else {
        return Ok(false);
    };

    let author = message
        .from
        .as_ref()
        .map(|user| user.full_name())
        .unwrap_or_else(|| "Unknown".to_string());
    let timestamp = DateTime::<Utc>::from_timestamp(message.date, 0).unwrap_or_else(Utc::now);
    let thread_id = message.thread_id();

    state
        .persist
        .save_message(message.chat.id, thread_id, &author, text, timestamp)
        .await?;

    tracing::info!(
        conversation_id = message.chat.id,
        thread_id,
        author = %author,
        "Message collected"
    );
    Ok(true)
}
