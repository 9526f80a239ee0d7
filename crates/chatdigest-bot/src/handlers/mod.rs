pub mod commands;
pub mod ingest;

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::state::AppState;
use crate::telegram::Update;
use commands::Command;

/// Like `handle_update`, but commands run on their own task. Plain messages
/// are stored inline, in arrival order.
pub async fn dispatch_update(state: &Arc<AppState>, update: Update) -> Option<JoinHandle<()>> {
    let is_command = update
        .message
        .as_ref()
        .and_then(|message| message.text.as_deref())
        .and_then(Command::parse)
        .is_some();

    if is_command {
        let state = Arc::clone(state);
        Some(tokio::spawn(async move { handle_update(&state, update).await }))
    } else {
        handle_update(state, update).await;
        None
    }
}

/// Route one update to the command handler or to ingestion
pub async fn handle_update(state: &AppState, update: Update) {
    let Some(message) = update.message else {
        return;
    };

    match message.text.as_deref().and_then(Command::parse) {
        Some(command) => commands::handle(state, &message, command).await,
        None => {
            if let Err(e) = ingest::ingest_message(state, &message).await {
                tracing::error!(
                    conversation_id = message.chat.id,
                    thread_id = message.thread_id(),
                    error = %e,
                    "Failed to store message"
                );
            }
        }
    }
}
