use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::handlers::dispatch_update;
use crate::state::AppState;

const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Long-poll Telegram for updates until `stop` flips to true
pub async fn run_polling(state: Arc<AppState>, mut stop: watch::Receiver<bool>) {
    let timeout = state.config.telegram.poll_timeout_secs;
    let mut offset = 0;

    tracing::info!(timeout_secs = timeout, "Update polling started");

    loop {
        let result = tokio::select! {
            result = state.telegram.get_updates(offset, timeout) => result,
            _ = stop.changed() => break,
        };

        match result {
            Ok(updates) => {
                for update in updates {
                    offset = offset.max(update.update_id + 1);
                    dispatch_update(&state, update).await;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "getUpdates failed, retrying");
                tokio::select! {
                    _ = tokio::time::sleep(RETRY_DELAY) => {}
                    _ = stop.changed() => break,
                }
            }
        }
    }

    tracing::info!("Update polling stopped");
}
