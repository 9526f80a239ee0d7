use std::sync::Arc;

use chatdigest_digest::DigestRunner;
use chatdigest_persist::PersistClient;

use crate::config::Config;
use crate::telegram::TelegramClient;

/// Shared state passed to every update handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub persist: PersistClient,
    pub telegram: Arc<TelegramClient>,
    pub runner: Arc<DigestRunner>,
}

impl AppState {
    pub fn new(
        config: Config,
        persist: PersistClient,
        telegram: Arc<TelegramClient>,
        runner: Arc<DigestRunner>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            persist,
            telegram,
            runner,
        }
    }
}
