use std::collections::BTreeSet;

use async_trait::async_trait;
use mongodb::Client;

use crate::dbs::mongo::repositories::{MongoMessageRepository, MongoRegistryRepository, MongoSettingsRepository};
use crate::error::{PersistError, Result};
use crate::models::{SettingUpdate, StoredMessage, StoredSettings, ThreadKey};
use crate::trait_client::MessageStore;

pub struct MongoMessageStore {
    message_repo: MongoMessageRepository,
    registry_repo: MongoRegistryRepository,
    settings_repo: MongoSettingsRepository,
}

impl MongoMessageStore {
    /// Connect to MongoDB and create the store
    pub async fn connect(mongodb_uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(mongodb_uri)
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;

        Ok(Self {
            message_repo: MongoMessageRepository::new(&client, database),
            registry_repo: MongoRegistryRepository::new(&client, database),
            settings_repo: MongoSettingsRepository::new(&client, database),
        })
    }
}

#[async_trait]
impl MessageStore for MongoMessageStore {
    async fn append_message(&self, key: ThreadKey, message: StoredMessage) -> Result<()> {
        self.message_repo.append(key, message).await
    }

    async fn load_log(&self, key: ThreadKey) -> Result<Vec<StoredMessage>> {
        self.message_repo.load(key).await
    }

    async fn replace_log(&self, key: ThreadKey, messages: Vec<StoredMessage>) -> Result<()> {
        self.message_repo.replace(key, messages).await
    }

    async fn delete_log(&self, key: ThreadKey) -> Result<()> {
        self.message_repo.delete(key).await
    }

    async fn register_conversation(&self, conversation_id: i64) -> Result<()> {
        self.registry_repo.add_conversation(conversation_id).await
    }

    async fn conversations(&self) -> Result<BTreeSet<i64>> {
        self.registry_repo.conversations().await
    }

    async fn register_thread(&self, key: ThreadKey) -> Result<()> {
        self.registry_repo.add_thread(key).await
    }

    async fn unregister_thread(&self, key: ThreadKey) -> Result<()> {
        self.registry_repo.remove_thread(key).await
    }

    async fn registered_threads(&self, conversation_id: i64) -> Result<BTreeSet<i64>> {
        self.registry_repo.threads(conversation_id).await
    }

    async fn load_settings(&self, conversation_id: i64) -> Result<StoredSettings> {
        self.settings_repo.load(conversation_id).await
    }

    async fn update_setting(&self, conversation_id: i64, update: SettingUpdate) -> Result<()> {
        self.settings_repo.update(conversation_id, update).await
    }

    async fn add_selected_topic(&self, conversation_id: i64, thread_id: i64) -> Result<()> {
        self.registry_repo.add_selected(conversation_id, thread_id).await
    }

    async fn remove_selected_topic(&self, conversation_id: i64, thread_id: i64) -> Result<()> {
        self.registry_repo.remove_selected(conversation_id, thread_id).await
    }

    async fn selected_topics(&self, conversation_id: i64) -> Result<BTreeSet<i64>> {
        self.registry_repo.selected(conversation_id).await
    }
}
