use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::builder::PersistClientBuilder;
use crate::error::Result;
use crate::models::{ChatLine, DigestSettings, SettingUpdate, StoredMessage, ThreadKey, MAIN_THREAD_ID};
use crate::retention::{self, RetentionSweeper};
use crate::trait_client::MessageStore;

/// Message log and digest-settings repository used by ingestion and digests.
///
/// Wraps a `MessageStore` backend and applies retention on every read.
#[derive(Clone)]
pub struct PersistClient {
    store: Arc<dyn MessageStore>,
    sweeper: RetentionSweeper,
    default_interval_minutes: i64,
}

impl PersistClient {
    pub fn new(store: Arc<dyn MessageStore>, sweeper: RetentionSweeper, default_interval_minutes: i64) -> Self {
        Self {
            store,
            sweeper,
            default_interval_minutes,
        }
    }

    pub fn builder() -> PersistClientBuilder {
        PersistClientBuilder::new()
    }

    /// Append a message and register its conversation and thread
    pub async fn save_message(
        &self,
        conversation_id: i64,
        thread_id: i64,
        author: &str,
        text: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<()> {
        let key = ThreadKey::new(conversation_id, thread_id);
        self.store
            .append_message(key, StoredMessage::new(author, text, timestamp))
            .await?;
        self.store.register_conversation(conversation_id).await?;
        self.store.register_thread(key).await?;
        Ok(())
    }

    /// Messages newer than `since` (strictly), after pruning the thread to the retention horizon
    pub async fn messages_since(
        &self,
        conversation_id: i64,
        thread_id: i64,
        since: DateTime<Utc>,
    ) -> Result<Vec<ChatLine>> {
        self.messages_since_at(conversation_id, thread_id, since, Utc::now()).await
    }

    pub async fn messages_since_at(
        &self,
        conversation_id: i64,
        thread_id: i64,
        since: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Vec<ChatLine>> {
        let key = ThreadKey::new(conversation_id, thread_id);
        let retained = self.sweeper.sweep(self.store.as_ref(), key, now).await?;

        Ok(retained
            .into_iter()
            .filter(|m| m.timestamp > since)
            .map(ChatLine::from)
            .collect())
    }

    /// Explicitly clear a thread's messages at or before `before`
    pub async fn clear_messages(&self, conversation_id: i64, thread_id: i64, before: DateTime<Utc>) -> Result<()> {
        retention::prune_before(self.store.as_ref(), ThreadKey::new(conversation_id, thread_id), before).await?;
        Ok(())
    }

    /// Known threads plus the main thread
    pub async fn threads(&self, conversation_id: i64) -> Result<BTreeSet<i64>> {
        let mut threads = self.store.registered_threads(conversation_id).await?;
        threads.insert(MAIN_THREAD_ID);
        Ok(threads)
    }

    pub async fn conversations(&self) -> Result<BTreeSet<i64>> {
        self.store.conversations().await
    }

    /// Effective settings with defaults applied
    pub async fn settings(&self, conversation_id: i64) -> Result<DigestSettings> {
        let stored = self.store.load_settings(conversation_id).await?;
        let selected = self.store.selected_topics(conversation_id).await?;
        Ok(stored.resolve(self.default_interval_minutes, selected))
    }

    pub async fn summary_enabled(&self, conversation_id: i64) -> Result<bool> {
        Ok(self.store.load_settings(conversation_id).await?.enabled.unwrap_or(true))
    }

    pub async fn set_summary_enabled(&self, conversation_id: i64, enabled: bool) -> Result<()> {
        self.update(conversation_id, SettingUpdate::Enabled(enabled)).await
    }

    pub async fn summary_interval(&self, conversation_id: i64) -> Result<i64> {
        let stored = self.store.load_settings(conversation_id).await?;
        Ok(stored.resolve(self.default_interval_minutes, BTreeSet::new()).interval_minutes)
    }

    pub async fn set_summary_interval(&self, conversation_id: i64, minutes: i64) -> Result<()> {
        self.update(conversation_id, SettingUpdate::IntervalMinutes(minutes)).await
    }

    pub async fn summary_topic(&self, conversation_id: i64) -> Result<i64> {
        Ok(self.store.load_settings(conversation_id).await?.summary_topic_id.unwrap_or(0))
    }

    pub async fn set_summary_topic(&self, conversation_id: i64, topic_id: i64) -> Result<()> {
        self.update(conversation_id, SettingUpdate::SummaryTopic(topic_id)).await
    }

    pub async fn last_summary_time(&self, conversation_id: i64) -> Result<DateTime<Utc>> {
        let stored = self.store.load_settings(conversation_id).await?;
        Ok(stored.last_summary_time.unwrap_or_else(crate::models::timestamp::epoch))
    }

    pub async fn set_last_summary_time(&self, conversation_id: i64, at: DateTime<Utc>) -> Result<()> {
        self.update(conversation_id, SettingUpdate::LastSummaryTime(at)).await
    }

    pub async fn selected_topics(&self, conversation_id: i64) -> Result<BTreeSet<i64>> {
        self.store.selected_topics(conversation_id).await
    }

    pub async fn select_topic(&self, conversation_id: i64, thread_id: i64) -> Result<()> {
        self.store.add_selected_topic(conversation_id, thread_id).await
    }

    pub async fn unselect_topic(&self, conversation_id: i64, thread_id: i64) -> Result<()> {
        self.store.remove_selected_topic(conversation_id, thread_id).await
    }

    async fn update(&self, conversation_id: i64, update: SettingUpdate) -> Result<()> {
        self.store.update_setting(conversation_id, update).await?;
        tracing::debug!(conversation_id, field = update.field(), "Digest setting updated");
        Ok(())
    }
}
