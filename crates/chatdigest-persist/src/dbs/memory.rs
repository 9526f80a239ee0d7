use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::models::{SettingUpdate, StoredMessage, StoredSettings, ThreadKey};
use crate::trait_client::MessageStore;

#[derive(Default)]
struct MemoryState {
    logs: HashMap<ThreadKey, Vec<StoredMessage>>,
    conversations: BTreeSet<i64>,
    threads: HashMap<i64, BTreeSet<i64>>,
    settings: HashMap<i64, StoredSettings>,
    selected: HashMap<i64, BTreeSet<i64>>,
}

/// Process-local store. Nothing survives a restart; used for tests and
/// single-instance deployments without a database.
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<MemoryState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageStore for InMemoryStore {
    async fn append_message(&self, key: ThreadKey, message: StoredMessage) -> Result<()> {
        self.state.write().await.logs.entry(key).or_default().push(message);
        Ok(())
    }

    async fn load_log(&self, key: ThreadKey) -> Result<Vec<StoredMessage>> {
        Ok(self.state.read().await.logs.get(&key).cloned().unwrap_or_default())
    }

    async fn replace_log(&self, key: ThreadKey, messages: Vec<StoredMessage>) -> Result<()> {
        let mut state = self.state.write().await;
        if messages.is_empty() {
            state.logs.remove(&key);
        } else {
            state.logs.insert(key, messages);
        }
        Ok(())
    }

    async fn delete_log(&self, key: ThreadKey) -> Result<()> {
        self.state.write().await.logs.remove(&key);
        Ok(())
    }

    async fn register_conversation(&self, conversation_id: i64) -> Result<()> {
        self.state.write().await.conversations.insert(conversation_id);
        Ok(())
    }

    async fn conversations(&self) -> Result<BTreeSet<i64>> {
        Ok(self.state.read().await.conversations.clone())
    }

    async fn register_thread(&self, key: ThreadKey) -> Result<()> {
        self.state
            .write()
            .await
            .threads
            .entry(key.conversation_id)
            .or_default()
            .insert(key.thread_id);
        Ok(())
    }

    async fn unregister_thread(&self, key: ThreadKey) -> Result<()> {
        let mut state = self.state.write().await;
        if let Some(threads) = state.threads.get_mut(&key.conversation_id) {
            threads.remove(&key.thread_id);
            if threads.is_empty() {
                state.threads.remove(&key.conversation_id);
            }
        }
        Ok(())
    }

    async fn registered_threads(&self, conversation_id: i64) -> Result<BTreeSet<i64>> {
        Ok(self
            .state
            .read()
            .await
            .threads
            .get(&conversation_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn load_settings(&self, conversation_id: i64) -> Result<StoredSettings> {
        Ok(self
            .state
            .read()
            .await
            .settings
            .get(&conversation_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn update_setting(&self, conversation_id: i64, update: SettingUpdate) -> Result<()> {
        self.state
            .write()
            .await
            .settings
            .entry(conversation_id)
            .or_default()
            .apply(update);
        Ok(())
    }

    async fn add_selected_topic(&self, conversation_id: i64, thread_id: i64) -> Result<()> {
        self.state
            .write()
            .await
            .selected
            .entry(conversation_id)
            .or_default()
            .insert(thread_id);
        Ok(())
    }

    async fn remove_selected_topic(&self, conversation_id: i64, thread_id: i64) -> Result<()> {
        if let Some(selected) = self.state.write().await.selected.get_mut(&conversation_id) {
            selected.remove(&thread_id);
        }
        Ok(())
    }

    async fn selected_topics(&self, conversation_id: i64) -> Result<BTreeSet<i64>> {
        Ok(self
            .state
            .read()
            .await
            .selected
            .get(&conversation_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_append_preserves_order() {
        let store = InMemoryStore::new();
        let key = ThreadKey::new(1, 2);
        store.append_message(key, StoredMessage::new("a", "first", Utc::now())).await.unwrap();
        store.append_message(key, StoredMessage::new("b", "second", Utc::now())).await.unwrap();

        let texts: Vec<_> = store.load_log(key).await.unwrap().into_iter().map(|m| m.text).collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_logs_are_isolated_per_thread() {
        let store = InMemoryStore::new();
        store.append_message(ThreadKey::new(1, 0), StoredMessage::new("a", "main", Utc::now())).await.unwrap();

        assert!(store.load_log(ThreadKey::new(1, 5)).await.unwrap().is_empty());
        assert!(store.load_log(ThreadKey::new(2, 0)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_selected_topics() {
        let store = InMemoryStore::new();
        store.add_selected_topic(9, 3).await.unwrap();
        store.add_selected_topic(9, 4).await.unwrap();
        store.remove_selected_topic(9, 3).await.unwrap();

        assert_eq!(store.selected_topics(9).await.unwrap(), BTreeSet::from([4]));
        assert!(store.selected_topics(10).await.unwrap().is_empty());
    }
}
