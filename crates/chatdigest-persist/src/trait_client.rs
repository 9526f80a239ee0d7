use async_trait::async_trait;
use std::collections::BTreeSet;

use crate::error::Result;
use crate::models::{SettingUpdate, StoredMessage, StoredSettings, ThreadKey};

/// Storage primitives behind the message log.
///
/// Every method is atomic on its own and nothing more: sequences such as the
/// retention sweep's load-then-replace are not atomic across calls, and a
/// message appended between those two calls can be lost. Implementations
/// must not add cross-call locking.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Append to the end of a thread's log
    async fn append_message(&self, key: ThreadKey, message: StoredMessage) -> Result<()>;

    /// Full log for a thread in insertion order; empty if the log does not exist
    async fn load_log(&self, key: ThreadKey) -> Result<Vec<StoredMessage>>;

    /// Replace a thread's log with `messages`, keeping their order
    async fn replace_log(&self, key: ThreadKey, messages: Vec<StoredMessage>) -> Result<()>;

    /// Drop a thread's log entirely
    async fn delete_log(&self, key: ThreadKey) -> Result<()>;

    async fn register_conversation(&self, conversation_id: i64) -> Result<()>;

    async fn conversations(&self) -> Result<BTreeSet<i64>>;

    async fn register_thread(&self, key: ThreadKey) -> Result<()>;

    async fn unregister_thread(&self, key: ThreadKey) -> Result<()>;

    /// Explicitly registered threads only; the main thread is not implied here
    async fn registered_threads(&self, conversation_id: i64) -> Result<BTreeSet<i64>>;

    async fn load_settings(&self, conversation_id: i64) -> Result<StoredSettings>;

    async fn update_setting(&self, conversation_id: i64, update: SettingUpdate) -> Result<()>;

    async fn add_selected_topic(&self, conversation_id: i64, thread_id: i64) -> Result<()>;

    async fn remove_selected_topic(&self, conversation_id: i64, thread_id: i64) -> Result<()>;

    async fn selected_topics(&self, conversation_id: i64) -> Result<BTreeSet<i64>>;
}
