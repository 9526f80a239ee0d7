use chrono::{DateTime, Duration, Utc};

use crate::error::Result;
use crate::models::{StoredMessage, ThreadKey};
use crate::trait_client::MessageStore;

pub const DEFAULT_RETENTION_DAYS: i64 = 3;

/// Age-based pruning of a thread's log, run lazily from read paths.
///
/// A sweep is a full read followed by a rewrite. The two steps are separate
/// store calls, so a message appended in between is dropped by the rewrite.
/// Retention is best-effort and this race is accepted.
#[derive(Debug, Clone, Copy)]
pub struct RetentionSweeper {
    horizon: Duration,
}

impl Default for RetentionSweeper {
    fn default() -> Self {
        Self::new(Duration::days(DEFAULT_RETENTION_DAYS))
    }
}

impl RetentionSweeper {
    pub fn new(horizon: Duration) -> Self {
        Self { horizon }
    }

    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.horizon
    }

    /// Prune everything at or before `now - horizon`; returns the retained log
    pub async fn sweep(
        &self,
        store: &dyn MessageStore,
        key: ThreadKey,
        now: DateTime<Utc>,
    ) -> Result<Vec<StoredMessage>> {
        prune_before(store, key, self.cutoff(now)).await
    }
}

/// Keep only messages strictly newer than `cutoff`.
///
/// An emptied log is deleted and its thread id leaves the registry. This
/// applies to the main thread too; readers re-add it when listing threads.
pub async fn prune_before(
    store: &dyn MessageStore,
    key: ThreadKey,
    cutoff: DateTime<Utc>,
) -> Result<Vec<StoredMessage>> {
    let log = store.load_log(key).await?;
    if log.is_empty() {
        return Ok(log);
    }

    let total = log.len();
    let keep: Vec<StoredMessage> = log.into_iter().filter(|m| m.timestamp > cutoff).collect();
    let discarded = total - keep.len();

    if keep.is_empty() {
        store.delete_log(key).await?;
        store.unregister_thread(key).await?;
        tracing::debug!(thread = %key, discarded, "Retention emptied thread log");
    } else if discarded > 0 {
        store.replace_log(key, keep.clone()).await?;
        tracing::debug!(thread = %key, discarded, kept = keep.len(), "Retention pruned thread log");
    }

    Ok(keep)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dbs::memory::InMemoryStore;

    fn msg(text: &str, at: DateTime<Utc>) -> StoredMessage {
        StoredMessage::new("tester", text, at)
    }

    #[tokio::test]
    async fn test_sweep_keeps_recent_in_order() {
        let store = InMemoryStore::new();
        let key = ThreadKey::new(100, 0);
        let now = Utc::now();
        store.register_thread(key).await.unwrap();
        store.append_message(key, msg("old", now - Duration::days(4))).await.unwrap();
        store.append_message(key, msg("a", now - Duration::hours(5))).await.unwrap();
        store.append_message(key, msg("b", now - Duration::hours(1))).await.unwrap();

        let kept = RetentionSweeper::default().sweep(&store, key, now).await.unwrap();

        let texts: Vec<_> = kept.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b"]);
        assert_eq!(store.load_log(key).await.unwrap(), kept);
        assert!(store.registered_threads(100).await.unwrap().contains(&0));
    }

    #[tokio::test]
    async fn test_sweep_removes_empty_thread() {
        let store = InMemoryStore::new();
        let key = ThreadKey::new(100, 17);
        let now = Utc::now();
        store.register_thread(key).await.unwrap();
        store.append_message(key, msg("stale", now - Duration::days(4))).await.unwrap();

        let kept = RetentionSweeper::default().sweep(&store, key, now).await.unwrap();

        assert!(kept.is_empty());
        assert!(store.load_log(key).await.unwrap().is_empty());
        assert!(!store.registered_threads(100).await.unwrap().contains(&17));
    }

    #[tokio::test]
    async fn test_sweep_is_idempotent() {
        let store = InMemoryStore::new();
        let key = ThreadKey::new(7, 3);
        let now = Utc::now();
        store.append_message(key, msg("old", now - Duration::days(3) - Duration::seconds(1))).await.unwrap();
        store.append_message(key, msg("new", now - Duration::days(2))).await.unwrap();

        let sweeper = RetentionSweeper::default();
        let first = sweeper.sweep(&store, key, now).await.unwrap();
        let second = sweeper.sweep(&store, key, now).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(second.len(), 1);
    }

    #[tokio::test]
    async fn test_message_exactly_at_cutoff_is_pruned() {
        let store = InMemoryStore::new();
        let key = ThreadKey::new(7, 0);
        let now = Utc::now();
        let sweeper = RetentionSweeper::default();
        store.append_message(key, msg("edge", sweeper.cutoff(now))).await.unwrap();

        assert!(sweeper.sweep(&store, key, now).await.unwrap().is_empty());
    }
}
