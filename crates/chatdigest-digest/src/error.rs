use chatdigest_persist::PersistError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DigestError {
    #[error("Store error: {0}")]
    Store(#[from] PersistError),

    #[error("Topic generation failed for thread {thread_id}: {error}")]
    Generation { thread_id: i64, error: anyhow::Error },

    #[error("Chat lookup failed for {conversation_id}: {error}")]
    ChatLookup { conversation_id: i64, error: anyhow::Error },

    #[error("Delivery to {conversation_id} (thread {thread_id:?}) failed: {error}")]
    Delivery {
        conversation_id: i64,
        thread_id: Option<i64>,
        error: anyhow::Error,
    },
}

impl DigestError {
    /// Backend unreachable or failing; worth retrying on the next trigger
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Store(e) => e.is_transient(),
            Self::Generation { .. } | Self::ChatLookup { .. } | Self::Delivery { .. } => true,
        }
    }
}

pub type Result<T> = std::result::Result<T, DigestError>;
