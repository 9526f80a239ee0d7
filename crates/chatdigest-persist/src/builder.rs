use std::sync::Arc;

use crate::dbs::memory::InMemoryStore;
use crate::error::{PersistError, Result};
use crate::retention::{RetentionSweeper, DEFAULT_RETENTION_DAYS};
use crate::trait_client::MessageStore;
use crate::PersistClient;

/// Where the message log lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    MongoDb { uri: String, database: String },
}

pub struct PersistClientBuilder {
    backend: StorageBackend,
    store: Option<Arc<dyn MessageStore>>,
    retention_days: i64,
    default_interval_minutes: i64,
}

impl PersistClientBuilder {
    pub fn new() -> Self {
        Self {
            backend: StorageBackend::Memory,
            store: None,
            retention_days: DEFAULT_RETENTION_DAYS,
            default_interval_minutes: 60,
        }
    }

    pub fn backend(mut self, backend: StorageBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn mongodb(self, uri: impl Into<String>, database: impl Into<String>) -> Self {
        self.backend(StorageBackend::MongoDb {
            uri: uri.into(),
            database: database.into(),
        })
    }

    /// Use an already constructed store; takes precedence over `backend`
    pub fn store(mut self, store: Arc<dyn MessageStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn retention_days(mut self, days: i64) -> Self {
        self.retention_days = days;
        self
    }

    pub fn default_interval_minutes(mut self, minutes: i64) -> Self {
        self.default_interval_minutes = minutes;
        self
    }

    pub async fn build(self) -> Result<PersistClient> {
        if self.retention_days <= 0 {
            return Err(PersistError::Internal(format!(
                "retention_days must be positive, got {}",
                self.retention_days
            )));
        }
        if self.default_interval_minutes <= 0 {
            return Err(PersistError::Internal(format!(
                "default_interval_minutes must be positive, got {}",
                self.default_interval_minutes
            )));
        }

        let store = match self.store {
            Some(store) => store,
            None => Self::connect(self.backend).await?,
        };

        Ok(PersistClient::new(
            store,
            RetentionSweeper::new(chrono::Duration::days(self.retention_days)),
            self.default_interval_minutes,
        ))
    }

    async fn connect(backend: StorageBackend) -> Result<Arc<dyn MessageStore>> {
        match backend {
            StorageBackend::Memory => Ok(Arc::new(InMemoryStore::new())),
            #[cfg(feature = "mongodb")]
            StorageBackend::MongoDb { uri, database } => {
                let store = crate::dbs::mongo::MongoMessageStore::connect(&uri, &database).await?;
                tracing::info!(database = %database, "Connected to MongoDB message store");
                Ok(Arc::new(store))
            }
            #[cfg(not(feature = "mongodb"))]
            StorageBackend::MongoDb { .. } => Err(PersistError::Internal(
                "MongoDB backend requested but the `mongodb` feature is disabled".to_string(),
            )),
        }
    }
}

impl Default for PersistClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
