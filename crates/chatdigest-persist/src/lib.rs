pub mod models;
pub mod trait_client;
pub mod dbs;
pub mod retention;
pub mod client;
pub mod error;
pub mod builder;

pub use models::{ChatLine, DigestSettings, SettingUpdate, StoredMessage, StoredSettings, ThreadKey, MAIN_THREAD_ID};
pub use trait_client::MessageStore;
pub use dbs::memory::InMemoryStore;
#[cfg(feature = "mongodb")]
pub use dbs::mongo::MongoMessageStore;
pub use retention::{RetentionSweeper, DEFAULT_RETENTION_DAYS};
pub use client::PersistClient;
pub use error::{PersistError, Result};
pub use builder::{PersistClientBuilder, StorageBackend};
