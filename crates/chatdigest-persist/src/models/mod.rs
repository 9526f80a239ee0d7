mod message;
mod settings;
pub mod timestamp;

pub use message::{ChatLine, StoredMessage, ThreadKey, MAIN_THREAD_ID};
pub use settings::{DigestSettings, SettingUpdate, StoredSettings};
