pub mod client;
pub mod types;

pub use client::TelegramClient;
pub use types::{Chat, ChatKind, ChatMember, Message, Update, User};
