use chatdigest_digest::DigestError;
use chatdigest_persist::PersistError;
use thiserror::Error;

/// Failures of a chat command, each with the reply the user sees
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Invalid command input: {reply}")]
    Configuration { reply: &'static str },

    #[error("User {user_id} is not a chat administrator")]
    PermissionDenied { user_id: i64 },

    #[error("Could not verify permissions: {0}")]
    AdminCheck(anyhow::Error),

    #[error("Backend error: {0}")]
    Backend(#[from] DigestError),
}

impl From<PersistError> for BotError {
    fn from(e: PersistError) -> Self {
        Self::Backend(DigestError::Store(e))
    }
}

impl BotError {
    pub fn reply_text(&self) -> &'static str {
        match self {
            Self::Configuration { reply } => *reply,
            Self::PermissionDenied { .. } => "Только администратор чата может вызывать принудительное саммари.",
            Self::AdminCheck(_) => "Не удалось проверить права пользователя. Попробуйте позже.",
            Self::Backend(_) => "Не удалось выполнить команду. Попробуйте позже.",
        }
    }
}

pub type BotResult<T> = Result<T, BotError>;
