use serde::{Deserialize, Serialize};
use super::content::Content;

/// Chat-completion message, tagged by role the way OpenAI-compatible APIs expect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    /// Instructions for the model
    System { content: Content },

    /// Prompt text (chat transcript plus instructions)
    #[serde(rename = "user")]
    Human { content: Content },
}

impl Message {
    pub fn system(content: impl Into<Content>) -> Self {
        Self::System { content: content.into() }
    }

    pub fn human(content: impl Into<Content>) -> Self {
        Self::Human { content: content.into() }
    }
}
