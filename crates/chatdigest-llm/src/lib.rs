pub mod types;
pub mod traits;
pub mod config;
pub mod generator;
pub mod openai;
pub mod azure_openai;
mod transport;

pub use traits::{
    ChatClient,
    TextGenerator,
    ChatRequest, ChatResponse, ChatOptions,
    TokenUsage,
};

pub use config::{AzureConfig, ClientFactory, OpenAIConfig, ProviderConfig, ProviderType};
pub use generator::{ChatGenerator, DEFAULT_GENERATOR_SYSTEM_PROMPT};
pub use openai::OpenAIClient;
pub use azure_openai::AzureOpenAIClient;
pub use transport::DEFAULT_REQUEST_TIMEOUT;
pub use types::{Message, Content};
