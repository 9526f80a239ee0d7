pub mod error;
pub mod sanitize;
pub mod links;
pub mod emoji;
pub mod templates;
pub mod summarizer;
pub mod render;
pub mod gateway;
pub mod routing;
pub mod runner;
pub mod scheduler;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use error::{DigestError, Result};
pub use sanitize::escape_html;
pub use links::extract_links;
pub use emoji::topic_emoji;
pub use templates::DEFAULT_TOPIC_PROMPT;
pub use summarizer::{thread_deep_link, DigestResult, Summarizer, TopicEntry};
pub use render::{Renderer, DEFAULT_MESSAGE_CEILING, DEFAULT_TRAILER};
pub use gateway::{ChatGateway, ChatInfo};
pub use routing::{plan_routes, DigestRoute};
pub use runner::{DigestOutcome, DigestRunner, MANUAL_LOOKBACK_HOURS};
pub use scheduler::{DigestScheduler, SchedulerHandle, TickReport, DEFAULT_POLL_INTERVAL};
