use std::sync::Arc;

use chatdigest_persist::{DigestSettings, PersistClient};
use chrono::{DateTime, Duration, Utc};

use crate::error::{DigestError, Result};
use crate::gateway::ChatGateway;
use crate::render::Renderer;
use crate::routing::plan_routes;
use crate::summarizer::Summarizer;

/// Window covered by an on-demand digest
pub const MANUAL_LOOKBACK_HOURS: i64 = 24;

/// How a digest run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestOutcome {
    /// Number of messages posted
    Delivered(usize),
    /// Nothing new in any eligible thread
    Empty,
}

/// Summarize, render and deliver the digests of one conversation
pub struct DigestRunner {
    persist: PersistClient,
    summarizer: Summarizer,
    renderer: Renderer,
    gateway: Arc<dyn ChatGateway>,
}

impl DigestRunner {
    pub fn new(
        persist: PersistClient,
        summarizer: Summarizer,
        renderer: Renderer,
        gateway: Arc<dyn ChatGateway>,
    ) -> Self {
        Self {
            persist,
            summarizer,
            renderer,
            gateway,
        }
    }

    pub fn persist(&self) -> &PersistClient {
        &self.persist
    }

    /// Run a digest for messages newer than `since`. Does not touch
    /// `last_summary_time`; scheduling owns that.
    pub async fn run(
        &self,
        conversation_id: i64,
        settings: &DigestSettings,
        since: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<DigestOutcome> {
        let info = self
            .gateway
            .chat_info(conversation_id)
            .await
            .map_err(|error| DigestError::ChatLookup {
                conversation_id,
                error,
            })?;

        let known_threads = self.persist.threads(conversation_id).await?;
        let routes = plan_routes(
            info.is_forum,
            settings.summary_topic_id,
            &known_threads,
            &settings.selected_topics,
        );
        let header_date = (now - Duration::days(1)).date_naive();

        let mut delivered = 0;
        for route in routes {
            let digest = self
                .summarizer
                .summarize_at(&self.persist, conversation_id, &route.threads, Some(since), now)
                .await?;
            if digest.is_empty() {
                continue;
            }

            let text = self.renderer.render(&digest, header_date);
            self.gateway
                .deliver(conversation_id, route.destination, &text)
                .await
                .map_err(|error| DigestError::Delivery {
                    conversation_id,
                    thread_id: route.destination,
                    error,
                })?;
            delivered += 1;

            tracing::info!(
                conversation_id,
                destination = ?route.destination,
                topics = digest.topics.len(),
                "Digest delivered"
            );
        }

        Ok(if delivered == 0 {
            DigestOutcome::Empty
        } else {
            DigestOutcome::Delivered(delivered)
        })
    }

    /// On-demand digest of the last 24 hours
    pub async fn run_manual(&self, conversation_id: i64, now: DateTime<Utc>) -> Result<DigestOutcome> {
        let settings = self.persist.settings(conversation_id).await?;
        let since = now - Duration::hours(MANUAL_LOOKBACK_HOURS);
        self.run(conversation_id, &settings, since, now).await
    }
}
