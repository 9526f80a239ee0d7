use std::collections::BTreeSet;
use std::sync::Arc;

use chatdigest_llm::TextGenerator;
use chatdigest_persist::{ChatLine, PersistClient, MAIN_THREAD_ID};
use chrono::{DateTime, Utc};

use crate::emoji::topic_emoji;
use crate::error::{DigestError, Result};
use crate::links::extract_links;
use crate::sanitize::escape_html;
use crate::templates::{DEFAULT_TOPIC_PROMPT, MESSAGES_PLACEHOLDER};

/// One summarized thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicEntry {
    pub emoji: &'static str,
    /// Model reply, HTML-escaped
    pub topic: String,
    pub message_count: usize,
    pub thread_id: i64,
    pub url: Option<String>,
}

/// Topics ordered by message count (largest first) plus every distinct
/// HTML-escaped link from the summarized threads
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DigestResult {
    pub topics: Vec<TopicEntry>,
    pub links: BTreeSet<String>,
}

impl DigestResult {
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty() && self.links.is_empty()
    }
}

/// Deep link to a thread of a supergroup, `None` for the main thread.
///
/// Supergroup ids look like `-100XXXXXXXXXX`; the public link form drops the
/// first four characters of the decimal id.
pub fn thread_deep_link(conversation_id: i64, thread_id: i64) -> Option<String> {
    if thread_id == MAIN_THREAD_ID {
        return None;
    }
    let id = conversation_id.to_string();
    Some(format!(
        "https://t.me/c/{}/{}",
        id.get(4..).unwrap_or_default(),
        thread_id
    ))
}

/// Produces one topic label per thread with one generator call each
pub struct Summarizer {
    generator: Arc<dyn TextGenerator>,
    prompt_template: String,
}

impl Summarizer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            prompt_template: DEFAULT_TOPIC_PROMPT.to_string(),
        }
    }

    pub fn with_prompt_template(mut self, template: impl Into<String>) -> Self {
        self.prompt_template = template.into();
        self
    }

    /// Transcript lines are `author: text` with the text HTML-escaped
    pub fn build_prompt(&self, lines: &[ChatLine]) -> String {
        let transcript = lines
            .iter()
            .map(|line| format!("{}: {}", line.author, escape_html(&line.text)))
            .collect::<Vec<_>>()
            .join("\n");
        self.prompt_template.replace(MESSAGES_PLACEHOLDER, &transcript)
    }

    /// Summarize `threads` of a conversation. Without `since`, the
    /// conversation's `last_summary_time` is used.
    pub async fn summarize(
        &self,
        persist: &PersistClient,
        conversation_id: i64,
        threads: &[i64],
        since: Option<DateTime<Utc>>,
    ) -> Result<DigestResult> {
        self.summarize_at(persist, conversation_id, threads, since, Utc::now())
            .await
    }

    /// Same as `summarize` with retention evaluated against `now`.
    ///
    /// A failed generator call skips that thread; the run only fails when
    /// every attempted call failed.
    pub async fn summarize_at(
        &self,
        persist: &PersistClient,
        conversation_id: i64,
        threads: &[i64],
        since: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<DigestResult> {
        let since = match since {
            Some(since) => since,
            None => persist.last_summary_time(conversation_id).await?,
        };

        let mut result = DigestResult::default();
        let mut first_failure = None;

        for &thread_id in threads {
            let lines = persist
                .messages_since_at(conversation_id, thread_id, since, now)
                .await?;
            if lines.is_empty() {
                continue;
            }

            let reply = match self.generator.generate(&self.build_prompt(&lines)).await {
                Ok(reply) => reply,
                Err(error) => {
                    tracing::warn!(
                        conversation_id,
                        thread_id,
                        error = %error,
                        "Topic generation failed, skipping thread"
                    );
                    first_failure.get_or_insert(DigestError::Generation { thread_id, error });
                    continue;
                }
            };

            for line in &lines {
                result.links.extend(extract_links(&line.text).map(escape_html));
            }

            let topic = escape_html(reply.trim());
            result.topics.push(TopicEntry {
                emoji: topic_emoji(&topic),
                topic,
                message_count: lines.len(),
                thread_id,
                url: thread_deep_link(conversation_id, thread_id),
            });
        }

        if result.topics.is_empty() {
            if let Some(failure) = first_failure {
                return Err(failure);
            }
        }

        // stable: equal counts keep thread order
        result
            .topics
            .sort_by(|a, b| b.message_count.cmp(&a.message_count));

        tracing::debug!(
            conversation_id,
            topics = result.topics.len(),
            links = result.links.len(),
            "Summarized threads"
        );

        Ok(result)
    }
}
