use std::sync::Arc;
use std::time::Duration;

use chatdigest_persist::PersistClient;
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::Result;
use crate::runner::{DigestOutcome, DigestRunner};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Counters for one scheduler pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub due: usize,
    pub delivered: usize,
    pub failed: usize,
}

/// Periodically runs digests for every conversation whose interval elapsed
pub struct DigestScheduler {
    runner: Arc<DigestRunner>,
    poll_interval: Duration,
}

impl DigestScheduler {
    pub fn new(runner: Arc<DigestRunner>) -> Self {
        Self {
            runner,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    fn persist(&self) -> &PersistClient {
        self.runner.persist()
    }

    /// One pass over all known conversations. A failing conversation is
    /// logged and does not stop the others.
    pub async fn tick(&self, now: DateTime<Utc>) -> Result<TickReport> {
        let conversations = self.persist().conversations().await?;
        let mut report = TickReport::default();

        for conversation_id in conversations {
            match self.process(conversation_id, now).await {
                Ok(None) => {}
                Ok(Some(outcome)) => {
                    report.due += 1;
                    if let DigestOutcome::Delivered(n) = outcome {
                        report.delivered += n;
                    }
                }
                Err(e) => {
                    report.due += 1;
                    report.failed += 1;
                    tracing::error!(
                        conversation_id,
                        error = %e,
                        transient = e.is_transient(),
                        "Scheduled digest failed"
                    );
                }
            }
        }

        Ok(report)
    }

    /// `None` when the conversation is disabled or not yet due
    async fn process(&self, conversation_id: i64, now: DateTime<Utc>) -> Result<Option<DigestOutcome>> {
        let settings = self.persist().settings(conversation_id).await?;
        if !settings.is_due(now) {
            return Ok(None);
        }

        tracing::debug!(conversation_id, since = %settings.last_summary_time, "Digest due");
        let outcome = self
            .runner
            .run(conversation_id, &settings, settings.last_summary_time, now)
            .await?;

        self.persist().set_last_summary_time(conversation_id, now).await?;
        Ok(Some(outcome))
    }

    /// Poll until `stop` flips to true or its sender is dropped
    pub async fn run(self, mut stop: watch::Receiver<bool>) {
        tracing::info!(poll_interval = ?self.poll_interval, "Digest scheduler started");

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {}
                changed = stop.changed() => {
                    if changed.is_err() || *stop.borrow() {
                        break;
                    }
                    continue;
                }
            }

            if let Err(e) = self.tick(Utc::now()).await {
                tracing::error!(error = %e, "Digest scheduler pass failed");
            }
        }

        tracing::info!("Digest scheduler stopped");
    }

    pub fn spawn(self) -> SchedulerHandle {
        let (stop, rx) = watch::channel(false);
        let task = tokio::spawn(self.run(rx));
        SchedulerHandle { stop, task }
    }
}

/// Owner of a spawned scheduler task
pub struct SchedulerHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Signal the loop and wait for the current pass to finish
    pub async fn shutdown(self) {
        let _ = self.stop.send(true);
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "Digest scheduler task ended abnormally");
        }
    }
}
