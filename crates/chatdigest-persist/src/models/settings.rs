use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

/// Per-conversation digest state exactly as persisted; `None` means "never set"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSettings {
    #[serde(rename = "summary_enabled", default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(rename = "summary_interval", default, skip_serializing_if = "Option::is_none")]
    pub interval_minutes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_topic_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_summary_time: Option<DateTime<Utc>>,
}

impl StoredSettings {
    pub fn apply(&mut self, update: SettingUpdate) {
        match update {
            SettingUpdate::Enabled(enabled) => self.enabled = Some(enabled),
            SettingUpdate::IntervalMinutes(minutes) => self.interval_minutes = Some(minutes),
            SettingUpdate::SummaryTopic(topic_id) => self.summary_topic_id = Some(topic_id),
            SettingUpdate::LastSummaryTime(at) => self.last_summary_time = Some(at),
        }
    }

    /// Fill unset fields with their documented defaults
    pub fn resolve(&self, default_interval_minutes: i64, selected_topics: BTreeSet<i64>) -> DigestSettings {
        DigestSettings {
            enabled: self.enabled.unwrap_or(true),
            // a stored zero behaves like "unset"
            interval_minutes: self
                .interval_minutes
                .filter(|m| *m > 0)
                .unwrap_or(default_interval_minutes),
            summary_topic_id: self.summary_topic_id.unwrap_or(0),
            last_summary_time: self.last_summary_time.unwrap_or_else(timestamp::epoch),
            selected_topics,
        }
    }
}

/// A single-field mutation of a conversation's digest state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingUpdate {
    Enabled(bool),
    IntervalMinutes(i64),
    SummaryTopic(i64),
    LastSummaryTime(DateTime<Utc>),
}

impl SettingUpdate {
    /// Field name in the persisted settings hash
    pub fn field(&self) -> &'static str {
        match self {
            Self::Enabled(_) => "summary_enabled",
            Self::IntervalMinutes(_) => "summary_interval",
            Self::SummaryTopic(_) => "summary_topic_id",
            Self::LastSummaryTime(_) => "last_summary_time",
        }
    }
}

/// Effective digest settings for one conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestSettings {
    pub enabled: bool,
    pub interval_minutes: i64,
    /// 0 = no override, digests go to their own threads
    pub summary_topic_id: i64,
    pub last_summary_time: DateTime<Utc>,
    /// Empty = every known thread is eligible
    pub selected_topics: BTreeSet<i64>,
}

impl DigestSettings {
    /// Whether a scheduled digest is due at `now`
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.enabled && now >= self.last_summary_time + chrono::Duration::minutes(self.interval_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = StoredSettings::default().resolve(60, BTreeSet::new());
        assert!(settings.enabled);
        assert_eq!(settings.interval_minutes, 60);
        assert_eq!(settings.summary_topic_id, 0);
        assert_eq!(settings.last_summary_time, timestamp::epoch());
    }

    #[test]
    fn test_zero_interval_falls_back_to_default() {
        let mut stored = StoredSettings::default();
        stored.apply(SettingUpdate::IntervalMinutes(0));
        assert_eq!(stored.resolve(45, BTreeSet::new()).interval_minutes, 45);
    }

    #[test]
    fn test_due_boundaries() {
        let now = Utc::now();
        let mut stored = StoredSettings::default();
        stored.apply(SettingUpdate::IntervalMinutes(60));

        stored.apply(SettingUpdate::LastSummaryTime(now - chrono::Duration::minutes(61)));
        assert!(stored.resolve(10, BTreeSet::new()).is_due(now));

        stored.apply(SettingUpdate::LastSummaryTime(now - chrono::Duration::minutes(59)));
        assert!(!stored.resolve(10, BTreeSet::new()).is_due(now));
    }

    #[test]
    fn test_disabled_is_never_due() {
        let mut stored = StoredSettings::default();
        stored.apply(SettingUpdate::Enabled(false));
        let settings = stored.resolve(1, BTreeSet::new());
        assert!(!settings.is_due(Utc::now() + chrono::Duration::days(365)));
    }
}
