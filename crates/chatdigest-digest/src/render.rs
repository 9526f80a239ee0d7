use chrono::NaiveDate;

use crate::summarizer::DigestResult;

/// Telegram's limit for a single text message
pub const DEFAULT_MESSAGE_CEILING: usize = 4096;

pub const DEFAULT_TRAILER: &str = "\n\n#summary";

/// Turns a `DigestResult` into one HTML message that never exceeds the ceiling.
///
/// Lengths are counted in `char`s.
#[derive(Debug, Clone)]
pub struct Renderer {
    ceiling: usize,
    trailer: String,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(DEFAULT_MESSAGE_CEILING, DEFAULT_TRAILER)
    }
}

impl Renderer {
    pub fn new(ceiling: usize, trailer: impl Into<String>) -> Self {
        Self {
            ceiling,
            trailer: trailer.into(),
        }
    }

    /// Header, one line per topic, then the links section when there are links.
    ///
    /// `date` is printed in the header, normally the day before the run.
    pub fn render(&self, digest: &DigestResult, date: NaiveDate) -> String {
        let mut lines = vec![format!("📆 Что обсуждалось {}\n", date.format("%d.%m.%Y"))];

        for entry in &digest.topics {
            let line = match &entry.url {
                Some(url) => format!(
                    "{} {} ({} сообщений ({}))",
                    entry.emoji, entry.topic, entry.message_count, url
                ),
                None => format!("{} {} ({} сообщений)", entry.emoji, entry.topic, entry.message_count),
            };
            lines.push(line);
        }

        if !digest.links.is_empty() {
            lines.push("\nИнтересные ссылки:\n".to_string());
            lines.extend(digest.links.iter().map(|link| format!("🔗 {link}")));
        }

        self.finish(&lines.join("\n"))
    }

    /// Cut `body` so that body plus trailer fits the ceiling.
    ///
    /// A cut never leaves half of an HTML entity behind.
    fn finish(&self, body: &str) -> String {
        let budget = self.ceiling.saturating_sub(self.trailer.chars().count());
        let mut text: String = body.chars().take(budget).collect();
        if text.len() < body.len() {
            if let Some(amp) = text.rfind('&') {
                if !text[amp..].contains(';') {
                    text.truncate(amp);
                }
            }
        }
        text.push_str(&self.trailer);
        if text.chars().count() > self.ceiling {
            text = text.chars().take(self.ceiling).collect();
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarizer::TopicEntry;
    use std::collections::BTreeSet;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    fn entry(topic: &str, count: usize, url: Option<&str>) -> TopicEntry {
        TopicEntry {
            emoji: "📝",
            topic: topic.to_string(),
            message_count: count,
            thread_id: 1,
            url: url.map(str::to_string),
        }
    }

    #[test]
    fn test_layout() {
        let digest = DigestResult {
            topics: vec![
                entry("Релиз", 12, Some("https://t.me/c/123/4")),
                entry("Обед", 3, None),
            ],
            links: BTreeSet::from(["https://a.io".to_string()]),
        };

        let text = Renderer::default().render(&digest, date());

        assert_eq!(
            text,
            "📆 Что обсуждалось 09.03.2024\n\n\
             📝 Релиз (12 сообщений (https://t.me/c/123/4))\n\
             📝 Обед (3 сообщений)\n\
             \nИнтересные ссылки:\n\n\
             🔗 https://a.io\n\n#summary"
        );
    }

    #[test]
    fn test_no_links_section_without_links() {
        let digest = DigestResult {
            topics: vec![entry("Обед", 3, None)],
            links: BTreeSet::new(),
        };
        let text = Renderer::default().render(&digest, date());
        assert!(!text.contains("Интересные ссылки"));
        assert!(text.ends_with(DEFAULT_TRAILER));
    }

    #[test]
    fn test_long_digest_is_truncated_with_trailer() {
        let links = (0..500).map(|i| format!("https://example.com/page/{i}")).collect();
        let digest = DigestResult {
            topics: vec![entry("Много ссылок", 500, None)],
            links,
        };

        let text = Renderer::default().render(&digest, date());

        assert_eq!(text.chars().count(), DEFAULT_MESSAGE_CEILING);
        assert!(text.ends_with(DEFAULT_TRAILER));
    }

    #[test]
    fn test_truncation_keeps_entities_whole() {
        let digest = DigestResult {
            topics: vec![entry(&"a&amp;".repeat(2000), 1, None)],
            links: BTreeSet::new(),
        };

        let text = Renderer::default().render(&digest, date());

        assert!(text.chars().count() <= DEFAULT_MESSAGE_CEILING);
        let body = text.strip_suffix(DEFAULT_TRAILER).unwrap();
        let tail = &body[body.rfind('&').unwrap()..];
        assert!(tail.starts_with("&amp;"), "dangling entity: {tail}");
    }

    #[test]
    fn test_trailer_longer_than_ceiling() {
        let renderer = Renderer::new(5, "0123456789");
        let text = renderer.render(&DigestResult::default(), date());
        assert_eq!(text, "01234");
    }
}
