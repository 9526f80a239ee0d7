/// Keyword -> emoji, checked in order; the first keyword found in a topic wins
const TOPIC_EMOJI: &[(&str, &str)] = &[
    ("разработка", "💻"),
    ("статистика", "📊"),
    ("безопасность", "🔒"),
    ("доступ", "🌐"),
    ("финансы", "💰"),
    ("конфигурация", "⚙️"),
    ("нагрузка", "⚖️"),
    ("музыка", "🎶"),
    ("пароль", "🔑"),
    ("api", "🔧"),
    ("бот", "🤖"),
];

const FALLBACK_EMOJI: &str = "📝";

/// Case-insensitive substring match of the topic against the keyword table
pub fn topic_emoji(topic: &str) -> &'static str {
    let topic = topic.to_lowercase();
    TOPIC_EMOJI
        .iter()
        .find(|(keyword, _)| topic.contains(keyword))
        .map(|(_, emoji)| *emoji)
        .unwrap_or(FALLBACK_EMOJI)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_match() {
        assert_eq!(topic_emoji("Настройка API шлюза"), "🔧");
        assert_eq!(topic_emoji("БЕЗОПАСНОСТЬ паролей"), "🔒");
    }

    #[test]
    fn test_table_order_breaks_ties() {
        // "пароль" and "бот" both appear; "безопасность" is earlier than both
        assert_eq!(topic_emoji("бот, пароль и безопасность"), "🔒");
        assert_eq!(topic_emoji("пароль для бота"), "🔑");
    }

    #[test]
    fn test_fallback() {
        assert_eq!(topic_emoji("Планы на выходные"), "📝");
    }
}
