const LINK_PREFIXES: [&str; 3] = ["http://", "https://", "t.me/"];

/// Whitespace-separated tokens that start like a link; no URL validation
pub fn extract_links(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
        .filter(|token| LINK_PREFIXES.iter().any(|prefix| token.starts_with(prefix)))
}
