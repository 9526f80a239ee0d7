/// Escape text for Telegram HTML parse mode.
///
/// `&` goes first so the entities produced for `<` and `>` are not escaped again.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes_markup() {
        assert_eq!(escape_html("<b>bold</b>"), "&lt;b&gt;bold&lt;/b&gt;");
    }

    #[test]
    fn test_ampersand_escaped_once() {
        assert_eq!(escape_html("a & b < c"), "a &amp; b &lt; c");
        assert_eq!(escape_html("&amp;"), "&amp;amp;");
        assert!(!escape_html("<").contains("&amp;lt;"));
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(escape_html("обычный текст"), "обычный текст");
    }
}
