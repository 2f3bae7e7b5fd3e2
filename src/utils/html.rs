// src/utils/html.rs

use ammonia;

/// Clean user-supplied text using the ammonia library.
///
/// Whitelist-based sanitization: safe tags (like <b>, <p>) survive while
/// dangerous tags (like <script>, <iframe>) and attributes (like onclick)
/// are stripped. Chat messages pass through here before they are persisted,
/// so stored transcripts can never carry markup into another client.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_script_tags() {
        let cleaned = clean_html("hello <script>alert(1)</script> world");
        assert!(!cleaned.contains("script"));
        assert!(cleaned.contains("hello"));
    }

    #[test]
    fn keeps_plain_text_intact() {
        assert_eq!(clean_html("just a message"), "just a message");
    }
}
