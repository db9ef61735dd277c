// Utility functions for admin API

/// Shorten content for list responses. Cuts on a character boundary and
/// appends an ellipsis when anything was dropped.
pub fn content_preview(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &content[..idx]),
        None => content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_content_is_unchanged() {
        assert_eq!(content_preview("hello", 100), "hello");
    }

    #[test]
    fn test_long_content_is_truncated() {
        let long = "a".repeat(150);
        let preview = content_preview(&long, 100);

        assert_eq!(preview.len(), 103);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let text = "héllo wörld".repeat(20);
        let preview = content_preview(&text, 100);

        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 103);
    }

    #[test]
    fn test_exact_length_is_unchanged() {
        let text = "a".repeat(100);
        assert_eq!(content_preview(&text, 100), text);
    }
}
