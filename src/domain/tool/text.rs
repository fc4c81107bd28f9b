//! Text helpers used when summarizing inputs into history rows.

/// Number of whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Number of characters (not bytes).
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// First `max_chars` characters of `text`, never splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// First `max_chars` characters followed by `...`.
///
/// The ellipsis is appended unconditionally, as history previews always
/// carry it.
pub fn preview(text: &str, max_chars: usize) -> String {
    format!("{}...", truncate_chars(text, max_chars))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn word_count_ignores_repeated_whitespace() {
        assert_eq!(word_count("  uma  redação\tcom\nquatro "), 4);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn truncate_respects_multibyte_chars() {
        assert_eq!(truncate_chars("ação", 2), "aç");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn preview_always_appends_ellipsis() {
        assert_eq!(preview("Tema livre", 4), "Tema...");
        assert_eq!(preview("curto", 100), "curto...");
    }

    proptest! {
        #[test]
        fn truncate_never_exceeds_limit(text in "\\PC*", max in 0usize..64) {
            let cut = truncate_chars(&text, max);
            prop_assert!(char_count(cut) <= max);
            prop_assert!(text.starts_with(cut));
        }

        #[test]
        fn truncate_is_identity_when_short(text in "\\PC{0,16}") {
            prop_assert_eq!(truncate_chars(&text, 16), text.as_str());
        }

        #[test]
        fn word_count_matches_joined_words(words in proptest::collection::vec("[a-zà-ú]{1,8}", 0..20)) {
            let text = words.join(" ");
            prop_assert_eq!(word_count(&text), words.len());
        }
    }
}
