//! Filesystem-safe name sanitization.

/// Characters that are illegal in filenames on common filesystems.
const ILLEGAL_CHARACTERS: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Maximum length of a sanitized name, in characters.
const MAX_NAME_LENGTH: usize = 150;

/// Fallback used when sanitization leaves nothing behind.
const FALLBACK_NAME: &str = "Unknown";

/// Turn arbitrary text into a filesystem-safe file name component.
///
/// Removes characters illegal on common filesystems and all control
/// characters, collapses whitespace runs to single spaces, trims the ends,
/// caps the result at 150 characters, and strips trailing dots and spaces
/// for Windows compatibility. Returns `"Unknown"` when nothing survives.
///
/// Pure, deterministic, and idempotent:
/// `sanitize_name(&sanitize_name(x)) == sanitize_name(x)`.
pub fn sanitize_name(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|character| !ILLEGAL_CHARACTERS.contains(character) && !character.is_control())
        .collect();
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    // Strip trailing dots/spaces after capping too, so truncation can never
    // reintroduce a trailing dot.
    let capped: String = collapsed.chars().take(MAX_NAME_LENGTH).collect();
    let trimmed = capped.trim_end_matches(['.', ' ']);
    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_illegal_characters() {
        assert_eq!(sanitize_name(r#"a\b/c*d?e:f"g<h>i|j"#), "abcdefghij");
    }

    #[test]
    fn strips_control_characters() {
        assert_eq!(sanitize_name("a\u{0}b\u{1f}c"), "abc");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(sanitize_name("  My   Title \t here  "), "My Title here");
    }

    #[test]
    fn strips_trailing_dots_and_spaces() {
        assert_eq!(sanitize_name("name..."), "name");
        assert_eq!(sanitize_name("name. . ."), "name");
    }

    #[test]
    fn caps_at_150_characters() {
        let long = "x".repeat(400);
        assert_eq!(sanitize_name(&long).chars().count(), 150);
    }

    #[test]
    fn trailing_dot_at_the_cap_is_stripped() {
        let mut input = "x".repeat(149);
        input.push('.');
        input.push_str("and more");
        let sanitized = sanitize_name(&input);
        assert!(!sanitized.ends_with('.'));
        assert!(sanitized.chars().count() <= 150);
    }

    #[test]
    fn empty_input_falls_back() {
        assert_eq!(sanitize_name(""), "Unknown");
        assert_eq!(sanitize_name("???"), "Unknown");
        assert_eq!(sanitize_name(" . . "), "Unknown");
    }

    #[test]
    fn multi_artist_slashes_collapse() {
        // "A / B" loses the slash, then the double space collapses.
        assert_eq!(sanitize_name("Artist A / Artist B"), "Artist A Artist B");
    }

    #[test]
    fn idempotent() {
        let inputs = [
            "plain",
            "  My   Title \t here  ",
            r#"a\b/c*d?e"#,
            "name...",
            "???",
            "",
            "Artist A / Artist B - My Title",
        ];
        for input in inputs {
            let once = sanitize_name(input);
            assert_eq!(sanitize_name(&once), once, "not idempotent for {input:?}");
        }
    }
}
