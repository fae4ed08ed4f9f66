//! String utilities for the domain layer.

/// Truncate a string to a maximum length with ellipsis (UTF-8 safe)
///
/// Uses byte length for max_len but ensures truncation occurs at valid
/// UTF-8 character boundaries.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let target = max_len.saturating_sub(3);
        let mut end = target.min(s.len());
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}

/// Return the first `max_chars` characters of `s` if it is longer than that.
///
/// Counts Unicode scalar values, not bytes. Returns `None` when `s` already
/// fits, so callers can tell whether anything was cut.
pub fn char_prefix(s: &str, max_chars: usize) -> Option<&str> {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => Some(&s[..end]),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("日本語テスト", 30), "日本語テスト");
        // 3 bytes per char: target 12 -> 4 chars
        assert_eq!(truncate("日本語テスト文字列", 15), "日本語テ...");
    }

    #[test]
    fn test_char_prefix_fits() {
        assert_eq!(char_prefix("hello", 5), None);
        assert_eq!(char_prefix("", 0), None);
    }

    #[test]
    fn test_char_prefix_cuts_on_chars() {
        assert_eq!(char_prefix("hello", 3), Some("hel"));
        assert_eq!(char_prefix("日本語テスト", 2), Some("日本"));
        assert_eq!(char_prefix("ab", 0), Some(""));
    }
}
