//! Shared string helpers.

use std::borrow::Cow;

/// Longest prefix of `s` that fits in `max_bytes` without splitting a UTF-8
/// character.
pub fn clip_to_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Clip `s` to `max_bytes`, noting how much was dropped.
pub fn clip_with_marker(s: &str, max_bytes: usize) -> Cow<'_, str> {
    let clipped = clip_to_boundary(s, max_bytes);
    if clipped.len() == s.len() {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(format!(
            "{}\n[... {} more bytes omitted]",
            clipped,
            s.len() - clipped.len()
        ))
    }
}

/// First line of `s`, clipped to `max_chars` characters with an ellipsis.
pub fn one_line_preview(s: &str, max_chars: usize) -> String {
    let first = s.lines().next().unwrap_or("").trim_end();
    let more_lines = s.trim_end().lines().nth(1).is_some();
    let mut out: String = first.chars().take(max_chars).collect();
    if first.chars().count() > max_chars || more_lines {
        out.push('…');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_keeps_short_strings() {
        assert_eq!(clip_to_boundary("plan", 10), "plan");
        assert_eq!(clip_to_boundary("", 0), "");
    }

    #[test]
    fn clip_backs_off_multibyte() {
        // 'é' is two bytes
        assert_eq!(clip_to_boundary("café", 4), "caf");
        assert_eq!(clip_to_boundary("café", 5), "café");
    }

    #[test]
    fn marker_reports_omitted_bytes() {
        assert_eq!(clip_with_marker("short", 10), "short");
        let clipped = clip_with_marker("abcdefghij", 4);
        assert_eq!(clipped, "abcd\n[... 6 more bytes omitted]");
    }

    #[test]
    fn preview_takes_first_line() {
        assert_eq!(one_line_preview("one\ntwo", 10), "one…");
        assert_eq!(one_line_preview("single", 10), "single");
        assert_eq!(one_line_preview("abcdefgh", 3), "abc…");
        assert_eq!(one_line_preview("", 3), "");
    }
}
