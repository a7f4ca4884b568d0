//! Terminal display width helpers.
//!
//! Provides ANSI-aware width calculation plus the word wrapping used by the
//! tile faces and the expanded panel.

use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Compute the display width of a string after stripping ANSI escapes.
pub fn display_width(text: &str) -> usize {
    let clean = strip_ansi_escapes::strip(text);
    let clean_str = String::from_utf8_lossy(&clean);
    UnicodeWidthStr::width(&*clean_str)
}

/// Drop ANSI escape sequences so that untrusted text cannot restyle the
/// terminal.
pub fn strip_ansi(text: &str) -> Cow<'_, str> {
    if !text.contains('\x1b') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(strip_ansi_escapes::strip_str(text))
}

/// Cut `text` so that it occupies at most `width` columns.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        out.push(ch);
    }
    out
}

/// Greedy word wrap. Words wider than `width` are split across lines.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let mut word = word.to_string();
        let mut word_width = UnicodeWidthStr::width(word.as_str());

        let needed = if current.is_empty() {
            word_width
        } else {
            current_width + 1 + word_width
        };
        if needed <= width {
            if !current.is_empty() {
                current.push(' ');
                current_width += 1;
            }
            current.push_str(&word);
            current_width += word_width;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        while word_width > width {
            let head = truncate_to_width(&word, width);
            // A single glyph wider than the line cannot be placed at all.
            if head.is_empty() {
                word.clear();
                word_width = 0;
                break;
            }
            word = word[head.len()..].to_string();
            word_width = UnicodeWidthStr::width(word.as_str());
            lines.push(head);
        }

        current = word;
        current_width = word_width;
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_ignores_ansi() {
        assert_eq!(display_width("\x1b[1mbold\x1b[0m"), 4);
    }

    #[test]
    fn strip_ansi_borrows_clean_text() {
        assert!(matches!(strip_ansi("plain"), Cow::Borrowed("plain")));
        assert_eq!(strip_ansi("\x1b[31mred\x1b[0m"), "red");
    }

    #[test]
    fn truncate_respects_wide_glyphs() {
        assert_eq!(truncate_to_width("日本語", 5), "日本");
        assert_eq!(truncate_to_width("short", 10), "short");
    }

    #[test]
    fn wrap_basic() {
        let lines = wrap_words("hello big world", 9);
        assert_eq!(lines, vec!["hello big".to_string(), "world".to_string()]);
    }

    #[test]
    fn wrap_splits_long_words() {
        let lines = wrap_words("abcdefghij xy", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij", "xy"]);
    }

    #[test]
    fn wrap_zero_width_is_empty() {
        assert!(wrap_words("anything", 0).is_empty());
    }
}
