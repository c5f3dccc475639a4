use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncates `s` to at most `max_width` display columns, marking the cut
/// with an ellipsis.
pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

/// Pads `s` with spaces up to `width` display columns.
pub fn pad_unicode(s: &str, width: usize) -> String {
    let mut padded = s.to_string();
    padded.extend(std::iter::repeat_n(' ', width.saturating_sub(s.width())));
    padded
}

pub fn format_percent(value: f64) -> String {
    format!("{value:.2}")
}
