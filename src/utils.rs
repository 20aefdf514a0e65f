use unicode_segmentation::UnicodeSegmentation;

/// First `max_len` graphemes of `s`, for log lines.
pub fn substr_up_to_len(s: &str, max_len: usize) -> &str {
    match s.grapheme_indices(true).nth(max_len) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}
