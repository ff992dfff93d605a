//! Shared utility functions.

/// Shorten `text` to at most `max_chars` characters for log lines,
/// marking a cut with `...`.
///
/// Counts characters, not bytes, so Tamil or Devanagari queries are never
/// split inside a code point.
pub fn preview(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    match flat.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &flat[..cut]),
        None => flat,
    }
}
