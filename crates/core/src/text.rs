//! Display text helpers: punctuation cleanup and the reading-order anchor.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

/// Marker prepended to the first line of a group so the renderer can show
/// where reading starts. A hair space: visually negligible, never produced
/// by OCR.
pub const ANCHOR_MARKER: char = '\u{200A}';

static REPEATED_MARKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[!?]{2,}").unwrap());

/// Collapses runs of two or more `!`/`?` into one mark.
///
/// A run containing any `?` becomes `?`, otherwise `!`.
pub fn normalize_display_text(text: &str) -> Cow<'_, str> {
    REPEATED_MARKS.replace_all(text, |caps: &regex::Captures<'_>| {
        if caps[0].contains('?') { "?" } else { "!" }
    })
}

pub fn has_anchor(text: &str) -> bool {
    text.starts_with(ANCHOR_MARKER)
}

/// Prepends the anchor marker unless already present.
pub fn with_anchor(text: &str) -> String {
    if has_anchor(text) {
        text.to_string()
    } else {
        let mut s = String::with_capacity(text.len() + ANCHOR_MARKER.len_utf8());
        s.push(ANCHOR_MARKER);
        s.push_str(text);
        s
    }
}

/// Removes one leading anchor marker, if any.
pub fn strip_anchor(text: &str) -> &str {
    text.strip_prefix(ANCHOR_MARKER).unwrap_or(text)
}
