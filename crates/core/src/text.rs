//! Text helpers shared by records and the sort/filter engine
//!
//! Strings entered right-to-left are stored with a leading `&rtl` marker.
//! The marker is part of the stored value but never part of what is
//! compared, searched or exported.

use crate::error::{LexiError, LexiResult};

/// Marker prefix meaning "render this string right-to-left"
pub const RTL_MARKER: &str = "&rtl";

/// Whether the text carries the right-to-left marker
pub fn is_rtl(text: &str) -> bool {
    text.starts_with(RTL_MARKER)
}

/// Remove every direction marker from the text
pub fn strip_direction(text: &str) -> String {
    text.replace(RTL_MARKER, "")
}

/// Return the text with exactly one leading marker when `rtl` is set
pub fn with_direction(text: &str, rtl: bool) -> String {
    let bare = strip_direction(text);
    if rtl {
        format!("{RTL_MARKER}{bare}")
    } else {
        bare
    }
}

/// Comparison key for text: marker stripped, lowercased
pub fn sort_text(text: &str) -> String {
    strip_direction(text).to_lowercase()
}

/// Normalize a user supplied tag
///
/// Tags are lowercased and trimmed. The result must be non-empty and
/// contain neither whitespace nor `#`.
pub fn normalize_tag(tag: &str) -> LexiResult<String> {
    let tag = tag.trim().to_lowercase();
    if tag.is_empty() {
        return Err(LexiError::invalid_format("tag cannot be empty"));
    }
    if tag.contains('#') || tag.chars().any(char::is_whitespace) {
        return Err(LexiError::invalid_format(format!(
            "tag '{tag}' cannot contain spaces or '#'"
        )));
    }
    Ok(tag)
}
