//! Slash-separated addressing of sections and options.
//!
//! Empty segments are dropped, so `/a//b/` and `a/b` name the same entry.

use crate::error::{Error, Result};

/// Separator between the segments of a path.
pub const SEPARATOR: char = '/';

/// Characters trimmed from both ends of every name, value, and path token.
pub const TRIM_CHARS: &[char] = &[' ', '\t', '\r', '\n'];

#[must_use]
/// Split a path into its non-empty segments.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split(SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Join segments back into a path.
pub(crate) fn join_path<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("/")
}

pub(crate) fn trim(token: &str) -> &str {
    token.trim_matches(TRIM_CHARS)
}

/// Characters that end a name, or a whole line, when text is read back.
const NAME_DELIMITERS: &[char] = &[SEPARATOR, '{', '}', '=', '#', '\n', '\r'];

/// Characters that cut a value short when text is read back.
const VALUE_DELIMITERS: &[char] = &['#', '\n', '\r'];

/// Accepts a name only if a dump of it loads back unchanged.
pub(crate) fn check_name(name: &str) -> Result<&str> {
    if name.is_empty() {
        return Err(Error::MissingName);
    }
    if trim(name) != name || name.contains(NAME_DELIMITERS) || name.ends_with('+') {
        return Err(Error::InvalidName(name.to_string()));
    }
    Ok(name)
}

/// Accepts a value only if a dump of it loads back unchanged.
pub(crate) fn check_value(name: &str, value: &str) -> Result<()> {
    if trim(value) != value || value.contains(VALUE_DELIMITERS) {
        return Err(Error::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Trims every line of a block comment, as loading does.
pub(crate) fn normalize_comment(comment: &str) -> String {
    comment.split('\n').map(trim).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
#[path = "tests/path.rs"]
mod tests;
