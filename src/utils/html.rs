//! HTML utility functions.
//!
//! - `escape_attr()` - HTML attribute escaping
//! - `escape_script_json()` - make serialized JSON safe inside `<script>`
//! - `find_tag()` - case-insensitive marker lookup
//! - `insert_at()` - splice text at a marker offset

use std::borrow::Cow;

// =============================================================================
// HTML Escaping
// =============================================================================

/// Characters that require HTML escaping.
const ESCAPE_CHARS: [char; 5] = ['<', '>', '&', '"', '\''];

/// Get the HTML entity for a special character.
#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape HTML attribute values.
///
/// Uses `Cow` to avoid allocation when no escaping is needed.
#[inline]
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    escape_with(s, &ESCAPE_CHARS)
}

/// Internal: escape with specified character set.
#[inline]
fn escape_with<'a>(s: &'a str, chars: &[char]) -> Cow<'a, str> {
    if !s.contains(chars) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match escape_char(c) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Escape serialized JSON for embedding in an inline `<script>`.
///
/// `<`, `>` and `&` become `\u003c`, `\u003e` and `\u0026`, so string values
/// such as `"</script>"` cannot terminate the block. U+2028 and U+2029 are
/// escaped too since older engines treat them as line terminators. The result
/// is still valid JSON with identical meaning.
pub fn escape_script_json(json: &str) -> Cow<'_, str> {
    if !json.contains(['<', '>', '&', '\u{2028}', '\u{2029}']) {
        return Cow::Borrowed(json);
    }

    let mut result = String::with_capacity(json.len() + 16);
    for c in json.chars() {
        match c {
            '<' => result.push_str("\\u003c"),
            '>' => result.push_str("\\u003e"),
            '&' => result.push_str("\\u0026"),
            '\u{2028}' => result.push_str("\\u2028"),
            '\u{2029}' => result.push_str("\\u2029"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

// =============================================================================
// Marker Lookup
// =============================================================================

/// Byte offset of the first case-insensitive occurrence of `tag`.
pub fn find_tag(content: &str, tag: &str) -> Option<usize> {
    let pattern = tag.as_bytes();
    content
        .as_bytes()
        .windows(pattern.len())
        .position(|w| w.eq_ignore_ascii_case(pattern))
}

/// Insert `insertion` at byte offset `pos`.
///
/// `pos` must come from [`find_tag`] on an ASCII tag, which
/// always lands on a char boundary.
pub fn insert_at(content: &str, pos: usize, insertion: &str) -> String {
    let mut result = String::with_capacity(content.len() + insertion.len());
    result.push_str(&content[..pos]);
    result.push_str(insertion);
    result.push_str(&content[pos..]);
    result
}
