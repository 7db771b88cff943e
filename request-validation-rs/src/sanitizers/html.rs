//! HTML sanitization utilities
//!
//! Escaping is applied to every non-sensitive string leaf of a payload, so it
//! has to be safe to run more than once over the same text.

use super::SanitizeResult;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// An entity this encoder emits, or a numeric character reference,
    /// starting at the current position
    static ref ENTITY_REGEX: Regex =
        Regex::new(r"^&(?:amp|lt|gt|quot|#[0-9]{1,7}|#[xX][0-9A-Fa-f]{1,6});").unwrap();
}

/// Encode HTML special characters to prevent XSS.
///
/// An ampersand that already opens an entity reference (`&amp;`, `&#39;`,
/// `&#x27;` …) is left alone, so encoding already encoded text is a no-op.
pub fn encode_html_entities(input: &str) -> SanitizeResult<String> {
    let mut result = String::with_capacity(input.len());
    let mut was_modified = false;

    for (idx, c) in input.char_indices() {
        match c {
            '&' if ENTITY_REGEX.is_match(&input[idx..]) => result.push('&'),
            '&' => {
                result.push_str("&amp;");
                was_modified = true;
            }
            '<' => {
                result.push_str("&lt;");
                was_modified = true;
            }
            '>' => {
                result.push_str("&gt;");
                was_modified = true;
            }
            '"' => {
                result.push_str("&quot;");
                was_modified = true;
            }
            '\'' => {
                result.push_str("&#39;");
                was_modified = true;
            }
            _ => result.push(c),
        }
    }

    if was_modified {
        SanitizeResult::modified(result, Some("Encoded HTML entities".to_string()))
    } else {
        SanitizeResult::unmodified(result)
    }
}
