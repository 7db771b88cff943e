//! String sanitization utilities

use super::SanitizeResult;
use serde_json::Value;

/// Trim whitespace from beginning and end
pub fn trim_whitespace(input: &str) -> SanitizeResult<String> {
    let trimmed = input.trim();

    if trimmed.len() == input.len() {
        SanitizeResult::unmodified(input.to_string())
    } else {
        SanitizeResult::modified(trimmed.to_string(), Some("Trimmed whitespace".to_string()))
    }
}

/// Render a scalar JSON leaf as a string.
///
/// Numbers and booleans are stringified so predicates see one uniform
/// representation; strings, `null` and containers yield `None`.
pub fn stringify_scalar(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
