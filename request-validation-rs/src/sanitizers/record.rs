//! Recursive payload sanitization

use super::{encode_html_entities, stringify_scalar, trim_whitespace};
use crate::ValidationConfig;
use serde_json::{Map, Value};

/// Sanitize a payload with the default configuration.
///
/// See [`sanitize_with`].
pub fn sanitize(input: &Value) -> Value {
    sanitize_with(input, &ValidationConfig::default())
}

/// Sanitize a payload, preserving its shape.
///
/// - strings are trimmed and HTML-escaped, or only trimmed when the key they
///   sit under is sensitive according to `config`
/// - numbers and booleans become their string form
/// - objects and arrays are walked recursively; array items inherit the key
///   of the array
/// - `null` is returned unchanged
///
/// The transform is idempotent: sanitizing its own output changes nothing.
pub fn sanitize_with(input: &Value, config: &ValidationConfig) -> Value {
    sanitize_value(input, false, config)
}

/// Sanitize a single string leaf
pub fn sanitize_string(input: &str, sensitive: bool) -> String {
    let trimmed = trim_whitespace(input);
    let result = if sensitive {
        trimmed
    } else {
        trimmed.and_then(|s| encode_html_entities(s))
    };

    if result.was_modified {
        log::trace!(
            "Sanitized string leaf: {}",
            result.details.as_deref().unwrap_or("modified")
        );
    }
    result.sanitized
}

fn sanitize_value(value: &Value, sensitive: bool, config: &ValidationConfig) -> Value {
    match value {
        Value::String(s) => Value::String(sanitize_string(s, sensitive)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| sanitize_value(item, sensitive, config))
                .collect(),
        ),
        Value::Object(fields) => Value::Object(sanitize_fields(fields, config)),
        Value::Null => Value::Null,
        scalar => stringify_scalar(scalar)
            .map(Value::String)
            .unwrap_or_else(|| scalar.clone()),
    }
}

fn sanitize_fields(fields: &Map<String, Value>, config: &ValidationConfig) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, value)| {
            let sensitive = config.is_sensitive(key);
            (key.clone(), sanitize_value(value, sensitive, config))
        })
        .collect()
}
