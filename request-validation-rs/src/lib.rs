//! # Request Validation Library
//!
//! Rule-driven validation and sanitization of JSON request payloads for the
//! REST API services (users, contacts, addresses, logs).
//!
//! Each endpoint declares a [`RuleSet`] mapping field names to rules, either
//! with the typed builder or with the rule-string shorthand
//! (`"required,isLength:3,50"`). A [`Validator`] sanitizes the raw payload,
//! evaluates every rule and returns the sanitized data together with the list
//! of human-readable violations.
//!
//! ## Features
//!
//! - Sanitization: trimming and HTML escaping, password fields only trimmed
//! - A fixed predicate catalog with a `custom:<name>` extension hook
//! - Nested objects, arrays of objects and conditional rule branches
//! - The `{errors, message, data, pagination}` response envelope
//!
//! ```
//! use request_validation_rs::{rule, RuleSet, Validator};
//! use serde_json::json;
//!
//! let rules = RuleSet::new()
//!     .field("name", rule().required().length(3, 50))
//!     .field("email", rule().required().email());
//!
//! let outcome = Validator::new()
//!     .validate(&rules, &json!({"name": "  Jo ", "email": "jo@example.com"}))
//!     .unwrap();
//!
//! assert_eq!(outcome.messages, vec!["name must be between 3 and 50 characters"]);
//! assert_eq!(outcome.data["name"], "Jo");
//! ```

mod builder;
mod engine;
mod errors;
mod parser;
mod predicate;
mod response;
mod schema;
pub mod presets;
pub mod sanitizers;
pub mod validators;

pub use builder::{rule, RuleBuilder};
pub use engine::{ValidationOutcome, Validator};
pub use errors::{CompositeError, ValidationError, ValidationResult};
pub use parser::{parse_rule, tokenize, RuleToken, UnknownRulePolicy};
pub use predicate::{CustomFn, CustomRegistry, Predicate};
pub use response::{ApiResponse, PageQuery, Pagination, RequestSource};
pub use schema::{ConditionalRules, FieldRule, RuleSet};

use std::env;

/// Re-export commonly used items for convenience
pub mod prelude {
    pub use crate::builder::{rule, RuleBuilder};
    pub use crate::engine::{ValidationOutcome, Validator};
    pub use crate::errors::{ValidationError, ValidationResult};
    pub use crate::parser::UnknownRulePolicy;
    pub use crate::predicate::Predicate;
    pub use crate::response::{ApiResponse, RequestSource};
    pub use crate::sanitizers::sanitize;
    pub use crate::schema::{ConditionalRules, FieldRule, RuleSet};
}

/// Version of the validation library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default maximum allowed array length for bulk validation
pub const DEFAULT_MAX_ARRAY_LENGTH: usize = 1_000;

/// Default maximum depth for nested objects
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Field-name fragment that marks a field as sensitive by default
pub const DEFAULT_SENSITIVE_FIELD: &str = "password";

/// Configuration for the validation library
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationConfig {
    /// Maximum depth for nested objects
    pub max_depth: usize,
    /// Maximum allowed array length in bulk validation
    pub max_array_length: usize,
    /// Case-insensitive fragments of field names that are only trimmed,
    /// never HTML-escaped
    pub sensitive_fields: Vec<String>,
    /// Handling of unknown predicate names in rule strings
    pub unknown_rules: UnknownRulePolicy,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_array_length: DEFAULT_MAX_ARRAY_LENGTH,
            sensitive_fields: vec![DEFAULT_SENSITIVE_FIELD.to_string()],
            unknown_rules: UnknownRulePolicy::default(),
        }
    }
}

impl ValidationConfig {
    /// Load the configuration from the environment (and a `.env` file when
    /// present).
    ///
    /// Recognized variables:
    /// * `VALIDATION_MAX_DEPTH`
    /// * `VALIDATION_MAX_ARRAY_LENGTH`
    /// * `VALIDATION_SENSITIVE_FIELDS` - comma-separated fragments
    /// * `VALIDATION_UNKNOWN_RULES` - `ignore`, `warn` or `reject`
    ///
    /// Invalid values are logged and replaced by their defaults.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let max_depth = parse_or(&lookup, "VALIDATION_MAX_DEPTH", defaults.max_depth);
        let max_array_length =
            parse_or(&lookup, "VALIDATION_MAX_ARRAY_LENGTH", defaults.max_array_length);
        let unknown_rules = parse_or(&lookup, "VALIDATION_UNKNOWN_RULES", defaults.unknown_rules);

        let sensitive_fields = match lookup("VALIDATION_SENSITIVE_FIELDS") {
            Some(raw) => {
                let fields: Vec<String> = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|f| !f.is_empty())
                    .map(str::to_string)
                    .collect();
                if fields.is_empty() {
                    log::warn!("VALIDATION_SENSITIVE_FIELDS is empty, using default");
                    defaults.sensitive_fields
                } else {
                    fields
                }
            }
            None => defaults.sensitive_fields,
        };

        Self {
            max_depth,
            max_array_length,
            sensitive_fields,
            unknown_rules,
        }
    }

    /// Set the maximum nesting depth
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the maximum array length for bulk validation
    pub fn with_max_array_length(mut self, max_array_length: usize) -> Self {
        self.max_array_length = max_array_length;
        self
    }

    /// Replace the sensitive field-name fragments
    pub fn with_sensitive_fields(mut self, fields: Vec<String>) -> Self {
        self.sensitive_fields = fields;
        self
    }

    /// Set the policy for unknown predicate names
    pub fn with_unknown_rules(mut self, policy: UnknownRulePolicy) -> Self {
        self.unknown_rules = policy;
        self
    }

    /// Whether a field with this name is only trimmed during sanitization
    pub fn is_sensitive(&self, field: &str) -> bool {
        let field = field.to_lowercase();
        self.sensitive_fields
            .iter()
            .any(|fragment| field.contains(&fragment.to_lowercase()))
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
            log::warn!("Invalid value '{}' in {}, using default {}", raw, key, default);
            default
        }),
        None => default,
    }
}

/// Get a new default configuration
pub fn default_config() -> ValidationConfig {
    ValidationConfig::default()
}
