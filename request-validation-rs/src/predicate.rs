//! Predicate catalog
//!
//! A [`Predicate`] is one named check of a field rule, resolved once when the
//! rule is built. Evaluation yields `None` on success or the human-readable
//! violation message.

use crate::sanitizers::stringify_scalar;
use crate::validators;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Extension behind a `custom:<name>` predicate.
///
/// Receives the field path and its sanitized value (absent values are never
/// passed) and returns a violation message on failure.
pub type CustomFn = Arc<dyn Fn(&str, &Value) -> Option<String> + Send + Sync>;

/// A single named check
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Present, non-null, and not blank if it is a string
    Required,
    /// Email address
    IsEmail,
    /// Eight characters with upper, lower, digit and symbol
    IsStrongPassword,
    /// Character count within bounds, inclusive
    IsLength { min: usize, max: Option<usize> },
    /// Plain decimal number
    IsNumeric,
    /// ASCII letters only
    IsAlpha,
    /// ASCII letters and digits only
    IsAlphanumeric,
    /// Well-formed URL
    IsUrl,
    /// One of the listed alternatives
    IsIn(Vec<String>),
    /// Calendar date
    IsDate,
    /// `"true"` or `"false"`
    IsBoolean,
    /// JSON array
    IsArray,
    /// JSON object
    IsObject,
    /// Caller-registered extension
    Custom(String),
}

impl Predicate {
    /// Name of the predicate as written in rule strings
    pub fn name(&self) -> &'static str {
        match self {
            Predicate::Required => "required",
            Predicate::IsEmail => "isEmail",
            Predicate::IsStrongPassword => "isStrongPassword",
            Predicate::IsLength { .. } => "isLength",
            Predicate::IsNumeric => "isNumeric",
            Predicate::IsAlpha => "isAlpha",
            Predicate::IsAlphanumeric => "isAlphanumeric",
            Predicate::IsUrl => "isURL",
            Predicate::IsIn(_) => "isIn",
            Predicate::IsDate => "isDate",
            Predicate::IsBoolean => "isBoolean",
            Predicate::IsArray => "isArray",
            Predicate::IsObject => "isObject",
            Predicate::Custom(_) => "custom",
        }
    }

    /// Check a value. Absent or `null` values only fail [`Predicate::Required`].
    ///
    /// Custom predicates always pass here; they are resolved through a
    /// [`CustomRegistry`] by [`Predicate::evaluate`].
    pub fn check(&self, value: Option<&Value>) -> bool {
        let value = match value {
            None | Some(Value::Null) => return !matches!(self, Predicate::Required),
            Some(value) => value,
        };

        match self {
            Predicate::Required => match value {
                Value::String(s) => validators::not_blank(s),
                _ => true,
            },
            Predicate::IsArray => value.is_array(),
            Predicate::IsObject => value.is_object(),
            Predicate::Custom(_) => true,
            _ => match text_of(value) {
                Some(text) => self.check_text(&text),
                None => false,
            },
        }
    }

    fn check_text(&self, text: &str) -> bool {
        match self {
            Predicate::IsEmail => validators::is_email(text),
            Predicate::IsStrongPassword => validators::is_strong_password(text),
            Predicate::IsLength { min, max } => validators::length_between(text, *min, *max),
            Predicate::IsNumeric => validators::is_numeric(text),
            Predicate::IsAlpha => validators::is_alpha(text),
            Predicate::IsAlphanumeric => validators::is_alphanumeric(text),
            Predicate::IsUrl => validators::is_url(text),
            Predicate::IsIn(allowed) => validators::one_of(&text, allowed),
            Predicate::IsDate => validators::is_date(text),
            Predicate::IsBoolean => validators::is_boolean(text),
            Predicate::Required => validators::not_blank(text),
            Predicate::IsArray | Predicate::IsObject | Predicate::Custom(_) => true,
        }
    }

    /// Violation message for `field`
    pub fn message(&self, field: &str) -> String {
        match self {
            Predicate::Required => format!("{} is required", field),
            Predicate::IsEmail => format!("{} is invalid email", field),
            Predicate::IsStrongPassword => format!(
                "{} must be at least 8 characters, 1 uppercase, 1 lowercase, 1 number and 1 symbol",
                field
            ),
            Predicate::IsLength { min, max: Some(max) } => {
                format!("{} must be between {} and {} characters", field, min, max)
            }
            Predicate::IsLength { min, max: None } => {
                format!("{} must be at least {} characters", field, min)
            }
            Predicate::IsNumeric => format!("{} must be a number", field),
            Predicate::IsAlpha => format!("{} must contain only letters", field),
            Predicate::IsAlphanumeric => {
                format!("{} must contain only letters and numbers", field)
            }
            Predicate::IsUrl => format!("{} must be a valid URL", field),
            Predicate::IsIn(allowed) => {
                format!("{} must be one of: {}", field, allowed.join(", "))
            }
            Predicate::IsDate => format!("{} must be a valid date", field),
            Predicate::IsBoolean => format!("{} must be a boolean value", field),
            Predicate::IsArray => format!("{} must be an array", field),
            Predicate::IsObject => format!("{} must be an object", field),
            Predicate::Custom(name) => format!("{} failed custom validation '{}'", field, name),
        }
    }

    /// Evaluate against a value, returning the violation message on failure
    pub fn evaluate(
        &self,
        field: &str,
        value: Option<&Value>,
        custom: &CustomRegistry,
    ) -> Option<String> {
        match self {
            Predicate::Custom(name) => match value {
                None | Some(Value::Null) => None,
                Some(value) => custom.run(name, field, value),
            },
            _ if self.check(value) => None,
            _ => Some(self.message(field)),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::IsLength { min, max: Some(max) } => write!(f, "isLength:{},{}", min, max),
            Predicate::IsLength { min, max: None } => write!(f, "isLength:{}", min),
            Predicate::IsIn(allowed) => write!(f, "isIn:{}", allowed.join("|")),
            Predicate::Custom(name) => write!(f, "custom:{}", name),
            other => f.write_str(other.name()),
        }
    }
}

/// String form of a scalar value; containers have none
fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        other => stringify_scalar(other),
    }
}

/// Named extensions for `custom:<name>` predicates.
///
/// Names with no registered extension pass.
#[derive(Clone, Default)]
pub struct CustomRegistry {
    validators: HashMap<String, CustomFn>,
}

impl CustomRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an extension under `name`, replacing any previous one
    pub fn register<F>(&mut self, name: impl Into<String>, validator: F)
    where
        F: Fn(&str, &Value) -> Option<String> + Send + Sync + 'static,
    {
        self.validators.insert(name.into(), Arc::new(validator));
    }

    /// Whether an extension is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    fn run(&self, name: &str, field: &str, value: &Value) -> Option<String> {
        match self.validators.get(name) {
            Some(validator) => validator(field, value),
            None => {
                log::debug!("No custom validator registered for '{}', skipping {}", name, field);
                None
            }
        }
    }
}

impl fmt::Debug for CustomRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.validators.keys().collect();
        names.sort();
        f.debug_struct("CustomRegistry").field("validators", &names).finish()
    }
}
