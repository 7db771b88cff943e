//! Validation builder pattern
//!
//! This module provides a fluent API for composing field rules out of typed
//! predicates instead of rule strings:
//!
//! ```
//! use request_validation_rs::{rule, RuleSet};
//!
//! let rules = RuleSet::new()
//!     .field("name", rule().required().length(3, 50))
//!     .field("role", rule().one_of(["admin", "user", "guest"]));
//! assert_eq!(rules.len(), 2);
//! ```

use crate::predicate::Predicate;
use crate::schema::{FieldRule, RuleSet};

/// Start a new field rule
pub fn rule() -> RuleBuilder {
    RuleBuilder::new()
}

/// Builder for chaining predicates of a single field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleBuilder {
    /// Predicates in evaluation order
    predicates: Vec<Predicate>,
    /// Branches keyed on this field's value
    branches: Vec<(String, RuleSet)>,
}

impl RuleBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an arbitrary predicate
    pub fn with(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// The field must be present and not blank
    pub fn required(self) -> Self {
        self.with(Predicate::Required)
    }

    /// The field must be an email address
    pub fn email(self) -> Self {
        self.with(Predicate::IsEmail)
    }

    /// The field must be a strong password
    pub fn strong_password(self) -> Self {
        self.with(Predicate::IsStrongPassword)
    }

    /// The field must have between `min` and `max` characters, inclusive
    pub fn length(self, min: usize, max: usize) -> Self {
        self.with(Predicate::IsLength {
            min,
            max: Some(max),
        })
    }

    /// The field must have at least `min` characters
    pub fn min_length(self, min: usize) -> Self {
        self.with(Predicate::IsLength { min, max: None })
    }

    /// The field must be a number
    pub fn numeric(self) -> Self {
        self.with(Predicate::IsNumeric)
    }

    /// The field must contain only letters
    pub fn alpha(self) -> Self {
        self.with(Predicate::IsAlpha)
    }

    /// The field must contain only letters and digits
    pub fn alphanumeric(self) -> Self {
        self.with(Predicate::IsAlphanumeric)
    }

    /// The field must be a URL
    pub fn url(self) -> Self {
        self.with(Predicate::IsUrl)
    }

    /// The field must equal one of `allowed`
    pub fn one_of<I, S>(self, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with(Predicate::IsIn(allowed.into_iter().map(Into::into).collect()))
    }

    /// The field must be a calendar date
    pub fn date(self) -> Self {
        self.with(Predicate::IsDate)
    }

    /// The field must be `"true"` or `"false"`
    pub fn boolean(self) -> Self {
        self.with(Predicate::IsBoolean)
    }

    /// The field must be an array
    pub fn array(self) -> Self {
        self.with(Predicate::IsArray)
    }

    /// The field must be an object
    pub fn object(self) -> Self {
        self.with(Predicate::IsObject)
    }

    /// Run the custom extension registered under `name`
    pub fn custom(self, name: impl Into<String>) -> Self {
        self.with(Predicate::Custom(name.into()))
    }

    /// Once this field passes, validate the enclosing record against `rules`
    /// when the field equals `value`
    pub fn when(mut self, value: impl Into<String>, rules: RuleSet) -> Self {
        let value = value.into();
        match self.branches.iter_mut().find(|(existing, _)| *existing == value) {
            Some(slot) => slot.1 = rules,
            None => self.branches.push((value, rules)),
        }
        self
    }

    /// Finish the rule
    pub fn build(self) -> FieldRule {
        if self.branches.is_empty() {
            FieldRule::Simple(self.predicates)
        } else {
            FieldRule::Conditional {
                base: self.predicates,
                branches: self.branches,
            }
        }
    }
}

impl From<RuleBuilder> for FieldRule {
    fn from(builder: RuleBuilder) -> Self {
        builder.build()
    }
}
