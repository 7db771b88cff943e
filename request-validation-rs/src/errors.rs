//! Error handling for the validation library
//!
//! Field violations never surface here: they are collected as messages in a
//! [`ValidationOutcome`](crate::ValidationOutcome). The errors below are the
//! internal failures that cross the component boundary, such as a rule set
//! that cannot be built or a payload nested beyond the configured depth.

use std::fmt;
use thiserror::Error;

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Internal failures of the validation engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A rule specification could not be turned into predicates
    #[error("Schema validation failed: {0}")]
    SchemaError(String),

    /// Nested objects exceed maximum depth
    #[error("Exceeded maximum nesting depth: {0}")]
    ExceededMaxDepth(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Composite validation error (multiple errors)
    #[error("{0}")]
    Composite(CompositeError),
}

/// Container for multiple validation errors
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeError {
    /// Collection of validation errors
    pub errors: Vec<ValidationError>,
    /// Field path information
    pub path: Option<String>,
}

impl fmt::Display for CompositeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} validation errors:", self.errors.len())?;

        for (idx, err) in self.errors.iter().enumerate() {
            if let Some(path) = &self.path {
                writeln!(f, "  {}. At {}: {}", idx + 1, path, err)?;
            } else {
                writeln!(f, "  {}. {}", idx + 1, err)?;
            }
        }

        Ok(())
    }
}

impl ValidationError {
    /// Create a schema error for a rule that failed to build
    pub fn schema<S: Into<String>>(message: S) -> Self {
        ValidationError::SchemaError(message.into())
    }

    /// Create a new composite validation error from a collection of errors
    pub fn composite<I>(errors: I) -> Self
    where
        I: IntoIterator<Item = ValidationError>,
    {
        Self::collect(errors.into_iter().collect(), None)
    }

    /// Create a composite error with a specific field path
    pub fn composite_at<I, S>(errors: I, path: S) -> Self
    where
        I: IntoIterator<Item = ValidationError>,
        S: Into<String>,
    {
        Self::collect(errors.into_iter().collect(), Some(path.into()))
    }

    fn collect(mut errors: Vec<ValidationError>, path: Option<String>) -> Self {
        // A single error is returned as-is
        if errors.len() == 1 {
            if let Some(err) = errors.pop() {
                return err;
            }
        }
        ValidationError::Composite(CompositeError { errors, path })
    }

    /// Returns true if this error came from rule construction
    pub fn is_schema_error(&self) -> bool {
        match self {
            ValidationError::SchemaError(_) => true,
            ValidationError::Composite(comp) => comp.errors.iter().all(|e| e.is_schema_error()),
            _ => false,
        }
    }
}
