//! Input sanitization utilities
//!
//! Every payload is normalized here before any predicate sees it: string
//! leaves are trimmed and HTML-escaped, scalars become strings, and
//! sensitive fields (passwords) are trimmed only.

pub mod html;
pub mod record;
pub mod string;

pub use html::*;
pub use record::*;
pub use string::*;

/// Sanitization result containing the sanitized content and information
/// about whether changes were made during sanitization
#[derive(Debug, Clone, PartialEq)]
pub struct SanitizeResult<T> {
    /// Sanitized content
    pub sanitized: T,
    /// Whether any changes were made during sanitization
    pub was_modified: bool,
    /// Optional details about what was modified
    pub details: Option<String>,
}

impl<T> SanitizeResult<T> {
    /// Create a result with unmodified content
    pub fn unmodified(content: T) -> Self {
        Self {
            sanitized: content,
            was_modified: false,
            details: None,
        }
    }

    /// Create a result with modified content
    pub fn modified(content: T, details: Option<String>) -> Self {
        Self {
            sanitized: content,
            was_modified: true,
            details,
        }
    }

    /// Feed the sanitized content into another sanitizer, keeping track of
    /// whether either step changed it
    pub fn and_then<F>(self, f: F) -> SanitizeResult<T>
    where
        F: FnOnce(&T) -> SanitizeResult<T>,
    {
        let next = f(&self.sanitized);
        let details = match (self.details, next.details) {
            (Some(a), Some(b)) => Some(format!("{}; {}", a, b)),
            (a, b) => a.or(b),
        };

        SanitizeResult {
            sanitized: next.sanitized,
            was_modified: self.was_modified || next.was_modified,
            details,
        }
    }
}
