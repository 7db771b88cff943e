//! String validators
//!
//! Pure checks over the sanitized string form of a value. Each returns
//! `true` when the input passes.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NUMERIC_REGEX: Regex = Regex::new(r"^[+-]?([0-9]*[.])?[0-9]+$").unwrap();
    static ref ALPHA_REGEX: Regex = Regex::new(r"^[A-Za-z]+$").unwrap();
    static ref ALPHANUMERIC_REGEX: Regex = Regex::new(r"^[0-9A-Za-z]+$").unwrap();
    static ref SYMBOL_REGEX: Regex =
        Regex::new(r#"[-#!$@£%^&*()_+|~=`{}\[\]:";'<>?,./\\ ]"#).unwrap();
}

/// Minimum length of a strong password
pub const STRONG_PASSWORD_MIN_LENGTH: usize = 8;

/// Validate that a string is not blank once surrounding whitespace is removed
pub fn not_blank(s: &str) -> bool {
    !s.trim().is_empty()
}

/// Validate email address format
pub fn is_email(s: &str) -> bool {
    validator::validate_email(s)
}

/// Validate that a password has at least eight characters with one
/// uppercase letter, one lowercase letter, one digit and one symbol
pub fn is_strong_password(s: &str) -> bool {
    s.chars().count() >= STRONG_PASSWORD_MIN_LENGTH
        && s.chars().any(|c| c.is_uppercase())
        && s.chars().any(|c| c.is_lowercase())
        && s.chars().any(|c| c.is_ascii_digit())
        && SYMBOL_REGEX.is_match(s)
}

/// Validate that the character count lies in `[min, max]`, inclusive.
/// `None` means no upper bound.
pub fn length_between(s: &str, min: usize, max: Option<usize>) -> bool {
    let len = s.chars().count();
    len >= min && max.map_or(true, |max| len <= max)
}

/// Validate that a string is a plain decimal number (optional sign and
/// fraction, no exponent)
pub fn is_numeric(s: &str) -> bool {
    NUMERIC_REGEX.is_match(s)
}

/// Validate that a string contains only ASCII letters
pub fn is_alpha(s: &str) -> bool {
    ALPHA_REGEX.is_match(s)
}

/// Validate that a string contains only ASCII letters and digits
pub fn is_alphanumeric(s: &str) -> bool {
    ALPHANUMERIC_REGEX.is_match(s)
}
