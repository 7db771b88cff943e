//! Validator functions
//!
//! The building blocks behind the predicate catalog. Every function is a
//! pure check over the sanitized string form of a value.

pub mod date;
pub mod generic;
pub mod string;
pub mod url;

pub use date::*;
pub use generic::*;
pub use string::*;
pub use self::url::*;
