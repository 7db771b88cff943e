//! Rule string parsing
//!
//! Rule strings are the declarative shorthand for a field's predicates:
//! `"required,isLength:3,50"` or `"isIn:admin|user|guest"`. They are parsed
//! once when a [`RuleSet`](crate::RuleSet) is built, never per request.

use crate::errors::{ValidationError, ValidationResult};
use crate::predicate::Predicate;
use std::fmt;
use std::str::FromStr;

/// What to do with a predicate name that is not in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownRulePolicy {
    /// Skip it silently
    Ignore,
    /// Skip it and log a warning
    #[default]
    Warn,
    /// Refuse to build the rule
    Reject,
}

impl FromStr for UnknownRulePolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(UnknownRulePolicy::Ignore),
            "warn" => Ok(UnknownRulePolicy::Warn),
            "reject" => Ok(UnknownRulePolicy::Reject),
            other => Err(ValidationError::InvalidConfig(format!(
                "unknown rule policy '{}', expected ignore, warn or reject",
                other
            ))),
        }
    }
}

impl fmt::Display for UnknownRulePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnknownRulePolicy::Ignore => "ignore",
            UnknownRulePolicy::Warn => "warn",
            UnknownRulePolicy::Reject => "reject",
        })
    }
}

/// One predicate invocation as written in a rule string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleToken {
    /// Predicate name
    pub name: String,
    /// Parameters after the `:`
    pub params: Vec<String>,
}

impl RuleToken {
    fn new(name: &str, params: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            params,
        }
    }

    /// Whether a following bare bound belongs to this token. Comma-delimited
    /// parameters collide with the rule separator, so `isLength:3,50` reaches
    /// the tokenizer as `isLength:3` followed by `50`.
    fn takes_bound(&self) -> bool {
        param_delimiter(&self.name) == Some(',') && self.params.len() < 2
    }
}

/// Delimiter between the parameters of a predicate, if it has several
fn param_delimiter(name: &str) -> Option<char> {
    match name {
        "isLength" => Some(','),
        "isIn" => Some('|'),
        _ => None,
    }
}

fn is_bound(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

/// Comma-delimited parameters are positional, so empty slots are kept
/// (`isLength:,50` has no minimum). Other lists drop empty entries.
fn split_params(name: &str, raw: &str) -> Vec<String> {
    match param_delimiter(name) {
        Some(',') => raw.split(',').map(|p| p.trim().to_string()).collect(),
        Some(delimiter) => raw
            .split(delimiter)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect(),
        None if raw.trim().is_empty() => Vec::new(),
        None => vec![raw.trim().to_string()],
    }
}

/// Split a rule string into ordered `(name, params)` tokens.
///
/// Never fails: empty segments are dropped and unknown names are kept as
/// tokens for [`parse_rule`] to judge.
pub fn tokenize(spec: &str) -> Vec<RuleToken> {
    let mut tokens: Vec<RuleToken> = Vec::new();

    for segment in spec.split(',').map(str::trim) {
        if segment.is_empty() {
            continue;
        }

        if is_bound(segment) {
            if let Some(last) = tokens.last_mut().filter(|t| t.takes_bound()) {
                last.params.push(segment.to_string());
                continue;
            }
        }

        let token = match segment.split_once(':') {
            Some((name, raw)) => {
                let name = name.trim();
                RuleToken::new(name, split_params(name, raw))
            }
            None => RuleToken::new(segment, Vec::new()),
        };
        tokens.push(token);
    }

    tokens
}

impl Predicate {
    /// Resolve a token against the catalog. Returns `None` for unknown names.
    ///
    /// Missing or unparseable length bounds fall back to `0` and unbounded.
    pub fn from_token(token: &RuleToken) -> Option<Predicate> {
        let predicate = match token.name.as_str() {
            "required" => Predicate::Required,
            "isEmail" => Predicate::IsEmail,
            "isStrongPassword" => Predicate::IsStrongPassword,
            "isLength" => {
                let bound = |idx: usize| token.params.get(idx).and_then(|p| p.parse::<usize>().ok());
                Predicate::IsLength {
                    min: bound(0).unwrap_or(0),
                    max: bound(1),
                }
            }
            "isNumeric" => Predicate::IsNumeric,
            "isAlpha" => Predicate::IsAlpha,
            "isAlphanumeric" => Predicate::IsAlphanumeric,
            "isURL" => Predicate::IsUrl,
            "isIn" => Predicate::IsIn(token.params.clone()),
            "isDate" => Predicate::IsDate,
            "isBoolean" => Predicate::IsBoolean,
            "isArray" => Predicate::IsArray,
            "isObject" => Predicate::IsObject,
            "custom" => Predicate::Custom(token.params.first().cloned().unwrap_or_default()),
            _ => return None,
        };
        Some(predicate)
    }
}

/// Parse a rule string into predicates, in declaration order.
///
/// Unknown predicate names are handled according to `policy`; with
/// [`UnknownRulePolicy::Reject`] every unknown name is reported in one
/// [`ValidationError::SchemaError`] (or a composite of them).
pub fn parse_rule(spec: &str, policy: UnknownRulePolicy) -> ValidationResult<Vec<Predicate>> {
    let mut predicates = Vec::new();
    let mut unknown = Vec::new();

    for token in tokenize(spec) {
        match Predicate::from_token(&token) {
            Some(predicate) => predicates.push(predicate),
            None => match policy {
                UnknownRulePolicy::Ignore => {}
                UnknownRulePolicy::Warn => {
                    log::warn!("Ignoring unknown validation rule '{}' in \"{}\"", token.name, spec)
                }
                UnknownRulePolicy::Reject => unknown.push(ValidationError::schema(format!(
                    "unknown validation rule '{}' in \"{}\"",
                    token.name, spec
                ))),
            },
        }
    }

    if unknown.is_empty() {
        Ok(predicates)
    } else {
        Err(ValidationError::composite(unknown))
    }
}
