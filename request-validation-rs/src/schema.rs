//! Rule sets
//!
//! A [`RuleSet`] maps field names to [`FieldRule`]s in declaration order.
//! Rule sets are built once per endpoint (with the builder API, from rule
//! strings, or from a JSON description) and are immutable afterwards.

use crate::errors::{ValidationError, ValidationResult};
use crate::parser::{parse_rule, UnknownRulePolicy};
use crate::predicate::Predicate;
use serde_json::Value;

/// How a single field is validated
#[derive(Debug, Clone, PartialEq)]
pub enum FieldRule {
    /// Predicates evaluated left to right; every failure is reported
    Simple(Vec<Predicate>),
    /// The field holds an object validated against its own rule set
    Nested {
        /// Rules for the nested object
        rules: RuleSet,
        /// Whether the object itself must be present
        required: bool,
    },
    /// Base predicates on a discriminator field, then a second rule set
    /// chosen by the discriminator's value and applied to the enclosing record
    Conditional {
        /// Predicates for the discriminator itself
        base: Vec<Predicate>,
        /// Rule set per discriminator value
        branches: Vec<(String, RuleSet)>,
    },
    /// The field holds an array of objects, each validated independently
    BulkItem {
        /// Rules applied to every element
        rules: RuleSet,
        /// Whether the array itself must be present
        required: bool,
    },
}

impl FieldRule {
    /// Parse a rule string such as `"required,isLength:3,50"`
    pub fn parse(spec: &str, policy: UnknownRulePolicy) -> ValidationResult<Self> {
        parse_rule(spec, policy).map(FieldRule::Simple)
    }

    /// Validate the field as a nested object
    pub fn nested(rules: RuleSet) -> Self {
        FieldRule::Nested {
            rules,
            required: false,
        }
    }

    /// Validate the field as an array of objects
    pub fn each(rules: RuleSet) -> Self {
        FieldRule::BulkItem {
            rules,
            required: false,
        }
    }

    /// Make the field mandatory
    pub fn required(self) -> Self {
        match self {
            FieldRule::Simple(predicates) => FieldRule::Simple(with_required(predicates)),
            FieldRule::Conditional { base, branches } => FieldRule::Conditional {
                base: with_required(base),
                branches,
            },
            FieldRule::Nested { rules, .. } => FieldRule::Nested {
                rules,
                required: true,
            },
            FieldRule::BulkItem { rules, .. } => FieldRule::BulkItem {
                rules,
                required: true,
            },
        }
    }
}

fn with_required(mut predicates: Vec<Predicate>) -> Vec<Predicate> {
    if !predicates.contains(&Predicate::Required) {
        predicates.insert(0, Predicate::Required);
    }
    predicates
}

impl From<Vec<Predicate>> for FieldRule {
    fn from(predicates: Vec<Predicate>) -> Self {
        FieldRule::Simple(predicates)
    }
}

impl From<RuleSet> for FieldRule {
    fn from(rules: RuleSet) -> Self {
        FieldRule::nested(rules)
    }
}

/// Ordered mapping from field name to [`FieldRule`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    fields: Vec<(String, FieldRule)>,
}

impl RuleSet {
    /// Create an empty rule set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field rule. Declaring a field twice replaces the earlier rule in
    /// place.
    pub fn field(mut self, name: impl Into<String>, rule: impl Into<FieldRule>) -> Self {
        let name = name.into();
        let rule = rule.into();

        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = rule,
            None => self.fields.push((name, rule)),
        }
        self
    }

    /// Build a rule set from `(field, rule string)` pairs
    pub fn parse<'a, I>(specs: I, policy: UnknownRulePolicy) -> ValidationResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut errors = Vec::new();
        let mut rules = RuleSet::new();

        for (name, spec) in specs {
            match FieldRule::parse(spec, policy) {
                Ok(rule) => rules = rules.field(name, rule),
                Err(err) => errors.push(err),
            }
        }

        if errors.is_empty() {
            Ok(rules)
        } else {
            Err(ValidationError::composite(errors))
        }
    }

    /// Build a rule set from a JSON description.
    ///
    /// Each member is a rule string, an array of rule strings (concatenated),
    /// or an object describing a nested record.
    pub fn from_json(spec: &Value, policy: UnknownRulePolicy) -> ValidationResult<Self> {
        Self::from_json_at(spec, policy, "")
    }

    fn from_json_at(spec: &Value, policy: UnknownRulePolicy, path: &str) -> ValidationResult<Self> {
        let members = spec.as_object().ok_or_else(|| {
            ValidationError::schema(format!(
                "rule set{} must be an object, got {}",
                describe_path(path),
                spec
            ))
        })?;

        let mut errors = Vec::new();
        let mut rules = RuleSet::new();

        for (name, member) in members {
            let field_path = join_path(path, name);
            let rule = match member {
                Value::String(spec) => FieldRule::parse(spec, policy),
                Value::Array(specs) => parse_rule_list(specs, policy, &field_path),
                Value::Object(_) => Self::from_json_at(member, policy, &field_path).map(FieldRule::nested),
                other => Err(ValidationError::schema(format!(
                    "rule for '{}' must be a string, an array of strings or an object, got {}",
                    field_path, other
                ))),
            };

            match rule {
                Ok(rule) => rules = rules.field(name.clone(), rule),
                Err(err) => errors.push(err),
            }
        }

        if errors.is_empty() {
            Ok(rules)
        } else {
            Err(ValidationError::composite_at(errors, path))
        }
    }

    /// Iterate over the fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        self.fields.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    /// Look up the rule for a field
    pub fn get(&self, name: &str) -> Option<&FieldRule> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, rule)| rule)
    }

    /// Number of declared fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field is declared
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn parse_rule_list(
    specs: &[Value],
    policy: UnknownRulePolicy,
    path: &str,
) -> ValidationResult<FieldRule> {
    let mut predicates = Vec::new();

    for spec in specs {
        let spec = spec.as_str().ok_or_else(|| {
            ValidationError::schema(format!(
                "rule list for '{}' must contain only strings, got {}",
                path, spec
            ))
        })?;
        predicates.extend(parse_rule(spec, policy)?);
    }

    Ok(FieldRule::Simple(predicates))
}

/// Dotted path of a field inside its parents
pub(crate) fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", parent, name)
    }
}

fn describe_path(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!(" for '{}'", path)
    }
}

/// Rule sets selected by the value of discriminator fields, for
/// [`Validator::validate_conditional`](crate::Validator::validate_conditional)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionalRules {
    discriminators: Vec<(String, Vec<(String, RuleSet)>)>,
}

impl ConditionalRules {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `rules` when `field` equals `value`
    pub fn when(mut self, field: impl Into<String>, value: impl Into<String>, rules: RuleSet) -> Self {
        let field = field.into();
        let value = value.into();

        let branches = match self.discriminators.iter().position(|(name, _)| *name == field) {
            Some(idx) => &mut self.discriminators[idx].1,
            None => {
                self.discriminators.push((field, Vec::new()));
                let last = self.discriminators.len() - 1;
                &mut self.discriminators[last].1
            }
        };

        match branches.iter_mut().find(|(existing, _)| *existing == value) {
            Some(slot) => slot.1 = rules,
            None => branches.push((value, rules)),
        }
        self
    }

    /// Discriminator fields with their branches, in declaration order
    pub fn discriminators(&self) -> impl Iterator<Item = (&str, &[(String, RuleSet)])> {
        self.discriminators
            .iter()
            .map(|(field, branches)| (field.as_str(), branches.as_slice()))
    }

    /// Rule set for `field` having `value`, if any
    pub fn branch(&self, field: &str, value: &str) -> Option<&RuleSet> {
        self.discriminators
            .iter()
            .find(|(name, _)| name == field)
            .and_then(|(_, branches)| find_branch(branches, value))
    }
}

pub(crate) fn find_branch<'a>(branches: &'a [(String, RuleSet)], value: &str) -> Option<&'a RuleSet> {
    branches
        .iter()
        .find(|(candidate, _)| candidate == value)
        .map(|(_, rules)| rules)
}
