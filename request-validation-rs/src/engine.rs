//! Validation orchestrator
//!
//! Walks a [`RuleSet`] over a sanitized payload, evaluating every declared
//! field and collecting violation messages. Violations are data, returned
//! in a [`ValidationOutcome`]; only internal failures (see
//! [`ValidationError`]) are returned as `Err`.

use crate::errors::{ValidationError, ValidationResult};
use crate::predicate::{CustomRegistry, Predicate};
use crate::sanitizers::sanitize_with;
use crate::schema::{find_branch, join_path, ConditionalRules, FieldRule, RuleSet};
use crate::ValidationConfig;
use serde::Serialize;
use serde_json::{Map, Value};

/// Result of validating one payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationOutcome {
    /// Violation messages in evaluation order; empty when the payload is valid
    #[serde(rename = "message")]
    pub messages: Vec<String>,
    /// Sanitized payload
    pub data: Value,
}

impl ValidationOutcome {
    fn new(messages: Vec<String>, data: Value) -> Self {
        Self { messages, data }
    }

    /// Whether no violation was found
    pub fn is_valid(&self) -> bool {
        self.messages.is_empty()
    }

    /// Take the sanitized payload
    pub fn into_data(self) -> Value {
        self.data
    }

    /// `Ok(data)` when valid, otherwise the messages
    pub fn into_result(self) -> Result<Value, Vec<String>> {
        if self.messages.is_empty() {
            Ok(self.data)
        } else {
            Err(self.messages)
        }
    }
}

/// The validation engine.
///
/// Holds configuration and custom extensions; it carries no per-call state,
/// so a single instance can be shared between request handlers.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidationConfig,
    custom: CustomRegistry,
}

impl Validator {
    /// Create a validator with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a validator with a specific configuration
    pub fn with_config(config: ValidationConfig) -> Self {
        Self {
            config,
            custom: CustomRegistry::new(),
        }
    }

    /// Register the extension run by `custom:<name>` predicates
    pub fn with_custom<F>(mut self, name: impl Into<String>, validator: F) -> Self
    where
        F: Fn(&str, &Value) -> Option<String> + Send + Sync + 'static,
    {
        self.custom.register(name, validator);
        self
    }

    /// Active configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Build a rule set from `(field, rule string)` pairs, handling unknown
    /// predicate names per the configured policy
    pub fn parse_rules<'a, I>(&self, specs: I) -> ValidationResult<RuleSet>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        RuleSet::parse(specs, self.config.unknown_rules)
    }

    /// Build a rule set from its JSON description, handling unknown
    /// predicate names per the configured policy
    pub fn rules_from_json(&self, spec: &Value) -> ValidationResult<RuleSet> {
        RuleSet::from_json(spec, self.config.unknown_rules)
    }

    /// Sanitize `input` and validate it against `rules`.
    ///
    /// A payload that is not an object yields the single message
    /// `Expected an object`.
    pub fn validate(&self, rules: &RuleSet, input: &Value) -> ValidationResult<ValidationOutcome> {
        let sanitized = sanitize_with(input, &self.config);

        let outcome = match sanitized {
            Value::Object(record) => {
                let mut messages = Vec::new();
                let data = self.walk(rules, &record, "", 0, &mut messages)?;
                ValidationOutcome::new(messages, Value::Object(data))
            }
            other => ValidationOutcome::new(vec!["Expected an object".to_string()], other),
        };

        log::debug!(
            "Validated {} rule(s): {} violation(s)",
            rules.len(),
            outcome.messages.len()
        );
        Ok(outcome)
    }

    /// Validate every element of an array independently against `rules`.
    ///
    /// Messages are prefixed with `Item {n}: ` (1-based) and only elements
    /// without violations are kept in the data. A non-array payload yields
    /// the single message `Expected an array` and empty data.
    pub fn validate_bulk(&self, rules: &RuleSet, input: &Value) -> ValidationResult<ValidationOutcome> {
        let items = match input {
            Value::Array(items) => items,
            _ => {
                return Ok(ValidationOutcome::new(
                    vec!["Expected an array".to_string()],
                    Value::Array(Vec::new()),
                ))
            }
        };

        let mut messages = Vec::new();
        let kept = self.walk_items(rules, items, 0, &mut messages)?;

        log::debug!(
            "Validated {} item(s) in bulk: {} kept, {} violation(s)",
            items.len(),
            kept.len(),
            messages.len()
        );
        Ok(ValidationOutcome::new(messages, Value::Array(kept)))
    }

    /// Validate `input` against `base`, then against the rule sets selected
    /// in `conditional` by the validated value of each discriminator field.
    ///
    /// When the base validation fails only its messages are returned and no
    /// conditional rule is evaluated. Selected branches are validated
    /// against the original input; a failing branch appends its messages,
    /// a passing one merges the fields it declares into the data.
    pub fn validate_conditional(
        &self,
        input: &Value,
        base: &RuleSet,
        conditional: &ConditionalRules,
    ) -> ValidationResult<ValidationOutcome> {
        let mut outcome = self.validate(base, input)?;
        if !outcome.is_valid() {
            return Ok(outcome);
        }

        for (field, branches) in conditional.discriminators() {
            let selected = outcome
                .data
                .get(field)
                .and_then(Value::as_str)
                .and_then(|value| find_branch(branches, value));

            let rules = match selected {
                Some(rules) => rules,
                None => continue,
            };

            let branch = self.validate(rules, input)?;
            if branch.is_valid() {
                merge_declared(&mut outcome.data, &branch.data, rules);
            } else {
                outcome.messages.extend(branch.messages);
            }
        }

        Ok(outcome)
    }

    fn walk(
        &self,
        rules: &RuleSet,
        record: &Map<String, Value>,
        path: &str,
        depth: usize,
        messages: &mut Vec<String>,
    ) -> ValidationResult<Map<String, Value>> {
        if depth > self.config.max_depth {
            return Err(ValidationError::ExceededMaxDepth(format!(
                "'{}' is nested {} levels deep, limit is {}",
                path, depth, self.config.max_depth
            )));
        }

        let mut data = record.clone();

        for (name, rule) in rules.fields() {
            let key = join_path(path, name);
            let value = record.get(name);

            match rule {
                FieldRule::Simple(predicates) => self.apply(predicates, &key, value, messages),
                FieldRule::Nested { rules, required } => match value {
                    Some(Value::Object(nested)) => {
                        let nested = self.walk(rules, nested, &key, depth + 1, messages)?;
                        data.insert(name.to_string(), Value::Object(nested));
                    }
                    None | Some(Value::Null) => {
                        if *required {
                            messages.push(format!("{} is required and must be an object", key));
                        }
                    }
                    Some(_) => messages.push(format!("{} must be an object", key)),
                },
                FieldRule::BulkItem { rules, required } => match value {
                    Some(Value::Array(items)) => {
                        let mut item_messages = Vec::new();
                        let kept = self.walk_items(rules, items, depth + 1, &mut item_messages)?;
                        messages.extend(item_messages.into_iter().map(|m| format!("{}: {}", key, m)));
                        data.insert(name.to_string(), Value::Array(kept));
                    }
                    None | Some(Value::Null) => {
                        if *required {
                            messages.push(format!("{} is required", key));
                        }
                    }
                    Some(_) => messages.push(format!("{} must be an array", key)),
                },
                FieldRule::Conditional { base, branches } => {
                    let before = messages.len();
                    self.apply(base, &key, value, messages);
                    if messages.len() > before {
                        continue;
                    }

                    let selected = value
                        .and_then(Value::as_str)
                        .and_then(|value| find_branch(branches, value));
                    if let Some(branch) = selected {
                        let before = messages.len();
                        let branch_data = self.walk(branch, record, path, depth, messages)?;
                        if messages.len() > before {
                            continue;
                        }
                        for (branch_field, _) in branch.fields() {
                            if let Some(v) = branch_data.get(branch_field) {
                                data.insert(branch_field.to_string(), v.clone());
                            }
                        }
                    }
                }
            }
        }

        Ok(data)
    }

    fn walk_items(
        &self,
        rules: &RuleSet,
        items: &[Value],
        depth: usize,
        messages: &mut Vec<String>,
    ) -> ValidationResult<Vec<Value>> {
        if items.len() > self.config.max_array_length {
            messages.push(format!(
                "Expected at most {} items, got {}",
                self.config.max_array_length,
                items.len()
            ));
            return Ok(Vec::new());
        }

        let mut kept = Vec::new();

        for (idx, item) in items.iter().enumerate() {
            let prefix = format!("Item {}: ", idx + 1);
            let sanitized = sanitize_with(item, &self.config);

            match sanitized {
                Value::Object(record) => {
                    let mut item_messages = Vec::new();
                    let data = self.walk(rules, &record, "", depth, &mut item_messages)?;
                    if item_messages.is_empty() {
                        kept.push(Value::Object(data));
                    } else {
                        messages.extend(item_messages.into_iter().map(|m| format!("{}{}", prefix, m)));
                    }
                }
                _ => messages.push(format!("{}Expected an object", prefix)),
            }
        }

        Ok(kept)
    }

    fn apply(&self, predicates: &[Predicate], key: &str, value: Option<&Value>, messages: &mut Vec<String>) {
        for predicate in predicates {
            if let Some(message) = predicate.evaluate(key, value, &self.custom) {
                log::trace!("{} failed {}", key, predicate);
                messages.push(message);
            }
        }
    }
}

/// Copy the fields declared by `rules` from `source` into `target`
fn merge_declared(target: &mut Value, source: &Value, rules: &RuleSet) {
    if let (Value::Object(target), Value::Object(source)) = (target, source) {
        for (field, _) in rules.fields() {
            if let Some(value) = source.get(field) {
                target.insert(field.to_string(), value.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::rule;
    use crate::parser::UnknownRulePolicy;
    use serde_json::json;

    fn rules(specs: &[(&str, &str)]) -> RuleSet {
        RuleSet::parse(specs.iter().copied(), UnknownRulePolicy::Reject).unwrap()
    }

    #[test]
    fn test_valid_payload() {
        let rules = rules(&[
            ("name", "required,isLength:3,50"),
            ("email", "required,isEmail"),
            ("age", "isNumeric"),
            ("website", "isURL"),
            ("role", "isIn:admin|user|guest"),
        ]);
        let input = json!({
            "name": "John Doe",
            "email": "john@example.com",
            "age": 25,
            "website": "https://example.com",
            "role": "user"
        });

        let outcome = Validator::new().validate(&rules, &input).unwrap();

        assert!(outcome.is_valid(), "{:?}", outcome.messages);
        assert_eq!(outcome.data["age"], "25");
    }

    #[test]
    fn test_all_failures_reported_in_order() {
        let rules = rules(&[
            ("name", "required,isLength:3,50"),
            ("email", "required,isEmail"),
            ("age", "isNumeric"),
            ("website", "isURL"),
            ("role", "isIn:admin|user|guest"),
        ]);
        let input = json!({
            "name": "Jo",
            "email": "invalid-email",
            "age": "not-a-number",
            "website": "not-a-url",
            "role": "invalid-role"
        });

        let outcome = Validator::new().validate(&rules, &input).unwrap();

        assert_eq!(
            outcome.messages,
            vec![
                "name must be between 3 and 50 characters",
                "email is invalid email",
                "age must be a number",
                "website must be a valid URL",
                "role must be one of: admin, user, guest",
            ]
        );
    }

    #[test]
    fn test_field_collects_every_failing_predicate() {
        let rules = rules(&[("code", "isNumeric,isAlpha,isLength:5,10")]);
        let outcome = Validator::new().validate(&rules, &json!({"code": "a-1"})).unwrap();

        assert_eq!(
            outcome.messages,
            vec![
                "code must be a number",
                "code must contain only letters",
                "code must be between 5 and 10 characters",
            ]
        );
    }

    #[test]
    fn test_required_absent_field() {
        let rules = rules(&[("email", "required,isEmail,isLength:5,50")]);
        let outcome = Validator::new().validate(&rules, &json!({})).unwrap();

        assert_eq!(outcome.messages, vec!["email is required"]);
    }

    #[test]
    fn test_optional_absent_field_is_skipped() {
        let rules = rules(&[("website", "isURL,isLength:10,20")]);
        let outcome = Validator::new().validate(&rules, &json!({"other": 1})).unwrap();

        assert!(outcome.is_valid());
        // Undeclared fields pass through sanitized
        assert_eq!(outcome.data, json!({"other": "1"}));
    }

    #[test]
    fn test_nested_objects() {
        let address = rules(&[("city", "required"), ("zip", "isNumeric")]);
        let rules = RuleSet::new()
            .field("name", rule().required())
            .field("address", FieldRule::nested(address).required());

        let validator = Validator::new();

        let outcome = validator
            .validate(&rules, &json!({"name": "Ann", "address": {"zip": "12ab", "note": " <x> "}}))
            .unwrap();
        assert_eq!(
            outcome.messages,
            vec!["address.city is required", "address.zip must be a number"]
        );
        assert_eq!(outcome.data["address"]["note"], "&lt;x&gt;");

        let outcome = validator.validate(&rules, &json!({"name": "Ann"})).unwrap();
        assert_eq!(outcome.messages, vec!["address is required and must be an object"]);

        let outcome = validator
            .validate(&rules, &json!({"name": "Ann", "address": "Main St"}))
            .unwrap();
        assert_eq!(outcome.messages, vec!["address must be an object"]);
    }

    #[test]
    fn test_optional_nested_object_absent() {
        let rules = RuleSet::new().field("address", FieldRule::nested(rules(&[("city", "required")])));
        let outcome = Validator::new().validate(&rules, &json!({})).unwrap();
        assert!(outcome.is_valid());
    }

    #[test]
    fn test_bulk_field_drops_failing_items() {
        let address = rules(&[("addressType", "required"), ("street", "required")]);
        let rules = RuleSet::new()
            .field("firstName", rule().required())
            .field("addresses", FieldRule::each(address));

        let input = json!({
            "firstName": "Ann",
            "addresses": [
                {"addressType": "home", "street": "Main St"},
                {"addressType": "work"},
                "not an object"
            ]
        });

        let outcome = Validator::new().validate(&rules, &input).unwrap();

        assert_eq!(
            outcome.messages,
            vec![
                "addresses: Item 2: street is required",
                "addresses: Item 3: Expected an object",
            ]
        );
        assert_eq!(
            outcome.data["addresses"],
            json!([{"addressType": "home", "street": "Main St"}])
        );
    }

    #[test]
    fn test_bulk_field_shape_errors() {
        let rules = RuleSet::new().field("tags", FieldRule::each(RuleSet::new()).required());
        let validator = Validator::new();

        let outcome = validator.validate(&rules, &json!({})).unwrap();
        assert_eq!(outcome.messages, vec!["tags is required"]);

        let outcome = validator.validate(&rules, &json!({"tags": {"a": 1}})).unwrap();
        assert_eq!(outcome.messages, vec!["tags must be an array"]);
    }

    #[test]
    fn test_validate_bulk() {
        let rules = rules(&[("name", "required,isLength:3,50"), ("email", "required,isEmail")]);
        let input = json!([
            {"name": "John Doe", "email": "john@example.com"},
            {"name": "Jo", "email": "bad"}
        ]);

        let outcome = Validator::new().validate_bulk(&rules, &input).unwrap();

        assert_eq!(
            outcome.messages,
            vec![
                "Item 2: name must be between 3 and 50 characters",
                "Item 2: email is invalid email",
            ]
        );
        assert_eq!(
            outcome.data,
            json!([{"name": "John Doe", "email": "john@example.com"}])
        );
    }

    #[test]
    fn test_validate_bulk_requires_array() {
        let rules = rules(&[("name", "required")]);
        let outcome = Validator::new()
            .validate_bulk(&rules, &json!({"name": "John"}))
            .unwrap();

        assert_eq!(outcome.messages, vec!["Expected an array"]);
        assert_eq!(outcome.data, json!([]));
    }

    #[test]
    fn test_validate_bulk_length_limit() {
        let config = ValidationConfig::default().with_max_array_length(2);
        let rules = rules(&[("name", "required")]);
        let input = json!([{"name": "a"}, {"name": "b"}, {"name": "c"}]);

        let outcome = Validator::with_config(config).validate_bulk(&rules, &input).unwrap();

        assert_eq!(outcome.messages, vec!["Expected at most 2 items, got 3"]);
        assert_eq!(outcome.data, json!([]));
    }

    #[test]
    fn test_non_object_payload() {
        let rules = rules(&[("name", "required")]);
        let outcome = Validator::new().validate(&rules, &json!(["John"])).unwrap();

        assert_eq!(outcome.messages, vec!["Expected an object"]);
    }

    fn user_type_rules() -> (RuleSet, ConditionalRules) {
        let base = rules(&[("userType", "required,isIn:individual|company")]);
        let conditional = ConditionalRules::new()
            .when(
                "userType",
                "individual",
                rules(&[("firstName", "required,isLength:1,50"), ("lastName", "required,isLength:1,50")]),
            )
            .when(
                "userType",
                "company",
                rules(&[("companyName", "required,isLength:1,100"), ("vatNumber", "required")]),
            );
        (base, conditional)
    }

    #[test]
    fn test_conditional_selects_branch() {
        let (base, conditional) = user_type_rules();
        let validator = Validator::new();

        let input = json!({"userType": "individual", "firstName": "John", "lastName": "Doe"});
        let outcome = validator.validate_conditional(&input, &base, &conditional).unwrap();
        assert!(outcome.is_valid(), "{:?}", outcome.messages);
        assert_eq!(outcome.data["firstName"], "John");

        let input = json!({"userType": "company", "companyName": "ACME"});
        let outcome = validator.validate_conditional(&input, &base, &conditional).unwrap();
        assert_eq!(outcome.messages, vec!["vatNumber is required"]);
    }

    #[test]
    fn test_conditional_failing_branch_keeps_data() {
        let (base, conditional) = user_type_rules();
        let validator = Validator::new();

        let input = json!({"userType": "company", "companyName": " <ACME> "});
        let outcome = validator.validate_conditional(&input, &base, &conditional).unwrap();
        assert_eq!(outcome.messages, vec!["vatNumber is required"]);
        assert_eq!(outcome.data["companyName"], "&lt;ACME&gt;");

        // Branch filtering of a nested array is only applied when the branch passes
        let base = RuleSet::new().field("kind", rule().required());
        let items = RuleSet::new().field("label", rule().required());
        let conditional = ConditionalRules::new().when(
            "kind",
            "list",
            RuleSet::new()
                .field("title", rule().required())
                .field("items", FieldRule::each(items)),
        );
        let input = json!({"kind": "list", "items": [{"label": "a"}, {}]});

        let outcome = validator.validate_conditional(&input, &base, &conditional).unwrap();
        assert_eq!(
            outcome.messages,
            vec!["title is required", "items: Item 2: label is required"]
        );
        assert_eq!(outcome.data["items"], json!([{"label": "a"}, {}]));

        let input = json!({"kind": "list", "title": "T", "items": [{"label": "a"}, {}]});
        let outcome = validator.validate_conditional(&input, &base, &conditional).unwrap();
        assert_eq!(outcome.messages, vec!["items: Item 2: label is required"]);
        assert_eq!(outcome.data["items"], json!([{"label": "a"}, {}]));

        let input = json!({"kind": "list", "title": "T", "items": [{"label": "a"}]});
        let outcome = validator.validate_conditional(&input, &base, &conditional).unwrap();
        assert!(outcome.is_valid());
        assert_eq!(outcome.data["items"], json!([{"label": "a"}]));
    }

    #[test]
    fn test_conditional_field_rule_failing_branch_keeps_data() {
        let items = RuleSet::new().field("label", rule().required());
        let rules = RuleSet::new().field(
            "kind",
            rule().required().when(
                "list",
                RuleSet::new()
                    .field("title", rule().required())
                    .field("items", FieldRule::each(items)),
            ),
        );

        let outcome = Validator::new()
            .validate(&rules, &json!({"kind": "list", "items": [{"label": "a"}, {}]}))
            .unwrap();

        assert_eq!(
            outcome.messages,
            vec!["title is required", "items: Item 2: label is required"]
        );
        assert_eq!(outcome.data["items"], json!([{"label": "a"}, {}]));
    }

    #[test]
    fn test_conditional_skipped_when_base_fails() {
        let (base, conditional) = user_type_rules();
        let input = json!({"userType": "person"});

        let outcome = Validator::new()
            .validate_conditional(&input, &base, &conditional)
            .unwrap();

        assert_eq!(outcome.messages, vec!["userType must be one of: individual, company"]);
    }

    #[test]
    fn test_conditional_field_rule() {
        let rules = RuleSet::new()
            .field("email", rule().required().email())
            .field(
                "userType",
                rule()
                    .required()
                    .one_of(["individual", "company"])
                    .when("individual", rules(&[("firstName", "required")]))
                    .when("company", rules(&[("companyName", "required")])),
            );
        let validator = Validator::new();

        let outcome = validator
            .validate(&rules, &json!({"email": "a@b.co", "userType": "company"}))
            .unwrap();
        assert_eq!(outcome.messages, vec!["companyName is required"]);

        let outcome = validator
            .validate(&rules, &json!({"email": "a@b.co", "userType": "robot", "companyName": ""}))
            .unwrap();
        assert_eq!(outcome.messages, vec!["userType must be one of: individual, company"]);
    }

    #[test]
    fn test_custom_extension() {
        let validator = Validator::new().with_custom("notReserved", |field, value| {
            match value.as_str() {
                Some("root") | Some("admin") => Some(format!("{} is reserved", field)),
                _ => None,
            }
        });
        let rules = rules(&[("username", "required,custom:notReserved,custom:unregistered")]);

        let outcome = validator.validate(&rules, &json!({"username": "root"})).unwrap();
        assert_eq!(outcome.messages, vec!["username is reserved"]);

        let outcome = validator.validate(&rules, &json!({"username": "jane"})).unwrap();
        assert!(outcome.is_valid());
    }

    #[test]
    fn test_max_depth() {
        let config = ValidationConfig::default().with_max_depth(1);
        let inner = RuleSet::new().field("c", FieldRule::nested(rules(&[("d", "required")])));
        let rules = RuleSet::new().field("b", FieldRule::nested(inner));

        let err = Validator::with_config(config)
            .validate(&rules, &json!({"b": {"c": {"d": "x"}}}))
            .unwrap_err();

        assert!(matches!(err, ValidationError::ExceededMaxDepth(_)));
    }

    #[test]
    fn test_rule_building_follows_config_policy() {
        let strict = Validator::with_config(
            ValidationConfig::default().with_unknown_rules(UnknownRulePolicy::Reject),
        );
        assert!(strict.parse_rules([("name", "requered")]).is_err());
        assert!(strict.rules_from_json(&json!({"name": "requered"})).is_err());

        let lenient = Validator::new();
        let rules = lenient.parse_rules([("name", "requered,isAlpha")]).unwrap();
        assert_eq!(rules.get("name"), Some(&FieldRule::Simple(vec![Predicate::IsAlpha])));
    }

    #[test]
    fn test_shareable_between_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Validator>();
        assert_send_sync::<RuleSet>();
        assert_send_sync::<ConditionalRules>();
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = ValidationOutcome::new(vec!["name is required".to_string()], json!({}));
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"message": ["name is required"], "data": {}})
        );
        assert_eq!(outcome.into_result(), Err(vec!["name is required".to_string()]));
    }
}
