//! Rule sets shared by several endpoints

use crate::builder::rule;
use crate::schema::{FieldRule, RuleSet};

/// `name`, `email` and `password` of a new account
pub fn user_registration() -> RuleSet {
    RuleSet::new()
        .field("name", rule().required().length(3, 50))
        .field("email", rule().required().email())
        .field("password", rule().required().strong_password())
}

pub fn user_login() -> RuleSet {
    RuleSet::new()
        .field("email", rule().required().email())
        .field("password", rule().required())
}

pub fn email_only() -> RuleSet {
    RuleSet::new().field("email", rule().required().email())
}

/// Numeric `id` path parameter
pub fn id_validation() -> RuleSet {
    RuleSet::new().field("id", rule().required().numeric())
}

/// A contact with its list of addresses
pub fn contact() -> RuleSet {
    let address = RuleSet::new()
        .field("addressType", rule().required())
        .field("street", rule().required());

    RuleSet::new()
        .field("firstName", rule().required().length(1, 100))
        .field("lastName", rule().length(1, 100))
        .field("email", rule().email())
        .field("phone", rule().length(1, 20))
        .field("Addresses", FieldRule::each(address))
}
