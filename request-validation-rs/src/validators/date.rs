//! Date and boolean validators

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DATE_REGEX: Regex =
        Regex::new(r"^(\d{4})([-/])(\d{1,2})([-/])(\d{1,2})$").unwrap();
}

/// Validate that a string is a calendar date written `YYYY-MM-DD` or
/// `YYYY/MM/DD` (one delimiter throughout, month and day may omit the
/// leading zero)
pub fn is_date(s: &str) -> bool {
    let caps = match DATE_REGEX.captures(s) {
        Some(caps) => caps,
        None => return false,
    };

    if caps[2] != caps[4] {
        return false;
    }

    match (caps[1].parse::<i32>(), caps[3].parse::<u32>(), caps[5].parse::<u32>()) {
        (Ok(year), Ok(month), Ok(day)) => NaiveDate::from_ymd_opt(year, month, day).is_some(),
        _ => false,
    }
}

/// Validate the string form of a boolean
pub fn is_boolean(s: &str) -> bool {
    matches!(s, "true" | "false")
}
