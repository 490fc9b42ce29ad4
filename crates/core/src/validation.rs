//! Field validation rules for student registration.
//!
//! Each rule takes a raw field value and answers pass/fail with a
//! human-readable message. Rules never panic on malformed input; a value
//! that cannot be interpreted simply fails the rule.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Names must be letters, spaces, hyphens, or apostrophes.
static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z\s'-]+$").expect("valid regex"));

/// Lightweight RFC-shape email check: something@something.something, no
/// whitespace or extra `@`.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

/// Phone numbers follow the `(CCC)CCC-CCC-CCC` format, e.g. `(237)690-000-000`.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\([0-9]{3}\)[0-9]{3}-[0-9]{3}-[0-9]{3}$").expect("valid regex"));

/// Minimum trimmed length for first/last names.
pub const NAME_MIN_LEN: usize = 2;
/// Maximum trimmed length for first/last names.
pub const NAME_MAX_LEN: usize = 50;
/// Maximum length for email addresses.
pub const EMAIL_MAX_LEN: usize = 100;
/// Minimum registrant age, inclusive.
pub const MIN_AGE: i32 = 16;
/// Maximum registrant age, inclusive.
pub const MAX_AGE: i32 = 100;

/// Fields that must be present and non-empty in a registration payload.
pub const REQUIRED_FIELDS: &[&str] = &[
    "first_name",
    "last_name",
    "email",
    "date_of_birth",
    "gender",
    "course",
    "academic_year",
    "semester",
];

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validate a first or last name: trimmed length in [2, 50], letters,
/// spaces, hyphens, and apostrophes only.
pub fn validate_name(value: &str) -> Result<(), String> {
    let trimmed = value.trim();
    if trimmed.len() < NAME_MIN_LEN || trimmed.len() > NAME_MAX_LEN {
        return Err(format!(
            "must be between {NAME_MIN_LEN} and {NAME_MAX_LEN} characters"
        ));
    }
    if !NAME_RE.is_match(trimmed) {
        return Err("may only contain letters, spaces, hyphens, and apostrophes".to_string());
    }
    Ok(())
}

/// Validate an email address shape and length.
pub fn validate_email(value: &str) -> Result<(), String> {
    let trimmed = value.trim();
    if trimmed.len() > EMAIL_MAX_LEN {
        return Err(format!("must be at most {EMAIL_MAX_LEN} characters"));
    }
    if !EMAIL_RE.is_match(trimmed) {
        return Err("is not a valid email address".to_string());
    }
    Ok(())
}

/// Validate an optional phone number. Empty input passes; non-empty input
/// must match `(CCC)CCC-CCC-CCC`.
pub fn validate_phone(value: &str) -> Result<(), String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(());
    }
    if !PHONE_RE.is_match(trimmed) {
        return Err("must match the format (237)690-000-000".to_string());
    }
    Ok(())
}

/// Compute a person's age in whole years on `today`.
///
/// Returns `None` when the date of birth lies in the future.
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> Option<i32> {
    if date_of_birth > today {
        return None;
    }
    let mut age = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    Some(age)
}

/// Validate a date of birth: not in the future, and yielding an age within
/// [16, 100] inclusive on `today`.
pub fn validate_date_of_birth(date_of_birth: NaiveDate, today: NaiveDate) -> Result<(), String> {
    match age_on(date_of_birth, today) {
        None => Err("must not be in the future".to_string()),
        Some(age) if age < MIN_AGE || age > MAX_AGE => Err(format!(
            "must yield an age between {MIN_AGE} and {MAX_AGE} years"
        )),
        Some(_) => Ok(()),
    }
}
