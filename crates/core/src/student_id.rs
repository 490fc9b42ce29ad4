//! External student-ID convention.
//!
//! Student IDs follow `STU<4-digit year><4-digit suffix>`, e.g.
//! `STU20260042`. The suffix is random; uniqueness among non-deleted rows
//! is the database's job (partial unique index), and callers retry a
//! bounded number of times on collision.

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;

/// Prefix shared by all generated student IDs.
pub const PREFIX: &str = "STU";

/// Width of the zero-padded numeric suffix.
pub const SUFFIX_WIDTH: usize = 4;

/// Maximum insert attempts before ID allocation fails closed.
pub const MAX_GENERATION_ATTEMPTS: u32 = 5;

static STUDENT_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^STU[0-9]{4}[0-9]{4}$").expect("valid regex"));

/// Format a student ID from a year and numeric suffix.
pub fn format_id(year: i32, suffix: u32) -> String {
    format!("{PREFIX}{year}{suffix:0width$}", width = SUFFIX_WIDTH)
}

/// Generate a candidate student ID for the given year with a random suffix.
pub fn random_id(year: i32) -> String {
    let suffix = rand::rng().random_range(0..10u32.pow(SUFFIX_WIDTH as u32));
    format_id(year, suffix)
}

/// Check that a client-supplied student ID matches the convention.
pub fn is_valid_format(value: &str) -> bool {
    STUDENT_ID_RE.is_match(value)
}
