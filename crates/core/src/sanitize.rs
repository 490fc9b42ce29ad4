//! Input sanitization for free-text values.
//!
//! Filter strings and stored text fields are cleaned before they reach the
//! repository layer: whitespace is trimmed and anything that looks like
//! markup is stripped. Queries are always parameterized, so this is about
//! stored-content hygiene rather than injection prevention.

/// Trim a value and strip `<...>` markup sequences.
///
/// An unterminated `<` swallows the rest of the input, matching the
/// behaviour of conventional tag strippers.
pub fn clean(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;
    for ch in input.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.trim().to_string()
}

/// Clean an optional value, mapping empty results to `None`.
pub fn clean_opt(input: Option<&str>) -> Option<String> {
    let cleaned = clean(input?);
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}
