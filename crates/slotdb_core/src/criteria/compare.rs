//! Type-aware field comparators.

use crate::schema::{trim_pad, FieldType, Money};
use std::cmp::Ordering;

/// Compares a field's text with a pattern according to the field type.
///
/// - `Text`: case-insensitive, trailing padding ignored.
/// - `Integer`: blank text is 0; if either side is not an integer the
///   values compare equal.
/// - `Money`: amounts only, currency symbols ignored; an unparsable amount
///   counts as 0.
#[must_use]
pub fn compare(field_type: FieldType, field: &str, pattern: &str) -> Ordering {
    match field_type {
        FieldType::Text => compare_text(field, pattern),
        FieldType::Integer => compare_integer(field, pattern),
        FieldType::Money => Money::parse_lenient(field).cmp_amount(&Money::parse_lenient(pattern)),
    }
}

fn compare_text(field: &str, pattern: &str) -> Ordering {
    let field = trim_pad(field).chars().flat_map(char::to_lowercase);
    let pattern = pattern.chars().flat_map(char::to_lowercase);
    field.cmp(pattern)
}

fn compare_integer(field: &str, pattern: &str) -> Ordering {
    fn parse(text: &str) -> Option<i64> {
        let text = text.trim();
        if text.is_empty() {
            Some(0)
        } else {
            text.parse().ok()
        }
    }
    match (parse(field), parse(pattern)) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => Ordering::Equal,
    }
}

/// Case-insensitive prefix match of the trimmed field text.
#[must_use]
pub fn starts_with(field: &str, pattern: &str) -> bool {
    let field = field.trim().to_uppercase();
    field.starts_with(&pattern.trim().to_uppercase())
}

/// Set containment over comma-separated tokens.
///
/// Tokens are trimmed and upper-cased; empty tokens are skipped. A pattern
/// with no tokens is contained in every field.
#[must_use]
pub fn contains_all(field: &str, pattern: &str) -> bool {
    let have: Vec<String> = tokens(field).collect();
    tokens(pattern).all(|token| have.contains(&token))
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_uppercase)
}
