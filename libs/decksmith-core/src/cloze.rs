//! Cloze deletion markers (`{{c1::text}}`) in note fields.

use crate::error::{CoreError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static CLOZE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{c([^:{}\s]*)::").expect("valid cloze regex"));

/// Distinct cloze numbers referenced across `fields`, in first-seen order.
///
/// A marker whose number is not a positive integer is an error.
pub fn cloze_numbers_in_fields<S: AsRef<str>>(fields: &[S]) -> Result<Vec<u32>> {
    let mut seen = HashSet::new();
    let mut numbers = Vec::new();

    for field in fields {
        for captures in CLOZE_MARKER.captures_iter(field.as_ref()) {
            let raw = &captures[1];
            let number = raw
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| CoreError::InvalidClozeNumber(raw.to_string()))?;
            if seen.insert(number) {
                numbers.push(number);
            }
        }
    }

    Ok(numbers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn no_cloze() {
        let numbers = cloze_numbers_in_fields(&["This is a test.", "Another field."]).unwrap();
        assert!(numbers.is_empty());
    }

    #[test]
    fn single_cloze() {
        let numbers = cloze_numbers_in_fields(&["This is a {{c1::test}}.", "Another field."]).unwrap();
        assert_eq!(numbers, vec![1]);
    }

    #[test]
    fn repeated_number_is_reported_once() {
        let numbers =
            cloze_numbers_in_fields(&["{{c1::a}} and {{c1::b}}", "{{c2::c}}"]).unwrap();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn first_seen_order_is_kept() {
        let numbers = cloze_numbers_in_fields(&[
            "This is a {{c3::test}} and another {{c1::example}}.",
            "Another {{c2::field}}.",
        ])
        .unwrap();
        assert_eq!(numbers, vec![3, 1, 2]);
    }

    #[test]
    fn multi_digit_numbers() {
        let numbers = cloze_numbers_in_fields(&["{{c12::x}} {{c3::y::hint}}"]).unwrap();
        assert_eq!(numbers, vec![12, 3]);
    }

    #[test]
    fn reject_non_numeric_marker() {
        let result = cloze_numbers_in_fields(&["This is a {{cX::test}}."]);
        assert!(matches!(result, Err(CoreError::InvalidClozeNumber(ref n)) if n == "X"));
    }

    #[test]
    fn reject_zero() {
        let result = cloze_numbers_in_fields(&["{{c0::nope}}"]);
        assert!(matches!(result, Err(CoreError::InvalidClozeNumber(_))));
    }

    #[test]
    fn text_without_marker_syntax_is_ignored() {
        let numbers = cloze_numbers_in_fields(&["{{Front}} c1:: {c1::x}"]).unwrap();
        assert!(numbers.is_empty());
    }
}
