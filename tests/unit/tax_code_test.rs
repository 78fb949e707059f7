// Tests for the synthesized tax code and the text sanitizers backing
// the collection filters.

use proptest::prelude::*;

use ratebook::core::sanitize::{clean, escape_like, slugify};
use ratebook::modules::tax_rates::models::TaxRate;

fn rate_with(country: &str, state: &str, name: &str, priority: u32) -> TaxRate {
    TaxRate {
        id: 1,
        country: country.to_string(),
        state: state.to_string(),
        rate: "10".to_string(),
        name: name.to_string(),
        priority,
        compound: false,
        shipping: true,
        order: 0,
        class: String::new(),
    }
}

#[test]
fn test_code_concatenates_with_separator() {
    assert_eq!(rate_with("US", "AL", "TAX-1", 1).code(), "US-AL-TAX-1-1");
}

#[test]
fn test_code_skips_empty_parts() {
    assert_eq!(rate_with("US", "", "VAT", 2).code(), "US-VAT-2");
    assert_eq!(rate_with("", "", "VAT", 1).code(), "VAT-1");
    assert_eq!(rate_with("", "", "", 0).code(), "");
}

#[test]
fn test_zero_priority_counts_as_empty() {
    assert_eq!(rate_with("US", "", "", 0).code(), "US");
}

proptest! {
    #[test]
    fn prop_code_matches_joined_nonempty_parts(
        country in "[A-Z]{0,2}",
        state in "[A-Z]{0,3}",
        name in "[A-Za-z0-9 ]{0,12}",
        priority in 0u32..100,
    ) {
        let rate = rate_with(&country, &state, &name, priority);

        let priority_part = if priority == 0 {
            String::new()
        } else {
            priority.to_string()
        };
        let expected: Vec<&str> = [
            country.as_str(),
            state.as_str(),
            name.as_str(),
            priority_part.as_str(),
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect();

        prop_assert_eq!(rate.code(), expected.join("-"));
    }

    #[test]
    fn prop_escape_like_neutralizes_metacharacters(term in ".{0,20}") {
        let escaped = escape_like(&term);

        // Every wildcard in the original is preceded by a backslash
        let mut chars = escaped.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\\' {
                // The escaped character follows; consume it
                chars.next();
            } else {
                prop_assert!(!matches!(c, '%' | '_'));
            }
        }
    }

    #[test]
    fn prop_slugify_output_is_a_slug(input in "[ -~]{0,40}") {
        let slug = slugify(&input);
        prop_assert!(slug
            .chars()
            .all(|c| c == '-' || (!c.is_uppercase() && c.is_alphanumeric())));
        prop_assert!(!slug.starts_with('-'));
        prop_assert!(!slug.ends_with('-'));
        prop_assert!(!slug.contains("--"));
    }
}

#[test]
fn test_clean_preserves_interior_spaces() {
    assert_eq!(clean("  SW1A 1AA "), "SW1A 1AA");
}
