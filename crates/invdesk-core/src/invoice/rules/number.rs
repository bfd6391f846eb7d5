//! Invoice number extraction.

use regex::Regex;

use super::patterns::{NUMBER, NUMBER_LABEL};
use super::FieldRule;

/// First run of digits after `Invoice Number:`.
pub struct NumberRule;

impl FieldRule for NumberRule {
    type Output = u64;

    fn field(&self) -> &'static str {
        "invoice number"
    }

    fn label(&self) -> &Regex {
        &NUMBER_LABEL
    }

    fn value(&self, text: &str) -> Option<u64> {
        NUMBER.captures(text).and_then(|caps| caps[1].parse().ok())
    }
}
