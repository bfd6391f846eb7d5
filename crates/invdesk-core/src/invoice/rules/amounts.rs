//! Invoice total extraction.

use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{TOTAL, TOTAL_LABEL};
use super::FieldRule;

/// EUR amount after `Invoice Total:`.
pub struct TotalRule;

impl FieldRule for TotalRule {
    type Output = Decimal;

    fn field(&self) -> &'static str {
        "invoice total"
    }

    fn label(&self) -> &Regex {
        &TOTAL_LABEL
    }

    fn value(&self, text: &str) -> Option<Decimal> {
        TOTAL.captures(text).and_then(|caps| parse_amount(&caps[1]))
    }
}

/// Parse an amount with comma thousands separators ("1,234.56").
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned = s.trim().replace(',', "");
    Decimal::from_str(&cleaned).ok()
}
