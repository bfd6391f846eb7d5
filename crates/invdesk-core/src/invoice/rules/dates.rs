//! Invoice date extraction.

use chrono::NaiveDate;
use regex::Regex;

use super::patterns::{DATE, DATE_LABEL};
use super::FieldRule;

/// `Mon DD, YYYY` after `Invoice Date:`.
pub struct DateRule;

impl FieldRule for DateRule {
    type Output = NaiveDate;

    fn field(&self) -> &'static str {
        "invoice date"
    }

    fn label(&self) -> &Regex {
        &DATE_LABEL
    }

    fn value(&self, text: &str) -> Option<NaiveDate> {
        DATE.captures(text)
            .and_then(|caps| parse_invoice_date(&caps[1]))
    }
}

/// Parse an English short-month date such as "Mar 07, 2024".
///
/// Month names are matched case-insensitively.
pub fn parse_invoice_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%b %d, %Y").ok()
}
