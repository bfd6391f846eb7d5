//! Booking number (work order) extraction.

use regex::Regex;

use super::patterns::{WORK_ORDER, WORK_ORDER_LABEL};
use super::FieldRule;

/// Two slash-separated digit groups after `Booking Number:`.
pub struct WorkOrderRule;

impl FieldRule for WorkOrderRule {
    type Output = String;

    fn field(&self) -> &'static str {
        "booking number"
    }

    fn label(&self) -> &Regex {
        &WORK_ORDER_LABEL
    }

    fn value(&self, text: &str) -> Option<String> {
        WORK_ORDER
            .captures(text)
            .map(|caps| select_work_order(&caps[1], &caps[2]).to_string())
    }
}

/// Pick the work order out of a booking number pair.
///
/// Work orders start with `9`: the first group is used when it does,
/// otherwise the second.
pub fn select_work_order<'a>(first: &'a str, second: &'a str) -> &'a str {
    if first.starts_with('9') {
        first
    } else {
        second
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_group_starting_with_nine() {
        assert_eq!(select_work_order("912345", "100200"), "912345");
    }

    #[test]
    fn test_second_group_otherwise() {
        assert_eq!(select_work_order("812345", "923456"), "923456");
        assert_eq!(select_work_order("100", "200"), "200");
    }

    #[test]
    fn test_single_nine() {
        assert_eq!(select_work_order("9", "12345"), "9");
    }

    #[test]
    fn test_extract_work_order() {
        assert_eq!(
            WorkOrderRule.extract("Booking Number:123456/954321\n"),
            Ok(Some("954321".to_string()))
        );
        assert_eq!(WorkOrderRule.extract("no booking here"), Ok(None));
        assert!(WorkOrderRule.extract("Booking Number:123456").is_err());
    }
}
