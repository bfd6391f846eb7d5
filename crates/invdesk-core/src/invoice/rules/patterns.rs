//! Regex patterns for invoice field extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Invoice number
    pub static ref NUMBER_LABEL: Regex = Regex::new(r"Invoice Number:").unwrap();

    pub static ref NUMBER: Regex = Regex::new(r"Invoice Number:[ \t]*(\d+)").unwrap();

    // Invoice date ("Jan 05, 2024")
    pub static ref DATE_LABEL: Regex = Regex::new(r"Invoice Date:").unwrap();

    pub static ref DATE: Regex = Regex::new(
        r"Invoice Date:[ \t]*([A-Za-z]{3} \d{1,2}, \d{4})"
    ).unwrap();

    // Invoice total in EUR ("1,234.56" or "1234.56")
    pub static ref TOTAL_LABEL: Regex = Regex::new(r"Invoice Total:").unwrap();

    pub static ref TOTAL: Regex = Regex::new(
        r"Invoice Total:[ \t]*EUR[ \t]*((?:\d{1,3}(?:,\d{3})*|\d+)\.\d{2})(?:[^\d]|$)"
    ).unwrap();

    // Booking number ("123456/987654")
    pub static ref WORK_ORDER_LABEL: Regex = Regex::new(r"Booking Number:").unwrap();

    pub static ref WORK_ORDER: Regex = Regex::new(
        r"Booking Number:[ \t]*(\d+)/(\d+)"
    ).unwrap();
}
