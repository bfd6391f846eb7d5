//! Rule-based field extractors for invoice text.

pub mod amounts;
pub mod dates;
pub mod number;
pub mod patterns;
pub mod work_order;

pub use amounts::{parse_amount, TotalRule};
pub use dates::{parse_invoice_date, DateRule};
pub use number::NumberRule;
pub use patterns::*;
pub use work_order::{select_work_order, WorkOrderRule};

use regex::Regex;

use crate::error::ParseError;

/// A labelled field on the invoice.
///
/// `extract` distinguishes an absent label (`Ok(None)`) from a label whose
/// value does not match the field grammar (`Err(Malformed)`).
pub trait FieldRule {
    /// The type of value this rule produces.
    type Output;

    /// Field name used in errors.
    fn field(&self) -> &'static str;

    /// Pattern matching the label token alone.
    fn label(&self) -> &Regex;

    /// Parse the value following the label, if it matches the grammar.
    fn value(&self, text: &str) -> Option<Self::Output>;

    /// Extract the field, `None` when the label is absent.
    fn extract(&self, text: &str) -> Result<Option<Self::Output>, ParseError> {
        let Some(label) = self.label().find(text) else {
            return Ok(None);
        };

        match self.value(text) {
            Some(value) => Ok(Some(value)),
            None => Err(ParseError::Malformed {
                field: self.field(),
                value: text_after(text, label.end()),
            }),
        }
    }

    /// Extract a field that must be present.
    fn require(&self, text: &str) -> Result<Self::Output, ParseError> {
        self.extract(text)?
            .ok_or(ParseError::MissingField(self.field()))
    }
}

/// Rest of the line after `pos`, shortened for error messages.
fn text_after(text: &str, pos: usize) -> String {
    text[pos..]
        .lines()
        .next()
        .unwrap_or("")
        .trim()
        .chars()
        .take(40)
        .collect()
}
