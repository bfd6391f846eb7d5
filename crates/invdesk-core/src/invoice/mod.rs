//! Invoice field extraction module.

mod parser;
pub mod rules;
mod sender;

pub use parser::{InvoiceParser, RuleInvoiceParser};
pub use sender::SenderTable;

use crate::error::ParseError;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ParseError>;
