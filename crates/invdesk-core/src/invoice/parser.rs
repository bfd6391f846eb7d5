//! Rule-based invoice parser.

use std::path::Path;

use tracing::{debug, warn};

use crate::models::config::ParserConfig;
use crate::models::invoice::{Invoice, Status};

use super::rules::{DateRule, FieldRule, NumberRule, TotalRule, WorkOrderRule};
use super::{Result, SenderTable};

/// Trait for invoice parsing.
pub trait InvoiceParser {
    /// Parse an invoice from first-page text.
    ///
    /// An unknown sender is not an error: it yields an `error`-status
    /// invoice with defaulted fields.
    fn parse(&self, link: &Path, text: &str) -> Result<Invoice>;

    /// Parse, turning a field error into an `error`-status invoice.
    fn parse_or_flag(&self, link: &Path, text: &str) -> Invoice {
        match self.parse(link, text) {
            Ok(invoice) => invoice,
            Err(e) => {
                warn!("{}: {}", link.display(), e);
                Invoice::unrecognized(link)
            }
        }
    }
}

/// Parser driven by the sender table and the field rules.
#[derive(Debug, Clone, Default)]
pub struct RuleInvoiceParser {
    senders: SenderTable,
}

impl RuleInvoiceParser {
    /// Create a parser with the default sender table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sender table.
    pub fn with_senders(mut self, senders: SenderTable) -> Self {
        self.senders = senders;
        self
    }

    pub fn from_config(config: &ParserConfig) -> Self {
        Self::new().with_senders(SenderTable::from_config(config))
    }
}

impl InvoiceParser for RuleInvoiceParser {
    fn parse(&self, link: &Path, text: &str) -> Result<Invoice> {
        let Some(invoice_type) = self.senders.classify(text) else {
            debug!("{}: unknown sender", link.display());
            return Ok(Invoice::unrecognized(link));
        };

        let number = NumberRule.require(text)?;
        let timestamp = DateRule.require(text)?;
        let amount = TotalRule.require(text)?;
        let work_order = WorkOrderRule.extract(text)?;

        let status = if work_order.is_some() {
            Status::Success
        } else {
            Status::MissingWo
        };

        debug!(
            "{}: {} invoice {} dated {} total {} ({})",
            link.display(),
            invoice_type,
            number,
            timestamp,
            amount,
            status
        );

        Ok(Invoice {
            link: link.to_path_buf(),
            invoice_type: invoice_type.to_string(),
            number,
            work_order,
            timestamp: Some(timestamp),
            amount,
            amount_vat: None,
            status,
        })
    }
}
