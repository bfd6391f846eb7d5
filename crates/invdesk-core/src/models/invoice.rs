//! Invoice record and its workflow status.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Type tag used when the sender is not in the table.
pub const UNKNOWN_TYPE: &str = "Unknown";

/// An invoice extracted from a PDF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Path to the source PDF.
    pub link: PathBuf,

    /// Sender classification tag, or "Unknown".
    pub invoice_type: String,

    /// Invoice number (0 when unknown).
    pub number: u64,

    /// Booking number the invoice belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_order: Option<String>,

    /// Invoice date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<NaiveDate>,

    /// Invoice total.
    pub amount: Decimal,

    /// VAT part of the total. Not extracted yet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_vat: Option<Decimal>,

    /// Workflow stage.
    pub status: Status,
}

impl Invoice {
    /// An invoice that could not be classified or read.
    ///
    /// All numeric and date fields are defaulted and the status is `error`.
    pub fn unrecognized(link: impl Into<PathBuf>) -> Self {
        Self {
            link: link.into(),
            invoice_type: UNKNOWN_TYPE.to_string(),
            number: 0,
            work_order: None,
            timestamp: None,
            amount: Decimal::ZERO,
            amount_vat: None,
            status: Status::Error,
        }
    }

    /// File name of the source PDF, used as display identity.
    pub fn file_name(&self) -> String {
        file_name_of(&self.link)
    }

    /// Amount formatted with a comma decimal separator ("1234,56").
    pub fn amount_display(&self) -> String {
        self.amount.to_string().replace('.', ",")
    }
}

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Workflow stage of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Parsed cleanly, ready to register.
    #[default]
    Success,
    /// Unknown sender, unreadable file or malformed field.
    Error,
    /// No booking number on the invoice.
    MissingWo,
    /// Being typed into the external application.
    Working,
    /// Registered in the external application.
    Done,
    /// File uploaded to the external application.
    Uploaded,
}

impl Status {
    /// All statuses in declaration order.
    pub const ALL: [Status; 6] = [
        Status::Success,
        Status::Error,
        Status::MissingWo,
        Status::Working,
        Status::Done,
        Status::Uploaded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::Error => "error",
            Status::MissingWo => "missing_wo",
            Status::Working => "working",
            Status::Done => "done",
            Status::Uploaded => "uploaded",
        }
    }

    /// Whether the workflow allows moving from `self` to `next`.
    ///
    /// `working` only ever leads to `done`; restoring the previous status
    /// after a failed registration is done by the controller directly.
    /// `uploaded` is terminal. Relocation targets may repeat the current
    /// status, since an invoice parsed as `error` still sits in the root
    /// folder until it is marked.
    pub fn can_transition_to(self, next: Status) -> bool {
        use Status::*;
        match (self, next) {
            (Working, Done) => true,
            (Working, _) | (Uploaded, _) => false,
            (Success | Error | MissingWo, Working) => true,
            (_, Working) | (_, Done) | (_, Success) => false,
            (_, Error | MissingWo | Uploaded) => true,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| format!("unknown status: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unrecognized_defaults() {
        let invoice = Invoice::unrecognized("/tmp/a.pdf");
        assert_eq!(invoice.invoice_type, "Unknown");
        assert_eq!(invoice.number, 0);
        assert_eq!(invoice.amount, Decimal::ZERO);
        assert!(invoice.timestamp.is_none());
        assert!(invoice.work_order.is_none());
        assert_eq!(invoice.status, Status::Error);
        assert_eq!(invoice.file_name(), "a.pdf");
    }

    #[test]
    fn test_status_round_trip_names() {
        for status in Status::ALL {
            assert_eq!(status.as_str().parse::<Status>().unwrap(), status);
        }
        assert_eq!(
            serde_json::to_string(&Status::MissingWo).unwrap(),
            "\"missing_wo\""
        );
        assert!("finished".parse::<Status>().is_err());
    }

    #[test]
    fn test_register_transitions() {
        assert!(Status::Success.can_transition_to(Status::Working));
        assert!(Status::MissingWo.can_transition_to(Status::Working));
        assert!(Status::Working.can_transition_to(Status::Done));
        assert!(!Status::Done.can_transition_to(Status::Working));
        assert!(!Status::Success.can_transition_to(Status::Done));
        assert!(!Status::Working.can_transition_to(Status::Error));
    }

    #[test]
    fn test_relocation_transitions() {
        assert!(Status::Error.can_transition_to(Status::Error));
        assert!(Status::Done.can_transition_to(Status::Uploaded));
        assert!(Status::Success.can_transition_to(Status::MissingWo));
        assert!(!Status::Uploaded.can_transition_to(Status::Error));
        assert!(!Status::Error.can_transition_to(Status::Success));
    }

    #[test]
    fn test_amount_display_uses_comma() {
        let mut invoice = Invoice::unrecognized("x.pdf");
        invoice.amount = "1234.50".parse().unwrap();
        assert_eq!(invoice.amount_display(), "1234,50");
    }
}
