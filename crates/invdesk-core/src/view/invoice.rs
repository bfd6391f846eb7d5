use super::{Displayable, RowTag};
use crate::models::invoice::{Invoice, Status};

impl Displayable for Invoice {
    fn headings() -> &'static [&'static str] {
        &["File", "Type", "Status", "Number", "Date", "Amount", "Work order"]
    }

    /// The file name, which survives moves between status folders.
    fn identity_key(&self) -> String {
        self.file_name()
    }

    fn label(&self) -> String {
        self.link.display().to_string()
    }

    fn columns(&self) -> Vec<String> {
        vec![
            self.file_name(),
            self.invoice_type.clone(),
            self.status.to_string(),
            self.number.to_string(),
            self.timestamp
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            self.amount_display(),
            self.work_order.clone().unwrap_or_default(),
        ]
    }

    fn display_tag(&self, position: usize) -> RowTag {
        match self.status {
            Status::Success => RowTag::alternating(position),
            status => RowTag::Named(status.as_str()),
        }
    }
}
