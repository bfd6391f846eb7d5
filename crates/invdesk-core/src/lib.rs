//! Core library for the invoice desk.
//!
//! This crate provides:
//! - First-page PDF text extraction
//! - Rule-based invoice field extraction (type, number, date, total, work order)
//! - Folder scanning with per-file failure isolation
//! - A generic searchable/sortable list model for display
//! - The invoice status workflow with file relocation
//! - Keystroke automation and page preview behind narrow interfaces

pub mod automation;
pub mod controller;
pub mod error;
pub mod invoice;
pub mod models;
pub mod pdf;
pub mod preview;
pub mod scan;
pub mod view;

pub use automation::{Automator, KeyAction, KeyScript, KeySink, KeystrokeAutomator, LogSink};
pub use controller::{AppState, Controller};
pub use error::{
    AutomationError, ExtractionError, FilesystemError, InvdeskError, ParseError, RenderError,
    Result, WorkflowError,
};
pub use invoice::{InvoiceParser, RuleInvoiceParser, SenderTable};
pub use models::config::InvdeskConfig;
pub use models::invoice::{Invoice, Status};
pub use pdf::{PdfExtractor, TextExtractor};
pub use preview::{Debouncer, EmbeddedImageRenderer, PageRenderer, PreviewPane};
pub use scan::FolderScanner;
pub use view::{Displayable, ListModel, RowTag};

#[cfg(feature = "keystrokes")]
pub use automation::EnigoSink;

#[cfg(feature = "pdfium")]
pub use preview::PdfiumRenderer;
