//! Error types for the invdesk-core library.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::invoice::Status;

/// Main error type for the invdesk library.
#[derive(Error, Debug)]
pub enum InvdeskError {
    /// PDF text extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Invoice field parsing error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Workflow (status transition) error.
    #[error("workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    /// Preview rendering error.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file could not be parsed or serialized.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to reading text out of a PDF.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// The PDF is encrypted with a non-empty password.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Failed to extract text from the first page.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),
}

/// Errors related to invoice field extraction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A required label is missing from the text.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A label is present but its value does not match the expected grammar.
    #[error("failed to parse {field}: {value:?}")]
    Malformed { field: &'static str, value: String },
}

/// Errors raised while driving the external application.
#[derive(Error, Debug)]
pub enum AutomationError {
    /// The input backend could not be initialised.
    #[error("input backend unavailable: {0}")]
    Unavailable(String),

    /// A key or text event could not be delivered.
    #[error("failed to send {action}: {reason}")]
    Input { action: String, reason: String },

    /// The invoice lacks data the key sequence needs.
    #[error("invoice {0} cannot be entered: {1}")]
    Incomplete(String, &'static str),
}

/// Errors related to moving invoice files between status folders.
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// A status folder could not be created.
    #[error("failed to create folder {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The status folder is gone.
    #[error("folder does not exist: {0}")]
    MissingFolder(PathBuf),

    /// The destination already holds a file with the same name.
    #[error("destination already exists: {0}")]
    DestinationExists(PathBuf),

    /// The rename itself failed.
    #[error("failed to move {from} to {to}: {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to page preview rendering.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The document could not be opened.
    #[error("failed to open document: {0}")]
    Open(String),

    /// Invalid page index requested.
    #[error("invalid page index: {0}")]
    InvalidPage(u32),

    /// Nothing could be rasterized for the page.
    #[error("nothing to render on page {0}")]
    Empty(u32),

    /// The rasterizer backend failed.
    #[error("rasterizer failed: {0}")]
    Backend(String),
}

/// Errors raised by the application controller.
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// No working folder has been opened.
    #[error("no working folder selected")]
    NoFolder,

    /// No invoice with this identity key is loaded.
    #[error("unknown invoice: {0}")]
    UnknownInvoice(String),

    /// The requested status change is not part of the workflow.
    #[error("cannot move invoice from {from} to {to}")]
    InvalidTransition { from: Status, to: Status },

    /// Registration needs a work order.
    #[error("invoice {0} has no work order")]
    MissingWorkOrder(String),

    /// The external application could not be driven.
    #[error(transparent)]
    Automation(#[from] AutomationError),

    /// The file could not be relocated.
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),

    /// Scanning the folder failed.
    #[error("failed to scan folder: {0}")]
    Scan(#[from] std::io::Error),
}

/// Result type for the invdesk library.
pub type Result<T> = std::result::Result<T, InvdeskError>;
