//! First-page text extraction using lopdf and pdf-extract.

use std::fs;
use std::panic;
use std::path::Path;

use lopdf::Document;
use tracing::{debug, trace};

use super::{Result, TextExtractor};
use crate::error::ExtractionError;

/// PDF text extractor.
///
/// pdf-extract only sees a copy of the document reduced to its first page;
/// lopdf's own text extraction is the fallback when pdf-extract fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract first-page text from an in-memory PDF.
    pub fn first_page_text_from_mem(&self, data: &[u8]) -> Result<String> {
        let mut doc = load_document(data)?;

        let page_count = doc.get_pages().len() as u32;
        if page_count > 1 {
            let rest: Vec<u32> = (2..=page_count).collect();
            doc.delete_pages(&rest);
        }

        let mut first_page = Vec::new();
        doc.save_to(&mut first_page)
            .map_err(|e| ExtractionError::Parse(format!("failed to save first page: {}", e)))?;

        match extract_text(&first_page) {
            Ok(text) => Ok(text),
            Err(e) => {
                debug!("pdf-extract failed ({}), falling back to lopdf", e);
                doc.extract_text(&[1])
                    .map_err(|e| ExtractionError::TextExtraction(e.to_string()))
            }
        }
    }
}

impl TextExtractor for PdfExtractor {
    fn first_page_text(&self, path: &Path) -> Result<String> {
        let data = fs::read(path).map_err(|source| ExtractionError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        trace!("Read {} bytes from {}", data.len(), path.display());
        self.first_page_text_from_mem(&data)
    }
}

fn load_document(data: &[u8]) -> Result<Document> {
    let mut doc = Document::load_mem(data).map_err(|e| ExtractionError::Parse(e.to_string()))?;

    // Handle PDFs with empty password encryption
    if doc.is_encrypted() {
        if doc.decrypt("").is_err() {
            return Err(ExtractionError::Encrypted);
        }
        debug!("Decrypted PDF with empty password");
    }

    let page_count = doc.get_pages().len();
    if page_count == 0 {
        return Err(ExtractionError::NoPages);
    }

    debug!("Loaded PDF with {} pages", page_count);
    Ok(doc)
}

// pdf-extract panics on some malformed fonts.
fn extract_text(data: &[u8]) -> std::result::Result<String, String> {
    match panic::catch_unwind(|| pdf_extract::extract_text_from_mem(data)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err("pdf-extract panicked".to_string()),
    }
}
