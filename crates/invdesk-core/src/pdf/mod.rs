//! PDF text extraction module.

mod extractor;

pub use extractor::PdfExtractor;

use std::path::Path;

use crate::error::ExtractionError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Source of first-page invoice text.
pub trait TextExtractor: Send + Sync {
    /// Read the text of the first page of the document at `path`.
    fn first_page_text(&self, path: &Path) -> Result<String>;
}

/// Whether `path` has a `.pdf` extension, in any case.
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pdf() {
        assert!(is_pdf(Path::new("a.pdf")));
        assert!(is_pdf(Path::new("dir/B.PDF")));
        assert!(is_pdf(Path::new("c.Pdf")));
        assert!(!is_pdf(Path::new("d.pdf.txt")));
        assert!(!is_pdf(Path::new("pdf")));
    }
}
