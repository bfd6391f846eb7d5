//! Folder scanning: every PDF in a directory becomes an invoice.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::invoice::{InvoiceParser, RuleInvoiceParser};
use crate::models::invoice::{Invoice, Status};
use crate::pdf::{is_pdf, PdfExtractor, TextExtractor};

/// Parses all PDFs directly inside a folder.
///
/// A file that cannot be read or parsed still yields an invoice, with
/// status `error`; it never aborts the scan.
pub struct FolderScanner<E = PdfExtractor, P = RuleInvoiceParser> {
    extractor: E,
    parser: P,
}

impl FolderScanner {
    /// Scanner with the PDF extractor and the default rules.
    pub fn new() -> Self {
        Self::with_parts(PdfExtractor::new(), RuleInvoiceParser::new())
    }
}

impl Default for FolderScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, P> FolderScanner<E, P>
where
    E: TextExtractor,
    P: InvoiceParser + Sync,
{
    pub fn with_parts(extractor: E, parser: P) -> Self {
        Self { extractor, parser }
    }

    /// PDF files directly inside `dir`, sorted by file name.
    pub fn list_pdfs(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() && is_pdf(&entry.path()) {
                files.push(entry.path());
            }
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }

    /// Parse one file.
    pub fn scan_file(&self, path: &Path) -> Invoice {
        match self.extractor.first_page_text(path) {
            Ok(text) => self.parser.parse_or_flag(path, &text),
            Err(e) => {
                warn!("{}: {}", path.display(), e);
                Invoice::unrecognized(path)
            }
        }
    }

    /// Parse every PDF in `dir`. Only failing to list the folder is an error.
    pub fn scan(&self, dir: &Path) -> std::io::Result<Vec<Invoice>> {
        self.scan_with_progress(dir, |_| {})
    }

    /// Like [`scan`](Self::scan), calling `on_file` after each file is parsed.
    pub fn scan_with_progress<F>(&self, dir: &Path, on_file: F) -> std::io::Result<Vec<Invoice>>
    where
        F: Fn(&Invoice) + Sync,
    {
        let files = Self::list_pdfs(dir)?;
        debug!("Found {} PDF files in {}", files.len(), dir.display());

        // collect() on an indexed parallel iterator keeps file order
        let invoices: Vec<Invoice> = files
            .par_iter()
            .map(|path| {
                let invoice = self.scan_file(path);
                on_file(&invoice);
                invoice
            })
            .collect();

        let failed = invoices.iter().filter(|i| i.status == Status::Error).count();
        info!(
            "Scanned {} invoices in {} ({} with errors)",
            invoices.len(),
            dir.display(),
            failed
        );

        Ok(invoices)
    }
}
