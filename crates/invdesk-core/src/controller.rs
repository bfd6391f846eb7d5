//! Application controller: working folder, status workflow and file moves.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::automation::Automator;
use crate::error::{FilesystemError, WorkflowError};
use crate::invoice::{InvoiceParser, RuleInvoiceParser};
use crate::models::config::{FolderConfig, InvdeskConfig};
use crate::models::invoice::{file_name_of, Invoice, Status};
use crate::pdf::{PdfExtractor, TextExtractor};
use crate::scan::FolderScanner;
use crate::view::ListModel;

/// Result type for workflow operations.
pub type Result<T> = std::result::Result<T, WorkflowError>;

/// The working folder and the invoices loaded from it.
#[derive(Debug, Clone)]
pub struct AppState {
    source: Option<PathBuf>,
    invoices: ListModel<Invoice>,
}

impl AppState {
    pub fn new(search_columns: usize) -> Self {
        Self {
            source: None,
            invoices: ListModel::new(search_columns),
        }
    }

    /// The working folder, once one is opened.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn invoices(&self) -> &ListModel<Invoice> {
        &self.invoices
    }

    pub fn invoices_mut(&mut self) -> &mut ListModel<Invoice> {
        &mut self.invoices
    }
}

/// Drives the invoice workflow for one working folder.
pub struct Controller<A, E = PdfExtractor, P = RuleInvoiceParser> {
    state: AppState,
    folders: FolderConfig,
    scanner: FolderScanner<E, P>,
    automator: A,
}

impl<A: Automator> Controller<A> {
    /// Controller reading PDFs with the configured sender table.
    pub fn new(config: &InvdeskConfig, automator: A) -> Self {
        let parser = RuleInvoiceParser::from_config(&config.parser);
        let scanner = FolderScanner::with_parts(PdfExtractor::new(), parser);
        Self::with_scanner(config, scanner, automator)
    }
}

impl<A, E, P> Controller<A, E, P>
where
    A: Automator,
    E: TextExtractor,
    P: InvoiceParser + Sync,
{
    pub fn with_scanner(config: &InvdeskConfig, scanner: FolderScanner<E, P>, automator: A) -> Self {
        Self {
            state: AppState::new(config.list.search_columns),
            folders: config.folders.clone(),
            scanner,
            automator,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn invoices(&self) -> &ListModel<Invoice> {
        &self.state.invoices
    }

    pub fn invoices_mut(&mut self) -> &mut ListModel<Invoice> {
        &mut self.state.invoices
    }

    pub fn automator(&self) -> &A {
        &self.automator
    }

    /// Make `dir` the working folder and load its invoices.
    ///
    /// The status subfolders are created if missing. Returns the number of
    /// invoices loaded.
    pub fn open_folder(&mut self, dir: &Path) -> Result<usize> {
        self.prepare(dir)?;
        self.refresh()
    }

    /// Work on a single PDF; its folder becomes the working folder.
    pub fn open_file(&mut self, path: &Path) -> Result<Invoice> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        self.prepare(dir)?;

        let invoice = self.scanner.scan_file(path);
        self.state.invoices.set_content(vec![invoice.clone()]);
        Ok(invoice)
    }

    fn prepare(&mut self, dir: &Path) -> Result<()> {
        for name in self.folders.all() {
            let path = dir.join(name);
            fs::create_dir_all(&path)
                .map_err(|source| FilesystemError::CreateDir { path, source })?;
        }
        debug!("Prepared status folders in {}", dir.display());
        self.state.source = Some(dir.to_path_buf());
        Ok(())
    }

    /// Re-read the working folder, replacing the loaded invoices.
    pub fn refresh(&mut self) -> Result<usize> {
        let source = self.state.source.as_deref().ok_or(WorkflowError::NoFolder)?;
        let invoices = self.scanner.scan(source)?;
        let count = invoices.len();
        self.state.invoices.set_content(invoices);
        Ok(count)
    }

    /// Type the invoice into the external application.
    ///
    /// The invoice is `working` while keys are sent and `done` afterwards.
    /// If automation fails, the previous status is restored.
    pub fn register(&mut self, key: &str) -> Result<()> {
        let mut invoice = self.lookup(key)?.clone();
        let previous = invoice.status;
        check_transition(previous, Status::Working)?;
        if invoice.work_order.is_none() {
            return Err(WorkflowError::MissingWorkOrder(key.to_string()));
        }

        invoice.status = Status::Working;
        self.state.invoices.upsert(invoice.clone());

        match self.automator.enter(&invoice) {
            Ok(()) => {
                invoice.status = Status::Done;
                info!("Registered {}", key);
                self.state.invoices.upsert(invoice);
                Ok(())
            }
            Err(e) => {
                error!("Registering {} failed: {}", key, e);
                invoice.status = previous;
                self.state.invoices.upsert(invoice);
                Err(e.into())
            }
        }
    }

    /// Move the invoice to the error folder.
    pub fn mark_error(&mut self, key: &str) -> Result<()> {
        self.relocate(key, Status::Error)
    }

    /// Move the invoice to the missing work order folder.
    pub fn mark_missing(&mut self, key: &str) -> Result<()> {
        self.relocate(key, Status::MissingWo)
    }

    /// Upload the invoice, then move it to the uploaded folder.
    ///
    /// No keys are sent unless the uploaded folder can take the file.
    pub fn upload(&mut self, key: &str) -> Result<()> {
        let invoice = self.lookup(key)?.clone();
        check_transition(invoice.status, Status::Uploaded)?;

        let destination = self.destination_for(&invoice, Status::Uploaded)?;
        if destination != invoice.link {
            if let Some(folder) = destination.parent().filter(|folder| !folder.is_dir()) {
                return Err(FilesystemError::MissingFolder(folder.to_path_buf()).into());
            }
            if destination.exists() {
                return Err(FilesystemError::DestinationExists(destination).into());
            }
        }

        self.automator.upload(&invoice).map_err(|e| {
            error!("Uploading {} failed: {}", key, e);
            WorkflowError::from(e)
        })?;
        self.relocate(key, Status::Uploaded)
    }

    /// Move the invoice file into the folder for `status` and set the status.
    ///
    /// Nothing changes unless the move succeeds.
    pub fn relocate(&mut self, key: &str, status: Status) -> Result<()> {
        let mut invoice = self.lookup(key)?.clone();
        check_transition(invoice.status, status)?;

        let destination = self.destination_for(&invoice, status)?;
        move_file(&invoice.link, &destination)?;
        info!("{} -> {} ({})", key, destination.display(), status);

        invoice.link = destination;
        invoice.status = status;
        self.state.invoices.upsert(invoice);
        Ok(())
    }

    /// Where the file of `invoice` lives once it has `status`.
    fn destination_for(&self, invoice: &Invoice, status: Status) -> Result<PathBuf> {
        let source = self.state.source.as_deref().ok_or(WorkflowError::NoFolder)?;
        let folder = self
            .folders
            .folder_for(status)
            .ok_or(WorkflowError::InvalidTransition {
                from: invoice.status,
                to: status,
            })?;
        Ok(source.join(folder).join(file_name_of(&invoice.link)))
    }

    fn lookup(&self, key: &str) -> Result<&Invoice> {
        self.state
            .invoices
            .get(key)
            .ok_or_else(|| WorkflowError::UnknownInvoice(key.to_string()))
    }
}

fn check_transition(from: Status, to: Status) -> Result<()> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(WorkflowError::InvalidTransition { from, to })
    }
}

/// Rename `from` to `to`, refusing to overwrite. Moving onto itself is a no-op.
pub fn move_file(from: &Path, to: &Path) -> std::result::Result<(), FilesystemError> {
    if from == to {
        return Ok(());
    }
    if to.exists() {
        return Err(FilesystemError::DestinationExists(to.to_path_buf()));
    }
    fs::rename(from, to).map_err(|source| FilesystemError::Move {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })
}
