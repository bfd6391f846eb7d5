//! Register, upload and mark commands for a single invoice file.

use std::path::{Path, PathBuf};

use clap::Args;
use console::style;

use invdesk_core::models::invoice::Status;

use super::common::{build_controller, load_config, DeskController};

/// A PDF in the working folder.
#[derive(Args)]
pub struct FileArgs {
    /// Invoice PDF; its folder is the working folder
    #[arg(required = true)]
    file: PathBuf,
}

/// Arguments for the mark command.
#[derive(Args)]
pub struct MarkArgs {
    /// Invoice PDF; its folder is the working folder
    #[arg(required = true)]
    file: PathBuf,

    /// Status to file the invoice under
    #[arg(long = "as", value_enum)]
    mark: Mark,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum Mark {
    /// Needs manual attention
    Error,
    /// No booking number
    Missing,
}

impl From<Mark> for Status {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::Error => Status::Error,
            Mark::Missing => Status::MissingWo,
        }
    }
}

pub fn register(args: FileArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    with_invoice(&args.file, config_path, |controller, key| controller.register(key))
}

pub fn upload(args: FileArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    with_invoice(&args.file, config_path, |controller, key| controller.upload(key))
}

pub fn mark(args: MarkArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let status = Status::from(args.mark);
    with_invoice(&args.file, config_path, |controller, key| {
        controller.relocate(key, status)
    })
}

fn with_invoice<F>(file: &Path, config_path: Option<&str>, action: F) -> anyhow::Result<()>
where
    F: FnOnce(&mut DeskController, &str) -> Result<(), invdesk_core::WorkflowError>,
{
    if !file.is_file() {
        anyhow::bail!("Input file not found: {}", file.display());
    }

    let config = load_config(config_path)?;
    let mut controller = build_controller(&config)?;
    let invoice = controller.open_file(file)?;
    let key = invoice.file_name();

    action(&mut controller, &key)?;

    let updated = controller
        .invoices()
        .get(&key)
        .ok_or_else(|| anyhow::anyhow!("Invoice {} disappeared", key))?;
    println!(
        "{} {} is now {} ({})",
        style("✓").green(),
        key,
        style(updated.status).bold(),
        updated.link.display()
    );

    Ok(())
}
