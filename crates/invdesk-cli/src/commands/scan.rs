//! Scan command - list the invoices in a folder.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use invdesk_core::invoice::RuleInvoiceParser;
use invdesk_core::models::invoice::{Invoice, Status};
use invdesk_core::pdf::PdfExtractor;
use invdesk_core::view::ListModel;
use invdesk_core::FolderScanner;

use super::common::{column_index, load_config, render_table};
use super::process::format_invoices_csv;

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Folder with PDF invoices
    #[arg(required = true)]
    folder: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: ListFormat,

    /// Only show invoices whose leading columns contain this text
    #[arg(short, long)]
    search: Option<String>,

    /// Sort by column (heading name or index)
    #[arg(long)]
    sort: Option<String>,

    /// Sort descending instead of ascending
    #[arg(long, requires = "sort")]
    descending: bool,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ListFormat {
    /// Aligned table
    Table,
    /// JSON array
    Json,
    /// CSV with header
    Csv,
}

pub fn run(args: ScanArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.folder.is_dir() {
        anyhow::bail!("Folder not found: {}", args.folder.display());
    }

    let scanner = FolderScanner::with_parts(
        PdfExtractor::new(),
        RuleInvoiceParser::from_config(&config.parser),
    );

    let total = FolderScanner::<PdfExtractor, RuleInvoiceParser>::list_pdfs(&args.folder)?.len();
    let pb = if args.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(total as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let invoices = scanner.scan_with_progress(&args.folder, |_| pb.inc(1))?;
    pb.finish_and_clear();

    let mut list = ListModel::new(config.list.search_columns);
    list.set_content(invoices);

    if let Some(column) = &args.sort {
        let index = column_index(column)?;
        list.sort_by_column(index);
        if args.descending {
            list.sort_by_column(index);
        }
    }
    if let Some(query) = &args.search {
        list.search(query);
    }

    let visible: Vec<Invoice> = list
        .visible()
        .into_iter()
        .map(|(_, _, row)| row.item().clone())
        .collect();

    match args.format {
        ListFormat::Table => {
            print!("{}", render_table(&list));
            print_summary(&visible, list.len(), start);
        }
        ListFormat::Json => println!("{}", serde_json::to_string_pretty(&visible)?),
        ListFormat::Csv => print!("{}", format_invoices_csv(&visible)?),
    }

    Ok(())
}

fn print_summary(visible: &[Invoice], total: usize, start: Instant) {
    let count = |status: Status| visible.iter().filter(|i| i.status == status).count();

    println!();
    println!(
        "{} {} of {} invoices in {:?}",
        style("✓").green(),
        visible.len(),
        total,
        start.elapsed()
    );
    println!(
        "   {} ready, {} missing work order, {} errors",
        style(count(Status::Success)).green(),
        style(count(Status::MissingWo)).yellow(),
        style(count(Status::Error)).red()
    );
}
