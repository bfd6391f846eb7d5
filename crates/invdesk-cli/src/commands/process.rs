//! Process command - extract the fields of a single invoice file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::info;

use invdesk_core::invoice::{InvoiceParser, RuleInvoiceParser};
use invdesk_core::models::invoice::Invoice;
use invdesk_core::pdf::{PdfExtractor, TextExtractor};

use super::common::{format_date, load_config};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Print the extracted first-page text instead of the fields
    #[arg(long)]
    raw: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());
    let extractor = PdfExtractor::new();

    let output = if args.raw {
        extractor.first_page_text(&args.input)?
    } else {
        let parser = RuleInvoiceParser::from_config(&config.parser);
        let invoice = match extractor.first_page_text(&args.input) {
            Ok(text) => parser.parse_or_flag(&args.input, &text),
            Err(e) => {
                eprintln!("{} {}", style("⚠").yellow(), e);
                Invoice::unrecognized(&args.input)
            }
        };
        format_invoice(&invoice, args.format)?
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {} in {:?}",
            style("✓").green(),
            output_path.display(),
            start.elapsed()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}

pub fn format_invoice(invoice: &Invoice, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(invoice)?),
        OutputFormat::Csv => format_invoices_csv(std::slice::from_ref(invoice)),
        OutputFormat::Text => Ok(format_invoice_text(invoice)),
    }
}

/// Invoices as CSV with a header row.
pub fn format_invoices_csv(invoices: &[Invoice]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "file",
        "type",
        "status",
        "number",
        "date",
        "amount",
        "work_order",
        "link",
    ])?;

    for invoice in invoices {
        wtr.write_record([
            invoice.file_name(),
            invoice.invoice_type.clone(),
            invoice.status.to_string(),
            invoice.number.to_string(),
            format_date(invoice.timestamp),
            invoice.amount.to_string(),
            invoice.work_order.clone().unwrap_or_default(),
            invoice.link.display().to_string(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_invoice_text(invoice: &Invoice) -> String {
    let mut output = String::new();

    output.push_str(&format!("File:       {}\n", invoice.link.display()));
    output.push_str(&format!("Type:       {}\n", invoice.invoice_type));
    output.push_str(&format!("Status:     {}\n", invoice.status));
    output.push_str(&format!("Number:     {}\n", invoice.number));
    output.push_str(&format!("Date:       {}\n", format_date(invoice.timestamp)));
    output.push_str(&format!("Amount:     EUR {}\n", invoice.amount_display()));
    if let Some(work_order) = &invoice.work_order {
        output.push_str(&format!("Work order: {}\n", work_order));
    }

    output
}
