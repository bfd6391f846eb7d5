//! CLI application for registering PDF invoices.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{config, preview, process, scan, session, workflow};

/// Invoice desk - read PDF invoices, register them and file them by status
#[derive(Parser)]
#[command(name = "invdesk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the fields of a single invoice
    Process(process::ProcessArgs),

    /// List the invoices in a folder
    Scan(scan::ScanArgs),

    /// Type an invoice into the registration application
    Register(workflow::FileArgs),

    /// Upload an invoice and move it to the uploaded folder
    Upload(workflow::FileArgs),

    /// Move an invoice to the error or missing work order folder
    Mark(workflow::MarkArgs),

    /// Render the first page of an invoice to an image
    Preview(preview::PreviewArgs),

    /// Work through a folder interactively
    Session(session::SessionArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Process(args) => process::run(args, config_path),
        Commands::Scan(args) => scan::run(args, config_path),
        Commands::Register(args) => workflow::register(args, config_path),
        Commands::Upload(args) => workflow::upload(args, config_path),
        Commands::Mark(args) => workflow::mark(args, config_path),
        Commands::Preview(args) => preview::run(args, config_path),
        Commands::Session(args) => session::run(args, config_path),
        Commands::Config(args) => config::run(args, config_path),
    }
}
