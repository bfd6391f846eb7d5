//! Preview command - render a page of an invoice to a PNG.

use std::path::PathBuf;

use clap::Args;
use console::style;
use image::ImageFormat;
use tracing::info;

use invdesk_core::preview::{renderer_for, scale_to_width};

use super::common::load_config;

/// Arguments for the preview command.
#[derive(Args)]
pub struct PreviewArgs {
    /// Invoice PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Output PNG (default: <input stem>.png next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Target width in pixels (default from config)
    #[arg(short, long)]
    width: Option<u32>,

    /// Zero-based page index
    #[arg(short, long, default_value = "0")]
    page: u32,

    /// Renderer: embedded or pdfium (default from config)
    #[arg(long)]
    renderer: Option<String>,
}

pub fn run(args: PreviewArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let backend = args.renderer.as_deref().unwrap_or(&config.preview.renderer);
    let renderer = renderer_for(backend)?;
    let width = args.width.unwrap_or(config.preview.width);

    let page = renderer.render_page(&args.input, args.page)?;
    let scaled = scale_to_width(&page, width);
    info!(
        "Rendered page {} ({}x{}) at {}x{}",
        args.page,
        page.width(),
        page.height(),
        scaled.width(),
        scaled.height()
    );

    let output = args
        .output
        .unwrap_or_else(|| args.input.with_extension("png"));
    scaled.save_with_format(&output, ImageFormat::Png)?;

    println!(
        "{} Preview written to {} ({}x{})",
        style("✓").green(),
        output.display(),
        scaled.width(),
        scaled.height()
    );

    Ok(())
}
