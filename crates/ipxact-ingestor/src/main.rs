use anyhow::{Context, Result};
use clap::Parser;
use ipxact_ingestor::{parse_file, save_component};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Convert IP-XACT components to a resolved RegMap IR dump"
)]
struct Args {
    /// Input IP-XACT component file
    #[arg(short, long)]
    input: PathBuf,

    /// Output file (YAML, or JSON when the extension is .json)
    #[arg(short, long)]
    output: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let component = parse_file(&args.input)
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).context("Failed to create output directory")?;
    }
    save_component(&component, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    tracing::info!("Wrote {}", args.output.display());
    Ok(())
}
