//! Command-line entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use cellscan::{Config, scan};
use clap::Parser;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(
    name = "cellscan",
    version,
    about = "Collect cell values and image-presence checks from xlsx, xls and csv files"
)]
struct Cli {
    /// Configuration file
    #[arg(short = 'i', long = "ini", visible_alias = "config", default_value = "config.toml")]
    config: PathBuf,

    /// Write the table here instead of next to the configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to set tracing subscriber: {e}");
    }

    match run(&cli) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(2)
        },
    }
}

/// Returns the number of files that failed.
fn run(cli: &Cli) -> Result<usize> {
    if !cli.config.is_file() {
        anyhow::bail!("configuration file not found: {}", cli.config.display());
    }
    let config = Config::load(&cli.config)
        .with_context(|| format!("invalid configuration in {}", cli.config.display()))?;

    let report = scan(&config).context("scan aborted")?;

    let output = cli.output.as_ref().unwrap_or(&config.output_path);
    std::fs::write(output, &report.table)
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!(path = %output.display(), "results written");

    let failed = report.failed();
    info!(
        processed = report.processed() - failed,
        failed, "scan finished"
    );
    Ok(failed)
}
