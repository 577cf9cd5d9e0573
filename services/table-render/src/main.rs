//! Table render CLI.
//!
//! Reads a JSON job, renders the table (with optional banner) to a PNG file
//! and prints the file path on stdout.

mod config;
mod job;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use table_renderer::TableImageGenerator;

use crate::config::{load_config, LogFormat, LoggingConfig, ServiceConfig};

#[derive(Parser, Debug)]
#[command(name = "table-render")]
#[command(about = "Render report tables to PNG images")]
struct Args {
    /// JSON job file describing the records and table options
    #[arg(short, long)]
    job: PathBuf,

    /// YAML configuration file
    #[arg(short, long, env = "TABLE_RENDER_CONFIG")]
    config: Option<PathBuf>,

    /// Output directory, overriding the job and the config
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output resolution
    #[arg(long)]
    dpi: Option<f64>,

    /// Log level
    #[arg(long)]
    log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::from_env(),
    };
    if let Some(dpi) = args.dpi {
        config.render.dpi = dpi;
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    if let Some(format) = args.log_format {
        config.logging.format = format;
    }
    config.validate()?;

    init_tracing(&config.logging)?;

    info!(
        job = %args.job.display(),
        config = ?args.config,
        dpi = config.render.dpi,
        "Starting table render"
    );

    let request = job::load_job(
        &args.job,
        args.output_dir.as_deref(),
        config.render.output_dir.as_deref(),
    )?;

    let generator = TableImageGenerator::new(config.generator_config())
        .context("Failed to set up table generator")?;

    let path = generator
        .render(&request)
        .inspect_err(|e| tracing::error!(kind = e.kind(), error = %e, "Render failed"))
        .with_context(|| format!("Failed to render job {:?}", args.job))?;

    println!("{}", path.display());
    Ok(())
}

/// Install the global subscriber. Logs go to stderr so stdout only carries
/// the output path.
fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    // RUST_LOG, when set, takes precedence over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.to_lowercase()));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    let installed = match logging.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))?;

    Ok(())
}
