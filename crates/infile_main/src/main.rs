//! InFile - a file system inside a single zip archive
//!
//! Command-line entry point. Each invocation opens the archive, runs one
//! subcommand and closes the archive again.

mod commands;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use commands::Command;
use config::AppConfig;
use infile_fs::VirtualFileSystem;
use std::path::PathBuf;

/// Store and manage files inside a single zip archive
#[derive(Parser, Debug)]
#[command(name = "infile", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to the per-user config location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Archive to operate on; created when missing
    archive: PathBuf,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config_path, config) = load_config(&cli)?;

    let mut log_options = config.logging.clone();
    if cli.verbose {
        log_options.level = "debug".to_string();
    }
    let _guard = infile_log::init_logging(&log_options)?;
    tracing::debug!(
        "Configuration {:?} (file present: {})",
        config_path,
        config_path.exists()
    );

    if log_options.file && log_options.retention_days > 0 {
        let log_dir = log_options.resolved_directory();
        if let Err(e) = infile_log::cleanup_old_logs(&log_dir, log_options.retention_days) {
            tracing::warn!("Failed to cleanup old logs: {}", e);
        }
    }

    let fs = VirtualFileSystem::with_options(&cli.archive, config.container.clone())
        .with_context(|| format!("Failed to open archive {:?}", cli.archive))?;

    let result = commands::execute(&fs, &cli.command, &mut std::io::stdout().lock());
    fs.close().context("Failed to close archive")?;
    result
}

/// Configuration path and its content, `--config` taking precedence
fn load_config(cli: &Cli) -> Result<(PathBuf, AppConfig)> {
    let config_path = cli.config.clone().unwrap_or_else(AppConfig::config_path);
    let config = AppConfig::load_from(&config_path)
        .with_context(|| format!("Failed to load configuration {:?}", config_path))?;
    Ok((config_path, config))
}
