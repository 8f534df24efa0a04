//! # rxp-incl
//!
//! Command-line entry point.
//!
//! Provides:
//! - Inclination extraction to CSV, JSON lines or raw records
//! - Stream summaries
//! - Decode configuration validation

mod cli;
mod commands;
mod error;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use observability::ObservabilityConfig;
use tracing::{error, info};

use cli::{Cli, Commands};
use commands::{run_inclinations, run_info, run_validate};

fn main() -> ExitCode {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli) {
        eprintln!("{e:#}");
        return ExitCode::FAILURE;
    }

    info!(version = env!("CARGO_PKG_VERSION"), "rxp-incl starting");

    let result = match &cli.command {
        Commands::Inclinations(args) => run_inclinations(args),
        Commands::Info(args) => run_info(args),
        Commands::Validate(args) => run_validate(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

/// Initialize logging based on CLI options
fn init_logging(cli: &Cli) -> Result<()> {
    let (level, force_level) = if cli.quiet {
        ("error", true)
    } else {
        match cli.verbose {
            0 => ("warn", false),
            1 => ("debug", true),
            _ => ("trace", true),
        }
    };

    observability::init_with_config(ObservabilityConfig {
        log_format: cli.log_format.into(),
        metrics_port: cli.metrics_port,
        default_log_level: level.to_string(),
        force_level,
    })
}
