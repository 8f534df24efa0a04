//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// rxp-incl - Inclination time series from scan streams
#[derive(Parser, Debug)]
#[command(
    name = "rxp-incl",
    author,
    version,
    about = "Extract roll/pitch inclination readings from scan streams",
    long_about = "Decodes a binary scan stream chunk by chunk and extracts the \n\
                  inclinometer readings it carries, stamped with the decode clock."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "RXP_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "RXP_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    /// Serve Prometheus metrics on this port while running
    #[arg(long, global = true, env = "RXP_METRICS_PORT")]
    pub metrics_port: Option<u16>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print every inclination reading of a scan stream
    Inclinations(InclinationsArgs),

    /// Summarise a scan stream: packet counts, chunks, reading statistics
    Info(InfoArgs),

    /// Validate a decode configuration file
    Validate(ValidateArgs),
}

/// Decode options shared by the stream commands
#[derive(Parser, Debug, Clone)]
pub struct DecodeArgs {
    /// Scan stream to read
    pub path: PathBuf,

    /// Discipline timestamps to the PPS signal
    #[arg(long, env = "RXP_SYNC_TO_PPS")]
    pub sync_to_pps: bool,

    /// Decode configuration file (TOML or JSON)
    #[arg(short, long, env = "RXP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override packets per chunk from configuration
    #[arg(long, env = "RXP_CHUNK_PACKETS")]
    pub chunk_packets: Option<usize>,
}

/// Arguments for the `inclinations` command
#[derive(Parser, Debug, Clone)]
pub struct InclinationsArgs {
    #[command(flatten)]
    pub decode: DecodeArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    pub format: OutputFormat,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `info` command
#[derive(Parser, Debug, Clone)]
pub struct InfoArgs {
    #[command(flatten)]
    pub decode: DecodeArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(default_value = "decode.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Reading output format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// `Time,Roll,Pitch` with angles to three decimals
    #[default]
    Csv,
    /// One JSON object per line
    Json,
    /// Packed `f64` triples in native byte order
    Raw,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
