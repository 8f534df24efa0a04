//! Error types for CLI operations.

use std::path::PathBuf;

use contracts::{ErrorKind, ScanError};
use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Decoding a scan stream failed
    #[error("{path}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: ScanError,
    },

    /// Loading or validating a decode configuration failed
    #[error("configuration {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: ScanError,
    },

    /// Writing output failed
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),

    /// Output serialization failed
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl CliError {
    pub fn scan(path: impl Into<PathBuf>, source: ScanError) -> Self {
        Self::Scan {
            path: path.into(),
            source,
        }
    }

    pub fn config(path: impl Into<PathBuf>, source: ScanError) -> Self {
        Self::Config {
            path: path.into(),
            source,
        }
    }

    /// Process exit code for this failure
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Scan { source, .. } => match source.kind() {
                ErrorKind::Open => 2,
                ErrorKind::Decode => 3,
                _ => 1,
            },
            Self::Config { .. } => 4,
            Self::Output(_) | Self::Serialize(_) => 1,
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
