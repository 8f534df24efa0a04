//! Layered error definitions
//!
//! Categorized by source: open / decode / session / config / unknown

use thiserror::Error;

/// Failure taxonomy reported across every boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The transport could not be created or opened
    Open,
    /// A malformed packet was encountered mid-stream
    Decode,
    /// The session was driven past its terminal state
    Exhausted,
    /// Configuration could not be parsed or validated
    Config,
    /// Anything not recognized as one of the above
    Unknown,
}

/// Unified error type
#[derive(Debug, Error)]
pub enum ScanError {
    // ===== Open Errors =====
    /// Path missing, unreadable, or not a scan stream
    #[error("failed to open '{source_name}': {message}")]
    OpenFailure {
        source_name: String,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    // ===== Decode Errors =====
    /// Malformed packet encountered mid-stream
    #[error("decode error at byte {offset}: {message}")]
    DecodeFailure { offset: u64, message: String },

    // ===== Session Errors =====
    /// `advance` called after end of input was already reported
    #[error("session exhausted: end of input was already reported")]
    Exhausted,

    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== General Errors =====
    /// IO error after the stream was opened
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Abnormal termination that is not otherwise classified
    #[error("unknown failure: {0}")]
    UnknownFailure(String),
}

impl ScanError {
    /// Create open error without an underlying io cause
    pub fn open(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::OpenFailure {
            source_name: source_name.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create open error wrapping an io failure
    pub fn open_io(source_name: impl Into<String>, err: std::io::Error) -> Self {
        Self::OpenFailure {
            source_name: source_name.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create decode error
    pub fn decode(offset: u64, message: impl Into<String>) -> Self {
        Self::DecodeFailure {
            offset,
            message: message.into(),
        }
    }

    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create unknown failure
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::UnknownFailure(message.into())
    }

    /// Map onto the failure taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::OpenFailure { .. } => ErrorKind::Open,
            Self::DecodeFailure { .. } => ErrorKind::Decode,
            // A read error after open surfaces as a malformed stream
            Self::Io(_) => ErrorKind::Decode,
            Self::Exhausted => ErrorKind::Exhausted,
            Self::ConfigParse { .. } | Self::ConfigValidation { .. } => ErrorKind::Config,
            Self::UnknownFailure(_) => ErrorKind::Unknown,
        }
    }
}

/// Result alias
pub type Result<T> = std::result::Result<T, ScanError>;
