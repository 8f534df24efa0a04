//! # Config Loader
//!
//! Decode configuration loading.
//!
//! Responsibilities:
//! - Parse TOML/JSON configuration files
//! - Validate configuration legality
//! - Produce a `DecodeConfig`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::load_from_path(Path::new("decode.toml")).unwrap();
//! println!("chunk packets: {}", config.transport.chunk_packets);
//! ```

mod parser;
mod validator;

pub use contracts::DecodeConfig;
pub use parser::ConfigFormat;
pub use validator::MAX_CHUNK_BYTES;

use contracts::ScanError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<DecodeConfig, ScanError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<DecodeConfig, ScanError> {
        let config = parser::parse(content, format)?;
        validator::validate(&config)?;
        Ok(config)
    }

    /// Validate a configuration built in code
    pub fn validate(config: &DecodeConfig) -> Result<(), ScanError> {
        validator::validate(config)
    }

    /// Serialize to TOML string
    pub fn to_toml(config: &DecodeConfig) -> Result<String, ScanError> {
        toml::to_string_pretty(config)
            .map_err(|e| ScanError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize to JSON string
    pub fn to_json(config: &DecodeConfig) -> Result<String, ScanError> {
        serde_json::to_string_pretty(config)
            .map_err(|e| ScanError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ScanError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ScanError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext)
            .ok_or_else(|| ScanError::config_parse(format!("unsupported config format: .{ext}")))
    }

    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, ScanError> {
        std::fs::read_to_string(path).map_err(|e| ScanError::ConfigParse {
            message: format!("cannot read '{}': {e}", path.display()),
            source: Some(Box::new(e)),
        })
    }
}
