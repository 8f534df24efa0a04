//! Decode configuration assembled from flags and an optional config file.

use config_loader::ConfigLoader;
use contracts::DecodeConfig;
use tracing::debug;

use crate::cli::DecodeArgs;
use crate::error::{CliError, Result};

/// Configuration file first, then command-line overrides
pub fn resolve_config(args: &DecodeArgs) -> Result<DecodeConfig> {
    let mut config = match &args.config {
        Some(path) => {
            ConfigLoader::load_from_path(path).map_err(|e| CliError::config(path, e))?
        }
        None => DecodeConfig::default(),
    };

    if args.sync_to_pps {
        config.sync_to_pps = true;
    }
    if let Some(chunk_packets) = args.chunk_packets {
        config.transport.chunk_packets = chunk_packets;
    }

    ConfigLoader::validate(&config).map_err(|e| CliError::config("<command line>", e))?;
    debug!(?config, "decode configuration resolved");
    Ok(config)
}
