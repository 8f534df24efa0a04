//! `validate` command implementation.

use config_loader::ConfigLoader;
use contracts::{DecodeConfig, PACKET_HEADER_LEN};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;
use crate::error::{CliError, Result};

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<DecodeConfig>,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let config_path = args.config.display().to_string();
    let loaded = ConfigLoader::load_from_path(&args.config);

    let result = match &loaded {
        Ok(config) => ValidationResult {
            valid: true,
            config_path,
            error: None,
            warnings: collect_warnings(config),
            config: Some(config.clone()),
        },
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: Vec::new(),
            config: None,
        },
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_validation_result(&result);
    }

    loaded
        .map(|_| ())
        .map_err(|e| CliError::config(&args.config, e))
}

/// Non-fatal issues
fn collect_warnings(config: &DecodeConfig) -> Vec<String> {
    let mut warnings = Vec::new();
    let transport = &config.transport;

    if transport.chunk_packets == 1 {
        warnings.push("chunk_packets = 1 decodes one packet per cycle".to_string());
    }

    let worst = (PACKET_HEADER_LEN as u64 + u64::from(transport.max_packet_len))
        * transport.chunk_packets as u64;
    if worst > 2 * 1024 * 1024 * 1024 {
        warnings.push(format!(
            "a full chunk of maximum-size packets needs {} MiB",
            worst / (1024 * 1024)
        ));
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(config) = &result.config {
            println!("\n  Sync to PPS: {}", config.sync_to_pps);
            println!("  Packets per chunk: {}", config.transport.chunk_packets);
            println!("  Max packet length: {}", config.transport.max_packet_len);
        }

        if !result.warnings.is_empty() {
            println!("\n⚠ Warnings:");
            for warning in &result.warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(error) = &result.error {
            println!("\n  Error: {}", error);
        }
    }
}
