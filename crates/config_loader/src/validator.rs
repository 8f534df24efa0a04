//! Configuration validation
//!
//! Rules:
//! - field ranges declared on the config types (`validator` derive)
//! - a full chunk of maximum-size packets must fit in `MAX_CHUNK_BYTES`

use contracts::{DecodeConfig, ScanError, PACKET_HEADER_LEN};
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

/// Upper bound on the worst-case chunk buffer
pub const MAX_CHUNK_BYTES: u64 = 1 << 32;

/// Validate a decode configuration
///
/// Returns the first violation found, or `Ok(())`.
pub fn validate(config: &DecodeConfig) -> Result<(), ScanError> {
    if let Err(errors) = config.validate() {
        let (field, message) = first_violation(&errors, "")
            .unwrap_or_else(|| (String::from("config"), errors.to_string()));
        return Err(ScanError::config_validation(field, message));
    }
    validate_chunk_budget(config)
}

fn validate_chunk_budget(config: &DecodeConfig) -> Result<(), ScanError> {
    let transport = &config.transport;
    let packet = PACKET_HEADER_LEN as u64 + u64::from(transport.max_packet_len);
    let worst = packet.saturating_mul(transport.chunk_packets as u64);
    if worst > MAX_CHUNK_BYTES {
        return Err(ScanError::config_validation(
            "transport.chunk_packets / transport.max_packet_len",
            format!(
                "worst-case chunk of {worst} bytes exceeds {MAX_CHUNK_BYTES} bytes; lower one of them"
            ),
        ));
    }
    Ok(())
}

/// Flatten nested `validator` errors to the first `(path, message)`, in field order
fn first_violation(errors: &ValidationErrors, prefix: &str) -> Option<(String, String)> {
    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    for (field, kind) in fields {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        let found = match kind {
            ValidationErrorsKind::Field(list) => list.first().map(|e| (path, describe(e))),
            ValidationErrorsKind::Struct(inner) => first_violation(inner, &path),
            ValidationErrorsKind::List(items) => items
                .iter()
                .find_map(|(idx, inner)| first_violation(inner, &format!("{path}[{idx}]"))),
        };
        if found.is_some() {
            return found;
        }
    }
    None
}

fn describe(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }
    let mut parts: Vec<String> = error
        .params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect();
    parts.sort();
    format!("failed '{}' check ({})", error.code, parts.join(", "))
}
