//! Batch extraction
//!
//! Decode a whole stream in one call and hand back every reading it holds.

use std::path::Path;

use contracts::{ByteTransport, DecodeConfig, InclinationReading, Result};
use ingestion::FileTransport;
use tracing::{info, instrument};

use crate::session::StreamingSession;

/// Decode the file at `path` to its end and return all readings in stream order
///
/// # Errors
/// `OpenFailure` if the file cannot be opened, `DecodeFailure` for a
/// malformed packet. Readings gathered before a failure are discarded.
pub fn inclinations_from_path(
    path: impl AsRef<Path>,
    sync_to_pps: bool,
) -> Result<Vec<InclinationReading>> {
    inclinations_from_path_with_config(
        path,
        &DecodeConfig {
            sync_to_pps,
            ..Default::default()
        },
    )
}

/// Same as [`inclinations_from_path`] with explicit chunking
#[instrument(
    name = "batch_extract",
    skip(path, config),
    fields(path = %path.as_ref().display(), sync_to_pps = config.sync_to_pps)
)]
pub fn inclinations_from_path_with_config(
    path: impl AsRef<Path>,
    config: &DecodeConfig,
) -> Result<Vec<InclinationReading>> {
    let transport = FileTransport::open(path, config.transport)?;
    inclinations_from_transport(transport, config.sync_to_pps)
}

/// Decode everything `transport` yields
pub fn inclinations_from_transport<T: ByteTransport>(
    transport: T,
    sync_to_pps: bool,
) -> Result<Vec<InclinationReading>> {
    let mut session = StreamingSession::from_transport(transport, sync_to_pps);
    session.accumulate_to_end()?;

    let readings = session.take_readings();
    let totals = session.stats();
    info!(
        source = %session.transport().source(),
        readings = readings.len(),
        packets = totals.packets,
        chunks = session.cycles(),
        "batch extraction complete"
    );
    session.close();
    Ok(readings)
}
