//! `inclinations` command implementation.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use contracts::DecodeConfig;
use scan_session::{Advance, StreamingSession};
use tracing::info;

use super::decode::resolve_config;
use super::output::ReadingWriter;
use crate::cli::{InclinationsArgs, OutputFormat};
use crate::error::{CliError, Result};

/// Execute the `inclinations` command
pub fn run_inclinations(args: &InclinationsArgs) -> Result<()> {
    let config = resolve_config(&args.decode)?;
    let path = &args.decode.path;

    let out: Box<dyn Write> = match &args.output {
        Some(output) => Box::new(BufWriter::new(File::create(output)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    write_inclinations(path, &config, args.format, out)?;
    Ok(())
}

/// Stream the readings of `path` to `out`, one decode cycle at a time
pub fn write_inclinations<W: Write>(
    path: &Path,
    config: &DecodeConfig,
    format: OutputFormat,
    out: W,
) -> Result<u64> {
    info!(path = %path.display(), ?format, sync_to_pps = config.sync_to_pps, "Extracting inclinations");
    let started = Instant::now();

    let mut session =
        StreamingSession::open_with_config(path, config).map_err(|e| CliError::scan(path, e))?;
    let mut writer = ReadingWriter::new(out, format)?;

    loop {
        match session.advance().map_err(|e| CliError::scan(path, e))? {
            Advance::Readings(readings) => {
                observability::record_readings(readings);
                writer.write_all(readings)?;
            }
            Advance::EndOfInput => break,
        }
    }

    let written = writer.written();
    writer.finish()?;

    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    let stats = session.stats();
    observability::record_extraction(&path.display().to_string(), written as usize, elapsed_ms);
    info!(
        readings = written,
        packets = stats.packets,
        chunks = session.cycles(),
        elapsed_ms,
        "Extraction complete"
    );
    session.close();
    Ok(written)
}
