//! Reading writers for the supported output formats.

use std::io::Write;

use contracts::InclinationReading;

use crate::cli::OutputFormat;
use crate::error::Result;

/// Streams readings to `out` in one format
pub struct ReadingWriter<W: Write> {
    out: W,
    format: OutputFormat,
    written: u64,
}

impl<W: Write> ReadingWriter<W> {
    /// Create a writer; CSV output gets its header line here
    pub fn new(mut out: W, format: OutputFormat) -> Result<Self> {
        if format == OutputFormat::Csv {
            writeln!(out, "Time,Roll,Pitch")?;
        }
        Ok(Self {
            out,
            format,
            written: 0,
        })
    }

    pub fn write_all(&mut self, readings: &[InclinationReading]) -> Result<()> {
        match self.format {
            OutputFormat::Csv => {
                for r in readings {
                    writeln!(self.out, "{},{:.3},{:.3}", r.time, r.roll, r.pitch)?;
                }
            }
            OutputFormat::Json => {
                for r in readings {
                    serde_json::to_writer(&mut self.out, r)?;
                    self.out.write_all(b"\n")?;
                }
            }
            OutputFormat::Raw => self.out.write_all(bytemuck::cast_slice(readings))?,
        }
        self.written += readings.len() as u64;
        Ok(())
    }

    /// Readings written so far
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn finish(mut self) -> Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}
