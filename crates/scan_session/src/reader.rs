//! Reader builder and pull iterator over inclination readings

use std::collections::VecDeque;
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};

use contracts::{ByteTransport, DecodeConfig, InclinationReading, Result};
use ingestion::FileTransport;

use crate::session::{Advance, StreamingSession};

/// Builder for reading inclinations from a scan file
///
/// ```no_run
/// use scan_session::Reader;
///
/// for reading in Reader::from_path("scan.rxp").sync_to_pps(true).inclinations()? {
///     let reading = reading?;
///     println!("{:.3} {:.3}", reading.roll, reading.pitch);
/// }
/// # Ok::<(), contracts::ScanError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Reader {
    path: PathBuf,
    config: DecodeConfig,
}

impl Reader {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            config: DecodeConfig::default(),
        }
    }

    /// Discipline timestamps to the PPS signal
    pub fn sync_to_pps(mut self, sync_to_pps: bool) -> Self {
        self.config.sync_to_pps = sync_to_pps;
        self
    }

    /// Packets pulled per chunk
    pub fn chunk_packets(mut self, chunk_packets: usize) -> Self {
        self.config.transport.chunk_packets = chunk_packets;
        self
    }

    /// Replace the whole decode configuration
    pub fn config(mut self, config: DecodeConfig) -> Self {
        self.config = config;
        self
    }

    /// Open the file and return a lazy iterator over its readings
    ///
    /// # Errors
    /// `OpenFailure` if the file cannot be opened as a scan stream.
    pub fn inclinations(self) -> Result<Inclinations<FileTransport>> {
        let session = StreamingSession::open_with_config(&self.path, &self.config)?;
        Ok(Inclinations::new(session))
    }
}

/// Iterator yielding readings one by one, pulling chunks on demand
///
/// Stops after the first error.
pub struct Inclinations<T = FileTransport> {
    session: StreamingSession<T>,
    pending: VecDeque<InclinationReading>,
    done: bool,
}

impl<T: ByteTransport> Inclinations<T> {
    pub fn new(session: StreamingSession<T>) -> Self {
        Self {
            session,
            pending: VecDeque::new(),
            done: false,
        }
    }

    /// Underlying session
    pub fn session(&self) -> &StreamingSession<T> {
        &self.session
    }
}

impl<T: ByteTransport> Iterator for Inclinations<T> {
    type Item = Result<InclinationReading>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(reading) = self.pending.pop_front() {
                return Some(Ok(reading));
            }
            if self.done {
                return None;
            }

            match self.session.advance() {
                Ok(Advance::Readings(readings)) => self.pending.extend(readings.iter().copied()),
                Ok(Advance::EndOfInput) => self.done = true,
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }
    }
}

impl<T: ByteTransport> FusedIterator for Inclinations<T> {}
