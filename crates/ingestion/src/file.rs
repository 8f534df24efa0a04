//! File-backed transport

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use bytes::BytesMut;
use contracts::{ByteTransport, Result, ScanError, TransportConfig};
use tracing::{debug, instrument};

use crate::framing::{read_stream_header, PacketFramer, StreamHeader};
use crate::stats::TransportStats;

const READ_BUFFER_BYTES: usize = 64 * 1024;

/// Transport reading a scan stream from a file
///
/// The file length is taken at open time; end of input is reached once that
/// many bytes have been framed.
pub struct FileTransport {
    source: String,
    header: StreamHeader,
    framer: PacketFramer<BufReader<File>>,
}

impl FileTransport {
    /// Open `path` and validate its stream header
    ///
    /// # Errors
    /// `OpenFailure` for a missing or unreadable path, a directory, or a
    /// malformed header.
    #[instrument(
        name = "file_transport_open",
        skip(path, config),
        fields(path = %path.as_ref().display())
    )]
    pub fn open(path: impl AsRef<Path>, config: TransportConfig) -> Result<Self> {
        let path = path.as_ref();
        let source = path.display().to_string();

        let file = File::open(path).map_err(|e| ScanError::open_io(&source, e))?;
        let metadata = file.metadata().map_err(|e| ScanError::open_io(&source, e))?;
        if !metadata.is_file() {
            return Err(ScanError::open(&source, "not a regular file"));
        }

        let mut reader = BufReader::with_capacity(READ_BUFFER_BYTES, file);
        let header = read_stream_header(&mut reader, &source)?;

        debug!(
            source = %source,
            bytes = metadata.len(),
            version = header.version,
            chunk_packets = config.chunk_packets,
            "file transport opened"
        );

        Ok(Self {
            framer: PacketFramer::new(reader, metadata.len(), config),
            source,
            header,
        })
    }

    /// Parsed stream header
    pub fn header(&self) -> StreamHeader {
        self.header
    }

    /// Byte offset of the next unread packet
    pub fn offset(&self) -> u64 {
        self.framer.offset()
    }

    /// Cumulative counters
    pub fn stats(&self) -> TransportStats {
        self.framer.stats()
    }
}

impl ByteTransport for FileTransport {
    fn source(&self) -> &str {
        &self.source
    }

    fn is_end_of_input(&self) -> bool {
        self.framer.is_end_of_input()
    }

    fn next_chunk(&mut self, buf: &mut BytesMut) -> Result<usize> {
        self.framer.next_chunk(buf)
    }
}

impl Drop for FileTransport {
    fn drop(&mut self) {
        debug!(source = %self.source, offset = self.framer.offset(), "file transport closed");
    }
}
