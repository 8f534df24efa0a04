//! In-memory transport
//!
//! Same framing as the file transport over a buffer the host already holds.

use bytes::buf::Reader;
use bytes::{Buf, Bytes, BytesMut};
use contracts::{ByteTransport, Result, TransportConfig};
use tracing::debug;

use crate::framing::{read_stream_header, PacketFramer, StreamHeader};
use crate::stats::TransportStats;

const MEMORY_SOURCE: &str = "memory";

/// Transport over an in-memory scan stream
pub struct MemoryTransport {
    header: StreamHeader,
    framer: PacketFramer<Reader<Bytes>>,
}

impl MemoryTransport {
    /// Validate the header of `data` and prepare chunking
    ///
    /// # Errors
    /// `OpenFailure` if `data` does not start with a valid stream header.
    pub fn new(data: impl Into<Bytes>, config: TransportConfig) -> Result<Self> {
        let data: Bytes = data.into();
        let len = data.len() as u64;
        let mut reader = data.reader();
        let header = read_stream_header(&mut reader, MEMORY_SOURCE)?;

        debug!(bytes = len, version = header.version, "memory transport opened");

        Ok(Self {
            header,
            framer: PacketFramer::new(reader, len, config),
        })
    }

    /// Parsed stream header
    pub fn header(&self) -> StreamHeader {
        self.header
    }

    /// Cumulative counters
    pub fn stats(&self) -> TransportStats {
        self.framer.stats()
    }
}

impl ByteTransport for MemoryTransport {
    fn source(&self) -> &str {
        MEMORY_SOURCE
    }

    fn is_end_of_input(&self) -> bool {
        self.framer.is_end_of_input()
    }

    fn next_chunk(&mut self, buf: &mut BytesMut) -> Result<usize> {
        self.framer.next_chunk(buf)
    }
}
