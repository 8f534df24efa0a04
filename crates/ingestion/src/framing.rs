//! Stream header validation and packet-aligned chunking

use std::io::{self, Read};

use bytes::{Buf, BytesMut};
use contracts::{
    Result, ScanError, TransportConfig, PACKET_HEADER_LEN, STREAM_HEADER_LEN, STREAM_MAGIC,
    STREAM_VERSION,
};
use metrics::counter;
use tracing::trace;

use crate::stats::TransportStats;

/// Parsed stream header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamHeader {
    /// Format version
    pub version: u16,
    /// Reserved flags
    pub flags: u16,
}

/// Read and validate the stream header
///
/// Every failure here is an open failure: the source is not a scan stream.
pub(crate) fn read_stream_header<R: Read>(reader: &mut R, source: &str) -> Result<StreamHeader> {
    let mut raw = [0u8; STREAM_HEADER_LEN];
    reader.read_exact(&mut raw).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => ScanError::open(source, "stream is shorter than its header"),
        _ => ScanError::open_io(source, e),
    })?;

    let mut header = &raw[..];
    let mut magic = [0u8; 8];
    header.copy_to_slice(&mut magic);
    if magic != STREAM_MAGIC {
        return Err(ScanError::open(source, "not a scan stream (bad magic)"));
    }

    let version = header.get_u16_le();
    if version != STREAM_VERSION {
        return Err(ScanError::open(
            source,
            format!("unsupported stream version {version}, expected {STREAM_VERSION}"),
        ));
    }

    let flags = header.get_u16_le();
    Ok(StreamHeader { version, flags })
}

/// Splits a byte source into chunks of whole packets
///
/// `len` is the total stream length, so end of input is known without I/O.
/// A rejected packet leaves the reader mid-packet, so the first failure is
/// terminal and later calls report its offset again.
pub(crate) struct PacketFramer<R> {
    reader: R,
    offset: u64,
    len: u64,
    failed_at: Option<u64>,
    config: TransportConfig,
    stats: TransportStats,
}

impl<R: Read> PacketFramer<R> {
    /// `reader` must be positioned right after the stream header
    pub(crate) fn new(reader: R, len: u64, config: TransportConfig) -> Self {
        Self {
            reader,
            offset: STREAM_HEADER_LEN as u64,
            len,
            failed_at: None,
            config,
            stats: TransportStats::default(),
        }
    }

    pub(crate) fn is_end_of_input(&self) -> bool {
        self.offset >= self.len
    }

    pub(crate) fn offset(&self) -> u64 {
        self.offset
    }

    pub(crate) fn stats(&self) -> TransportStats {
        self.stats
    }

    pub(crate) fn next_chunk(&mut self, buf: &mut BytesMut) -> Result<usize> {
        buf.clear();
        if let Some(offset) = self.failed_at {
            return Err(ScanError::decode(
                offset,
                "stream already failed to frame at this packet",
            ));
        }

        let mut packets = 0;
        let limit = self.config.chunk_packets.max(1);

        while packets < limit && !self.is_end_of_input() {
            if let Err(err) = self.read_packet(buf) {
                self.failed_at = Some(self.offset);
                buf.clear();
                return Err(err);
            }
            packets += 1;
        }

        if packets > 0 {
            self.stats.chunks += 1;
            self.stats.packets += packets as u64;
            self.stats.bytes += buf.len() as u64;
            counter!("rxp_transport_chunks_total").increment(1);
            counter!("rxp_transport_bytes_total").increment(buf.len() as u64);
            trace!(packets, bytes = buf.len(), offset = self.offset, "chunk read");
        }

        Ok(packets)
    }

    /// Append one whole packet (header + payload) to `buf`
    fn read_packet(&mut self, buf: &mut BytesMut) -> Result<()> {
        let remaining = self.len - self.offset;
        if remaining < PACKET_HEADER_LEN as u64 {
            return Err(ScanError::decode(
                self.offset,
                format!("truncated packet header: {remaining} bytes left"),
            ));
        }

        let start = buf.len();
        buf.resize(start + PACKET_HEADER_LEN, 0);
        self.reader.read_exact(&mut buf[start..])?;

        let mut header = &buf[start..];
        let id = header.get_u16_le();
        let payload_len = header.get_u32_le();

        if payload_len > self.config.max_packet_len {
            return Err(ScanError::decode(
                self.offset,
                format!(
                    "packet {id:#06x} declares {payload_len} payload bytes, limit is {}",
                    self.config.max_packet_len
                ),
            ));
        }

        let total = PACKET_HEADER_LEN as u64 + u64::from(payload_len);
        if total > remaining {
            return Err(ScanError::decode(
                self.offset,
                format!(
                    "truncated packet {id:#06x}: declares {payload_len} payload bytes, {} available",
                    remaining - PACKET_HEADER_LEN as u64
                ),
            ));
        }

        let payload_start = start + PACKET_HEADER_LEN;
        buf.resize(payload_start + payload_len as usize, 0);
        self.reader.read_exact(&mut buf[payload_start..])?;
        self.offset += total;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::stream;
    use super::*;
    use std::io::Cursor;

    fn framer(bytes: Vec<u8>, chunk_packets: usize) -> PacketFramer<Cursor<Vec<u8>>> {
        let len = bytes.len() as u64;
        let mut cursor = Cursor::new(bytes);
        read_stream_header(&mut cursor, "test").unwrap();
        PacketFramer::new(cursor, len, TransportConfig::default().with_chunk_packets(chunk_packets))
    }

    #[test]
    fn test_header_rejects_bad_magic() {
        let mut bytes = stream(&[]);
        bytes[0] = b'X';
        let err = read_stream_header(&mut Cursor::new(bytes), "bad").unwrap_err();
        assert!(matches!(err, ScanError::OpenFailure { .. }));
    }

    #[test]
    fn test_header_rejects_short_stream() {
        let err = read_stream_header(&mut Cursor::new(b"RXP".to_vec()), "short").unwrap_err();
        assert!(err.to_string().contains("shorter than its header"));
    }

    #[test]
    fn test_header_rejects_unknown_version() {
        let mut bytes = stream(&[]);
        bytes[8] = 9;
        let err = read_stream_header(&mut Cursor::new(bytes), "v9").unwrap_err();
        assert!(err.to_string().contains("unsupported stream version 9"));
    }

    #[test]
    fn test_chunks_hold_whole_packets() {
        let packets: Vec<(u16, Vec<u8>)> = (0..5).map(|i| (0x0099, vec![i; i as usize])).collect();
        let mut framer = framer(stream(&packets), 2);
        let mut buf = BytesMut::new();

        assert_eq!(framer.next_chunk(&mut buf).unwrap(), 2);
        assert_eq!(buf.len(), 2 * PACKET_HEADER_LEN + 1);
        assert_eq!(framer.next_chunk(&mut buf).unwrap(), 2);
        assert_eq!(framer.next_chunk(&mut buf).unwrap(), 1);
        assert!(framer.is_end_of_input());
        assert_eq!(framer.next_chunk(&mut buf).unwrap(), 0);
        assert!(buf.is_empty());

        let stats = framer.stats();
        assert_eq!(stats.chunks, 3);
        assert_eq!(stats.packets, 5);
    }

    #[test]
    fn test_zero_chunk_size_still_progresses() {
        let mut framer = framer(stream(&[(0x0099, vec![]), (0x0099, vec![])]), 0);
        assert_eq!(framer.next_chunk(&mut BytesMut::new()).unwrap(), 1);
    }

    #[test]
    fn test_truncated_payload_is_decode_failure() {
        let mut bytes = stream(&[(0x0020, vec![0; 8])]);
        bytes.truncate(bytes.len() - 3);
        let mut framer = framer(bytes, 16);
        let err = framer.next_chunk(&mut BytesMut::new()).unwrap_err();
        match err {
            ScanError::DecodeFailure { offset, message } => {
                assert_eq!(offset, STREAM_HEADER_LEN as u64);
                assert!(message.contains("truncated packet 0x0020"));
            }
            other => panic!("expected DecodeFailure, got {other:?}"),
        }
    }

    #[test]
    fn test_truncated_header_is_decode_failure() {
        let mut bytes = stream(&[]);
        bytes.extend_from_slice(&[0x20, 0x00, 0x08]);
        let mut framer = framer(bytes, 16);
        assert!(matches!(
            framer.next_chunk(&mut BytesMut::new()),
            Err(ScanError::DecodeFailure { .. })
        ));
    }

    #[test]
    fn test_failure_is_terminal() {
        // oversized opaque packet whose payload starts like an inclination packet
        let mut bytes = stream(&[]);
        bytes.extend_from_slice(&0x0300u16.to_le_bytes());
        bytes.extend_from_slice(&(2u32 << 20).to_le_bytes());
        bytes.extend_from_slice(&0x0020u16.to_le_bytes());
        bytes.extend_from_slice(&8u32.to_le_bytes());
        bytes.extend_from_slice(&123_456i32.to_le_bytes());
        bytes.extend_from_slice(&(-7i32).to_le_bytes());
        let mut framer = framer(bytes, 1);
        let mut buf = BytesMut::new();

        assert!(framer.next_chunk(&mut buf).is_err());
        for _ in 0..3 {
            match framer.next_chunk(&mut buf).unwrap_err() {
                ScanError::DecodeFailure { offset, .. } => {
                    assert_eq!(offset, STREAM_HEADER_LEN as u64)
                }
                other => panic!("expected DecodeFailure, got {other:?}"),
            }
            assert!(buf.is_empty());
        }
        assert_eq!(framer.stats().packets, 0);
        assert!(!framer.is_end_of_input());
    }

    #[test]
    fn test_oversized_packet_rejected() {
        let mut bytes = stream(&[]);
        bytes.extend_from_slice(&0x0099u16.to_le_bytes());
        bytes.extend_from_slice(&u32::MAX.to_le_bytes());
        let mut framer = framer(bytes, 16);
        let err = framer.next_chunk(&mut BytesMut::new()).unwrap_err();
        assert!(err.to_string().contains("limit is"));
    }
}
