//! Decode configuration contracts that can be shared across crates.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::DEFAULT_MAX_PACKET_LEN;

/// Packets per transport chunk when nothing else is configured
pub const DEFAULT_CHUNK_PACKETS: usize = 1024;

/// Decode configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct DecodeConfig {
    /// Discipline decode-clock timestamps to the PPS signal
    #[serde(default)]
    pub sync_to_pps: bool,

    /// Transport chunking
    #[serde(default)]
    #[validate(nested)]
    pub transport: TransportConfig,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            sync_to_pps: false,
            transport: TransportConfig::default(),
        }
    }
}

/// Transport chunking configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct TransportConfig {
    /// Maximum packets per chunk
    #[validate(range(min = 1, max = 1048576))]
    pub chunk_packets: usize,

    /// Largest payload accepted before the stream is declared malformed
    #[validate(range(min = 16, max = 268435456))]
    pub max_packet_len: u32,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            chunk_packets: DEFAULT_CHUNK_PACKETS,
            max_packet_len: DEFAULT_MAX_PACKET_LEN,
        }
    }
}

impl TransportConfig {
    /// Create new transport configuration
    pub fn new(chunk_packets: usize, max_packet_len: u32) -> Self {
        Self {
            chunk_packets,
            max_packet_len,
        }
    }

    /// Same limits, different chunk size
    pub fn with_chunk_packets(mut self, chunk_packets: usize) -> Self {
        self.chunk_packets = chunk_packets;
        self
    }
}
