//! Transport counters

/// Cumulative transport counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransportStats {
    /// Non-empty chunks handed out
    pub chunks: u64,

    /// Whole packets handed out
    pub packets: u64,

    /// Packet bytes handed out (headers included)
    pub bytes: u64,
}
