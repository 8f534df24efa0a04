//! PacketEvent - Dispatcher output
//!
//! Wire constants of the scan stream and the tagged events handed to handlers.
//! All multi-byte fields are little-endian.

/// Magic bytes opening every scan stream
pub const STREAM_MAGIC: [u8; 8] = *b"RXPSTRM\0";

/// Supported stream format version
pub const STREAM_VERSION: u16 = 1;

/// Stream header: magic + version (u16) + flags (u16)
pub const STREAM_HEADER_LEN: usize = 12;

/// Packet header: id (u16) + payload length (u32)
pub const PACKET_HEADER_LEN: usize = 6;

/// Default upper bound on a single packet payload
pub const DEFAULT_MAX_PACKET_LEN: u32 = 1 << 20;

/// Tick rate assumed until a clock configuration packet is seen
pub const DEFAULT_TICKS_PER_SECOND: u32 = 1_000_000;

/// Known packet identifiers
pub mod packet_id {
    /// `ticks_per_second: u32`
    pub const CLOCK_CONFIG: u16 = 0x0010;
    /// `ticks: u64`
    pub const INTERNAL_TIME: u16 = 0x0011;
    /// `ticks: u64`, `pps_seconds: u64`
    pub const PPS_SYNC: u16 = 0x0012;
    /// `roll: i32`, `pitch: i32` (milli-degrees)
    pub const INCLINATION: u16 = 0x0020;
}

/// Kind of a packet, derived from its id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketKind {
    ClockConfig,
    InternalTime,
    PpsSync,
    Inclination,
    Other,
}

impl PacketKind {
    /// Classify a packet id
    pub fn from_id(id: u16) -> Self {
        match id {
            packet_id::CLOCK_CONFIG => Self::ClockConfig,
            packet_id::INTERNAL_TIME => Self::InternalTime,
            packet_id::PPS_SYNC => Self::PpsSync,
            packet_id::INCLINATION => Self::Inclination,
            _ => Self::Other,
        }
    }

    /// Stable lowercase name, used as a metrics label
    pub fn label(self) -> &'static str {
        match self {
            Self::ClockConfig => "clock_config",
            Self::InternalTime => "internal_time",
            Self::PpsSync => "pps_sync",
            Self::Inclination => "inclination",
            Self::Other => "other",
        }
    }

    /// Fixed payload length, `None` for opaque packets
    pub fn payload_len(self) -> Option<usize> {
        match self {
            Self::ClockConfig => Some(4),
            Self::InternalTime => Some(8),
            Self::PpsSync => Some(16),
            Self::Inclination => Some(8),
            Self::Other => None,
        }
    }
}

/// One decoded packet
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PacketEvent<'a> {
    /// Clock tick-rate announcement
    ClockConfig { ticks_per_second: u32 },

    /// Free-running internal time
    InternalTime { ticks: u64 },

    /// Pulse-per-second lock: internal ticks at the pulse and its absolute second
    PpsSync { ticks: u64, pps_seconds: u64 },

    /// Inclinometer sample
    Inclination(crate::RawInclination),

    /// Any packet the decoder does not interpret
    Other { id: u16, payload: &'a [u8] },
}

impl PacketEvent<'_> {
    /// Kind of this event
    pub fn kind(&self) -> PacketKind {
        match self {
            Self::ClockConfig { .. } => PacketKind::ClockConfig,
            Self::InternalTime { .. } => PacketKind::InternalTime,
            Self::PpsSync { .. } => PacketKind::PpsSync,
            Self::Inclination(_) => PacketKind::Inclination,
            Self::Other { .. } => PacketKind::Other,
        }
    }
}
