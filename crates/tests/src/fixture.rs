//! Scan stream fixtures
//!
//! Encodes streams in the wire format the decoder reads. Test-only: nothing
//! in the library writes scan files.

use std::path::Path;

use contracts::{packet_id, STREAM_MAGIC, STREAM_VERSION};

/// One packet to encode
#[derive(Debug, Clone, PartialEq)]
pub enum FixturePacket {
    ClockConfig(u32),
    InternalTime(u64),
    PpsSync { ticks: u64, pps_seconds: u64 },
    Inclination { roll: i32, pitch: i32 },
    Other { id: u16, payload: Vec<u8> },
    /// Any id with any payload, for malformed streams
    Raw { id: u16, payload: Vec<u8> },
}

impl FixturePacket {
    fn encode(&self, out: &mut Vec<u8>) {
        let (id, payload) = match self {
            Self::ClockConfig(tps) => (packet_id::CLOCK_CONFIG, tps.to_le_bytes().to_vec()),
            Self::InternalTime(ticks) => (packet_id::INTERNAL_TIME, ticks.to_le_bytes().to_vec()),
            Self::PpsSync { ticks, pps_seconds } => {
                let mut p = ticks.to_le_bytes().to_vec();
                p.extend_from_slice(&pps_seconds.to_le_bytes());
                (packet_id::PPS_SYNC, p)
            }
            Self::Inclination { roll, pitch } => {
                let mut p = roll.to_le_bytes().to_vec();
                p.extend_from_slice(&pitch.to_le_bytes());
                (packet_id::INCLINATION, p)
            }
            Self::Other { id, payload } | Self::Raw { id, payload } => (*id, payload.clone()),
        };
        out.extend_from_slice(&id.to_le_bytes());
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out.extend_from_slice(&payload);
    }
}

/// Builder for scan streams
#[derive(Debug, Clone, Default)]
pub struct StreamBuilder {
    packets: Vec<FixturePacket>,
}

impl StreamBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, packet: FixturePacket) -> Self {
        self.packets.push(packet);
        self
    }

    pub fn clock_config(self, ticks_per_second: u32) -> Self {
        self.push(FixturePacket::ClockConfig(ticks_per_second))
    }

    pub fn internal_time(self, ticks: u64) -> Self {
        self.push(FixturePacket::InternalTime(ticks))
    }

    pub fn pps_sync(self, ticks: u64, pps_seconds: u64) -> Self {
        self.push(FixturePacket::PpsSync { ticks, pps_seconds })
    }

    pub fn inclination(self, roll: i32, pitch: i32) -> Self {
        self.push(FixturePacket::Inclination { roll, pitch })
    }

    pub fn other(self, id: u16, payload: &[u8]) -> Self {
        self.push(FixturePacket::Other {
            id,
            payload: payload.to_vec(),
        })
    }

    pub fn raw(self, id: u16, payload: &[u8]) -> Self {
        self.push(FixturePacket::Raw {
            id,
            payload: payload.to_vec(),
        })
    }

    /// Packets added so far
    pub fn packets(&self) -> &[FixturePacket] {
        &self.packets
    }

    /// Number of inclination packets
    pub fn inclination_count(&self) -> usize {
        self.packets
            .iter()
            .filter(|p| matches!(p, FixturePacket::Inclination { .. }))
            .count()
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&STREAM_MAGIC);
        out.extend_from_slice(&STREAM_VERSION.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        for packet in &self.packets {
            packet.encode(&mut out);
        }
        out
    }

    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.build())
    }
}
