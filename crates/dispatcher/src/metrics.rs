//! Dispatch counters for observability

use contracts::PacketKind;
use metrics::counter;

/// Per-kind packet counts
///
/// Returned per dispatched chunk and accumulated over the dispatcher's life.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// All packets
    pub packets: u64,
    /// Inclination packets
    pub inclinations: u64,
    /// Clock configuration, internal time and PPS packets
    pub time_packets: u64,
    /// Packets the decoder does not interpret
    pub other: u64,
}

impl DispatchSummary {
    /// Count one packet of `kind`
    pub fn record(&mut self, kind: PacketKind) {
        self.packets += 1;
        match kind {
            PacketKind::Inclination => self.inclinations += 1,
            PacketKind::ClockConfig | PacketKind::InternalTime | PacketKind::PpsSync => {
                self.time_packets += 1
            }
            PacketKind::Other => self.other += 1,
        }
    }

    /// Add another summary into this one
    pub fn merge(&mut self, other: &DispatchSummary) {
        self.packets += other.packets;
        self.inclinations += other.inclinations;
        self.time_packets += other.time_packets;
        self.other += other.other;
    }

    /// Publish to the installed metrics recorder
    pub fn publish(&self) {
        counter!("rxp_packets_total").increment(self.packets);
        counter!("rxp_packets_by_kind_total", "kind" => PacketKind::Inclination.label())
            .increment(self.inclinations);
        counter!("rxp_packets_by_kind_total", "kind" => "time").increment(self.time_packets);
        counter!("rxp_packets_by_kind_total", "kind" => PacketKind::Other.label())
            .increment(self.other);
    }
}
