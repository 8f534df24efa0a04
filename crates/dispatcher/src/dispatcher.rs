//! PacketDispatcher - demultiplexes a chunk into tagged packet events

use bytes::Buf;
use tracing::{debug, trace, warn};

use contracts::{
    PacketEvent, PacketHandler, PacketKind, RawInclination, Result, ScanError, PACKET_HEADER_LEN,
    STREAM_HEADER_LEN,
};

use crate::clock::DecodeClock;
use crate::metrics::DispatchSummary;

/// Packet dispatcher
///
/// Walks a chunk of whole packets, keeps the decode clock current and hands
/// every packet to the registered handler in stream order. A decode failure
/// is terminal: the rest of the failing chunk is never dispatched and every
/// later call reports the same offset.
#[derive(Debug, Clone)]
pub struct PacketDispatcher {
    clock: DecodeClock,
    /// Stream offset of the next undispatched byte
    offset: u64,
    failed_at: Option<u64>,
    totals: DispatchSummary,
}

impl PacketDispatcher {
    /// Create a dispatcher; `sync_to_pps` is forwarded to the decode clock
    pub fn new(sync_to_pps: bool) -> Self {
        debug!(sync_to_pps, "packet dispatcher created");
        Self {
            clock: DecodeClock::new(sync_to_pps),
            offset: STREAM_HEADER_LEN as u64,
            failed_at: None,
            totals: DispatchSummary::default(),
        }
    }

    /// Decode clock
    pub fn clock(&self) -> &DecodeClock {
        &self.clock
    }

    /// Stream offset of the next packet to dispatch
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Offset of the packet that failed to decode, if any
    pub fn failed_at(&self) -> Option<u64> {
        self.failed_at
    }

    /// Counts over every chunk dispatched so far
    pub fn totals(&self) -> DispatchSummary {
        self.totals
    }

    /// Dispatch every packet in `chunk` to `handler`
    ///
    /// Time packets are applied to the clock before the handler sees them.
    ///
    /// # Errors
    /// `DecodeFailure` for a split packet header or payload, a known packet
    /// with the wrong payload size, or a zero tick rate. Packets before the
    /// bad one have already been delivered. Once a chunk has failed, every
    /// later call fails without looking at its chunk.
    pub fn dispatch<H>(&mut self, chunk: &[u8], handler: &mut H) -> Result<DispatchSummary>
    where
        H: PacketHandler + ?Sized,
    {
        if let Some(offset) = self.failed_at {
            return Err(ScanError::decode(
                offset,
                "stream already failed to decode at this packet",
            ));
        }

        let mut buf = chunk;
        let mut summary = DispatchSummary::default();

        while buf.has_remaining() {
            let packet_offset = self.offset;
            if buf.remaining() < PACKET_HEADER_LEN {
                return Err(self.fail(
                    &summary,
                    ScanError::decode(packet_offset, "chunk ends inside a packet header"),
                ));
            }

            let id = buf.get_u16_le();
            let len = buf.get_u32_le() as usize;
            if buf.remaining() < len {
                return Err(self.fail(
                    &summary,
                    ScanError::decode(
                        packet_offset,
                        format!("chunk ends inside packet {id:#06x} ({len} payload bytes)"),
                    ),
                ));
            }

            let payload = &buf[..len];
            let event = match parse_event(id, payload) {
                Ok(event) => event,
                Err(message) => {
                    return Err(self.fail(&summary, ScanError::decode(packet_offset, message)));
                }
            };

            self.clock.apply(&event);
            if let PacketEvent::Other { id, payload } = event {
                trace!(id, len = payload.len(), "uninterpreted packet");
            }
            handler.on_packet(self.clock.seconds(), &event);

            summary.record(event.kind());
            buf.advance(len);
            self.offset += (PACKET_HEADER_LEN + len) as u64;
        }

        self.totals.merge(&summary);
        summary.publish();
        trace!(
            packets = summary.packets,
            inclinations = summary.inclinations,
            clock = self.clock.seconds(),
            "chunk dispatched"
        );
        Ok(summary)
    }

    fn fail(&mut self, partial: &DispatchSummary, err: ScanError) -> ScanError {
        self.failed_at = Some(self.offset);
        self.totals.merge(partial);
        partial.publish();
        metrics::counter!("rxp_decode_errors_total").increment(1);
        warn!(error = %err, "malformed packet");
        err
    }
}

/// Decode one packet payload
fn parse_event(id: u16, payload: &[u8]) -> std::result::Result<PacketEvent<'_>, String> {
    let kind = PacketKind::from_id(id);
    if let Some(expected) = kind.payload_len() {
        if payload.len() != expected {
            return Err(format!(
                "{} packet has {} payload bytes, expected {expected}",
                kind.label(),
                payload.len()
            ));
        }
    }

    let mut p = payload;
    let event = match kind {
        PacketKind::ClockConfig => {
            let ticks_per_second = p.get_u32_le();
            if ticks_per_second == 0 {
                return Err("clock_config packet declares zero ticks per second".to_string());
            }
            PacketEvent::ClockConfig { ticks_per_second }
        }
        PacketKind::InternalTime => PacketEvent::InternalTime {
            ticks: p.get_u64_le(),
        },
        PacketKind::PpsSync => PacketEvent::PpsSync {
            ticks: p.get_u64_le(),
            pps_seconds: p.get_u64_le(),
        },
        PacketKind::Inclination => PacketEvent::Inclination(RawInclination {
            roll: p.get_i32_le(),
            pitch: p.get_i32_le(),
        }),
        PacketKind::Other => PacketEvent::Other { id, payload },
    };
    Ok(event)
}
