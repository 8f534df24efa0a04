//! Decode clock
//!
//! Running timestamp rebuilt from the time packets of the stream.

use contracts::{PacketEvent, DEFAULT_TICKS_PER_SECOND};

/// Most recent pulse-per-second lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PpsLock {
    ticks: u64,
    seconds: u64,
}

/// Decode clock
///
/// Reads `0.0` until the first time packet and never reads backwards after
/// that. A tick-rate change or a PPS lock that would place the current tick
/// earlier holds the clock at its high-water mark until time catches up.
#[derive(Debug, Clone)]
pub struct DecodeClock {
    sync_to_pps: bool,
    ticks_per_second: u32,
    ticks: Option<u64>,
    pps: Option<PpsLock>,
    /// Highest value read so far
    seconds: f64,
}

impl DecodeClock {
    /// Create a clock; `sync_to_pps` selects the PPS time base once locked
    pub fn new(sync_to_pps: bool) -> Self {
        Self {
            sync_to_pps,
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            ticks: None,
            pps: None,
            seconds: 0.0,
        }
    }

    /// Apply a time packet; other events are ignored
    pub fn apply(&mut self, event: &PacketEvent<'_>) {
        match *event {
            PacketEvent::ClockConfig { ticks_per_second } => {
                self.ticks_per_second = ticks_per_second;
            }
            PacketEvent::InternalTime { ticks } => self.advance_to(ticks),
            PacketEvent::PpsSync { ticks, pps_seconds } => {
                self.pps = Some(PpsLock {
                    ticks,
                    seconds: pps_seconds,
                });
                self.advance_to(ticks);
            }
            PacketEvent::Inclination(_) | PacketEvent::Other { .. } => return,
        }
        self.seconds = self.seconds.max(self.time_base_seconds());
    }

    fn advance_to(&mut self, ticks: u64) {
        self.ticks = Some(self.ticks.map_or(ticks, |current| current.max(ticks)));
    }

    /// Current clock value in seconds
    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    /// Current tick expressed in the active time base, without the high-water mark
    fn time_base_seconds(&self) -> f64 {
        let Some(ticks) = self.ticks else {
            return 0.0;
        };
        let tps = f64::from(self.ticks_per_second);

        match self.pps {
            Some(lock) if self.sync_to_pps => {
                lock.seconds as f64 + ticks.saturating_sub(lock.ticks) as f64 / tps
            }
            _ => ticks as f64 / tps,
        }
    }

    /// Whether timestamps follow the PPS time base
    pub fn sync_to_pps(&self) -> bool {
        self.sync_to_pps
    }

    /// Whether a PPS lock has been seen
    pub fn is_pps_locked(&self) -> bool {
        self.pps.is_some()
    }

    /// Current tick rate
    pub fn ticks_per_second(&self) -> u32 {
        self.ticks_per_second
    }
}
