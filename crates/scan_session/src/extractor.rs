//! Record Extractor
//!
//! Stateful visitor that turns inclination packets into readings and ignores
//! every other packet kind.

use contracts::{InclinationReading, PacketEvent, PacketHandler};

/// Inclination extractor
///
/// Holds the readings extracted since the last [`clear`](Self::clear) or
/// [`take`](Self::take), in dispatch order.
#[derive(Debug, Clone, Default)]
pub struct InclinationExtractor {
    readings: Vec<InclinationReading>,
}

impl InclinationExtractor {
    /// Create an extractor holding an empty sequence
    pub fn new() -> Self {
        Self::default()
    }

    /// Readings held right now
    pub fn readings(&self) -> &[InclinationReading] {
        &self.readings
    }

    /// Number of readings held
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Whether no readings are held
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Empty the held sequence, keeping its allocation
    pub fn clear(&mut self) {
        self.readings.clear();
    }

    /// Hand over the accumulated sequence, leaving an empty one behind
    ///
    /// Calling again without new packets yields an empty sequence.
    pub fn take(&mut self) -> Vec<InclinationReading> {
        std::mem::take(&mut self.readings)
    }
}

impl PacketHandler for InclinationExtractor {
    fn on_packet(&mut self, time: f64, event: &PacketEvent<'_>) {
        if let PacketEvent::Inclination(raw) = event {
            self.readings.push(raw.to_reading(time));
        }
    }
}
