//! InclinationReading - Record Extractor output
//!
//! One roll/pitch sample in physical units, stamped with the decode clock.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Raw units per degree of the fixed-point inclination fields
pub const INCLINATION_UNITS_PER_DEGREE: f64 = 1000.0;

/// Inclination reading
///
/// Laid out as `{ time: f64, roll: f64, pitch: f64 }` so a slice of readings can
/// cross a C boundary unchanged.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct InclinationReading {
    /// Decode clock value when the packet was dispatched (seconds)
    pub time: f64,

    /// Rotation around the x-axis (degrees)
    pub roll: f64,

    /// Rotation around the y-axis (degrees)
    pub pitch: f64,
}

impl InclinationReading {
    pub const fn new(time: f64, roll: f64, pitch: f64) -> Self {
        Self { time, roll, pitch }
    }
}

/// Fixed-point inclination fields as carried by the packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInclination {
    /// Roll in milli-degrees
    pub roll: i32,

    /// Pitch in milli-degrees
    pub pitch: i32,
}

impl RawInclination {
    /// Convert to physical units, stamped with `time`
    ///
    /// Out-of-range values pass through unchanged.
    #[inline]
    pub fn to_reading(self, time: f64) -> InclinationReading {
        InclinationReading {
            time,
            roll: f64::from(self.roll) / INCLINATION_UNITS_PER_DEGREE,
            pitch: f64::from(self.pitch) / INCLINATION_UNITS_PER_DEGREE,
        }
    }
}
