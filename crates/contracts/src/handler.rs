//! PacketHandler trait - Per-packet visitor
//!
//! The dispatcher owns framing and the decode clock; handlers only see
//! tagged events together with the clock value at dispatch time.

use crate::PacketEvent;

/// Packet visitor
///
/// The dispatcher calls [`on_packet`](PacketHandler::on_packet) once per packet
/// in stream order. Time packets have already been applied to the clock when
/// their event is delivered.
///
/// # Example
///
/// ```
/// use contracts::{PacketEvent, PacketHandler};
///
/// #[derive(Default)]
/// struct CountInclinations(usize);
///
/// impl PacketHandler for CountInclinations {
///     fn on_packet(&mut self, _time: f64, event: &PacketEvent<'_>) {
///         if let PacketEvent::Inclination(_) = event {
///             self.0 += 1;
///         }
///     }
/// }
/// ```
pub trait PacketHandler {
    /// Handle one packet
    ///
    /// # Arguments
    /// * `time` - Decode clock value (seconds) at the moment of dispatch
    /// * `event` - The decoded packet
    fn on_packet(&mut self, time: f64, event: &PacketEvent<'_>);
}

impl<H: PacketHandler + ?Sized> PacketHandler for &mut H {
    fn on_packet(&mut self, time: f64, event: &PacketEvent<'_>) {
        (**self).on_packet(time, event)
    }
}
