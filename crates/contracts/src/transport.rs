//! ByteTransport trait - Raw stream source abstraction
//!
//! Decouples the session from where scan bytes come from (file, device,
//! memory). Implementations own chunking: every chunk they yield ends on a
//! packet boundary.

use bytes::BytesMut;

use crate::Result;

/// Raw byte source trait
///
/// # Design Principles
///
/// 1. **Forward-only**: no seeking, no random access
/// 2. **Packet-aligned chunks**: the dispatcher never sees a split packet
/// 3. **Blocking**: a stalled source blocks `next_chunk` indefinitely
pub trait ByteTransport {
    /// Human-readable name of the source (path, device, "memory")
    fn source(&self) -> &str;

    /// Whether no further bytes are available
    ///
    /// Pure query: callable at any time, never changes state.
    fn is_end_of_input(&self) -> bool;

    /// Read the next chunk into `buf`
    ///
    /// `buf` is cleared first and then holds only whole packets.
    /// Returns the number of packets in the chunk (0 at end of input).
    ///
    /// # Errors
    /// Truncated or oversized packets, and read failures.
    fn next_chunk(&mut self, buf: &mut BytesMut) -> Result<usize>;
}

impl<T: ByteTransport + ?Sized> ByteTransport for Box<T> {
    fn source(&self) -> &str {
        (**self).source()
    }

    fn is_end_of_input(&self) -> bool {
        (**self).is_end_of_input()
    }

    fn next_chunk(&mut self, buf: &mut BytesMut) -> Result<usize> {
        (**self).next_chunk(buf)
    }
}

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Transport may still have unread data
    Active,
    /// End of input was reported; terminal
    Exhausted,
    /// A cycle failed to decode or read; terminal
    Failed,
}
