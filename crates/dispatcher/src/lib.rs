//! # Dispatcher
//!
//! Packet demultiplexing module.
//!
//! Responsibilities:
//! - Parse a chunk of whole packets into tagged `PacketEvent`s
//! - Maintain the decode clock from time packets (optionally PPS-disciplined)
//! - Invoke the registered `PacketHandler` once per packet, in stream order

pub mod clock;
pub mod dispatcher;
pub mod metrics;

pub use clock::DecodeClock;
pub use contracts::{PacketEvent, PacketHandler};
pub use dispatcher::PacketDispatcher;
pub use metrics::DispatchSummary;
