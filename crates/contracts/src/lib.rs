//! # Contracts
//!
//! Frozen interface contracts, defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - The decode clock (seconds, f64) is maintained by the dispatcher from the
//!   time packets found in the stream, never from wall-clock time
//! - Every extracted reading carries the clock value at the moment its packet
//!   was dispatched

mod config;
mod error;
mod handler;
mod packet;
mod reading;
mod transport;

pub use config::*;
pub use error::*;
pub use handler::PacketHandler;
pub use packet::*;
pub use reading::*;
pub use transport::{ByteTransport, SessionState};
