//! # Ingestion
//!
//! Scan stream transports.
//!
//! Responsibilities:
//! - Open a stream source and validate its header
//! - Cut the byte stream into chunks that end on packet boundaries
//! - Answer the end-of-input query without I/O
//!
//! ## Usage Example
//!
//! ```no_run
//! use bytes::BytesMut;
//! use contracts::{ByteTransport, TransportConfig};
//! use ingestion::FileTransport;
//!
//! let mut transport = FileTransport::open("scan.rxp", TransportConfig::default())?;
//! let mut buf = BytesMut::new();
//! while !transport.is_end_of_input() {
//!     let _packets = transport.next_chunk(&mut buf)?;
//!     // hand `buf` to the dispatcher
//! }
//! # Ok::<(), contracts::ScanError>(())
//! ```

mod file;
mod framing;
mod memory;
mod stats;

// Re-exports
pub use contracts::{ByteTransport, Result, ScanError, TransportConfig};
pub use file::FileTransport;
pub use framing::StreamHeader;
pub use memory::MemoryTransport;
pub use stats::TransportStats;
