//! # Scan Session
//!
//! Inclination time-series extraction from scan streams.
//!
//! Responsibilities:
//! - Collect inclination packets into physical-unit readings (`InclinationExtractor`)
//! - Drive chunk-by-chunk decoding with per-cycle results (`StreamingSession`)
//! - Decode whole streams in one call (`inclinations_from_path`)
//!
//! ## Usage Example
//!
//! ```no_run
//! use scan_session::inclinations_from_path;
//!
//! let readings = inclinations_from_path("scan.rxp", false)?;
//! println!("Time,Roll,Pitch");
//! for r in &readings {
//!     println!("{},{:.3},{:.3}", r.time, r.roll, r.pitch);
//! }
//! # Ok::<(), contracts::ScanError>(())
//! ```

mod batch;
mod extractor;
mod reader;
mod session;

// Re-exports
pub use batch::{inclinations_from_path, inclinations_from_path_with_config, inclinations_from_transport};
pub use contracts::{DecodeConfig, InclinationReading, Result, ScanError, SessionState};
pub use extractor::InclinationExtractor;
pub use reader::{Inclinations, Reader};
pub use session::{Advance, StreamingSession};
