//! Status codes and the per-thread last error

use std::cell::RefCell;
use std::ffi::{c_char, CString};

use contracts::{ErrorKind, ScanError};
use thiserror::Error;

/// Success
pub const RXP_OK: i32 = 0;
/// Source missing, unreadable or not a scan stream
pub const RXP_OPEN_FAILURE: i32 = 1;
/// Malformed packet mid-stream
pub const RXP_DECODE_FAILURE: i32 = 2;
/// Anything else, including a caught panic
pub const RXP_UNKNOWN_FAILURE: i32 = 3;
/// Null pointer or non-UTF-8 path
pub const RXP_INVALID_ARGUMENT: i32 = 4;
/// `rxp_stream_advance` after end of input was reported
pub const RXP_EXHAUSTED: i32 = 5;

thread_local! {
    static LAST_ERROR: RefCell<CString> = RefCell::new(CString::default());
}

/// Errors raised at the C boundary
#[derive(Debug, Error)]
pub(crate) enum FfiError {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("panic: {0}")]
    Panic(String),
}

impl FfiError {
    pub(crate) fn status(&self) -> i32 {
        match self {
            Self::InvalidArgument(_) => RXP_INVALID_ARGUMENT,
            Self::Panic(_) => RXP_UNKNOWN_FAILURE,
            Self::Scan(err) => match err.kind() {
                ErrorKind::Open => RXP_OPEN_FAILURE,
                ErrorKind::Decode => RXP_DECODE_FAILURE,
                ErrorKind::Exhausted => RXP_EXHAUSTED,
                ErrorKind::Config | ErrorKind::Unknown => RXP_UNKNOWN_FAILURE,
            },
        }
    }
}

pub(crate) fn set_last_error(err: &FfiError) {
    // interior NULs would truncate the message on the C side
    let message = err.to_string().replace('\0', " ");
    let message = CString::new(message).unwrap_or_default();
    LAST_ERROR.with(|slot| *slot.borrow_mut() = message);
}

pub(crate) fn last_error_ptr() -> *const c_char {
    LAST_ERROR.with(|slot| slot.borrow().as_ptr())
}
