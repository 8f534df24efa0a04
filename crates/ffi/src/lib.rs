//! # RXP FFI
//!
//! C ABI over the streaming session and batch extraction.
//!
//! Conventions:
//! - Every fallible function returns an `i32` status (`RXP_OK` on success)
//!   and writes results through out-pointers
//! - On failure a message is available from `rxp_last_error()` on the same
//!   thread until the next failing call on that thread
//! - Panics never unwind into C; they are reported as `RXP_UNKNOWN_FAILURE`
//! - A stream handle is single-threaded; it may move between threads but
//!   must not be used from two threads at once

#![allow(clippy::missing_safety_doc)]

mod error;

use std::ffi::{c_char, CStr};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr;

use contracts::InclinationReading;
use ingestion::FileTransport;
use scan_session::{Advance, StreamingSession};
use tracing::{debug, error};

pub use error::{
    RXP_DECODE_FAILURE, RXP_EXHAUSTED, RXP_INVALID_ARGUMENT, RXP_OK, RXP_OPEN_FAILURE,
    RXP_UNKNOWN_FAILURE,
};

use error::{last_error_ptr, set_last_error, FfiError};

/// Reading record as seen from C: `{ double time, roll, pitch; }`
pub type RxpInclination = InclinationReading;

/// Opaque streaming handle
pub struct RxpStream {
    session: StreamingSession<FileTransport>,
}

static VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");

/// Run `f`, translating errors and panics into a status code
fn guard<F>(f: F) -> i32
where
    F: FnOnce() -> Result<(), FfiError>,
{
    let outcome = catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        error!(%message, "panic caught at ffi boundary");
        Err(FfiError::Panic(message))
    });

    match outcome {
        Ok(()) => RXP_OK,
        Err(err) => {
            debug!(error = %err, status = err.status(), "ffi call failed");
            set_last_error(&err);
            err.status()
        }
    }
}

unsafe fn path_arg<'a>(path: *const c_char) -> Result<&'a str, FfiError> {
    if path.is_null() {
        return Err(FfiError::InvalidArgument("path is null"));
    }
    CStr::from_ptr(path)
        .to_str()
        .map_err(|_| FfiError::InvalidArgument("path is not valid UTF-8"))
}

/// Open a streaming session on the scan file at `path`
///
/// On success `*out` receives a handle to release with `rxp_stream_close`.
#[no_mangle]
pub unsafe extern "C" fn rxp_stream_open(
    path: *const c_char,
    sync_to_pps: bool,
    out: *mut *mut RxpStream,
) -> i32 {
    guard(|| {
        if out.is_null() {
            return Err(FfiError::InvalidArgument("out is null"));
        }
        *out = ptr::null_mut();
        let path = path_arg(path)?;
        let session = StreamingSession::open(path, sync_to_pps)?;
        *out = Box::into_raw(Box::new(RxpStream { session }));
        Ok(())
    })
}

/// 1 if the stream has no further bytes, 0 otherwise; 1 for a null handle
#[no_mangle]
pub unsafe extern "C" fn rxp_stream_is_end_of_input(stream: *const RxpStream) -> i32 {
    match stream.as_ref() {
        Some(stream) => i32::from(stream.session.is_end_of_input()),
        None => 1,
    }
}

/// Run one decode cycle
///
/// `*readings`/`*len` describe this cycle's readings. They stay valid until
/// the next `rxp_stream_advance` or `rxp_stream_close` on the same handle.
/// At end of input `*end_of_input` is set to 1 and `*len` to 0; a further
/// call returns `RXP_EXHAUSTED`.
#[no_mangle]
pub unsafe extern "C" fn rxp_stream_advance(
    stream: *mut RxpStream,
    readings: *mut *const RxpInclination,
    len: *mut usize,
    end_of_input: *mut i32,
) -> i32 {
    guard(|| {
        let stream = stream
            .as_mut()
            .ok_or(FfiError::InvalidArgument("stream is null"))?;
        if readings.is_null() || len.is_null() || end_of_input.is_null() {
            return Err(FfiError::InvalidArgument("out pointer is null"));
        }
        *readings = ptr::null();
        *len = 0;
        *end_of_input = 0;

        match stream.session.advance()? {
            Advance::Readings(slice) => {
                *readings = slice.as_ptr();
                *len = slice.len();
            }
            Advance::EndOfInput => *end_of_input = 1,
        }
        Ok(())
    })
}

/// Release a stream handle and every reading it holds
///
/// Null is a no-op. Each handle may be closed only once.
#[no_mangle]
pub unsafe extern "C" fn rxp_stream_close(stream: *mut RxpStream) {
    if stream.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        Box::from_raw(stream).session.close();
    }));
}

/// Decode the whole file at `path`
///
/// On success `*readings`/`*len` own an array to release with
/// `rxp_inclinations_free`. `*readings` is null when `*len` is 0.
#[no_mangle]
pub unsafe extern "C" fn rxp_inclinations_from_path(
    path: *const c_char,
    sync_to_pps: bool,
    readings: *mut *mut RxpInclination,
    len: *mut usize,
) -> i32 {
    guard(|| {
        if readings.is_null() || len.is_null() {
            return Err(FfiError::InvalidArgument("out pointer is null"));
        }
        *readings = ptr::null_mut();
        *len = 0;

        let path = path_arg(path)?;
        let all = scan_session::inclinations_from_path(path, sync_to_pps)?;
        if !all.is_empty() {
            *len = all.len();
            *readings = Box::into_raw(all.into_boxed_slice()).cast::<RxpInclination>();
        }
        Ok(())
    })
}

/// Release an array returned by `rxp_inclinations_from_path`
///
/// `len` must be the length returned with it. Null is a no-op.
#[no_mangle]
pub unsafe extern "C" fn rxp_inclinations_free(readings: *mut RxpInclination, len: usize) {
    if readings.is_null() {
        return;
    }
    drop(Box::from_raw(ptr::slice_from_raw_parts_mut(readings, len)));
}

/// Message of the last failure on the calling thread, empty if none
#[no_mangle]
pub extern "C" fn rxp_last_error() -> *const c_char {
    last_error_ptr()
}

/// Library version, NUL-terminated
#[no_mangle]
pub extern "C" fn rxp_version() -> *const c_char {
    VERSION.as_ptr().cast()
}
