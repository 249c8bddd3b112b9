//! Safe Rust wrappers over libavutil
//!
//! This module provides RAII wrappers around the native objects declared in
//! [`crate::ffi`]. Every wrapper holds the `&'static AvUtil` it was created
//! with and releases its native object exactly once from `Drop`.

pub mod bprint;
pub mod buffer;
pub mod channel_layout;
pub mod crypto;
pub mod dict;
pub mod encoding;
pub mod fifo;
pub mod frame;
pub mod hash;
pub mod image;
pub mod log;
pub mod math;
pub mod opt;
pub mod parse;
pub mod pixdesc;
pub mod side_data;
pub mod system;

pub use bprint::BPrint;
pub use buffer::{BufferPool, BufferRef};
pub use channel_layout::ChannelLayout;
pub use crypto::{Aes, Blowfish, Camellia, Cast5, Direction};
pub use dict::Dictionary;
pub use fifo::{AudioFifo, Fifo};
pub use frame::Frame;
pub use hash::{adler32, Crc, Hasher, Hmac, Md5, Murmur3};
pub use image::ImageBuffer;
pub use log::{LogRecord, LogStream};
pub use math::DeltaRescaler;
pub use opt::{OptionInfo, OptionValue};
pub use pixdesc::PixelFormatDescriptor;
pub use system::{LibraryInfo, MappedFile};

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int, c_uint};

use crate::ffi::{self, AvError, AvUtil, BindError};

/// Safe layer error type
#[derive(Debug, thiserror::Error)]
pub enum UtilError {
    #[error("{0}")]
    Av(#[from] AvError),

    #[error("libavutil unavailable: {0}")]
    Bind(#[from] BindError),

    #[error("Failed to allocate {0}")]
    AllocationFailed(&'static str),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0} is not exported by the loaded libavutil")]
    Unsupported(&'static str),

    #[error("String contains an interior NUL byte")]
    Nul(#[from] std::ffi::NulError),
}

pub type UtilResult<T> = Result<T, UtilError>;

/// The process-wide binding
#[inline]
pub(crate) fn lib() -> UtilResult<&'static AvUtil> {
    Ok(ffi::avutil()?)
}

/// Convert a native return code, keeping non-negative values
#[inline]
pub(crate) fn check(ret: c_int) -> UtilResult<c_int> {
    Ok(ffi::check_error(ret)?)
}

/// Unwrap an optional entry point or report it as unsupported
#[inline]
pub(crate) fn require<T>(symbol: Option<T>, name: &'static str) -> UtilResult<T> {
    symbol.ok_or(UtilError::Unsupported(name))
}

pub(crate) fn c_string(s: &str) -> UtilResult<CString> {
    Ok(CString::new(s)?)
}

/// Length as the `int` most entry points take
pub(crate) fn c_len(len: usize, what: &str) -> UtilResult<c_int> {
    c_int::try_from(len).map_err(|_| UtilError::InvalidArgument(format!("{what} too large: {len}")))
}

pub(crate) fn c_ulen(len: usize, what: &str) -> UtilResult<c_uint> {
    c_uint::try_from(len).map_err(|_| UtilError::InvalidArgument(format!("{what} too large: {len}")))
}

/// Copy a static or borrowed native string
///
/// # Safety
/// `ptr` must be null or point to a NUL terminated string.
pub(crate) unsafe fn owned_str(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        None
    } else {
        Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
    }
}

/// Copy an `av_malloc`ed string and free it
///
/// # Safety
/// `ptr` must be null or a NUL terminated string allocated by libavutil.
pub(crate) unsafe fn take_av_string(lib: &AvUtil, ptr: *mut c_char) -> Option<String> {
    let s = owned_str(ptr);
    if !ptr.is_null() {
        (lib.mem.av_free)(ptr.cast());
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ffi::error::AVERROR_EINVAL;

    #[test]
    fn test_error_conversions() {
        let err: UtilError = AvError::new(AVERROR_EINVAL, "Invalid argument").into();
        assert!(matches!(err, UtilError::Av(ref e) if e.is_invalid()));
        assert_eq!(err.to_string(), format!("libavutil error {}: Invalid argument", AVERROR_EINVAL));

        let err = c_string("a\0b").unwrap_err();
        assert!(matches!(err, UtilError::Nul(_)));

        assert_eq!(
            UtilError::Unsupported("av_fifo_grow").to_string(),
            "av_fifo_grow is not exported by the loaded libavutil"
        );
    }

    #[test]
    fn test_length_conversion() {
        assert_eq!(c_len(16, "buffer").unwrap(), 16);
        assert!(matches!(c_len(usize::MAX, "buffer"), Err(UtilError::InvalidArgument(_))));
        assert!(c_ulen(u32::MAX as usize, "key").is_ok());
    }

    #[test]
    fn test_require() {
        assert_eq!(require(Some(3), "x").unwrap(), 3);
        assert!(matches!(require::<u8>(None, "x"), Err(UtilError::Unsupported("x"))));
    }
}
