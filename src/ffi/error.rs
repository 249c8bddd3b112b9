//! libavutil error handling
//!
//! Provides error codes, error conversion, and result types.

use std::ffi::CStr;
use std::fmt;
use std::os::raw::{c_char, c_int};

use super::loader;

// ============================================================================
// FFmpeg Error Codes
// ============================================================================

/// End of file / stream reached
pub const AVERROR_EOF: c_int = fferrtag(b'E', b'O', b'F', b' ');

/// Bitstream filter not found
pub const AVERROR_BSF_NOT_FOUND: c_int = fferrtag(0xF8, b'B', b'S', b'F');

/// Internal bug (should never happen)
pub const AVERROR_BUG: c_int = fferrtag(b'B', b'U', b'G', b'!');

/// Internal bug, distinct from `AVERROR_BUG`
pub const AVERROR_BUG2: c_int = fferrtag(b'B', b'U', b'G', b' ');

/// Buffer too small
pub const AVERROR_BUFFER_TOO_SMALL: c_int = fferrtag(b'B', b'U', b'F', b'S');

/// Decoder not found
pub const AVERROR_DECODER_NOT_FOUND: c_int = fferrtag(0xF8, b'D', b'E', b'C');

/// Demuxer not found
pub const AVERROR_DEMUXER_NOT_FOUND: c_int = fferrtag(0xF8, b'D', b'E', b'M');

/// Encoder not found
pub const AVERROR_ENCODER_NOT_FOUND: c_int = fferrtag(0xF8, b'E', b'N', b'C');

/// Exit requested
pub const AVERROR_EXIT: c_int = fferrtag(b'E', b'X', b'I', b'T');

/// External error
pub const AVERROR_EXTERNAL: c_int = fferrtag(b'E', b'X', b'T', b' ');

/// Filter not found
pub const AVERROR_FILTER_NOT_FOUND: c_int = fferrtag(0xF8, b'F', b'I', b'L');

/// Invalid data found
pub const AVERROR_INVALIDDATA: c_int = fferrtag(b'I', b'N', b'D', b'A');

/// Muxer not found
pub const AVERROR_MUXER_NOT_FOUND: c_int = fferrtag(0xF8, b'M', b'U', b'X');

/// Option not found
pub const AVERROR_OPTION_NOT_FOUND: c_int = fferrtag(0xF8, b'O', b'P', b'T');

/// Not yet implemented
pub const AVERROR_PATCHWELCOME: c_int = fferrtag(b'P', b'A', b'W', b'E');

/// Protocol not found
pub const AVERROR_PROTOCOL_NOT_FOUND: c_int = fferrtag(0xF8, b'P', b'R', b'O');

/// Stream not found
pub const AVERROR_STREAM_NOT_FOUND: c_int = fferrtag(0xF8, b'S', b'T', b'R');

/// Unknown error
pub const AVERROR_UNKNOWN: c_int = fferrtag(b'U', b'N', b'K', b'N');

/// Experimental feature
pub const AVERROR_EXPERIMENTAL: c_int = -0x2bb2afa8;

/// Input changed between calls
pub const AVERROR_INPUT_CHANGED: c_int = -0x636e6701;

/// Output changed between calls
pub const AVERROR_OUTPUT_CHANGED: c_int = -0x636e6702;

// HTTP and RTSP status classes
pub const AVERROR_HTTP_BAD_REQUEST: c_int = fferrtag(0xF8, b'4', b'0', b'0');
pub const AVERROR_HTTP_UNAUTHORIZED: c_int = fferrtag(0xF8, b'4', b'0', b'1');
pub const AVERROR_HTTP_FORBIDDEN: c_int = fferrtag(0xF8, b'4', b'0', b'3');
pub const AVERROR_HTTP_NOT_FOUND: c_int = fferrtag(0xF8, b'4', b'0', b'4');
pub const AVERROR_HTTP_OTHER_4XX: c_int = fferrtag(0xF8, b'4', b'X', b'X');
pub const AVERROR_HTTP_SERVER_ERROR: c_int = fferrtag(0xF8, b'5', b'X', b'X');

/// Size of the buffer `av_strerror` needs for any message
pub const AV_ERROR_MAX_STRING_SIZE: usize = 64;

// POSIX error codes (negated) - platform specific
// Note: FFmpeg negates errno values, so we need platform-specific values

/// Resource temporarily unavailable (try again)
/// Linux: EAGAIN = 11, macOS: EAGAIN = 35
#[cfg(target_os = "macos")]
pub const AVERROR_EAGAIN: c_int = -35;

#[cfg(target_os = "linux")]
pub const AVERROR_EAGAIN: c_int = -11;

#[cfg(target_os = "windows")]
pub const AVERROR_EAGAIN: c_int = -11; // WSAEWOULDBLOCK maps to 11

#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
pub const AVERROR_EAGAIN: c_int = -11;

/// Operation not permitted
pub const AVERROR_EPERM: c_int = averror(1);

/// No such file or directory
pub const AVERROR_ENOENT: c_int = averror(2);

/// I/O error
pub const AVERROR_EIO: c_int = averror(5);

/// Out of memory
/// Same across platforms (12)
pub const AVERROR_ENOMEM: c_int = averror(12);

/// Invalid argument
/// Same across platforms (22)
pub const AVERROR_EINVAL: c_int = averror(22);

/// Result too large
pub const AVERROR_ERANGE: c_int = averror(34);

// ============================================================================
// Error Tag Helpers
// ============================================================================

/// Create FFmpeg error tag from 4 bytes (`FFERRTAG`)
pub const fn fferrtag(a: u8, b: u8, c: u8, d: u8) -> c_int {
  -((a as c_int) | ((b as c_int) << 8) | ((c as c_int) << 16) | ((d as c_int) << 24))
}

/// `AVERROR(e)`: negate a POSIX errno
pub const fn averror(errno: c_int) -> c_int {
  -errno
}

/// `AVUNERROR(e)`: recover the errno from a negated code
pub const fn avunerror(code: c_int) -> c_int {
  -code
}

// ============================================================================
// Enumerated Codes
// ============================================================================

c_enum! {
  /// Every tagged error code of `error.h`
  pub enum ErrorCode {
    BsfNotFound = AVERROR_BSF_NOT_FOUND,
    Bug = AVERROR_BUG,
    BufferTooSmall = AVERROR_BUFFER_TOO_SMALL,
    DecoderNotFound = AVERROR_DECODER_NOT_FOUND,
    DemuxerNotFound = AVERROR_DEMUXER_NOT_FOUND,
    EncoderNotFound = AVERROR_ENCODER_NOT_FOUND,
    Eof = AVERROR_EOF,
    Exit = AVERROR_EXIT,
    External = AVERROR_EXTERNAL,
    FilterNotFound = AVERROR_FILTER_NOT_FOUND,
    InvalidData = AVERROR_INVALIDDATA,
    MuxerNotFound = AVERROR_MUXER_NOT_FOUND,
    OptionNotFound = AVERROR_OPTION_NOT_FOUND,
    PatchWelcome = AVERROR_PATCHWELCOME,
    ProtocolNotFound = AVERROR_PROTOCOL_NOT_FOUND,
    StreamNotFound = AVERROR_STREAM_NOT_FOUND,
    Bug2 = AVERROR_BUG2,
    Unknown = AVERROR_UNKNOWN,
    Experimental = AVERROR_EXPERIMENTAL,
    InputChanged = AVERROR_INPUT_CHANGED,
    OutputChanged = AVERROR_OUTPUT_CHANGED,
    HttpBadRequest = AVERROR_HTTP_BAD_REQUEST,
    HttpUnauthorized = AVERROR_HTTP_UNAUTHORIZED,
    HttpForbidden = AVERROR_HTTP_FORBIDDEN,
    HttpNotFound = AVERROR_HTTP_NOT_FOUND,
    HttpOther4xx = AVERROR_HTTP_OTHER_4XX,
    HttpServerError = AVERROR_HTTP_SERVER_ERROR,
  }
}

impl ErrorCode {
  /// The message libavutil prints for this code
  pub fn description(&self) -> &'static str {
    match self {
      Self::BsfNotFound => "Bitstream filter not found",
      Self::Bug | Self::Bug2 => "Internal bug, should not have happened",
      Self::BufferTooSmall => "Buffer too small",
      Self::DecoderNotFound => "Decoder not found",
      Self::DemuxerNotFound => "Demuxer not found",
      Self::EncoderNotFound => "Encoder not found",
      Self::Eof => "End of file",
      Self::Exit => "Immediate exit requested",
      Self::External => "Generic error in an external library",
      Self::FilterNotFound => "Filter not found",
      Self::InvalidData => "Invalid data found when processing input",
      Self::MuxerNotFound => "Muxer not found",
      Self::OptionNotFound => "Option not found",
      Self::PatchWelcome => "Not yet implemented in FFmpeg, patches welcome",
      Self::ProtocolNotFound => "Protocol not found",
      Self::StreamNotFound => "Stream not found",
      Self::Unknown => "Unknown error occurred",
      Self::Experimental => "Experimental feature",
      Self::InputChanged => "Input changed",
      Self::OutputChanged => "Output changed",
      Self::HttpBadRequest => "Server returned 400 Bad Request",
      Self::HttpUnauthorized => "Server returned 401 Unauthorized (authorization failed)",
      Self::HttpForbidden => "Server returned 403 Forbidden (access denied)",
      Self::HttpNotFound => "Server returned 404 Not Found",
      Self::HttpOther4xx => "Server returned 4XX Client Error, but not one of 40{0,1,3,4}",
      Self::HttpServerError => "Server returned 5XX Server Error reply",
    }
  }
}

// ============================================================================
// Entry Points
// ============================================================================

avutil_symbols! {
  /// `error.h`
  pub struct ErrorApi {
    /// Describe `errnum` in `errbuf`; returns < 0 when no description exists
    av_strerror: unsafe extern "C" fn(errnum: c_int, errbuf: *mut c_char, errbuf_size: usize) -> c_int;
  }
}

impl ErrorApi {
  /// Message for `code`, as produced by the native library
  pub fn message(&self, code: c_int) -> String {
    let mut buf = [0 as c_char; AV_ERROR_MAX_STRING_SIZE];
    unsafe {
      (self.av_strerror)(code, buf.as_mut_ptr(), buf.len());
      CStr::from_ptr(buf.as_ptr()).to_string_lossy().into_owned()
    }
  }
}

// ============================================================================
// Error Type
// ============================================================================

/// libavutil error with code and message
#[derive(Clone, PartialEq, Eq)]
pub struct AvError {
  /// Error code (negative)
  pub code: c_int,
  /// Human-readable message
  pub message: String,
}

impl AvError {
  /// Create error from an FFmpeg error code
  ///
  /// Uses `av_strerror` when the library is bound, the known description
  /// otherwise.
  pub fn from_code(code: c_int) -> Self {
    let message = match loader::loaded() {
      Some(lib) => lib.error.message(code),
      None => fallback_message(code),
    };
    Self { code, message }
  }

  /// Create error with custom message
  pub fn new(code: c_int, message: impl Into<String>) -> Self {
    Self {
      code,
      message: message.into(),
    }
  }

  /// The tagged code, if this is one
  pub fn kind(&self) -> Option<ErrorCode> {
    ErrorCode::from_raw(self.code)
  }

  /// Check if this is EAGAIN (resource temporarily unavailable)
  #[inline]
  pub fn is_eagain(&self) -> bool {
    self.code == AVERROR_EAGAIN
  }

  /// Check if this is EOF
  #[inline]
  pub fn is_eof(&self) -> bool {
    self.code == AVERROR_EOF
  }

  /// Check if this is an invalid argument error
  #[inline]
  pub fn is_invalid(&self) -> bool {
    self.code == AVERROR_EINVAL
  }

  /// Check if this is an out of memory error
  #[inline]
  pub fn is_oom(&self) -> bool {
    self.code == AVERROR_ENOMEM
  }
}

fn fallback_message(code: c_int) -> String {
  match ErrorCode::from_raw(code) {
    Some(kind) => kind.description().to_string(),
    None if code < 0 => std::io::Error::from_raw_os_error(avunerror(code)).to_string(),
    None => format!("Error number {} occurred", code),
  }
}

impl fmt::Debug for AvError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("AvError")
      .field("code", &self.code)
      .field("message", &self.message)
      .finish()
  }
}

impl fmt::Display for AvError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "libavutil error {}: {}", self.code, self.message)
  }
}

impl std::error::Error for AvError {}

// ============================================================================
// Result Type
// ============================================================================

/// Result type for native calls
pub type AvResult<T> = Result<T, AvError>;

// ============================================================================
// Error Checking
// ============================================================================

/// Check a native return code and convert to Result
///
/// Returns Ok with the value if >= 0, Err with AvError if < 0
#[inline]
pub fn check_error(ret: c_int) -> AvResult<c_int> {
  if ret < 0 {
    Err(AvError::from_code(ret))
  } else {
    Ok(ret)
  }
}

/// Check a native return code, ignoring EAGAIN
///
/// Returns Ok(Some(value)) if >= 0, Ok(None) if EAGAIN, Err otherwise
#[inline]
pub fn check_error_except_eagain(ret: c_int) -> AvResult<Option<c_int>> {
  if ret >= 0 {
    Ok(Some(ret))
  } else if ret == AVERROR_EAGAIN {
    Ok(None)
  } else {
    Err(AvError::from_code(ret))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ffi::testing;

  #[test]
  fn test_error_codes() {
    assert_eq!(AVERROR_EOF, -541_478_725);
    assert_eq!(AVERROR_INVALIDDATA, -1_094_995_529);
    assert_eq!(AVERROR_BSF_NOT_FOUND, -1_179_861_752);
    assert_eq!(AVERROR_HTTP_NOT_FOUND, -875_574_520);
    assert_eq!(AVERROR_BUG2, -541_545_794);
    assert_eq!(AVERROR_EXPERIMENTAL, -733_130_664);
    assert_eq!(AVERROR_ENOMEM, -12);
    assert!(AVERROR_EAGAIN < 0);
  }

  #[test]
  fn test_error_code_enum() {
    assert_eq!(ErrorCode::ALL.len(), 27);
    assert_eq!(ErrorCode::from_raw(AVERROR_EOF), Some(ErrorCode::Eof));
    assert_eq!(ErrorCode::from_raw(AVERROR_EINVAL), None);
    assert_eq!(ErrorCode::HttpServerError.as_raw(), AVERROR_HTTP_SERVER_ERROR);
  }

  #[test]
  fn test_check_error() {
    assert!(check_error(0).is_ok());
    assert!(check_error(100).is_ok());
    assert!(check_error(-1).is_err());
    assert!(check_error(AVERROR_EAGAIN).is_err());
  }

  #[test]
  fn test_check_error_except_eagain() {
    assert_eq!(check_error_except_eagain(0).unwrap(), Some(0));
    assert_eq!(check_error_except_eagain(AVERROR_EAGAIN).unwrap(), None);
    assert!(check_error_except_eagain(AVERROR_EINVAL).is_err());
  }

  #[test]
  fn test_fallback_message() {
    assert_eq!(fallback_message(AVERROR_EOF), "End of file");
    assert!(!fallback_message(AVERROR_ENOMEM).is_empty());
    let err = AvError::new(AVERROR_INVALIDDATA, "bad");
    assert_eq!(err.kind(), Some(ErrorCode::InvalidData));
    assert_eq!(err.to_string(), format!("libavutil error {}: bad", AVERROR_INVALIDDATA));
  }

  #[test]
  fn test_native_strerror_describes_every_code() {
    let Some(lib) = testing::native() else {
      return;
    };

    for code in ErrorCode::ALL {
      let mut buf = [0 as c_char; AV_ERROR_MAX_STRING_SIZE];
      unsafe { (lib.error.av_strerror)(code.as_raw(), buf.as_mut_ptr(), buf.len()) };
      let message = unsafe { CStr::from_ptr(buf.as_ptr()) }.to_string_lossy();
      assert!(!message.is_empty(), "{:?} has no description", code);
    }
  }
}
