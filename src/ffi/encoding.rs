//! `base64.h` and `lzo.h`

use std::os::raw::{c_char, c_int, c_void};

/// `AV_BASE64_SIZE`: output buffer size for encoding `x` bytes, NUL included
pub const fn av_base64_size(x: usize) -> usize {
  (x + 2) / 3 * 4 + 1
}

/// Bytes the LZO decoder may read past the end of the input
pub const AV_LZO_INPUT_PADDING: usize = 8;
/// Bytes the LZO decoder may write past the end of the output
pub const AV_LZO_OUTPUT_PADDING: usize = 12;

/// `av_lzo1x_decode` result bits
pub mod lzo_result {
  use std::os::raw::c_int;

  /// End of input reached before the end marker
  pub const INPUT_DEPLETED: c_int = 1;
  /// Decoded data did not fit
  pub const OUTPUT_FULL: c_int = 2;
  /// Back reference before the start of the output
  pub const INVALID_BACKPTR: c_int = 4;
  pub const ERROR: c_int = 8;
}

avutil_symbols! {
  pub struct Base64Api {
    /// Returns the decoded length or a negative error
    av_base64_decode: unsafe extern "C" fn(out: *mut u8, in_: *const c_char, out_size: c_int) -> c_int;
    /// Returns `out`, or null when `out_size` is below `AV_BASE64_SIZE(in_size)`
    av_base64_encode: unsafe extern "C" fn(out: *mut c_char, out_size: c_int, in_: *const u8, in_size: c_int) -> *mut c_char;
  }
}

avutil_symbols! {
  pub struct LzoApi {
    /// `outlen`/`inlen` hold the buffer sizes on entry and the unused remainders on return
    av_lzo1x_decode: unsafe extern "C" fn(
      out: *mut c_void,
      outlen: *mut c_int,
      in_: *const c_void,
      inlen: *mut c_int,
    ) -> c_int;
  }
}
