//! `bprint.h` and the escape helpers of `avstring.h`
//!
//! `AVBPrint` starts with a small buffer embedded in the struct itself and
//! `str` points at it until the text outgrows it. A live `AVBPrint` must
//! therefore never be moved; keep it boxed or pinned.

use std::os::raw::{c_char, c_int, c_uint};

use super::log::VaList;
use super::parseutils::tm;

#[repr(C)]
struct BPrintHeader {
  str_: *mut c_char,
  len: c_uint,
  size: c_uint,
  size_max: c_uint,
  reserved_internal_buffer: [c_char; 1],
}

const BPRINT_PADDING: usize = 1024 - std::mem::size_of::<BPrintHeader>();

/// Growable text buffer, padded to 1024 bytes
#[repr(C)]
pub struct AVBPrint {
  /// Text so far, always NUL terminated
  pub str_: *mut c_char,
  /// Length the text would have without truncation
  pub len: c_uint,
  /// Allocated size
  pub size: c_uint,
  pub size_max: c_uint,
  pub reserved_internal_buffer: [c_char; 1],
  pub reserved_padding: [c_char; BPRINT_PADDING],
}

impl AVBPrint {
  /// Storage for `av_bprint_init`; every field is set by the native init
  pub const fn zeroed() -> Self {
    Self {
      str_: std::ptr::null_mut(),
      len: 0,
      size: 0,
      size_max: 0,
      reserved_internal_buffer: [0; 1],
      reserved_padding: [0; BPRINT_PADDING],
    }
  }
}

impl std::fmt::Debug for AVBPrint {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("AVBPrint")
      .field("len", &self.len)
      .field("size", &self.size)
      .field("size_max", &self.size_max)
      .finish_non_exhaustive()
  }
}

/// `av_bprint_is_complete`: nothing was truncated
pub fn av_bprint_is_complete(buf: &AVBPrint) -> bool {
  buf.len < buf.size
}

/// Grow without limit
pub const AV_BPRINT_SIZE_UNLIMITED: c_uint = c_uint::MAX;
/// Use only the buffer embedded in the struct
pub const AV_BPRINT_SIZE_AUTOMATIC: c_uint = 1;
/// Count the length without storing anything
pub const AV_BPRINT_SIZE_COUNT_ONLY: c_uint = 0;

c_enum! {
  pub enum AVEscapeMode {
    /// Backslash or quote, whichever is shorter
    Auto = 0,
    Backslash = 1,
    Quote = 2,
  }
}

/// `AV_ESCAPE_FLAG_*`
pub mod escape_flag {
  use std::os::raw::c_int;

  /// Also escape whitespace
  pub const WHITESPACE: c_int = 0x01;
  /// Escape only the special characters given
  pub const STRICT: c_int = 0x02;
}

avutil_symbols! {
  pub struct BPrintApi {
    av_bprint_init: unsafe extern "C" fn(buf: *mut AVBPrint, size_init: c_uint, size_max: c_uint);
    /// Print into caller memory; never allocates
    av_bprint_init_for_buffer: unsafe extern "C" fn(buf: *mut AVBPrint, buffer: *mut c_char, size: c_uint);
    av_bprintf: unsafe extern "C" fn(buf: *mut AVBPrint, fmt: *const c_char, ...);
    av_vbprintf: unsafe extern "C" fn(buf: *mut AVBPrint, fmt: *const c_char, vl_arg: VaList);
    av_bprint_chars: unsafe extern "C" fn(buf: *mut AVBPrint, c: c_char, n: c_uint);
    av_bprint_append_data: unsafe extern "C" fn(buf: *mut AVBPrint, data: *const c_char, size: c_uint);
    av_bprint_strftime: unsafe extern "C" fn(buf: *mut AVBPrint, fmt: *const c_char, tm: *const tm);
    /// Reserve room for direct writes; the caller then bumps `len`
    av_bprint_get_buffer: unsafe extern "C" fn(
      buf: *mut AVBPrint,
      size: c_uint,
      mem: *mut *mut u8,
      actual_size: *mut c_uint,
    );
    av_bprint_clear: unsafe extern "C" fn(buf: *mut AVBPrint);
    /// With a non-null `ret_str` the text is handed over as an `av_malloc`ed copy
    av_bprint_finalize: unsafe extern "C" fn(buf: *mut AVBPrint, ret_str: *mut *mut c_char) -> c_int;
    av_bprint_escape: unsafe extern "C" fn(
      dstbuf: *mut AVBPrint,
      src: *const c_char,
      special_chars: *const c_char,
      mode: c_int,
      flags: c_int,
    );
    av_bprint_channel_layout: unsafe extern "C" fn(bp: *mut AVBPrint, nb_channels: c_int, channel_layout: u64);
  }
}
