//! `file.h`: read-only file mapping

use std::os::raw::{c_char, c_int, c_void};

avutil_symbols! {
  pub struct FileApi {
    /// Map (or read, where mmap is unavailable) a whole file; release with `av_file_unmap`
    av_file_map: unsafe extern "C" fn(
      filename: *const c_char,
      bufptr: *mut *mut u8,
      size: *mut usize,
      log_offset: c_int,
      log_ctx: *mut c_void,
    ) -> c_int;
    av_file_unmap: unsafe extern "C" fn(bufptr: *mut u8, size: usize);
    /// Create a unique temporary file and return its descriptor; `*filename` is `av_malloc`ed
    av_tempfile: unsafe extern "C" fn(
      prefix: *const c_char,
      filename: *mut *mut c_char,
      log_offset: c_int,
      log_ctx: *mut c_void,
    ) -> c_int;
  }
}
