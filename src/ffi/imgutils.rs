//! `imgutils.h` and `pixelutils.h`: image plane arithmetic and block SAD
//!
//! Plane arrays are always four entries (`uint8_t *data[4]`, `int linesize[4]`),
//! passed as pointers to their first element.

use std::os::raw::{c_int, c_uint, c_void};

use super::pixdesc::AVPixFmtDescriptor;
use super::types::AVRational;

/// Sum of absolute differences between two blocks
pub type AVPixelUtilsSadFn =
  unsafe extern "C" fn(src1: *const u8, stride1: isize, src2: *const u8, stride2: isize) -> c_int;

avutil_symbols! {
  pub struct ImgutilsApi {
    av_image_fill_max_pixsteps: unsafe extern "C" fn(
      max_pixsteps: *mut c_int,
      max_pixstep_comps: *mut c_int,
      pixdesc: *const AVPixFmtDescriptor,
    );
    av_image_get_linesize: unsafe extern "C" fn(pix_fmt: c_int, width: c_int, plane: c_int) -> c_int;
    av_image_fill_linesizes: unsafe extern "C" fn(linesizes: *mut c_int, pix_fmt: c_int, width: c_int) -> c_int;
    /// Returns the total size of the image or a negative error
    av_image_fill_pointers: unsafe extern "C" fn(
      data: *mut *mut u8,
      pix_fmt: c_int,
      height: c_int,
      ptr: *mut u8,
      linesizes: *const c_int,
    ) -> c_int;
    /// Planes share one `av_malloc` block owned by `pointers[0]`
    av_image_alloc: unsafe extern "C" fn(
      pointers: *mut *mut u8,
      linesizes: *mut c_int,
      w: c_int,
      h: c_int,
      pix_fmt: c_int,
      align: c_int,
    ) -> c_int;
    av_image_copy_plane: unsafe extern "C" fn(
      dst: *mut u8,
      dst_linesize: c_int,
      src: *const u8,
      src_linesize: c_int,
      bytewidth: c_int,
      height: c_int,
    );
    av_image_copy: unsafe extern "C" fn(
      dst_data: *mut *mut u8,
      dst_linesizes: *mut c_int,
      src_data: *const *const u8,
      src_linesizes: *const c_int,
      pix_fmt: c_int,
      width: c_int,
      height: c_int,
    );
    /// Point `dst_data` into `src` without copying
    av_image_fill_arrays: unsafe extern "C" fn(
      dst_data: *mut *mut u8,
      dst_linesize: *mut c_int,
      src: *const u8,
      pix_fmt: c_int,
      width: c_int,
      height: c_int,
      align: c_int,
    ) -> c_int;
    av_image_get_buffer_size: unsafe extern "C" fn(pix_fmt: c_int, width: c_int, height: c_int, align: c_int) -> c_int;
    av_image_copy_to_buffer: unsafe extern "C" fn(
      dst: *mut u8,
      dst_size: c_int,
      src_data: *const *const u8,
      src_linesize: *const c_int,
      pix_fmt: c_int,
      width: c_int,
      height: c_int,
      align: c_int,
    ) -> c_int;
    /// 0 when every pixel of a `w`x`h` image is addressable with a signed int
    av_image_check_size: unsafe extern "C" fn(w: c_uint, h: c_uint, log_offset: c_int, log_ctx: *mut c_void) -> c_int;
    av_image_check_sar: unsafe extern "C" fn(w: c_uint, h: c_uint, sar: AVRational) -> c_int;
  }
}

avutil_symbols! {
  pub struct PixelUtilsApi {
    /// Block of `1 << w_bits` by `1 << h_bits`; `aligned` 0, 1 (src2) or 2 (both)
    av_pixelutils_get_sad_fn: unsafe extern "C" fn(
      w_bits: c_int,
      h_bits: c_int,
      aligned: c_int,
      log_ctx: *mut c_void,
    ) -> Option<AVPixelUtilsSadFn>;
  }
}
