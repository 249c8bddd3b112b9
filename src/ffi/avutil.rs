//! libavutil general entry points
//!
//! Library identification, media/picture type names and the random seed.

use std::os::raw::{c_char, c_int, c_uint};

avutil_symbols! {
  /// `avutil.h`, `random_seed.h`
  pub struct UtilApi {
    /// `LIBAVUTIL_VERSION_INT` of the loaded library
    avutil_version: unsafe extern "C" fn() -> c_uint;
    /// Build-time configuration string
    avutil_configuration: unsafe extern "C" fn() -> *const c_char;
    /// License string
    avutil_license: unsafe extern "C" fn() -> *const c_char;
    /// Name of an `AVMediaType`, or null when unknown
    av_get_media_type_string: unsafe extern "C" fn(media_type: c_int) -> *const c_char;
    /// Single letter for an `AVPictureType` ('?' when unknown)
    av_get_picture_type_char: unsafe extern "C" fn(pict_type: c_int) -> c_char;
    /// Seed suitable for a PRNG, from the best source available
    av_get_random_seed: unsafe extern "C" fn() -> u32;
  }
}
