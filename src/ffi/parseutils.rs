//! `parseutils.h`: sizes, rates, colors and times given as strings

use std::os::raw::{c_char, c_int, c_void};

use super::types::AVRational;

/// C `time_t`
#[cfg(not(windows))]
#[allow(non_camel_case_types)]
pub type time_t = std::os::raw::c_long;
#[cfg(windows)]
#[allow(non_camel_case_types)]
pub type time_t = i64;

/// C `struct tm` as filled by `av_small_strptime`
#[repr(C)]
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy)]
pub struct tm {
  pub tm_sec: c_int,
  pub tm_min: c_int,
  pub tm_hour: c_int,
  pub tm_mday: c_int,
  /// Months since January
  pub tm_mon: c_int,
  /// Years since 1900
  pub tm_year: c_int,
  pub tm_wday: c_int,
  pub tm_yday: c_int,
  pub tm_isdst: c_int,
  #[cfg(not(windows))]
  pub tm_gmtoff: std::os::raw::c_long,
  #[cfg(not(windows))]
  pub tm_zone: *const c_char,
}

impl Default for tm {
  fn default() -> Self {
    Self {
      tm_sec: 0,
      tm_min: 0,
      tm_hour: 0,
      tm_mday: 0,
      tm_mon: 0,
      tm_year: 0,
      tm_wday: 0,
      tm_yday: 0,
      tm_isdst: 0,
      #[cfg(not(windows))]
      tm_gmtoff: 0,
      #[cfg(not(windows))]
      tm_zone: std::ptr::null(),
    }
  }
}

avutil_symbols! {
  pub struct ParseApi {
    /// Accepts "num:den", "num/den" or a decimal; the result is reduced to `max`
    av_parse_ratio: unsafe extern "C" fn(
      q: *mut AVRational,
      str_: *const c_char,
      max: c_int,
      log_offset: c_int,
      log_ctx: *mut c_void,
    ) -> c_int;
    /// "WxH" or an abbreviation such as "hd720"
    av_parse_video_size: unsafe extern "C" fn(width_ptr: *mut c_int, height_ptr: *mut c_int, str_: *const c_char) -> c_int;
    /// A ratio or an abbreviation such as "ntsc"
    av_parse_video_rate: unsafe extern "C" fn(rate: *mut AVRational, str_: *const c_char) -> c_int;
    /// Fill four RGBA bytes; `slen` < 0 means NUL terminated
    av_parse_color: unsafe extern "C" fn(
      rgba_color: *mut u8,
      color_string: *const c_char,
      slen: c_int,
      log_ctx: *mut c_void,
    ) -> c_int;
    /// Null past the last known color; `*rgb` points at three static bytes
    av_get_known_color_name: unsafe extern "C" fn(color_idx: c_int, rgb: *mut *const u8) -> *const c_char;
    /// Date or, with `duration` set, a duration; microseconds
    av_parse_time: unsafe extern "C" fn(timeval: *mut i64, timestr: *const c_char, duration: c_int) -> c_int;
    /// Copy the value of `tag1` from a "tag=value&..." string into `arg`
    av_find_info_tag: unsafe extern "C" fn(
      arg: *mut c_char,
      arg_size: c_int,
      tag1: *const c_char,
      info: *const c_char,
    ) -> c_int;
  }
  optional {
    /// Returns a pointer past the parsed text, or null on mismatch
    av_small_strptime: unsafe extern "C" fn(p: *const c_char, fmt: *const c_char, dt: *mut tm) -> *mut c_char;
    av_timegm: unsafe extern "C" fn(tm: *mut tm) -> time_t;
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ffi::testing;
  use std::ffi::CStr;
  use std::ptr;

  #[test]
  #[cfg(all(target_pointer_width = "64", not(windows)))]
  fn test_tm_layout() {
    assert_eq!(std::mem::size_of::<tm>(), 56);
    assert_eq!(std::mem::offset_of!(tm, tm_gmtoff), 40);
  }

  #[test]
  fn test_native_video_size_and_rate() {
    let Some(lib) = testing::native() else {
      return;
    };
    let api = &lib.parse;

    unsafe {
      let (mut w, mut h) = (0, 0);
      assert_eq!((api.av_parse_video_size)(&mut w, &mut h, c"hd720".as_ptr()), 0);
      assert_eq!((w, h), (1280, 720));
      assert_eq!((api.av_parse_video_size)(&mut w, &mut h, c"640x480".as_ptr()), 0);
      assert_eq!((w, h), (640, 480));
      assert!((api.av_parse_video_size)(&mut w, &mut h, c"wide".as_ptr()) < 0);

      let mut rate = AVRational::default();
      assert_eq!((api.av_parse_video_rate)(&mut rate, c"ntsc".as_ptr()), 0);
      assert_eq!(rate, AVRational::new(30000, 1001));

      let mut ratio = AVRational::default();
      assert_eq!((api.av_parse_ratio)(&mut ratio, c"16:9".as_ptr(), 255, 0, ptr::null_mut()), 0);
      assert_eq!(ratio, AVRational::new(16, 9));
    }
  }

  #[test]
  fn test_native_colors() {
    let Some(lib) = testing::native() else {
      return;
    };
    let api = &lib.parse;

    unsafe {
      let mut rgba = [0u8; 4];
      assert_eq!((api.av_parse_color)(rgba.as_mut_ptr(), c"red".as_ptr(), -1, ptr::null_mut()), 0);
      assert_eq!(rgba, [0xff, 0, 0, 0xff]);
      assert_eq!((api.av_parse_color)(rgba.as_mut_ptr(), c"0x11223344".as_ptr(), -1, ptr::null_mut()), 0);
      assert_eq!(rgba, [0x11, 0x22, 0x33, 0x44]);

      let mut rgb = ptr::null();
      let name = (api.av_get_known_color_name)(0, &mut rgb);
      assert_eq!(CStr::from_ptr(name).to_str().unwrap(), "AliceBlue");
      assert_eq!(std::slice::from_raw_parts(rgb, 3), &[0xf0, 0xf8, 0xff]);
      assert!((api.av_get_known_color_name)(100_000, &mut rgb).is_null());
    }
  }

  #[test]
  fn test_native_time_and_tags() {
    let Some(lib) = testing::native() else {
      return;
    };
    let api = &lib.parse;

    unsafe {
      let mut us = 0i64;
      assert_eq!((api.av_parse_time)(&mut us, c"1:00:00.5".as_ptr(), 1), 0);
      assert_eq!(us, 3_600_500_000);
      assert_eq!((api.av_parse_time)(&mut us, c"-2.25".as_ptr(), 1), 0);
      assert_eq!(us, -2_250_000);

      let mut arg = [0 as c_char; 16];
      let found = (api.av_find_info_tag)(arg.as_mut_ptr(), 16, c"baz".as_ptr(), c"foo=bar&baz=qux".as_ptr());
      assert_eq!(found, 1);
      assert_eq!(CStr::from_ptr(arg.as_ptr()).to_str().unwrap(), "qux");
    }
  }

  #[test]
  fn test_native_strptime() {
    let Some(lib) = testing::native() else {
      return;
    };
    let (Some(strptime), Some(timegm)) = (lib.parse.av_small_strptime, lib.parse.av_timegm) else {
      return;
    };

    unsafe {
      let mut dt = tm::default();
      let end = strptime(c"1970-01-02 00:00:30".as_ptr(), c"%Y-%m-%d %H:%M:%S".as_ptr(), &mut dt);
      assert!(!end.is_null());
      assert_eq!(*end, 0);
      assert_eq!((dt.tm_year, dt.tm_mon, dt.tm_mday), (70, 0, 2));
      assert_eq!(timegm(&mut dt), 86_430);

      assert!(strptime(c"noon".as_ptr(), c"%H:%M".as_ptr(), &mut dt).is_null());
    }
  }
}
