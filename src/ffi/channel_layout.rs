//! `channel_layout.h`: speaker masks and standard layouts

use std::os::raw::{c_char, c_int, c_uint};

pub const AV_CH_FRONT_LEFT: u64 = 0x0000_0001;
pub const AV_CH_FRONT_RIGHT: u64 = 0x0000_0002;
pub const AV_CH_FRONT_CENTER: u64 = 0x0000_0004;
pub const AV_CH_LOW_FREQUENCY: u64 = 0x0000_0008;
pub const AV_CH_BACK_LEFT: u64 = 0x0000_0010;
pub const AV_CH_BACK_RIGHT: u64 = 0x0000_0020;
pub const AV_CH_FRONT_LEFT_OF_CENTER: u64 = 0x0000_0040;
pub const AV_CH_FRONT_RIGHT_OF_CENTER: u64 = 0x0000_0080;
pub const AV_CH_BACK_CENTER: u64 = 0x0000_0100;
pub const AV_CH_SIDE_LEFT: u64 = 0x0000_0200;
pub const AV_CH_SIDE_RIGHT: u64 = 0x0000_0400;
pub const AV_CH_TOP_CENTER: u64 = 0x0000_0800;
pub const AV_CH_TOP_FRONT_LEFT: u64 = 0x0000_1000;
pub const AV_CH_TOP_FRONT_CENTER: u64 = 0x0000_2000;
pub const AV_CH_TOP_FRONT_RIGHT: u64 = 0x0000_4000;
pub const AV_CH_TOP_BACK_LEFT: u64 = 0x0000_8000;
pub const AV_CH_TOP_BACK_CENTER: u64 = 0x0001_0000;
pub const AV_CH_TOP_BACK_RIGHT: u64 = 0x0002_0000;
/// Stereo downmix
pub const AV_CH_STEREO_LEFT: u64 = 0x2000_0000;
/// See `AV_CH_STEREO_LEFT`
pub const AV_CH_STEREO_RIGHT: u64 = 0x4000_0000;
pub const AV_CH_WIDE_LEFT: u64 = 0x0000_0000_8000_0000;
pub const AV_CH_WIDE_RIGHT: u64 = 0x0000_0001_0000_0000;
pub const AV_CH_SURROUND_DIRECT_LEFT: u64 = 0x0000_0002_0000_0000;
pub const AV_CH_SURROUND_DIRECT_RIGHT: u64 = 0x0000_0004_0000_0000;
pub const AV_CH_LOW_FREQUENCY_2: u64 = 0x0000_0008_0000_0000;

/// The remaining bits carry a channel count rather than a speaker mask
pub const AV_CH_LAYOUT_NATIVE: u64 = 0x8000_0000_0000_0000;

pub const AV_CH_LAYOUT_MONO: u64 = AV_CH_FRONT_CENTER;
pub const AV_CH_LAYOUT_STEREO: u64 = AV_CH_FRONT_LEFT | AV_CH_FRONT_RIGHT;
pub const AV_CH_LAYOUT_2POINT1: u64 = AV_CH_LAYOUT_STEREO | AV_CH_LOW_FREQUENCY;
pub const AV_CH_LAYOUT_2_1: u64 = AV_CH_LAYOUT_STEREO | AV_CH_BACK_CENTER;
pub const AV_CH_LAYOUT_SURROUND: u64 = AV_CH_LAYOUT_STEREO | AV_CH_FRONT_CENTER;
pub const AV_CH_LAYOUT_3POINT1: u64 = AV_CH_LAYOUT_SURROUND | AV_CH_LOW_FREQUENCY;
pub const AV_CH_LAYOUT_4POINT0: u64 = AV_CH_LAYOUT_SURROUND | AV_CH_BACK_CENTER;
pub const AV_CH_LAYOUT_4POINT1: u64 = AV_CH_LAYOUT_4POINT0 | AV_CH_LOW_FREQUENCY;
pub const AV_CH_LAYOUT_2_2: u64 = AV_CH_LAYOUT_STEREO | AV_CH_SIDE_LEFT | AV_CH_SIDE_RIGHT;
pub const AV_CH_LAYOUT_QUAD: u64 = AV_CH_LAYOUT_STEREO | AV_CH_BACK_LEFT | AV_CH_BACK_RIGHT;
pub const AV_CH_LAYOUT_5POINT0: u64 = AV_CH_LAYOUT_SURROUND | AV_CH_SIDE_LEFT | AV_CH_SIDE_RIGHT;
pub const AV_CH_LAYOUT_5POINT1: u64 = AV_CH_LAYOUT_5POINT0 | AV_CH_LOW_FREQUENCY;
pub const AV_CH_LAYOUT_5POINT0_BACK: u64 = AV_CH_LAYOUT_SURROUND | AV_CH_BACK_LEFT | AV_CH_BACK_RIGHT;
pub const AV_CH_LAYOUT_5POINT1_BACK: u64 = AV_CH_LAYOUT_5POINT0_BACK | AV_CH_LOW_FREQUENCY;
pub const AV_CH_LAYOUT_6POINT0: u64 = AV_CH_LAYOUT_5POINT0 | AV_CH_BACK_CENTER;
pub const AV_CH_LAYOUT_6POINT0_FRONT: u64 =
  AV_CH_LAYOUT_2_2 | AV_CH_FRONT_LEFT_OF_CENTER | AV_CH_FRONT_RIGHT_OF_CENTER;
pub const AV_CH_LAYOUT_HEXAGONAL: u64 = AV_CH_LAYOUT_5POINT0_BACK | AV_CH_BACK_CENTER;
pub const AV_CH_LAYOUT_6POINT1: u64 = AV_CH_LAYOUT_5POINT1 | AV_CH_BACK_CENTER;
pub const AV_CH_LAYOUT_6POINT1_BACK: u64 = AV_CH_LAYOUT_5POINT1_BACK | AV_CH_BACK_CENTER;
pub const AV_CH_LAYOUT_6POINT1_FRONT: u64 = AV_CH_LAYOUT_6POINT0_FRONT | AV_CH_LOW_FREQUENCY;
pub const AV_CH_LAYOUT_7POINT0: u64 = AV_CH_LAYOUT_5POINT0 | AV_CH_BACK_LEFT | AV_CH_BACK_RIGHT;
pub const AV_CH_LAYOUT_7POINT0_FRONT: u64 =
  AV_CH_LAYOUT_5POINT0 | AV_CH_FRONT_LEFT_OF_CENTER | AV_CH_FRONT_RIGHT_OF_CENTER;
pub const AV_CH_LAYOUT_7POINT1: u64 = AV_CH_LAYOUT_5POINT1 | AV_CH_BACK_LEFT | AV_CH_BACK_RIGHT;
pub const AV_CH_LAYOUT_7POINT1_WIDE: u64 =
  AV_CH_LAYOUT_5POINT1 | AV_CH_FRONT_LEFT_OF_CENTER | AV_CH_FRONT_RIGHT_OF_CENTER;
pub const AV_CH_LAYOUT_7POINT1_WIDE_BACK: u64 =
  AV_CH_LAYOUT_5POINT1_BACK | AV_CH_FRONT_LEFT_OF_CENTER | AV_CH_FRONT_RIGHT_OF_CENTER;
pub const AV_CH_LAYOUT_OCTAGONAL: u64 =
  AV_CH_LAYOUT_5POINT0 | AV_CH_BACK_LEFT | AV_CH_BACK_CENTER | AV_CH_BACK_RIGHT;
pub const AV_CH_LAYOUT_STEREO_DOWNMIX: u64 = AV_CH_STEREO_LEFT | AV_CH_STEREO_RIGHT;

c_enum! {
  pub enum AVMatrixEncoding {
    None = 0,
    Dolby = 1,
    Dpl2 = 2,
    Dpl2x = 3,
    Dpl2z = 4,
    DolbyEx = 5,
    DolbyHeadphone = 6,
  }
}

avutil_symbols! {
  pub struct ChannelLayoutApi {
    /// Parses names ("5.1"), channel lists ("FL+FR"), counts ("6c") and masks
    av_get_channel_layout: unsafe extern "C" fn(name: *const c_char) -> u64;
    av_get_channel_layout_string: unsafe extern "C" fn(
      buf: *mut c_char,
      buf_size: c_int,
      nb_channels: c_int,
      channel_layout: u64,
    );
    av_get_channel_layout_nb_channels: unsafe extern "C" fn(channel_layout: u64) -> c_int;
    av_get_default_channel_layout: unsafe extern "C" fn(nb_channels: c_int) -> i64;
    /// Index of `channel` within `channel_layout`, negative when absent
    av_get_channel_layout_channel_index: unsafe extern "C" fn(channel_layout: u64, channel: u64) -> c_int;
    av_channel_layout_extract_channel: unsafe extern "C" fn(channel_layout: u64, index: c_int) -> u64;
    av_get_channel_name: unsafe extern "C" fn(channel: u64) -> *const c_char;
    av_get_channel_description: unsafe extern "C" fn(channel: u64) -> *const c_char;
    /// Enumerate the standard layouts; non-zero past the end
    av_get_standard_channel_layout: unsafe extern "C" fn(
      index: c_uint,
      layout: *mut u64,
      name: *mut *const c_char,
    ) -> c_int;
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ffi::testing;
  use std::ffi::CStr;
  use std::ptr;

  #[test]
  fn test_layout_masks() {
    assert_eq!(AV_CH_LAYOUT_STEREO, 0x3);
    assert_eq!(AV_CH_LAYOUT_5POINT1, 0x60F);
    assert_eq!(AV_CH_LAYOUT_5POINT1_BACK, 0x3F);
    assert_eq!(AV_CH_LAYOUT_7POINT1, 0x63F);
    assert_eq!(AV_CH_LAYOUT_OCTAGONAL.count_ones(), 8);
    assert_eq!(AV_CH_LAYOUT_STEREO_DOWNMIX, 0x6000_0000);
    assert_eq!(AVMatrixEncoding::DolbyHeadphone.as_raw(), 6);
  }

  #[test]
  fn test_native_layouts() {
    let Some(lib) = testing::native() else {
      return;
    };
    let api = &lib.channel_layout;

    unsafe {
      assert_eq!((api.av_get_channel_layout_nb_channels)(AV_CH_LAYOUT_5POINT1), 6);
      assert_eq!((api.av_get_channel_layout)(c"stereo".as_ptr()), AV_CH_LAYOUT_STEREO);
      assert_eq!((api.av_get_default_channel_layout)(2) as u64, AV_CH_LAYOUT_STEREO);
      assert_eq!(
        (api.av_get_channel_layout_channel_index)(AV_CH_LAYOUT_5POINT1, AV_CH_LOW_FREQUENCY),
        3
      );
      assert_eq!((api.av_channel_layout_extract_channel)(AV_CH_LAYOUT_STEREO, 1), AV_CH_FRONT_RIGHT);

      let name = CStr::from_ptr((api.av_get_channel_name)(AV_CH_FRONT_LEFT));
      assert_eq!(name.to_str().unwrap(), "FL");

      let mut buf = [0 as c_char; 64];
      (api.av_get_channel_layout_string)(buf.as_mut_ptr(), buf.len() as c_int, 0, AV_CH_LAYOUT_5POINT1);
      assert_eq!(CStr::from_ptr(buf.as_ptr()).to_str().unwrap(), "5.1(side)");

      let mut layout = 0u64;
      let mut layout_name = ptr::null();
      assert_eq!((api.av_get_standard_channel_layout)(0, &mut layout, &mut layout_name), 0);
      assert_eq!(layout, AV_CH_LAYOUT_MONO);
      assert_ne!((api.av_get_standard_channel_layout)(10_000, &mut layout, &mut layout_name), 0);
    }
  }
}
