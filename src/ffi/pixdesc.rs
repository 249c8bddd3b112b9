//! `pixdesc.h`: pixel format descriptors

use std::fmt;
use std::os::raw::{c_char, c_int};

/// Packed `plane:2, step_minus1:3, offset_plus1:3, shift:3, depth_minus1:4`
///
/// C bitfields are allocated from the least significant bit on
/// little-endian targets and from the most significant bit on big-endian ones.
#[repr(C)]
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AVComponentDescriptor {
  bits: u16,
}

const fn bit_offset(lsb_offset: u32, width: u32) -> u32 {
  if cfg!(target_endian = "big") {
    16 - lsb_offset - width
  } else {
    lsb_offset
  }
}

const fn get_bits(bits: u16, lsb_offset: u32, width: u32) -> u8 {
  ((bits >> bit_offset(lsb_offset, width)) & ((1 << width) - 1)) as u8
}

const fn put_bits(value: u8, lsb_offset: u32, width: u32) -> u16 {
  ((value as u16) & ((1 << width) - 1)) << bit_offset(lsb_offset, width)
}

impl AVComponentDescriptor {
  pub const fn new(plane: u8, step_minus1: u8, offset_plus1: u8, shift: u8, depth_minus1: u8) -> Self {
    Self {
      bits: put_bits(plane, 0, 2)
        | put_bits(step_minus1, 2, 3)
        | put_bits(offset_plus1, 5, 3)
        | put_bits(shift, 8, 3)
        | put_bits(depth_minus1, 11, 4),
    }
  }

  pub const fn from_bits(bits: u16) -> Self {
    Self { bits }
  }

  pub const fn bits(self) -> u16 {
    self.bits
  }

  /// Plane holding the component
  pub const fn plane(self) -> u8 {
    get_bits(self.bits, 0, 2)
  }

  /// Elements (bits for bitstream formats) between horizontally adjacent pixels, minus 1
  pub const fn step_minus1(self) -> u8 {
    get_bits(self.bits, 2, 3)
  }

  /// Elements (bits for bitstream formats) before the component of the first pixel, plus 1
  pub const fn offset_plus1(self) -> u8 {
    get_bits(self.bits, 5, 3)
  }

  /// Right shift to extract the component value
  pub const fn shift(self) -> u8 {
    get_bits(self.bits, 8, 3)
  }

  pub const fn depth_minus1(self) -> u8 {
    get_bits(self.bits, 11, 4)
  }

  pub const fn depth(self) -> u8 {
    self.depth_minus1() + 1
  }

  pub const fn step(self) -> u8 {
    self.step_minus1() + 1
  }
}

impl fmt::Debug for AVComponentDescriptor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("AVComponentDescriptor")
      .field("plane", &self.plane())
      .field("step_minus1", &self.step_minus1())
      .field("offset_plus1", &self.offset_plus1())
      .field("shift", &self.shift())
      .field("depth_minus1", &self.depth_minus1())
      .finish()
  }
}

/// How a pixel format is laid out in memory
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct AVPixFmtDescriptor {
  pub name: *const c_char,
  /// 1-4; for hwaccel formats the count of the underlying surface
  pub nb_components: u8,
  /// Horizontal chroma subsampling as a right shift
  pub log2_chroma_w: u8,
  pub log2_chroma_h: u8,
  /// `pix_fmt_flag` bits
  pub flags: u64,
  /// Luma/red first, then chroma or green/blue, alpha last
  pub comp: [AVComponentDescriptor; 4],
  /// Comma separated alternative names, or null
  pub alias: *const c_char,
}

impl AVPixFmtDescriptor {
  pub fn has_flag(&self, flag: u64) -> bool {
    self.flags & flag != 0
  }

  /// Used components
  pub fn components(&self) -> &[AVComponentDescriptor] {
    &self.comp[..usize::from(self.nb_components.min(4))]
  }
}

/// `AV_PIX_FMT_FLAG_*`
pub mod pix_fmt_flag {
  /// Big-endian multi-byte components
  pub const BE: u64 = 1 << 0;
  /// Palette in `data[1]`
  pub const PAL: u64 = 1 << 1;
  /// All values of a component are bit-wise packed end to end
  pub const BITSTREAM: u64 = 1 << 2;
  /// Hardware surface
  pub const HWACCEL: u64 = 1 << 3;
  /// At least 2 components in separate planes
  pub const PLANAR: u64 = 1 << 4;
  /// Contains RGB-like data rather than YUV
  pub const RGB: u64 = 1 << 5;
  /// Fixed palette in `data[1]` (bgr8 and friends)
  pub const PSEUDOPAL: u64 = 1 << 6;
  /// Has an alpha channel, always the last component
  pub const ALPHA: u64 = 1 << 7;
}

/// `FF_LOSS_*` returned by `av_get_pix_fmt_loss`
pub mod loss_flag {
  use std::os::raw::c_int;

  pub const RESOLUTION: c_int = 0x0001;
  pub const DEPTH: c_int = 0x0002;
  /// RGB to YUV or the other way
  pub const COLORSPACE: c_int = 0x0004;
  pub const ALPHA: c_int = 0x0008;
  /// Loss due to color quantization
  pub const COLORQUANT: c_int = 0x0010;
  pub const CHROMA: c_int = 0x0020;
}

avutil_symbols! {
  pub struct PixdescApi {
    /// Read `w` values of component `c` from line `y` starting at `x`
    av_read_image_line: unsafe extern "C" fn(
      dst: *mut u16,
      data: *const *const u8,
      linesize: *const c_int,
      desc: *const AVPixFmtDescriptor,
      x: c_int,
      y: c_int,
      c: c_int,
      w: c_int,
      read_pal_component: c_int,
    );
    av_write_image_line: unsafe extern "C" fn(
      src: *const u16,
      data: *const *mut u8,
      linesize: *const c_int,
      desc: *const AVPixFmtDescriptor,
      x: c_int,
      y: c_int,
      c: c_int,
      w: c_int,
    );
    /// Name lookup; the `*be`/`*le` suffix may be dropped for native endianness
    av_get_pix_fmt: unsafe extern "C" fn(name: *const c_char) -> c_int;
    av_get_pix_fmt_name: unsafe extern "C" fn(pix_fmt: c_int) -> *const c_char;
    /// Header line when `pix_fmt` is negative
    av_get_pix_fmt_string: unsafe extern "C" fn(buf: *mut c_char, buf_size: c_int, pix_fmt: c_int) -> *mut c_char;
    av_get_bits_per_pixel: unsafe extern "C" fn(pixdesc: *const AVPixFmtDescriptor) -> c_int;
    av_get_padded_bits_per_pixel: unsafe extern "C" fn(pixdesc: *const AVPixFmtDescriptor) -> c_int;
    av_pix_fmt_desc_get: unsafe extern "C" fn(pix_fmt: c_int) -> *const AVPixFmtDescriptor;
    /// Iterate descriptors; null starts, null ends
    av_pix_fmt_desc_next: unsafe extern "C" fn(prev: *const AVPixFmtDescriptor) -> *const AVPixFmtDescriptor;
    av_pix_fmt_desc_get_id: unsafe extern "C" fn(desc: *const AVPixFmtDescriptor) -> c_int;
    av_pix_fmt_get_chroma_sub_sample: unsafe extern "C" fn(pix_fmt: c_int, h_shift: *mut c_int, v_shift: *mut c_int) -> c_int;
    av_pix_fmt_count_planes: unsafe extern "C" fn(pix_fmt: c_int) -> c_int;
    /// Same format with the other endianness, or `AV_PIX_FMT_NONE`
    av_pix_fmt_swap_endianness: unsafe extern "C" fn(pix_fmt: c_int) -> c_int;
  }
  optional {
    av_get_pix_fmt_loss: unsafe extern "C" fn(dst_pix_fmt: c_int, src_pix_fmt: c_int, has_alpha: c_int) -> c_int;
    av_find_best_pix_fmt_of_2: unsafe extern "C" fn(
      dst_pix_fmt1: c_int,
      dst_pix_fmt2: c_int,
      src_pix_fmt: c_int,
      has_alpha: c_int,
      loss_ptr: *mut c_int,
    ) -> c_int;
    av_color_range_name: unsafe extern "C" fn(range: c_int) -> *const c_char;
    av_color_primaries_name: unsafe extern "C" fn(primaries: c_int) -> *const c_char;
    av_color_transfer_name: unsafe extern "C" fn(transfer: c_int) -> *const c_char;
    av_color_space_name: unsafe extern "C" fn(space: c_int) -> *const c_char;
    av_chroma_location_name: unsafe extern "C" fn(location: c_int) -> *const c_char;
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ffi::pixfmt::AVPixelFormat;
  use crate::ffi::testing;
  use std::ffi::CStr;

  #[test]
  fn test_component_bitfield() {
    let comp = AVComponentDescriptor::new(2, 1, 3, 4, 9);
    assert_eq!(comp.plane(), 2);
    assert_eq!(comp.step(), 2);
    assert_eq!(comp.offset_plus1(), 3);
    assert_eq!(comp.shift(), 4);
    assert_eq!(comp.depth(), 10);
    assert_eq!(AVComponentDescriptor::from_bits(comp.bits()), comp);

    // Fields are masked to their width
    let clamped = AVComponentDescriptor::new(0, 0, 0, 0, 0x1F);
    assert_eq!(clamped.depth_minus1(), 0xF);
    assert_eq!(clamped.plane(), 0);
  }

  #[test]
  #[cfg(target_endian = "little")]
  fn test_component_bit_positions() {
    // {0, 0, 1, 0, 7}: plane 0, step 1, offset 0, 8-bit
    assert_eq!(AVComponentDescriptor::new(0, 0, 1, 0, 7).bits(), (1 << 5) | (7 << 11));
  }

  #[test]
  #[cfg(target_pointer_width = "64")]
  fn test_descriptor_layout() {
    use std::mem::{offset_of, size_of};

    assert_eq!(size_of::<AVComponentDescriptor>(), 2);
    assert_eq!(offset_of!(AVPixFmtDescriptor, nb_components), 8);
    assert_eq!(offset_of!(AVPixFmtDescriptor, log2_chroma_h), 10);
    assert_eq!(offset_of!(AVPixFmtDescriptor, flags), 16);
    assert_eq!(offset_of!(AVPixFmtDescriptor, comp), 24);
    assert_eq!(offset_of!(AVPixFmtDescriptor, alias), 32);
    assert_eq!(size_of::<AVPixFmtDescriptor>(), 40);
  }

  #[test]
  fn test_native_yuv420p_descriptor() {
    let Some(lib) = testing::native() else {
      return;
    };
    let api = &lib.pixdesc;

    unsafe {
      let desc = &*(api.av_pix_fmt_desc_get)(AVPixelFormat::Yuv420p.as_raw());
      assert_eq!(CStr::from_ptr(desc.name).to_str().unwrap(), "yuv420p");
      assert_eq!(desc.nb_components, 3);
      assert_eq!((desc.log2_chroma_w, desc.log2_chroma_h), (1, 1));
      assert!(desc.has_flag(pix_fmt_flag::PLANAR));
      assert!(!desc.has_flag(pix_fmt_flag::RGB));
      assert_eq!(desc.comp[1].plane(), 1);
      assert_eq!(desc.comp[2].depth(), 8);
      assert_eq!((api.av_get_bits_per_pixel)(desc), 12);
      assert_eq!((api.av_pix_fmt_desc_get_id)(desc), AVPixelFormat::Yuv420p.as_raw());

      assert_eq!((api.av_get_pix_fmt)(c"nv12".as_ptr()), AVPixelFormat::Nv12.as_raw());
      assert_eq!((api.av_pix_fmt_count_planes)(AVPixelFormat::Nv12.as_raw()), 2);
      assert_eq!(
        (api.av_pix_fmt_swap_endianness)(AVPixelFormat::Rgb48be.as_raw()),
        AVPixelFormat::Rgb48le.as_raw()
      );
    }
  }

  #[test]
  fn test_native_descriptors_match_enum() {
    let Some(lib) = testing::native() else {
      return;
    };
    let api = &lib.pixdesc;

    // Every descriptor up to the pinned numbering maps to a declared variant;
    // later 54.x minors may append formats
    let mut count = 0;
    let mut desc = std::ptr::null();
    unsafe {
      loop {
        desc = (api.av_pix_fmt_desc_next)(desc);
        if desc.is_null() {
          break;
        }
        let id = (api.av_pix_fmt_desc_get_id)(desc);
        if id > AVPixelFormat::Yuv440p12be.as_raw() {
          continue;
        }
        assert!(
          AVPixelFormat::from_raw(id).is_some(),
          "{} ({}) is not declared",
          CStr::from_ptr((*desc).name).to_string_lossy(),
          id
        );
        count += 1;
      }
    }
    assert!(count > 100);
  }
}
