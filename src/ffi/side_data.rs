//! Frame side data payloads: `display.h`, `downmix_info.h`, `motion_vector.h`

use std::os::raw::{c_int, c_void};

use super::frame::AVFrame;

// ============================================================================
// Display matrix
// ============================================================================

/// A 3x3 display matrix: 16.16 fixed point except the last column, which is 2.30
pub type DisplayMatrix = [i32; 9];

avutil_symbols! {
  pub struct DisplayApi {
    /// Counterclockwise rotation in degrees, NaN for a degenerate matrix
    av_display_rotation_get: unsafe extern "C" fn(matrix: *const i32) -> f64;
    /// Overwrite the matrix with a pure rotation
    av_display_rotation_set: unsafe extern "C" fn(matrix: *mut i32, angle: f64);
    av_display_matrix_flip: unsafe extern "C" fn(matrix: *mut i32, hflip: c_int, vflip: c_int);
  }
}

// ============================================================================
// Downmix info
// ============================================================================

c_enum! {
  pub enum AVDownmixType {
    Unknown = 0,
    /// Lo/Ro 2-channel downmix (stereo)
    Loro = 1,
    /// Lt/Rt 2-channel downmix, Dolby Surround compatible
    Ltrt = 2,
    /// Lt/Rt 2-channel downmix, Dolby Pro Logic II compatible
    Dpl2 = 3,
  }
}

/// Downmix metadata carried as `AVFrameSideDataType::DownmixInfo`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AVDownmixInfo {
  /// `AVDownmixType`
  pub preferred_downmix_type: c_int,
  pub center_mix_level: f64,
  pub center_mix_level_ltrt: f64,
  pub surround_mix_level: f64,
  pub surround_mix_level_ltrt: f64,
  pub lfe_mix_level: f64,
}

avutil_symbols! {
  pub struct DownmixApi {
    /// Get the frame's downmix side data, zero-initialising it if absent
    av_downmix_info_update_side_data: unsafe extern "C" fn(frame: *mut AVFrame) -> *mut AVDownmixInfo;
  }
}

// ============================================================================
// Motion vectors
// ============================================================================

/// One entry of `AVFrameSideDataType::MotionVectors`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AVMotionVector {
  /// Negative for past references, positive for future ones
  pub source: i32,
  /// Block width
  pub w: u8,
  pub h: u8,
  /// Absolute source position, may be outside the frame
  pub src_x: i16,
  pub src_y: i16,
  /// Absolute destination position, may be outside the frame
  pub dst_x: i16,
  pub dst_y: i16,
  /// Extra flag information, currently unused
  pub flags: u64,
}

/// View motion-vector side data as a slice
///
/// # Safety
/// `data`/`size` must describe a live `MotionVectors` side data payload.
pub unsafe fn motion_vectors<'a>(data: *const c_void, size: usize) -> &'a [AVMotionVector] {
  let count = size / std::mem::size_of::<AVMotionVector>();
  if data.is_null() || count == 0 {
    &[]
  } else {
    std::slice::from_raw_parts(data.cast(), count)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ffi::frame::AVFrameSideDataType;
  use crate::ffi::testing;
  use std::mem::{offset_of, size_of};

  #[test]
  fn test_layouts() {
    assert_eq!(size_of::<AVMotionVector>(), 24);
    assert_eq!(offset_of!(AVMotionVector, w), 4);
    assert_eq!(offset_of!(AVMotionVector, src_x), 6);
    assert_eq!(offset_of!(AVMotionVector, dst_y), 12);
    assert_eq!(offset_of!(AVMotionVector, flags), 16);

    assert_eq!(offset_of!(AVDownmixInfo, center_mix_level), 8);
    assert_eq!(size_of::<AVDownmixInfo>(), 48);
    assert_eq!(AVDownmixType::Dpl2.as_raw(), 3);
  }

  #[test]
  fn test_motion_vector_view() {
    let vectors = [
      AVMotionVector { source: -1, w: 16, h: 16, src_x: 8, src_y: 8, dst_x: 10, dst_y: 6, flags: 0 },
      AVMotionVector { source: 1, w: 8, h: 8, ..Default::default() },
    ];
    let view = unsafe { motion_vectors(vectors.as_ptr().cast(), size_of::<AVMotionVector>() * 2 + 3) };
    assert_eq!(view, &vectors);
    assert!(unsafe { motion_vectors(std::ptr::null(), 48) }.is_empty());
  }

  #[test]
  fn test_native_rotation() {
    let Some(lib) = testing::native() else {
      return;
    };
    let mut matrix: DisplayMatrix = [0; 9];

    unsafe {
      (lib.display.av_display_rotation_set)(matrix.as_mut_ptr(), 90.0);
      assert_eq!(matrix[8], 1 << 30);
      let angle = (lib.display.av_display_rotation_get)(matrix.as_ptr());
      assert!((angle.abs() - 90.0).abs() < 1e-3, "got {angle}");

      assert!((lib.display.av_display_rotation_get)([0; 9].as_ptr()).is_nan());
    }
  }

  #[test]
  fn test_native_downmix_side_data() {
    let Some(lib) = testing::native() else {
      return;
    };

    unsafe {
      let mut frame = (lib.frame.av_frame_alloc)();
      let info = (lib.downmix.av_downmix_info_update_side_data)(frame);
      assert!(!info.is_null());
      (*info).preferred_downmix_type = AVDownmixType::Ltrt.as_raw();

      let side = (lib.frame.av_frame_get_side_data)(frame, AVFrameSideDataType::DownmixInfo.as_raw());
      assert!(!side.is_null());
      assert_eq!((*side).size as usize, size_of::<AVDownmixInfo>());
      assert_eq!((*((*side).data as *const AVDownmixInfo)).preferred_downmix_type, 2);

      (lib.frame.av_frame_free)(&mut frame);
    }
  }
}
