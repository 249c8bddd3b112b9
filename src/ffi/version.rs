//! libavutil version pin
//!
//! Every layout and enum value in this crate is written against
//! libavutil 54.27.100. The `FF_API_*` switches record which deprecated
//! fields and entry points that release still carried.

use std::fmt;
use std::os::raw::c_uint;

pub const LIBAVUTIL_VERSION_MAJOR: c_uint = 54;
pub const LIBAVUTIL_VERSION_MINOR: c_uint = 27;
pub const LIBAVUTIL_VERSION_MICRO: c_uint = 100;

pub const LIBAVUTIL_VERSION_INT: c_uint = av_version_int(
  LIBAVUTIL_VERSION_MAJOR,
  LIBAVUTIL_VERSION_MINOR,
  LIBAVUTIL_VERSION_MICRO,
);

pub const LIBAVUTIL_VERSION: &str = "54.27.100";
pub const LIBAVUTIL_IDENT: &str = "Lavu54.27.100";

// ============================================================================
// Version Helpers
// ============================================================================

/// `AV_VERSION_INT`
pub const fn av_version_int(major: c_uint, minor: c_uint, micro: c_uint) -> c_uint {
  (major << 16) | (minor << 8) | micro
}

/// `AV_VERSION_MAJOR`
pub const fn av_version_major(version: c_uint) -> c_uint {
  version >> 16
}

/// `AV_VERSION_MINOR`
pub const fn av_version_minor(version: c_uint) -> c_uint {
  (version & 0xff00) >> 8
}

/// `AV_VERSION_MICRO`
pub const fn av_version_micro(version: c_uint) -> c_uint {
  version & 0xff
}

// ============================================================================
// Compatibility Switches (all enabled below major 55)
// ============================================================================

const API_BELOW_55: bool = LIBAVUTIL_VERSION_MAJOR < 55;

pub const FF_API_GET_BITS_PER_SAMPLE_FMT: bool = API_BELOW_55;
pub const FF_API_FIND_OPT: bool = API_BELOW_55;
pub const FF_API_OLD_AVOPTIONS: bool = API_BELOW_55;
pub const FF_API_PIX_FMT: bool = API_BELOW_55;
pub const FF_API_CONTEXT_SIZE: bool = API_BELOW_55;
pub const FF_API_PIX_FMT_DESC: bool = API_BELOW_55;
pub const FF_API_AV_REVERSE: bool = API_BELOW_55;
pub const FF_API_AUDIOCONVERT: bool = API_BELOW_55;
pub const FF_API_CPU_FLAG_MMX2: bool = API_BELOW_55;
pub const FF_API_LLS_PRIVATE: bool = API_BELOW_55;
pub const FF_API_AVFRAME_LAVC: bool = API_BELOW_55;
pub const FF_API_VDPAU: bool = API_BELOW_55;
pub const FF_API_GET_CHANNEL_LAYOUT_COMPAT: bool = API_BELOW_55;
pub const FF_API_XVMC: bool = API_BELOW_55;
pub const FF_API_OPT_TYPE_METADATA: bool = API_BELOW_55;
pub const FF_API_DLOG: bool = API_BELOW_55;
pub const FF_API_HMAC: bool = API_BELOW_55;
pub const FF_API_VAAPI: bool = API_BELOW_55;

// ============================================================================
// Decoded Version
// ============================================================================

/// A decoded `AV_VERSION_INT` value
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AvVersion {
  pub major: c_uint,
  pub minor: c_uint,
  pub micro: c_uint,
}

impl AvVersion {
  /// The version every layout in this crate is written against
  pub const PINNED: Self = Self::from_int(LIBAVUTIL_VERSION_INT);

  pub const fn from_int(version: c_uint) -> Self {
    Self {
      major: av_version_major(version),
      minor: av_version_minor(version),
      micro: av_version_micro(version),
    }
  }

  pub const fn as_int(&self) -> c_uint {
    av_version_int(self.major, self.minor, self.micro)
  }
}

impl fmt::Display for AvVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{}.{}", self.major, self.minor, self.micro)
  }
}
