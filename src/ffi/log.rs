//! `log.h`: logging and the `AVClass` reflection header
//!
//! Every loggable libav* context starts with a `*const AVClass`. The class
//! names the context in log lines, exposes its `AVOption` table and lets the
//! option API descend into child objects.

use std::os::raw::{c_char, c_int, c_void};

use super::opt::{AVOption, AVOptionRanges};

// ============================================================================
// Levels and flags
// ============================================================================

/// `AV_LOG_*` levels
pub mod log_level {
  use std::os::raw::c_int;

  /// Print no output
  pub const QUIET: c_int = -8;
  /// Something went really wrong and we will crash now
  pub const PANIC: c_int = 0;
  /// Unrecoverable error
  pub const FATAL: c_int = 8;
  /// Recoverable error
  pub const ERROR: c_int = 16;
  pub const WARNING: c_int = 24;
  /// Standard information
  pub const INFO: c_int = 32;
  /// Detailed information
  pub const VERBOSE: c_int = 40;
  /// Only useful for libav* developers
  pub const DEBUG: c_int = 48;
  /// Extremely verbose debugging
  pub const TRACE: c_int = 56;

  pub const MAX_OFFSET: c_int = DEBUG - QUIET;

  /// `AV_LOG_C`: level with an explicit color index
  pub const fn with_color(level: c_int, color: c_int) -> c_int {
    level | (color << 8)
  }
}

/// `AV_LOG_*` flags for `av_log_set_flags`
pub mod log_flag {
  use std::os::raw::c_int;

  /// Collapse repeated lines into "Last message repeated n times"
  pub const SKIP_REPEATED: c_int = 1;
  /// Prefix lines with the level name
  pub const PRINT_LEVEL: c_int = 2;
}

// ============================================================================
// AVClass
// ============================================================================

c_enum! {
  pub enum AVClassCategory {
    Na = 0,
    Input = 1,
    Output = 2,
    Muxer = 3,
    Demuxer = 4,
    Encoder = 5,
    Decoder = 6,
    Filter = 7,
    BitstreamFilter = 8,
    Swscaler = 9,
    Swresampler = 10,
    DeviceVideoOutput = 40,
    DeviceVideoInput = 41,
    DeviceAudioOutput = 42,
    DeviceAudioInput = 43,
    DeviceOutput = 44,
    DeviceInput = 45,
  }
}

impl AVClassCategory {
  /// `AV_IS_INPUT_DEVICE`
  pub const fn is_input_device(self) -> bool {
    matches!(
      self,
      Self::DeviceVideoInput | Self::DeviceAudioInput | Self::DeviceInput
    )
  }

  /// `AV_IS_OUTPUT_DEVICE`
  pub const fn is_output_device(self) -> bool {
    matches!(
      self,
      Self::DeviceVideoOutput | Self::DeviceAudioOutput | Self::DeviceOutput
    )
  }
}

pub type AVClassItemNameFn = unsafe extern "C" fn(ctx: *mut c_void) -> *const c_char;
pub type AVClassChildNextFn = unsafe extern "C" fn(obj: *mut c_void, prev: *mut c_void) -> *mut c_void;
pub type AVClassChildClassNextFn = unsafe extern "C" fn(prev: *const AVClass) -> *const AVClass;
pub type AVClassGetCategoryFn = unsafe extern "C" fn(ctx: *mut c_void) -> c_int;
pub type AVClassQueryRangesFn = unsafe extern "C" fn(
  ranges: *mut *mut AVOptionRanges,
  obj: *mut c_void,
  key: *const c_char,
  flags: c_int,
) -> c_int;

/// Describes a class of libav* contexts for logging and options
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct AVClass {
  pub class_name: *const c_char,
  /// Instance name; `av_default_item_name` returns `class_name`
  pub item_name: Option<AVClassItemNameFn>,
  /// Option table terminated by an entry with a null name, or null
  pub option: *const AVOption,
  /// `LIBAVUTIL_VERSION_INT` the class was built with
  pub version: c_int,
  /// Offset of an `int` added to the log level of messages from this context
  pub log_level_offset_offset: c_int,
  /// Offset of a pointer to the parent context used for log prefixes
  pub parent_log_context_offset: c_int,
  pub child_next: Option<AVClassChildNextFn>,
  pub child_class_next: Option<AVClassChildClassNextFn>,
  /// `AVClassCategory`
  pub category: c_int,
  pub get_category: Option<AVClassGetCategoryFn>,
  pub query_ranges: Option<AVClassQueryRangesFn>,
}

// ============================================================================
// va_list
// ============================================================================

/// System V x86-64 `va_list` element
#[repr(C)]
#[allow(non_camel_case_types)]
#[derive(Debug)]
pub struct __va_list_tag {
  pub gp_offset: u32,
  pub fp_offset: u32,
  pub overflow_arg_area: *mut c_void,
  pub reg_save_area: *mut c_void,
}

/// `va_list` as it is passed to a function parameter
#[cfg(all(target_arch = "x86_64", not(windows)))]
pub type VaList = *mut __va_list_tag;

#[cfg(all(target_arch = "aarch64", not(target_vendor = "apple"), not(windows)))]
pub type VaList = *mut c_void;

#[cfg(not(any(
  all(target_arch = "x86_64", not(windows)),
  all(target_arch = "aarch64", not(target_vendor = "apple"), not(windows)),
)))]
pub type VaList = *mut c_char;

/// Receives every message passing the level filter
pub type AVLogCallback =
  unsafe extern "C" fn(avcl: *mut c_void, level: c_int, fmt: *const c_char, vl: VaList);

// ============================================================================
// Entry points
// ============================================================================

avutil_symbols! {
  pub struct LogApi {
    /// `avcl` is null or a pointer to a struct whose first member is `*const AVClass`
    av_log: unsafe extern "C" fn(avcl: *mut c_void, level: c_int, fmt: *const c_char, ...);
    av_vlog: unsafe extern "C" fn(avcl: *mut c_void, level: c_int, fmt: *const c_char, vl: VaList);
    av_log_get_level: unsafe extern "C" fn() -> c_int;
    av_log_set_level: unsafe extern "C" fn(level: c_int);
    /// Not thread safe; null drops every message
    av_log_set_callback: unsafe extern "C" fn(callback: Option<AVLogCallback>);
    av_log_default_callback: unsafe extern "C" fn(avcl: *mut c_void, level: c_int, fmt: *const c_char, vl: VaList);
    av_default_item_name: unsafe extern "C" fn(ctx: *mut c_void) -> *const c_char;
    av_default_get_category: unsafe extern "C" fn(ptr: *mut c_void) -> c_int;
    /// Format a line the way the default callback does, class prefix included
    av_log_format_line: unsafe extern "C" fn(
      ptr: *mut c_void,
      level: c_int,
      fmt: *const c_char,
      vl: VaList,
      line: *mut c_char,
      line_size: c_int,
      print_prefix: *mut c_int,
    );
    av_log_set_flags: unsafe extern "C" fn(arg: c_int);
  }
  optional {
    av_log_get_flags: unsafe extern "C" fn() -> c_int;
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ffi::testing;
  use crate::ffi::version::LIBAVUTIL_VERSION_INT;
  use std::ffi::{CStr, CString};
  use std::ptr;

  #[test]
  fn test_levels() {
    assert_eq!(log_level::MAX_OFFSET, 56);
    assert!(log_level::QUIET < log_level::PANIC);
    assert_eq!(log_level::with_color(log_level::INFO, 2), 32 | 0x200);
  }

  #[test]
  fn test_category_values() {
    assert_eq!(AVClassCategory::Swresampler.as_raw(), 10);
    assert_eq!(AVClassCategory::DeviceInput.as_raw(), 45);
    assert_eq!(AVClassCategory::from_raw(11), None);
    assert!(AVClassCategory::DeviceAudioInput.is_input_device());
    assert!(!AVClassCategory::Demuxer.is_input_device());
    assert!(AVClassCategory::DeviceOutput.is_output_device());
  }

  #[test]
  #[cfg(target_pointer_width = "64")]
  fn test_class_layout() {
    use std::mem::offset_of;

    assert_eq!(offset_of!(AVClass, option), 16);
    assert_eq!(offset_of!(AVClass, version), 24);
    assert_eq!(offset_of!(AVClass, parent_log_context_offset), 32);
    assert_eq!(offset_of!(AVClass, child_next), 40);
    assert_eq!(offset_of!(AVClass, category), 56);
    assert_eq!(offset_of!(AVClass, query_ranges), 72);
    assert_eq!(std::mem::size_of::<AVClass>(), 80);
  }

  #[repr(C)]
  struct Context {
    class: *const AVClass,
  }

  #[test]
  fn test_native_default_item_name() {
    let Some(lib) = testing::native() else {
      return;
    };

    let name = CString::new("probe").unwrap();
    let class = AVClass {
      class_name: name.as_ptr(),
      item_name: Some(lib.log.av_default_item_name),
      option: ptr::null(),
      version: LIBAVUTIL_VERSION_INT as c_int,
      log_level_offset_offset: 0,
      parent_log_context_offset: 0,
      child_next: None,
      child_class_next: None,
      category: AVClassCategory::Filter.as_raw(),
      get_category: None,
      query_ranges: None,
    };
    let mut ctx = Context { class: &class };
    let ctx_ptr = &mut ctx as *mut Context as *mut c_void;

    unsafe {
      let item = CStr::from_ptr((lib.log.av_default_item_name)(ctx_ptr));
      assert_eq!(item.to_str().unwrap(), "probe");
      assert_eq!((lib.log.av_default_get_category)(ctx_ptr), AVClassCategory::Filter.as_raw());
    }
  }
}
