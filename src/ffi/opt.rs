//! `opt.h`: the generic `AVOption` reflection API
//!
//! Options are described by a table hanging off an object's `AVClass`. Each
//! entry names a field by byte offset into the object and gives its type,
//! default value and range. The native library reads and writes the fields;
//! nothing here interprets them.

use std::fmt;
use std::os::raw::{c_char, c_int, c_uint, c_void};

use super::dict::AVDictionary;
use super::log::AVClass;
use super::types::{mkbetag, AVRational};

c_enum! {
  /// Type of the field an option points at
  pub enum AVOptionType {
    Flags = 0,
    Int = 1,
    Int64 = 2,
    Double = 3,
    Float = 4,
    String = 5,
    Rational = 6,
    /// `offset` points at a `*mut u8`, followed by an `int` length
    Binary = 7,
    Dict = 8,
    /// Named constant of the option sharing its `unit`
    Const = 128,
    /// Two consecutive `int`s, width then height
    ImageSize = mkbetag(b'S', b'I', b'Z', b'E') as isize,
    PixelFmt = mkbetag(b'P', b'F', b'M', b'T') as isize,
    SampleFmt = mkbetag(b'S', b'F', b'M', b'T') as isize,
    /// `AVRational` frame rate
    VideoRate = mkbetag(b'V', b'R', b'A', b'T') as isize,
    /// `int64_t` microseconds
    Duration = mkbetag(b'D', b'U', b'R', b' ') as isize,
    /// Four bytes, RGBA
    Color = mkbetag(b'C', b'O', b'L', b'R') as isize,
    ChannelLayout = mkbetag(b'C', b'H', b'L', b'A') as isize,
  }
}

/// `AV_OPT_FLAG_*`: where an option applies
pub mod opt_flag {
  use std::os::raw::c_int;

  pub const ENCODING_PARAM: c_int = 1;
  pub const DECODING_PARAM: c_int = 2;
  pub const METADATA: c_int = 4;
  pub const AUDIO_PARAM: c_int = 8;
  pub const VIDEO_PARAM: c_int = 16;
  pub const SUBTITLE_PARAM: c_int = 32;
  /// Exported by the object, not set by the caller
  pub const EXPORT: c_int = 64;
  /// Can only be read; implies `EXPORT`
  pub const READONLY: c_int = 128;
  pub const FILTERING_PARAM: c_int = 1 << 16;
}

/// `AV_OPT_SEARCH_*` and range query flags
pub mod search_flag {
  use std::os::raw::c_int;

  /// Look in child objects before this one
  pub const CHILDREN: c_int = 1 << 0;
  /// The object is a `*const *const AVClass`, not a real instance
  pub const FAKE_OBJ: c_int = 1 << 1;
  /// Query each component of a multi-component option separately
  pub const MULTI_COMPONENT_RANGE: c_int = 1 << 12;
}

/// `AV_OPT_SERIALIZE_*` flags
pub mod serialize_flag {
  use std::os::raw::c_int;

  pub const SKIP_DEFAULTS: c_int = 0x0000_0001;
  /// Only options whose flags equal the requested flags
  pub const OPT_FLAGS_EXACT: c_int = 0x0000_0002;
}

/// `av_opt_get_key_value` flags
pub mod key_value_flag {
  use std::os::raw::c_uint;

  /// Accept a bare value and report a null key
  pub const IMPLICIT_KEY: c_uint = 1;
}

/// `default_val`: which member is live depends on the option type
#[repr(C)]
#[derive(Clone, Copy)]
pub union AVOptionDefault {
  pub i64_: i64,
  pub dbl: f64,
  pub str_: *const c_char,
  /// Deprecated, rationals use `dbl`
  pub q: AVRational,
}

/// One entry of an option table
#[repr(C)]
#[derive(Clone, Copy)]
pub struct AVOption {
  pub name: *const c_char,
  /// Short description, may be null
  pub help: *const c_char,
  /// Byte offset of the field in the object; 0 for `Const` entries
  pub offset: c_int,
  /// `AVOptionType`
  pub type_: c_int,
  pub default_val: AVOptionDefault,
  pub min: f64,
  pub max: f64,
  /// `opt_flag` bits
  pub flags: c_int,
  /// Groups named constants with the option they belong to
  pub unit: *const c_char,
}

impl AVOption {
  /// Table terminator
  pub const fn end() -> Self {
    Self {
      name: std::ptr::null(),
      help: std::ptr::null(),
      offset: 0,
      type_: 0,
      default_val: AVOptionDefault { i64_: 0 },
      min: 0.0,
      max: 0.0,
      flags: 0,
      unit: std::ptr::null(),
    }
  }

  pub fn option_type(&self) -> Option<AVOptionType> {
    AVOptionType::from_raw(self.type_)
  }
}

impl fmt::Debug for AVOption {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("AVOption")
      .field("name", &self.name)
      .field("offset", &self.offset)
      .field("type", &self.option_type())
      .field("min", &self.min)
      .field("max", &self.max)
      .field("flags", &self.flags)
      .finish_non_exhaustive()
  }
}

/// One allowed range of an option
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct AVOptionRange {
  pub str_: *const c_char,
  pub value_min: f64,
  pub value_max: f64,
  pub component_min: f64,
  pub component_max: f64,
  /// 0 when `value_min == value_max` denotes a single value
  pub is_range: c_int,
}

/// Result of `av_opt_query_ranges`, freed with `av_opt_freep_ranges`
#[repr(C)]
#[derive(Debug)]
pub struct AVOptionRanges {
  /// `nb_ranges * nb_components` entries, component-major
  pub range: *mut *mut AVOptionRange,
  pub nb_ranges: c_int,
  pub nb_components: c_int,
}

avutil_symbols! {
  pub struct OptApi {
    /// Print the option table to the log
    av_opt_show2: unsafe extern "C" fn(obj: *mut c_void, av_log_obj: *mut c_void, req_flags: c_int, rej_flags: c_int) -> c_int;
    av_opt_set_defaults: unsafe extern "C" fn(s: *mut c_void);
    av_set_options_string: unsafe extern "C" fn(
      ctx: *mut c_void,
      opts: *const c_char,
      key_val_sep: *const c_char,
      pairs_sep: *const c_char,
    ) -> c_int;
    av_opt_set_from_string: unsafe extern "C" fn(
      ctx: *mut c_void,
      opts: *const c_char,
      shorthand: *const *const c_char,
      key_val_sep: *const c_char,
      pairs_sep: *const c_char,
    ) -> c_int;
    /// Free every string/binary/dict option of the object
    av_opt_free: unsafe extern "C" fn(obj: *mut c_void);
    av_opt_flag_is_set: unsafe extern "C" fn(obj: *mut c_void, field_name: *const c_char, flag_name: *const c_char) -> c_int;
    /// Consumed entries are removed from `*options`
    av_opt_set_dict: unsafe extern "C" fn(obj: *mut c_void, options: *mut *mut AVDictionary) -> c_int;
    av_opt_get_key_value: unsafe extern "C" fn(
      ropts: *mut *const c_char,
      key_val_sep: *const c_char,
      pairs_sep: *const c_char,
      flags: c_uint,
      rkey: *mut *mut c_char,
      rval: *mut *mut c_char,
    ) -> c_int;

    av_opt_eval_flags: unsafe extern "C" fn(obj: *mut c_void, o: *const AVOption, val: *const c_char, flags_out: *mut c_int) -> c_int;
    av_opt_eval_int: unsafe extern "C" fn(obj: *mut c_void, o: *const AVOption, val: *const c_char, int_out: *mut c_int) -> c_int;
    av_opt_eval_int64: unsafe extern "C" fn(obj: *mut c_void, o: *const AVOption, val: *const c_char, int64_out: *mut i64) -> c_int;
    av_opt_eval_float: unsafe extern "C" fn(obj: *mut c_void, o: *const AVOption, val: *const c_char, float_out: *mut f32) -> c_int;
    av_opt_eval_double: unsafe extern "C" fn(obj: *mut c_void, o: *const AVOption, val: *const c_char, double_out: *mut f64) -> c_int;
    av_opt_eval_q: unsafe extern "C" fn(obj: *mut c_void, o: *const AVOption, val: *const c_char, q_out: *mut AVRational) -> c_int;

    av_opt_find: unsafe extern "C" fn(
      obj: *mut c_void,
      name: *const c_char,
      unit: *const c_char,
      opt_flags: c_int,
      search_flags: c_int,
    ) -> *const AVOption;
    /// `target_obj` receives the (child) object the option was found in
    av_opt_find2: unsafe extern "C" fn(
      obj: *mut c_void,
      name: *const c_char,
      unit: *const c_char,
      opt_flags: c_int,
      search_flags: c_int,
      target_obj: *mut *mut c_void,
    ) -> *const AVOption;
    av_opt_next: unsafe extern "C" fn(obj: *const c_void, prev: *const AVOption) -> *const AVOption;
    av_opt_child_next: unsafe extern "C" fn(obj: *mut c_void, prev: *mut c_void) -> *mut c_void;
    av_opt_child_class_next: unsafe extern "C" fn(parent: *const AVClass, prev: *const AVClass) -> *const AVClass;

    av_opt_set: unsafe extern "C" fn(obj: *mut c_void, name: *const c_char, val: *const c_char, search_flags: c_int) -> c_int;
    av_opt_set_int: unsafe extern "C" fn(obj: *mut c_void, name: *const c_char, val: i64, search_flags: c_int) -> c_int;
    av_opt_set_double: unsafe extern "C" fn(obj: *mut c_void, name: *const c_char, val: f64, search_flags: c_int) -> c_int;
    av_opt_set_q: unsafe extern "C" fn(obj: *mut c_void, name: *const c_char, val: AVRational, search_flags: c_int) -> c_int;
    av_opt_set_bin: unsafe extern "C" fn(obj: *mut c_void, name: *const c_char, val: *const u8, size: c_int, search_flags: c_int) -> c_int;
    av_opt_set_image_size: unsafe extern "C" fn(obj: *mut c_void, name: *const c_char, w: c_int, h: c_int, search_flags: c_int) -> c_int;
    av_opt_set_pixel_fmt: unsafe extern "C" fn(obj: *mut c_void, name: *const c_char, fmt: c_int, search_flags: c_int) -> c_int;
    av_opt_set_sample_fmt: unsafe extern "C" fn(obj: *mut c_void, name: *const c_char, fmt: c_int, search_flags: c_int) -> c_int;
    av_opt_set_video_rate: unsafe extern "C" fn(obj: *mut c_void, name: *const c_char, val: AVRational, search_flags: c_int) -> c_int;
    av_opt_set_channel_layout: unsafe extern "C" fn(obj: *mut c_void, name: *const c_char, ch_layout: i64, search_flags: c_int) -> c_int;

    /// `*out_val` is `av_malloc`ed and must be freed with `av_free`
    av_opt_get: unsafe extern "C" fn(obj: *mut c_void, name: *const c_char, search_flags: c_int, out_val: *mut *mut u8) -> c_int;
    av_opt_get_int: unsafe extern "C" fn(obj: *mut c_void, name: *const c_char, search_flags: c_int, out_val: *mut i64) -> c_int;
    av_opt_get_double: unsafe extern "C" fn(obj: *mut c_void, name: *const c_char, search_flags: c_int, out_val: *mut f64) -> c_int;
    av_opt_get_q: unsafe extern "C" fn(obj: *mut c_void, name: *const c_char, search_flags: c_int, out_val: *mut AVRational) -> c_int;
    av_opt_get_image_size: unsafe extern "C" fn(obj: *mut c_void, name: *const c_char, search_flags: c_int, w_out: *mut c_int, h_out: *mut c_int) -> c_int;
    av_opt_get_pixel_fmt: unsafe extern "C" fn(obj: *mut c_void, name: *const c_char, search_flags: c_int, out_fmt: *mut c_int) -> c_int;
    av_opt_get_sample_fmt: unsafe extern "C" fn(obj: *mut c_void, name: *const c_char, search_flags: c_int, out_fmt: *mut c_int) -> c_int;
    av_opt_get_video_rate: unsafe extern "C" fn(obj: *mut c_void, name: *const c_char, search_flags: c_int, out_val: *mut AVRational) -> c_int;
    av_opt_get_channel_layout: unsafe extern "C" fn(obj: *mut c_void, name: *const c_char, search_flags: c_int, ch_layout: *mut i64) -> c_int;

    /// Address of the field behind a named option
    av_opt_ptr: unsafe extern "C" fn(avclass: *const AVClass, obj: *mut c_void, name: *const c_char) -> *mut c_void;
    av_opt_freep_ranges: unsafe extern "C" fn(ranges: *mut *mut AVOptionRanges);
    av_opt_query_ranges: unsafe extern "C" fn(ranges: *mut *mut AVOptionRanges, obj: *mut c_void, key: *const c_char, flags: c_int) -> c_int;
    av_opt_query_ranges_default: unsafe extern "C" fn(ranges: *mut *mut AVOptionRanges, obj: *mut c_void, key: *const c_char, flags: c_int) -> c_int;
  }
  optional {
    av_opt_set_dict2: unsafe extern "C" fn(obj: *mut c_void, options: *mut *mut AVDictionary, search_flags: c_int) -> c_int;
    av_opt_set_dict_val: unsafe extern "C" fn(obj: *mut c_void, name: *const c_char, val: *const AVDictionary, search_flags: c_int) -> c_int;
    av_opt_get_dict_val: unsafe extern "C" fn(obj: *mut c_void, name: *const c_char, search_flags: c_int, out_val: *mut *mut AVDictionary) -> c_int;
    av_opt_copy: unsafe extern "C" fn(dest: *mut c_void, src: *mut c_void) -> c_int;
    av_opt_is_set_to_default: unsafe extern "C" fn(obj: *mut c_void, o: *const AVOption) -> c_int;
    av_opt_is_set_to_default_by_name: unsafe extern "C" fn(obj: *mut c_void, name: *const c_char, search_flags: c_int) -> c_int;
    /// `*buffer` is `av_malloc`ed
    av_opt_serialize: unsafe extern "C" fn(
      obj: *mut c_void,
      opt_flags: c_int,
      flags: c_int,
      buffer: *mut *mut c_char,
      key_val_sep: c_char,
      pairs_sep: c_char,
    ) -> c_int;

    // FF_API_OLD_AVOPTIONS
    av_opt_set_defaults2: unsafe extern "C" fn(s: *mut c_void, mask: c_int, flags: c_int);
    av_set_string3: unsafe extern "C" fn(
      obj: *mut c_void,
      name: *const c_char,
      val: *const c_char,
      alloc: c_int,
      o_out: *mut *const AVOption,
    ) -> c_int;
    av_set_double: unsafe extern "C" fn(obj: *mut c_void, name: *const c_char, n: f64) -> *const AVOption;
    av_set_q: unsafe extern "C" fn(obj: *mut c_void, name: *const c_char, n: AVRational) -> *const AVOption;
    av_set_int: unsafe extern "C" fn(obj: *mut c_void, name: *const c_char, n: i64) -> *const AVOption;
    av_get_double: unsafe extern "C" fn(obj: *mut c_void, name: *const c_char, o_out: *mut *const AVOption) -> f64;
    av_get_q: unsafe extern "C" fn(obj: *mut c_void, name: *const c_char, o_out: *mut *const AVOption) -> AVRational;
    av_get_int: unsafe extern "C" fn(obj: *mut c_void, name: *const c_char, o_out: *mut *const AVOption) -> i64;
    av_get_string: unsafe extern "C" fn(
      obj: *mut c_void,
      name: *const c_char,
      o_out: *mut *const AVOption,
      buf: *mut c_char,
      buf_len: c_int,
    ) -> *const c_char;
    av_next_option: unsafe extern "C" fn(obj: *mut c_void, last: *const AVOption) -> *const AVOption;
  }
}
