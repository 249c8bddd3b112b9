//! `dict.h`: simple key/value store

use std::os::raw::{c_char, c_int};

opaque_types! {
  /// Key/value dictionary
  AVDictionary;
}

#[repr(C)]
#[derive(Debug)]
pub struct AVDictionaryEntry {
  pub key: *mut c_char,
  pub value: *mut c_char,
}

/// Dictionary flags
pub mod dict_flag {
  use std::os::raw::c_int;

  /// Only get an entry with exact-case key match
  pub const MATCH_CASE: c_int = 1;
  /// Return the first entry whose key starts with the given key
  pub const IGNORE_SUFFIX: c_int = 2;
  /// Take ownership of an `av_malloc`ed key
  pub const DONT_STRDUP_KEY: c_int = 4;
  /// Take ownership of an `av_malloc`ed value
  pub const DONT_STRDUP_VAL: c_int = 8;
  /// Keep existing entries
  pub const DONT_OVERWRITE: c_int = 16;
  /// Append to an existing value instead of replacing it
  pub const APPEND: c_int = 32;
}

avutil_symbols! {
  pub struct DictApi {
    /// Iterate with `prev`; an empty `key` with `IGNORE_SUFFIX` matches every entry
    av_dict_get: unsafe extern "C" fn(
      m: *const AVDictionary,
      key: *const c_char,
      prev: *const AVDictionaryEntry,
      flags: c_int,
    ) -> *mut AVDictionaryEntry;
    av_dict_count: unsafe extern "C" fn(m: *const AVDictionary) -> c_int;
    /// Allocates `*pm` when null; a null `value` deletes the key
    av_dict_set: unsafe extern "C" fn(
      pm: *mut *mut AVDictionary,
      key: *const c_char,
      value: *const c_char,
      flags: c_int,
    ) -> c_int;
    av_dict_set_int: unsafe extern "C" fn(
      pm: *mut *mut AVDictionary,
      key: *const c_char,
      value: i64,
      flags: c_int,
    ) -> c_int;
    av_dict_parse_string: unsafe extern "C" fn(
      pm: *mut *mut AVDictionary,
      s: *const c_char,
      key_val_sep: *const c_char,
      pairs_sep: *const c_char,
      flags: c_int,
    ) -> c_int;
    av_dict_copy: unsafe extern "C" fn(dst: *mut *mut AVDictionary, src: *const AVDictionary, flags: c_int);
    av_dict_free: unsafe extern "C" fn(m: *mut *mut AVDictionary);
  }
  optional {
    /// Serialise into an `av_malloc`ed string
    av_dict_get_string: unsafe extern "C" fn(
      m: *const AVDictionary,
      buffer: *mut *mut c_char,
      key_val_sep: c_char,
      pairs_sep: c_char,
    ) -> c_int;
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ffi::testing;
  use std::ffi::{CStr, CString};
  use std::ptr;

  #[test]
  fn test_entry_layout() {
    assert_eq!(std::mem::size_of::<AVDictionaryEntry>(), 2 * std::mem::size_of::<usize>());
  }

  #[test]
  fn test_native_set_get() {
    let Some(lib) = testing::native() else {
      return;
    };
    let api = &lib.dict;
    let key = CString::new("Title").unwrap();
    let value = CString::new("clip").unwrap();
    let lookup = CString::new("title").unwrap();

    unsafe {
      let mut dict: *mut AVDictionary = ptr::null_mut();
      assert_eq!((api.av_dict_set)(&mut dict, key.as_ptr(), value.as_ptr(), 0), 0);
      assert!(!dict.is_null());
      assert_eq!((api.av_dict_count)(dict), 1);

      // Case-insensitive unless MATCH_CASE
      let entry = (api.av_dict_get)(dict, lookup.as_ptr(), ptr::null(), 0);
      assert!(!entry.is_null());
      assert_eq!(CStr::from_ptr((*entry).value).to_str().unwrap(), "clip");
      assert!((api.av_dict_get)(dict, lookup.as_ptr(), ptr::null(), dict_flag::MATCH_CASE).is_null());

      (api.av_dict_free)(&mut dict);
      assert!(dict.is_null());
    }
  }
}
