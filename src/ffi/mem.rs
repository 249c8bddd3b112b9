//! `mem.h`: aligned allocation and dynamic arrays
//!
//! Memory returned by these functions must go back through `av_free` or
//! `av_freep`, never the Rust allocator.

use std::os::raw::{c_char, c_int, c_uint, c_void};

avutil_symbols! {
  pub struct MemApi {
    av_malloc: unsafe extern "C" fn(size: usize) -> *mut c_void;
    av_mallocz: unsafe extern "C" fn(size: usize) -> *mut c_void;
    av_calloc: unsafe extern "C" fn(nmemb: usize, size: usize) -> *mut c_void;
    av_realloc: unsafe extern "C" fn(ptr: *mut c_void, size: usize) -> *mut c_void;
    /// Frees `ptr` when the reallocation fails
    av_realloc_f: unsafe extern "C" fn(ptr: *mut c_void, nelem: usize, elsize: usize) -> *mut c_void;
    /// `ptr` is a pointer to the pointer to reallocate; it is freed and nulled on failure
    av_reallocp: unsafe extern "C" fn(ptr: *mut c_void, size: usize) -> c_int;
    av_realloc_array: unsafe extern "C" fn(ptr: *mut c_void, nmemb: usize, size: usize) -> *mut c_void;
    av_reallocp_array: unsafe extern "C" fn(ptr: *mut c_void, nmemb: usize, size: usize) -> c_int;
    av_free: unsafe extern "C" fn(ptr: *mut c_void);
    /// `ptr` is a pointer to the pointer to free; it is set to null
    av_freep: unsafe extern "C" fn(ptr: *mut c_void);
    av_strdup: unsafe extern "C" fn(s: *const c_char) -> *mut c_char;
    av_strndup: unsafe extern "C" fn(s: *const c_char, len: usize) -> *mut c_char;
    av_memdup: unsafe extern "C" fn(p: *const c_void, size: usize) -> *mut c_void;
    av_dynarray_add: unsafe extern "C" fn(tab_ptr: *mut c_void, nb_ptr: *mut c_int, elem: *mut c_void);
    av_dynarray2_add: unsafe extern "C" fn(
      tab_ptr: *mut *mut c_void,
      nb_ptr: *mut c_int,
      elem_size: usize,
      elem_data: *const u8,
    ) -> *mut c_void;
    /// Cap on the size of a single allocation
    av_max_alloc: unsafe extern "C" fn(max: usize);
    /// Overlapping back-reference copy used by LZ-style decoders
    av_memcpy_backptr: unsafe extern "C" fn(dst: *mut u8, back: c_int, cnt: c_int);
    av_fast_realloc: unsafe extern "C" fn(ptr: *mut c_void, size: *mut c_uint, min_size: usize) -> *mut c_void;
    av_fast_malloc: unsafe extern "C" fn(ptr: *mut c_void, size: *mut c_uint, min_size: usize);
  }
  optional {
    av_dynarray_add_nofree: unsafe extern "C" fn(tab_ptr: *mut c_void, nb_ptr: *mut c_int, elem: *mut c_void) -> c_int;
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ffi::testing;
  use std::ffi::{CStr, CString};
  use std::ptr;

  #[test]
  fn test_symbol_table() {
    assert!(MemApi::SYMBOLS.contains(&"av_reallocp"));
    assert_eq!(MemApi::OPTIONAL_SYMBOLS, &["av_dynarray_add_nofree"]);
  }

  #[test]
  fn test_native_alloc_free() {
    let Some(lib) = testing::native() else {
      return;
    };

    unsafe {
      let mut block = (lib.mem.av_mallocz)(64) as *mut u8;
      assert!(!block.is_null());
      assert!(std::slice::from_raw_parts(block, 64).iter().all(|b| *b == 0));

      let ret = (lib.mem.av_reallocp)(&mut block as *mut *mut u8 as *mut c_void, 4096);
      assert_eq!(ret, 0);
      assert!(!block.is_null());

      (lib.mem.av_freep)(&mut block as *mut *mut u8 as *mut c_void);
      assert!(block.is_null());
    }
  }

  #[test]
  fn test_native_strdup() {
    let Some(lib) = testing::native() else {
      return;
    };

    let source = CString::new("libavutil").unwrap();
    unsafe {
      let copy = (lib.mem.av_strndup)(source.as_ptr(), 5);
      assert_eq!(CStr::from_ptr(copy).to_str().unwrap(), "libav");
      (lib.mem.av_free)(copy as *mut c_void);
      (lib.mem.av_free)(ptr::null_mut());
    }
  }
}
