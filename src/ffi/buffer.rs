//! `buffer.h`: reference-counted buffers and buffer pools

use std::os::raw::{c_int, c_void};

opaque_types! {
  /// Shared, reference-counted data buffer (internal layout)
  AVBuffer;
  /// Pool of preallocated `AVBuffer`s
  AVBufferPool;
}

/// A reference to an `AVBuffer`
#[repr(C)]
#[derive(Debug)]
pub struct AVBufferRef {
  pub buffer: *mut AVBuffer,
  /// Data of the buffer; writable only when this is the sole reference
  pub data: *mut u8,
  /// Size of `data` in bytes
  pub size: c_int,
}

/// Always treat the buffer as read-only
pub const AV_BUFFER_FLAG_READONLY: c_int = 1 << 0;

/// Called when the last reference to a created buffer goes away
pub type AVBufferFreeFn = unsafe extern "C" fn(opaque: *mut c_void, data: *mut u8);

/// Allocator used by a buffer pool
pub type AVBufferAllocFn = unsafe extern "C" fn(size: c_int) -> *mut AVBufferRef;

avutil_symbols! {
  pub struct BufferApi {
    av_buffer_alloc: unsafe extern "C" fn(size: c_int) -> *mut AVBufferRef;
    av_buffer_allocz: unsafe extern "C" fn(size: c_int) -> *mut AVBufferRef;
    /// Wrap existing data; `free` (or `av_buffer_default_free` when null) releases it
    av_buffer_create: unsafe extern "C" fn(
      data: *mut u8,
      size: c_int,
      free: Option<AVBufferFreeFn>,
      opaque: *mut c_void,
      flags: c_int,
    ) -> *mut AVBufferRef;
    av_buffer_default_free: unsafe extern "C" fn(opaque: *mut c_void, data: *mut u8);
    av_buffer_ref: unsafe extern "C" fn(buf: *mut AVBufferRef) -> *mut AVBufferRef;
    av_buffer_unref: unsafe extern "C" fn(buf: *mut *mut AVBufferRef);
    av_buffer_is_writable: unsafe extern "C" fn(buf: *const AVBufferRef) -> c_int;
    av_buffer_get_opaque: unsafe extern "C" fn(buf: *const AVBufferRef) -> *mut c_void;
    av_buffer_get_ref_count: unsafe extern "C" fn(buf: *const AVBufferRef) -> c_int;
    /// Copy the data if other references exist
    av_buffer_make_writable: unsafe extern "C" fn(buf: *mut *mut AVBufferRef) -> c_int;
    av_buffer_realloc: unsafe extern "C" fn(buf: *mut *mut AVBufferRef, size: c_int) -> c_int;
    av_buffer_pool_init: unsafe extern "C" fn(size: c_int, alloc: Option<AVBufferAllocFn>) -> *mut AVBufferPool;
    /// The pool is freed once every buffer taken from it is returned
    av_buffer_pool_uninit: unsafe extern "C" fn(pool: *mut *mut AVBufferPool);
    av_buffer_pool_get: unsafe extern "C" fn(pool: *mut AVBufferPool) -> *mut AVBufferRef;
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ffi::testing;
  use std::mem::{offset_of, size_of};
  use std::ptr;

  #[test]
  #[cfg(target_pointer_width = "64")]
  fn test_buffer_ref_layout() {
    assert_eq!(size_of::<AVBufferRef>(), 24);
    assert_eq!(offset_of!(AVBufferRef, data), 8);
    assert_eq!(offset_of!(AVBufferRef, size), 16);
  }

  #[test]
  fn test_native_ref_unref() {
    let Some(lib) = testing::native() else {
      return;
    };
    let api = &lib.buffer;

    unsafe {
      let mut first = (api.av_buffer_allocz)(128);
      assert!(!first.is_null());
      assert_eq!((*first).size, 128);
      assert_eq!((api.av_buffer_is_writable)(first), 1);

      let mut second = (api.av_buffer_ref)(first);
      assert_eq!((api.av_buffer_get_ref_count)(first), 2);
      assert_eq!((api.av_buffer_is_writable)(first), 0);
      assert_eq!((*first).data, (*second).data);

      (api.av_buffer_unref)(&mut second);
      assert!(second.is_null());
      assert_eq!((api.av_buffer_get_ref_count)(first), 1);

      (api.av_buffer_unref)(&mut first);
      assert!(first.is_null());
    }
  }

  #[test]
  fn test_native_pool() {
    let Some(lib) = testing::native() else {
      return;
    };
    let api = &lib.buffer;

    unsafe {
      let mut pool = (api.av_buffer_pool_init)(256, None);
      assert!(!pool.is_null());

      let mut buf = (api.av_buffer_pool_get)(pool);
      assert!(!buf.is_null());
      assert_eq!((*buf).size, 256);

      (api.av_buffer_unref)(&mut buf);
      (api.av_buffer_pool_uninit)(&mut pool);
      assert!(pool.is_null());
      (api.av_buffer_unref)(&mut ptr::null_mut());
    }
  }
}
