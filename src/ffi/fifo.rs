//! `fifo.h` and `audio_fifo.h`: byte and audio sample FIFOs

use std::os::raw::{c_int, c_uint, c_void};

/// Circular byte buffer; the layout is public
#[repr(C)]
#[derive(Debug)]
pub struct AVFifoBuffer {
  pub buffer: *mut u8,
  pub rptr: *mut u8,
  pub wptr: *mut u8,
  pub end: *mut u8,
  pub rndx: u32,
  pub wndx: u32,
}

opaque_types! {
  /// Per-channel sample FIFO
  AVAudioFifo;
}

/// Copies out of the FIFO: `(dest, src, size)`
pub type AVFifoReadFn = unsafe extern "C" fn(dest: *mut c_void, src: *mut c_void, size: c_int);
/// Fills the FIFO: `(src, dest, size)`, returns bytes written
pub type AVFifoWriteFn = unsafe extern "C" fn(src: *mut c_void, dest: *mut c_void, size: c_int) -> c_int;

/// `av_fifo_peek2`: pointer to the byte `offs` bytes past the read pointer,
/// wrapping around the end of the buffer
///
/// # Safety
/// `f` must point to a live FIFO and `offs` must be within its data.
pub unsafe fn av_fifo_peek2(f: *const AVFifoBuffer, offs: c_int) -> *mut u8 {
  let f = &*f;
  let ptr = f.rptr.wrapping_offset(offs as isize);
  if ptr >= f.end {
    f.buffer.wrapping_add((ptr as usize).wrapping_sub(f.end as usize))
  } else if ptr < f.buffer {
    f.end.wrapping_sub((f.buffer as usize).wrapping_sub(ptr as usize))
  } else {
    ptr
  }
}

avutil_symbols! {
  pub struct FifoApi {
    av_fifo_alloc: unsafe extern "C" fn(size: c_uint) -> *mut AVFifoBuffer;
    av_fifo_free: unsafe extern "C" fn(f: *mut AVFifoBuffer);
    av_fifo_freep: unsafe extern "C" fn(f: *mut *mut AVFifoBuffer);
    av_fifo_reset: unsafe extern "C" fn(f: *mut AVFifoBuffer);
    /// Bytes available to read
    av_fifo_size: unsafe extern "C" fn(f: *const AVFifoBuffer) -> c_int;
    /// Bytes available to write
    av_fifo_space: unsafe extern "C" fn(f: *const AVFifoBuffer) -> c_int;
    /// A null `func` copies with `memcpy`
    av_fifo_generic_read: unsafe extern "C" fn(
      f: *mut AVFifoBuffer,
      dest: *mut c_void,
      buf_size: c_int,
      func: Option<AVFifoReadFn>,
    ) -> c_int;
    /// A null `func` copies from `src` with `memcpy`
    av_fifo_generic_write: unsafe extern "C" fn(
      f: *mut AVFifoBuffer,
      src: *mut c_void,
      size: c_int,
      func: Option<AVFifoWriteFn>,
    ) -> c_int;
    /// Never shrinks below the data already queued
    av_fifo_realloc2: unsafe extern "C" fn(f: *mut AVFifoBuffer, new_size: c_uint) -> c_int;
    av_fifo_drain: unsafe extern "C" fn(f: *mut AVFifoBuffer, size: c_int);
  }
  optional {
    av_fifo_alloc_array: unsafe extern "C" fn(nmemb: usize, size: usize) -> *mut AVFifoBuffer;
    av_fifo_generic_peek: unsafe extern "C" fn(
      f: *mut AVFifoBuffer,
      dest: *mut c_void,
      buf_size: c_int,
      func: Option<AVFifoReadFn>,
    ) -> c_int;
    av_fifo_grow: unsafe extern "C" fn(f: *mut AVFifoBuffer, additional_space: c_uint) -> c_int;
  }
}

avutil_symbols! {
  pub struct AudioFifoApi {
    av_audio_fifo_free: unsafe extern "C" fn(af: *mut AVAudioFifo);
    av_audio_fifo_alloc: unsafe extern "C" fn(sample_fmt: c_int, channels: c_int, nb_samples: c_int) -> *mut AVAudioFifo;
    av_audio_fifo_realloc: unsafe extern "C" fn(af: *mut AVAudioFifo, nb_samples: c_int) -> c_int;
    /// Grows as needed; `data` holds one pointer per plane
    av_audio_fifo_write: unsafe extern "C" fn(af: *mut AVAudioFifo, data: *mut *mut c_void, nb_samples: c_int) -> c_int;
    av_audio_fifo_read: unsafe extern "C" fn(af: *mut AVAudioFifo, data: *mut *mut c_void, nb_samples: c_int) -> c_int;
    av_audio_fifo_drain: unsafe extern "C" fn(af: *mut AVAudioFifo, nb_samples: c_int) -> c_int;
    av_audio_fifo_reset: unsafe extern "C" fn(af: *mut AVAudioFifo);
    av_audio_fifo_size: unsafe extern "C" fn(af: *mut AVAudioFifo) -> c_int;
    av_audio_fifo_space: unsafe extern "C" fn(af: *mut AVAudioFifo) -> c_int;
  }
  optional {
    av_audio_fifo_peek: unsafe extern "C" fn(af: *mut AVAudioFifo, data: *mut *mut c_void, nb_samples: c_int) -> c_int;
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ffi::testing;
  use crate::ffi::types::AVSampleFormat;
  use std::ptr;

  #[test]
  #[cfg(target_pointer_width = "64")]
  fn test_fifo_layout() {
    use std::mem::{offset_of, size_of};

    assert_eq!(offset_of!(AVFifoBuffer, end), 24);
    assert_eq!(offset_of!(AVFifoBuffer, wndx), 36);
    assert_eq!(size_of::<AVFifoBuffer>(), 40);
  }

  #[test]
  fn test_peek2_wraps() {
    let mut storage = [10u8, 11, 12, 13, 14, 15, 16, 17];
    let base = storage.as_mut_ptr();
    let fifo = AVFifoBuffer {
      buffer: base,
      rptr: unsafe { base.add(6) },
      wptr: unsafe { base.add(2) },
      end: unsafe { base.add(8) },
      rndx: 6,
      wndx: 10,
    };

    unsafe {
      assert_eq!(*av_fifo_peek2(&fifo, 0), 16);
      assert_eq!(*av_fifo_peek2(&fifo, 1), 17);
      assert_eq!(*av_fifo_peek2(&fifo, 2), 10);
      assert_eq!(*av_fifo_peek2(&fifo, 3), 11);
      assert_eq!(*av_fifo_peek2(&fifo, -6), 10);
      assert_eq!(*av_fifo_peek2(&fifo, -7), 17);
    }
  }

  #[test]
  fn test_native_fifo_roundtrip() {
    let Some(lib) = testing::native() else {
      return;
    };
    let api = &lib.fifo;

    unsafe {
      let mut fifo = (api.av_fifo_alloc)(8);
      assert!(!fifo.is_null());
      let mut input = *b"abcdef";
      assert_eq!((api.av_fifo_generic_write)(fifo, input.as_mut_ptr().cast(), 6, None), 6);
      assert_eq!((api.av_fifo_size)(fifo), 6);
      assert_eq!(*av_fifo_peek2(fifo, 1), b'b');

      (api.av_fifo_drain)(fifo, 2);
      let mut out = [0u8; 4];
      assert_eq!((api.av_fifo_generic_read)(fifo, out.as_mut_ptr().cast(), 4, None), 0);
      assert_eq!(&out, b"cdef");
      assert_eq!((api.av_fifo_size)(fifo), 0);

      (api.av_fifo_freep)(&mut fifo);
      assert!(fifo.is_null());
    }
  }

  #[test]
  fn test_native_audio_fifo() {
    let Some(lib) = testing::native() else {
      return;
    };
    let api = &lib.audio_fifo;

    unsafe {
      let af = (api.av_audio_fifo_alloc)(AVSampleFormat::S16p.as_raw(), 2, 4);
      assert!(!af.is_null());

      let mut left = [1i16; 10];
      let mut right = [2i16; 10];
      let mut planes = [left.as_mut_ptr().cast::<c_void>(), right.as_mut_ptr().cast::<c_void>()];
      assert_eq!((api.av_audio_fifo_write)(af, planes.as_mut_ptr(), 10), 10);
      assert_eq!((api.av_audio_fifo_size)(af), 10);

      assert_eq!((api.av_audio_fifo_drain)(af, 4), 0);
      let mut out_l = [0i16; 6];
      let mut out_r = [0i16; 6];
      let mut out = [out_l.as_mut_ptr().cast::<c_void>(), out_r.as_mut_ptr().cast::<c_void>()];
      assert_eq!((api.av_audio_fifo_read)(af, out.as_mut_ptr(), 6), 6);
      assert_eq!(out_l, [1; 6]);
      assert_eq!(out_r, [2; 6]);

      (api.av_audio_fifo_free)(af);
      (api.av_audio_fifo_free)(ptr::null_mut());
    }
  }
}
