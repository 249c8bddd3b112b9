//! `aes.h`, `blowfish.h`, `camellia.h` and `cast5.h`: block ciphers
//!
//! AES, Camellia and CAST5 contexts are opaque and sized by an exported
//! `int`. `AVBlowfish` has a public layout and may live in Rust memory.
//! `count` arguments are in blocks; a null `iv` selects ECB, otherwise CBC.

use std::os::raw::c_int;

use super::loader::NativeStatic;

opaque_types! {
  AVAES;
  AVCAMELLIA;
  AVCAST5;
}

pub const AV_BF_ROUNDS: usize = 16;

/// Blowfish key schedule
#[repr(C)]
#[derive(Clone)]
pub struct AVBlowfish {
  pub p: [u32; AV_BF_ROUNDS + 2],
  pub s: [[u32; 256]; 4],
}

impl AVBlowfish {
  pub const fn zeroed() -> Self {
    Self {
      p: [0; AV_BF_ROUNDS + 2],
      s: [[0; 256]; 4],
    }
  }
}

impl std::fmt::Debug for AVBlowfish {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    // Never print key material
    f.debug_struct("AVBlowfish").finish_non_exhaustive()
  }
}

avutil_symbols! {
  pub struct AesApi {
    /// `sizeof(AVAES)`
    av_aes_size: NativeStatic<c_int>;
    av_aes_alloc: unsafe extern "C" fn() -> *mut AVAES;
    /// `key_bits` is 128, 192 or 256
    av_aes_init: unsafe extern "C" fn(a: *mut AVAES, key: *const u8, key_bits: c_int, decrypt: c_int) -> c_int;
    av_aes_crypt: unsafe extern "C" fn(
      a: *mut AVAES,
      dst: *mut u8,
      src: *const u8,
      count: c_int,
      iv: *mut u8,
      decrypt: c_int,
    );
  }
}

avutil_symbols! {
  pub struct BlowfishApi {
    /// `key_len` in bytes
    av_blowfish_init: unsafe extern "C" fn(ctx: *mut AVBlowfish, key: *const u8, key_len: c_int);
    /// Encrypt or decrypt one block given as two big-endian words
    av_blowfish_crypt_ecb: unsafe extern "C" fn(ctx: *mut AVBlowfish, xl: *mut u32, xr: *mut u32, decrypt: c_int);
    av_blowfish_crypt: unsafe extern "C" fn(
      ctx: *mut AVBlowfish,
      dst: *mut u8,
      src: *const u8,
      count: c_int,
      iv: *mut u8,
      decrypt: c_int,
    );
  }
  optional {
    av_blowfish_alloc: unsafe extern "C" fn() -> *mut AVBlowfish;
  }
}

avutil_symbols! {
  pub struct CamelliaApi {
    av_camellia_size: NativeStatic<c_int>;
    av_camellia_alloc: unsafe extern "C" fn() -> *mut AVCAMELLIA;
    av_camellia_init: unsafe extern "C" fn(ctx: *mut AVCAMELLIA, key: *const u8, key_bits: c_int) -> c_int;
    av_camellia_crypt: unsafe extern "C" fn(
      ctx: *mut AVCAMELLIA,
      dst: *mut u8,
      src: *const u8,
      count: c_int,
      iv: *mut u8,
      decrypt: c_int,
    );
  }
}

avutil_symbols! {
  pub struct Cast5Api {
    av_cast5_size: NativeStatic<c_int>;
    av_cast5_alloc: unsafe extern "C" fn() -> *mut AVCAST5;
    /// `key_bits` is 40 to 128 in steps of 8
    av_cast5_init: unsafe extern "C" fn(ctx: *mut AVCAST5, key: *const u8, key_bits: c_int) -> c_int;
    /// ECB only
    av_cast5_crypt: unsafe extern "C" fn(ctx: *mut AVCAST5, dst: *mut u8, src: *const u8, count: c_int, decrypt: c_int);
  }
  optional {
    /// ECB or CBC
    av_cast5_crypt2: unsafe extern "C" fn(
      ctx: *mut AVCAST5,
      dst: *mut u8,
      src: *const u8,
      count: c_int,
      iv: *mut u8,
      decrypt: c_int,
    );
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ffi::testing;
  use std::os::raw::c_void;
  use std::ptr;

  const KEY: [u8; 16] = [
    0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef, 0xfe, 0xdc, 0xba, 0x98, 0x76, 0x54, 0x32, 0x10,
  ];

  #[test]
  fn test_blowfish_layout() {
    assert_eq!(std::mem::size_of::<AVBlowfish>(), 4168);
  }

  #[test]
  fn test_native_aes_fips197() {
    let Some(lib) = testing::native() else {
      return;
    };
    let key: Vec<u8> = (0u8..16).collect();
    let plain: [u8; 16] = [
      0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff,
    ];
    let expected: [u8; 16] = [
      0x69, 0xc4, 0xe0, 0xd8, 0x6a, 0x7b, 0x04, 0x30, 0xd8, 0xcd, 0xb7, 0x80, 0x70, 0xb4, 0xc5, 0x5a,
    ];

    unsafe {
      assert!(lib.aes.av_aes_size.read() > 0);
      let ctx = (lib.aes.av_aes_alloc)();
      assert_eq!((lib.aes.av_aes_init)(ctx, key.as_ptr(), 128, 0), 0);
      let mut out = [0u8; 16];
      (lib.aes.av_aes_crypt)(ctx, out.as_mut_ptr(), plain.as_ptr(), 1, ptr::null_mut(), 0);
      assert_eq!(out, expected);
      (lib.mem.av_free)(ctx as *mut c_void);
    }
  }

  #[test]
  fn test_native_blowfish_zero_key() {
    let Some(lib) = testing::native() else {
      return;
    };
    let mut ctx = Box::new(AVBlowfish::zeroed());

    unsafe {
      (lib.blowfish.av_blowfish_init)(&mut *ctx, [0u8; 8].as_ptr(), 8);
      let (mut xl, mut xr) = (0u32, 0u32);
      (lib.blowfish.av_blowfish_crypt_ecb)(&mut *ctx, &mut xl, &mut xr, 0);
      assert_eq!((xl, xr), (0x4EF9_9745, 0x6198_DD78));
      (lib.blowfish.av_blowfish_crypt_ecb)(&mut *ctx, &mut xl, &mut xr, 1);
      assert_eq!((xl, xr), (0, 0));
    }
  }

  #[test]
  fn test_native_camellia_rfc3713() {
    let Some(lib) = testing::native() else {
      return;
    };
    let expected: [u8; 16] = [
      0x67, 0x67, 0x31, 0x38, 0x54, 0x96, 0x69, 0x73, 0x08, 0x57, 0x06, 0x56, 0x48, 0xea, 0xbe, 0x43,
    ];

    unsafe {
      let ctx = (lib.camellia.av_camellia_alloc)();
      assert_eq!((lib.camellia.av_camellia_init)(ctx, KEY.as_ptr(), 128), 0);
      let mut out = [0u8; 16];
      (lib.camellia.av_camellia_crypt)(ctx, out.as_mut_ptr(), KEY.as_ptr(), 1, ptr::null_mut(), 0);
      assert_eq!(out, expected);
      (lib.mem.av_free)(ctx as *mut c_void);
    }
  }

  #[test]
  fn test_native_cast5_rfc2144() {
    let Some(lib) = testing::native() else {
      return;
    };
    let key: [u8; 16] = [
      0x01, 0x23, 0x45, 0x67, 0x12, 0x34, 0x56, 0x78, 0x23, 0x45, 0x67, 0x89, 0x34, 0x56, 0x78, 0x9a,
    ];
    let plain: [u8; 8] = [0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef];
    let expected: [u8; 8] = [0x23, 0x8b, 0x4f, 0xe5, 0x84, 0x7e, 0x44, 0xb2];

    unsafe {
      let ctx = (lib.cast5.av_cast5_alloc)();
      assert_eq!((lib.cast5.av_cast5_init)(ctx, key.as_ptr(), 128), 0);
      let mut out = [0u8; 8];
      (lib.cast5.av_cast5_crypt)(ctx, out.as_mut_ptr(), plain.as_ptr(), 1, 0);
      assert_eq!(out, expected);
      (lib.mem.av_free)(ctx as *mut c_void);
    }
  }
}
