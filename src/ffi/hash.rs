//! `adler32.h`, `crc.h`, `md5.h`, `murmur3.h`, `hash.h` and `hmac.h`

use std::os::raw::{c_char, c_int, c_uint, c_ulong};

use super::loader::NativeStatic;

opaque_types! {
  AVMD5;
  AVMurMur3;
  /// Generic hash context of `hash.h`
  AVHashContext;
  AVHMAC;
}

/// CRC table entry
pub type AVCRC = u32;

c_enum! {
  /// Precomputed CRC tables
  pub enum AVCRCId {
    Crc8Atm = 0,
    Crc16Ansi = 1,
    Crc16Ccitt = 2,
    Crc32Ieee = 3,
    /// Reversed bitorder, as used by zlib and PNG
    Crc32IeeeLe = 4,
    Crc16AnsiLe = 5,
    Crc24Ieee = 12,
  }
}

c_enum! {
  pub enum AVHMACType {
    Md5 = 0,
    Sha1 = 1,
    Sha224 = 10,
    Sha256 = 11,
    Sha384 = 12,
    Sha512 = 13,
  }
}

impl AVHMACType {
  /// Digest size in bytes
  pub const fn digest_len(self) -> usize {
    match self {
      Self::Md5 => 16,
      Self::Sha1 => 20,
      Self::Sha224 => 28,
      Self::Sha256 => 32,
      Self::Sha384 => 48,
      Self::Sha512 => 64,
    }
  }
}

/// Largest digest any `av_hash` algorithm produces
pub const AV_HASH_MAX_SIZE: usize = 64;

avutil_symbols! {
  pub struct CrcApi {
    /// Build a table; `ctx_size` is in bytes, 257 entries or 1024 for the sliced variant
    av_crc_init: unsafe extern "C" fn(ctx: *mut AVCRC, le: c_int, bits: c_int, poly: u32, ctx_size: c_int) -> c_int;
    av_crc_get_table: unsafe extern "C" fn(crc_id: c_int) -> *const AVCRC;
    /// No pre/post inversion; callers apply it when the standard wants it
    av_crc: unsafe extern "C" fn(ctx: *const AVCRC, crc: u32, buffer: *const u8, length: usize) -> u32;
    av_adler32_update: unsafe extern "C" fn(adler: c_ulong, buf: *const u8, len: c_uint) -> c_ulong;
  }
}

avutil_symbols! {
  pub struct Md5Api {
    av_md5_size: NativeStatic<c_int>;
    av_md5_alloc: unsafe extern "C" fn() -> *mut AVMD5;
    av_md5_init: unsafe extern "C" fn(ctx: *mut AVMD5);
    av_md5_update: unsafe extern "C" fn(ctx: *mut AVMD5, src: *const u8, len: c_int);
    av_md5_final: unsafe extern "C" fn(ctx: *mut AVMD5, dst: *mut u8);
    /// One-shot digest into 16 bytes at `dst`
    av_md5_sum: unsafe extern "C" fn(dst: *mut u8, src: *const u8, len: c_int);
  }
}

avutil_symbols! {
  pub struct Murmur3Api {
    av_murmur3_alloc: unsafe extern "C" fn() -> *mut AVMurMur3;
    av_murmur3_init_seeded: unsafe extern "C" fn(c: *mut AVMurMur3, seed: u64);
    av_murmur3_init: unsafe extern "C" fn(c: *mut AVMurMur3);
    av_murmur3_update: unsafe extern "C" fn(c: *mut AVMurMur3, src: *const u8, len: c_int);
    /// 128-bit digest
    av_murmur3_final: unsafe extern "C" fn(c: *mut AVMurMur3, dst: *mut u8);
  }
}

avutil_symbols! {
  pub struct HashApi {
    /// `name` as listed by `av_hash_names`, e.g. "SHA256" or "CRC32"
    av_hash_alloc: unsafe extern "C" fn(ctx: *mut *mut AVHashContext, name: *const c_char) -> c_int;
    /// Null past the last algorithm
    av_hash_names: unsafe extern "C" fn(i: c_int) -> *const c_char;
    av_hash_get_name: unsafe extern "C" fn(ctx: *const AVHashContext) -> *const c_char;
    av_hash_get_size: unsafe extern "C" fn(ctx: *const AVHashContext) -> c_int;
    av_hash_init: unsafe extern "C" fn(ctx: *mut AVHashContext);
    av_hash_update: unsafe extern "C" fn(ctx: *mut AVHashContext, src: *const u8, len: c_int);
    av_hash_final: unsafe extern "C" fn(ctx: *mut AVHashContext, dst: *mut u8);
    av_hash_final_bin: unsafe extern "C" fn(ctx: *mut AVHashContext, dst: *mut u8, size: c_int);
    av_hash_final_hex: unsafe extern "C" fn(ctx: *mut AVHashContext, dst: *mut u8, size: c_int);
    av_hash_final_b64: unsafe extern "C" fn(ctx: *mut AVHashContext, dst: *mut u8, size: c_int);
    av_hash_freep: unsafe extern "C" fn(ctx: *mut *mut AVHashContext);
  }
}

avutil_symbols! {
  pub struct HmacApi {
    av_hmac_alloc: unsafe extern "C" fn(type_: c_int) -> *mut AVHMAC;
    av_hmac_free: unsafe extern "C" fn(ctx: *mut AVHMAC);
    av_hmac_init: unsafe extern "C" fn(ctx: *mut AVHMAC, key: *const u8, keylen: c_uint);
    av_hmac_update: unsafe extern "C" fn(ctx: *mut AVHMAC, data: *const u8, len: c_uint);
    /// Returns the digest length, or a negative error when `outlen` is too small
    av_hmac_final: unsafe extern "C" fn(ctx: *mut AVHMAC, out: *mut u8, outlen: c_uint) -> c_int;
    av_hmac_calc: unsafe extern "C" fn(
      ctx: *mut AVHMAC,
      data: *const u8,
      len: c_uint,
      key: *const u8,
      keylen: c_uint,
      out: *mut u8,
      outlen: c_uint,
    ) -> c_int;
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ffi::testing;
  use std::ffi::CStr;
  use std::ptr;

  #[test]
  fn test_ids() {
    assert_eq!(AVCRCId::Crc24Ieee.as_raw(), 12);
    assert_eq!(AVCRCId::from_raw(6), None);
    assert_eq!(AVHMACType::Sha256.as_raw(), 11);
    assert_eq!(AVHMACType::Sha512.digest_len(), AV_HASH_MAX_SIZE);
  }

  #[test]
  fn test_native_md5() {
    let Some(lib) = testing::native() else {
      return;
    };
    let expected = [
      0x90, 0x01, 0x50, 0x98, 0x3c, 0xd2, 0x4f, 0xb0, 0xd6, 0x96, 0x3f, 0x7d, 0x28, 0xe1, 0x7f, 0x72,
    ];

    let mut digest = [0u8; 16];
    unsafe {
      (lib.md5.av_md5_sum)(digest.as_mut_ptr(), b"abc".as_ptr(), 3);
      assert_eq!(digest, expected);

      let ctx = (lib.md5.av_md5_alloc)();
      (lib.md5.av_md5_init)(ctx);
      (lib.md5.av_md5_update)(ctx, b"a".as_ptr(), 1);
      (lib.md5.av_md5_update)(ctx, b"bc".as_ptr(), 2);
      let mut streamed = [0u8; 16];
      (lib.md5.av_md5_final)(ctx, streamed.as_mut_ptr());
      assert_eq!(streamed, expected);
      (lib.mem.av_free)(ctx.cast());
    }
  }

  #[test]
  fn test_native_crc_and_adler() {
    let Some(lib) = testing::native() else {
      return;
    };
    let input = b"123456789";

    unsafe {
      let table = (lib.crc.av_crc_get_table)(AVCRCId::Crc32IeeeLe.as_raw());
      assert!(!table.is_null());
      let crc = (lib.crc.av_crc)(table, u32::MAX, input.as_ptr(), input.len()) ^ u32::MAX;
      assert_eq!(crc, 0xCBF4_3926);

      let adler = (lib.crc.av_adler32_update)(1, b"Wikipedia".as_ptr(), 9);
      assert_eq!(adler, 0x11E6_0398);
    }
  }

  #[test]
  fn test_hash_finalizers_required() {
    for name in ["av_hash_final_bin", "av_hash_final_hex", "av_hash_final_b64"] {
      assert!(HashApi::SYMBOLS.contains(&name), "{name}");
    }
    assert!(HashApi::OPTIONAL_SYMBOLS.is_empty());
  }

  #[test]
  fn test_native_hash_final_bin() {
    let Some(lib) = testing::native() else {
      return;
    };
    let api = &lib.hash;

    unsafe {
      let mut ctx = ptr::null_mut();
      assert_eq!((api.av_hash_alloc)(&mut ctx, c"CRC32".as_ptr()), 0);
      (api.av_hash_init)(ctx);
      (api.av_hash_update)(ctx, b"123456789".as_ptr(), 9);
      let mut out = [0u8; 4];
      (api.av_hash_final_bin)(ctx, out.as_mut_ptr(), out.len() as c_int);
      (api.av_hash_freep)(&mut ctx);
      assert_eq!(out, [0xcb, 0xf4, 0x39, 0x26]);
    }
  }

  #[test]
  fn test_native_hash_sha256_hex() {
    let Some(lib) = testing::native() else {
      return;
    };
    let api = &lib.hash;

    unsafe {
      let mut ctx = ptr::null_mut();
      assert_eq!((api.av_hash_alloc)(&mut ctx, c"SHA256".as_ptr()), 0);
      assert_eq!((api.av_hash_get_size)(ctx), 32);
      (api.av_hash_init)(ctx);
      (api.av_hash_update)(ctx, b"abc".as_ptr(), 3);
      let mut hex = [0u8; 2 * 32 + 1];
      (api.av_hash_final_hex)(ctx, hex.as_mut_ptr(), hex.len() as c_int);
      assert_eq!(
        CStr::from_bytes_until_nul(&hex).unwrap().to_str().unwrap(),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
      );
      (api.av_hash_freep)(&mut ctx);
      assert!(ctx.is_null());

      assert!((api.av_hash_alloc)(&mut ctx, c"NOPE".as_ptr()) < 0);
      assert!(!(api.av_hash_names)(0).is_null());
    }
  }

  #[test]
  fn test_native_hmac_md5_rfc2202() {
    let Some(lib) = testing::native() else {
      return;
    };
    let data = b"what do ya want for nothing?";
    let key = b"Jefe";
    let expected = [
      0x75, 0x0c, 0x78, 0x3e, 0x6a, 0xb0, 0xb5, 0x03, 0xea, 0xa8, 0x6e, 0x31, 0x0a, 0x5d, 0xb7, 0x38,
    ];

    unsafe {
      let ctx = (lib.hmac.av_hmac_alloc)(AVHMACType::Md5.as_raw());
      let mut out = [0u8; 16];
      let len = (lib.hmac.av_hmac_calc)(
        ctx,
        data.as_ptr(),
        data.len() as c_uint,
        key.as_ptr(),
        key.len() as c_uint,
        out.as_mut_ptr(),
        out.len() as c_uint,
      );
      assert_eq!(len, 16);
      assert_eq!(out, expected);
      (lib.hmac.av_hmac_free)(ctx);
    }
  }

  #[test]
  fn test_native_murmur3_seed() {
    let Some(lib) = testing::native() else {
      return;
    };
    let api = &lib.murmur3;

    let digest = |seed: Option<u64>| unsafe {
      let ctx = (api.av_murmur3_alloc)();
      match seed {
        Some(seed) => (api.av_murmur3_init_seeded)(ctx, seed),
        None => (api.av_murmur3_init)(ctx),
      }
      (api.av_murmur3_update)(ctx, b"libavutil".as_ptr(), 9);
      let mut out = [0u8; 16];
      (api.av_murmur3_final)(ctx, out.as_mut_ptr());
      (lib.mem.av_free)(ctx.cast());
      out
    };

    assert_eq!(digest(None), digest(None));
    assert_ne!(digest(Some(1)), digest(Some(2)));
  }
}
