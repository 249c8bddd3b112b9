//! Block ciphers
//!
//! Every cipher works on whole blocks: `dst` and `src` must have the same
//! length, a multiple of the block size. Passing an IV selects CBC and the IV
//! is updated in place so consecutive calls chain.

use std::os::raw::c_int;
use std::ptr::{self, NonNull};

use crate::ffi::crypto::{AVBlowfish, AVAES, AVCAMELLIA, AVCAST5};
use crate::ffi::AvUtil;

use super::{check, lib, require, UtilError, UtilResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

impl Direction {
    #[inline]
    fn decrypt_flag(self) -> c_int {
        matches!(self, Direction::Decrypt) as c_int
    }
}

/// Validate buffers and return the block count
fn block_count(dst: &[u8], src: &[u8], block: usize) -> UtilResult<c_int> {
    if dst.len() != src.len() {
        return Err(UtilError::InvalidArgument(format!(
            "output length {} does not match input length {}",
            dst.len(),
            src.len()
        )));
    }
    if src.len() % block != 0 {
        return Err(UtilError::InvalidArgument(format!(
            "input length {} is not a multiple of the {block} byte block",
            src.len()
        )));
    }
    c_int::try_from(src.len() / block).map_err(|_| UtilError::InvalidArgument("input too large".into()))
}

fn iv_ptr<const N: usize>(iv: Option<&mut [u8; N]>) -> *mut u8 {
    iv.map_or(ptr::null_mut(), |iv| iv.as_mut_ptr())
}

fn key_bits(key: &[u8], allowed: &[usize], cipher: &str) -> UtilResult<c_int> {
    if !allowed.contains(&key.len()) {
        return Err(UtilError::InvalidArgument(format!(
            "{cipher} key must be one of {allowed:?} bytes, got {}",
            key.len()
        )));
    }
    Ok((key.len() * 8) as c_int)
}

// ============================================================================
// AES
// ============================================================================

pub const AES_BLOCK_SIZE: usize = 16;

/// AES-128/192/256
///
/// The key schedule depends on the direction, so it is fixed at creation.
pub struct Aes {
    ptr: NonNull<AVAES>,
    lib: &'static AvUtil,
    direction: Direction,
}

impl Aes {
    pub fn new(key: &[u8], direction: Direction) -> UtilResult<Self> {
        let lib = lib()?;
        let bits = key_bits(key, &[16, 24, 32], "AES")?;
        let ptr = NonNull::new(unsafe { (lib.aes.av_aes_alloc)() }).ok_or(UtilError::AllocationFailed("AVAES"))?;
        let aes = Self { ptr, lib, direction };
        check(unsafe { (lib.aes.av_aes_init)(ptr.as_ptr(), key.as_ptr(), bits, direction.decrypt_flag()) })?;
        Ok(aes)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn crypt(&mut self, dst: &mut [u8], src: &[u8], iv: Option<&mut [u8; AES_BLOCK_SIZE]>) -> UtilResult<()> {
        let count = block_count(dst, src, AES_BLOCK_SIZE)?;
        unsafe {
            (self.lib.aes.av_aes_crypt)(
                self.ptr.as_ptr(),
                dst.as_mut_ptr(),
                src.as_ptr(),
                count,
                iv_ptr(iv),
                self.direction.decrypt_flag(),
            )
        };
        Ok(())
    }
}

impl Drop for Aes {
    fn drop(&mut self) {
        unsafe { (self.lib.mem.av_free)(self.ptr.as_ptr().cast()) }
    }
}

unsafe impl Send for Aes {}

impl std::fmt::Debug for Aes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aes").field("direction", &self.direction).finish_non_exhaustive()
    }
}

// ============================================================================
// Blowfish
// ============================================================================

pub const BLOWFISH_BLOCK_SIZE: usize = 8;

/// Blowfish with a 1 to 56 byte key
pub struct Blowfish {
    ctx: Box<AVBlowfish>,
    lib: &'static AvUtil,
}

impl Blowfish {
    pub fn new(key: &[u8]) -> UtilResult<Self> {
        let lib = lib()?;
        if key.is_empty() || key.len() > 56 {
            return Err(UtilError::InvalidArgument(format!(
                "Blowfish key must be 1 to 56 bytes, got {}",
                key.len()
            )));
        }
        let mut ctx = Box::new(AVBlowfish::zeroed());
        unsafe { (lib.blowfish.av_blowfish_init)(&mut *ctx, key.as_ptr(), key.len() as c_int) };
        Ok(Self { ctx, lib })
    }

    pub fn crypt(
        &mut self,
        direction: Direction,
        dst: &mut [u8],
        src: &[u8],
        iv: Option<&mut [u8; BLOWFISH_BLOCK_SIZE]>,
    ) -> UtilResult<()> {
        let count = block_count(dst, src, BLOWFISH_BLOCK_SIZE)?;
        unsafe {
            (self.lib.blowfish.av_blowfish_crypt)(
                &mut *self.ctx,
                dst.as_mut_ptr(),
                src.as_ptr(),
                count,
                iv_ptr(iv),
                direction.decrypt_flag(),
            )
        };
        Ok(())
    }

    /// One block as its big-endian halves
    pub fn crypt_block(&mut self, direction: Direction, (mut left, mut right): (u32, u32)) -> (u32, u32) {
        unsafe {
            (self.lib.blowfish.av_blowfish_crypt_ecb)(&mut *self.ctx, &mut left, &mut right, direction.decrypt_flag())
        };
        (left, right)
    }
}

impl Drop for Blowfish {
    fn drop(&mut self) {
        *self.ctx = AVBlowfish::zeroed();
    }
}

impl std::fmt::Debug for Blowfish {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Blowfish").finish_non_exhaustive()
    }
}

// ============================================================================
// Camellia
// ============================================================================

pub const CAMELLIA_BLOCK_SIZE: usize = 16;

/// Camellia-128/192/256
pub struct Camellia {
    ptr: NonNull<AVCAMELLIA>,
    lib: &'static AvUtil,
}

impl Camellia {
    pub fn new(key: &[u8]) -> UtilResult<Self> {
        let lib = lib()?;
        let bits = key_bits(key, &[16, 24, 32], "Camellia")?;
        let ptr = NonNull::new(unsafe { (lib.camellia.av_camellia_alloc)() })
            .ok_or(UtilError::AllocationFailed("AVCAMELLIA"))?;
        let camellia = Self { ptr, lib };
        check(unsafe { (lib.camellia.av_camellia_init)(ptr.as_ptr(), key.as_ptr(), bits) })?;
        Ok(camellia)
    }

    pub fn crypt(
        &mut self,
        direction: Direction,
        dst: &mut [u8],
        src: &[u8],
        iv: Option<&mut [u8; CAMELLIA_BLOCK_SIZE]>,
    ) -> UtilResult<()> {
        let count = block_count(dst, src, CAMELLIA_BLOCK_SIZE)?;
        unsafe {
            (self.lib.camellia.av_camellia_crypt)(
                self.ptr.as_ptr(),
                dst.as_mut_ptr(),
                src.as_ptr(),
                count,
                iv_ptr(iv),
                direction.decrypt_flag(),
            )
        };
        Ok(())
    }
}

impl Drop for Camellia {
    fn drop(&mut self) {
        unsafe { (self.lib.mem.av_free)(self.ptr.as_ptr().cast()) }
    }
}

unsafe impl Send for Camellia {}

impl std::fmt::Debug for Camellia {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Camellia").finish_non_exhaustive()
    }
}

// ============================================================================
// CAST5
// ============================================================================

pub const CAST5_BLOCK_SIZE: usize = 8;

/// CAST-128 with a 5 to 16 byte key
pub struct Cast5 {
    ptr: NonNull<AVCAST5>,
    lib: &'static AvUtil,
}

impl Cast5 {
    pub fn new(key: &[u8]) -> UtilResult<Self> {
        let lib = lib()?;
        let bits = key_bits(key, &[5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16], "CAST5")?;
        let ptr = NonNull::new(unsafe { (lib.cast5.av_cast5_alloc)() }).ok_or(UtilError::AllocationFailed("AVCAST5"))?;
        let cast5 = Self { ptr, lib };
        check(unsafe { (lib.cast5.av_cast5_init)(ptr.as_ptr(), key.as_ptr(), bits) })?;
        Ok(cast5)
    }

    /// CBC needs `av_cast5_crypt2`, which older builds lack
    pub fn crypt(
        &mut self,
        direction: Direction,
        dst: &mut [u8],
        src: &[u8],
        iv: Option<&mut [u8; CAST5_BLOCK_SIZE]>,
    ) -> UtilResult<()> {
        let count = block_count(dst, src, CAST5_BLOCK_SIZE)?;
        let decrypt = direction.decrypt_flag();
        match iv {
            None => unsafe {
                (self.lib.cast5.av_cast5_crypt)(self.ptr.as_ptr(), dst.as_mut_ptr(), src.as_ptr(), count, decrypt)
            },
            Some(iv) => {
                let crypt2 = require(self.lib.cast5.av_cast5_crypt2, "av_cast5_crypt2")?;
                unsafe { crypt2(self.ptr.as_ptr(), dst.as_mut_ptr(), src.as_ptr(), count, iv.as_mut_ptr(), decrypt) }
            }
        }
        Ok(())
    }
}

impl Drop for Cast5 {
    fn drop(&mut self) {
        unsafe { (self.lib.mem.av_free)(self.ptr.as_ptr().cast()) }
    }
}

unsafe impl Send for Cast5 {}

impl std::fmt::Debug for Cast5 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cast5").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ffi::testing;

    #[test]
    fn test_block_validation() {
        assert_eq!(block_count(&[0; 32], &[0; 32], 16).unwrap(), 2);
        assert!(matches!(
            block_count(&[0; 16], &[0; 17], 16),
            Err(UtilError::InvalidArgument(_))
        ));
        assert!(block_count(&[0; 12], &[0; 12], 8).is_err());
        assert!(key_bits(&[0; 20], &[16, 24, 32], "AES").is_err());
        assert_eq!(key_bits(&[0; 24], &[16, 24, 32], "AES").unwrap(), 192);
    }

    #[test]
    fn test_aes_cbc_roundtrip() {
        let Some(_) = testing::native() else {
            return;
        };

        let key: Vec<u8> = (0u8..32).collect();
        let plain: Vec<u8> = (0u8..64).collect();
        let iv = [7u8; AES_BLOCK_SIZE];

        let mut enc = Aes::new(&key, Direction::Encrypt).unwrap();
        let mut cipher = vec![0u8; plain.len()];
        let mut enc_iv = iv;
        enc.crypt(&mut cipher, &plain, Some(&mut enc_iv)).unwrap();
        assert_ne!(cipher, plain);
        // The IV is advanced to the last ciphertext block
        assert_eq!(&enc_iv[..], &cipher[48..]);

        let mut dec = Aes::new(&key, Direction::Decrypt).unwrap();
        let mut out = vec![0u8; plain.len()];
        let mut dec_iv = iv;
        dec.crypt(&mut out, &cipher, Some(&mut dec_iv)).unwrap();
        assert_eq!(out, plain);

        assert!(Aes::new(&key[..10], Direction::Encrypt).is_err());
        assert!(enc.crypt(&mut [0; 8], &[0; 8], None).is_err());
    }

    #[test]
    fn test_blowfish_known_vector() {
        let Some(_) = testing::native() else {
            return;
        };

        let mut bf = Blowfish::new(&[0u8; 8]).unwrap();
        let block = bf.crypt_block(Direction::Encrypt, (0, 0));
        assert_eq!(block, (0x4EF9_9745, 0x6198_DD78));
        assert_eq!(bf.crypt_block(Direction::Decrypt, block), (0, 0));

        let mut cipher = [0u8; 8];
        bf.crypt(Direction::Encrypt, &mut cipher, &[0u8; 8], None).unwrap();
        assert_eq!(cipher, [0x4e, 0xf9, 0x97, 0x45, 0x61, 0x98, 0xdd, 0x78]);

        assert!(Blowfish::new(&[]).is_err());
        assert!(Blowfish::new(&[1; 57]).is_err());
    }

    #[test]
    fn test_camellia_roundtrip() {
        let Some(_) = testing::native() else {
            return;
        };

        let key = [0x42u8; 16];
        let plain = *b"sixteen byte msg";
        let mut camellia = Camellia::new(&key).unwrap();
        let mut cipher = [0u8; 16];
        camellia.crypt(Direction::Encrypt, &mut cipher, &plain, None).unwrap();
        let mut out = [0u8; 16];
        camellia.crypt(Direction::Decrypt, &mut out, &cipher, None).unwrap();
        assert_eq!(out, plain);
    }

    #[test]
    fn test_cast5_rfc2144_40_bit() {
        let Some(_) = testing::native() else {
            return;
        };

        // RFC 2144 B.1, 40-bit key
        let key = [0x01, 0x23, 0x45, 0x67, 0x12];
        let plain = [0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef];
        let mut cast5 = Cast5::new(&key).unwrap();
        let mut cipher = [0u8; 8];
        cast5.crypt(Direction::Encrypt, &mut cipher, &plain, None).unwrap();
        assert_eq!(cipher, [0x7a, 0xc8, 0x16, 0xd1, 0x6e, 0x9b, 0x30, 0x2e]);

        let mut out = [0u8; 8];
        cast5.crypt(Direction::Decrypt, &mut out, &cipher, None).unwrap();
        assert_eq!(out, plain);

        assert!(Cast5::new(&[0; 4]).is_err());
    }
}
