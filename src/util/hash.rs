//! Hash, checksum and MAC contexts

use std::os::raw::{c_char, c_int, c_uint, c_ulong};
use std::ptr::{self, NonNull};

use crate::ffi::hash::{AVCRCId, AVHMACType, AVHashContext, AVMD5, AVMurMur3, AVCRC, AVHMAC, AV_HASH_MAX_SIZE};
use crate::ffi::AvUtil;

use super::{c_string, c_ulen, check, lib, owned_str, UtilError, UtilResult};

/// Feed `data` to an entry point taking `int` lengths
fn chunked_int(data: &[u8], mut feed: impl FnMut(*const u8, c_int)) {
    for chunk in data.chunks(c_int::MAX as usize) {
        feed(chunk.as_ptr(), chunk.len() as c_int);
    }
}

fn chunked_uint(data: &[u8], mut feed: impl FnMut(*const u8, c_uint)) {
    for chunk in data.chunks(c_uint::MAX as usize) {
        feed(chunk.as_ptr(), chunk.len() as c_uint);
    }
}

// ============================================================================
// MD5
// ============================================================================

/// Streaming MD5
pub struct Md5 {
    ptr: NonNull<AVMD5>,
    lib: &'static AvUtil,
}

impl Md5 {
    pub fn new() -> UtilResult<Self> {
        let lib = lib()?;
        let ptr = NonNull::new(unsafe { (lib.md5.av_md5_alloc)() }).ok_or(UtilError::AllocationFailed("AVMD5"))?;
        unsafe { (lib.md5.av_md5_init)(ptr.as_ptr()) };
        Ok(Self { ptr, lib })
    }

    /// One-shot digest
    pub fn digest(data: &[u8]) -> UtilResult<[u8; 16]> {
        let lib = lib()?;
        if let Ok(len) = c_int::try_from(data.len()) {
            let mut out = [0u8; 16];
            unsafe { (lib.md5.av_md5_sum)(out.as_mut_ptr(), data.as_ptr(), len) };
            return Ok(out);
        }
        let mut md5 = Self::new()?;
        md5.update(data);
        Ok(md5.finalize())
    }

    pub fn update(&mut self, data: &[u8]) {
        let (ctx, update) = (self.ptr.as_ptr(), self.lib.md5.av_md5_update);
        chunked_int(data, |p, len| unsafe { update(ctx, p, len) });
    }

    pub fn finalize(self) -> [u8; 16] {
        let mut out = [0u8; 16];
        unsafe { (self.lib.md5.av_md5_final)(self.ptr.as_ptr(), out.as_mut_ptr()) };
        out
    }
}

impl Drop for Md5 {
    fn drop(&mut self) {
        unsafe { (self.lib.mem.av_free)(self.ptr.as_ptr().cast()) }
    }
}

unsafe impl Send for Md5 {}

// ============================================================================
// MurmurHash3
// ============================================================================

/// Streaming 128-bit MurmurHash3
pub struct Murmur3 {
    ptr: NonNull<AVMurMur3>,
    lib: &'static AvUtil,
}

impl Murmur3 {
    /// Without a seed libavutil uses its fixed default
    pub fn new(seed: Option<u64>) -> UtilResult<Self> {
        let lib = lib()?;
        let ptr = NonNull::new(unsafe { (lib.murmur3.av_murmur3_alloc)() })
            .ok_or(UtilError::AllocationFailed("AVMurMur3"))?;
        unsafe {
            match seed {
                Some(seed) => (lib.murmur3.av_murmur3_init_seeded)(ptr.as_ptr(), seed),
                None => (lib.murmur3.av_murmur3_init)(ptr.as_ptr()),
            }
        }
        Ok(Self { ptr, lib })
    }

    pub fn update(&mut self, data: &[u8]) {
        let (ctx, update) = (self.ptr.as_ptr(), self.lib.murmur3.av_murmur3_update);
        chunked_int(data, |p, len| unsafe { update(ctx, p, len) });
    }

    pub fn finalize(self) -> [u8; 16] {
        let mut out = [0u8; 16];
        unsafe { (self.lib.murmur3.av_murmur3_final)(self.ptr.as_ptr(), out.as_mut_ptr()) };
        out
    }
}

impl Drop for Murmur3 {
    fn drop(&mut self) {
        unsafe { (self.lib.mem.av_free)(self.ptr.as_ptr().cast()) }
    }
}

unsafe impl Send for Murmur3 {}

// ============================================================================
// Generic hash
// ============================================================================

/// Any algorithm of the generic `av_hash` API, selected by name
pub struct Hasher {
    ptr: NonNull<AVHashContext>,
    lib: &'static AvUtil,
}

impl Hasher {
    /// `name` is one of [`Hasher::names`], e.g. "SHA256"
    pub fn new(name: &str) -> UtilResult<Self> {
        let lib = lib()?;
        let c_name = c_string(name)?;
        let mut ctx = ptr::null_mut();
        check(unsafe { (lib.hash.av_hash_alloc)(&mut ctx, c_name.as_ptr()) })?;
        let ptr = NonNull::new(ctx).ok_or(UtilError::AllocationFailed("AVHashContext"))?;
        unsafe { (lib.hash.av_hash_init)(ptr.as_ptr()) };
        Ok(Self { ptr, lib })
    }

    /// Names of every supported algorithm
    pub fn names() -> UtilResult<Vec<String>> {
        let lib = lib()?;
        let mut names = Vec::new();
        for i in 0.. {
            match unsafe { owned_str((lib.hash.av_hash_names)(i)) } {
                Some(name) => names.push(name),
                None => break,
            }
        }
        Ok(names)
    }

    pub fn name(&self) -> String {
        unsafe { owned_str((self.lib.hash.av_hash_get_name)(self.ptr.as_ptr())) }.unwrap_or_default()
    }

    /// Digest size in bytes
    pub fn size(&self) -> usize {
        unsafe { (self.lib.hash.av_hash_get_size)(self.ptr.as_ptr()).max(0) as usize }
    }

    /// Restart with an empty input
    pub fn reset(&mut self) {
        unsafe { (self.lib.hash.av_hash_init)(self.ptr.as_ptr()) }
    }

    pub fn update(&mut self, data: &[u8]) {
        let (ctx, update) = (self.ptr.as_ptr(), self.lib.hash.av_hash_update);
        chunked_int(data, |p, len| unsafe { update(ctx, p, len) });
    }

    pub fn finalize(self) -> Vec<u8> {
        let mut out = [0u8; AV_HASH_MAX_SIZE];
        unsafe { (self.lib.hash.av_hash_final)(self.ptr.as_ptr(), out.as_mut_ptr()) };
        out[..self.size()].to_vec()
    }

    /// Lowercase hexadecimal digest
    pub fn finalize_hex(self) -> String {
        let mut out = [0u8; 2 * AV_HASH_MAX_SIZE + 1];
        unsafe {
            (self.lib.hash.av_hash_final_hex)(self.ptr.as_ptr(), out.as_mut_ptr(), out.len() as c_int);
            owned_str(out.as_ptr() as *const c_char).unwrap_or_default()
        }
    }

    /// Base64 digest
    pub fn finalize_base64(self) -> String {
        let mut out = [0u8; (AV_HASH_MAX_SIZE + 2) / 3 * 4 + 1];
        unsafe {
            (self.lib.hash.av_hash_final_b64)(self.ptr.as_ptr(), out.as_mut_ptr(), out.len() as c_int);
            owned_str(out.as_ptr() as *const c_char).unwrap_or_default()
        }
    }
}

impl Drop for Hasher {
    fn drop(&mut self) {
        let mut ptr = self.ptr.as_ptr();
        unsafe { (self.lib.hash.av_hash_freep)(&mut ptr) }
    }
}

unsafe impl Send for Hasher {}

impl std::fmt::Debug for Hasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hasher").field("name", &self.name()).finish()
    }
}

// ============================================================================
// HMAC
// ============================================================================

/// Keyed MAC over MD5 or SHA
pub struct Hmac {
    ptr: NonNull<AVHMAC>,
    lib: &'static AvUtil,
    kind: AVHMACType,
}

impl Hmac {
    pub fn new(kind: AVHMACType, key: &[u8]) -> UtilResult<Self> {
        let lib = lib()?;
        let keylen = c_ulen(key.len(), "key")?;
        let ptr = NonNull::new(unsafe { (lib.hmac.av_hmac_alloc)(kind.as_raw()) })
            .ok_or(UtilError::AllocationFailed("AVHMAC"))?;
        unsafe { (lib.hmac.av_hmac_init)(ptr.as_ptr(), key.as_ptr(), keylen) };
        Ok(Self { ptr, lib, kind })
    }

    /// One-shot MAC
    pub fn mac(kind: AVHMACType, key: &[u8], data: &[u8]) -> UtilResult<Vec<u8>> {
        let mut hmac = Self::new(kind, key)?;
        hmac.update(data);
        hmac.finalize()
    }

    pub fn update(&mut self, data: &[u8]) {
        let (ctx, update) = (self.ptr.as_ptr(), self.lib.hmac.av_hmac_update);
        chunked_uint(data, |p, len| unsafe { update(ctx, p, len) });
    }

    pub fn finalize(self) -> UtilResult<Vec<u8>> {
        let mut out = vec![0u8; self.kind.digest_len()];
        let len = unsafe { (self.lib.hmac.av_hmac_final)(self.ptr.as_ptr(), out.as_mut_ptr(), out.len() as c_uint) };
        out.truncate(check(len)? as usize);
        Ok(out)
    }
}

impl Drop for Hmac {
    fn drop(&mut self) {
        unsafe { (self.lib.hmac.av_hmac_free)(self.ptr.as_ptr()) }
    }
}

unsafe impl Send for Hmac {}

// ============================================================================
// CRC and Adler-32
// ============================================================================

enum CrcTable {
    Static(*const AVCRC),
    Owned(Vec<AVCRC>),
}

/// CRC over a precomputed or custom table
///
/// The running value is passed in and returned unchanged in meaning: no
/// pre/post inversion is applied.
pub struct Crc {
    table: CrcTable,
    lib: &'static AvUtil,
}

impl Crc {
    /// One of the tables shipped with libavutil
    pub fn standard(id: AVCRCId) -> UtilResult<Self> {
        let lib = lib()?;
        let table = unsafe { (lib.crc.av_crc_get_table)(id.as_raw()) };
        if table.is_null() {
            return Err(UtilError::InvalidArgument(format!("no CRC table for {id:?}")));
        }
        Ok(Self {
            table: CrcTable::Static(table),
            lib,
        })
    }

    /// Build a table for `poly` with `bits` bits (8 to 32)
    pub fn custom(little_endian: bool, bits: u32, poly: u32) -> UtilResult<Self> {
        let lib = lib()?;
        let mut table = vec![0 as AVCRC; 257];
        let size = (table.len() * std::mem::size_of::<AVCRC>()) as c_int;
        check(unsafe { (lib.crc.av_crc_init)(table.as_mut_ptr(), little_endian as c_int, bits as c_int, poly, size) })?;
        Ok(Self {
            table: CrcTable::Owned(table),
            lib,
        })
    }

    fn table_ptr(&self) -> *const AVCRC {
        match &self.table {
            CrcTable::Static(table) => *table,
            CrcTable::Owned(table) => table.as_ptr(),
        }
    }

    /// Continue the CRC `crc` over `data`
    pub fn update(&self, crc: u32, data: &[u8]) -> u32 {
        unsafe { (self.lib.crc.av_crc)(self.table_ptr(), crc, data.as_ptr(), data.len()) }
    }
}

// Tables are immutable once built
unsafe impl Send for Crc {}
unsafe impl Sync for Crc {}

impl std::fmt::Debug for Crc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.table {
            CrcTable::Static(_) => "standard",
            CrcTable::Owned(_) => "custom",
        };
        f.debug_struct("Crc").field("table", &kind).finish()
    }
}

/// Continue an Adler-32 checksum; start from 1
pub fn adler32(adler: u32, data: &[u8]) -> UtilResult<u32> {
    let lib = lib()?;
    let mut value = adler as c_ulong;
    chunked_uint(data, |p, len| value = unsafe { (lib.crc.av_adler32_update)(value, p, len) });
    Ok(value as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ffi::testing;

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    #[test]
    fn test_md5_streaming_matches_one_shot() {
        let Some(_) = testing::native() else {
            return;
        };

        let one_shot = Md5::digest(b"The quick brown fox jumps over the lazy dog").unwrap();
        assert_eq!(hex(&one_shot), "9e107d9d372bb6826bd81d3542a419d6");

        let mut md5 = Md5::new().unwrap();
        md5.update(b"The quick brown fox ");
        md5.update(b"jumps over the lazy dog");
        assert_eq!(md5.finalize(), one_shot);
    }

    #[test]
    fn test_hasher_by_name() {
        let Some(_) = testing::native() else {
            return;
        };

        let names = Hasher::names().unwrap();
        assert!(names.iter().any(|n| n == "SHA1"));

        let mut sha1 = Hasher::new("SHA1").unwrap();
        assert_eq!(sha1.name(), "SHA1");
        assert_eq!(sha1.size(), 20);
        sha1.update(b"abc");
        assert_eq!(sha1.finalize_hex(), "a9993e364706816aba3e25717850c26c9cd0d89d");

        let mut crc = Hasher::new("CRC32").unwrap();
        crc.update(b"x");
        crc.reset();
        crc.update(b"abc");
        assert_eq!(crc.finalize().len(), 4);

        assert!(matches!(Hasher::new("WHIRLPOOL9"), Err(UtilError::Av(_))));
    }

    #[test]
    fn test_hmac_sha256() {
        let Some(_) = testing::native() else {
            return;
        };

        // RFC 4231 test case 2
        let mac = Hmac::mac(AVHMACType::Sha256, b"Jefe", b"what do ya want for nothing?").unwrap();
        assert_eq!(
            hex(&mac),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_crc_tables() {
        let Some(_) = testing::native() else {
            return;
        };

        let ieee = Crc::standard(AVCRCId::Crc32IeeeLe).unwrap();
        assert_eq!(ieee.update(u32::MAX, b"123456789") ^ u32::MAX, 0xCBF4_3926);

        // Same polynomial, built locally
        let custom = Crc::custom(true, 32, 0xEDB8_8320).unwrap();
        assert_eq!(custom.update(u32::MAX, b"123456789") ^ u32::MAX, 0xCBF4_3926);

        assert!(Crc::custom(false, 4, 0x3).is_err());
    }

    #[test]
    fn test_adler32() {
        let Some(_) = testing::native() else {
            return;
        };
        assert_eq!(adler32(1, b"Wikipedia").unwrap(), 0x11E6_0398);
        assert_eq!(adler32(1, b"").unwrap(), 1);
    }

    #[test]
    fn test_murmur3_streaming() {
        let Some(_) = testing::native() else {
            return;
        };

        let mut whole = Murmur3::new(Some(7)).unwrap();
        whole.update(b"0123456789abcdefXYZ");
        let mut parts = Murmur3::new(Some(7)).unwrap();
        parts.update(b"0123456789");
        parts.update(b"abcdefXYZ");
        assert_eq!(whole.finalize(), parts.finalize());
    }
}
