//! Library identification, CPU capabilities and file helpers

use std::ops::Deref;
use std::os::raw::{c_int, c_uint};
use std::path::{Path, PathBuf};
use std::ptr;

use crate::ffi::cpu::cpu_flag;
use crate::ffi::version::AvVersion;
use crate::ffi::{AVMediaType, AVPictureType, AvUtil};

use super::{c_string, check, lib, owned_str, take_av_string, UtilError, UtilResult};

// ============================================================================
// Library
// ============================================================================

/// Identification of the loaded libavutil
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryInfo {
    pub version: AvVersion,
    pub configuration: String,
    pub license: String,
}

pub fn library_info() -> UtilResult<LibraryInfo> {
    Ok(LibraryInfo {
        version: version()?,
        configuration: configuration()?,
        license: license()?,
    })
}

/// Version reported by the library itself
pub fn version() -> UtilResult<AvVersion> {
    let lib = lib()?;
    Ok(AvVersion::from_int(unsafe { (lib.util.avutil_version)() }))
}

/// `./configure` arguments the library was built with
pub fn configuration() -> UtilResult<String> {
    let lib = lib()?;
    Ok(unsafe { owned_str((lib.util.avutil_configuration)()) }.unwrap_or_default())
}

pub fn license() -> UtilResult<String> {
    let lib = lib()?;
    Ok(unsafe { owned_str((lib.util.avutil_license)()) }.unwrap_or_default())
}

/// "video", "audio", ...; `None` for `Unknown`
pub fn media_type_name(media_type: AVMediaType) -> UtilResult<Option<String>> {
    let lib = lib()?;
    Ok(unsafe { owned_str((lib.util.av_get_media_type_string)(media_type.as_raw())) })
}

/// 'I', 'P', 'B', ...; '?' for `None`
pub fn picture_type_char(pict_type: AVPictureType) -> UtilResult<char> {
    let lib = lib()?;
    let c = unsafe { (lib.util.av_get_picture_type_char)(pict_type.as_raw()) };
    Ok(c as u8 as char)
}

/// PRNG seed from the best entropy source available
pub fn random_seed() -> UtilResult<u32> {
    let lib = lib()?;
    Ok(unsafe { (lib.util.av_get_random_seed)() })
}

// ============================================================================
// CPU
// ============================================================================

/// Flags in effect, detected or forced
pub fn cpu_flags() -> UtilResult<i32> {
    let lib = lib()?;
    Ok(unsafe { (lib.cpu.av_get_cpu_flags)() })
}

/// Logical cores
pub fn cpu_count() -> UtilResult<usize> {
    let lib = lib()?;
    Ok(unsafe { (lib.cpu.av_cpu_count)() }.max(1) as usize)
}

/// Replace the detected flags; `None` restores detection
pub fn force_cpu_flags(flags: Option<i32>) -> UtilResult<()> {
    let lib = lib()?;
    unsafe { (lib.cpu.av_force_cpu_flags)(flags.unwrap_or(-1)) };
    Ok(())
}

/// Apply a "+sse2-avx" or "sse2+ssse3" style string to `base`
pub fn parse_cpu_caps(base: u32, caps: &str) -> UtilResult<u32> {
    let lib = lib()?;
    let caps = c_string(caps)?;
    let mut flags = base as c_uint;
    check(unsafe { (lib.cpu.av_parse_cpu_caps)(&mut flags, caps.as_ptr()) })?;
    Ok(flags)
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
const CPU_FLAG_NAMES: &[(c_int, &str)] = &[
    (cpu_flag::x86::MMX, "mmx"),
    (cpu_flag::x86::MMXEXT, "mmxext"),
    (cpu_flag::x86::SSE, "sse"),
    (cpu_flag::x86::SSE2, "sse2"),
    (cpu_flag::x86::SSE2SLOW, "sse2slow"),
    (cpu_flag::x86::SSE3, "sse3"),
    (cpu_flag::x86::SSE3SLOW, "sse3slow"),
    (cpu_flag::x86::SSSE3, "ssse3"),
    (cpu_flag::x86::ATOM, "atom"),
    (cpu_flag::x86::SSE4, "sse4.1"),
    (cpu_flag::x86::SSE42, "sse4.2"),
    (cpu_flag::x86::AVX, "avx"),
    (cpu_flag::x86::AVXSLOW, "avxslow"),
    (cpu_flag::x86::XOP, "xop"),
    (cpu_flag::x86::FMA3, "fma3"),
    (cpu_flag::x86::FMA4, "fma4"),
    (cpu_flag::x86::AMD3DNOW, "3dnow"),
    (cpu_flag::x86::AMD3DNOWEXT, "3dnowext"),
    (cpu_flag::x86::CMOV, "cmov"),
    (cpu_flag::x86::AVX2, "avx2"),
    (cpu_flag::x86::BMI1, "bmi1"),
    (cpu_flag::x86::BMI2, "bmi2"),
];

#[cfg(any(target_arch = "arm", target_arch = "aarch64"))]
const CPU_FLAG_NAMES: &[(c_int, &str)] = &[
    (cpu_flag::arm::ARMV5TE, "armv5te"),
    (cpu_flag::arm::ARMV6, "armv6"),
    (cpu_flag::arm::ARMV6T2, "armv6t2"),
    (cpu_flag::arm::VFP, "vfp"),
    (cpu_flag::arm::VFPV3, "vfpv3"),
    (cpu_flag::arm::NEON, "neon"),
    (cpu_flag::arm::ARMV8, "armv8"),
    (cpu_flag::arm::SETEND, "setend"),
];

#[cfg(any(target_arch = "powerpc", target_arch = "powerpc64"))]
const CPU_FLAG_NAMES: &[(c_int, &str)] = &[
    (cpu_flag::ppc::ALTIVEC, "altivec"),
    (cpu_flag::ppc::VSX, "vsx"),
    (cpu_flag::ppc::POWER8, "power8"),
];

#[cfg(not(any(
    target_arch = "x86",
    target_arch = "x86_64",
    target_arch = "arm",
    target_arch = "aarch64",
    target_arch = "powerpc",
    target_arch = "powerpc64"
)))]
const CPU_FLAG_NAMES: &[(c_int, &str)] = &[];

/// Names of the set bits of `flags` for this architecture
pub fn cpu_flag_names(flags: i32) -> Vec<&'static str> {
    CPU_FLAG_NAMES
        .iter()
        .filter(|(bit, _)| flags & bit == *bit)
        .map(|(_, name)| *name)
        .collect()
}

// ============================================================================
// Files
// ============================================================================

/// Read-only mapping of a whole file
pub struct MappedFile {
    ptr: *mut u8,
    len: usize,
    lib: &'static AvUtil,
}

impl MappedFile {
    pub fn open(path: impl AsRef<Path>) -> UtilResult<Self> {
        let lib = lib()?;
        let path = path.as_ref();
        let c_path = c_string(
            path.to_str()
                .ok_or_else(|| UtilError::InvalidArgument(format!("non UTF-8 path {}", path.display())))?,
        )?;
        let mut ptr = ptr::null_mut();
        let mut len = 0usize;
        check(unsafe { (lib.file.av_file_map)(c_path.as_ptr(), &mut ptr, &mut len, 0, ptr::null_mut()) })?;
        Ok(Self { ptr, len, lib })
    }
}

impl Deref for MappedFile {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        if self.ptr.is_null() {
            return &[];
        }
        unsafe { std::slice::from_raw_parts(self.ptr, self.len) }
    }
}

impl AsRef<[u8]> for MappedFile {
    fn as_ref(&self) -> &[u8] {
        self
    }
}

impl Drop for MappedFile {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            unsafe { (self.lib.file.av_file_unmap)(self.ptr, self.len) }
        }
    }
}

unsafe impl Send for MappedFile {}
unsafe impl Sync for MappedFile {}

impl std::fmt::Debug for MappedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappedFile").field("len", &self.len).finish()
    }
}

/// Create a unique temporary file whose name starts with `prefix`
#[cfg(unix)]
pub fn tempfile(prefix: &str) -> UtilResult<(std::fs::File, PathBuf)> {
    use std::os::unix::io::FromRawFd;

    let lib = lib()?;
    let prefix = c_string(prefix)?;
    let mut name = ptr::null_mut();
    let fd = unsafe { (lib.file.av_tempfile)(prefix.as_ptr(), &mut name, 0, ptr::null_mut()) };
    let name = unsafe { take_av_string(lib, name) };
    let fd = check(fd)?;
    let file = unsafe { std::fs::File::from_raw_fd(fd) };
    let path = name.map(PathBuf::from).ok_or(UtilError::AllocationFailed("temporary file name"))?;
    Ok((file, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ffi::testing;

    #[test]
    fn test_library_info() {
        let Some(lib) = testing::native() else {
            return;
        };

        let info = library_info().unwrap();
        assert_eq!(info.version, lib.version);
        assert_eq!(info.version.major, AvVersion::PINNED.major);
        assert!(!info.license.is_empty());

        assert_eq!(media_type_name(AVMediaType::Audio).unwrap().as_deref(), Some("audio"));
        assert_eq!(media_type_name(AVMediaType::Unknown).unwrap(), None);
        assert_eq!(picture_type_char(AVPictureType::I).unwrap(), 'I');
        assert_eq!(picture_type_char(AVPictureType::None).unwrap(), '?');
        let _ = random_seed().unwrap();
    }

    #[test]
    fn test_cpu() {
        let Some(_) = testing::native() else {
            return;
        };

        assert!(cpu_count().unwrap() >= 1);
        assert!(parse_cpu_caps(0, "definitely-not-a-cpu").is_err());
        #[cfg(target_arch = "x86_64")]
        {
            let flags = parse_cpu_caps(0, "sse2").unwrap() as i32;
            assert_ne!(flags & cpu_flag::x86::SSE2, 0);
            assert!(cpu_flag_names(cpu_flags().unwrap()).contains(&"sse2"));
        }
    }

    #[test]
    fn test_flag_names() {
        assert!(cpu_flag_names(0).is_empty());
        #[cfg(target_arch = "x86_64")]
        assert_eq!(
            cpu_flag_names(cpu_flag::x86::SSE | cpu_flag::x86::AVX2),
            vec!["sse", "avx2"]
        );
    }

    #[test]
    fn test_mapped_file() {
        let Some(_) = testing::native() else {
            return;
        };

        let path = std::env::temp_dir().join(format!("avutil-mapped-{}", std::process::id()));
        std::fs::write(&path, b"mapped contents").unwrap();
        {
            let mapped = MappedFile::open(&path).unwrap();
            assert_eq!(&*mapped, b"mapped contents");
        }
        std::fs::remove_file(&path).unwrap();
        assert!(MappedFile::open("/nonexistent/avutil/file").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_tempfile() {
        use std::io::{Read, Seek, Write};

        let Some(_) = testing::native() else {
            return;
        };

        let (mut file, path) = tempfile("avutil-test").unwrap();
        assert!(path.file_name().unwrap().to_str().unwrap().starts_with("avutil-test"));
        file.write_all(b"scratch").unwrap();
        file.rewind().unwrap();
        let mut back = String::new();
        file.read_to_string(&mut back).unwrap();
        assert_eq!(back, "scratch");
        std::fs::remove_file(path).unwrap();
    }
}
