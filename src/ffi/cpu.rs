//! `cpu.h`: detected instruction set extensions

use std::os::raw::{c_char, c_int, c_uint};

/// `AV_CPU_FLAG_*` bits; the meaning of a bit depends on the architecture
pub mod cpu_flag {
  use std::os::raw::c_int;

  /// Makes a value passed to `av_force_cpu_flags` or `av_set_cpu_flags_mask`
  /// apply as given instead of being masked with the detected flags
  pub const FORCE: c_int = 0x8000_0000_u32 as c_int;

  pub mod x86 {
    use std::os::raw::c_int;

    pub const MMX: c_int = 0x0001;
    pub const MMXEXT: c_int = 0x0002;
    pub const MMX2: c_int = MMXEXT;
    pub const AMD3DNOW: c_int = 0x0004;
    pub const SSE: c_int = 0x0008;
    pub const SSE2: c_int = 0x0010;
    /// SSE2 supported, but usually not faster
    pub const SSE2SLOW: c_int = 0x4000_0000;
    pub const AMD3DNOWEXT: c_int = 0x0020;
    pub const SSE3: c_int = 0x0040;
    pub const SSE3SLOW: c_int = 0x2000_0000;
    pub const SSSE3: c_int = 0x0080;
    /// Atom: SSSE3 supported, but usually not faster
    pub const ATOM: c_int = 0x1000_0000;
    pub const SSE4: c_int = 0x0100;
    pub const SSE42: c_int = 0x0200;
    pub const AVX: c_int = 0x4000;
    /// AVX supported, but slow when using YMM registers
    pub const AVXSLOW: c_int = 0x0800_0000;
    pub const XOP: c_int = 0x0400;
    pub const FMA4: c_int = 0x0800;
    pub const CMOV: c_int = 0x1000;
    pub const AVX2: c_int = 0x8000;
    pub const FMA3: c_int = 0x10000;
    pub const BMI1: c_int = 0x20000;
    pub const BMI2: c_int = 0x40000;
  }

  pub mod ppc {
    use std::os::raw::c_int;

    pub const ALTIVEC: c_int = 0x0001;
    pub const VSX: c_int = 0x0002;
    pub const POWER8: c_int = 0x0004;
  }

  pub mod arm {
    use std::os::raw::c_int;

    pub const ARMV5TE: c_int = 1 << 0;
    pub const ARMV6: c_int = 1 << 1;
    pub const ARMV6T2: c_int = 1 << 2;
    pub const VFP: c_int = 1 << 3;
    pub const VFPV3: c_int = 1 << 4;
    pub const NEON: c_int = 1 << 5;
    pub const ARMV8: c_int = 1 << 6;
    pub const SETEND: c_int = 1 << 16;
  }
}

avutil_symbols! {
  pub struct CpuApi {
    av_get_cpu_flags: unsafe extern "C" fn() -> c_int;
    /// Replace the detected flags; -1 restores detection
    av_force_cpu_flags: unsafe extern "C" fn(flags: c_int);
    /// Parse "+sse2-avx" style strings into `*flags`
    av_parse_cpu_caps: unsafe extern "C" fn(flags: *mut c_uint, s: *const c_char) -> c_int;
    /// Number of logical CPU cores
    av_cpu_count: unsafe extern "C" fn() -> c_int;
  }
  optional {
    av_set_cpu_flags_mask: unsafe extern "C" fn(mask: c_int);
    av_parse_cpu_flags: unsafe extern "C" fn(s: *const c_char) -> c_int;
  }
}
