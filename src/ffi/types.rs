//! Core libavutil type definitions
//!
//! Types shared by several headers: rationals, media and picture types,
//! sample formats and the timestamp constants.

use std::cmp::Ordering;
use std::os::raw::c_int;

// ============================================================================
// Rational Number
// ============================================================================

/// Rational number for time bases and frame rates
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AVRational {
    /// Numerator
    pub num: c_int,
    /// Denominator
    pub den: c_int,
}

impl AVRational {
    pub const fn new(num: c_int, den: c_int) -> Self {
        Self { num, den }
    }

    pub fn as_f64(&self) -> f64 {
        if self.den == 0 {
            0.0
        } else {
            self.num as f64 / self.den as f64
        }
    }

    /// `av_inv_q`
    pub const fn invert(self) -> Self {
        Self {
            num: self.den,
            den: self.num,
        }
    }

    /// `av_cmp_q`: -1, 0 or 1, or `None` when either value is 0/0
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match av_cmp_q(*self, *other) {
            c_int::MIN => None,
            0 => Some(Ordering::Equal),
            c if c < 0 => Some(Ordering::Less),
            _ => Some(Ordering::Greater),
        }
    }

    /// Microsecond time base (1/1000000)
    pub const MICROSECONDS: Self = Self {
        num: 1,
        den: 1_000_000,
    };
}

/// `av_cmp_q`, a header inline with no exported symbol
pub fn av_cmp_q(a: AVRational, b: AVRational) -> c_int {
    let tmp = a.num as i64 * b.den as i64 - b.num as i64 * a.den as i64;

    if tmp != 0 {
        (((tmp ^ a.den as i64 ^ b.den as i64) >> 63) as c_int) | 1
    } else if b.den != 0 && a.den != 0 {
        0
    } else if a.num != 0 && b.num != 0 {
        (a.num >> 31) - (b.num >> 31)
    } else {
        c_int::MIN
    }
}

/// `av_q2d`
#[inline]
pub fn av_q2d(a: AVRational) -> f64 {
    a.num as f64 / a.den as f64
}

// ============================================================================
// Timestamps
// ============================================================================

/// No timestamp value
pub const AV_NOPTS_VALUE: i64 = 0x8000000000000000u64 as i64;

/// Internal time base in microseconds
pub const AV_TIME_BASE: c_int = 1_000_000;

pub const AV_TIME_BASE_Q: AVRational = AVRational::new(1, AV_TIME_BASE);

/// `AV_NUM_DATA_POINTERS`
pub const AV_NUM_DATA_POINTERS: usize = 8;

/// Rounding modes for `av_rescale_rnd` (`enum AVRounding`)
pub mod rounding {
    use std::os::raw::c_int;

    pub const ZERO: c_int = 0;
    pub const INF: c_int = 1;
    pub const DOWN: c_int = 2;
    pub const UP: c_int = 3;
    pub const NEAR_INF: c_int = 5;
    /// Pass `INT64_MIN`/`INT64_MAX` through unchanged; OR'd with a mode
    pub const PASS_MINMAX: c_int = 8192;
}

// ============================================================================
// Tags
// ============================================================================

/// `MKTAG`: little-endian four character code
pub const fn mktag(a: u8, b: u8, c: u8, d: u8) -> u32 {
    (a as u32) | ((b as u32) << 8) | ((c as u32) << 16) | ((d as u32) << 24)
}

/// `MKBETAG`: big-endian four character code
pub const fn mkbetag(a: u8, b: u8, c: u8, d: u8) -> u32 {
    (d as u32) | ((c as u32) << 8) | ((b as u32) << 16) | ((a as u32) << 24)
}

// ============================================================================
// Media Type
// ============================================================================

c_enum! {
    /// Media type
    pub enum AVMediaType {
        Unknown = -1,
        Video = 0,
        Audio = 1,
        Data = 2,
        Subtitle = 3,
        Attachment = 4,
    }
}

// ============================================================================
// Picture Type
// ============================================================================

c_enum! {
    /// Picture/frame type
    pub enum AVPictureType {
        None = 0,
        I = 1, // Intra (key frame)
        P = 2, // Predicted
        B = 3, // Bi-directionally predicted
        S = 4, // S(GMC)-VOP MPEG-4
        Si = 5,
        Sp = 6,
        Bi = 7,
    }
}

// ============================================================================
// Sample Format
// ============================================================================

c_enum! {
    /// Audio sample formats
    pub enum AVSampleFormat {
        None = -1,
        U8 = 0,
        S16 = 1,
        S32 = 2,
        Flt = 3,
        Dbl = 4,
        U8p = 5,
        S16p = 6,
        S32p = 7,
        Fltp = 8,
        Dblp = 9,
    }
}

impl AVSampleFormat {
    /// Whether samples of each channel live in their own plane
    pub fn is_planar(&self) -> bool {
        matches!(
            self,
            Self::U8p | Self::S16p | Self::S32p | Self::Fltp | Self::Dblp
        )
    }
}
