//! Timestamp rescaling and rational arithmetic

use std::cmp::Ordering;
use std::os::raw::c_int;

use crate::ffi::types::{rounding, AV_NOPTS_VALUE};
use crate::ffi::{AVRational, AvUtil};

use super::{lib, UtilError, UtilResult};

pub fn gcd(a: i64, b: i64) -> UtilResult<i64> {
    let lib = lib()?;
    Ok(unsafe { (lib.math.av_gcd)(a, b) })
}

/// `a * b / c` rounded to nearest
pub fn rescale(a: i64, b: i64, c: i64) -> UtilResult<i64> {
    rescale_rnd(a, b, c, rounding::NEAR_INF)
}

/// `a * b / c` with a `rounding` mode
pub fn rescale_rnd(a: i64, b: i64, c: i64, rnd: i32) -> UtilResult<i64> {
    let lib = lib()?;
    if c <= 0 || b < 0 {
        return Err(UtilError::InvalidArgument(format!("cannot rescale by {b}/{c}")));
    }
    Ok(unsafe { (lib.math.av_rescale_rnd)(a, b, c, rnd as c_int) })
}

/// Convert `ts` from timebase `from` to `to`, rounding to nearest
pub fn rescale_q(ts: i64, from: AVRational, to: AVRational) -> UtilResult<i64> {
    let lib = lib()?;
    Ok(unsafe { (lib.math.av_rescale_q)(ts, from, to) })
}

pub fn rescale_q_rnd(ts: i64, from: AVRational, to: AVRational, rnd: i32) -> UtilResult<i64> {
    let lib = lib()?;
    Ok(unsafe { (lib.math.av_rescale_q_rnd)(ts, from, to, rnd as c_int) })
}

/// Like [`rescale_q`], but a missing timestamp stays missing
pub fn rescale_ts(ts: Option<i64>, from: AVRational, to: AVRational) -> UtilResult<Option<i64>> {
    match ts {
        None | Some(AV_NOPTS_VALUE) => Ok(None),
        Some(ts) => rescale_q_rnd(ts, from, to, rounding::NEAR_INF | rounding::PASS_MINMAX).map(Some),
    }
}

/// Order of two timestamps in different timebases
pub fn compare_ts(a: i64, a_tb: AVRational, b: i64, b_tb: AVRational) -> UtilResult<Ordering> {
    let lib = lib()?;
    Ok(unsafe { (lib.math.av_compare_ts)(a, a_tb, b, b_tb) }.cmp(&0))
}

/// Signed distance `a - b` of counters that wrap at the power of two `modulus`
pub fn compare_mod(a: u64, b: u64, modulus: u64) -> UtilResult<i64> {
    let lib = lib()?;
    if !modulus.is_power_of_two() {
        return Err(UtilError::InvalidArgument(format!("{modulus} is not a power of two")));
    }
    Ok(unsafe { (lib.math.av_compare_mod)(a, b, modulus) })
}

/// `ts + inc` where `inc` is in `inc_tb`, without accumulating rounding error
pub fn add_stable(ts_tb: AVRational, ts: i64, inc_tb: AVRational, inc: i64) -> UtilResult<i64> {
    let lib = lib()?;
    Ok(unsafe { (lib.math.av_add_stable)(ts_tb, ts, inc_tb, inc) })
}

/// Audio timestamp rescaler that keeps sample-accurate state between calls
#[derive(Clone, Copy)]
pub struct DeltaRescaler {
    in_tb: AVRational,
    out_tb: AVRational,
    sample_tb: AVRational,
    last: i64,
    lib: &'static AvUtil,
}

impl DeltaRescaler {
    /// `sample_tb` is usually `1 / sample_rate`
    pub fn new(in_tb: AVRational, out_tb: AVRational, sample_tb: AVRational) -> UtilResult<Self> {
        Ok(Self {
            in_tb,
            out_tb,
            sample_tb,
            last: AV_NOPTS_VALUE,
            lib: lib()?,
        })
    }

    /// Rescale the timestamp of a chunk lasting `duration` sample units
    pub fn rescale(&mut self, ts: i64, duration: u32) -> UtilResult<i64> {
        let duration = super::c_len(duration as usize, "duration")?;
        Ok(unsafe {
            (self.lib.math.av_rescale_delta)(self.in_tb, ts, self.sample_tb, duration, &mut self.last, self.out_tb)
        })
    }

    pub fn reset(&mut self) {
        self.last = AV_NOPTS_VALUE;
    }
}

impl std::fmt::Debug for DeltaRescaler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeltaRescaler")
            .field("in_tb", &self.in_tb)
            .field("out_tb", &self.out_tb)
            .field("sample_tb", &self.sample_tb)
            .field("last", &self.last)
            .finish()
    }
}

/// Reduce `num / den` so neither term exceeds `max`; the flag is set when
/// the result is exact
pub fn reduce(num: i64, den: i64, max: i64) -> UtilResult<(AVRational, bool)> {
    let lib = lib()?;
    let (mut out_num, mut out_den): (c_int, c_int) = (0, 0);
    let exact = unsafe { (lib.math.av_reduce)(&mut out_num, &mut out_den, num, den, max) };
    Ok((AVRational::new(out_num, out_den), exact != 0))
}

pub fn mul_q(b: AVRational, c: AVRational) -> UtilResult<AVRational> {
    let lib = lib()?;
    Ok(unsafe { (lib.math.av_mul_q)(b, c) })
}

pub fn div_q(b: AVRational, c: AVRational) -> UtilResult<AVRational> {
    let lib = lib()?;
    Ok(unsafe { (lib.math.av_div_q)(b, c) })
}

pub fn add_q(b: AVRational, c: AVRational) -> UtilResult<AVRational> {
    let lib = lib()?;
    Ok(unsafe { (lib.math.av_add_q)(b, c) })
}

pub fn sub_q(b: AVRational, c: AVRational) -> UtilResult<AVRational> {
    let lib = lib()?;
    Ok(unsafe { (lib.math.av_sub_q)(b, c) })
}

/// Closest rational to `d` with terms no larger than `max`
pub fn d2q(d: f64, max: i32) -> UtilResult<AVRational> {
    let lib = lib()?;
    Ok(unsafe { (lib.math.av_d2q)(d, max as c_int) })
}

/// `Less` when `a` is nearer to `q` than `b`
pub fn nearer_q(q: AVRational, a: AVRational, b: AVRational) -> UtilResult<Ordering> {
    let lib = lib()?;
    Ok(match unsafe { (lib.math.av_nearer_q)(q, a, b) } {
        1 => Ordering::Less,
        -1 => Ordering::Greater,
        _ => Ordering::Equal,
    })
}

/// Index of the entry of `candidates` nearest to `q`
pub fn find_nearest(q: AVRational, candidates: &[AVRational]) -> UtilResult<Option<usize>> {
    let lib = lib()?;
    if candidates.is_empty() {
        return Ok(None);
    }
    if let Some(bad) = candidates.iter().find(|c| c.den == 0) {
        return Err(UtilError::InvalidArgument(format!("candidate {}/0", bad.num)));
    }
    let mut list = candidates.to_vec();
    list.push(AVRational::new(0, 0));
    let index = unsafe { (lib.math.av_find_nearest_q_idx)(q, list.as_ptr()) };
    Ok(usize::try_from(index).ok())
}
