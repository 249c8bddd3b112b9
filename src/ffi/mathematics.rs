//! `mathematics.h` and the out-of-line half of `rational.h`
//!
//! Rounding arguments take the `AVRounding` values in [`super::types::rounding`].

use std::os::raw::c_int;

use super::types::AVRational;

avutil_symbols! {
  pub struct MathApi {
    av_gcd: unsafe extern "C" fn(a: i64, b: i64) -> i64;
    /// `a * b / c` without intermediate overflow, rounding to nearest
    av_rescale: unsafe extern "C" fn(a: i64, b: i64, c: i64) -> i64;
    av_rescale_rnd: unsafe extern "C" fn(a: i64, b: i64, c: i64, rnd: c_int) -> i64;
    av_rescale_q: unsafe extern "C" fn(a: i64, bq: AVRational, cq: AVRational) -> i64;
    av_rescale_q_rnd: unsafe extern "C" fn(a: i64, bq: AVRational, cq: AVRational, rnd: c_int) -> i64;
    /// -1, 0 or 1 as `ts_a` is before, equal to or after `ts_b`
    av_compare_ts: unsafe extern "C" fn(ts_a: i64, tb_a: AVRational, ts_b: i64, tb_b: AVRational) -> c_int;
    /// Signed distance of two timestamps that wrap at the power of two `mod`
    av_compare_mod: unsafe extern "C" fn(a: u64, b: u64, mod_: u64) -> i64;
    /// Rescale audio timestamps keeping `*last` as state between calls
    av_rescale_delta: unsafe extern "C" fn(
      in_tb: AVRational,
      in_ts: i64,
      fs_tb: AVRational,
      duration: c_int,
      last: *mut i64,
      out_tb: AVRational,
    ) -> i64;
    /// `ts + inc` where `inc` is in another timebase, without error accumulation
    av_add_stable: unsafe extern "C" fn(ts_tb: AVRational, ts: i64, inc_tb: AVRational, inc: i64) -> i64;
    /// Returns 1 when the reduction is exact
    av_reduce: unsafe extern "C" fn(dst_num: *mut c_int, dst_den: *mut c_int, num: i64, den: i64, max: i64) -> c_int;
    av_mul_q: unsafe extern "C" fn(b: AVRational, c: AVRational) -> AVRational;
    av_div_q: unsafe extern "C" fn(b: AVRational, c: AVRational) -> AVRational;
    av_add_q: unsafe extern "C" fn(b: AVRational, c: AVRational) -> AVRational;
    av_sub_q: unsafe extern "C" fn(b: AVRational, c: AVRational) -> AVRational;
    av_d2q: unsafe extern "C" fn(d: f64, max: c_int) -> AVRational;
    /// 1 if `q1` is nearer to `q` than `q2`, -1 if `q2` is, 0 on a tie
    av_nearer_q: unsafe extern "C" fn(q: AVRational, q1: AVRational, q2: AVRational) -> c_int;
    /// `q_list` is terminated by a zero denominator
    av_find_nearest_q_idx: unsafe extern "C" fn(q: AVRational, q_list: *const AVRational) -> c_int;
  }
}
