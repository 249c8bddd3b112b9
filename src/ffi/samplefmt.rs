//! `samplefmt.h`: audio sample format queries and sample buffers
//!
//! `AVSampleFormat` itself lives in `types`.

use std::os::raw::{c_char, c_int};

avutil_symbols! {
  pub struct SampleFmtApi {
    av_get_sample_fmt_name: unsafe extern "C" fn(sample_fmt: c_int) -> *const c_char;
    av_get_sample_fmt: unsafe extern "C" fn(name: *const c_char) -> c_int;
    /// Planar or packed counterpart, depending on `planar`
    av_get_alt_sample_fmt: unsafe extern "C" fn(sample_fmt: c_int, planar: c_int) -> c_int;
    av_get_packed_sample_fmt: unsafe extern "C" fn(sample_fmt: c_int) -> c_int;
    av_get_planar_sample_fmt: unsafe extern "C" fn(sample_fmt: c_int) -> c_int;
    av_get_sample_fmt_string: unsafe extern "C" fn(buf: *mut c_char, buf_size: c_int, sample_fmt: c_int) -> *mut c_char;
    av_get_bytes_per_sample: unsafe extern "C" fn(sample_fmt: c_int) -> c_int;
    av_sample_fmt_is_planar: unsafe extern "C" fn(sample_fmt: c_int) -> c_int;
    av_samples_get_buffer_size: unsafe extern "C" fn(
      linesize: *mut c_int,
      nb_channels: c_int,
      nb_samples: c_int,
      sample_fmt: c_int,
      align: c_int,
    ) -> c_int;
    av_samples_fill_arrays: unsafe extern "C" fn(
      audio_data: *mut *mut u8,
      linesize: *mut c_int,
      buf: *const u8,
      nb_channels: c_int,
      nb_samples: c_int,
      sample_fmt: c_int,
      align: c_int,
    ) -> c_int;
    /// `audio_data[0]` owns the allocation; free it with `av_freep(&audio_data[0])`
    av_samples_alloc: unsafe extern "C" fn(
      audio_data: *mut *mut u8,
      linesize: *mut c_int,
      nb_channels: c_int,
      nb_samples: c_int,
      sample_fmt: c_int,
      align: c_int,
    ) -> c_int;
    av_samples_alloc_array_and_samples: unsafe extern "C" fn(
      audio_data: *mut *mut *mut u8,
      linesize: *mut c_int,
      nb_channels: c_int,
      nb_samples: c_int,
      sample_fmt: c_int,
      align: c_int,
    ) -> c_int;
    av_samples_copy: unsafe extern "C" fn(
      dst: *mut *mut u8,
      src: *const *mut u8,
      dst_offset: c_int,
      src_offset: c_int,
      nb_samples: c_int,
      nb_channels: c_int,
      sample_fmt: c_int,
    ) -> c_int;
    av_samples_set_silence: unsafe extern "C" fn(
      audio_data: *mut *mut u8,
      offset: c_int,
      nb_samples: c_int,
      nb_channels: c_int,
      sample_fmt: c_int,
    ) -> c_int;
  }
}
