//! Rust layouts compared against the compiled C probe

use std::ffi::CStr;
use std::mem::{offset_of, size_of};
use std::os::raw::c_char;

use super::bprint::AVBPrint;
use super::buffer::AVBufferRef;
use super::crypto::AVBlowfish;
use super::dict::AVDictionaryEntry;
use super::fifo::AVFifoBuffer;
use super::frame::{AVFrame, AVFrameSideData};
use super::log::AVClass;
use super::opt::{AVOption, AVOptionRange, AVOptionRanges};
use super::pixdesc::{AVComponentDescriptor, AVPixFmtDescriptor};
use super::side_data::{AVDownmixInfo, AVMotionVector};
use super::types::AVRational;

extern "C" {
  fn avutil_layout_probe(name: *const c_char) -> usize;
}

fn probe(name: &CStr) -> usize {
  let value = unsafe { avutil_layout_probe(name.as_ptr()) };
  assert_ne!(value, usize::MAX, "{name:?} missing from the probe table");
  value
}

macro_rules! assert_size {
  ($ty:ty) => {
    assert_eq!(
      size_of::<$ty>(),
      probe(&std::ffi::CString::new(stringify!($ty)).unwrap()),
      "sizeof({})",
      stringify!($ty)
    );
  };
}

macro_rules! assert_offset {
  ($ty:ident, $field:ident) => {
    assert_offset!($ty, $field, $field);
  };
  ($ty:ident, $field:ident, $c_field:ident) => {
    assert_eq!(
      offset_of!($ty, $field),
      probe(&std::ffi::CString::new(concat!(stringify!($ty), ".", stringify!($c_field))).unwrap()),
      "offsetof({}, {})",
      stringify!($ty),
      stringify!($c_field)
    );
  };
}

#[test]
fn test_small_structs_match_headers() {
  assert_size!(AVRational);
  assert_size!(AVBufferRef);
  assert_offset!(AVBufferRef, size);
  assert_size!(AVDictionaryEntry);
  assert_size!(AVFifoBuffer);
  assert_offset!(AVFifoBuffer, rndx);
  assert_size!(AVBlowfish);
  assert_size!(AVComponentDescriptor);
}

#[test]
fn test_frame_matches_headers() {
  assert_size!(AVFrame);
  assert_offset!(AVFrame, extended_data);
  assert_offset!(AVFrame, base);
  assert_offset!(AVFrame, sample_aspect_ratio);
  assert_offset!(AVFrame, pts);
  assert_offset!(AVFrame, qscale_table);
  assert_offset!(AVFrame, motion_val);
  assert_offset!(AVFrame, opaque);
  assert_offset!(AVFrame, error);
  assert_offset!(AVFrame, pan_scan);
  assert_offset!(AVFrame, motion_subsample_log2);
  assert_offset!(AVFrame, sample_rate);
  assert_offset!(AVFrame, channel_layout);
  assert_offset!(AVFrame, buf);
  assert_offset!(AVFrame, side_data);
  assert_offset!(AVFrame, color_range);
  assert_offset!(AVFrame, best_effort_timestamp);
  assert_offset!(AVFrame, metadata);
  assert_offset!(AVFrame, pkt_size);
  assert_offset!(AVFrame, qp_table_buf);

  assert_size!(AVFrameSideData);
  assert_offset!(AVFrameSideData, size);
  assert_offset!(AVFrameSideData, metadata);
}

#[test]
fn test_class_and_options_match_headers() {
  assert_size!(AVClass);
  assert_offset!(AVClass, option);
  assert_offset!(AVClass, version);
  assert_offset!(AVClass, child_next);
  assert_offset!(AVClass, category);
  assert_offset!(AVClass, query_ranges);

  assert_size!(AVOption);
  assert_offset!(AVOption, type_, type);
  assert_offset!(AVOption, default_val);
  assert_offset!(AVOption, min);
  assert_offset!(AVOption, flags);
  assert_offset!(AVOption, unit);
  assert_size!(AVOptionRange);
  assert_offset!(AVOptionRange, is_range);
  assert_size!(AVOptionRanges);
}

#[test]
fn test_pixdesc_and_side_data_match_headers() {
  assert_size!(AVPixFmtDescriptor);
  assert_offset!(AVPixFmtDescriptor, nb_components);
  assert_offset!(AVPixFmtDescriptor, flags);
  assert_offset!(AVPixFmtDescriptor, comp);
  assert_offset!(AVPixFmtDescriptor, alias);

  assert_size!(AVBPrint);
  assert_offset!(AVBPrint, size_max);
  assert_offset!(AVBPrint, reserved_internal_buffer);

  assert_size!(AVDownmixInfo);
  assert_offset!(AVDownmixInfo, center_mix_level);
  assert_offset!(AVDownmixInfo, lfe_mix_level);
  assert_size!(AVMotionVector);
  assert_offset!(AVMotionVector, src_x);
  assert_offset!(AVMotionVector, flags);
}
