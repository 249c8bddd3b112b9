//! `frame.h`: decoded audio/video frames
//!
//! `AVFrame` is marshaled with its full 54.27 layout, including the fields
//! kept for libavcodec compatibility (`FF_API_AVFRAME_LAVC`). Fields typed
//! with a C enum are kept as `c_int` so any value the library writes stays
//! valid; convert with the enum's `from_raw`.

use std::os::raw::{c_char, c_int, c_short, c_void};

use super::buffer::AVBufferRef;
use super::dict::AVDictionary;
use super::types::{AVRational, AV_NUM_DATA_POINTERS};

c_enum! {
  /// Kind of data attached to a frame
  pub enum AVFrameSideDataType {
    /// `AVPanScan`
    PanScan = 0,
    /// ATSC A53 Part 4 closed captions
    A53Cc = 1,
    /// `AVStereo3D`
    Stereo3d = 2,
    /// `AVMatrixEncoding` as a single int
    MatrixEncoding = 3,
    /// `AVDownmixInfo`
    DownmixInfo = 4,
    /// `AVReplayGain`
    ReplayGain = 5,
    /// 3x3 display matrix, see `display.h`
    DisplayMatrix = 6,
    /// Active format description, one `AVActiveFormatDescription` byte
    Afd = 7,
    /// Array of `AVMotionVector`
    MotionVectors = 8,
    /// Samples to skip at the start/end of an audio frame
    SkipSamples = 9,
    /// `AVAudioServiceType` as a single int
    AudioServiceType = 10,
  }
}

c_enum! {
  /// Active format description values
  pub enum AVActiveFormatDescription {
    Same = 8,
    Ratio4_3 = 9,
    Ratio16_9 = 10,
    Ratio14_9 = 11,
    Ratio4_3Sp14_9 = 13,
    Ratio16_9Sp14_9 = 14,
    Sp4_3 = 15,
  }
}

/// Side data attached to a frame
#[repr(C)]
#[derive(Debug)]
pub struct AVFrameSideData {
  pub type_: c_int,
  pub data: *mut u8,
  pub size: c_int,
  pub metadata: *mut AVDictionary,
}

/// The frame data may be corrupted
pub const AV_FRAME_FLAG_CORRUPT: c_int = 1 << 0;

/// `decode_error_flags` bits
pub const FF_DECODE_ERROR_INVALID_BITSTREAM: c_int = 1;
pub const FF_DECODE_ERROR_MISSING_REFERENCE: c_int = 2;

/// Decoded audio or video data
#[repr(C)]
#[derive(Debug)]
pub struct AVFrame {
  /// Plane pointers
  pub data: [*mut u8; AV_NUM_DATA_POINTERS],
  /// Bytes per line (video) or plane size (audio)
  pub linesize: [c_int; AV_NUM_DATA_POINTERS],
  /// Every plane, for planar audio with more than 8 channels
  pub extended_data: *mut *mut u8,
  pub width: c_int,
  pub height: c_int,
  /// Audio samples per channel
  pub nb_samples: c_int,
  /// `AVPixelFormat` or `AVSampleFormat`, -1 when unset
  pub format: c_int,
  pub key_frame: c_int,
  /// `AVPictureType`
  pub pict_type: c_int,
  /// Deprecated (`FF_API_AVFRAME_LAVC`)
  pub base: [*mut u8; AV_NUM_DATA_POINTERS],
  pub sample_aspect_ratio: AVRational,
  pub pts: i64,
  pub pkt_pts: i64,
  pub pkt_dts: i64,
  pub coded_picture_number: c_int,
  pub display_picture_number: c_int,
  /// 1 (best) to `FF_LAMBDA_MAX` (worst)
  pub quality: c_int,
  /// Deprecated (`FF_API_AVFRAME_LAVC`)
  pub reference: c_int,
  /// Deprecated QP table
  pub qscale_table: *mut i8,
  pub qstride: c_int,
  pub qscale_type: c_int,
  pub mbskip_table: *mut u8,
  pub motion_val: [*mut [i16; 2]; 2],
  pub mb_type: *mut u32,
  pub dct_coeff: *mut c_short,
  pub ref_index: [*mut i8; 2],
  /// User data
  pub opaque: *mut c_void,
  pub error: [u64; AV_NUM_DATA_POINTERS],
  /// Deprecated (`FF_API_AVFRAME_LAVC`)
  pub type_: c_int,
  pub repeat_pict: c_int,
  pub interlaced_frame: c_int,
  pub top_field_first: c_int,
  pub palette_has_changed: c_int,
  pub buffer_hints: c_int,
  /// `AVPanScan *`
  pub pan_scan: *mut c_void,
  pub reordered_opaque: i64,
  pub hwaccel_picture_private: *mut c_void,
  /// `AVCodecContext *`
  pub owner: *mut c_void,
  pub thread_opaque: *mut c_void,
  pub motion_subsample_log2: u8,
  pub sample_rate: c_int,
  pub channel_layout: u64,
  /// Buffers backing `data`
  pub buf: [*mut AVBufferRef; AV_NUM_DATA_POINTERS],
  /// Buffers for planes beyond `buf`
  pub extended_buf: *mut *mut AVBufferRef,
  pub nb_extended_buf: c_int,
  pub side_data: *mut *mut AVFrameSideData,
  pub nb_side_data: c_int,
  /// `AV_FRAME_FLAG_*`
  pub flags: c_int,
  /// `AVColorRange`
  pub color_range: c_int,
  /// `AVColorPrimaries`
  pub color_primaries: c_int,
  /// `AVColorTransferCharacteristic`
  pub color_trc: c_int,
  /// `AVColorSpace`
  pub colorspace: c_int,
  /// `AVChromaLocation`
  pub chroma_location: c_int,
  pub best_effort_timestamp: i64,
  pub pkt_pos: i64,
  pub pkt_duration: i64,
  pub metadata: *mut AVDictionary,
  pub decode_error_flags: c_int,
  pub channels: c_int,
  pub pkt_size: c_int,
  pub qp_table_buf: *mut AVBufferRef,
}

impl AVFrame {
  /// Side data entries as a slice of pointers
  ///
  /// # Safety
  /// `side_data`/`nb_side_data` must be consistent, as maintained by libavutil.
  pub unsafe fn side_data_entries(&self) -> &[*mut AVFrameSideData] {
    if self.side_data.is_null() || self.nb_side_data <= 0 {
      &[]
    } else {
      std::slice::from_raw_parts(self.side_data, self.nb_side_data as usize)
    }
  }
}

avutil_symbols! {
  pub struct FrameApi {
    av_frame_alloc: unsafe extern "C" fn() -> *mut AVFrame;
    av_frame_free: unsafe extern "C" fn(frame: *mut *mut AVFrame);
    av_frame_ref: unsafe extern "C" fn(dst: *mut AVFrame, src: *const AVFrame) -> c_int;
    av_frame_clone: unsafe extern "C" fn(src: *const AVFrame) -> *mut AVFrame;
    av_frame_unref: unsafe extern "C" fn(frame: *mut AVFrame);
    av_frame_move_ref: unsafe extern "C" fn(dst: *mut AVFrame, src: *mut AVFrame);
    /// Allocate buffers for the format/size (or nb_samples/channel_layout) already set
    av_frame_get_buffer: unsafe extern "C" fn(frame: *mut AVFrame, align: c_int) -> c_int;
    av_frame_is_writable: unsafe extern "C" fn(frame: *mut AVFrame) -> c_int;
    av_frame_make_writable: unsafe extern "C" fn(frame: *mut AVFrame) -> c_int;
    av_frame_copy: unsafe extern "C" fn(dst: *mut AVFrame, src: *const AVFrame) -> c_int;
    av_frame_copy_props: unsafe extern "C" fn(dst: *mut AVFrame, src: *const AVFrame) -> c_int;
    av_frame_get_plane_buffer: unsafe extern "C" fn(frame: *mut AVFrame, plane: c_int) -> *mut AVBufferRef;
    av_frame_new_side_data: unsafe extern "C" fn(frame: *mut AVFrame, type_: c_int, size: c_int) -> *mut AVFrameSideData;
    av_frame_get_side_data: unsafe extern "C" fn(frame: *const AVFrame, type_: c_int) -> *mut AVFrameSideData;

    // ABI compatibility accessors
    av_frame_get_best_effort_timestamp: unsafe extern "C" fn(frame: *const AVFrame) -> i64;
    av_frame_set_best_effort_timestamp: unsafe extern "C" fn(frame: *mut AVFrame, val: i64);
    av_frame_get_pkt_duration: unsafe extern "C" fn(frame: *const AVFrame) -> i64;
    av_frame_set_pkt_duration: unsafe extern "C" fn(frame: *mut AVFrame, val: i64);
    av_frame_get_pkt_pos: unsafe extern "C" fn(frame: *const AVFrame) -> i64;
    av_frame_set_pkt_pos: unsafe extern "C" fn(frame: *mut AVFrame, val: i64);
    av_frame_get_channel_layout: unsafe extern "C" fn(frame: *const AVFrame) -> i64;
    av_frame_set_channel_layout: unsafe extern "C" fn(frame: *mut AVFrame, val: i64);
    av_frame_get_channels: unsafe extern "C" fn(frame: *const AVFrame) -> c_int;
    av_frame_set_channels: unsafe extern "C" fn(frame: *mut AVFrame, val: c_int);
    av_frame_get_sample_rate: unsafe extern "C" fn(frame: *const AVFrame) -> c_int;
    av_frame_set_sample_rate: unsafe extern "C" fn(frame: *mut AVFrame, val: c_int);
    av_frame_get_metadata: unsafe extern "C" fn(frame: *const AVFrame) -> *mut AVDictionary;
    av_frame_set_metadata: unsafe extern "C" fn(frame: *mut AVFrame, val: *mut AVDictionary);
    av_frame_get_decode_error_flags: unsafe extern "C" fn(frame: *const AVFrame) -> c_int;
    av_frame_set_decode_error_flags: unsafe extern "C" fn(frame: *mut AVFrame, val: c_int);
    av_frame_get_pkt_size: unsafe extern "C" fn(frame: *const AVFrame) -> c_int;
    av_frame_set_pkt_size: unsafe extern "C" fn(frame: *mut AVFrame, val: c_int);
    av_frame_get_qp_table: unsafe extern "C" fn(f: *mut AVFrame, stride: *mut c_int, type_: *mut c_int) -> *mut i8;
    av_frame_set_qp_table: unsafe extern "C" fn(f: *mut AVFrame, buf: *mut AVBufferRef, stride: c_int, type_: c_int) -> c_int;
    av_frame_get_colorspace: unsafe extern "C" fn(frame: *const AVFrame) -> c_int;
    av_frame_set_colorspace: unsafe extern "C" fn(frame: *mut AVFrame, val: c_int);
    av_frame_get_color_range: unsafe extern "C" fn(frame: *const AVFrame) -> c_int;
    av_frame_set_color_range: unsafe extern "C" fn(frame: *mut AVFrame, val: c_int);
  }
  optional {
    av_frame_remove_side_data: unsafe extern "C" fn(frame: *mut AVFrame, type_: c_int);
    av_frame_side_data_name: unsafe extern "C" fn(type_: c_int) -> *const c_char;
  }
}
