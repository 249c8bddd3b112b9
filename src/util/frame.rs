//! Safe wrapper around AVFrame
//!
//! Provides RAII-based memory management and safe access to frame data.
//! Fields are read directly from the marshaled layout; the ABI
//! compatibility accessors are used where libavutil offers them.

use std::os::raw::c_int;
use std::ptr::NonNull;

use crate::ffi::frame::{AVFrame, AVFrameSideDataType};
use crate::ffi::pixdesc::pix_fmt_flag;
use crate::ffi::pixfmt::{pixel_format, AVColorRange, AVColorSpace};
use crate::ffi::{AVPictureType, AVPixelFormat, AVSampleFormat, AvUtil, AV_NUM_DATA_POINTERS};

use super::buffer::BufferRef;
use super::dict::Dictionary;
use super::{c_len, check, lib, owned_str, require, UtilError, UtilResult};

/// Buffer alignment used when the caller does not care
pub const DEFAULT_ALIGN: c_int = 32;

/// Owned AVFrame
pub struct Frame {
    ptr: NonNull<AVFrame>,
    lib: &'static AvUtil,
}

impl Frame {
    /// Allocate a frame with default fields and no data
    pub fn new() -> UtilResult<Self> {
        let lib = lib()?;
        let ptr = unsafe { (lib.frame.av_frame_alloc)() };
        NonNull::new(ptr)
            .map(|ptr| Self { ptr, lib })
            .ok_or(UtilError::AllocationFailed("AVFrame"))
    }

    /// Allocate a frame with buffers for a picture
    pub fn new_video(width: u32, height: u32, format: AVPixelFormat) -> UtilResult<Self> {
        if format == AVPixelFormat::None || width == 0 || height == 0 {
            return Err(UtilError::InvalidArgument(format!(
                "cannot allocate {width}x{height} {format:?} picture"
            )));
        }

        let mut frame = Self::new()?;
        {
            let raw = unsafe { frame.raw_mut() };
            raw.width = c_len(width as usize, "width")?;
            raw.height = c_len(height as usize, "height")?;
            raw.format = format.as_raw();
        }
        frame.get_buffer(DEFAULT_ALIGN)?;
        Ok(frame)
    }

    /// Allocate a frame with buffers for `nb_samples` samples per channel
    pub fn new_audio(
        nb_samples: u32,
        format: AVSampleFormat,
        channel_layout: u64,
        sample_rate: u32,
    ) -> UtilResult<Self> {
        if format == AVSampleFormat::None || channel_layout == 0 || nb_samples == 0 {
            return Err(UtilError::InvalidArgument(format!(
                "cannot allocate {nb_samples} {format:?} samples for layout {channel_layout:#x}"
            )));
        }

        let mut frame = Self::new()?;
        {
            let raw = unsafe { frame.raw_mut() };
            raw.nb_samples = c_len(nb_samples as usize, "nb_samples")?;
            raw.format = format.as_raw();
            raw.channel_layout = channel_layout;
            raw.channels = channel_layout.count_ones() as c_int;
            raw.sample_rate = c_len(sample_rate as usize, "sample_rate")?;
        }
        frame.get_buffer(0)?;
        Ok(frame)
    }

    /// Allocate data buffers for the format and size already set
    pub fn get_buffer(&mut self, align: c_int) -> UtilResult<()> {
        check(unsafe { (self.lib.frame.av_frame_get_buffer)(self.as_mut_ptr(), align) })?;
        Ok(())
    }

    /// Take ownership of a raw frame
    ///
    /// # Safety
    /// `ptr` must be a frame from `av_frame_alloc` of the same library.
    pub unsafe fn from_raw(lib: &'static AvUtil, ptr: *mut AVFrame) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| Self { ptr, lib })
    }

    #[inline]
    pub fn as_ptr(&self) -> *const AVFrame {
        self.ptr.as_ptr()
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut AVFrame {
        self.ptr.as_ptr()
    }

    /// Consume the Frame and return the raw pointer
    /// The caller is responsible for freeing the frame
    pub fn into_raw(self) -> *mut AVFrame {
        let ptr = self.ptr.as_ptr();
        std::mem::forget(self);
        ptr
    }

    /// The marshaled native struct
    #[inline]
    pub fn raw(&self) -> &AVFrame {
        unsafe { self.ptr.as_ref() }
    }

    /// Mutable access to the native struct
    ///
    /// # Safety
    /// Pointer fields and buffer references must stay consistent.
    #[inline]
    pub unsafe fn raw_mut(&mut self) -> &mut AVFrame {
        self.ptr.as_mut()
    }

    // ========================================================================
    // Properties
    // ========================================================================

    #[inline]
    pub fn width(&self) -> u32 {
        self.raw().width.max(0) as u32
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.raw().height.max(0) as u32
    }

    /// Pixel format of a video frame
    pub fn pixel_format(&self) -> Option<AVPixelFormat> {
        pixel_format(self.raw().format).filter(|f| *f != AVPixelFormat::None)
    }

    /// Sample format of an audio frame
    pub fn sample_format(&self) -> Option<AVSampleFormat> {
        AVSampleFormat::from_raw(self.raw().format).filter(|f| *f != AVSampleFormat::None)
    }

    /// Audio samples per channel
    #[inline]
    pub fn nb_samples(&self) -> u32 {
        self.raw().nb_samples.max(0) as u32
    }

    #[inline]
    pub fn pts(&self) -> i64 {
        self.raw().pts
    }

    #[inline]
    pub fn set_pts(&mut self, pts: i64) {
        unsafe { self.raw_mut().pts = pts }
    }

    #[inline]
    pub fn is_key_frame(&self) -> bool {
        self.raw().key_frame != 0
    }

    pub fn pict_type(&self) -> AVPictureType {
        AVPictureType::from_raw(self.raw().pict_type).unwrap_or(AVPictureType::None)
    }

    pub fn set_pict_type(&mut self, pict_type: AVPictureType) {
        unsafe { self.raw_mut().pict_type = pict_type.as_raw() }
    }

    // ========================================================================
    // Compatibility accessors
    // ========================================================================

    pub fn best_effort_timestamp(&self) -> i64 {
        unsafe { (self.lib.frame.av_frame_get_best_effort_timestamp)(self.as_ptr()) }
    }

    pub fn set_best_effort_timestamp(&mut self, ts: i64) {
        unsafe { (self.lib.frame.av_frame_set_best_effort_timestamp)(self.as_mut_ptr(), ts) }
    }

    pub fn pkt_duration(&self) -> i64 {
        unsafe { (self.lib.frame.av_frame_get_pkt_duration)(self.as_ptr()) }
    }

    pub fn set_pkt_duration(&mut self, duration: i64) {
        unsafe { (self.lib.frame.av_frame_set_pkt_duration)(self.as_mut_ptr(), duration) }
    }

    pub fn channels(&self) -> u32 {
        unsafe { (self.lib.frame.av_frame_get_channels)(self.as_ptr()).max(0) as u32 }
    }

    pub fn channel_layout(&self) -> u64 {
        unsafe { (self.lib.frame.av_frame_get_channel_layout)(self.as_ptr()) as u64 }
    }

    pub fn sample_rate(&self) -> u32 {
        unsafe { (self.lib.frame.av_frame_get_sample_rate)(self.as_ptr()).max(0) as u32 }
    }

    pub fn set_sample_rate(&mut self, rate: u32) -> UtilResult<()> {
        let rate = c_len(rate as usize, "sample_rate")?;
        unsafe { (self.lib.frame.av_frame_set_sample_rate)(self.as_mut_ptr(), rate) };
        Ok(())
    }

    pub fn colorspace(&self) -> AVColorSpace {
        let raw = unsafe { (self.lib.frame.av_frame_get_colorspace)(self.as_ptr()) };
        AVColorSpace::from_raw(raw).unwrap_or_default()
    }

    pub fn set_colorspace(&mut self, colorspace: AVColorSpace) {
        unsafe { (self.lib.frame.av_frame_set_colorspace)(self.as_mut_ptr(), colorspace.as_raw()) }
    }

    pub fn color_range(&self) -> AVColorRange {
        let raw = unsafe { (self.lib.frame.av_frame_get_color_range)(self.as_ptr()) };
        AVColorRange::from_raw(raw).unwrap_or_default()
    }

    pub fn set_color_range(&mut self, range: AVColorRange) {
        unsafe { (self.lib.frame.av_frame_set_color_range)(self.as_mut_ptr(), range.as_raw()) }
    }

    pub fn decode_error_flags(&self) -> c_int {
        unsafe { (self.lib.frame.av_frame_get_decode_error_flags)(self.as_ptr()) }
    }

    /// Copy of the frame metadata
    pub fn metadata(&self) -> UtilResult<Dictionary> {
        let mut copy = Dictionary::new()?;
        unsafe {
            let current = (self.lib.frame.av_frame_get_metadata)(self.as_ptr());
            (self.lib.dict.av_dict_copy)(copy.as_mut_ptr(), current, 0);
        }
        Ok(copy)
    }

    /// Replace the frame metadata
    pub fn set_metadata(&mut self, metadata: Dictionary) {
        unsafe {
            let mut old = (self.lib.frame.av_frame_get_metadata)(self.as_ptr());
            (self.lib.frame.av_frame_set_metadata)(self.as_mut_ptr(), metadata.into_raw());
            (self.lib.dict.av_dict_free)(&mut old);
        }
    }

    // ========================================================================
    // Data Access
    // ========================================================================

    /// Line size (stride) of a plane
    #[inline]
    pub fn linesize(&self, plane: usize) -> i32 {
        self.raw().linesize.get(plane).copied().unwrap_or(0)
    }

    /// Bytes addressable through `data[plane]`, or None for absent planes
    fn plane_len(&self, plane: usize) -> Option<usize> {
        let raw = self.raw();
        if plane >= AV_NUM_DATA_POINTERS || raw.data[plane].is_null() {
            return None;
        }

        if self.nb_samples() > 0 {
            // Every audio plane spans linesize[0]
            return usize::try_from(raw.linesize[0]).ok();
        }

        let linesize = usize::try_from(raw.linesize[plane]).ok().filter(|l| *l > 0)?;
        let desc = unsafe { (self.lib.pixdesc.av_pix_fmt_desc_get)(raw.format).as_ref()? };
        if plane == 1 && desc.flags & (pix_fmt_flag::PAL | pix_fmt_flag::PSEUDOPAL) != 0 {
            return Some(256 * 4);
        }

        let height = self.height() as usize;
        let rows = if plane == 1 || plane == 2 {
            // Rounded up like AV_CEIL_RSHIFT
            let shift = desc.log2_chroma_h;
            (height + (1 << shift) - 1) >> shift
        } else {
            height
        };
        Some(linesize * rows)
    }

    /// Plane contents including line padding
    pub fn plane(&self, plane: usize) -> Option<&[u8]> {
        let len = self.plane_len(plane)?;
        Some(unsafe { std::slice::from_raw_parts(self.raw().data[plane], len) })
    }

    /// Mutable plane contents; the frame must be writable
    pub fn plane_mut(&mut self, plane: usize) -> Option<&mut [u8]> {
        if !self.is_writable() {
            return None;
        }
        let len = self.plane_len(plane)?;
        Some(unsafe { std::slice::from_raw_parts_mut(self.raw().data[plane], len) })
    }

    /// New reference to the buffer backing a plane
    pub fn plane_buffer(&self, plane: usize) -> Option<BufferRef> {
        let plane = c_int::try_from(plane).ok()?;
        unsafe {
            let buf = (self.lib.frame.av_frame_get_plane_buffer)(self.ptr.as_ptr(), plane);
            if buf.is_null() {
                return None;
            }
            BufferRef::from_raw(self.lib, (self.lib.buffer.av_buffer_ref)(buf))
        }
    }

    pub fn is_writable(&self) -> bool {
        unsafe { (self.lib.frame.av_frame_is_writable)(self.ptr.as_ptr()) != 0 }
    }

    /// Copy the data if it is shared
    pub fn make_writable(&mut self) -> UtilResult<()> {
        check(unsafe { (self.lib.frame.av_frame_make_writable)(self.as_mut_ptr()) })?;
        Ok(())
    }

    // ========================================================================
    // Side Data
    // ========================================================================

    /// Attach zero-initialised side data, replacing nothing
    pub fn new_side_data(&mut self, kind: AVFrameSideDataType, size: usize) -> UtilResult<&mut [u8]> {
        let size = c_len(size, "side data size")?;
        unsafe {
            let sd = (self.lib.frame.av_frame_new_side_data)(self.as_mut_ptr(), kind.as_raw(), size);
            let sd = sd.as_mut().ok_or(UtilError::AllocationFailed("AVFrameSideData"))?;
            if sd.data.is_null() || sd.size <= 0 {
                return Ok(&mut []);
            }
            Ok(std::slice::from_raw_parts_mut(sd.data, sd.size as usize))
        }
    }

    /// Payload of the first side data of `kind`
    pub fn side_data(&self, kind: AVFrameSideDataType) -> Option<&[u8]> {
        unsafe {
            let sd = (self.lib.frame.av_frame_get_side_data)(self.as_ptr(), kind.as_raw()).as_ref()?;
            if sd.data.is_null() || sd.size <= 0 {
                return Some(&[]);
            }
            Some(std::slice::from_raw_parts(sd.data, sd.size as usize))
        }
    }

    /// Types of all attached side data, in order
    pub fn side_data_types(&self) -> Vec<AVFrameSideDataType> {
        unsafe {
            self.raw()
                .side_data_entries()
                .iter()
                .filter_map(|sd| sd.as_ref())
                .filter_map(|sd| AVFrameSideDataType::from_raw(sd.type_))
                .collect()
        }
    }

    pub fn remove_side_data(&mut self, kind: AVFrameSideDataType) -> UtilResult<()> {
        let remove = require(self.lib.frame.av_frame_remove_side_data, "av_frame_remove_side_data")?;
        unsafe { remove(self.as_mut_ptr(), kind.as_raw()) };
        Ok(())
    }

    /// Native name of a side data type
    pub fn side_data_name(kind: AVFrameSideDataType) -> UtilResult<Option<String>> {
        let lib = lib()?;
        let name = require(lib.frame.av_frame_side_data_name, "av_frame_side_data_name")?;
        Ok(unsafe { owned_str(name(kind.as_raw())) })
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// New frame referencing the same buffers
    pub fn try_clone(&self) -> UtilResult<Self> {
        let ptr = unsafe { (self.lib.frame.av_frame_clone)(self.as_ptr()) };
        NonNull::new(ptr)
            .map(|ptr| Self { ptr, lib: self.lib })
            .ok_or(UtilError::AllocationFailed("frame clone"))
    }

    /// Drop the current contents and reference `src`
    pub fn ref_from(&mut self, src: &Frame) -> UtilResult<()> {
        self.unref();
        check(unsafe { (self.lib.frame.av_frame_ref)(self.as_mut_ptr(), src.as_ptr()) })?;
        Ok(())
    }

    /// Move the contents of `src` into this frame, leaving `src` blank
    pub fn move_from(&mut self, src: &mut Frame) {
        self.unref();
        unsafe { (self.lib.frame.av_frame_move_ref)(self.as_mut_ptr(), src.as_mut_ptr()) }
    }

    /// Unreference the frame data (but keep the frame structure)
    pub fn unref(&mut self) {
        unsafe { (self.lib.frame.av_frame_unref)(self.as_mut_ptr()) }
    }

    /// Copy sample or pixel data from a frame of the same geometry
    pub fn copy_from(&mut self, src: &Frame) -> UtilResult<()> {
        check(unsafe { (self.lib.frame.av_frame_copy)(self.as_mut_ptr(), src.as_ptr()) })?;
        Ok(())
    }

    /// Copy timestamps, metadata and side data, but not the data
    pub fn copy_props_from(&mut self, src: &Frame) -> UtilResult<()> {
        check(unsafe { (self.lib.frame.av_frame_copy_props)(self.as_mut_ptr(), src.as_ptr()) })?;
        Ok(())
    }
}

impl Drop for Frame {
    fn drop(&mut self) {
        unsafe {
            let mut ptr = self.ptr.as_ptr();
            (self.lib.frame.av_frame_free)(&mut ptr);
        }
    }
}

// Frame data can be sent between threads
unsafe impl Send for Frame {}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let raw = self.raw();
        f.debug_struct("Frame")
            .field("width", &raw.width)
            .field("height", &raw.height)
            .field("nb_samples", &raw.nb_samples)
            .field("format", &raw.format)
            .field("pts", &raw.pts)
            .field("key_frame", &self.is_key_frame())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ffi::channel_layout::AV_CH_LAYOUT_STEREO;
    use crate::ffi::testing;
    use crate::ffi::AV_NOPTS_VALUE;

    #[test]
    fn test_frame_allocation() {
        let Some(_) = testing::native() else {
            return;
        };

        let frame = Frame::new().unwrap();
        assert_eq!(frame.width(), 0);
        assert_eq!(frame.pts(), AV_NOPTS_VALUE);
        assert_eq!(frame.pixel_format(), None);
        assert_eq!(frame.plane(0), None);
    }

    #[test]
    fn test_video_frame_planes() {
        let Some(_) = testing::native() else {
            return;
        };

        let mut frame = Frame::new_video(33, 17, AVPixelFormat::Yuv420p).unwrap();
        assert_eq!(frame.pixel_format(), Some(AVPixelFormat::Yuv420p));
        assert!(frame.is_writable());

        let luma = frame.plane(0).unwrap().len();
        assert_eq!(luma, frame.linesize(0) as usize * 17);
        // Chroma rows round up
        assert_eq!(frame.plane(1).unwrap().len(), frame.linesize(1) as usize * 9);
        assert!(frame.plane(3).is_none());

        frame.plane_mut(0).unwrap().fill(16);
        let clone = frame.try_clone().unwrap();
        assert!(!frame.is_writable());
        frame.make_writable().unwrap();
        frame.plane_mut(0).unwrap()[0] = 235;
        assert_eq!(clone.plane(0).unwrap()[0], 16);
        assert_eq!(frame.plane_buffer(0).map(|b| b.ref_count()), Some(2));
    }

    #[test]
    fn test_audio_frame() {
        let Some(_) = testing::native() else {
            return;
        };

        let frame = Frame::new_audio(1024, AVSampleFormat::Fltp, AV_CH_LAYOUT_STEREO, 48000).unwrap();
        assert_eq!(frame.channels(), 2);
        assert_eq!(frame.channel_layout(), AV_CH_LAYOUT_STEREO);
        assert_eq!(frame.sample_rate(), 48000);
        assert_eq!(frame.sample_format(), Some(AVSampleFormat::Fltp));
        assert!(frame.plane(0).unwrap().len() >= 1024 * 4);
        assert!(frame.plane(1).is_some());
        assert!(frame.plane(2).is_none());

        assert!(Frame::new_audio(0, AVSampleFormat::S16, AV_CH_LAYOUT_STEREO, 48000).is_err());
    }

    #[test]
    fn test_side_data_and_props() {
        let Some(_) = testing::native() else {
            return;
        };

        let mut src = Frame::new().unwrap();
        src.set_pts(42);
        src.set_best_effort_timestamp(40);
        src.set_colorspace(AVColorSpace::Bt709);
        src.new_side_data(AVFrameSideDataType::Stereo3d, 8).unwrap()[0] = 1;
        let mut meta = Dictionary::new().unwrap();
        meta.set("lang", "en").unwrap();
        src.set_metadata(meta);

        let mut dst = Frame::new().unwrap();
        dst.copy_props_from(&src).unwrap();
        assert_eq!(dst.pts(), 42);
        assert_eq!(dst.best_effort_timestamp(), 40);
        assert_eq!(dst.colorspace(), AVColorSpace::Bt709);
        assert_eq!(dst.side_data(AVFrameSideDataType::Stereo3d).map(|d| d[0]), Some(1));
        assert_eq!(dst.side_data_types(), vec![AVFrameSideDataType::Stereo3d]);
        assert_eq!(dst.metadata().unwrap().get("lang").as_deref(), Some("en"));

        if dst.remove_side_data(AVFrameSideDataType::Stereo3d).is_ok() {
            assert!(dst.side_data(AVFrameSideDataType::Stereo3d).is_none());
        }
    }

    #[test]
    fn test_move_and_ref() {
        let Some(_) = testing::native() else {
            return;
        };

        let mut src = Frame::new_video(16, 16, AVPixelFormat::Gray8).unwrap();
        src.set_pts(7);
        let mut shared = Frame::new().unwrap();
        shared.ref_from(&src).unwrap();
        assert_eq!(shared.pts(), 7);
        assert_eq!(shared.plane(0).map(<[u8]>::as_ptr), src.plane(0).map(<[u8]>::as_ptr));

        let mut moved = Frame::new().unwrap();
        moved.move_from(&mut src);
        assert_eq!(moved.width(), 16);
        assert_eq!(src.width(), 0);
        assert!(src.plane(0).is_none());
    }
}
