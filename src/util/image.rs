//! Image planes in one aligned allocation, plus plane arithmetic

use std::os::raw::{c_int, c_uint};
use std::ptr;

use crate::ffi::imgutils::AVPixelUtilsSadFn;
use crate::ffi::{AVPixelFormat, AVRational, AvUtil};

use super::{c_len, check, lib, UtilError, UtilResult};

/// Planes of one image sharing a single `av_malloc` block
pub struct ImageBuffer {
    data: [*mut u8; 4],
    linesize: [c_int; 4],
    size: usize,
    width: u32,
    height: u32,
    format: AVPixelFormat,
    lib: &'static AvUtil,
}

impl ImageBuffer {
    /// Allocate with every line padded to `align` bytes
    pub fn new(width: u32, height: u32, format: AVPixelFormat, align: u32) -> UtilResult<Self> {
        let lib = lib()?;
        check_size(width, height)?;
        let mut image = Self {
            data: [ptr::null_mut(); 4],
            linesize: [0; 4],
            size: 0,
            width,
            height,
            format,
            lib,
        };
        let ret = unsafe {
            (lib.imgutils.av_image_alloc)(
                image.data.as_mut_ptr(),
                image.linesize.as_mut_ptr(),
                width as c_int,
                height as c_int,
                format.as_raw(),
                c_len(align as usize, "alignment")?,
            )
        };
        image.size = check(ret)? as usize;
        Ok(image)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> AVPixelFormat {
        self.format
    }

    pub fn linesizes(&self) -> [i32; 4] {
        self.linesize
    }

    /// Bytes used by all planes
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    fn plane_range(&self, plane: usize) -> Option<(usize, usize)> {
        let base = self.data[0] as usize;
        let start = (*self.data.get(plane)?) as usize;
        if start == 0 {
            return None;
        }
        let offset = start - base;
        let end = self.data[plane + 1..]
            .iter()
            .filter(|p| !p.is_null())
            .map(|p| *p as usize - base)
            .filter(|&o| o > offset)
            .min()
            .unwrap_or(self.size);
        Some((offset, end))
    }

    /// One plane; the palette for paletted formats is plane 1
    pub fn plane(&self, plane: usize) -> Option<&[u8]> {
        let (start, end) = self.plane_range(plane)?;
        Some(unsafe { std::slice::from_raw_parts(self.data[0].add(start), end - start) })
    }

    pub fn plane_mut(&mut self, plane: usize) -> Option<&mut [u8]> {
        let (start, end) = self.plane_range(plane)?;
        Some(unsafe { std::slice::from_raw_parts_mut(self.data[0].add(start), end - start) })
    }

    /// Copy pixels from an image of the same size and format
    pub fn copy_from(&mut self, src: &ImageBuffer) -> UtilResult<()> {
        if (src.width, src.height, src.format) != (self.width, self.height, self.format) {
            return Err(UtilError::InvalidArgument(format!(
                "cannot copy {}x{} {:?} into {}x{} {:?}",
                src.width, src.height, src.format, self.width, self.height, self.format
            )));
        }
        let src_data = src.data.map(|p| p as *const u8);
        unsafe {
            (self.lib.imgutils.av_image_copy)(
                self.data.as_mut_ptr(),
                self.linesize.as_mut_ptr(),
                src_data.as_ptr(),
                src.linesize.as_ptr(),
                self.format.as_raw(),
                self.width as c_int,
                self.height as c_int,
            )
        };
        Ok(())
    }

    /// Pack the planes into a contiguous buffer with `align` byte lines
    pub fn to_packed(&self, align: u32) -> UtilResult<Vec<u8>> {
        let len = buffer_size(self.format, self.width, self.height, align)?;
        let mut out = vec![0u8; len];
        let src_data = self.data.map(|p| p as *const u8);
        let ret = unsafe {
            (self.lib.imgutils.av_image_copy_to_buffer)(
                out.as_mut_ptr(),
                len as c_int,
                src_data.as_ptr(),
                self.linesize.as_ptr(),
                self.format.as_raw(),
                self.width as c_int,
                self.height as c_int,
                align as c_int,
            )
        };
        out.truncate(check(ret)? as usize);
        Ok(out)
    }
}

impl Drop for ImageBuffer {
    fn drop(&mut self) {
        unsafe { (self.lib.mem.av_freep)((&mut self.data[0] as *mut *mut u8).cast()) }
    }
}

unsafe impl Send for ImageBuffer {}

impl std::fmt::Debug for ImageBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .field("linesize", &self.linesize)
            .finish()
    }
}

/// Bytes needed to store an image with `align` byte lines
pub fn buffer_size(format: AVPixelFormat, width: u32, height: u32, align: u32) -> UtilResult<usize> {
    let lib = lib()?;
    let ret = unsafe {
        (lib.imgutils.av_image_get_buffer_size)(format.as_raw(), width as c_int, height as c_int, align as c_int)
    };
    Ok(check(ret)? as usize)
}

/// Unpadded line size of every plane for `width` pixels
pub fn linesizes(format: AVPixelFormat, width: u32) -> UtilResult<[i32; 4]> {
    let lib = lib()?;
    let mut out = [0 as c_int; 4];
    check(unsafe { (lib.imgutils.av_image_fill_linesizes)(out.as_mut_ptr(), format.as_raw(), width as c_int) })?;
    Ok(out)
}

/// Reject dimensions whose pixels are not addressable with an `int`
pub fn check_size(width: u32, height: u32) -> UtilResult<()> {
    let lib = lib()?;
    check(unsafe { (lib.imgutils.av_image_check_size)(width as c_uint, height as c_uint, 0, ptr::null_mut()) })?;
    Ok(())
}

/// Reject absurd sample aspect ratios
pub fn check_sar(width: u32, height: u32, sar: AVRational) -> UtilResult<()> {
    let lib = lib()?;
    check(unsafe { (lib.imgutils.av_image_check_sar)(width as c_uint, height as c_uint, sar) })?;
    Ok(())
}

/// Sum of absolute differences over fixed-size blocks
#[derive(Clone, Copy)]
pub struct BlockSad {
    sad: AVPixelUtilsSadFn,
    width: usize,
    height: usize,
}

impl BlockSad {
    /// Blocks of `1 << w_bits` by `1 << h_bits` pixels (1 to 5 bits each)
    ///
    /// `None` when libavutil was built without pixelutils.
    pub fn new(w_bits: u32, h_bits: u32) -> UtilResult<Option<Self>> {
        let lib = lib()?;
        let sad = unsafe {
            (lib.pixelutils.av_pixelutils_get_sad_fn)(w_bits as c_int, h_bits as c_int, 0, ptr::null_mut())
        };
        Ok(sad.map(|sad| Self {
            sad,
            width: 1 << w_bits,
            height: 1 << h_bits,
        }))
    }

    pub fn block_size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// SAD between the blocks at the start of `a` and `b`
    pub fn compute(&self, a: &[u8], stride_a: usize, b: &[u8], stride_b: usize) -> UtilResult<u32> {
        for (buf, stride) in [(a, stride_a), (b, stride_b)] {
            let needed = stride * (self.height - 1) + self.width;
            if stride < self.width || buf.len() < needed {
                return Err(UtilError::InvalidArgument(format!(
                    "block of {}x{} needs {needed} bytes at stride {stride}, got {}",
                    self.width,
                    self.height,
                    buf.len()
                )));
            }
        }
        let sad = unsafe { (self.sad)(a.as_ptr(), stride_a as isize, b.as_ptr(), stride_b as isize) };
        Ok(sad.max(0) as u32)
    }
}

impl std::fmt::Debug for BlockSad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockSad")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}
