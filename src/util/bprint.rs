//! Growable native text buffer

use std::borrow::Cow;
use std::fmt;
use std::os::raw::{c_char, c_uint};
use std::ptr;

use crate::ffi::bprint::{av_bprint_is_complete, AVBPrint, AVEscapeMode, AV_BPRINT_SIZE_UNLIMITED};
use crate::ffi::parseutils::tm;
use crate::ffi::AvUtil;

use super::{c_len, c_string, c_ulen, check, lib, take_av_string, UtilResult};

/// Owned `AVBPrint`
///
/// The struct is boxed since its text may point into itself.
pub struct BPrint {
    buf: Box<AVBPrint>,
    lib: &'static AvUtil,
    finalized: bool,
}

impl BPrint {
    /// Buffer that grows without limit
    pub fn new() -> UtilResult<Self> {
        Self::with_limit(AV_BPRINT_SIZE_UNLIMITED)
    }

    /// Buffer holding at most `size_max` bytes, terminator included;
    /// longer text is truncated and counted
    pub fn with_limit(size_max: u32) -> UtilResult<Self> {
        let lib = lib()?;
        let mut buf = Box::new(AVBPrint::zeroed());
        unsafe { (lib.bprint.av_bprint_init)(&mut *buf, 0, size_max as c_uint) };
        Ok(Self {
            buf,
            lib,
            finalized: false,
        })
    }

    #[inline]
    pub fn as_ptr(&self) -> *const AVBPrint {
        &*self.buf
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut AVBPrint {
        &mut *self.buf
    }

    /// Length the text would have without truncation
    pub fn len(&self) -> usize {
        self.buf.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.buf.len == 0
    }

    /// Nothing was truncated
    pub fn is_complete(&self) -> bool {
        av_bprint_is_complete(&self.buf)
    }

    /// Stored text
    pub fn as_bytes(&self) -> &[u8] {
        if self.buf.str_.is_null() {
            return &[];
        }
        let stored = self.buf.len.min(self.buf.size.saturating_sub(1)) as usize;
        unsafe { std::slice::from_raw_parts(self.buf.str_ as *const u8, stored) }
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }

    pub fn push_str(&mut self, s: &str) -> UtilResult<()> {
        let size = c_ulen(s.len(), "text")?;
        unsafe { (self.lib.bprint.av_bprint_append_data)(&mut *self.buf, s.as_ptr() as *const c_char, size) };
        Ok(())
    }

    /// Append `c` `n` times
    pub fn push_repeated(&mut self, c: u8, n: u32) {
        unsafe { (self.lib.bprint.av_bprint_chars)(&mut *self.buf, c as c_char, n as c_uint) }
    }

    /// Append `src` escaped; `special` lists extra characters to escape
    pub fn push_escaped(&mut self, src: &str, special: Option<&str>, mode: AVEscapeMode, flags: i32) -> UtilResult<()> {
        let src = c_string(src)?;
        let special = special.map(c_string).transpose()?;
        unsafe {
            (self.lib.bprint.av_bprint_escape)(
                &mut *self.buf,
                src.as_ptr(),
                special.as_ref().map_or(ptr::null(), |s| s.as_ptr()),
                mode.as_raw(),
                flags,
            )
        };
        Ok(())
    }

    /// Append broken-down time `time` formatted with strftime `format`
    pub fn push_time(&mut self, format: &str, time: &tm) -> UtilResult<()> {
        let format = c_string(format)?;
        unsafe { (self.lib.bprint.av_bprint_strftime)(&mut *self.buf, format.as_ptr(), time) };
        Ok(())
    }

    /// Append a channel layout description such as "stereo" or "5.1(side)"
    pub fn push_channel_layout(&mut self, nb_channels: usize, layout: u64) -> UtilResult<()> {
        let nb = c_len(nb_channels, "channel count")?;
        unsafe { (self.lib.bprint.av_bprint_channel_layout)(&mut *self.buf, nb, layout) };
        Ok(())
    }

    /// Drop the text, keeping the allocation
    pub fn clear(&mut self) {
        unsafe { (self.lib.bprint.av_bprint_clear)(&mut *self.buf) }
    }

    /// Take the text, freeing the buffer
    pub fn finish(mut self) -> UtilResult<String> {
        let mut text: *mut c_char = ptr::null_mut();
        let ret = unsafe { (self.lib.bprint.av_bprint_finalize)(&mut *self.buf, &mut text) };
        self.finalized = true;
        let text = unsafe { take_av_string(self.lib, text) };
        check(ret)?;
        Ok(text.unwrap_or_default())
    }
}

impl fmt::Write for BPrint {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s).map_err(|_| fmt::Error)
    }
}

impl Drop for BPrint {
    fn drop(&mut self) {
        if !self.finalized {
            unsafe { (self.lib.bprint.av_bprint_finalize)(&mut *self.buf, ptr::null_mut()) };
        }
    }
}

unsafe impl Send for BPrint {}

impl fmt::Debug for BPrint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BPrint")
            .field("text", &self.to_string_lossy())
            .field("complete", &self.is_complete())
            .finish()
    }
}
