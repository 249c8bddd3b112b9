//! Byte and audio sample FIFOs

use std::os::raw::{c_int, c_void};
use std::ptr::{self, NonNull};

use crate::ffi::fifo::{av_fifo_peek2, AVAudioFifo, AVFifoBuffer};
use crate::ffi::{AVSampleFormat, AvUtil};

use super::{c_len, c_ulen, check, lib, require, UtilError, UtilResult};

// ============================================================================
// Byte FIFO
// ============================================================================

/// Growable circular byte buffer
///
/// Writes grow the buffer as needed; reads and drains are clamped to the
/// queued data.
pub struct Fifo {
    ptr: NonNull<AVFifoBuffer>,
    lib: &'static AvUtil,
}

impl Fifo {
    /// FIFO with room for `capacity` bytes
    pub fn new(capacity: usize) -> UtilResult<Self> {
        let lib = lib()?;
        let size = c_ulen(capacity, "FIFO capacity")?;
        let ptr = NonNull::new(unsafe { (lib.fifo.av_fifo_alloc)(size) })
            .ok_or(UtilError::AllocationFailed("AVFifoBuffer"))?;
        Ok(Self { ptr, lib })
    }

    #[inline]
    fn raw(&self) -> &AVFifoBuffer {
        unsafe { self.ptr.as_ref() }
    }

    /// Queued bytes
    pub fn len(&self) -> usize {
        unsafe { (self.lib.fifo.av_fifo_size)(self.ptr.as_ptr()).max(0) as usize }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes that fit without growing
    pub fn space(&self) -> usize {
        unsafe { (self.lib.fifo.av_fifo_space)(self.ptr.as_ptr()).max(0) as usize }
    }

    pub fn capacity(&self) -> usize {
        let raw = self.raw();
        (raw.end as usize).saturating_sub(raw.buffer as usize)
    }

    /// Ensure room for `additional` bytes beyond the queued data
    pub fn grow(&mut self, additional: usize) -> UtilResult<()> {
        let additional_c = c_ulen(additional, "FIFO growth")?;
        if let Some(grow) = self.lib.fifo.av_fifo_grow {
            check(unsafe { grow(self.ptr.as_ptr(), additional_c) })?;
            return Ok(());
        }
        let needed = self
            .len()
            .checked_add(additional)
            .ok_or_else(|| UtilError::InvalidArgument("FIFO capacity overflow".into()))?;
        if self.capacity() < needed {
            let new_size = c_ulen(needed, "FIFO capacity")?;
            check(unsafe { (self.lib.fifo.av_fifo_realloc2)(self.ptr.as_ptr(), new_size) })?;
        }
        Ok(())
    }

    /// Append all of `data`, growing when needed
    pub fn write(&mut self, data: &[u8]) -> UtilResult<()> {
        let size = c_len(data.len(), "FIFO write")?;
        if self.space() < data.len() {
            self.grow(data.len())?;
        }
        let ret = unsafe {
            (self.lib.fifo.av_fifo_generic_write)(self.ptr.as_ptr(), data.as_ptr() as *mut c_void, size, None)
        };
        check(ret)?;
        Ok(())
    }

    /// Move up to `buf.len()` bytes out; returns the count
    pub fn read(&mut self, buf: &mut [u8]) -> usize {
        let n = buf.len().min(self.len());
        if n > 0 {
            unsafe {
                (self.lib.fifo.av_fifo_generic_read)(self.ptr.as_ptr(), buf.as_mut_ptr().cast(), n as c_int, None)
            };
        }
        n
    }

    /// Copy up to `buf.len()` bytes without consuming them
    pub fn peek(&self, buf: &mut [u8]) -> usize {
        let n = buf.len().min(self.len());
        let raw = self.raw();
        let first = n.min((raw.end as usize).saturating_sub(raw.rptr as usize));
        unsafe {
            ptr::copy_nonoverlapping(raw.rptr, buf.as_mut_ptr(), first);
            ptr::copy_nonoverlapping(raw.buffer, buf.as_mut_ptr().add(first), n - first);
        }
        n
    }

    /// Byte `offset` positions past the read position
    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        if offset >= self.len() {
            return None;
        }
        Some(unsafe { *av_fifo_peek2(self.ptr.as_ptr(), offset as c_int) })
    }

    /// Discard up to `n` bytes; returns the count
    pub fn drain(&mut self, n: usize) -> usize {
        let n = n.min(self.len());
        if n > 0 {
            unsafe { (self.lib.fifo.av_fifo_drain)(self.ptr.as_ptr(), n as c_int) };
        }
        n
    }

    /// Discard everything
    pub fn reset(&mut self) {
        unsafe { (self.lib.fifo.av_fifo_reset)(self.ptr.as_ptr()) }
    }
}

impl Drop for Fifo {
    fn drop(&mut self) {
        unsafe { (self.lib.fifo.av_fifo_free)(self.ptr.as_ptr()) }
    }
}

unsafe impl Send for Fifo {}

impl std::fmt::Debug for Fifo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fifo")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}

// ============================================================================
// Audio FIFO
// ============================================================================

/// Sample FIFO in a fixed format and channel count
///
/// Buffers are passed per plane: one slice per channel for planar formats,
/// a single interleaved slice otherwise.
pub struct AudioFifo {
    ptr: NonNull<AVAudioFifo>,
    lib: &'static AvUtil,
    format: AVSampleFormat,
    channels: usize,
    bytes_per_sample: usize,
}

impl AudioFifo {
    pub fn new(format: AVSampleFormat, channels: usize, nb_samples: usize) -> UtilResult<Self> {
        let lib = lib()?;
        if format == AVSampleFormat::None || channels == 0 {
            return Err(UtilError::InvalidArgument(format!(
                "cannot queue {channels} channels of {format:?}"
            )));
        }
        let ptr = unsafe {
            (lib.audio_fifo.av_audio_fifo_alloc)(
                format.as_raw(),
                c_len(channels, "channel count")?,
                c_len(nb_samples.max(1), "sample count")?,
            )
        };
        let ptr = NonNull::new(ptr).ok_or(UtilError::AllocationFailed("AVAudioFifo"))?;
        let bytes_per_sample = unsafe { (lib.samplefmt.av_get_bytes_per_sample)(format.as_raw()) }.max(0) as usize;
        Ok(Self {
            ptr,
            lib,
            format,
            channels,
            bytes_per_sample,
        })
    }

    pub fn format(&self) -> AVSampleFormat {
        self.format
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    fn plane_count(&self) -> usize {
        if self.format.is_planar() {
            self.channels
        } else {
            1
        }
    }

    /// Bytes one plane needs for `nb_samples`
    fn plane_bytes(&self, nb_samples: usize) -> usize {
        let per_plane = if self.format.is_planar() { 1 } else { self.channels };
        nb_samples * per_plane * self.bytes_per_sample
    }

    /// Samples that fit in `planes`
    fn samples_in(&self, lens: impl Iterator<Item = usize>, count: usize) -> UtilResult<usize> {
        if count != self.plane_count() {
            return Err(UtilError::InvalidArgument(format!(
                "expected {} planes, got {count}",
                self.plane_count()
            )));
        }
        let unit = self.plane_bytes(1);
        Ok(lens.map(|len| len / unit).min().unwrap_or(0))
    }

    /// Queued samples per channel
    pub fn len(&self) -> usize {
        unsafe { (self.lib.audio_fifo.av_audio_fifo_size)(self.ptr.as_ptr()).max(0) as usize }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Samples that fit without growing
    pub fn space(&self) -> usize {
        unsafe { (self.lib.audio_fifo.av_audio_fifo_space)(self.ptr.as_ptr()).max(0) as usize }
    }

    /// Resize to hold `nb_samples`
    pub fn realloc(&mut self, nb_samples: usize) -> UtilResult<()> {
        let nb = c_len(nb_samples, "sample count")?;
        check(unsafe { (self.lib.audio_fifo.av_audio_fifo_realloc)(self.ptr.as_ptr(), nb) })?;
        Ok(())
    }

    /// Append `nb_samples` from each plane, growing as needed
    pub fn write(&mut self, planes: &[&[u8]], nb_samples: usize) -> UtilResult<usize> {
        let available = self.samples_in(planes.iter().map(|p| p.len()), planes.len())?;
        if available < nb_samples {
            return Err(UtilError::InvalidArgument(format!(
                "planes hold {available} samples, {nb_samples} requested"
            )));
        }
        let nb = c_len(nb_samples, "sample count")?;
        let mut data: Vec<*mut c_void> = planes.iter().map(|p| p.as_ptr() as *mut c_void).collect();
        let written = unsafe { (self.lib.audio_fifo.av_audio_fifo_write)(self.ptr.as_ptr(), data.as_mut_ptr(), nb) };
        Ok(check(written)? as usize)
    }

    /// Move up to as many samples as `planes` hold; returns the count
    pub fn read(&mut self, planes: &mut [&mut [u8]]) -> UtilResult<usize> {
        let nb = self.prepare_out(planes)?;
        if nb == 0 {
            return Ok(0);
        }
        let mut data: Vec<*mut c_void> = planes.iter_mut().map(|p| p.as_mut_ptr().cast()).collect();
        let read = unsafe { (self.lib.audio_fifo.av_audio_fifo_read)(self.ptr.as_ptr(), data.as_mut_ptr(), nb) };
        Ok(check(read)? as usize)
    }

    /// Like [`AudioFifo::read`] without consuming
    pub fn peek(&self, planes: &mut [&mut [u8]]) -> UtilResult<usize> {
        let peek = require(self.lib.audio_fifo.av_audio_fifo_peek, "av_audio_fifo_peek")?;
        let nb = self.prepare_out(planes)?;
        if nb == 0 {
            return Ok(0);
        }
        let mut data: Vec<*mut c_void> = planes.iter_mut().map(|p| p.as_mut_ptr().cast()).collect();
        let read = unsafe { peek(self.ptr.as_ptr(), data.as_mut_ptr(), nb) };
        Ok(check(read)? as usize)
    }

    fn prepare_out(&self, planes: &[&mut [u8]]) -> UtilResult<c_int> {
        let fits = self.samples_in(planes.iter().map(|p| p.len()), planes.len())?;
        c_len(fits.min(self.len()), "sample count")
    }

    /// Discard up to `nb_samples`; returns the count
    pub fn drain(&mut self, nb_samples: usize) -> UtilResult<usize> {
        let nb = nb_samples.min(self.len());
        check(unsafe { (self.lib.audio_fifo.av_audio_fifo_drain)(self.ptr.as_ptr(), nb as c_int) })?;
        Ok(nb)
    }

    pub fn reset(&mut self) {
        unsafe { (self.lib.audio_fifo.av_audio_fifo_reset)(self.ptr.as_ptr()) }
    }
}

impl Drop for AudioFifo {
    fn drop(&mut self) {
        unsafe { (self.lib.audio_fifo.av_audio_fifo_free)(self.ptr.as_ptr()) }
    }
}

unsafe impl Send for AudioFifo {}

impl std::fmt::Debug for AudioFifo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioFifo")
            .field("format", &self.format)
            .field("channels", &self.channels)
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ffi::testing;

    #[test]
    fn test_fifo_grows_and_wraps() {
        let Some(_) = testing::native() else {
            return;
        };

        let mut fifo = Fifo::new(8).unwrap();
        assert!(fifo.is_empty());
        fifo.write(b"abcdef").unwrap();
        let mut out = [0u8; 4];
        assert_eq!(fifo.read(&mut out), 4);
        assert_eq!(&out, b"abcd");

        // Wraps around the end of the 8 byte buffer
        fifo.write(b"ghij").unwrap();
        assert_eq!(fifo.len(), 6);
        assert_eq!(fifo.peek_at(0), Some(b'e'));
        assert_eq!(fifo.peek_at(5), Some(b'j'));
        assert_eq!(fifo.peek_at(6), None);

        let mut peeked = [0u8; 6];
        assert_eq!(fifo.peek(&mut peeked), 6);
        assert_eq!(&peeked, b"efghij");
        assert_eq!(fifo.len(), 6);

        // Larger than the remaining space
        fifo.write(b"0123456789").unwrap();
        assert_eq!(fifo.len(), 16);
        assert!(fifo.capacity() >= 16);

        assert_eq!(fifo.drain(2), 2);
        let mut rest = vec![0u8; 32];
        let n = fifo.read(&mut rest);
        assert_eq!(&rest[..n], b"ghij0123456789");
        assert_eq!(fifo.drain(5), 0);
    }

    #[test]
    fn test_fifo_reset() {
        let Some(_) = testing::native() else {
            return;
        };

        let mut fifo = Fifo::new(4).unwrap();
        fifo.write(b"xy").unwrap();
        fifo.reset();
        assert!(fifo.is_empty());
        assert_eq!(fifo.space(), fifo.capacity());
    }

    #[test]
    fn test_audio_fifo_planar() {
        let Some(_) = testing::native() else {
            return;
        };

        let mut fifo = AudioFifo::new(AVSampleFormat::S16p, 2, 4).unwrap();
        let left: Vec<u8> = (0..16).collect();
        let right: Vec<u8> = (100..116).collect();
        assert_eq!(fifo.write(&[&left[..], &right[..]], 8).unwrap(), 8);
        assert_eq!(fifo.len(), 8);

        assert!(fifo.write(&[&left[..]], 8).is_err());
        assert!(fifo.write(&[&left[..], &right[..4]], 8).is_err());

        let (mut l, mut r) = ([0u8; 6], [0u8; 6]);
        if fifo.peek(&mut [&mut l[..], &mut r[..]]).is_ok() {
            assert_eq!(&l, &left[..6]);
            assert_eq!(fifo.len(), 8);
        }

        assert_eq!(fifo.drain(1).unwrap(), 1);
        assert_eq!(fifo.read(&mut [&mut l[..], &mut r[..]]).unwrap(), 3);
        assert_eq!(&l, &left[2..8]);
        assert_eq!(&r, &right[2..8]);
        assert_eq!(fifo.len(), 4);

        fifo.reset();
        assert!(fifo.is_empty());
    }

    #[test]
    fn test_audio_fifo_packed() {
        let Some(_) = testing::native() else {
            return;
        };

        let mut fifo = AudioFifo::new(AVSampleFormat::Flt, 2, 16).unwrap();
        let samples: Vec<u8> = [0.5f32, -0.5, 0.25, -0.25]
            .iter()
            .flat_map(|s| s.to_ne_bytes())
            .collect();
        fifo.write(&[&samples[..]], 2).unwrap();

        let mut out = vec![0u8; 64];
        assert_eq!(fifo.read(&mut [&mut out[..]]).unwrap(), 2);
        assert_eq!(&out[..16], &samples[..]);

        assert!(AudioFifo::new(AVSampleFormat::None, 2, 16).is_err());
    }
}
