//! Pixel format descriptors and color property names

use std::os::raw::{c_char, c_int};
use std::ptr;

use crate::ffi::pixdesc::{pix_fmt_flag, AVComponentDescriptor, AVPixFmtDescriptor};
use crate::ffi::pixfmt::{AVChromaLocation, AVColorPrimaries, AVColorRange, AVColorSpace, AVColorTransferCharacteristic};
use crate::ffi::{AVPixelFormat, AvUtil};

use super::{c_string, lib, owned_str, require, UtilError, UtilResult};

/// Borrowed view of a static descriptor
#[derive(Clone, Copy)]
pub struct PixelFormatDescriptor {
    desc: &'static AVPixFmtDescriptor,
    lib: &'static AvUtil,
}

impl PixelFormatDescriptor {
    /// Descriptor of `format`
    pub fn of(format: AVPixelFormat) -> UtilResult<Self> {
        let lib = lib()?;
        let desc = unsafe { (lib.pixdesc.av_pix_fmt_desc_get)(format.as_raw()).as_ref() };
        desc.map(|desc| Self { desc, lib })
            .ok_or_else(|| UtilError::InvalidArgument(format!("no descriptor for {format:?}")))
    }

    /// Look up by name such as "yuv420p" or "rgb48"
    pub fn by_name(name: &str) -> UtilResult<Self> {
        let lib = lib()?;
        let c_name = c_string(name)?;
        let raw = unsafe { (lib.pixdesc.av_get_pix_fmt)(c_name.as_ptr()) };
        match AVPixelFormat::from_raw(raw) {
            Some(format) if format != AVPixelFormat::None => Self::of(format),
            _ => Err(UtilError::InvalidArgument(format!("unknown pixel format {name:?}"))),
        }
    }

    /// Every descriptor the library knows, in enum order
    pub fn all() -> UtilResult<Vec<Self>> {
        let lib = lib()?;
        let mut out = Vec::new();
        let mut prev: *const AVPixFmtDescriptor = ptr::null();
        loop {
            prev = unsafe { (lib.pixdesc.av_pix_fmt_desc_next)(prev) };
            match unsafe { prev.as_ref() } {
                Some(desc) => out.push(Self { desc, lib }),
                None => break,
            }
        }
        Ok(out)
    }

    #[inline]
    pub fn raw(&self) -> &'static AVPixFmtDescriptor {
        self.desc
    }

    /// The enum value; `None` for formats newer than this crate
    pub fn format(&self) -> Option<AVPixelFormat> {
        AVPixelFormat::from_raw(unsafe { (self.lib.pixdesc.av_pix_fmt_desc_get_id)(self.desc) })
    }

    pub fn name(&self) -> String {
        unsafe { owned_str(self.desc.name) }.unwrap_or_default()
    }

    pub fn aliases(&self) -> Vec<String> {
        unsafe { owned_str(self.desc.alias) }
            .map(|a| a.split(',').map(str::to_owned).collect())
            .unwrap_or_default()
    }

    pub fn nb_components(&self) -> usize {
        usize::from(self.desc.nb_components)
    }

    pub fn components(&self) -> &'static [AVComponentDescriptor] {
        self.desc.components()
    }

    /// Horizontal and vertical chroma subsampling as shifts
    pub fn chroma_shift(&self) -> (u8, u8) {
        (self.desc.log2_chroma_w, self.desc.log2_chroma_h)
    }

    pub fn flags(&self) -> u64 {
        self.desc.flags
    }

    pub fn is_planar(&self) -> bool {
        self.desc.has_flag(pix_fmt_flag::PLANAR)
    }

    pub fn is_rgb(&self) -> bool {
        self.desc.has_flag(pix_fmt_flag::RGB)
    }

    pub fn has_alpha(&self) -> bool {
        self.desc.has_flag(pix_fmt_flag::ALPHA)
    }

    pub fn has_palette(&self) -> bool {
        self.desc.has_flag(pix_fmt_flag::PAL)
    }

    pub fn is_big_endian(&self) -> bool {
        self.desc.has_flag(pix_fmt_flag::BE)
    }

    pub fn is_hwaccel(&self) -> bool {
        self.desc.has_flag(pix_fmt_flag::HWACCEL)
    }

    pub fn is_bitstream(&self) -> bool {
        self.desc.has_flag(pix_fmt_flag::BITSTREAM)
    }

    /// Bits per pixel, ignoring padding
    pub fn bits_per_pixel(&self) -> u32 {
        unsafe { (self.lib.pixdesc.av_get_bits_per_pixel)(self.desc) }.max(0) as u32
    }

    pub fn padded_bits_per_pixel(&self) -> u32 {
        unsafe { (self.lib.pixdesc.av_get_padded_bits_per_pixel)(self.desc) }.max(0) as u32
    }

    pub fn plane_count(&self) -> usize {
        let Some(format) = self.format() else {
            return 0;
        };
        unsafe { (self.lib.pixdesc.av_pix_fmt_count_planes)(format.as_raw()) }.max(0) as usize
    }

    /// Same format in the other byte order
    pub fn swap_endianness(&self) -> Option<AVPixelFormat> {
        let format = self.format()?;
        let swapped = unsafe { (self.lib.pixdesc.av_pix_fmt_swap_endianness)(format.as_raw()) };
        AVPixelFormat::from_raw(swapped).filter(|f| *f != AVPixelFormat::None)
    }
}

// Descriptors are immutable statics
unsafe impl Send for PixelFormatDescriptor {}
unsafe impl Sync for PixelFormatDescriptor {}

impl std::fmt::Debug for PixelFormatDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelFormatDescriptor")
            .field("name", &self.name())
            .field("nb_components", &self.desc.nb_components)
            .field("chroma_shift", &self.chroma_shift())
            .field("flags", &format_args!("{:#x}", self.desc.flags))
            .finish()
    }
}

/// Short name of `format`
pub fn pixel_format_name(format: AVPixelFormat) -> UtilResult<Option<String>> {
    let lib = lib()?;
    Ok(unsafe { owned_str((lib.pixdesc.av_get_pix_fmt_name)(format.as_raw())) })
}

/// `FF_LOSS_*` bits lost converting `src` to `dst`
pub fn conversion_loss(dst: AVPixelFormat, src: AVPixelFormat, has_alpha: bool) -> UtilResult<c_int> {
    let lib = lib()?;
    let loss = require(lib.pixdesc.av_get_pix_fmt_loss, "av_get_pix_fmt_loss")?;
    Ok(unsafe { loss(dst.as_raw(), src.as_raw(), has_alpha as c_int) })
}

/// The better of two conversion targets for `src`, with its loss
pub fn best_of_two(
    first: AVPixelFormat,
    second: AVPixelFormat,
    src: AVPixelFormat,
    has_alpha: bool,
) -> UtilResult<(AVPixelFormat, c_int)> {
    let lib = lib()?;
    let find = require(lib.pixdesc.av_find_best_pix_fmt_of_2, "av_find_best_pix_fmt_of_2")?;
    let mut loss: c_int = 0;
    let best = unsafe { find(first.as_raw(), second.as_raw(), src.as_raw(), has_alpha as c_int, &mut loss) };
    let best = AVPixelFormat::from_raw(best).unwrap_or(AVPixelFormat::None);
    Ok((best, loss))
}

fn property_name(
    symbol: Option<unsafe extern "C" fn(c_int) -> *const c_char>,
    name: &'static str,
    raw: c_int,
) -> UtilResult<Option<String>> {
    let f = require(symbol, name)?;
    Ok(unsafe { owned_str(f(raw)) })
}

pub fn color_range_name(range: AVColorRange) -> UtilResult<Option<String>> {
    property_name(lib()?.pixdesc.av_color_range_name, "av_color_range_name", range.as_raw())
}

pub fn color_primaries_name(primaries: AVColorPrimaries) -> UtilResult<Option<String>> {
    property_name(lib()?.pixdesc.av_color_primaries_name, "av_color_primaries_name", primaries.as_raw())
}

pub fn color_transfer_name(transfer: AVColorTransferCharacteristic) -> UtilResult<Option<String>> {
    property_name(lib()?.pixdesc.av_color_transfer_name, "av_color_transfer_name", transfer.as_raw())
}

pub fn color_space_name(space: AVColorSpace) -> UtilResult<Option<String>> {
    property_name(lib()?.pixdesc.av_color_space_name, "av_color_space_name", space.as_raw())
}

pub fn chroma_location_name(location: AVChromaLocation) -> UtilResult<Option<String>> {
    property_name(lib()?.pixdesc.av_chroma_location_name, "av_chroma_location_name", location.as_raw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ffi::pixdesc::loss_flag;
    use crate::ffi::testing;

    #[test]
    fn test_yuv420p() {
        let Some(_) = testing::native() else {
            return;
        };

        let desc = PixelFormatDescriptor::of(AVPixelFormat::Yuv420p).unwrap();
        assert_eq!(desc.name(), "yuv420p");
        assert_eq!(desc.format(), Some(AVPixelFormat::Yuv420p));
        assert_eq!(desc.nb_components(), 3);
        assert_eq!(desc.chroma_shift(), (1, 1));
        assert!(desc.is_planar());
        assert!(!desc.is_rgb());
        assert!(!desc.has_alpha());
        assert_eq!(desc.bits_per_pixel(), 12);
        assert_eq!(desc.plane_count(), 3);
        assert_eq!(desc.components()[1].plane(), 1);
        assert_eq!(desc.swap_endianness(), None);
    }

    #[test]
    fn test_lookup_by_name() {
        let Some(_) = testing::native() else {
            return;
        };

        let rgba = PixelFormatDescriptor::by_name("rgba").unwrap();
        assert!(rgba.is_rgb());
        assert!(rgba.has_alpha());
        assert_eq!(rgba.bits_per_pixel(), 32);
        assert_eq!(rgba.plane_count(), 1);

        // Endianness suffix may be dropped
        let gray16 = PixelFormatDescriptor::by_name("gray16").unwrap();
        assert_eq!(gray16.format(), Some(AVPixelFormat::GRAY16));
        let other = gray16.swap_endianness().unwrap();
        assert_ne!(other, AVPixelFormat::GRAY16);

        assert!(PixelFormatDescriptor::by_name("not-a-format").is_err());
        assert_eq!(
            pixel_format_name(AVPixelFormat::Nv12).unwrap().as_deref(),
            Some("nv12")
        );
        assert_eq!(pixel_format_name(AVPixelFormat::None).unwrap(), None);
    }

    #[test]
    fn test_enumeration_covers_known_formats() {
        let Some(_) = testing::native() else {
            return;
        };

        let all = PixelFormatDescriptor::all().unwrap();
        assert!(all.len() > 100);
        assert_eq!(all[0].format(), Some(AVPixelFormat::Yuv420p));
        assert!(all.iter().any(|d| d.has_palette() && d.name() == "pal8"));
        assert!(all.iter().any(|d| d.is_hwaccel()));
    }

    #[test]
    fn test_conversion_helpers() {
        let Some(_) = testing::native() else {
            return;
        };

        if let Ok(loss) = conversion_loss(AVPixelFormat::Gray8, AVPixelFormat::Rgb24, false) {
            assert_ne!(loss & (loss_flag::COLORSPACE | loss_flag::CHROMA), 0);
        }
        if let Ok((best, _)) = best_of_two(AVPixelFormat::Gray8, AVPixelFormat::Rgba, AVPixelFormat::Rgb24, false) {
            assert_eq!(best, AVPixelFormat::Rgba);
        }
        if let Ok(name) = color_range_name(AVColorRange::Jpeg) {
            assert_eq!(name.as_deref(), Some("pc"));
        }
        if let Ok(name) = color_space_name(AVColorSpace::Bt709) {
            assert_eq!(name.as_deref(), Some("bt709"));
        }
    }
}
