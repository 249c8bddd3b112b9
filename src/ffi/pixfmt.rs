//! Pixel formats and color properties (`pixfmt.h`)
//!
//! Values follow the 54.27 numbering. The XVMC and VDPAU compatibility slots
//! are present because `FF_API_XVMC`/`FF_API_VDPAU` are enabled, and the
//! `*Libav` variants occupy the slots Libav assigned to formats FFmpeg later
//! moved above `0x123`.

use std::os::raw::c_int;

// ============================================================================
// Pixel Format
// ============================================================================

c_enum! {
    /// Pixel format
    pub enum AVPixelFormat {
        None = -1,
        Yuv420p = 0,
        Yuyv422 = 1,
        Rgb24 = 2,
        Bgr24 = 3,
        Yuv422p = 4,
        Yuv444p = 5,
        Yuv410p = 6,
        Yuv411p = 7,
        Gray8 = 8,
        Monowhite = 9,
        Monoblack = 10,
        Pal8 = 11,
        /// Full scale (JPEG) YUV420P, deprecated in favour of `color_range`
        Yuvj420p = 12,
        Yuvj422p = 13,
        Yuvj444p = 14,
        XvmcMpeg2Mc = 15,
        XvmcMpeg2Idct = 16,
        Uyvy422 = 17,
        Uyyvyy411 = 18,
        Bgr8 = 19,
        Bgr4 = 20,
        Bgr4Byte = 21,
        Rgb8 = 22,
        Rgb4 = 23,
        Rgb4Byte = 24,
        Nv12 = 25,
        Nv21 = 26,
        Argb = 27,
        Rgba = 28,
        Abgr = 29,
        Bgra = 30,
        Gray16be = 31,
        Gray16le = 32,
        Yuv440p = 33,
        Yuvj440p = 34,
        Yuva420p = 35,
        VdpauH264 = 36,
        VdpauMpeg1 = 37,
        VdpauMpeg2 = 38,
        VdpauWmv3 = 39,
        VdpauVc1 = 40,
        Rgb48be = 41,
        Rgb48le = 42,
        Rgb565be = 43,
        Rgb565le = 44,
        Rgb555be = 45,
        Rgb555le = 46,
        Bgr565be = 47,
        Bgr565le = 48,
        Bgr555be = 49,
        Bgr555le = 50,
        VaapiMoco = 51,
        VaapiIdct = 52,
        VaapiVld = 53,
        Yuv420p16le = 54,
        Yuv420p16be = 55,
        Yuv422p16le = 56,
        Yuv422p16be = 57,
        Yuv444p16le = 58,
        Yuv444p16be = 59,
        VdpauMpeg4 = 60,
        Dxva2Vld = 61,
        Rgb444le = 62,
        Rgb444be = 63,
        Bgr444le = 64,
        Bgr444be = 65,
        /// 8-bit gray with alpha
        Ya8 = 66,
        Bgr48be = 67,
        Bgr48le = 68,
        Yuv420p9be = 69,
        Yuv420p9le = 70,
        Yuv420p10be = 71,
        Yuv420p10le = 72,
        Yuv422p10be = 73,
        Yuv422p10le = 74,
        Yuv444p9be = 75,
        Yuv444p9le = 76,
        Yuv444p10be = 77,
        Yuv444p10le = 78,
        Yuv422p9be = 79,
        Yuv422p9le = 80,
        VdaVld = 81,
        /// Planar GBR 4:4:4
        Gbrp = 82,
        Gbrp9be = 83,
        Gbrp9le = 84,
        Gbrp10be = 85,
        Gbrp10le = 86,
        Gbrp16be = 87,
        Gbrp16le = 88,
        Yuva422pLibav = 89,
        Yuva444pLibav = 90,
        Yuva420p9be = 91,
        Yuva420p9le = 92,
        Yuva422p9be = 93,
        Yuva422p9le = 94,
        Yuva444p9be = 95,
        Yuva444p9le = 96,
        Yuva420p10be = 97,
        Yuva420p10le = 98,
        Yuva422p10be = 99,
        Yuva422p10le = 100,
        Yuva444p10be = 101,
        Yuva444p10le = 102,
        Yuva420p16be = 103,
        Yuva420p16le = 104,
        Yuva422p16be = 105,
        Yuva422p16le = 106,
        Yuva444p16be = 107,
        Yuva444p16le = 108,
        /// `data[3]` is a `VdpVideoSurface`
        Vdpau = 109,
        Xyz12le = 110,
        Xyz12be = 111,
        Nv16 = 112,
        Nv20le = 113,
        Nv20be = 114,
        Rgba64beLibav = 115,
        Rgba64leLibav = 116,
        Bgra64beLibav = 117,
        Bgra64leLibav = 118,
        Yvyu422 = 119,
        /// `data[3]` is a `CVPixelBufferRef`
        Vda = 120,
        Ya16be = 121,
        Ya16le = 122,
        GbrapLibav = 123,
        Gbrap16beLibav = 124,
        Gbrap16leLibav = 125,
        Qsv = 126,
        Mmal = 127,
        D3d11vaVld = 128,
        Rgba64be = 0x123,
        Rgba64le = 292,
        Bgra64be = 293,
        Bgra64le = 294,
        /// `0RGB`, the leading byte is unused
        Zrgb = 295,
        /// `RGB0`
        Rgbz = 296,
        /// `0BGR`
        Zbgr = 297,
        /// `BGR0`
        Bgrz = 298,
        Yuva444p = 299,
        Yuva422p = 300,
        Yuv420p12be = 301,
        Yuv420p12le = 302,
        Yuv420p14be = 303,
        Yuv420p14le = 304,
        Yuv422p12be = 305,
        Yuv422p12le = 306,
        Yuv422p14be = 307,
        Yuv422p14le = 308,
        Yuv444p12be = 309,
        Yuv444p12le = 310,
        Yuv444p14be = 311,
        Yuv444p14le = 312,
        Gbrp12be = 313,
        Gbrp12le = 314,
        Gbrp14be = 315,
        Gbrp14le = 316,
        Gbrap = 317,
        Gbrap16be = 318,
        Gbrap16le = 319,
        Yuvj411p = 320,
        BayerBggr8 = 321,
        BayerRggb8 = 322,
        BayerGbrg8 = 323,
        BayerGrbg8 = 324,
        BayerBggr16le = 325,
        BayerBggr16be = 326,
        BayerRggb16le = 327,
        BayerRggb16be = 328,
        BayerGbrg16le = 329,
        BayerGbrg16be = 330,
        BayerGrbg16le = 331,
        BayerGrbg16be = 332,
        Yuv440p10le = 333,
        Yuv440p10be = 334,
        Yuv440p12le = 335,
        Yuv440p12be = 336,
    }
}

impl AVPixelFormat {
    pub const Y400A: Self = Self::Ya8;
    pub const GRAY8A: Self = Self::Ya8;

    /// Hardware surface formats whose `data` planes are not pixels
    pub fn is_hwaccel(&self) -> bool {
        matches!(
            self,
            Self::XvmcMpeg2Mc
                | Self::XvmcMpeg2Idct
                | Self::VdpauH264
                | Self::VdpauMpeg1
                | Self::VdpauMpeg2
                | Self::VdpauWmv3
                | Self::VdpauVc1
                | Self::VdpauMpeg4
                | Self::Vdpau
                | Self::VaapiMoco
                | Self::VaapiIdct
                | Self::VaapiVld
                | Self::Dxva2Vld
                | Self::VdaVld
                | Self::Vda
                | Self::Qsv
                | Self::Mmal
                | Self::D3d11vaVld
        )
    }
}

impl Default for AVPixelFormat {
    fn default() -> Self {
        Self::None
    }
}

/// `AV_PIX_FMT_NE`: pick the big- or little-endian variant of the host
macro_rules! native_endian {
    ($($alias:ident => $be:ident, $le:ident;)*) => {
        impl AVPixelFormat {
            $(
                #[cfg(target_endian = "big")]
                pub const $alias: Self = Self::$be;
                #[cfg(target_endian = "little")]
                pub const $alias: Self = Self::$le;
            )*
        }
    };
}

native_endian! {
    RGB32 => Argb, Bgra;
    RGB32_1 => Rgba, Abgr;
    BGR32 => Abgr, Rgba;
    BGR32_1 => Bgra, Argb;
    ZRGB32 => Zrgb, Bgrz;
    ZBGR32 => Zbgr, Rgbz;

    GRAY16 => Gray16be, Gray16le;
    YA16 => Ya16be, Ya16le;
    RGB48 => Rgb48be, Rgb48le;
    RGB565 => Rgb565be, Rgb565le;
    RGB555 => Rgb555be, Rgb555le;
    RGB444 => Rgb444be, Rgb444le;
    BGR48 => Bgr48be, Bgr48le;
    BGR565 => Bgr565be, Bgr565le;
    BGR555 => Bgr555be, Bgr555le;
    BGR444 => Bgr444be, Bgr444le;

    YUV420P9 => Yuv420p9be, Yuv420p9le;
    YUV422P9 => Yuv422p9be, Yuv422p9le;
    YUV444P9 => Yuv444p9be, Yuv444p9le;
    YUV420P10 => Yuv420p10be, Yuv420p10le;
    YUV422P10 => Yuv422p10be, Yuv422p10le;
    YUV440P10 => Yuv440p10be, Yuv440p10le;
    YUV444P10 => Yuv444p10be, Yuv444p10le;
    YUV420P12 => Yuv420p12be, Yuv420p12le;
    YUV422P12 => Yuv422p12be, Yuv422p12le;
    YUV440P12 => Yuv440p12be, Yuv440p12le;
    YUV444P12 => Yuv444p12be, Yuv444p12le;
    YUV420P14 => Yuv420p14be, Yuv420p14le;
    YUV422P14 => Yuv422p14be, Yuv422p14le;
    YUV444P14 => Yuv444p14be, Yuv444p14le;
    YUV420P16 => Yuv420p16be, Yuv420p16le;
    YUV422P16 => Yuv422p16be, Yuv422p16le;
    YUV444P16 => Yuv444p16be, Yuv444p16le;

    GBRP9 => Gbrp9be, Gbrp9le;
    GBRP10 => Gbrp10be, Gbrp10le;
    GBRP12 => Gbrp12be, Gbrp12le;
    GBRP14 => Gbrp14be, Gbrp14le;
    GBRP16 => Gbrp16be, Gbrp16le;
    GBRAP16 => Gbrap16be, Gbrap16le;

    BAYER_BGGR16 => BayerBggr16be, BayerBggr16le;
    BAYER_RGGB16 => BayerRggb16be, BayerRggb16le;
    BAYER_GBRG16 => BayerGbrg16be, BayerGbrg16le;
    BAYER_GRBG16 => BayerGrbg16be, BayerGrbg16le;

    YUVA420P9 => Yuva420p9be, Yuva420p9le;
    YUVA422P9 => Yuva422p9be, Yuva422p9le;
    YUVA444P9 => Yuva444p9be, Yuva444p9le;
    YUVA420P10 => Yuva420p10be, Yuva420p10le;
    YUVA422P10 => Yuva422p10be, Yuva422p10le;
    YUVA444P10 => Yuva444p10be, Yuva444p10le;
    YUVA420P16 => Yuva420p16be, Yuva420p16le;
    YUVA422P16 => Yuva422p16be, Yuva422p16le;
    YUVA444P16 => Yuva444p16be, Yuva444p16le;

    XYZ12 => Xyz12be, Xyz12le;
    NV20 => Nv20be, Nv20le;
    RGBA64 => Rgba64be, Rgba64le;
    BGRA64 => Bgra64be, Bgra64le;
}

// ============================================================================
// Color Properties
// ============================================================================

c_enum! {
    /// Chromaticity coordinates of the source primaries
    pub enum AVColorPrimaries {
        Reserved0 = 0,
        /// Also ITU-R BT1361, IEC 61966-2-4, SMPTE RP177 Annex B
        Bt709 = 1,
        Unspecified = 2,
        Reserved = 3,
        Bt470m = 4,
        /// Also BT601-6 625, BT1358 625, BT1700 625 PAL & SECAM
        Bt470bg = 5,
        /// Also BT601-6 525, BT1358 525, BT1700 NTSC
        Smpte170m = 6,
        Smpte240m = 7,
        /// Color filters using Illuminant C
        Film = 8,
        Bt2020 = 9,
    }
}

c_enum! {
    /// Color transfer characteristic
    pub enum AVColorTransferCharacteristic {
        Reserved0 = 0,
        Bt709 = 1,
        Unspecified = 2,
        Reserved = 3,
        Gamma22 = 4,
        Gamma28 = 5,
        Smpte170m = 6,
        Smpte240m = 7,
        Linear = 8,
        /// Logarithmic (100:1 range)
        Log = 9,
        /// Logarithmic (100 * Sqrt(10) : 1 range)
        LogSqrt = 10,
        Iec61966_2_4 = 11,
        Bt1361Ecg = 12,
        /// sRGB
        Iec61966_2_1 = 13,
        Bt2020_10 = 14,
        Bt2020_12 = 15,
    }
}

c_enum! {
    /// YUV colorspace type
    pub enum AVColorSpace {
        /// GBR order, also IEC 61966-2-1 (sRGB)
        Rgb = 0,
        Bt709 = 1,
        Unspecified = 2,
        Reserved = 3,
        Fcc = 4,
        Bt470bg = 5,
        Smpte170m = 6,
        Smpte240m = 7,
        Ycocg = 8,
        Bt2020Ncl = 9,
        Bt2020Cl = 10,
    }
}

impl AVColorSpace {
    pub const YCGCO: Self = Self::Ycocg;
}

c_enum! {
    /// MPEG (limited) vs JPEG (full) YUV range
    pub enum AVColorRange {
        Unspecified = 0,
        /// 219*2^(n-8) luma levels
        Mpeg = 1,
        /// 2^n levels
        Jpeg = 2,
    }
}

c_enum! {
    /// Location of chroma samples relative to luma
    pub enum AVChromaLocation {
        Unspecified = 0,
        /// MPEG-2/4, H.264 default
        Left = 1,
        /// MPEG-1, JPEG, H.263
        Center = 2,
        /// DV
        TopLeft = 3,
        Top = 4,
        BottomLeft = 5,
        Bottom = 6,
    }
}

impl Default for AVColorPrimaries {
    fn default() -> Self {
        Self::Unspecified
    }
}

impl Default for AVColorTransferCharacteristic {
    fn default() -> Self {
        Self::Unspecified
    }
}

impl Default for AVColorSpace {
    fn default() -> Self {
        Self::Unspecified
    }
}

impl Default for AVColorRange {
    fn default() -> Self {
        Self::Unspecified
    }
}

impl Default for AVChromaLocation {
    fn default() -> Self {
        Self::Unspecified
    }
}

/// Raw value of a pixel format read from native memory
pub fn pixel_format(raw: c_int) -> Option<AVPixelFormat> {
    AVPixelFormat::from_raw(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_pixel_format_numbering() {
        assert_eq!(AVPixelFormat::Yuv420p.as_raw(), 0);
        assert_eq!(AVPixelFormat::Uyvy422.as_raw(), 17);
        assert_eq!(AVPixelFormat::Nv12.as_raw(), 25);
        assert_eq!(AVPixelFormat::Rgba.as_raw(), 28);
        assert_eq!(AVPixelFormat::Yuva420p.as_raw(), 35);
        assert_eq!(AVPixelFormat::Yuv420p10le.as_raw(), 72);
        assert_eq!(AVPixelFormat::Gbrp.as_raw(), 82);
        assert_eq!(AVPixelFormat::Vdpau.as_raw(), 109);
        assert_eq!(AVPixelFormat::D3d11vaVld.as_raw(), 128);
        assert_eq!(AVPixelFormat::Rgba64be.as_raw(), 291);
        assert_eq!(AVPixelFormat::Yuva422p.as_raw(), 300);
        assert_eq!(AVPixelFormat::Gbrap.as_raw(), 317);
        assert_eq!(AVPixelFormat::Yuv440p12be.as_raw(), 336);
    }

    #[test]
    fn test_pixel_format_values_are_unique() {
        let values: HashSet<c_int> = AVPixelFormat::ALL.iter().map(|f| f.as_raw()).collect();
        assert_eq!(values.len(), AVPixelFormat::ALL.len());
        // 0..=128 contiguous, then 291..=336
        assert_eq!(AVPixelFormat::ALL.len(), 1 + 129 + 46);
        assert_eq!(pixel_format(129), None);
        assert_eq!(pixel_format(290), None);
        assert_eq!(pixel_format(337), None);
    }

    #[test]
    fn test_aliases() {
        assert_eq!(AVPixelFormat::GRAY8A, AVPixelFormat::Ya8);
        assert_eq!(AVPixelFormat::Y400A.as_raw(), 66);
        assert_eq!(AVColorSpace::YCGCO.as_raw(), 8);

        #[cfg(target_endian = "little")]
        {
            assert_eq!(AVPixelFormat::RGB32, AVPixelFormat::Bgra);
            assert_eq!(AVPixelFormat::ZRGB32, AVPixelFormat::Bgrz);
            assert_eq!(AVPixelFormat::YUV420P10, AVPixelFormat::Yuv420p10le);
        }
        #[cfg(target_endian = "big")]
        {
            assert_eq!(AVPixelFormat::RGB32, AVPixelFormat::Argb);
            assert_eq!(AVPixelFormat::YUV420P10, AVPixelFormat::Yuv420p10be);
        }
    }

    #[test]
    fn test_hwaccel_formats() {
        assert!(AVPixelFormat::VaapiVld.is_hwaccel());
        assert!(AVPixelFormat::Qsv.is_hwaccel());
        assert!(!AVPixelFormat::Nv12.is_hwaccel());
    }

    #[test]
    fn test_color_values() {
        assert_eq!(AVColorPrimaries::Bt2020.as_raw(), 9);
        assert_eq!(AVColorTransferCharacteristic::Bt2020_12.as_raw(), 15);
        assert_eq!(AVColorSpace::Bt2020Cl.as_raw(), 10);
        assert_eq!(AVColorRange::Jpeg.as_raw(), 2);
        assert_eq!(AVChromaLocation::Bottom.as_raw(), 6);
        assert_eq!(AVColorRange::default(), AVColorRange::Unspecified);
        assert_eq!(AVColorTransferCharacteristic::from_raw(16), None);
    }
}
