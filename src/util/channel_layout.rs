//! Channel layout bitmasks

use std::fmt;
use std::os::raw::{c_char, c_int, c_uint};
use std::ptr;

use crate::ffi::channel_layout::AV_CH_LAYOUT_NATIVE;

use super::{c_string, lib, owned_str, UtilError, UtilResult};

/// `AV_CH_*` mask describing which speakers a stream carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChannelLayout(pub u64);

impl ChannelLayout {
    /// Parse a name ("5.1"), channel list ("FL+FR"), count ("6c") or mask
    pub fn from_name(name: &str) -> UtilResult<Self> {
        let lib = lib()?;
        let c_name = c_string(name)?;
        match unsafe { (lib.channel_layout.av_get_channel_layout)(c_name.as_ptr()) } {
            0 => Err(UtilError::InvalidArgument(format!("unknown channel layout {name:?}"))),
            mask => Ok(Self(mask)),
        }
    }

    /// Default layout for `channels` speakers
    pub fn default_for(channels: usize) -> UtilResult<Option<Self>> {
        let lib = lib()?;
        let Ok(nb) = c_int::try_from(channels) else {
            return Ok(None);
        };
        match unsafe { (lib.channel_layout.av_get_default_channel_layout)(nb) } {
            0 => Ok(None),
            mask => Ok(Some(Self(mask as u64))),
        }
    }

    /// Named layouts such as "mono" and "7.1(wide)"
    pub fn standard() -> UtilResult<Vec<(String, Self)>> {
        let lib = lib()?;
        let mut out = Vec::new();
        for index in 0.. {
            let mut mask = 0u64;
            let mut name: *const c_char = ptr::null();
            if unsafe { (lib.channel_layout.av_get_standard_channel_layout)(index as c_uint, &mut mask, &mut name) } != 0
            {
                break;
            }
            out.push((unsafe { owned_str(name) }.unwrap_or_default(), Self(mask)));
        }
        Ok(out)
    }

    #[inline]
    pub fn bits(self) -> u64 {
        self.0
    }

    pub fn channels(self) -> usize {
        (self.0 & !AV_CH_LAYOUT_NATIVE).count_ones() as usize
    }

    pub fn contains(self, channel: u64) -> bool {
        channel != 0 && self.0 & channel == channel
    }

    /// Position of the single-bit `channel` in this layout
    pub fn index_of(self, channel: u64) -> UtilResult<Option<usize>> {
        let lib = lib()?;
        let index = unsafe { (lib.channel_layout.av_get_channel_layout_channel_index)(self.0, channel) };
        Ok(usize::try_from(index).ok())
    }

    /// Single-bit mask of the channel at `index`
    pub fn channel_at(self, index: usize) -> Option<u64> {
        let index = c_int::try_from(index).ok()?;
        let lib = lib().ok()?;
        match unsafe { (lib.channel_layout.av_channel_layout_extract_channel)(self.0, index) } {
            0 => None,
            channel => Some(channel),
        }
    }

    /// Short channel names in order, e.g. `["FL", "FR"]`
    pub fn channel_names(self) -> UtilResult<Vec<String>> {
        let lib = lib()?;
        Ok((0..64)
            .map(|bit| 1u64 << bit)
            .filter(|&channel| self.0 & channel != 0 && channel != AV_CH_LAYOUT_NATIVE)
            .filter_map(|channel| unsafe { owned_str((lib.channel_layout.av_get_channel_name)(channel)) })
            .collect())
    }

    /// Human readable description, as used in stream dumps
    pub fn describe(self, nb_channels: usize) -> UtilResult<String> {
        let lib = lib()?;
        let nb = c_int::try_from(nb_channels).unwrap_or(0);
        let mut buf = [0 as c_char; 256];
        unsafe {
            (lib.channel_layout.av_get_channel_layout_string)(buf.as_mut_ptr(), buf.len() as c_int, nb, self.0);
            Ok(owned_str(buf.as_ptr()).unwrap_or_default())
        }
    }
}

impl From<u64> for ChannelLayout {
    fn from(mask: u64) -> Self {
        Self(mask)
    }
}

impl fmt::Display for ChannelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.describe(self.channels()) {
            Ok(text) => f.write_str(&text),
            Err(_) => write!(f, "{:#x}", self.0),
        }
    }
}

/// Short name of a single channel, e.g. "FL"
pub fn channel_name(channel: u64) -> UtilResult<Option<String>> {
    let lib = lib()?;
    Ok(unsafe { owned_str((lib.channel_layout.av_get_channel_name)(channel)) })
}

/// Long name of a single channel, e.g. "front left"
pub fn channel_description(channel: u64) -> UtilResult<Option<String>> {
    let lib = lib()?;
    Ok(unsafe { owned_str((lib.channel_layout.av_get_channel_description)(channel)) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ffi::channel_layout::*;
    use crate::ffi::testing;

    #[test]
    fn test_mask_helpers() {
        let layout = ChannelLayout(AV_CH_LAYOUT_5POINT1);
        assert_eq!(layout.channels(), 6);
        assert!(layout.contains(AV_CH_LOW_FREQUENCY));
        assert!(!layout.contains(AV_CH_BACK_LEFT));
        assert!(!layout.contains(0));
        assert_eq!(ChannelLayout(AV_CH_LAYOUT_NATIVE).channels(), 0);
    }

    #[test]
    fn test_parse_and_describe() {
        let Some(_) = testing::native() else {
            return;
        };

        assert_eq!(ChannelLayout::from_name("stereo").unwrap().bits(), AV_CH_LAYOUT_STEREO);
        assert_eq!(ChannelLayout::from_name("FL+FR+LFE").unwrap().bits(), AV_CH_LAYOUT_2POINT1);
        assert!(ChannelLayout::from_name("not a layout").is_err());

        let layout = ChannelLayout(AV_CH_LAYOUT_5POINT1);
        assert_eq!(layout.describe(6).unwrap(), "5.1(side)");
        assert_eq!(layout.to_string(), "5.1(side)");
        assert_eq!(
            layout.channel_names().unwrap(),
            vec!["FL", "FR", "FC", "LFE", "SL", "SR"]
        );
        assert_eq!(layout.index_of(AV_CH_LOW_FREQUENCY).unwrap(), Some(3));
        assert_eq!(layout.index_of(AV_CH_BACK_LEFT).unwrap(), None);
        assert_eq!(layout.channel_at(1), Some(AV_CH_FRONT_RIGHT));
        assert_eq!(layout.channel_at(6), None);
    }

    #[test]
    fn test_defaults_and_standard_list() {
        let Some(_) = testing::native() else {
            return;
        };

        assert_eq!(ChannelLayout::default_for(1).unwrap(), Some(ChannelLayout(AV_CH_LAYOUT_MONO)));
        assert_eq!(ChannelLayout::default_for(2).unwrap(), Some(ChannelLayout(AV_CH_LAYOUT_STEREO)));
        assert_eq!(ChannelLayout::default_for(64).unwrap(), None);

        let standard = ChannelLayout::standard().unwrap();
        assert_eq!(standard[0].0, "mono");
        assert!(standard.iter().any(|(name, l)| name == "7.1" && l.bits() == AV_CH_LAYOUT_7POINT1));

        assert_eq!(channel_name(AV_CH_FRONT_LEFT).unwrap().as_deref(), Some("FL"));
        assert_eq!(channel_description(AV_CH_FRONT_LEFT).unwrap().as_deref(), Some("front left"));
        assert_eq!(channel_name(AV_CH_LAYOUT_STEREO).unwrap(), None);
    }
}
