//! String parsers for sizes, rates, colors and times

use std::ffi::CStr;
use std::os::raw::{c_char, c_int};
use std::ptr;

use crate::ffi::parseutils::tm;
use crate::ffi::AVRational;

use super::{c_string, check, lib, owned_str, require, UtilError, UtilResult};

/// "WxH" or an abbreviation such as "hd720"
pub fn parse_video_size(s: &str) -> UtilResult<(u32, u32)> {
    let lib = lib()?;
    let c_s = c_string(s)?;
    let (mut width, mut height): (c_int, c_int) = (0, 0);
    check(unsafe { (lib.parse.av_parse_video_size)(&mut width, &mut height, c_s.as_ptr()) })?;
    Ok((width as u32, height as u32))
}

/// A ratio, a decimal or an abbreviation such as "ntsc"
pub fn parse_video_rate(s: &str) -> UtilResult<AVRational> {
    let lib = lib()?;
    let c_s = c_string(s)?;
    let mut rate = AVRational::default();
    check(unsafe { (lib.parse.av_parse_video_rate)(&mut rate, c_s.as_ptr()) })?;
    Ok(rate)
}

/// "num:den", "num/den" or a decimal, reduced so neither term exceeds `max`
pub fn parse_ratio(s: &str, max: i32) -> UtilResult<AVRational> {
    let lib = lib()?;
    let c_s = c_string(s)?;
    let mut ratio = AVRational::default();
    check(unsafe { (lib.parse.av_parse_ratio)(&mut ratio, c_s.as_ptr(), max, 0, ptr::null_mut()) })?;
    Ok(ratio)
}

/// RGBA bytes of a color name, "0xRRGGBB[AA]" or "random", with an
/// optional "@alpha" suffix
pub fn parse_color(s: &str) -> UtilResult<[u8; 4]> {
    let lib = lib()?;
    let c_s = c_string(s)?;
    let mut rgba = [0u8; 4];
    check(unsafe { (lib.parse.av_parse_color)(rgba.as_mut_ptr(), c_s.as_ptr(), -1, ptr::null_mut()) })?;
    Ok(rgba)
}

/// Every named color with its RGB value
pub fn known_colors() -> UtilResult<Vec<(String, [u8; 3])>> {
    let lib = lib()?;
    let mut out = Vec::new();
    for index in 0.. {
        let mut rgb: *const u8 = ptr::null();
        let name = unsafe { (lib.parse.av_get_known_color_name)(index, &mut rgb) };
        let Some(name) = (unsafe { owned_str(name) }) else {
            break;
        };
        let mut value = [0u8; 3];
        if !rgb.is_null() {
            unsafe { ptr::copy_nonoverlapping(rgb, value.as_mut_ptr(), 3) };
        }
        out.push((name, value));
    }
    Ok(out)
}

/// Microseconds: since the epoch for a date, or a signed length for a
/// duration such as "-1:02:03.5"
pub fn parse_time(s: &str, duration: bool) -> UtilResult<i64> {
    let lib = lib()?;
    let c_s = c_string(s)?;
    let mut value = 0i64;
    check(unsafe { (lib.parse.av_parse_time)(&mut value, c_s.as_ptr(), duration as c_int) })?;
    Ok(value)
}

/// Value of `tag` in a "tag1=value1&tag2=value2" string
pub fn find_info_tag(tag: &str, info: &str) -> UtilResult<Option<String>> {
    let lib = lib()?;
    let c_tag = c_string(tag)?;
    let c_info = c_string(info)?;
    let mut arg = vec![0 as c_char; info.len() + 1];
    let found = unsafe {
        (lib.parse.av_find_info_tag)(arg.as_mut_ptr(), arg.len() as c_int, c_tag.as_ptr(), c_info.as_ptr())
    };
    if found == 0 {
        return Ok(None);
    }
    Ok(unsafe { owned_str(arg.as_ptr()) })
}

/// Parse `s` against a strptime-style `format` (%H %J %M %S %Y %m %d %T
/// and %%); returns the broken-down time and the unparsed rest
pub fn strptime<'a>(s: &'a str, format: &str) -> UtilResult<Option<(tm, &'a str)>> {
    let lib = lib()?;
    let small_strptime = require(lib.parse.av_small_strptime, "av_small_strptime")?;
    let c_s = c_string(s)?;
    let c_format = c_string(format)?;
    let mut time = tm::default();
    let end = unsafe { small_strptime(c_s.as_ptr(), c_format.as_ptr(), &mut time) };
    if end.is_null() {
        return Ok(None);
    }
    let consumed = unsafe { CStr::from_ptr(c_s.as_ptr()).to_bytes().len() - CStr::from_ptr(end).to_bytes().len() };
    let rest = s
        .get(consumed..)
        .ok_or_else(|| UtilError::InvalidArgument("parse ended inside a character".into()))?;
    Ok(Some((time, rest)))
}

/// Seconds since the epoch of a UTC broken-down time
pub fn timegm(time: &tm) -> UtilResult<i64> {
    let lib = lib()?;
    let timegm = require(lib.parse.av_timegm, "av_timegm")?;
    let mut time = *time;
    Ok(unsafe { timegm(&mut time) } as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::ffi::testing;

    #[test]
    fn test_sizes_and_rates() {
        let Some(_) = testing::native() else {
            return;
        };

        assert_eq!(parse_video_size("hd1080").unwrap(), (1920, 1080));
        assert_eq!(parse_video_size("352x288").unwrap(), (352, 288));
        assert!(parse_video_size("big").is_err());

        assert_eq!(parse_video_rate("pal").unwrap(), AVRational::new(25, 1));
        assert_eq!(parse_video_rate("24000/1001").unwrap(), AVRational::new(24000, 1001));
        assert!(parse_video_rate("-5").is_err());

        assert_eq!(parse_ratio("4:3", 255).unwrap(), AVRational::new(4, 3));
        assert_eq!(parse_ratio("1.5", 255).unwrap(), AVRational::new(3, 2));
    }

    #[test]
    fn test_colors() {
        let Some(_) = testing::native() else {
            return;
        };

        assert_eq!(parse_color("blue").unwrap(), [0, 0, 0xff, 0xff]);
        assert_eq!(parse_color("0xff000080").unwrap(), [0xff, 0, 0, 0x80]);
        assert_eq!(parse_color("white@0.5").unwrap()[3], 127);
        assert!(parse_color("nocolor").is_err());

        let colors = known_colors().unwrap();
        assert!(colors.len() > 100);
        assert!(colors.iter().any(|(name, rgb)| name == "Red" && *rgb == [0xff, 0, 0]));
    }

    #[test]
    fn test_color_edge_inputs() {
        let Some(_) = testing::native() else {
            return;
        };

        assert!(parse_color("").is_err());
        assert!(parse_color(&String::new()).is_err());
        assert!(parse_color("0").is_err());
        assert!(parse_color("#").is_err());
        assert_eq!(parse_color("#ff0000").unwrap(), [0xff, 0, 0, 0xff]);
        assert_eq!(parse_color("0x00ff00").unwrap(), [0, 0xff, 0, 0xff]);
    }

    #[test]
    fn test_times_and_tags() {
        let Some(_) = testing::native() else {
            return;
        };

        assert_eq!(parse_time("00:01:30", true).unwrap(), 90_000_000);
        assert_eq!(parse_time("1.5", true).unwrap(), 1_500_000);
        assert_eq!(parse_time("1970-01-01T00:00:10Z", false).unwrap(), 10_000_000);
        assert!(parse_time("soon", true).is_err());

        assert_eq!(
            find_info_tag("user", "host=a&user=b&pass=c").unwrap().as_deref(),
            Some("b")
        );
        assert_eq!(find_info_tag("port", "host=a").unwrap(), None);
    }

    #[test]
    fn test_strptime_and_timegm() {
        let Some(_) = testing::native() else {
            return;
        };

        let Ok(parsed) = strptime("2000-03-01 12:00:00 tail", "%Y-%m-%d %H:%M:%S") else {
            return;
        };
        let (time, rest) = parsed.unwrap();
        assert_eq!(rest, " tail");
        assert_eq!((time.tm_year, time.tm_mon, time.tm_mday), (100, 2, 1));
        assert_eq!(timegm(&time).unwrap(), 951_912_000);

        assert!(strptime("12:xx", "%H:%M").unwrap().is_none());
    }
}
