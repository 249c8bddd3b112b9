//! Library, pixel format, parsing and CPU queries

use napi::bindgen_prelude::*;
use napi_derive::napi;

use crate::ffi::{AvError, AVPixelFormat};
use crate::util::image::buffer_size;
use crate::util::parse::{parse_video_rate as native_video_rate, parse_video_size as native_video_size};
use crate::util::system;
use crate::util::{ChannelLayout, PixelFormatDescriptor};

/// Identification of the loaded libavutil
#[napi(object)]
pub struct LibraryVersion {
  /// "major.minor.micro"
  pub version: String,
  pub major: u32,
  pub minor: u32,
  pub micro: u32,
}

/// Pixel format descriptor summary
#[napi(object)]
pub struct PixelFormatInfo {
  pub name: String,
  pub nb_components: u32,
  /// Horizontal chroma subsampling as a right shift
  pub log2_chroma_w: u32,
  pub log2_chroma_h: u32,
  pub bits_per_pixel: u32,
  pub plane_count: u32,
  pub planar: bool,
  pub rgb: bool,
  pub alpha: bool,
  pub palette: bool,
  pub big_endian: bool,
  pub hwaccel: bool,
}

#[napi(object)]
pub struct VideoSize {
  pub width: u32,
  pub height: u32,
}

#[napi(object)]
pub struct Rational {
  pub num: i32,
  pub den: i32,
}

#[napi]
pub fn version() -> Result<LibraryVersion> {
  let version = system::version()?;
  Ok(LibraryVersion {
    version: version.to_string(),
    major: version.major,
    minor: version.minor,
    micro: version.micro,
  })
}

/// Build configuration of the loaded libavutil
#[napi]
pub fn configuration() -> Result<String> {
  Ok(system::configuration()?)
}

#[napi]
pub fn license() -> Result<String> {
  Ok(system::license()?)
}

/// Message for a negative libavutil error code
#[napi]
pub fn error_string(code: i32) -> String {
  AvError::from_code(code).message
}

fn descriptor(name: &str) -> Result<PixelFormatDescriptor> {
  PixelFormatDescriptor::by_name(name)
    .map_err(|_| Error::new(Status::InvalidArg, format!("Unknown pixel format '{}'", name)))
}

fn pixel_format(name: &str) -> Result<AVPixelFormat> {
  descriptor(name)?
    .format()
    .ok_or_else(|| Error::new(Status::InvalidArg, format!("Unknown pixel format '{}'", name)))
}

#[napi]
pub fn pixel_format_info(name: String) -> Result<PixelFormatInfo> {
  let desc = descriptor(&name)?;
  let (log2_chroma_w, log2_chroma_h) = desc.chroma_shift();
  Ok(PixelFormatInfo {
    name: desc.name(),
    nb_components: desc.nb_components() as u32,
    log2_chroma_w: log2_chroma_w as u32,
    log2_chroma_h: log2_chroma_h as u32,
    bits_per_pixel: desc.bits_per_pixel(),
    plane_count: desc.plane_count() as u32,
    planar: desc.is_planar(),
    rgb: desc.is_rgb(),
    alpha: desc.has_alpha(),
    palette: desc.has_palette(),
    big_endian: desc.is_big_endian(),
    hwaccel: desc.is_hwaccel(),
  })
}

/// Names of every pixel format known to the loaded library
#[napi]
pub fn pixel_format_names() -> Result<Vec<String>> {
  Ok(PixelFormatDescriptor::all()?.iter().map(|d| d.name()).collect())
}

/// Bytes needed for a `width` x `height` image with `align` byte lines
/// (default 1)
#[napi]
pub fn image_buffer_size(format: String, width: u32, height: u32, align: Option<u32>) -> Result<u32> {
  let size = buffer_size(pixel_format(&format)?, width, height, align.unwrap_or(1))?;
  Ok(size as u32)
}

/// "1280x720", "hd720", ...
#[napi]
pub fn parse_video_size(text: String) -> Result<VideoSize> {
  let (width, height) = native_video_size(&text)?;
  Ok(VideoSize { width, height })
}

/// "30000/1001", "ntsc", "25", ...
#[napi]
pub fn parse_video_rate(text: String) -> Result<Rational> {
  let rate = native_video_rate(&text)?;
  Ok(Rational {
    num: rate.num,
    den: rate.den,
  })
}

/// Canonical description of a layout name such as "5.1" or "FL+FR"
#[napi]
pub fn channel_layout_description(layout: String) -> Result<String> {
  let layout = ChannelLayout::from_name(&layout)?;
  Ok(layout.describe(layout.channels())?)
}

#[napi]
pub fn cpu_count() -> Result<u32> {
  Ok(system::cpu_count()? as u32)
}

/// Names of the CPU features libavutil detected, e.g. `["sse2", "avx2"]`
#[napi]
pub fn cpu_flags() -> Result<Vec<String>> {
  let flags = system::cpu_flags()?;
  Ok(system::cpu_flag_names(flags).into_iter().map(String::from).collect())
}
