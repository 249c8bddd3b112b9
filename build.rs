//! Build script for avutil-interop
//!
//! Handles:
//! 1. NAPI-RS setup (feature `node`)
//! 2. Compiling the C layout probe via `cc` when libavutil 54 headers are found
//!
//! libavutil itself is never linked here: symbols are bound at runtime.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Major version the Rust layouts are written against
const PINNED_MAJOR: u32 = 54;

fn main() {
  #[cfg(feature = "node")]
  napi_build::setup();

  println!("cargo::rustc-check-cfg=cfg(avutil_layout_probe)");

  let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();

  if let Some(include_dir) = find_include_dir(&target_os) {
    match header_major_version(&include_dir) {
      Some(PINNED_MAJOR) => compile_layout_probe(&include_dir),
      Some(major) => println!(
        "cargo:warning=libavutil headers in {} are version {}, layout probe needs {}",
        include_dir.display(),
        major,
        PINNED_MAJOR
      ),
      None => {}
    }
  }

  println!("cargo:rerun-if-changed=src/ffi/layout_probe.c");
  println!("cargo:rerun-if-changed=build.rs");
  println!("cargo:rerun-if-env-changed=FFMPEG_DIR");
  println!("cargo:rerun-if-env-changed=AVUTIL_INCLUDE_DIR");
}

/// Locate a directory containing `libavutil/version.h`
fn find_include_dir(target_os: &str) -> Option<PathBuf> {
  if let Ok(dir) = env::var("AVUTIL_INCLUDE_DIR") {
    return Some(PathBuf::from(dir));
  }

  if let Ok(dir) = env::var("FFMPEG_DIR") {
    return Some(PathBuf::from(dir).join("include"));
  }

  // Check for pkg-config on Unix systems
  #[cfg(unix)]
  {
    if let Ok(output) = std::process::Command::new("pkg-config")
      .args(["--variable=includedir", "libavutil"])
      .output()
    {
      if output.status.success() {
        let dir = PathBuf::from(String::from_utf8_lossy(&output.stdout).trim());
        if dir.join("libavutil/version.h").exists() {
          return Some(dir);
        }
      }
    }
  }

  let common_paths: &[&str] = match target_os {
    "macos" => &["/opt/homebrew/include", "/usr/local/include", "/opt/local/include"],
    "linux" => &["/usr/include", "/usr/local/include", "/opt/ffmpeg/include"],
    "windows" => &["C:\\ffmpeg\\include"],
    _ => &[],
  };

  common_paths
    .iter()
    .map(PathBuf::from)
    .find(|p| p.join("libavutil/version.h").exists())
}

/// Read `LIBAVUTIL_VERSION_MAJOR` from the installed headers
fn header_major_version(include_dir: &Path) -> Option<u32> {
  let header = fs::read_to_string(include_dir.join("libavutil/version.h")).ok()?;
  header.lines().find_map(|line| {
    let rest = line.trim().strip_prefix("#define")?.trim_start();
    let value = rest.strip_prefix("LIBAVUTIL_VERSION_MAJOR")?;
    value.trim().parse().ok()
  })
}

/// Compile the sizeof/offsetof probe and enable the comparison tests
fn compile_layout_probe(include_dir: &Path) {
  cc::Build::new()
    .file("src/ffi/layout_probe.c")
    .include(include_dir)
    .warnings(false)
    .compile("avutil_layout_probe");

  println!("cargo:rustc-cfg=avutil_layout_probe");
}
