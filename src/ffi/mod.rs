//! Hand-written libavutil declarations (no bindgen)
//!
//! Struct layouts, enumerations and entry point signatures of libavutil
//! 54.27.100. Nothing is linked at build time: every function is resolved
//! from the shared library at runtime through [`loader`], and each header
//! module exposes its entry points as a table of function pointers.
//!
//! Everything in here is `unsafe` to call. The `util` module builds the
//! owning wrappers on top.

#[macro_use]
mod macros;

pub mod avutil;
pub mod bprint;
pub mod buffer;
pub mod channel_layout;
pub mod cpu;
pub mod crypto;
pub mod dict;
pub mod encoding;
pub mod error;
pub mod fifo;
pub mod file;
pub mod frame;
pub mod hash;
pub mod imgutils;
pub mod loader;
pub mod log;
pub mod mathematics;
pub mod mem;
pub mod opt;
pub mod parseutils;
pub mod pixdesc;
pub mod pixfmt;
pub mod samplefmt;
pub mod side_data;
pub mod types;
pub mod version;

#[cfg(all(test, avutil_layout_probe))]
mod layout_probe;

pub use error::{check_error, AvError, AvResult, ErrorCode};
pub use loader::{avutil, install, loaded, AvUtil, BindError, LibraryConfig, NativeStatic};
pub use pixfmt::AVPixelFormat;
pub use types::*;

/// Helpers for tests that need the native library
#[cfg(test)]
pub(crate) mod testing {
  use super::{avutil, AvUtil};

  /// The bound library, or `None` (with a note on stdout) when no
  /// libavutil 54 can be loaded on this machine
  pub fn native() -> Option<&'static AvUtil> {
    match avutil() {
      Ok(lib) => Some(lib),
      Err(e) => {
        println!("skipping native test: {e}");
        None
      }
    }
  }
}
