#![deny(clippy::all)]

//! libavutil 54.27 interop for Rust and Node.js
//!
//! This crate declares the public ABI of libavutil 54.27.100 by hand and
//! binds it at runtime, so nothing is linked at build time.

// libavutil declarations and the runtime symbol loader
pub mod ffi;

// Safe wrappers (RAII)
pub mod util;

// Node.js surface (NAPI functions)
#[cfg(feature = "node")]
pub mod node;

pub use ffi::{avutil, AvError, AvUtil, BindError, LibraryConfig};
pub use util::{UtilError, UtilResult};
