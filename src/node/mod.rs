//! Node.js surface (feature `node`)
//!
//! Thin `#[napi]` functions over [`crate::util`]. Every fallible call maps
//! [`UtilError`] onto a JavaScript `Error` with a matching status.

mod digest;
mod info;
mod logging;

pub use digest::*;
pub use info::*;
pub use logging::*;

use napi::bindgen_prelude::*;

use crate::util::UtilError;

impl From<UtilError> for Error {
  fn from(err: UtilError) -> Self {
    let status = match &err {
      UtilError::InvalidArgument(_) | UtilError::Nul(_) => Status::InvalidArg,
      UtilError::Av(e) if e.is_invalid() => Status::InvalidArg,
      _ => Status::GenericFailure,
    };
    Error::new(status, err.to_string())
  }
}

/// Error for an unrecognised enum name passed from JavaScript
pub(crate) fn unknown(what: &str, name: &str, known: &[&str]) -> Error {
  Error::new(
    Status::InvalidArg,
    format!("Unknown {what} '{name}', expected one of: {}", known.join(", ")),
  )
}
