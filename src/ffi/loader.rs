//! Runtime binding of the libavutil shared library
//!
//! The declaration modules only describe signatures. This module opens the
//! native library, checks that it matches the pinned ABI and resolves every
//! symbol table into callable function pointers.

use std::ffi::OsString;
use std::os::raw::c_uint;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use libloading::Library;
use thiserror::Error;

use super::avutil::UtilApi;
use super::buffer::BufferApi;
use super::bprint::BPrintApi;
use super::channel_layout::ChannelLayoutApi;
use super::cpu::CpuApi;
use super::crypto::{AesApi, BlowfishApi, CamelliaApi, Cast5Api};
use super::dict::DictApi;
use super::encoding::{Base64Api, LzoApi};
use super::error::ErrorApi;
use super::fifo::{AudioFifoApi, FifoApi};
use super::file::FileApi;
use super::frame::FrameApi;
use super::hash::{CrcApi, HashApi, HmacApi, Md5Api, Murmur3Api};
use super::imgutils::{ImgutilsApi, PixelUtilsApi};
use super::log::LogApi;
use super::mathematics::MathApi;
use super::mem::MemApi;
use super::opt::OptApi;
use super::parseutils::ParseApi;
use super::pixdesc::PixdescApi;
use super::samplefmt::SampleFmtApi;
use super::side_data::{DisplayApi, DownmixApi};
use super::version::{AvVersion, LIBAVUTIL_VERSION_INT};

// ============================================================================
// Errors
// ============================================================================

/// Failure to bind the native library
#[derive(Debug, Error)]
pub enum BindError {
  #[error("libavutil could not be loaded (tried {tried:?})")]
  NotFound {
    tried: Vec<PathBuf>,
    #[source]
    last: Option<libloading::Error>,
  },

  #[error("libavutil does not export `{symbol}`")]
  MissingSymbol {
    symbol: &'static str,
    #[source]
    source: libloading::Error,
  },

  #[error("libavutil {found} is not ABI compatible with {expected}")]
  VersionMismatch { found: AvVersion, expected: AvVersion },

  #[error("a libavutil instance is already installed")]
  AlreadyInstalled,
}

// ============================================================================
// Configuration
// ============================================================================

/// Explicit library path
pub const ENV_LIBRARY: &str = "AVUTIL_LIBRARY";
/// FFmpeg installation prefix
pub const ENV_FFMPEG_DIR: &str = "FFMPEG_DIR";

/// Platform file name of the pinned libavutil major version
pub const fn library_file_name() -> &'static str {
  if cfg!(target_os = "windows") {
    "avutil-54.dll"
  } else if cfg!(target_os = "macos") {
    "libavutil.54.dylib"
  } else {
    "libavutil.so.54"
  }
}

/// Where to look for the native library
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryConfig {
  /// Exact library path; when set, nothing else is tried
  pub path: Option<PathBuf>,
  /// Directories searched before the platform loader path
  pub search_dirs: Vec<PathBuf>,
}

impl LibraryConfig {
  /// Build the configuration from `AVUTIL_LIBRARY` and `FFMPEG_DIR`
  pub fn from_env() -> Self {
    Self::from_lookup(|key| std::env::var_os(key))
  }

  /// Build the configuration from an arbitrary variable lookup
  pub fn from_lookup<F>(lookup: F) -> Self
  where
    F: Fn(&str) -> Option<OsString>,
  {
    let path = lookup(ENV_LIBRARY)
      .filter(|v| !v.is_empty())
      .map(PathBuf::from);

    let mut search_dirs = Vec::new();
    if let Some(prefix) = lookup(ENV_FFMPEG_DIR).filter(|v| !v.is_empty()) {
      let prefix = PathBuf::from(prefix);
      search_dirs.push(prefix.join("lib"));
      if cfg!(target_os = "windows") {
        search_dirs.push(prefix.join("bin"));
      }
    }

    Self { path, search_dirs }
  }

  /// Candidate paths in the order they are tried
  pub fn candidates(&self) -> Vec<PathBuf> {
    if let Some(path) = &self.path {
      return vec![path.clone()];
    }

    let name = library_file_name();
    let mut candidates: Vec<PathBuf> = self.search_dirs.iter().map(|d| d.join(name)).collect();
    // Bare name last so the platform loader path applies
    candidates.push(PathBuf::from(name));
    candidates
  }
}

// ============================================================================
// Symbol resolution
// ============================================================================

/// Address of an exported data symbol such as `av_aes_size`
#[repr(transparent)]
pub struct NativeStatic<T>(*const T);

impl<T> Clone for NativeStatic<T> {
  fn clone(&self) -> Self {
    *self
  }
}

impl<T> Copy for NativeStatic<T> {}

// Exported constants are never written after the library is loaded
unsafe impl<T: Sync> Send for NativeStatic<T> {}
unsafe impl<T: Sync> Sync for NativeStatic<T> {}

impl<T: Copy> NativeStatic<T> {
  /// Read the value
  ///
  /// # Safety
  /// The library the symbol was resolved from must still be loaded.
  pub unsafe fn read(self) -> T {
    *self.0
  }

  pub fn as_ptr(self) -> *const T {
    self.0
  }
}

pub(crate) unsafe fn required<T: Copy>(
  library: &Library,
  symbol: &'static str,
) -> Result<T, BindError> {
  library
    .get::<T>(symbol.as_bytes())
    .map(|s| *s)
    .map_err(|source| BindError::MissingSymbol { symbol, source })
}

pub(crate) unsafe fn optional<T: Copy>(library: &Library, symbol: &'static str) -> Option<T> {
  match library.get::<T>(symbol.as_bytes()) {
    Ok(s) => Some(*s),
    Err(_) => {
      tracing::debug!(target: "avutil", "optional symbol {} not exported", symbol);
      None
    }
  }
}

/// Check a runtime `avutil_version()` against the pinned ABI.
///
/// Same major, at least the pinned minor, and an FFmpeg micro (>= 100;
/// Libav builds use small micros and incompatible pixel format values).
pub fn check_version(raw: c_uint) -> Result<AvVersion, BindError> {
  let found = AvVersion::from_int(raw);
  let expected = AvVersion::from_int(LIBAVUTIL_VERSION_INT);

  let compatible =
    found.major == expected.major && found.minor >= expected.minor && found.micro >= 100;
  if compatible {
    Ok(found)
  } else {
    Err(BindError::VersionMismatch { found, expected })
  }
}

// ============================================================================
// Bound library
// ============================================================================

/// Table name with its required and optional symbols
pub type SymbolTable = (&'static str, &'static [&'static str], &'static [&'static str]);

macro_rules! table {
  ($name:literal, $api:ty) => {
    ($name, <$api>::SYMBOLS, <$api>::OPTIONAL_SYMBOLS)
  };
}

/// Every libavutil symbol table, bound against one loaded library
pub struct AvUtil {
  pub version: AvVersion,
  pub util: UtilApi,
  pub error: ErrorApi,
  pub mem: MemApi,
  pub buffer: BufferApi,
  pub dict: DictApi,
  pub frame: FrameApi,
  pub log: LogApi,
  pub opt: OptApi,
  pub pixdesc: PixdescApi,
  pub imgutils: ImgutilsApi,
  pub pixelutils: PixelUtilsApi,
  pub channel_layout: ChannelLayoutApi,
  pub samplefmt: SampleFmtApi,
  pub fifo: FifoApi,
  pub audio_fifo: AudioFifoApi,
  pub bprint: BPrintApi,
  pub aes: AesApi,
  pub blowfish: BlowfishApi,
  pub camellia: CamelliaApi,
  pub cast5: Cast5Api,
  pub crc: CrcApi,
  pub md5: Md5Api,
  pub murmur3: Murmur3Api,
  pub hash: HashApi,
  pub hmac: HmacApi,
  pub base64: Base64Api,
  pub lzo: LzoApi,
  pub file: FileApi,
  pub display: DisplayApi,
  pub downmix: DownmixApi,
  pub parse: ParseApi,
  pub cpu: CpuApi,
  pub math: MathApi,
  // Dropped last: every pointer above points into it
  _library: Library,
}

impl AvUtil {
  /// `(table, required, optional)` symbol names of every table
  pub const TABLES: &'static [SymbolTable] = &[
    table!("util", UtilApi),
    table!("error", ErrorApi),
    table!("mem", MemApi),
    table!("buffer", BufferApi),
    table!("dict", DictApi),
    table!("frame", FrameApi),
    table!("log", LogApi),
    table!("opt", OptApi),
    table!("pixdesc", PixdescApi),
    table!("imgutils", ImgutilsApi),
    table!("pixelutils", PixelUtilsApi),
    table!("channel_layout", ChannelLayoutApi),
    table!("samplefmt", SampleFmtApi),
    table!("fifo", FifoApi),
    table!("audio_fifo", AudioFifoApi),
    table!("bprint", BPrintApi),
    table!("aes", AesApi),
    table!("blowfish", BlowfishApi),
    table!("camellia", CamelliaApi),
    table!("cast5", Cast5Api),
    table!("crc", CrcApi),
    table!("md5", Md5Api),
    table!("murmur3", Murmur3Api),
    table!("hash", HashApi),
    table!("hmac", HmacApi),
    table!("base64", Base64Api),
    table!("lzo", LzoApi),
    table!("file", FileApi),
    table!("display", DisplayApi),
    table!("downmix", DownmixApi),
    table!("parse", ParseApi),
    table!("cpu", CpuApi),
    table!("math", MathApi),
  ];

  /// Required symbol names of every table
  pub fn symbols() -> impl Iterator<Item = &'static str> {
    Self::TABLES.iter().flat_map(|(_, required, _)| required.iter().copied())
  }

  /// Open the first loadable candidate and bind it
  pub fn load(config: &LibraryConfig) -> Result<Self, BindError> {
    let tried = config.candidates();
    let mut last = None;

    for path in &tried {
      // SAFETY: loading libavutil runs no initialisers with preconditions
      match unsafe { Library::new(path) } {
        Ok(library) => {
          tracing::debug!(target: "avutil", "loaded {}", path.display());
          return unsafe { Self::from_library(library) };
        }
        Err(e) => {
          tracing::trace!(target: "avutil", "cannot load {}: {}", path.display(), e);
          last = Some(e);
        }
      }
    }

    Err(BindError::NotFound { tried, last })
  }

  /// Bind an already opened library
  ///
  /// # Safety
  /// `library` must be libavutil. The version is checked before any other
  /// symbol is bound, but a foreign library exporting `avutil_version` is not
  /// detected.
  pub unsafe fn from_library(library: Library) -> Result<Self, BindError> {
    let avutil_version: unsafe extern "C" fn() -> c_uint = required(&library, "avutil_version")?;
    let version = check_version(avutil_version())?;

    Ok(Self {
      version,
      util: UtilApi::bind(&library)?,
      error: ErrorApi::bind(&library)?,
      mem: MemApi::bind(&library)?,
      buffer: BufferApi::bind(&library)?,
      dict: DictApi::bind(&library)?,
      frame: FrameApi::bind(&library)?,
      log: LogApi::bind(&library)?,
      opt: OptApi::bind(&library)?,
      pixdesc: PixdescApi::bind(&library)?,
      imgutils: ImgutilsApi::bind(&library)?,
      pixelutils: PixelUtilsApi::bind(&library)?,
      channel_layout: ChannelLayoutApi::bind(&library)?,
      samplefmt: SampleFmtApi::bind(&library)?,
      fifo: FifoApi::bind(&library)?,
      audio_fifo: AudioFifoApi::bind(&library)?,
      bprint: BPrintApi::bind(&library)?,
      aes: AesApi::bind(&library)?,
      blowfish: BlowfishApi::bind(&library)?,
      camellia: CamelliaApi::bind(&library)?,
      cast5: Cast5Api::bind(&library)?,
      crc: CrcApi::bind(&library)?,
      md5: Md5Api::bind(&library)?,
      murmur3: Murmur3Api::bind(&library)?,
      hash: HashApi::bind(&library)?,
      hmac: HmacApi::bind(&library)?,
      base64: Base64Api::bind(&library)?,
      lzo: LzoApi::bind(&library)?,
      file: FileApi::bind(&library)?,
      display: DisplayApi::bind(&library)?,
      downmix: DownmixApi::bind(&library)?,
      parse: ParseApi::bind(&library)?,
      cpu: CpuApi::bind(&library)?,
      math: MathApi::bind(&library)?,
      _library: library,
    })
  }
}

impl std::fmt::Debug for AvUtil {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("AvUtil")
      .field("version", &self.version)
      .finish_non_exhaustive()
  }
}

// ============================================================================
// Process-wide instance
// ============================================================================

static AVUTIL: OnceLock<AvUtil> = OnceLock::new();
static INIT_LOCK: Mutex<()> = Mutex::new(());

/// The process-wide libavutil binding, loaded from the environment on first use.
///
/// Load failures are returned and not remembered, so a later call can
/// succeed once the library becomes available.
pub fn avutil() -> Result<&'static AvUtil, BindError> {
  if let Some(lib) = AVUTIL.get() {
    return Ok(lib);
  }

  let _guard = INIT_LOCK.lock().unwrap_or_else(|e| e.into_inner());
  if let Some(lib) = AVUTIL.get() {
    return Ok(lib);
  }

  let lib = AvUtil::load(&LibraryConfig::from_env())?;
  tracing::info!(target: "avutil", "bound libavutil {}", lib.version);
  Ok(AVUTIL.get_or_init(|| lib))
}

/// Install an explicitly loaded library as the process-wide binding
pub fn install(lib: AvUtil) -> Result<&'static AvUtil, BindError> {
  let _guard = INIT_LOCK.lock().unwrap_or_else(|e| e.into_inner());
  AVUTIL.set(lib).map_err(|_| BindError::AlreadyInstalled)?;
  AVUTIL.get().ok_or(BindError::AlreadyInstalled)
}

/// The process-wide binding if it has already been loaded
pub fn loaded() -> Option<&'static AvUtil> {
  AVUTIL.get()
}
