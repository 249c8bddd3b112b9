//! Routing of native log messages into `tracing` and channels
//!
//! [`install`] replaces the libavutil log callback with a trampoline that
//! formats each line, forwards it to `tracing` under the `avutil` target and
//! fans it out to every live [`subscribe`] receiver and [`LogStream`].

use std::os::raw::{c_char, c_int, c_void};
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Mutex;
use std::task::{Context, Poll};

use crossbeam::channel::{self, Receiver, Sender};
use tokio::sync::mpsc::{self as tokio_mpsc, UnboundedReceiver, UnboundedSender};

use crate::ffi::log::{log_level, AVClass, VaList};
use crate::ffi::AvUtil;

use super::{c_string, lib, owned_str, UtilResult};

/// Line buffer size, matching the native default callback
const LINE_SIZE: usize = 1024;

static INSTALLED: AtomicBool = AtomicBool::new(false);
static PRINT_PREFIX: AtomicI32 = AtomicI32::new(1);
static SUBSCRIBERS: Mutex<Vec<Sender<LogRecord>>> = Mutex::new(Vec::new());
static STREAMS: Mutex<Vec<UnboundedSender<LogRecord>>> = Mutex::new(Vec::new());

/// One formatted native log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// `AV_LOG_*` level with color bits removed
    pub level: i32,
    /// Item name of the logging context, if it had an `AVClass`
    pub class: Option<String>,
    /// Formatted text without the trailing newline
    pub message: String,
}

impl LogRecord {
    pub fn tracing_level(&self) -> tracing::Level {
        match self.level {
            l if l <= log_level::ERROR => tracing::Level::ERROR,
            l if l <= log_level::WARNING => tracing::Level::WARN,
            l if l <= log_level::INFO => tracing::Level::INFO,
            l if l <= log_level::VERBOSE => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

/// Route native log output through this module
///
/// Idempotent. The native callback setter is not thread safe, so call this
/// before other threads start using libavutil.
pub fn install() -> UtilResult<()> {
    let lib = lib()?;
    if !INSTALLED.swap(true, Ordering::SeqCst) {
        unsafe { (lib.log.av_log_set_callback)(Some(log_trampoline)) };
        tracing::debug!(target: "avutil", "native log callback installed");
    }
    Ok(())
}

/// Restore the native stderr callback
pub fn uninstall() -> UtilResult<()> {
    let lib = lib()?;
    if INSTALLED.swap(false, Ordering::SeqCst) {
        unsafe { (lib.log.av_log_set_callback)(Some(lib.log.av_log_default_callback)) };
    }
    Ok(())
}

pub fn is_installed() -> bool {
    INSTALLED.load(Ordering::SeqCst)
}

/// Receive every record dispatched after this call
pub fn subscribe() -> Receiver<LogRecord> {
    let (tx, rx) = channel::unbounded();
    lock(&SUBSCRIBERS).push(tx);
    rx
}

/// Messages above `level` are dropped before formatting
pub fn set_level(level: i32) -> UtilResult<()> {
    let lib = lib()?;
    unsafe { (lib.log.av_log_set_level)(level) };
    Ok(())
}

pub fn level() -> UtilResult<i32> {
    let lib = lib()?;
    Ok(unsafe { (lib.log.av_log_get_level)() })
}

/// `log_flag` bits
pub fn set_flags(flags: i32) -> UtilResult<()> {
    let lib = lib()?;
    unsafe { (lib.log.av_log_set_flags)(flags) };
    Ok(())
}

/// Current flags; `None` when the library cannot report them
pub fn flags() -> UtilResult<Option<i32>> {
    let lib = lib()?;
    Ok(lib.log.av_log_get_flags.map(|get| unsafe { get() }))
}

/// Emit `message` through the native logger with no context
pub fn emit(level: i32, message: &str) -> UtilResult<()> {
    let lib = lib()?;
    let message = c_string(message)?;
    unsafe {
        (lib.log.av_log)(
            std::ptr::null_mut(),
            level,
            b"%s\n\0".as_ptr() as *const c_char,
            message.as_ptr(),
        )
    };
    Ok(())
}

/// Async receiver of native log records
#[derive(Debug)]
pub struct LogStream {
    rx: UnboundedReceiver<LogRecord>,
}

impl LogStream {
    pub fn new() -> Self {
        let (tx, rx) = tokio_mpsc::unbounded_channel();
        lock(&STREAMS).push(tx);
        Self { rx }
    }

    pub async fn recv(&mut self) -> Option<LogRecord> {
        self.rx.recv().await
    }
}

impl Default for LogStream {
    fn default() -> Self {
        Self::new()
    }
}

impl futures::Stream for LogStream {
    type Item = LogRecord;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn dispatch(record: LogRecord) {
    let target_level = record.tracing_level();
    match target_level {
        tracing::Level::ERROR => tracing::error!(target: "avutil", class = ?record.class, "{}", record.message),
        tracing::Level::WARN => tracing::warn!(target: "avutil", class = ?record.class, "{}", record.message),
        tracing::Level::INFO => tracing::info!(target: "avutil", class = ?record.class, "{}", record.message),
        tracing::Level::DEBUG => tracing::debug!(target: "avutil", class = ?record.class, "{}", record.message),
        tracing::Level::TRACE => tracing::trace!(target: "avutil", class = ?record.class, "{}", record.message),
    }

    lock(&SUBSCRIBERS).retain(|tx| tx.send(record.clone()).is_ok());
    lock(&STREAMS).retain(|tx| tx.send(record.clone()).is_ok());
}

/// Item name of a context whose first member is `*const AVClass`
unsafe fn item_name(avcl: *mut c_void) -> Option<String> {
    if avcl.is_null() {
        return None;
    }
    let class = *(avcl as *const *const AVClass);
    let class = class.as_ref()?;
    match class.item_name {
        Some(item_name) => owned_str(item_name(avcl)),
        None => owned_str(class.class_name),
    }
}

unsafe fn format_line(lib: &AvUtil, avcl: *mut c_void, level: c_int, fmt: *const c_char, vl: VaList) -> String {
    let mut line = [0 as c_char; LINE_SIZE];
    let mut print_prefix = PRINT_PREFIX.load(Ordering::Relaxed);
    (lib.log.av_log_format_line)(avcl, level, fmt, vl, line.as_mut_ptr(), LINE_SIZE as c_int, &mut print_prefix);
    PRINT_PREFIX.store(print_prefix, Ordering::Relaxed);
    let text = owned_str(line.as_ptr()).unwrap_or_default();
    text.trim_end_matches(|c| c == '\n' || c == '\r').to_owned()
}

unsafe extern "C" fn log_trampoline(avcl: *mut c_void, level: c_int, fmt: *const c_char, vl: VaList) {
    // Unwinding into C is undefined
    let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let Ok(lib) = crate::ffi::avutil() else {
            return;
        };
        let level = level & 0xff;
        if level > (lib.log.av_log_get_level)() {
            return;
        }
        let message = format_line(lib, avcl, level, fmt, vl);
        if message.is_empty() {
            return;
        }
        dispatch(LogRecord {
            level,
            class: item_name(avcl),
            message,
        });
    }));
}
