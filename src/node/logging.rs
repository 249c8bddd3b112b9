//! Native log level control and JavaScript log callbacks

use std::thread::JoinHandle;

use crossbeam::channel::{self, Sender};
use napi::bindgen_prelude::*;
use napi::threadsafe_function::{ThreadsafeFunction, ThreadsafeFunctionCallMode, UnknownReturnValue};
use napi_derive::napi;

use crate::util::log::{self, LogRecord};

/// One native log line as delivered to JavaScript
#[napi(object)]
pub struct LogEntry {
  /// `AV_LOG_*` level: 8 fatal, 16 error, 24 warning, 32 info, 40 verbose, 48 debug
  pub level: i32,
  /// Name of the logging context, if any
  pub class: Option<String>,
  pub message: String,
}

impl From<LogRecord> for LogEntry {
  fn from(record: LogRecord) -> Self {
    Self {
      level: record.level,
      class: record.class,
      message: record.message,
    }
  }
}

type LogCallback = ThreadsafeFunction<LogEntry, UnknownReturnValue, LogEntry, Status, false, true>;

/// Messages above `level` are discarded by libavutil
#[napi]
pub fn set_log_level(level: i32) -> Result<()> {
  Ok(log::set_level(level)?)
}

#[napi]
pub fn get_log_level() -> Result<i32> {
  Ok(log::level()?)
}

/// Handle returned by `onLog`; call `unsubscribe()` to stop delivery
#[napi]
pub struct LogSubscription {
  stop: Option<Sender<()>>,
  worker: Option<JoinHandle<()>>,
}

#[napi]
impl LogSubscription {
  #[napi]
  pub fn unsubscribe(&mut self) {
    // Dropping the sender wakes the worker
    self.stop.take();
    if let Some(worker) = self.worker.take() {
      let _ = worker.join();
    }
  }

  #[napi(getter)]
  pub fn active(&self) -> bool {
    self.worker.is_some()
  }
}

impl Drop for LogSubscription {
  fn drop(&mut self) {
    self.unsubscribe();
  }
}

/// Route native log output to `callback`
///
/// Installs the libavutil log callback on first use. Messages are formatted
/// on the logging thread and delivered asynchronously.
#[napi]
pub fn on_log(callback: Function<LogEntry, UnknownReturnValue>) -> Result<LogSubscription> {
  let tsfn: LogCallback = callback
    .build_threadsafe_function()
    .callee_handled::<false>()
    .weak::<true>()
    .build()?;

  log::install()?;
  let records = log::subscribe();
  let (stop_tx, stop_rx) = channel::bounded::<()>(0);

  let worker = std::thread::Builder::new()
    .name("avutil-log".into())
    .spawn(move || loop {
      crossbeam::select! {
        recv(records) -> record => match record {
          Ok(record) => {
            let _ = tsfn.call(LogEntry::from(record), ThreadsafeFunctionCallMode::NonBlocking);
          }
          Err(_) => break,
        },
        recv(stop_rx) -> _ => break,
      }
    })
    .map_err(|e| Error::new(Status::GenericFailure, format!("Failed to spawn log thread: {}", e)))?;

  Ok(LogSubscription {
    stop: Some(stop_tx),
    worker: Some(worker),
  })
}
