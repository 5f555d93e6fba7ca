//! Logging system integration with the native facade
//!
//! This module provides safe Rust wrappers around the native log streams,
//! allowing you to capture and handle log messages from the facade layer.
//! Messages arrive as `"<Level>: <text>\n"`; [`TracingLogStream`] forwards
//! them into `tracing` at the matching level.

use std::ffi::CStr;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::os::raw::c_char;
use std::path::{Path, PathBuf};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, PoisonError};

use crate::{
    error::{Error, Result, check_status},
    sys,
};

/// Log levels emitted by the native layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Verbose debug information
    Debug,
    /// Informational messages
    Info,
    /// Warning messages
    Warn,
    /// Error messages
    Error,
}

impl LogLevel {
    /// Parse the level prefix of a native log message
    pub fn from_message(message: &str) -> Option<Self> {
        let (prefix, _) = message.split_once(':')?;
        match prefix {
            "Debug" => Some(LogLevel::Debug),
            "Info" => Some(LogLevel::Info),
            "Warn" => Some(LogLevel::Warn),
            "Error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// Receiver of native log messages
///
/// `write` runs on whichever thread raised the message, while the native
/// layer holds its stream list. It may call back into the facade, but any
/// message such a call raises on the same thread is dropped, and attaching
/// or detaching streams from inside `write` fails with an error.
pub trait LogStream: Send + Sync {
    /// Handle one `"<Level>: <text>\n"` message
    fn write(&mut self, message: &str);
}

/// A log stream that writes to stdout
pub struct StdoutLogStream;

impl LogStream for StdoutLogStream {
    fn write(&mut self, message: &str) {
        print!("{}", message);
    }
}

/// A log stream that writes to stderr
pub struct StderrLogStream;

impl LogStream for StderrLogStream {
    fn write(&mut self, message: &str) {
        eprint!("{}", message);
    }
}

/// A log stream that forwards messages to `tracing`
pub struct TracingLogStream;

impl LogStream for TracingLogStream {
    fn write(&mut self, message: &str) {
        let text = message
            .split_once(": ")
            .map_or(message, |(_, text)| text)
            .trim_end();
        match LogLevel::from_message(message) {
            Some(LogLevel::Debug) => tracing::debug!(target: "datasmith_facade::native", "{text}"),
            Some(LogLevel::Warn) => tracing::warn!(target: "datasmith_facade::native", "{text}"),
            Some(LogLevel::Error) => tracing::error!(target: "datasmith_facade::native", "{text}"),
            Some(LogLevel::Info) | None => tracing::info!(target: "datasmith_facade::native", "{text}"),
        }
    }
}

/// A log stream appending to a file
///
/// Write failures are reported through `tracing` and counted; the message
/// itself is lost.
pub struct FileLogStream {
    file: File,
    path: PathBuf,
    failed_writes: usize,
}

impl FileLogStream {
    /// Open `path` for appending and mark the start of a session
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| Error::other(format!("cannot open log file {}: {e}", path.display())))?;

        writeln!(
            file,
            "# datasmith-facade {} (facade ABI {})",
            crate::version::CRATE_VERSION,
            crate::version::facade_version()
        )
        .map_err(|e| Error::other(format!("cannot write log file {}: {e}", path.display())))?;

        Ok(Self {
            file,
            path,
            failed_writes: 0,
        })
    }

    /// Number of messages that could not be written
    pub fn failed_writes(&self) -> usize {
        self.failed_writes
    }
}

impl LogStream for FileLogStream {
    fn write(&mut self, message: &str) {
        let result = self
            .file
            .write_all(message.as_bytes())
            .and_then(|()| self.file.flush());
        if let Err(error) = result {
            self.failed_writes += 1;
            tracing::warn!(path = %self.path.display(), %error, "failed to write native log message");
        }
    }
}

/// A log stream that collects messages in memory
pub struct MemoryLogStream {
    messages: Vec<String>,
}

impl MemoryLogStream {
    /// Create a new memory log stream
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Get all collected messages
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Collected messages of the given level
    pub fn messages_at(&self, level: LogLevel) -> impl Iterator<Item = &str> {
        self.messages
            .iter()
            .map(String::as_str)
            .filter(move |message| LogLevel::from_message(message) == Some(level))
    }

    /// Clear all collected messages
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

impl Default for MemoryLogStream {
    fn default() -> Self {
        Self::new()
    }
}

impl LogStream for MemoryLogStream {
    fn write(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}

/// User data handed to the native layer for one attached stream
struct LogStreamWrapper {
    stream: Arc<Mutex<dyn LogStream>>,
}

/// Owner of the log streams attached to the native layer
pub struct Logger {
    streams: Vec<OwnedLogStream>,
}

struct OwnedLogStream {
    native_stream: sys::FDatasmithFacadeLogStream,
    user_data: *mut LogStreamWrapper,
    stream: Arc<Mutex<dyn LogStream>>,
}

// The wrapper is only dereferenced by the native callback, and is freed only
// after a successful native detach, which waits for any running delivery.
unsafe impl Send for OwnedLogStream {}

impl Logger {
    /// Create a new logger
    pub fn new() -> Self {
        Self {
            streams: Vec::new(),
        }
    }

    /// Attach a log stream
    pub fn attach_stream(&mut self, stream: Arc<Mutex<dyn LogStream>>) -> Result<()> {
        // Freed on detach; the native layer only ever sees it as user data.
        let user_data = Box::into_raw(Box::new(LogStreamWrapper {
            stream: Arc::clone(&stream),
        }));

        let native_stream = sys::FDatasmithFacadeLogStream {
            callback: Some(log_callback),
            user: user_data as *mut c_char,
        };

        let status = unsafe { sys::FDatasmithFacade_AttachLogStream(&native_stream) };
        if let Err(error) = check_status(status) {
            drop(unsafe { Box::from_raw(user_data) });
            return Err(error);
        }

        self.streams.push(OwnedLogStream {
            native_stream,
            user_data,
            stream,
        });
        Ok(())
    }

    /// Detach a log stream
    ///
    /// Streams not attached through this logger are ignored. If the native
    /// detach fails the stream stays attached and owned by this logger.
    pub fn detach_stream(&mut self, stream: &Arc<Mutex<dyn LogStream>>) -> Result<()> {
        let Some(pos) = self
            .streams
            .iter()
            .position(|s| Arc::ptr_eq(&s.stream, stream))
        else {
            return Ok(());
        };
        check_status(unsafe { sys::FDatasmithFacade_DetachLogStream(&self.streams[pos].native_stream) })?;

        let owned = self.streams.remove(pos);
        drop(unsafe { Box::from_raw(owned.user_data) });
        Ok(())
    }

    /// Detach all log streams owned by this logger
    ///
    /// Streams the native layer refuses to detach are kept.
    pub fn detach_all_streams(&mut self) {
        self.streams.retain(|s| {
            let status = unsafe { sys::FDatasmithFacade_DetachLogStream(&s.native_stream) };
            match check_status(status) {
                Ok(()) => {
                    drop(unsafe { Box::from_raw(s.user_data) });
                    false
                }
                Err(error) => {
                    tracing::warn!(%error, "log stream left attached");
                    true
                }
            }
        });
    }

    /// Number of attached streams
    pub fn stream_count(&self) -> usize {
        self.streams.len()
    }

    /// Enable or disable debug-level messages
    pub fn enable_verbose_logging(&self, enable: bool) {
        sys::FDatasmithFacade_EnableVerboseLogging(if enable { 1 } else { 0 });
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        // Wrappers of streams that are still attached are leaked, not freed.
        self.detach_all_streams();
    }
}

/// C callback function for log messages
extern "C" fn log_callback(message: *const c_char, user: *mut c_char) {
    if message.is_null() || user.is_null() {
        return;
    }

    // A panicking stream must not unwind into the native caller.
    let _ = catch_unwind(AssertUnwindSafe(|| unsafe {
        let Ok(text) = CStr::from_ptr(message).to_str() else {
            return;
        };
        let wrapper = &*(user as *const LogStreamWrapper);
        // A stream poisoned by an earlier panic is skipped.
        if let Ok(mut stream) = wrapper.stream.lock() {
            stream.write(text);
        }
    }));
}

/// Global logger instance
static GLOBAL_LOGGER: std::sync::OnceLock<Mutex<Logger>> = std::sync::OnceLock::new();

/// Get the global logger instance
pub fn global_logger() -> &'static Mutex<Logger> {
    GLOBAL_LOGGER.get_or_init(|| Mutex::new(Logger::new()))
}

fn with_global_logger<R>(f: impl FnOnce(&mut Logger) -> R) -> R {
    let mut logger = global_logger()
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    f(&mut logger)
}

/// Convenience function to attach a stdout log stream
pub fn attach_stdout_stream() -> Result<()> {
    let stream = Arc::new(Mutex::new(StdoutLogStream));
    with_global_logger(|logger| logger.attach_stream(stream))
}

/// Convenience function to attach a stderr log stream
pub fn attach_stderr_stream() -> Result<()> {
    let stream = Arc::new(Mutex::new(StderrLogStream));
    with_global_logger(|logger| logger.attach_stream(stream))
}

/// Convenience function to forward native messages to `tracing`
pub fn attach_tracing_stream() -> Result<()> {
    let stream = Arc::new(Mutex::new(TracingLogStream));
    with_global_logger(|logger| logger.attach_stream(stream))
}

/// Convenience function to attach a file log stream
pub fn attach_file_stream<P: AsRef<Path>>(path: P) -> Result<()> {
    let stream = Arc::new(Mutex::new(FileLogStream::new(path)?));
    with_global_logger(|logger| logger.attach_stream(stream))
}

/// Convenience function to enable verbose logging
pub fn enable_verbose_logging(enable: bool) {
    with_global_logger(|logger| logger.enable_verbose_logging(enable));
}

/// Convenience function to detach all log streams of the global logger
pub fn detach_all_streams() {
    with_global_logger(Logger::detach_all_streams);
}
