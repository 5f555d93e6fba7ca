//! Native log streams.
//!
//! A log stream is a C callback plus an opaque user pointer. Every attached
//! stream receives each message as a NUL-terminated UTF-8 string of the form
//! `"<Level>: <text>\n"`.
//!
//! Callbacks may call back into the facade. Messages raised while a callback
//! is running on the same thread are dropped, and attaching or detaching
//! streams from inside a callback fails, since the stream list is locked
//! for the duration of the delivery.

use std::cell::Cell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{FACADE_STATUS_INVALID_ARGUMENT, FACADE_STATUS_OK, FDatasmithFacadeStatus, fail};

/// Callback invoked for each log message.
pub type FDatasmithFacadeLogCallback =
    Option<unsafe extern "C" fn(message: *const c_char, user: *mut c_char)>;

/// A native log stream registration.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct FDatasmithFacadeLogStream {
    /// Function receiving the messages
    pub callback: FDatasmithFacadeLogCallback,
    /// User data passed back to `callback`
    pub user: *mut c_char,
}

struct AttachedStream(FDatasmithFacadeLogStream);

// SAFETY: the user pointer is never dereferenced here; it is only handed back
// to the callback, which the attaching side promises is callable from any thread.
unsafe impl Send for AttachedStream {}

static STREAMS: Mutex<Vec<AttachedStream>> = Mutex::new(Vec::new());
static VERBOSE: AtomicBool = AtomicBool::new(false);

thread_local! {
    static DELIVERING: Cell<bool> = const { Cell::new(false) };
}

/// Marks the current thread as delivering until dropped.
struct Delivery;

impl Delivery {
    fn begin() -> Option<Self> {
        if DELIVERING.replace(true) {
            None
        } else {
            Some(Delivery)
        }
    }
}

impl Drop for Delivery {
    fn drop(&mut self) {
        DELIVERING.set(false);
    }
}

fn delivering() -> bool {
    DELIVERING.get()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Severity {
    Debug,
    Info,
    Warn,
    Error,
}

impl Severity {
    fn prefix(self) -> &'static str {
        match self {
            Severity::Debug => "Debug",
            Severity::Info => "Info",
            Severity::Warn => "Warn",
            Severity::Error => "Error",
        }
    }
}

/// Deliver a message to every attached stream.
///
/// Callbacks run while the stream list is locked, so a stream cannot be
/// detached (and its user data freed) during delivery. Messages raised by a
/// callback itself are dropped instead of re-entering the lock.
pub(crate) fn emit(severity: Severity, text: &str) {
    if severity == Severity::Debug && !VERBOSE.load(Ordering::Relaxed) {
        return;
    }
    let Some(_delivery) = Delivery::begin() else {
        return;
    };

    let streams = STREAMS.lock().unwrap_or_else(|e| e.into_inner());
    if streams.is_empty() {
        return;
    }

    let line = format!("{}: {}\n", severity.prefix(), text.replace('\0', ""));
    let Ok(message) = CString::new(line) else {
        return;
    };

    for stream in streams.iter() {
        if let Some(callback) = stream.0.callback {
            unsafe { callback(message.as_ptr(), stream.0.user) };
        }
    }
}

/// Attach a log stream. Attaching the same stream twice delivers messages twice.
///
/// Fails with `FACADE_STATUS_INVALID_ARGUMENT` when called from a log callback.
///
/// # Safety
/// `stream` must point to a valid [`FDatasmithFacadeLogStream`]. Its
/// callback must be callable from any thread until the stream is detached.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn FDatasmithFacade_AttachLogStream(
    stream: *const FDatasmithFacadeLogStream,
) -> FDatasmithFacadeStatus {
    if stream.is_null() {
        return fail(FACADE_STATUS_INVALID_ARGUMENT, "log stream is null");
    }
    if delivering() {
        return fail(FACADE_STATUS_INVALID_ARGUMENT, "cannot attach a log stream from a log callback");
    }
    let stream = unsafe { *stream };
    STREAMS
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .push(AttachedStream(stream));
    FACADE_STATUS_OK
}

/// Detach the first attached stream whose callback and user data match.
///
/// Fails with `FACADE_STATUS_INVALID_ARGUMENT` when called from a log callback.
///
/// # Safety
/// `stream` must point to a valid [`FDatasmithFacadeLogStream`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn FDatasmithFacade_DetachLogStream(
    stream: *const FDatasmithFacadeLogStream,
) -> FDatasmithFacadeStatus {
    if stream.is_null() {
        return fail(FACADE_STATUS_INVALID_ARGUMENT, "log stream is null");
    }
    if delivering() {
        return fail(FACADE_STATUS_INVALID_ARGUMENT, "cannot detach a log stream from a log callback");
    }
    let stream = unsafe { *stream };
    let mut streams = STREAMS.lock().unwrap_or_else(|e| e.into_inner());
    let position = streams.iter().position(|attached| {
        attached.0.user == stream.user
            && attached.0.callback.map(|f| f as usize) == stream.callback.map(|f| f as usize)
    });
    match position {
        Some(index) => {
            streams.remove(index);
            FACADE_STATUS_OK
        }
        None => fail(FACADE_STATUS_INVALID_ARGUMENT, "log stream is not attached"),
    }
}

/// Detach every attached log stream. Does nothing when called from a log callback.
#[unsafe(no_mangle)]
pub extern "C" fn FDatasmithFacade_DetachAllLogStreams() {
    if delivering() {
        return;
    }
    STREAMS.lock().unwrap_or_else(|e| e.into_inner()).clear();
}

/// Enable (non-zero) or disable (zero) debug-level messages.
#[unsafe(no_mangle)]
pub extern "C" fn FDatasmithFacade_EnableVerboseLogging(enable: i32) {
    VERBOSE.store(enable != 0, Ordering::Relaxed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;
    use std::sync::Mutex as StdMutex;

    extern "C" fn collect(message: *const c_char, user: *mut c_char) {
        let sink = unsafe { &*(user as *const StdMutex<Vec<String>>) };
        let text = unsafe { CStr::from_ptr(message) }.to_string_lossy().into_owned();
        sink.lock().unwrap().push(text);
    }

    #[test]
    fn test_attach_emit_detach() {
        let sink = Box::new(StdMutex::new(Vec::<String>::new()));
        let stream = FDatasmithFacadeLogStream {
            callback: Some(collect),
            user: &*sink as *const StdMutex<Vec<String>> as *mut c_char,
        };

        assert_eq!(unsafe { FDatasmithFacade_AttachLogStream(&stream) }, FACADE_STATUS_OK);
        emit(Severity::Warn, "log stream self-test");
        assert_eq!(unsafe { FDatasmithFacade_DetachLogStream(&stream) }, FACADE_STATUS_OK);
        emit(Severity::Warn, "log stream after detach");

        let messages = sink.lock().unwrap();
        assert!(messages.iter().any(|m| m == "Warn: log stream self-test\n"));
        assert!(!messages.iter().any(|m| m.contains("after detach")));
    }

    extern "C" fn reenter(_message: *const c_char, user: *mut c_char) {
        let outcome = unsafe { &*(user as *const StdMutex<Vec<i32>>) };
        // Would block on the stream list without the delivery guard.
        emit(Severity::Error, "nested message");
        let nested = FDatasmithFacadeLogStream {
            callback: Some(collect),
            user: std::ptr::null_mut(),
        };
        let status = unsafe { FDatasmithFacade_AttachLogStream(&nested) };
        outcome.lock().unwrap().push(status);
    }

    #[test]
    fn test_callback_may_reenter() {
        let outcome = Box::new(StdMutex::new(Vec::<i32>::new()));
        let stream = FDatasmithFacadeLogStream {
            callback: Some(reenter),
            user: &*outcome as *const StdMutex<Vec<i32>> as *mut c_char,
        };

        assert_eq!(unsafe { FDatasmithFacade_AttachLogStream(&stream) }, FACADE_STATUS_OK);
        emit(Severity::Warn, "reentrancy self-test");
        assert_eq!(unsafe { FDatasmithFacade_DetachLogStream(&stream) }, FACADE_STATUS_OK);

        let outcome = outcome.lock().unwrap();
        assert!(!outcome.is_empty());
        assert!(outcome.iter().all(|&status| status == FACADE_STATUS_INVALID_ARGUMENT));
        assert!(!delivering());
    }

    #[test]
    fn test_detach_unknown_stream_fails() {
        let stream = FDatasmithFacadeLogStream {
            callback: None,
            user: std::ptr::null_mut(),
        };
        assert_eq!(
            unsafe { FDatasmithFacade_DetachLogStream(&stream) },
            FACADE_STATUS_INVALID_ARGUMENT
        );
    }
}
