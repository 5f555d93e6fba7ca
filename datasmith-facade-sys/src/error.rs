//! Status codes and the thread-local last-error slot.

use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;

/// Result code returned by fallible facade calls.
pub type FDatasmithFacadeStatus = i32;

/// The call succeeded.
pub const FACADE_STATUS_OK: FDatasmithFacadeStatus = 0;
/// The element address is null or not a live element.
pub const FACADE_STATUS_INVALID_HANDLE: FDatasmithFacadeStatus = 1;
/// An argument was null or out of range.
pub const FACADE_STATUS_INVALID_ARGUMENT: FDatasmithFacadeStatus = 2;
/// The output buffer cannot hold even the terminator.
pub const FACADE_STATUS_BUFFER_TOO_SMALL: FDatasmithFacadeStatus = 3;

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Record `message` as this thread's last error and return `status`.
pub(crate) fn fail(status: FDatasmithFacadeStatus, message: &str) -> FDatasmithFacadeStatus {
    // Interior NULs cannot come from our own messages; strip them anyway.
    let message = CString::new(message.replace('\0', "")).unwrap_or_default();
    LAST_ERROR.with(|slot| *slot.borrow_mut() = Some(message));
    status
}

/// Get the message of the last failing call on the calling thread.
///
/// Returns null if no call has failed on this thread yet. The pointer stays
/// valid until the next failing call on the same thread.
#[unsafe(no_mangle)]
pub extern "C" fn FDatasmithFacade_GetLastError() -> *const c_char {
    LAST_ERROR.with(|slot| match slot.borrow().as_ref() {
        Some(message) => message.as_ptr(),
        None => std::ptr::null(),
    })
}
