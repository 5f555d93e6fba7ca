//! Error handling for facade operations

use std::ffi::CStr;
use thiserror::Error;

use crate::sys;

/// Result type alias for facade operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when calling into the facade
#[derive(Error, Debug)]
pub enum Error {
    /// The handle no longer refers to a native element
    #[error("Invalid handle: the native element has already been released")]
    InvalidHandle,

    /// A native call reported a failure; status and message are passed through unchanged
    #[error("Native call failed with status {status}: {message}")]
    Native {
        /// Raw native status code
        status: i32,
        /// Native last-error message
        message: String,
    },

    /// Invalid parameters or configuration
    #[error("Invalid parameter: {message}")]
    InvalidParameter {
        /// Description of the rejected value
        message: String,
    },

    /// A native string was not valid UTF-16
    #[error("String conversion error: {0}")]
    StringConversion(#[from] std::string::FromUtf16Error),

    /// Null pointer error
    #[error("Null pointer encountered")]
    NullPointer,

    /// Generic error with custom message
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

impl Error {
    /// Create a new invalid parameter error
    pub fn invalid_parameter<S: Into<String>>(message: S) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(message: S) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Build an error from a native status, reading the calling thread's
    /// native last-error message
    pub fn from_native(status: i32) -> Self {
        let error_ptr = sys::FDatasmithFacade_GetLastError();
        let message = if error_ptr.is_null() {
            "Unknown native error".to_string()
        } else {
            // SAFETY: the native layer keeps the message alive until the next
            // failing call on this thread.
            unsafe { CStr::from_ptr(error_ptr) }
                .to_string_lossy()
                .into_owned()
        };
        Self::Native { status, message }
    }

    /// Returns `true` for [`Error::InvalidHandle`]
    pub fn is_invalid_handle(&self) -> bool {
        matches!(self, Self::InvalidHandle)
    }
}

/// Turn a native status code into a `Result`
pub(crate) fn check_status(status: sys::FDatasmithFacadeStatus) -> Result<()> {
    if status == sys::FACADE_STATUS_OK {
        Ok(())
    } else {
        Err(Error::from_native(status))
    }
}
