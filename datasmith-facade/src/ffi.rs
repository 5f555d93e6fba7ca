//! Internal FFI helpers.
//!
//! Strings cross the boundary as NUL-terminated UTF-16. Outgoing strings are
//! copied into a fresh buffer for the duration of one call; incoming strings
//! are copied by the native layer into a buffer we own, so no native buffer
//! is ever read directly.

use crate::{
    error::{Error, Result, check_status},
    sys,
};

/// Initial capacity for strings read back from the native layer.
const INITIAL_READ_CAPACITY: usize = 64;

/// Encode `value` as a NUL-terminated UTF-16 buffer.
///
/// Interior NULs would silently truncate the value on the native side, so
/// they are rejected.
pub(crate) fn to_wide(value: &str) -> Result<Vec<u16>> {
    if value.contains('\0') {
        return Err(Error::invalid_parameter(format!(
            "string contains an interior NUL: {value:?}"
        )));
    }
    Ok(value.encode_utf16().chain(std::iter::once(0)).collect())
}

/// Read a string through a native copy-out getter.
///
/// `getter(buffer, capacity, length)` copies at most `capacity - 1` units
/// and reports the full length. The buffer grows until the whole string
/// fits; the value may change between attempts, so this loops rather than
/// trusting one length query.
pub(crate) fn read_wide(
    mut getter: impl FnMut(*mut u16, usize, *mut usize) -> sys::FDatasmithFacadeStatus,
) -> Result<String> {
    let mut buffer = vec![0u16; INITIAL_READ_CAPACITY];
    loop {
        let mut length = 0usize;
        check_status(getter(buffer.as_mut_ptr(), buffer.len(), &mut length))?;
        if length < buffer.len() {
            buffer.truncate(length);
            return Ok(String::from_utf16(&buffer)?);
        }
        buffer.resize(length + 1, 0);
    }
}
