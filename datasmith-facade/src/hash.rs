//! Deterministic string hashing
//!
//! Used to derive stable element names from arbitrary source identifiers.

use crate::{
    error::{Result, check_status},
    ffi::to_wide,
    sys,
};

/// Length of a string hash in characters
pub const STRING_HASH_LENGTH: usize = sys::FACADE_STRING_HASH_LENGTH;

/// Hash `input` into a 32-character lowercase hexadecimal digest
///
/// The digest is computed by the native layer and depends only on the
/// input; characters outside ASCII are narrowed to `?` first, as the native
/// exporter does.
///
/// ```rust,no_run
/// use datasmith_facade::get_string_hash;
///
/// # fn main() -> datasmith_facade::Result<()> {
/// let hash = get_string_hash("Layer 01/Wall")?;
/// assert_eq!(hash.len(), 32);
/// # Ok(())
/// # }
/// ```
pub fn get_string_hash(input: &str) -> Result<String> {
    let wide_input = to_wide(input)?;
    let mut buffer = [0u16; STRING_HASH_LENGTH + 1];
    check_status(unsafe {
        sys::FDatasmithFacadeElement_InternalGetStringHash(
            wide_input.as_ptr(),
            buffer.as_mut_ptr(),
            buffer.len(),
        )
    })?;
    Ok(String::from_utf16(&buffer[..STRING_HASH_LENGTH])?)
}
