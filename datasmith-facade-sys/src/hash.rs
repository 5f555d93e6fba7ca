//! Content hashing of element names.

use md5::{Digest, Md5};

use crate::error::{
    FACADE_STATUS_BUFFER_TOO_SMALL, FACADE_STATUS_INVALID_ARGUMENT, FACADE_STATUS_OK, FDatasmithFacadeStatus,
    fail,
};
use crate::wide::wide_len;

/// Number of characters in a string hash, excluding the terminator.
pub const FACADE_STRING_HASH_LENGTH: usize = 32;

/// MD5 of the ANSI form of a UTF-16 string, as lowercase hex.
///
/// Code units outside ASCII are narrowed to `?` before hashing.
pub(crate) fn ansi_md5_hex(input: &[u16]) -> String {
    let ansi: Vec<u8> = input
        .iter()
        .map(|&unit| if unit < 0x80 { unit as u8 } else { b'?' })
        .collect();
    hex::encode(Md5::digest(&ansi))
}

/// Hash `input` into `out_buffer`.
///
/// Copies at most `buffer_size - 1` characters of the 32-character digest and
/// always writes a terminating NUL, like `strncpy`. Pass a buffer of
/// `FACADE_STRING_HASH_LENGTH + 1` units to receive the whole digest.
///
/// # Safety
/// `input` must point to a NUL-terminated UTF-16 string and `out_buffer` must
/// be valid for `buffer_size` writes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn FDatasmithFacadeElement_InternalGetStringHash(
    input: *const u16,
    out_buffer: *mut u16,
    buffer_size: usize,
) -> FDatasmithFacadeStatus {
    if input.is_null() || out_buffer.is_null() {
        return fail(FACADE_STATUS_INVALID_ARGUMENT, "string hash input or output is null");
    }
    if buffer_size == 0 {
        return fail(FACADE_STATUS_BUFFER_TOO_SMALL, "string hash buffer has no room");
    }

    let input = unsafe { std::slice::from_raw_parts(input, wide_len(input)) };
    let digest = ansi_md5_hex(input);
    let out = unsafe { std::slice::from_raw_parts_mut(out_buffer, buffer_size) };

    let copied = digest.len().min(buffer_size - 1);
    for (slot, byte) in out.iter_mut().zip(digest.bytes().take(copied)) {
        *slot = u16::from(byte);
    }
    out[copied] = 0;
    FACADE_STATUS_OK
}
