//! NUL-terminated UTF-16 helpers shared by the native entry points.

/// Length in code units of a NUL-terminated UTF-16 string.
///
/// # Safety
/// `ptr` must be non-null and point to a NUL-terminated sequence of `u16`.
pub(crate) unsafe fn wide_len(ptr: *const u16) -> usize {
    let mut len = 0;
    // SAFETY: the caller guarantees a terminator exists, so every read up to
    // and including it is in bounds.
    while unsafe { *ptr.add(len) } != 0 {
        len += 1;
    }
    len
}

/// Copy a NUL-terminated UTF-16 string, keeping the terminator.
///
/// A null pointer is treated as the empty string.
///
/// # Safety
/// Same as [`wide_len`] when `ptr` is non-null.
pub(crate) unsafe fn wide_to_vec(ptr: *const u16) -> Vec<u16> {
    if ptr.is_null() {
        return vec![0];
    }
    let len = unsafe { wide_len(ptr) };
    let mut buffer = Vec::with_capacity(len + 1);
    buffer.extend_from_slice(unsafe { std::slice::from_raw_parts(ptr, len) });
    buffer.push(0);
    buffer
}

/// Lossy UTF-8 rendering used for log messages.
pub(crate) fn wide_display(buffer: &[u16]) -> String {
    let end = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
    String::from_utf16_lossy(&buffer[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_to_vec_keeps_terminator() {
        let source: Vec<u16> = "Chair".encode_utf16().chain(Some(0)).collect();
        let copy = unsafe { wide_to_vec(source.as_ptr()) };
        assert_eq!(copy, source);
        assert_eq!(unsafe { wide_len(copy.as_ptr()) }, 5);
    }

    #[test]
    fn test_null_is_empty() {
        let copy = unsafe { wide_to_vec(std::ptr::null()) };
        assert_eq!(copy, vec![0]);
        assert_eq!(wide_display(&copy), "");
    }
}
