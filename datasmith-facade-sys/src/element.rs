//! Native facade elements and the live-element registry.
//!
//! Elements are addressed through an [`FDatasmithFacadeElementHandle`]: the
//! element's address plus the id it was given at creation. Ids are never
//! reused, so a handle to a destroyed element stays invalid even after the
//! allocator hands its address to a new element.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{LazyLock, Mutex, MutexGuard};

use crate::error::{
    FACADE_STATUS_INVALID_HANDLE, FACADE_STATUS_OK, FDatasmithFacadeStatus, fail,
};
use crate::log::{Severity, emit};
use crate::wide::{wide_display, wide_to_vec};

/// A named scene element.
///
/// Opaque to callers; only ever handled through the handle returned by
/// [`new_FDatasmithFacadeElement`].
#[derive(Debug)]
pub struct FDatasmithFacadeElement {
    // Both buffers always end with a NUL code unit.
    name: Vec<u16>,
    label: Vec<u16>,
}

/// Address and creation id of an element, passed by value.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FDatasmithFacadeElementHandle {
    /// Element address, null for the null handle
    pub element: *mut FDatasmithFacadeElement,
    /// Creation id; `0` is never assigned
    pub id: u64,
}

/// The null handle: no element.
pub const FACADE_NULL_ELEMENT_HANDLE: FDatasmithFacadeElementHandle = FDatasmithFacadeElementHandle {
    element: std::ptr::null_mut(),
    id: 0,
};

// Live elements by address, with the id each was created with.
static REGISTRY: LazyLock<Mutex<HashMap<usize, u64>>> = LazyLock::new(|| Mutex::new(HashMap::new()));
static NEXT_ID: AtomicU64 = AtomicU64::new(1);
static REJECTED_DESTROYS: AtomicU64 = AtomicU64::new(0);

fn registry() -> MutexGuard<'static, HashMap<usize, u64>> {
    REGISTRY.lock().unwrap_or_else(|e| e.into_inner())
}

fn is_registered(live: &HashMap<usize, u64>, handle: FDatasmithFacadeElementHandle) -> bool {
    !handle.element.is_null() && live.get(&(handle.element as usize)) == Some(&handle.id)
}

fn not_live(handle: FDatasmithFacadeElementHandle) -> FDatasmithFacadeStatus {
    fail(
        FACADE_STATUS_INVALID_HANDLE,
        &format!("{:p}#{} is not a live facade element", handle.element, handle.id),
    )
}

/// Run `f` on a live element while the registry is locked, so it can be
/// neither destroyed nor mutated through another handle concurrently.
fn with_live<R>(
    handle: FDatasmithFacadeElementHandle,
    f: impl FnOnce(&mut FDatasmithFacadeElement) -> R,
) -> Result<R, FDatasmithFacadeStatus> {
    let live = registry();
    if !is_registered(&live, handle) {
        return Err(not_live(handle));
    }
    // SAFETY: the address is registered under this id, so it came from
    // `Box::into_raw` and has not been freed; the registry lock serialises access.
    Ok(f(unsafe { &mut *handle.element }))
}

/// Copy a NUL-terminated buffer out strncpy-style and report its length.
///
/// # Safety
/// `out_buffer` must be null or valid for `buffer_size` writes; `out_length`
/// must be null or valid for one write.
unsafe fn copy_out(source: &[u16], out_buffer: *mut u16, buffer_size: usize, out_length: *mut usize) {
    let length = source.len().saturating_sub(1);
    if !out_length.is_null() {
        unsafe { *out_length = length };
    }
    if out_buffer.is_null() || buffer_size == 0 {
        return;
    }
    let out = unsafe { std::slice::from_raw_parts_mut(out_buffer, buffer_size) };
    let copied = length.min(buffer_size - 1);
    out[..copied].copy_from_slice(&source[..copied]);
    out[copied] = 0;
}

/// Create an element. A null `name` creates an element with an empty name.
///
/// The returned handle must be released with [`delete_FDatasmithFacadeElement`].
///
/// # Safety
/// `name` must be null or point to a NUL-terminated UTF-16 string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn new_FDatasmithFacadeElement(name: *const u16) -> FDatasmithFacadeElementHandle {
    let element = Box::new(FDatasmithFacadeElement {
        name: unsafe { wide_to_vec(name) },
        label: vec![0],
    });
    let display = wide_display(&element.name);
    let handle = FDatasmithFacadeElementHandle {
        element: Box::into_raw(element),
        id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
    };
    registry().insert(handle.element as usize, handle.id);
    emit(
        Severity::Debug,
        &format!("created element {:p}#{} '{display}'", handle.element, handle.id),
    );
    handle
}

/// Destroy an element.
///
/// A handle that is not live (never created, already destroyed, or carrying
/// the id of an earlier element at the same address) is rejected without
/// being touched: the call logs a warning, bumps
/// [`FDatasmithFacade_RejectedDestroyCount`] and returns
/// `FACADE_STATUS_INVALID_HANDLE`.
///
/// # Safety
/// `handle` may hold any value; only live elements are freed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn delete_FDatasmithFacadeElement(
    handle: FDatasmithFacadeElementHandle,
) -> FDatasmithFacadeStatus {
    let removed = {
        let mut live = registry();
        is_registered(&live, handle) && live.remove(&(handle.element as usize)).is_some()
    };
    if !removed {
        REJECTED_DESTROYS.fetch_add(1, Ordering::SeqCst);
        emit(
            Severity::Warn,
            &format!("rejected destroy of unknown element {:p}#{}", handle.element, handle.id),
        );
        return not_live(handle);
    }
    // SAFETY: the address was registered and has just been unregistered, so
    // this is the only place it is freed.
    drop(unsafe { Box::from_raw(handle.element) });
    emit(
        Severity::Debug,
        &format!("destroyed element {:p}#{}", handle.element, handle.id),
    );
    FACADE_STATUS_OK
}

/// Set the element name.
///
/// # Safety
/// `name` must be null (empty name) or point to a NUL-terminated UTF-16 string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn FDatasmithFacadeElement_SetName(
    handle: FDatasmithFacadeElementHandle,
    name: *const u16,
) -> FDatasmithFacadeStatus {
    let name = unsafe { wide_to_vec(name) };
    match with_live(handle, |e| e.name = name) {
        Ok(()) => FACADE_STATUS_OK,
        Err(status) => status,
    }
}

/// Copy the element name into `out_buffer`.
///
/// The name length in code units, excluding the terminator, is written to
/// `out_length`. At most `buffer_size - 1` units are copied and the result is
/// always NUL-terminated, like `strncpy`; pass a null buffer to query the
/// length only. The copy is made while the element is locked.
///
/// # Safety
/// `out_buffer` must be null or valid for `buffer_size` writes; `out_length`
/// must be null or valid for one write.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn FDatasmithFacadeElement_GetName(
    handle: FDatasmithFacadeElementHandle,
    out_buffer: *mut u16,
    buffer_size: usize,
    out_length: *mut usize,
) -> FDatasmithFacadeStatus {
    match with_live(handle, |e| unsafe { copy_out(&e.name, out_buffer, buffer_size, out_length) }) {
        Ok(()) => FACADE_STATUS_OK,
        Err(status) => status,
    }
}

/// Set the element label (the user-facing display name).
///
/// # Safety
/// `label` must be null (clears the label) or point to a NUL-terminated UTF-16 string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn FDatasmithFacadeElement_SetLabel(
    handle: FDatasmithFacadeElementHandle,
    label: *const u16,
) -> FDatasmithFacadeStatus {
    let label = unsafe { wide_to_vec(label) };
    match with_live(handle, |e| e.label = label) {
        Ok(()) => FACADE_STATUS_OK,
        Err(status) => status,
    }
}

/// Copy the element label, or the name when no label is set.
///
/// Same buffer contract as [`FDatasmithFacadeElement_GetName`].
///
/// # Safety
/// See [`FDatasmithFacadeElement_GetName`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn FDatasmithFacadeElement_GetLabel(
    handle: FDatasmithFacadeElementHandle,
    out_buffer: *mut u16,
    buffer_size: usize,
    out_length: *mut usize,
) -> FDatasmithFacadeStatus {
    let result = with_live(handle, |e| {
        let source = if e.label.len() <= 1 { &e.name } else { &e.label };
        unsafe { copy_out(source, out_buffer, buffer_size, out_length) }
    });
    match result {
        Ok(()) => FACADE_STATUS_OK,
        Err(status) => status,
    }
}

/// Returns `true` if `handle` refers to a live element.
#[unsafe(no_mangle)]
pub extern "C" fn FDatasmithFacadeElement_IsValid(handle: FDatasmithFacadeElementHandle) -> bool {
    is_registered(&registry(), handle)
}

/// Number of elements created and not yet destroyed.
#[unsafe(no_mangle)]
pub extern "C" fn FDatasmithFacade_LiveElementCount() -> usize {
    registry().len()
}

/// Number of destroy calls rejected because the handle was not live.
#[unsafe(no_mangle)]
pub extern "C" fn FDatasmithFacade_RejectedDestroyCount() -> u64 {
    REJECTED_DESTROYS.load(Ordering::SeqCst)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wide(text: &str) -> Vec<u16> {
        text.encode_utf16().chain(Some(0)).collect()
    }

    fn read(
        getter: unsafe extern "C" fn(FDatasmithFacadeElementHandle, *mut u16, usize, *mut usize) -> FDatasmithFacadeStatus,
        handle: FDatasmithFacadeElementHandle,
    ) -> String {
        let mut out = [0u16; 64];
        let mut length = 0;
        let status = unsafe { getter(handle, out.as_mut_ptr(), out.len(), &mut length) };
        assert_eq!(status, FACADE_STATUS_OK);
        String::from_utf16(&out[..length]).unwrap()
    }

    #[test]
    fn test_name_and_label() {
        let handle = unsafe { new_FDatasmithFacadeElement(wide("Wall_01").as_ptr()) };
        assert!(FDatasmithFacadeElement_IsValid(handle));
        assert_ne!(handle.id, 0);
        assert_eq!(read(FDatasmithFacadeElement_GetName, handle), "Wall_01");
        // No label yet: falls back to the name.
        assert_eq!(read(FDatasmithFacadeElement_GetLabel, handle), "Wall_01");

        let status = unsafe { FDatasmithFacadeElement_SetLabel(handle, wide("Wall (north)").as_ptr()) };
        assert_eq!(status, FACADE_STATUS_OK);
        assert_eq!(read(FDatasmithFacadeElement_GetLabel, handle), "Wall (north)");

        assert_eq!(unsafe { delete_FDatasmithFacadeElement(handle) }, FACADE_STATUS_OK);
    }

    #[test]
    fn test_getter_truncates_and_reports_length() {
        let handle = unsafe { new_FDatasmithFacadeElement(wide("Curtain wall").as_ptr()) };

        let mut length = 0;
        let status = unsafe {
            FDatasmithFacadeElement_GetName(handle, std::ptr::null_mut(), 0, &mut length)
        };
        assert_eq!(status, FACADE_STATUS_OK);
        assert_eq!(length, 12);

        let mut out = [0xffffu16; 5];
        let status = unsafe {
            FDatasmithFacadeElement_GetName(handle, out.as_mut_ptr(), out.len(), &mut length)
        };
        assert_eq!(status, FACADE_STATUS_OK);
        assert_eq!(length, 12);
        assert_eq!(String::from_utf16(&out[..4]).unwrap(), "Curt");
        assert_eq!(out[4], 0);

        assert_eq!(unsafe { delete_FDatasmithFacadeElement(handle) }, FACADE_STATUS_OK);
    }

    #[test]
    fn test_stale_id_at_live_address_is_rejected() {
        let handle = unsafe { new_FDatasmithFacadeElement(wide("Door").as_ptr()) };
        // Same address, id of some other (earlier or later) element.
        let stale = FDatasmithFacadeElementHandle {
            element: handle.element,
            id: handle.id + 1_000_000,
        };

        assert!(!FDatasmithFacadeElement_IsValid(stale));
        let mut length = 0;
        let status = unsafe {
            FDatasmithFacadeElement_GetName(stale, std::ptr::null_mut(), 0, &mut length)
        };
        assert_eq!(status, FACADE_STATUS_INVALID_HANDLE);
        let status = unsafe { FDatasmithFacadeElement_SetName(stale, wide("x").as_ptr()) };
        assert_eq!(status, FACADE_STATUS_INVALID_HANDLE);

        let before = FDatasmithFacade_RejectedDestroyCount();
        assert_eq!(unsafe { delete_FDatasmithFacadeElement(stale) }, FACADE_STATUS_INVALID_HANDLE);
        assert!(FDatasmithFacade_RejectedDestroyCount() > before);

        // The live element was left alone.
        assert_eq!(read(FDatasmithFacadeElement_GetName, handle), "Door");
        assert_eq!(unsafe { delete_FDatasmithFacadeElement(handle) }, FACADE_STATUS_OK);
        assert!(!FDatasmithFacadeElement_IsValid(handle));
    }

    // Freed addresses may be reused by allocations in parallel tests, so
    // "dead" elements are simulated with an address that was never boxed.
    #[test]
    fn test_calls_on_foreign_address_fail() {
        let mut slot = 0u64;
        let foreign = FDatasmithFacadeElementHandle {
            element: &mut slot as *mut u64 as *mut FDatasmithFacadeElement,
            id: 1,
        };

        let mut out = [0u16; 4];
        let status = unsafe {
            FDatasmithFacadeElement_GetName(foreign, out.as_mut_ptr(), out.len(), std::ptr::null_mut())
        };
        assert_eq!(status, FACADE_STATUS_INVALID_HANDLE);
        let status = unsafe { FDatasmithFacadeElement_SetName(foreign, wide("x").as_ptr()) };
        assert_eq!(status, FACADE_STATUS_INVALID_HANDLE);
        assert_eq!(slot, 0);
    }

    #[test]
    fn test_destroy_of_foreign_address_is_rejected() {
        let mut slot = 0u64;
        let foreign = FDatasmithFacadeElementHandle {
            element: &mut slot as *mut u64 as *mut FDatasmithFacadeElement,
            id: 1,
        };

        let before = FDatasmithFacade_RejectedDestroyCount();
        let status = unsafe { delete_FDatasmithFacadeElement(foreign) };
        assert_eq!(status, FACADE_STATUS_INVALID_HANDLE);
        assert!(FDatasmithFacade_RejectedDestroyCount() > before);
        assert_eq!(slot, 0);
    }

    #[test]
    fn test_unnamed_element() {
        let handle = unsafe { new_FDatasmithFacadeElement(std::ptr::null()) };
        assert_eq!(read(FDatasmithFacadeElement_GetName, handle), "");
        assert_eq!(unsafe { delete_FDatasmithFacadeElement(handle) }, FACADE_STATUS_OK);
    }

    #[test]
    fn test_null_is_never_live() {
        assert!(!FDatasmithFacadeElement_IsValid(FACADE_NULL_ELEMENT_HANDLE));
        let status = unsafe {
            FDatasmithFacadeElement_GetLabel(
                FACADE_NULL_ELEMENT_HANDLE,
                std::ptr::null_mut(),
                0,
                std::ptr::null_mut(),
            )
        };
        assert_eq!(status, FACADE_STATUS_INVALID_HANDLE);
    }
}
