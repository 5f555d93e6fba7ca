//! Facade elements and their ownership.
//!
//! An [`Element`] is the Rust-side proxy for one native element. It is in
//! exactly one of three states:
//!
//! - **owned**: the proxy destroys the native element when released or dropped,
//! - **borrowed**: the proxy refers to an element someone else destroys,
//! - **released**: the handle has been cleared; the proxy is an inert shell.
//!
//! Every transition happens under a per-proxy lock, so an explicit
//! [`Element::release`] racing with the final drop of a shared proxy still
//! issues at most one native destroy call. Calls that need a live element
//! fail with [`Error::InvalidHandle`] once the proxy is released.
//!
//! A [`RawElement`] handle carries the element's creation id next to its
//! address. A borrowed proxy that outlives its element therefore fails with
//! a native invalid-handle error, even if a new element has since been
//! allocated at the same address.
//!
//! ```rust,no_run
//! use datasmith_facade::Element;
//!
//! # fn main() -> datasmith_facade::Result<()> {
//! let chair = Element::new("Chair_01")?;
//! chair.set_label("Office chair")?;
//! assert_eq!(chair.label()?, "Office chair");
//!
//! assert!(chair.release());
//! assert!(chair.name().is_err());
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{
    error::{Error, Result, check_status},
    ffi::{read_wide, to_wide},
    sys,
};

/// Raw native element handle: address plus creation id.
pub type RawElement = sys::FDatasmithFacadeElementHandle;

/// The null handle returned for a missing or released element.
pub const NULL_ELEMENT: RawElement = sys::FACADE_NULL_ELEMENT_HANDLE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Owned(RawElement),
    Borrowed(RawElement),
    Released,
}

impl Slot {
    fn handle(self) -> Option<RawElement> {
        match self {
            Slot::Owned(handle) | Slot::Borrowed(handle) => Some(handle),
            Slot::Released => None,
        }
    }
}

/// A named scene element backed by a native facade element
pub struct Element {
    slot: Mutex<Slot>,
}

// Send and Sync are safe because the handle is only used under the slot
// lock, and the native layer validates every handle it is handed.
unsafe impl Send for Element {}
unsafe impl Sync for Element {}

impl Element {
    /// Create a new owned element with the given name
    pub fn new(name: &str) -> Result<Self> {
        let wide_name = to_wide(name)?;
        let handle = unsafe { sys::new_FDatasmithFacadeElement(wide_name.as_ptr()) };
        if handle.element.is_null() {
            return Err(Error::NullPointer);
        }
        tracing::trace!(address = ?handle.element, id = handle.id, element_name = name, "created facade element");
        Ok(Self::with_slot(Slot::Owned(handle)))
    }

    /// Create a new owned element with a name and a display label
    pub fn with_label(name: &str, label: &str) -> Result<Self> {
        let element = Self::new(name)?;
        element.set_label(label)?;
        Ok(element)
    }

    /// Wrap an existing native element handle
    ///
    /// No native call is made. A null handle yields an already-released proxy.
    ///
    /// # Safety
    ///
    /// The caller must ensure that:
    /// - `handle` is null or was returned by the native layer
    /// - if `owns` is true, no other proxy or native owner will destroy it
    pub unsafe fn from_raw(handle: RawElement, owns: bool) -> Self {
        let slot = if handle.element.is_null() {
            Slot::Released
        } else if owns {
            Slot::Owned(handle)
        } else {
            Slot::Borrowed(handle)
        };
        Self::with_slot(slot)
    }

    fn with_slot(slot: Slot) -> Self {
        Self {
            slot: Mutex::new(slot),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        // The slot is a plain value; a panic while holding the lock cannot
        // leave it half-updated.
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with the live native handle while holding the slot lock
    fn with_live<R>(&self, f: impl FnOnce(RawElement) -> Result<R>) -> Result<R> {
        let slot = self.lock();
        let handle = slot.handle().ok_or(Error::InvalidHandle)?;
        f(handle)
    }

    /// Get the raw native handle, or [`NULL_ELEMENT`] once released
    pub fn as_raw(&self) -> RawElement {
        self.lock().handle().unwrap_or(NULL_ELEMENT)
    }

    /// Returns `true` if this proxy will destroy the native element
    pub fn is_owned(&self) -> bool {
        matches!(*self.lock(), Slot::Owned(_))
    }

    /// Returns `true` once the proxy no longer refers to any native element
    pub fn is_released(&self) -> bool {
        matches!(*self.lock(), Slot::Released)
    }

    /// Release the native element
    ///
    /// An owned element is destroyed with exactly one native call; a borrowed
    /// one is only forgotten. Either way the handle is cleared afterwards.
    /// Calling this again is a no-op. Returns `true` if this call issued the
    /// native destroy.
    ///
    /// Native destroy failures are logged and otherwise ignored so release
    /// stays idempotent.
    pub fn release(&self) -> bool {
        let mut slot = self.lock();
        match std::mem::replace(&mut *slot, Slot::Released) {
            Slot::Owned(handle) => {
                let status = unsafe { sys::delete_FDatasmithFacadeElement(handle) };
                if let Err(error) = check_status(status) {
                    tracing::warn!(address = ?handle.element, id = handle.id, %error, "native destroy of facade element failed");
                } else {
                    tracing::trace!(address = ?handle.element, id = handle.id, "destroyed facade element");
                }
                true
            }
            Slot::Borrowed(handle) => {
                tracing::trace!(address = ?handle.element, id = handle.id, "forgot borrowed facade element");
                false
            }
            Slot::Released => false,
        }
    }

    /// Give up ownership of the native element and return its handle
    ///
    /// The proxy keeps referring to the same element but will no longer
    /// destroy it; whoever receives the handle takes over that duty.
    pub fn disown(&self) -> Result<RawElement> {
        let mut slot = self.lock();
        let handle = slot.handle().ok_or(Error::InvalidHandle)?;
        *slot = Slot::Borrowed(handle);
        Ok(handle)
    }

    /// Consume the proxy and return the native handle without destroying it
    ///
    /// Returns [`NULL_ELEMENT`] if the proxy was already released.
    pub fn into_raw(self) -> RawElement {
        // `self` is dropped as a borrowed proxy, which only clears the slot.
        self.disown().unwrap_or(NULL_ELEMENT)
    }

    /// Set the element name
    pub fn set_name(&self, name: &str) -> Result<()> {
        let wide_name = to_wide(name)?;
        self.with_live(|handle| {
            check_status(unsafe { sys::FDatasmithFacadeElement_SetName(handle, wide_name.as_ptr()) })
        })
    }

    /// Get the element name
    pub fn name(&self) -> Result<String> {
        self.with_live(|handle| {
            read_wide(|buffer, size, length| unsafe {
                sys::FDatasmithFacadeElement_GetName(handle, buffer, size, length)
            })
        })
    }

    /// Set the element label (the user-facing display name)
    pub fn set_label(&self, label: &str) -> Result<()> {
        let wide_label = to_wide(label)?;
        self.with_live(|handle| {
            check_status(unsafe { sys::FDatasmithFacadeElement_SetLabel(handle, wide_label.as_ptr()) })
        })
    }

    /// Get the element label, or the name when no label has been set
    pub fn label(&self) -> Result<String> {
        self.with_live(|handle| {
            read_wide(|buffer, size, length| unsafe {
                sys::FDatasmithFacadeElement_GetLabel(handle, buffer, size, length)
            })
        })
    }
}

impl Drop for Element {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = *self.lock();
        let state = match slot {
            Slot::Owned(_) => "owned",
            Slot::Borrowed(_) => "borrowed",
            Slot::Released => "released",
        };
        let handle = slot.handle().unwrap_or(NULL_ELEMENT);
        f.debug_struct("Element")
            .field("address", &handle.element)
            .field("id", &handle.id)
            .field("state", &state)
            .finish()
    }
}

/// Get the native handle of `element`, or [`NULL_ELEMENT`] for `None`
///
/// Never fails; a released element also yields the null handle.
pub fn address_or_null(element: Option<&Element>) -> RawElement {
    element.map_or(NULL_ELEMENT, Element::as_raw)
}

/// Take the handle of `element` for a call that assumes ownership of it
///
/// The proxy stops owning the element. `None` or a released element yields
/// the null handle.
pub fn address_and_disown(element: Option<&Element>) -> RawElement {
    element
        .and_then(|element| element.disown().ok())
        .unwrap_or(NULL_ELEMENT)
}

/// Number of native elements created and not yet destroyed, process-wide
pub fn live_element_count() -> usize {
    sys::FDatasmithFacade_LiveElementCount()
}

/// Number of native destroy calls rejected because the handle was not live
///
/// A correct program never increments this: it counts would-be double frees.
pub fn rejected_destroy_count() -> u64 {
    sys::FDatasmithFacade_RejectedDestroyCount()
}

/// Returns `true` if `handle` refers to a live native element
pub fn is_live(handle: RawElement) -> bool {
    sys::FDatasmithFacadeElement_IsValid(handle)
}
