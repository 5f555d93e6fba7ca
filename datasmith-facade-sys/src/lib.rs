//! Low-level C ABI for the Datasmith facade element layer
//!
//! This crate is the native side of the facade: every function is an
//! unmangled `extern "C"` symbol operating on opaque element addresses and
//! NUL-terminated UTF-16 strings, so it can be consumed from any language
//! with a C FFI. For safe, idiomatic Rust bindings, use the
//! `datasmith-facade` crate instead.
//!
//! Conventions:
//! - Fallible calls return an [`FDatasmithFacadeStatus`] (or a null pointer)
//!   and record a message readable with [`FDatasmithFacade_GetLastError`].
//! - Element addresses are validated against a live registry before use,
//!   so a stale or foreign address is reported instead of dereferenced.
//! - Global settings (coordinate system, unit scale) are process-wide.

#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]

mod coordinates;
mod element;
mod error;
mod hash;
mod log;
mod wide;

pub use crate::coordinates::*;
pub use crate::element::*;
pub use crate::error::*;
pub use crate::hash::*;
pub use crate::log::*;

/// Version information for this crate
pub const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Major version of the facade C ABI
#[unsafe(no_mangle)]
pub extern "C" fn FDatasmithFacade_GetVersionMajor() -> u32 {
    1
}

/// Minor version of the facade C ABI
#[unsafe(no_mangle)]
pub extern "C" fn FDatasmithFacade_GetVersionMinor() -> u32 {
    0
}

/// Revision of the facade C ABI
#[unsafe(no_mangle)]
pub extern "C" fn FDatasmithFacade_GetVersionRevision() -> u32 {
    0
}

// Include tests
mod test;

// Include type extensions (optional convenience implementations)
#[cfg(feature = "type-extensions")]
pub mod types;
