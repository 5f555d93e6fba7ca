//! # Datasmith Facade
//!
//! Safe Rust bindings for the Datasmith facade element layer.
//!
//! Exporters build a scene out of named [`Element`]s and bring geometry from
//! the source application's axis convention into Unreal's left-handed, Z-up
//! frame. This crate wraps the native facade with:
//!
//! - **Handle proxies** that destroy their native element exactly once, even
//!   when an explicit release races with the final drop
//! - **Explicit export settings** through [`ExportContext`], alongside the
//!   process-wide settings in [`global`]
//! - **Stable string hashes** for deriving element names
//! - **Log streams** capturing native diagnostics, with a `tracing` bridge
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use datasmith_facade::{
//!     CoordinateSystemType, ExportContext, ExportSettings, get_string_hash, types::Vector3D,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let context = ExportContext::new(
//!     ExportSettings::new()
//!         .with_coordinate_system(CoordinateSystemType::LeftHandedYup)
//!         .with_world_unit_scale(100.0)?,
//! );
//!
//! let wall = context.create_element(&get_string_hash("Level 1/Wall 12")?)?;
//! wall.set_label("Wall 12")?;
//!
//! let origin = context.convert_position(Vector3D::new(1.0, 2.0, 3.0));
//! println!("{} at {origin}", wall.label()?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! This crate is built on top of `datasmith-facade-sys`, which exposes the
//! facade's C ABI. Enable the `raw-sys` feature to reach it as
//! `datasmith_facade::sys`.

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

#[cfg(feature = "raw-sys")]
pub use datasmith_facade_sys as sys;
#[cfg(not(feature = "raw-sys"))]
use datasmith_facade_sys as sys;

// Re-export common types for convenience
pub use crate::{
    context::{ExportContext, ExportSettings},
    coordinates::{CoordinateSystemType, SMALL_NUMBER, WorldUnitScale},
    element::Element,
    error::{Error, Result},
    hash::{STRING_HASH_LENGTH, get_string_hash},
};

// Re-export logging functionality
pub use crate::logging::{LogLevel, LogStream, Logger};

// Core modules
pub mod element;
pub mod error;
pub mod types;

// Export configuration
pub mod context;
pub mod coordinates;
pub mod global;

// Utility modules
pub mod hash;
pub mod logging;

mod ffi;

/// Version information
pub mod version {
    /// Version of this crate
    pub const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");

    /// Version of the facade C ABI
    pub fn facade_version() -> String {
        format!(
            "{}.{}.{}",
            facade_version_major(),
            facade_version_minor(),
            facade_version_revision()
        )
    }

    /// Major version of the facade C ABI
    pub fn facade_version_major() -> u32 {
        crate::sys::FDatasmithFacade_GetVersionMajor()
    }

    /// Minor version of the facade C ABI
    pub fn facade_version_minor() -> u32 {
        crate::sys::FDatasmithFacade_GetVersionMinor()
    }

    /// Revision of the facade C ABI
    pub fn facade_version_revision() -> u32 {
        crate::sys::FDatasmithFacade_GetVersionRevision()
    }
}
