//! Common types and type aliases used throughout the facade
//!
//! Positions and directions use glam's `Vec3` as [`Vector3D`]. The helpers
//! below convert to and from the plain `#[repr(C)]` vector that crosses the
//! native boundary.

use crate::sys;

// Re-export glam types as our primary math types
pub use glam::Vec3 as Vector3D;

// Conversion functions between facade C types and glam types
// We use functions instead of From implementations to avoid orphan rule issues

/// Convert a native facade vector to glam Vec3
#[inline]
pub fn from_facade_vector(v: sys::FDatasmithFacadeVector) -> Vector3D {
    Vector3D::new(v.x, v.y, v.z)
}

/// Convert glam Vec3 to a native facade vector
#[inline]
pub fn to_facade_vector(v: Vector3D) -> sys::FDatasmithFacadeVector {
    sys::FDatasmithFacadeVector {
        x: v.x,
        y: v.y,
        z: v.z,
    }
}
