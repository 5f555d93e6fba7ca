//! Process-wide coordinate system and unit scale.
//!
//! Converted output is always Unreal's left-handed Z-up frame. The active
//! mode and scale are stored atomically so readers never observe a torn
//! value; the last write wins.

use std::sync::atomic::{AtomicI32, AtomicU32, Ordering};

use crate::error::{FACADE_STATUS_INVALID_ARGUMENT, FACADE_STATUS_OK, FDatasmithFacadeStatus, fail};
use crate::log::{Severity, emit};

/// Source coordinate system identifier.
pub type FDatasmithFacadeCoordinateSystemType = i32;

/// Left-handed, Y axis up.
pub const FDatasmithFacadeCoordinateSystemType_LeftHandedYup: FDatasmithFacadeCoordinateSystemType = 0;
/// Left-handed, Z axis up (Unreal's own frame).
pub const FDatasmithFacadeCoordinateSystemType_LeftHandedZup: FDatasmithFacadeCoordinateSystemType = 1;
/// Right-handed, Z axis up.
pub const FDatasmithFacadeCoordinateSystemType_RightHandedZup: FDatasmithFacadeCoordinateSystemType = 2;

/// Replacement for a world unit scale that is nearly zero.
pub const FACADE_SMALL_NUMBER: f32 = 1.0e-8;

/// A three-component vector passed by value across the boundary.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FDatasmithFacadeVector {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

static COORDINATE_SYSTEM: AtomicI32 = AtomicI32::new(FDatasmithFacadeCoordinateSystemType_LeftHandedZup);
// Bit pattern of 1.0f32.
static WORLD_UNIT_SCALE: AtomicU32 = AtomicU32::new(0x3f80_0000);

/// Select the coordinate system of all subsequently converted values.
#[unsafe(no_mangle)]
pub extern "C" fn FDatasmithFacadeElement_SetCoordinateSystemType(
    coordinate_system: FDatasmithFacadeCoordinateSystemType,
) -> FDatasmithFacadeStatus {
    let name = match coordinate_system {
        FDatasmithFacadeCoordinateSystemType_LeftHandedYup => "LeftHandedYup",
        FDatasmithFacadeCoordinateSystemType_LeftHandedZup => "LeftHandedZup",
        FDatasmithFacadeCoordinateSystemType_RightHandedZup => "RightHandedZup",
        other => {
            return fail(
                FACADE_STATUS_INVALID_ARGUMENT,
                &format!("unknown coordinate system type {other}"),
            );
        }
    };
    COORDINATE_SYSTEM.store(coordinate_system, Ordering::SeqCst);
    emit(Severity::Info, &format!("coordinate system set to {name}"));
    FACADE_STATUS_OK
}

/// Get the active coordinate system.
#[unsafe(no_mangle)]
pub extern "C" fn FDatasmithFacadeElement_GetCoordinateSystemType() -> FDatasmithFacadeCoordinateSystemType {
    COORDINATE_SYSTEM.load(Ordering::SeqCst)
}

/// Set the multiplier applied to converted positions.
///
/// A nearly-zero scale is replaced by [`FACADE_SMALL_NUMBER`].
#[unsafe(no_mangle)]
pub extern "C" fn FDatasmithFacadeElement_SetWorldUnitScale(world_unit_scale: f32) {
    let scale = if world_unit_scale.abs() <= FACADE_SMALL_NUMBER {
        FACADE_SMALL_NUMBER
    } else {
        world_unit_scale
    };
    WORLD_UNIT_SCALE.store(scale.to_bits(), Ordering::SeqCst);
    emit(Severity::Info, &format!("world unit scale set to {scale}"));
}

/// Get the active world unit scale.
#[unsafe(no_mangle)]
pub extern "C" fn FDatasmithFacadeElement_GetWorldUnitScale() -> f32 {
    f32::from_bits(WORLD_UNIT_SCALE.load(Ordering::SeqCst))
}

/// Convert a position into Unreal space using the global settings.
#[unsafe(no_mangle)]
pub extern "C" fn FDatasmithFacadeElement_ConvertPosition(x: f32, y: f32, z: f32) -> FDatasmithFacadeVector {
    let s = FDatasmithFacadeElement_GetWorldUnitScale();
    match FDatasmithFacadeElement_GetCoordinateSystemType() {
        FDatasmithFacadeCoordinateSystemType_LeftHandedYup => FDatasmithFacadeVector { x: x * s, y: -z * s, z: y * s },
        // Handedness is flipped on the side axis so forward (X) is untouched.
        FDatasmithFacadeCoordinateSystemType_RightHandedZup => FDatasmithFacadeVector { x: x * s, y: -y * s, z: z * s },
        _ => FDatasmithFacadeVector { x: x * s, y: y * s, z: z * s },
    }
}

/// Convert a direction into Unreal space using the global settings. Not scaled.
#[unsafe(no_mangle)]
pub extern "C" fn FDatasmithFacadeElement_ConvertDirection(x: f32, y: f32, z: f32) -> FDatasmithFacadeVector {
    match FDatasmithFacadeElement_GetCoordinateSystemType() {
        FDatasmithFacadeCoordinateSystemType_LeftHandedYup => FDatasmithFacadeVector { x, y: -z, z: y },
        FDatasmithFacadeCoordinateSystemType_RightHandedZup => FDatasmithFacadeVector { x, y: -y, z },
        _ => FDatasmithFacadeVector { x, y, z },
    }
}

/// Convert a translation; identical to [`FDatasmithFacadeElement_ConvertPosition`].
#[unsafe(no_mangle)]
pub extern "C" fn FDatasmithFacadeElement_ConvertTranslation(x: f32, y: f32, z: f32) -> FDatasmithFacadeVector {
    FDatasmithFacadeElement_ConvertPosition(x, y, z)
}
