//! Process-wide export settings held by the native layer
//!
//! These setters affect every subsequent conversion made through this
//! module, for all elements, on all threads; the last write wins. They are
//! not ordered with concurrent export work, so set them once during
//! initialisation. Code that can thread its settings explicitly should use
//! [`ExportContext`](crate::context::ExportContext) instead.

use crate::{
    coordinates::{CoordinateSystemType, WorldUnitScale},
    error::{Error, Result, check_status},
    sys,
    types::{Vector3D, from_facade_vector},
};

/// Select the source coordinate system for all subsequent conversions
pub fn set_coordinate_system_type(coordinate_system: CoordinateSystemType) -> Result<()> {
    check_status(sys::FDatasmithFacadeElement_SetCoordinateSystemType(
        coordinate_system.to_raw(),
    ))
}

/// The active source coordinate system
pub fn coordinate_system_type() -> Result<CoordinateSystemType> {
    CoordinateSystemType::try_from(sys::FDatasmithFacadeElement_GetCoordinateSystemType())
}

/// Set the multiplier applied to all subsequently converted positions
///
/// A nearly-zero scale is replaced by [`SMALL_NUMBER`](crate::coordinates::SMALL_NUMBER).
pub fn set_world_unit_scale(scale: f32) -> Result<()> {
    if !scale.is_finite() {
        return Err(Error::invalid_parameter(format!(
            "world unit scale must be finite, got {scale}"
        )));
    }
    sys::FDatasmithFacadeElement_SetWorldUnitScale(scale);
    Ok(())
}

/// The active world unit scale
pub fn world_unit_scale() -> WorldUnitScale {
    WorldUnitScale::from_native(sys::FDatasmithFacadeElement_GetWorldUnitScale())
}

/// Convert a position with the global settings
pub fn convert_position(position: Vector3D) -> Vector3D {
    from_facade_vector(sys::FDatasmithFacadeElement_ConvertPosition(
        position.x, position.y, position.z,
    ))
}

/// Convert a translation with the global settings
pub fn convert_translation(translation: Vector3D) -> Vector3D {
    from_facade_vector(sys::FDatasmithFacadeElement_ConvertTranslation(
        translation.x,
        translation.y,
        translation.z,
    ))
}

/// Convert a direction with the global coordinate system (never scaled)
pub fn convert_direction(direction: Vector3D) -> Vector3D {
    from_facade_vector(sys::FDatasmithFacadeElement_ConvertDirection(
        direction.x,
        direction.y,
        direction.z,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Mutating tests for the globals live in `tests/global_settings.rs`, where
    // they are serialised; here only paths that leave the globals untouched.
    #[test]
    fn test_non_finite_scale_is_rejected() {
        assert!(matches!(
            set_world_unit_scale(f32::NAN),
            Err(Error::InvalidParameter { .. })
        ));
        assert!(set_world_unit_scale(f32::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_getters_are_in_range() {
        assert!(coordinate_system_type().is_ok());
        assert!(world_unit_scale().get() > 0.0);
    }
}
