//! Coordinate systems and unit scale
//!
//! Exported geometry always ends up in Unreal's left-handed, Z-up frame.
//! [`CoordinateSystemType`] names the frame the source application works in
//! and knows how to bring positions and directions across:
//!
//! | Source          | Position            | Direction     |
//! |-----------------|---------------------|---------------|
//! | left-handed Y-up  | `(x, -z, y) * s`  | `(x, -z, y)`  |
//! | left-handed Z-up  | `(x, y, z) * s`   | `(x, y, z)`   |
//! | right-handed Z-up | `(x, -y, z) * s`  | `(x, -y, z)`  |
//!
//! where `s` is the [`WorldUnitScale`]. Right-handed sources are mirrored on
//! the side axis (Y) so the forward axis (X) is left untouched.

use std::fmt;

use crate::{
    error::{Error, Result},
    sys,
    types::Vector3D,
};

/// Replacement for a unit scale that is nearly zero
pub const SMALL_NUMBER: f32 = sys::FACADE_SMALL_NUMBER;

/// Axis convention of the source application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum CoordinateSystemType {
    /// Left-handed, Y axis up
    LeftHandedYup = sys::FDatasmithFacadeCoordinateSystemType_LeftHandedYup,
    /// Left-handed, Z axis up (Unreal's own frame)
    #[default]
    LeftHandedZup = sys::FDatasmithFacadeCoordinateSystemType_LeftHandedZup,
    /// Right-handed, Z axis up
    RightHandedZup = sys::FDatasmithFacadeCoordinateSystemType_RightHandedZup,
}

impl CoordinateSystemType {
    /// All coordinate systems, in native discriminant order
    pub const ALL: [CoordinateSystemType; 3] = [
        CoordinateSystemType::LeftHandedYup,
        CoordinateSystemType::LeftHandedZup,
        CoordinateSystemType::RightHandedZup,
    ];

    /// Native discriminant
    pub fn to_raw(self) -> sys::FDatasmithFacadeCoordinateSystemType {
        self as sys::FDatasmithFacadeCoordinateSystemType
    }

    /// Convert a position into Unreal space
    pub fn convert_position(self, position: Vector3D, scale: WorldUnitScale) -> Vector3D {
        self.convert_direction(position) * scale.get()
    }

    /// Convert a direction into Unreal space (never scaled)
    pub fn convert_direction(self, direction: Vector3D) -> Vector3D {
        let (x, y, z) = (direction.x, direction.y, direction.z);
        match self {
            CoordinateSystemType::LeftHandedYup => Vector3D::new(x, -z, y),
            CoordinateSystemType::LeftHandedZup => Vector3D::new(x, y, z),
            CoordinateSystemType::RightHandedZup => Vector3D::new(x, -y, z),
        }
    }
}

impl TryFrom<i32> for CoordinateSystemType {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.to_raw() == value)
            .ok_or_else(|| Error::invalid_parameter(format!("unknown coordinate system type {value}")))
    }
}

impl fmt::Display for CoordinateSystemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CoordinateSystemType::LeftHandedYup => "left-handed Y-up",
            CoordinateSystemType::LeftHandedZup => "left-handed Z-up",
            CoordinateSystemType::RightHandedZup => "right-handed Z-up",
        };
        f.write_str(name)
    }
}

/// Multiplier from source units to centimetres
///
/// A nearly-zero scale is replaced by [`SMALL_NUMBER`] so geometry never
/// collapses to the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldUnitScale(f32);

impl WorldUnitScale {
    /// Create a scale, replacing a nearly-zero value by [`SMALL_NUMBER`]
    pub fn new(scale: f32) -> Result<Self> {
        if !scale.is_finite() {
            return Err(Error::invalid_parameter(format!(
                "world unit scale must be finite, got {scale}"
            )));
        }
        Ok(Self::from_native(scale))
    }

    /// Same clamping rule as the native setter
    pub(crate) fn from_native(scale: f32) -> Self {
        if scale.abs() <= SMALL_NUMBER {
            Self(SMALL_NUMBER)
        } else {
            Self(scale)
        }
    }

    /// The scale value
    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for WorldUnitScale {
    fn default() -> Self {
        Self(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_discriminants_match_native() {
        assert_eq!(CoordinateSystemType::LeftHandedYup.to_raw(), 0);
        assert_eq!(CoordinateSystemType::LeftHandedZup.to_raw(), 1);
        assert_eq!(CoordinateSystemType::RightHandedZup.to_raw(), 2);
        assert_eq!(CoordinateSystemType::default(), CoordinateSystemType::LeftHandedZup);
    }

    #[test]
    fn test_try_from() {
        for mode in CoordinateSystemType::ALL {
            assert_eq!(CoordinateSystemType::try_from(mode.to_raw()).unwrap(), mode);
        }
        assert!(CoordinateSystemType::try_from(3).is_err());
        assert!(CoordinateSystemType::try_from(-1).is_err());
    }

    #[test]
    fn test_position_conversion() {
        let p = Vector3D::new(1.0, 2.0, 3.0);
        let s = WorldUnitScale::new(100.0).unwrap();

        let yup = CoordinateSystemType::LeftHandedYup.convert_position(p, s);
        assert_relative_eq!(yup.x, 100.0);
        assert_relative_eq!(yup.y, -300.0);
        assert_relative_eq!(yup.z, 200.0);

        let zup = CoordinateSystemType::LeftHandedZup.convert_position(p, s);
        assert_eq!(zup, Vector3D::new(100.0, 200.0, 300.0));

        let rh = CoordinateSystemType::RightHandedZup.convert_position(p, s);
        assert_eq!(rh, Vector3D::new(100.0, -200.0, 300.0));
    }

    #[test]
    fn test_direction_is_not_scaled() {
        let d = Vector3D::new(0.0, 1.0, 0.0);
        assert_eq!(
            CoordinateSystemType::LeftHandedYup.convert_direction(d),
            Vector3D::new(0.0, 0.0, 1.0)
        );
        assert_eq!(
            CoordinateSystemType::RightHandedZup.convert_direction(d),
            Vector3D::new(0.0, -1.0, 0.0)
        );
    }

    #[test]
    fn test_unit_scale_clamping() {
        assert_eq!(WorldUnitScale::new(0.0).unwrap().get(), SMALL_NUMBER);
        assert_eq!(WorldUnitScale::new(-1.0e-12).unwrap().get(), SMALL_NUMBER);
        assert_eq!(WorldUnitScale::new(2.54).unwrap().get(), 2.54);
        assert!(WorldUnitScale::new(f32::NAN).is_err());
        assert!(WorldUnitScale::new(f32::INFINITY).is_err());
        assert_eq!(WorldUnitScale::default().get(), 1.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(CoordinateSystemType::RightHandedZup.to_string(), "right-handed Z-up");
    }
}
