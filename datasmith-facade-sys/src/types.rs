//! Type extensions and convenience implementations for facade types
//!
//! This module provides additional constructors and conversions for the
//! plain-data types that cross the C boundary.

use crate::*;

impl FDatasmithFacadeVector {
    /// Create a new vector
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Create a zero vector
    #[inline]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

impl From<[f32; 3]> for FDatasmithFacadeVector {
    #[inline]
    fn from(array: [f32; 3]) -> Self {
        Self::new(array[0], array[1], array[2])
    }
}

impl From<(f32, f32, f32)> for FDatasmithFacadeVector {
    #[inline]
    fn from((x, y, z): (f32, f32, f32)) -> Self {
        Self::new(x, y, z)
    }
}

impl From<FDatasmithFacadeVector> for [f32; 3] {
    #[inline]
    fn from(v: FDatasmithFacadeVector) -> [f32; 3] {
        [v.x, v.y, v.z]
    }
}

// Mint integration (if enabled)
#[cfg(feature = "mint")]
mod mint_integration {
    use super::*;

    impl From<mint::Vector3<f32>> for FDatasmithFacadeVector {
        #[inline]
        fn from(v: mint::Vector3<f32>) -> Self {
            Self::new(v.x, v.y, v.z)
        }
    }

    impl From<FDatasmithFacadeVector> for mint::Vector3<f32> {
        #[inline]
        fn from(v: FDatasmithFacadeVector) -> Self {
            mint::Vector3 {
                x: v.x,
                y: v.y,
                z: v.z,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_conversions() {
        let v = FDatasmithFacadeVector::from([1.0, 2.0, 3.0]);
        assert_eq!(v, FDatasmithFacadeVector::new(1.0, 2.0, 3.0));
        assert_eq!(<[f32; 3]>::from(v), [1.0, 2.0, 3.0]);
    }
}
