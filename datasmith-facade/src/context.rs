//! Explicit export configuration
//!
//! [`ExportSettings`] bundles the coordinate system and unit scale of one
//! export. An [`ExportContext`] owns a copy and performs every conversion
//! with it, so two exports with different settings can run side by side
//! without touching the native globals.
//!
//! ```rust,no_run
//! use datasmith_facade::{CoordinateSystemType, ExportContext, ExportSettings, types::Vector3D};
//!
//! # fn main() -> datasmith_facade::Result<()> {
//! let settings = ExportSettings::new()
//!     .with_coordinate_system(CoordinateSystemType::RightHandedZup)
//!     .with_world_unit_scale(100.0)?;
//! let context = ExportContext::new(settings);
//!
//! let p = context.convert_position(Vector3D::new(1.0, 2.0, 3.0));
//! assert_eq!(p, Vector3D::new(100.0, -200.0, 300.0));
//! # Ok(())
//! # }
//! ```

use crate::{
    coordinates::{CoordinateSystemType, WorldUnitScale},
    element::Element,
    error::Result,
    global,
    types::Vector3D,
};

/// Coordinate system and unit scale of one export
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ExportSettings {
    coordinate_system: CoordinateSystemType,
    world_unit_scale: WorldUnitScale,
}

impl ExportSettings {
    /// Left-handed Z-up with a unit scale of 1
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current native global settings
    pub fn from_global() -> Result<Self> {
        Ok(Self {
            coordinate_system: global::coordinate_system_type()?,
            world_unit_scale: global::world_unit_scale(),
        })
    }

    /// Set the source coordinate system
    pub fn with_coordinate_system(mut self, coordinate_system: CoordinateSystemType) -> Self {
        self.coordinate_system = coordinate_system;
        self
    }

    /// Set the world unit scale; a nearly-zero scale is clamped, a non-finite one rejected
    pub fn with_world_unit_scale(mut self, scale: f32) -> Result<Self> {
        self.world_unit_scale = WorldUnitScale::new(scale)?;
        Ok(self)
    }

    /// Source coordinate system
    pub fn coordinate_system(&self) -> CoordinateSystemType {
        self.coordinate_system
    }

    /// World unit scale
    pub fn world_unit_scale(&self) -> WorldUnitScale {
        self.world_unit_scale
    }
}

/// Export state threaded through conversion and element creation
#[derive(Debug, Clone)]
pub struct ExportContext {
    settings: ExportSettings,
}

impl ExportContext {
    /// Create a context using `settings` for every subsequent operation
    pub fn new(settings: ExportSettings) -> Self {
        tracing::debug!(
            coordinate_system = %settings.coordinate_system,
            world_unit_scale = settings.world_unit_scale.get(),
            "created export context"
        );
        Self { settings }
    }

    /// The settings this context converts with
    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// Convert a position into Unreal space
    pub fn convert_position(&self, position: Vector3D) -> Vector3D {
        self.settings
            .coordinate_system
            .convert_position(position, self.settings.world_unit_scale)
    }

    /// Convert a translation into Unreal space
    pub fn convert_translation(&self, translation: Vector3D) -> Vector3D {
        self.convert_position(translation)
    }

    /// Convert a direction into Unreal space (never scaled)
    pub fn convert_direction(&self, direction: Vector3D) -> Vector3D {
        self.settings.coordinate_system.convert_direction(direction)
    }

    /// Create an owned element for this export
    pub fn create_element(&self, name: &str) -> Result<Element> {
        Element::new(name)
    }

    /// Push this context's settings into the native globals
    ///
    /// For code paths that still read the process-wide settings. Subject to
    /// the same ordering caveats as [`global`].
    pub fn apply_globally(&self) -> Result<()> {
        global::set_coordinate_system_type(self.settings.coordinate_system)?;
        global::set_world_unit_scale(self.settings.world_unit_scale.get())
    }
}

impl Default for ExportContext {
    fn default() -> Self {
        Self::new(ExportSettings::default())
    }
}
