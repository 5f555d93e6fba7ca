// Integration tests for the process-wide export settings.
//
// Every test here mutates the native globals, so they share one lock.
use approx::assert_relative_eq;
use datasmith_facade::types::Vector3D;
use datasmith_facade::{CoordinateSystemType, ExportContext, ExportSettings, SMALL_NUMBER, global};
use std::sync::{Mutex, MutexGuard};

static GLOBALS: Mutex<()> = Mutex::new(());

fn lock_globals() -> MutexGuard<'static, ()> {
    GLOBALS.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn reset() {
    global::set_coordinate_system_type(CoordinateSystemType::LeftHandedZup).unwrap();
    global::set_world_unit_scale(1.0).unwrap();
}

#[test]
fn test_last_write_wins() {
    let _guard = lock_globals();
    reset();

    global::set_coordinate_system_type(CoordinateSystemType::LeftHandedYup).unwrap();
    global::set_coordinate_system_type(CoordinateSystemType::RightHandedZup).unwrap();
    assert_eq!(
        global::coordinate_system_type().unwrap(),
        CoordinateSystemType::RightHandedZup
    );

    global::set_world_unit_scale(2.0).unwrap();
    global::set_world_unit_scale(100.0).unwrap();
    assert_eq!(global::world_unit_scale().get(), 100.0);

    reset();
}

#[test]
fn test_native_conversions_match_context() {
    let _guard = lock_globals();
    let samples = [
        Vector3D::new(1.0, 2.0, 3.0),
        Vector3D::new(-4.5, 0.0, 7.25),
        Vector3D::ZERO,
    ];

    for mode in CoordinateSystemType::ALL {
        for scale in [1.0, 2.54, 100.0] {
            let context = ExportContext::new(
                ExportSettings::new()
                    .with_coordinate_system(mode)
                    .with_world_unit_scale(scale)
                    .unwrap(),
            );
            context.apply_globally().unwrap();

            for v in samples {
                let native = global::convert_position(v);
                let local = context.convert_position(v);
                assert_relative_eq!(native.x, local.x);
                assert_relative_eq!(native.y, local.y);
                assert_relative_eq!(native.z, local.z);

                assert_eq!(global::convert_translation(v), native);
                assert_eq!(global::convert_direction(v), context.convert_direction(v));
            }
        }
    }

    reset();
}

#[test]
fn test_settings_snapshot() {
    let _guard = lock_globals();
    global::set_coordinate_system_type(CoordinateSystemType::LeftHandedYup).unwrap();
    global::set_world_unit_scale(0.5).unwrap();

    let settings = ExportSettings::from_global().unwrap();
    assert_eq!(settings.coordinate_system(), CoordinateSystemType::LeftHandedYup);
    assert_eq!(settings.world_unit_scale().get(), 0.5);

    // A context keeps its snapshot after the globals move on.
    let context = ExportContext::new(settings);
    reset();
    assert_eq!(
        context.convert_position(Vector3D::new(1.0, 2.0, 3.0)),
        Vector3D::new(0.5, -1.5, 1.0)
    );
}

#[test]
fn test_nearly_zero_scale_is_clamped() {
    let _guard = lock_globals();

    global::set_world_unit_scale(0.0).unwrap();
    assert_eq!(global::world_unit_scale().get(), SMALL_NUMBER);

    global::set_world_unit_scale(-1.0e-10).unwrap();
    assert_eq!(global::world_unit_scale().get(), SMALL_NUMBER);

    // Rejected values leave the previous setting in place.
    global::set_world_unit_scale(3.0).unwrap();
    assert!(global::set_world_unit_scale(f32::NAN).is_err());
    assert_eq!(global::world_unit_scale().get(), 3.0);

    reset();
}

#[test]
fn test_directions_ignore_scale() {
    let _guard = lock_globals();
    global::set_coordinate_system_type(CoordinateSystemType::LeftHandedYup).unwrap();
    global::set_world_unit_scale(1000.0).unwrap();

    assert_eq!(global::convert_direction(Vector3D::Y), Vector3D::Z);

    reset();
}
