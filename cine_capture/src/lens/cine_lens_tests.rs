/// Tests for CineLens configuration and focus distance sources

use super::*;
use glam::Vec3;

// ============================================================================
// Tests: Derived Data
// ============================================================================

#[test]
fn test_default_lens_derived_fov() {
    let lens = CineLens::default();
    let derived = lens.derived();

    let expected = (2.0 * (24.89f32 / 70.0).atan()).to_degrees();
    assert!((derived.field_of_view - expected).abs() < 1e-4);
    assert!((derived.aspect_ratio - 24.89 / 18.67).abs() < 1e-5);
    assert_eq!(derived.focal_length, 35.0);
    assert_eq!(derived.aperture, 2.8);
}

#[test]
fn test_derived_clamps_focal_length_and_aperture() {
    let mut lens = CineLens::default();
    lens.current_focal_length = 2000.0;
    lens.current_aperture = 0.5;

    let derived = lens.derived();
    assert_eq!(derived.focal_length, 1000.0);
    assert_eq!(derived.aperture, 1.2);
}

#[test]
fn test_longer_focal_length_narrows_fov() {
    let mut lens = CineLens::default();
    lens.current_focal_length = 24.0;
    let wide = lens.derived().field_of_view;
    lens.current_focal_length = 85.0;
    let tele = lens.derived().field_of_view;

    assert!(tele < wide);
}

#[test]
fn test_minimum_focus_distance_conversion() {
    let lens = CineLens::default();
    // 15mm at 100 world units per meter = 1.5 world units
    assert!((lens.minimum_focus_distance_world(100.0) - 1.5).abs() < 1e-6);
}

// ============================================================================
// Tests: Focus Distance Sources
// ============================================================================

#[test]
fn test_manual_focus_distance_with_offset() {
    let settings = FocusSettings {
        method: FocusMethod::Manual,
        manual_focus_distance: 250.0,
        focus_offset: 10.0,
        ..FocusSettings::default()
    };

    assert_eq!(settings.desired_focus_distance(Vec3::new(5.0, 5.0, 5.0)), 260.0);
}

#[test]
fn test_tracking_focus_uses_tracked_location_plus_offset() {
    let settings = FocusSettings {
        method: FocusMethod::Tracking,
        tracking: TrackingFocusSettings {
            tracked_location: Some(Vec3::new(100.0, 0.0, 0.0)),
            relative_offset: Vec3::new(0.0, 0.0, 50.0),
        },
        ..FocusSettings::default()
    };

    let distance = settings.desired_focus_distance(Vec3::new(100.0, 0.0, 0.0));
    assert!((distance - 50.0).abs() < 1e-5);
}

#[test]
fn test_tracking_without_target_uses_offset_as_world_position() {
    let settings = FocusSettings {
        method: FocusMethod::Tracking,
        tracking: TrackingFocusSettings {
            tracked_location: None,
            relative_offset: Vec3::new(0.0, 300.0, 0.0),
        },
        ..FocusSettings::default()
    };

    let distance = settings.desired_focus_distance(Vec3::ZERO);
    assert!((distance - 300.0).abs() < 1e-5);
}
