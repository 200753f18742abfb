/// Tests for CaptureSettings and ShowFlags

use super::*;

// ============================================================================
// Tests: Defaults
// ============================================================================

#[test]
fn test_capture_settings_defaults() {
    let settings = CaptureSettings::default();
    assert!(settings.capture_every_frame);
    assert!(settings.capture_on_movement);
    assert!(!settings.persist_rendering_state);
    assert_eq!(settings.sort_priority, 0);
    assert_eq!(settings.primitive_render_mode, PrimitiveRenderMode::LegacyAll);
    assert_eq!(settings.projection, ProjectionMode::Perspective);
    assert!(settings.custom_projection.is_none());
    assert_eq!(settings.lod_distance_factor, 1.0);
    assert!(settings.max_view_distance().is_none());
    assert!(settings.clip_plane.is_none());
    assert_eq!(settings.stereo_pass, StereoPass::Full);
}

#[test]
fn test_clip_plane_default_normal_is_up() {
    assert_eq!(ClipPlane::default().normal, Vec3::Z);
}

#[test]
fn test_max_view_distance_enabled_when_positive() {
    let settings = CaptureSettings {
        max_view_distance_override: 5000.0,
        ..CaptureSettings::default()
    };
    assert_eq!(settings.max_view_distance(), Some(5000.0));
}

// ============================================================================
// Tests: Persistence Policy
// ============================================================================

#[test]
fn test_requires_persistent_view_state() {
    let mut settings = CaptureSettings::default();
    assert!(settings.requires_persistent_view_state());

    settings.capture_every_frame = false;
    assert!(!settings.requires_persistent_view_state());

    settings.persist_rendering_state = true;
    assert!(settings.requires_persistent_view_state());
}

// ============================================================================
// Tests: Stereo
// ============================================================================

#[test]
fn test_stereo_view_index() {
    assert_eq!(StereoPass::Full.view_index(), 0);
    assert_eq!(StereoPass::LeftEye.view_index(), 0);
    assert_eq!(StereoPass::RightEye.view_index(), 1);
}

// ============================================================================
// Tests: Show Flags
// ============================================================================

#[test]
fn test_capture_default_show_flags() {
    let flags = ShowFlags::capture_default();
    assert!(!flags.contains(ShowFlags::MOTION_BLUR));
    assert!(!flags.contains(ShowFlags::SEPARATE_TRANSLUCENCY));
    assert!(!flags.contains(ShowFlags::HMD_DISTORTION));
    assert!(flags.contains(ShowFlags::LIGHTING));
    assert!(flags.contains(ShowFlags::TEMPORAL_AA));
}

#[test]
fn test_with_overrides_applies_in_order() {
    let overrides = [
        ShowFlagOverride::new(ShowFlags::FOG, false),
        ShowFlagOverride::new(ShowFlags::MOTION_BLUR, true),
        ShowFlagOverride::new(ShowFlags::FOG, true),
        ShowFlagOverride::new(ShowFlags::BLOOM, false),
    ];

    let flags = ShowFlags::capture_default().with_overrides(&overrides);

    assert!(flags.contains(ShowFlags::FOG));
    assert!(flags.contains(ShowFlags::MOTION_BLUR));
    assert!(!flags.contains(ShowFlags::BLOOM));
}

#[test]
fn test_with_no_overrides_is_identity() {
    let base = ShowFlags::LIGHTING | ShowFlags::SHADOWS;
    assert_eq!(base.with_overrides(&[]), base);
}
