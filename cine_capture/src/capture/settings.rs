/// Scene capture settings.
///
/// Plain configuration data. Every field has a documented default
/// matching a freshly created capture component.

use bitflags::bitflags;
use glam::{Mat4, Vec3};

// ===== ENUMS =====

/// Controls which primitives get rendered into the capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrimitiveRenderMode {
    /// Legacy behavior: everything except the hidden lists
    #[default]
    LegacyAll,
    /// Everything in the scene except the hidden lists
    RenderAllExceptHidden,
    /// Only the show-only lists
    ShowOnlyList,
}

/// Projection used by the capture view.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ProjectionMode {
    /// Perspective with the lens' field of view
    #[default]
    Perspective,
    /// Orthographic with the given view width (world units)
    Orthographic { ortho_width: f32 },
}

/// Which buffer the capture writes into its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureSource {
    #[default]
    SceneColorHdr,
    SceneColorHdrNoAlpha,
    FinalColorLdr,
    SceneDepth,
    DeviceDepth,
    Normal,
    BaseColor,
}

/// How the capture combines with the existing target contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositeMode {
    #[default]
    Overwrite,
    Additive,
    Composite,
}

/// Stereo pass the capture renders for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StereoPass {
    #[default]
    Full,
    LeftEye,
    RightEye,
}

impl StereoPass {
    /// Logical view index used for view-state lookup
    pub fn view_index(self) -> usize {
        match self {
            StereoPass::Full | StereoPass::LeftEye => 0,
            StereoPass::RightEye => 1,
        }
    }
}

/// Clip plane applied while rendering the capture (portals, mirrors).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipPlane {
    /// Any point on the plane
    pub base: Vec3,
    /// Plane normal
    pub normal: Vec3,
}

impl Default for ClipPlane {
    fn default() -> Self {
        Self {
            base: Vec3::ZERO,
            normal: Vec3::Z,
        }
    }
}

// ===== SHOW FLAGS =====

bitflags! {
    /// Per-view rendering features.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ShowFlags: u32 {
        const LIGHTING              = 1 << 0;
        const SHADOWS               = 1 << 1;
        const TRANSLUCENCY          = 1 << 2;
        const SEPARATE_TRANSLUCENCY = 1 << 3;
        const POST_PROCESSING       = 1 << 4;
        const TONEMAPPER            = 1 << 5;
        const BLOOM                 = 1 << 6;
        const DEPTH_OF_FIELD        = 1 << 7;
        const MOTION_BLUR           = 1 << 8;
        const TEMPORAL_AA           = 1 << 9;
        const FOG                   = 1 << 10;
        const ATMOSPHERE            = 1 << 11;
        const PARTICLES             = 1 << 12;
        const DECALS                = 1 << 13;
        const HMD_DISTORTION        = 1 << 14;
    }
}

impl ShowFlags {
    /// Flags of a regular game view
    pub fn game() -> Self {
        Self::all()
    }

    /// Game flags minus the features that misbehave in offscreen captures
    pub fn capture_default() -> Self {
        Self::game()
            - Self::MOTION_BLUR
            - Self::SEPARATE_TRANSLUCENCY
            - Self::HMD_DISTORTION
    }

    /// Apply overrides in order; later overrides of the same flag win.
    pub fn with_overrides(self, overrides: &[ShowFlagOverride]) -> Self {
        overrides.iter().fold(self, |mut flags, setting| {
            flags.set(setting.flag, setting.enabled);
            flags
        })
    }
}

/// A single show-flag override stored with the capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowFlagOverride {
    pub flag: ShowFlags,
    pub enabled: bool,
}

impl ShowFlagOverride {
    pub fn new(flag: ShowFlags, enabled: bool) -> Self {
        Self { flag, enabled }
    }
}

// ===== CAPTURE SETTINGS =====

/// Scheduling, filtering and view configuration of a capture.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureSettings {
    /// Capture on every world tick (default `true`)
    pub capture_every_frame: bool,
    /// Capture whenever the transform changes (default `true`)
    pub capture_on_movement: bool,
    /// Keep view states even without every-frame capture (default `false`)
    pub persist_rendering_state: bool,
    /// Higher priorities render first within a flush (default `0`)
    pub sort_priority: i32,
    pub primitive_render_mode: PrimitiveRenderMode,
    pub projection: ProjectionMode,
    /// Replaces the computed projection when set. Does not affect culling.
    pub custom_projection: Option<Mat4>,
    /// Near clip distance (world units, default `10.0`)
    pub near_clip_plane: f32,
    pub capture_source: CaptureSource,
    pub composite_mode: CompositeMode,
    /// Scales LOD distances; above 1 picks coarser LODs (default `1.0`)
    pub lod_distance_factor: f32,
    /// Maximum render distance when positive (default `-1.0`, disabled)
    pub max_view_distance_override: f32,
    pub clip_plane: Option<ClipPlane>,
    pub stereo_pass: StereoPass,
    /// Label used for renderer profiling events
    pub profiling_event_name: String,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            capture_every_frame: true,
            capture_on_movement: true,
            persist_rendering_state: false,
            sort_priority: 0,
            primitive_render_mode: PrimitiveRenderMode::default(),
            projection: ProjectionMode::default(),
            custom_projection: None,
            near_clip_plane: 10.0,
            capture_source: CaptureSource::default(),
            composite_mode: CompositeMode::default(),
            lod_distance_factor: 1.0,
            max_view_distance_override: -1.0,
            clip_plane: None,
            stereo_pass: StereoPass::default(),
            profiling_event_name: String::new(),
        }
    }
}

impl CaptureSettings {
    /// Whether view states must survive between accesses.
    pub fn requires_persistent_view_state(&self) -> bool {
        self.capture_every_frame || self.persist_rendering_state
    }

    /// Positive max view distance, if the override is enabled
    pub fn max_view_distance(&self) -> Option<f32> {
        (self.max_view_distance_override > 0.0).then_some(self.max_view_distance_override)
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
