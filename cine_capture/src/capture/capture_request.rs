/// CaptureRequest - configuration snapshot handed to the renderer.
///
/// Built from a `SceneCapture` at render time. Owns all of its data so the
/// renderer never needs to reach back into the capture, except for view
/// states which go through `ViewStateAccess`.

use rustc_hash::FxHashSet;
use glam::{Mat4, Quat, Vec3};
use crate::lens::DepthOfFieldOverrides;
use super::settings::{
    CaptureSource, ClipPlane, CompositeMode, PrimitiveRenderMode, ProjectionMode,
    ShowFlags, StereoPass,
};

/// Far plane used by orthographic captures without a view distance override
const DEFAULT_ORTHO_FAR_PLANE: f32 = 1.0e6;

/// Reference to a primitive component in the host scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub u64);

/// Reference to an actor (owner of components) in the host scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(pub u64);

// ===== VISIBILITY FILTER =====

/// Which primitives a capture renders.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VisibilityFilter {
    pub mode: PrimitiveRenderMode,
    pub hidden_components: FxHashSet<ComponentId>,
    pub hidden_actors: FxHashSet<ActorId>,
    pub show_only_components: FxHashSet<ComponentId>,
    pub show_only_actors: FxHashSet<ActorId>,
}

impl VisibilityFilter {
    /// Whether `component` (owned by `owner`, if any) is rendered.
    ///
    /// `ShowOnlyList` renders listed components and components of listed
    /// actors only. The other modes render everything except hidden
    /// components and components of hidden actors.
    pub fn is_primitive_visible(&self, component: ComponentId, owner: Option<ActorId>) -> bool {
        match self.mode {
            PrimitiveRenderMode::ShowOnlyList => {
                self.show_only_components.contains(&component)
                    || owner.is_some_and(|actor| self.show_only_actors.contains(&actor))
            }
            PrimitiveRenderMode::LegacyAll | PrimitiveRenderMode::RenderAllExceptHidden => {
                !self.hidden_components.contains(&component)
                    && !owner.is_some_and(|actor| self.hidden_actors.contains(&actor))
            }
        }
    }
}

// ===== CAPTURE REQUEST =====

/// Everything the renderer needs to draw one capture.
#[derive(Debug, Clone)]
pub struct CaptureRequest {
    /// Capture name (also used as profiling label when none is set)
    pub name: String,
    pub location: Vec3,
    pub rotation: Quat,
    pub projection: ProjectionMode,
    pub custom_projection: Option<Mat4>,
    /// Horizontal field of view from the lens (degrees)
    pub field_of_view: f32,
    /// Sensor aspect ratio (width / height)
    pub aspect_ratio: f32,
    pub near_clip_plane: f32,
    pub visibility: VisibilityFilter,
    pub show_flags: ShowFlags,
    pub depth_of_field: DepthOfFieldOverrides,
    pub sort_priority: i32,
    pub capture_source: CaptureSource,
    pub composite_mode: CompositeMode,
    pub lod_distance_factor: f32,
    pub max_view_distance: Option<f32>,
    pub clip_plane: Option<ClipPlane>,
    pub stereo_pass: StereoPass,
    /// View index for view-state lookup
    pub view_index: usize,
    /// Renderer should discard temporal history for this capture
    pub camera_cut: bool,
    pub profiling_event_name: String,
}

impl CaptureRequest {
    /// World-to-view matrix (inverse of the capture transform).
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.location).inverse()
    }

    /// Projection matrix: the custom matrix if set, otherwise computed.
    ///
    /// Perspective uses an infinite reverse-Z projection built from the
    /// horizontal field of view. Orthographic spans `ortho_width`
    /// horizontally.
    pub fn projection_matrix(&self) -> Mat4 {
        if let Some(custom) = self.custom_projection {
            return custom;
        }

        let aspect = if self.aspect_ratio > 0.0 { self.aspect_ratio } else { 1.0 };
        match self.projection {
            ProjectionMode::Perspective => {
                let half_fov_x = self.field_of_view.to_radians() * 0.5;
                let fov_y = 2.0 * (half_fov_x.tan() / aspect).atan();
                Mat4::perspective_infinite_reverse_rh(fov_y, aspect, self.near_clip_plane)
            }
            ProjectionMode::Orthographic { ortho_width } => {
                let half_w = ortho_width * 0.5;
                let half_h = half_w / aspect;
                let far = self.max_view_distance.unwrap_or(DEFAULT_ORTHO_FAR_PLANE);
                Mat4::orthographic_rh(-half_w, half_w, -half_h, half_h, 0.0, far)
            }
        }
    }

    /// Combined view-projection matrix (projection * view).
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Profiling label: the explicit event name, or the capture name.
    pub fn profiling_label(&self) -> &str {
        if self.profiling_event_name.is_empty() {
            &self.name
        } else {
            &self.profiling_event_name
        }
    }
}

#[cfg(test)]
#[path = "capture_request_tests.rs"]
mod tests;
