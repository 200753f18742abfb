/// SceneCapture - a camera-like object rendering into an offscreen target.
///
/// Holds the capture configuration, the lens and its smoothing state,
/// visibility filters, and the view states the renderer keeps between
/// frames. Scheduling (when the capture renders) is the job of
/// `CaptureScheduler`; this type only exposes the per-capture operations.

use std::sync::{Arc, Mutex};
use rustc_hash::FxHashSet;
use glam::{Quat, Vec3};
use crate::error::Result;
use crate::lens::{
    CineLens, DepthOfFieldOverrides, FocusDistanceSource, LensSimulator, LensState,
};
use crate::scheduler::WorldKey;
use crate::view_state::{
    ReferenceCollector, ViewStateAllocator, ViewStateHandle, ViewStateSlot,
};
use super::capture_request::{ActorId, CaptureRequest, ComponentId, VisibilityFilter};
use super::settings::{
    CaptureSettings, ClipPlane, PrimitiveRenderMode, ProjectionMode, ShowFlagOverride,
    ShowFlags, StereoPass,
};

/// Shared ownership of a capture. Hosts own it; the scheduler keeps `Weak`s.
pub type SharedCapture = Arc<Mutex<SceneCapture>>;

/// Scheduling state of a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureState {
    /// Nothing queued
    #[default]
    Idle,
    /// Registered for the next flush of its world
    PendingFlush,
    /// Being rendered by a flush or a manual capture
    Rendering,
}

/// View-state access handed to the renderer while a capture renders.
///
/// Applies the capture's persistence policy on every lookup.
pub struct ViewStateAccess<'a> {
    slot: &'a mut ViewStateSlot,
    persist: bool,
}

impl ViewStateAccess<'_> {
    /// View state for `view_index`, allocated or released per the policy.
    pub fn get(&mut self, view_index: usize) -> Result<Option<ViewStateHandle>> {
        self.slot.get(view_index, self.persist)
    }

    /// Whether states survive this access
    pub fn is_persistent(&self) -> bool {
        self.persist
    }
}

/// A scene capture component.
pub struct SceneCapture {
    name: String,
    settings: CaptureSettings,
    lens: CineLens,
    lens_state: LensState,
    depth_of_field: DepthOfFieldOverrides,
    /// Overrides `lens.focus_settings` as the focus distance source
    focus_source: Option<Arc<dyn FocusDistanceSource>>,
    show_flags: ShowFlags,
    show_flag_overrides: Vec<ShowFlagOverride>,
    location: Vec3,
    rotation: Quat,
    visible: bool,
    camera_cut_this_frame: bool,
    hidden_components: FxHashSet<ComponentId>,
    hidden_actors: FxHashSet<ActorId>,
    show_only_components: FxHashSet<ComponentId>,
    show_only_actors: FxHashSet<ActorId>,
    world: Option<WorldKey>,
    state: CaptureState,
    view_states: ViewStateSlot,
}

impl SceneCapture {
    /// Create a capture with default settings and lens.
    ///
    /// # Arguments
    ///
    /// * `name` - Capture name (diagnostics and default profiling label)
    /// * `allocator` - Renderer allocator for the capture's view states
    pub fn new(name: impl Into<String>, allocator: Arc<dyn ViewStateAllocator>) -> Self {
        Self {
            name: name.into(),
            settings: CaptureSettings::default(),
            lens: CineLens::default(),
            lens_state: LensState::default(),
            depth_of_field: DepthOfFieldOverrides::none(),
            focus_source: None,
            show_flags: ShowFlags::capture_default(),
            show_flag_overrides: Vec::new(),
            location: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            visible: true,
            camera_cut_this_frame: false,
            hidden_components: FxHashSet::default(),
            hidden_actors: FxHashSet::default(),
            show_only_components: FxHashSet::default(),
            show_only_actors: FxHashSet::default(),
            world: None,
            state: CaptureState::Idle,
            view_states: ViewStateSlot::new(allocator),
        }
    }

    /// Replace the settings (builder style)
    pub fn with_settings(mut self, settings: CaptureSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Replace the lens (builder style)
    pub fn with_lens(mut self, lens: CineLens) -> Self {
        self.lens = lens;
        self
    }

    /// Wrap into the shared form the scheduler works with
    pub fn into_shared(self) -> SharedCapture {
        Arc::new(Mutex::new(self))
    }

    // ===== GETTERS =====

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn settings(&self) -> &CaptureSettings {
        &self.settings
    }

    pub fn lens(&self) -> &CineLens {
        &self.lens
    }

    pub fn lens_mut(&mut self) -> &mut CineLens {
        &mut self.lens
    }

    pub fn lens_state(&self) -> &LensState {
        &self.lens_state
    }

    /// Depth-of-field overrides from the latest lens update
    pub fn depth_of_field(&self) -> &DepthOfFieldOverrides {
        &self.depth_of_field
    }

    pub fn show_flags(&self) -> ShowFlags {
        self.show_flags
    }

    pub fn location(&self) -> Vec3 {
        self.location
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn camera_cut_this_frame(&self) -> bool {
        self.camera_cut_this_frame
    }

    /// World the capture is registered with, if any
    pub fn world(&self) -> Option<WorldKey> {
        self.world
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn view_states(&self) -> &ViewStateSlot {
        &self.view_states
    }

    /// Current visibility filter (mode + lists)
    pub fn visibility_filter(&self) -> VisibilityFilter {
        VisibilityFilter {
            mode: self.settings.primitive_render_mode,
            hidden_components: self.hidden_components.clone(),
            hidden_actors: self.hidden_actors.clone(),
            show_only_components: self.show_only_components.clone(),
            show_only_actors: self.show_only_actors.clone(),
        }
    }

    // ===== SETTINGS =====

    pub fn set_capture_every_frame(&mut self, enabled: bool) {
        self.settings.capture_every_frame = enabled;
    }

    pub fn set_capture_on_movement(&mut self, enabled: bool) {
        self.settings.capture_on_movement = enabled;
    }

    pub fn set_persist_rendering_state(&mut self, enabled: bool) {
        self.settings.persist_rendering_state = enabled;
    }

    pub fn set_sort_priority(&mut self, priority: i32) {
        self.settings.sort_priority = priority;
    }

    pub fn set_primitive_render_mode(&mut self, mode: PrimitiveRenderMode) {
        self.settings.primitive_render_mode = mode;
    }

    pub fn set_projection(&mut self, projection: ProjectionMode) {
        self.settings.projection = projection;
    }

    pub fn set_custom_projection(&mut self, matrix: Option<glam::Mat4>) {
        self.settings.custom_projection = matrix;
    }

    pub fn set_clip_plane(&mut self, clip_plane: Option<ClipPlane>) {
        self.settings.clip_plane = clip_plane;
    }

    pub fn set_stereo_pass(&mut self, stereo_pass: StereoPass) {
        self.settings.stereo_pass = stereo_pass;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Flag a camera cut; cleared after the next render.
    pub fn set_camera_cut_this_frame(&mut self, cut: bool) {
        self.camera_cut_this_frame = cut;
    }

    /// Install a custom focus policy (`None` restores the lens' own settings).
    pub fn set_focus_source(&mut self, source: Option<Arc<dyn FocusDistanceSource>>) {
        self.focus_source = source;
    }

    /// Move the capture. Movement-triggered scheduling is done by
    /// `CaptureScheduler::notify_transform_updated`.
    pub fn set_transform(&mut self, location: Vec3, rotation: Quat) {
        self.location = location;
        self.rotation = rotation;
    }

    // ===== SHOW FLAGS =====

    /// Replace the stored show-flag overrides. Takes effect on `update_show_flags`.
    pub fn set_show_flag_overrides(&mut self, overrides: Vec<ShowFlagOverride>) {
        self.show_flag_overrides = overrides;
    }

    pub fn show_flag_overrides(&self) -> &[ShowFlagOverride] {
        &self.show_flag_overrides
    }

    /// Recompute show flags from `archetype` (or the capture default) and the overrides.
    pub fn update_show_flags(&mut self, archetype: Option<ShowFlags>) {
        let base = archetype.unwrap_or_else(ShowFlags::capture_default);
        self.show_flags = base.with_overrides(&self.show_flag_overrides);
    }

    // ===== VISIBILITY LISTS =====

    /// Hide a component from this capture
    pub fn hide_component(&mut self, component: ComponentId) {
        self.hidden_components.insert(component);
    }

    /// Hide every component of an actor from this capture
    pub fn hide_actor(&mut self, actor: ActorId) {
        self.hidden_actors.insert(actor);
    }

    /// Add a component to the show-only list (switches to `ShowOnlyList`)
    pub fn show_only_component(&mut self, component: ComponentId) {
        self.switch_to_show_only();
        self.show_only_components.insert(component);
    }

    /// Add an actor to the show-only list (switches to `ShowOnlyList`)
    pub fn show_only_actor(&mut self, actor: ActorId) {
        self.switch_to_show_only();
        self.show_only_actors.insert(actor);
    }

    fn switch_to_show_only(&mut self) {
        if self.settings.primitive_render_mode != PrimitiveRenderMode::ShowOnlyList {
            crate::cine_debug!("cine::SceneCapture",
                "Capture '{}' switched to ShowOnlyList by a show-only entry", self.name);
            self.settings.primitive_render_mode = PrimitiveRenderMode::ShowOnlyList;
        }
    }

    pub fn remove_show_only_component(&mut self, component: ComponentId) -> bool {
        self.show_only_components.remove(&component)
    }

    pub fn remove_show_only_actor(&mut self, actor: ActorId) -> bool {
        self.show_only_actors.remove(&actor)
    }

    /// Clear both show-only lists. The render mode is left unchanged.
    pub fn clear_show_only_components(&mut self) {
        self.show_only_components.clear();
        self.show_only_actors.clear();
    }

    pub fn clear_hidden_components(&mut self) {
        self.hidden_components.clear();
    }

    pub fn clear_hidden_actors(&mut self) {
        self.hidden_actors.clear();
    }

    // ===== LENS =====

    /// Run the lens simulation for this update and store the overrides.
    pub fn update_lens(&mut self, world_to_meters_scale: f32, delta_time: f32) -> DepthOfFieldOverrides {
        let focus: &dyn FocusDistanceSource = match &self.focus_source {
            Some(source) => source.as_ref(),
            None => &self.lens.focus_settings,
        };

        self.depth_of_field = LensSimulator::update(
            &self.lens,
            focus,
            self.location,
            world_to_meters_scale,
            delta_time,
            &mut self.lens_state,
        );
        self.depth_of_field
    }

    /// Snap focus on the next lens update.
    pub fn reset_lens_interpolation(&mut self) {
        self.lens_state.reset_interpolation();
    }

    // ===== VIEW STATES =====

    /// Whether view states survive between accesses
    pub fn requires_persistent_view_state(&self) -> bool {
        self.settings.requires_persistent_view_state()
    }

    /// View state for `view_index` under the current persistence policy.
    ///
    /// Returns `None` when neither every-frame capture nor persistence is on.
    pub fn view_state(&mut self, view_index: usize) -> Result<Option<ViewStateHandle>> {
        let persist = self.requires_persistent_view_state();
        self.view_states.get(view_index, persist)
    }

    /// Release every view state (deferred). Called on unregister.
    pub fn destroy_view_states(&mut self) {
        self.view_states.destroy_all();
    }

    /// Reference-collection hook: report objects kept alive by view states.
    pub fn add_referenced_objects(&self, collector: &mut dyn ReferenceCollector) {
        self.view_states.collect_references(collector);
    }

    // ===== RENDERING =====

    /// Snapshot of everything the renderer needs for this capture.
    pub fn capture_request(&self) -> CaptureRequest {
        let derived = self.lens.derived();
        CaptureRequest {
            name: self.name.clone(),
            location: self.location,
            rotation: self.rotation,
            projection: self.settings.projection,
            custom_projection: self.settings.custom_projection,
            field_of_view: derived.field_of_view,
            aspect_ratio: derived.aspect_ratio,
            near_clip_plane: self.settings.near_clip_plane,
            visibility: self.visibility_filter(),
            show_flags: self.show_flags,
            depth_of_field: self.depth_of_field,
            sort_priority: self.settings.sort_priority,
            capture_source: self.settings.capture_source,
            composite_mode: self.settings.composite_mode,
            lod_distance_factor: self.settings.lod_distance_factor,
            max_view_distance: self.settings.max_view_distance(),
            clip_plane: self.settings.clip_plane,
            stereo_pass: self.settings.stereo_pass,
            view_index: self.settings.stereo_pass.view_index(),
            camera_cut: self.camera_cut_this_frame,
            profiling_event_name: self.settings.profiling_event_name.clone(),
        }
    }

    /// Request snapshot plus view-state access for one render.
    pub(crate) fn begin_render(&mut self) -> (CaptureRequest, ViewStateAccess<'_>) {
        self.state = CaptureState::Rendering;
        let request = self.capture_request();
        let access = ViewStateAccess {
            persist: self.settings.requires_persistent_view_state(),
            slot: &mut self.view_states,
        };
        (request, access)
    }

    /// Leave `Rendering` for `next`; the camera cut only applies once.
    ///
    /// A flush passes `Idle`. A manual capture passes the state it found,
    /// so a capture still queued for its world stays `PendingFlush`.
    pub(crate) fn end_render(&mut self, next: CaptureState) {
        self.camera_cut_this_frame = false;
        self.state = next;
    }

    pub(crate) fn set_state(&mut self, state: CaptureState) {
        self.state = state;
    }

    pub(crate) fn attach_world(&mut self, world: WorldKey) {
        self.world = Some(world);
    }

    pub(crate) fn detach_world(&mut self) {
        self.world = None;
        self.state = CaptureState::Idle;
    }
}

#[cfg(test)]
#[path = "scene_capture_tests.rs"]
mod tests;
