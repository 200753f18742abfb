/// World collaborator consumed by the scheduler.
///
/// The host application implements `CaptureWorld` for each scene it wants
/// captures rendered in, then registers it with `CaptureScheduler`.

use slotmap::new_key_type;
use crate::capture::{CaptureRequest, SceneCapture, ViewStateAccess};

new_key_type! {
    /// Stable key for a world registered with a `CaptureScheduler`
    pub struct WorldKey;
}

/// A scene that captures render into.
///
/// Implementations are shared with the scheduler (`Arc<dyn CaptureWorld>`)
/// and may be queried from several update threads at once.
pub trait CaptureWorld: Send + Sync {
    /// Whether the world currently has a scene to render
    fn has_active_scene(&self) -> bool;

    /// Whether `capture` is visible in this world right now
    ///
    /// Defaults to the capture's own visibility flag.
    fn is_capture_visible(&self, capture: &SceneCapture) -> bool {
        capture.is_visible()
    }

    /// Seconds elapsed since the previous world tick
    fn delta_time_seconds(&self) -> f32;

    /// World units per meter
    fn world_to_meters_scale(&self) -> f32 {
        100.0
    }

    /// Block until every queued per-frame scene update has been applied
    fn finish_pending_updates(&self);

    /// Render one capture.
    ///
    /// Failures stay on the renderer side; nothing is reported back.
    ///
    /// # Arguments
    ///
    /// * `request` - Snapshot of the capture's configuration for this render
    /// * `view_states` - Persistent view states of the capture, by view index
    fn render_capture(&self, request: &CaptureRequest, view_states: &mut ViewStateAccess<'_>);
}
