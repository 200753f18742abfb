/// Focus/lens simulation.
///
/// Turns a `CineLens` plus a desired focus distance into depth-of-field
/// overrides for one capture update. The only mutable state is the
/// `LensState` owned by the capture (last focus distance and the
/// interpolation reset flag).

use glam::Vec3;
use super::cine_lens::{CineLens, DepthOfFieldMethod, FocusDistanceSource, FocusMethod};

/// Squared distance below which interpolation snaps to the target.
const INTERP_SNAP_THRESHOLD_SQ: f32 = 1.0e-8;

/// Per-capture focus smoothing state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LensState {
    /// Focus distance produced by the latest update (world units)
    pub current_focus_distance: f32,
    /// Focus distance smoothing starts from on the next update
    pub last_focus_distance: f32,
    /// When set, the next update snaps to its target
    pub reset_interpolation: bool,
}

impl Default for LensState {
    /// A fresh state snaps on its first update.
    fn default() -> Self {
        Self {
            current_focus_distance: 0.0,
            last_focus_distance: 0.0,
            reset_interpolation: true,
        }
    }
}

impl LensState {
    /// Request that the next update skips smoothing (e.g. after a camera cut).
    pub fn reset_interpolation(&mut self) {
        self.reset_interpolation = true;
    }
}

/// Depth-of-field overrides handed to the renderer.
///
/// Each field is `Some` when the capture overrides that post-process
/// setting and `None` when the renderer keeps its own value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DepthOfFieldOverrides {
    pub method: Option<DepthOfFieldMethod>,
    pub fstop: Option<f32>,
    pub focal_distance: Option<f32>,
    pub sensor_width: Option<f32>,
}

impl DepthOfFieldOverrides {
    /// No override at all (focus method `None`).
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether any setting is overridden.
    pub fn is_active(&self) -> bool {
        self.method.is_some()
            || self.fstop.is_some()
            || self.focal_distance.is_some()
            || self.sensor_width.is_some()
    }
}

/// Move `current` toward `target` at `interp_speed`, scaled by `delta_time`.
///
/// A non-positive speed snaps to the target. The step fraction is clamped
/// to `[0, 1]`, so the result never overshoots.
pub fn interp_to(current: f32, target: f32, delta_time: f32, interp_speed: f32) -> f32 {
    if interp_speed <= 0.0 {
        return target;
    }

    let dist = target - current;
    if dist * dist < INTERP_SNAP_THRESHOLD_SQ {
        return target;
    }

    let alpha = (delta_time * interp_speed).clamp(0.0, 1.0);
    current + dist * alpha
}

/// Focus/lens simulator. Stateless: all persistent data lives in `LensState`.
pub struct LensSimulator;

impl LensSimulator {
    /// Compute depth-of-field overrides for one update and advance `state`.
    ///
    /// # Arguments
    ///
    /// * `lens` - Lens configuration of the capture
    /// * `focus` - Desired focus distance source (usually `lens.focus_settings`)
    /// * `location` - Current world location of the capture
    /// * `world_to_meters_scale` - World units per meter
    /// * `delta_time` - Seconds since the previous world tick
    /// * `state` - Smoothing state, updated in place
    pub fn update(
        lens: &CineLens,
        focus: &dyn FocusDistanceSource,
        location: Vec3,
        world_to_meters_scale: f32,
        delta_time: f32,
        state: &mut LensState,
    ) -> DepthOfFieldOverrides {
        let derived = lens.derived();
        let focus_settings = &lens.focus_settings;

        let overrides = if focus_settings.method == FocusMethod::None {
            DepthOfFieldOverrides::none()
        } else {
            let min_focus_distance = lens.minimum_focus_distance_world(world_to_meters_scale);
            let desired = focus.desired_focus_distance(location);
            if desired < min_focus_distance {
                crate::cine_trace!("cine::Lens",
                    "Focus distance {} below lens minimum, clamped to {}", desired, min_focus_distance);
            }
            let mut focus_distance = desired.max(min_focus_distance);

            if focus_settings.smooth_focus_changes && !state.reset_interpolation {
                focus_distance = interp_to(
                    state.last_focus_distance,
                    focus_distance,
                    delta_time,
                    focus_settings.focus_smoothing_interp_speed,
                );
            }

            state.current_focus_distance = focus_distance;
            state.last_focus_distance = focus_distance;

            DepthOfFieldOverrides {
                method: Some(lens.depth_of_field_method),
                fstop: Some(derived.aperture),
                focal_distance: Some(focus_distance),
                sensor_width: Some(lens.filmback.sensor_width),
            }
        };

        state.reset_interpolation = false;
        overrides
    }
}

#[cfg(test)]
#[path = "lens_simulator_tests.rs"]
mod tests;
