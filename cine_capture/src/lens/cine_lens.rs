/// Cine lens configuration.
///
/// Passive data describing a physical camera body and lens: sensor
/// (filmback), focal/aperture limits, and how focus is chosen. Derived
/// optics (field of view, aspect ratio) are computed on demand by
/// `CineLens::derived()` and never stored.

use glam::Vec3;

// ===== FILMBACK =====

/// Sensor dimensions in millimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Filmback {
    /// Horizontal size of the sensor (mm)
    pub sensor_width: f32,
    /// Vertical size of the sensor (mm)
    pub sensor_height: f32,
}

impl Default for Filmback {
    /// Super 35 style 4:3 sensor.
    fn default() -> Self {
        Self {
            sensor_width: 24.89,
            sensor_height: 18.67,
        }
    }
}

// ===== LENS SETTINGS =====

/// Physical limits of the mounted lens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LensSettings {
    /// Shortest focal length (mm)
    pub min_focal_length: f32,
    /// Longest focal length (mm)
    pub max_focal_length: f32,
    /// Widest aperture (smallest f-stop)
    pub min_fstop: f32,
    /// Narrowest aperture (largest f-stop)
    pub max_fstop: f32,
    /// Closest distance the lens can focus at (mm)
    pub minimum_focus_distance: f32,
}

impl Default for LensSettings {
    fn default() -> Self {
        Self {
            min_focal_length: 4.0,
            max_focal_length: 1000.0,
            min_fstop: 1.2,
            max_fstop: 22.0,
            minimum_focus_distance: 15.0,
        }
    }
}

// ===== FOCUS SETTINGS =====

/// How the focus distance is chosen each update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusMethod {
    /// No depth of field: all lens overrides are disabled
    None,
    /// Fixed distance (`FocusSettings::manual_focus_distance`)
    #[default]
    Manual,
    /// Distance to a tracked point
    Tracking,
}

/// Tracking focus target.
///
/// When `tracked_location` is `None`, `relative_offset` is used as a
/// world-space position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrackingFocusSettings {
    /// World location of the tracked object, if any
    pub tracked_location: Option<Vec3>,
    /// Offset from the tracked object (or world position when untracked)
    pub relative_offset: Vec3,
}

/// Focus configuration of a cine lens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusSettings {
    pub method: FocusMethod,
    /// Focus distance for `FocusMethod::Manual` (world units)
    pub manual_focus_distance: f32,
    pub tracking: TrackingFocusSettings,
    /// Interpolate toward the desired distance instead of snapping
    pub smooth_focus_changes: bool,
    /// Interpolation speed used when smoothing (1/s)
    pub focus_smoothing_interp_speed: f32,
    /// Added to the desired distance after it is computed (world units)
    pub focus_offset: f32,
}

impl Default for FocusSettings {
    fn default() -> Self {
        Self {
            method: FocusMethod::Manual,
            manual_focus_distance: 100_000.0,
            tracking: TrackingFocusSettings::default(),
            smooth_focus_changes: false,
            focus_smoothing_interp_speed: 8.0,
            focus_offset: 0.0,
        }
    }
}

/// Supplies the raw (unclamped) desired focus distance for a location.
///
/// `FocusSettings` implements this for the built-in focus methods. Hosts
/// with their own focus policy (autofocus, scripted pulls) install a
/// custom source on the capture instead.
pub trait FocusDistanceSource: Send + Sync {
    /// Desired focus distance, in world units, from `location`.
    fn desired_focus_distance(&self, location: Vec3) -> f32;
}

impl FocusDistanceSource for FocusSettings {
    fn desired_focus_distance(&self, location: Vec3) -> f32 {
        let distance = match self.method {
            FocusMethod::None => 0.0,
            FocusMethod::Manual => self.manual_focus_distance,
            FocusMethod::Tracking => {
                let target = match self.tracking.tracked_location {
                    Some(tracked) => tracked + self.tracking.relative_offset,
                    None => self.tracking.relative_offset,
                };
                location.distance(target)
            }
        };
        distance + self.focus_offset
    }
}

// ===== CINE LENS =====

/// Depth-of-field algorithm requested from the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthOfFieldMethod {
    #[default]
    Gaussian,
    Bokeh,
    CircleOfConfusion,
}

/// Optics derived from a `CineLens` (clamped to the lens limits).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LensDerivedData {
    /// Focal length after clamping (mm)
    pub focal_length: f32,
    /// Aperture after clamping (f-stop)
    pub aperture: f32,
    /// Horizontal field of view (degrees)
    pub field_of_view: f32,
    /// Sensor aspect ratio (width / height)
    pub aspect_ratio: f32,
}

/// Complete cine lens configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CineLens {
    pub filmback: Filmback,
    pub lens_settings: LensSettings,
    pub focus_settings: FocusSettings,
    /// Requested focal length (mm), clamped by `derived()`
    pub current_focal_length: f32,
    /// Requested aperture (f-stop), clamped by `derived()`
    pub current_aperture: f32,
    pub depth_of_field_method: DepthOfFieldMethod,
}

impl Default for CineLens {
    fn default() -> Self {
        Self {
            filmback: Filmback::default(),
            lens_settings: LensSettings::default(),
            focus_settings: FocusSettings::default(),
            current_focal_length: 35.0,
            current_aperture: 2.8,
            depth_of_field_method: DepthOfFieldMethod::default(),
        }
    }
}

impl CineLens {
    /// Compute clamped focal length/aperture, field of view and aspect ratio.
    pub fn derived(&self) -> LensDerivedData {
        let lens = &self.lens_settings;
        let focal_length = self.current_focal_length
            .clamp(lens.min_focal_length, lens.max_focal_length.max(lens.min_focal_length));
        let aperture = self.current_aperture
            .clamp(lens.min_fstop, lens.max_fstop.max(lens.min_fstop));

        let field_of_view = if focal_length > 0.0 {
            (2.0 * (self.filmback.sensor_width / (2.0 * focal_length)).atan()).to_degrees()
        } else {
            0.0
        };

        let aspect_ratio = if self.filmback.sensor_height > 0.0 {
            self.filmback.sensor_width / self.filmback.sensor_height
        } else {
            0.0
        };

        LensDerivedData {
            focal_length,
            aperture,
            field_of_view,
            aspect_ratio,
        }
    }

    /// Minimum focus distance converted from millimeters to world units.
    pub fn minimum_focus_distance_world(&self, world_to_meters_scale: f32) -> f32 {
        self.lens_settings.minimum_focus_distance * (world_to_meters_scale / 1000.0)
    }
}

#[cfg(test)]
#[path = "cine_lens_tests.rs"]
mod tests;
