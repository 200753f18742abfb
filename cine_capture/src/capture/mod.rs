//! Capture module — scene capture configuration and per-capture state.
//!
//! A `SceneCapture` is a camera-like object that renders a view of its
//! world into an offscreen target. It is owned by its host (behind an
//! `Arc<Mutex<_>>`); the scheduler only ever keeps weak references.

mod settings;
mod capture_request;
mod scene_capture;

pub use settings::{
    CaptureSettings, PrimitiveRenderMode, ProjectionMode, CaptureSource,
    CompositeMode, StereoPass, ClipPlane, ShowFlags, ShowFlagOverride,
};
pub use capture_request::{CaptureRequest, VisibilityFilter, ComponentId, ActorId};
pub use scene_capture::{SceneCapture, SharedCapture, CaptureState, ViewStateAccess};
