//! Lens module — cine lens configuration and focus simulation.
//!
//! `CineLens` is passive configuration (filmback, lens limits, focus
//! settings). `LensSimulator` turns it into per-frame depth-of-field
//! overrides, smoothing focus changes over time through a `LensState`
//! owned by each capture.

mod cine_lens;
mod lens_simulator;

pub use cine_lens::{
    CineLens, Filmback, LensSettings, LensDerivedData,
    FocusMethod, FocusSettings, TrackingFocusSettings,
    FocusDistanceSource, DepthOfFieldMethod,
};
pub use lens_simulator::{
    LensSimulator, LensState, DepthOfFieldOverrides, interp_to,
};
