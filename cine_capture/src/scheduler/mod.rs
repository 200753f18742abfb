//! Scheduler module — deferred capture registration and per-world flush.
//!
//! Worlds are registered with a `CaptureScheduler` and identified by a
//! `WorldKey`. Captures queue themselves through the scheduler into the
//! `DeferredCaptureRegistry`; the host flushes each world once per frame.

mod world;
mod registry;
mod capture_scheduler;
#[cfg(test)]
pub(crate) mod mock_world;

pub use world::{WorldKey, CaptureWorld};
pub use registry::DeferredCaptureRegistry;
pub use capture_scheduler::{CaptureScheduler, FlushStats};
