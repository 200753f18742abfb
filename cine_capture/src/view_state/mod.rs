//! View state module — persistent renderer-side state per capture view.
//!
//! A view state holds data the renderer keeps between frames for one
//! logical view of one capture (occlusion history, temporal history for
//! motion blur / TAA). Captures own them through a `ViewStateSlot`; the
//! renderer may still be reading a handle after the capture lets go of it,
//! so every release goes through the allocator's deferred path.

mod view_state;
mod deferred_release;
mod view_state_pool;
mod view_state_slot;

pub use view_state::{
    ViewState, ViewStateHandle, ViewStateAllocator, ReferenceCollector, ObjectId,
};
pub use deferred_release::DeferredReleaseQueue;
pub use view_state_pool::{
    ViewStatePool, ViewStatePoolConfig, SceneViewState, TemporalHistory,
};
pub use view_state_slot::ViewStateSlot;
