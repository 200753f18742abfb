/// View-state traits shared by captures and renderers.
///
/// The capture side only ever holds `ViewStateHandle`s and hands them
/// back to a `ViewStateAllocator` for release. What a view state contains
/// is the renderer's business.

use std::sync::Arc;
use glam::Mat4;
use crate::error::Result;

/// Identity of a garbage-collected object kept alive by a view state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

/// Receives the objects a view state references during a collection pass.
pub trait ReferenceCollector {
    fn add_referenced_object(&mut self, object: ObjectId);
}

/// Persistent renderer state for one view of one capture.
///
/// Shared between the thread that owns the capture and the renderer,
/// hence `Send + Sync` and `&self` methods.
pub trait ViewState: Send + Sync {
    /// Unique id assigned by the allocator.
    fn id(&self) -> u64;

    /// Number of frames recorded since allocation (or the last camera cut).
    fn frame_index(&self) -> u64;

    /// View-projection of the previously recorded frame, if any.
    fn previous_view_projection(&self) -> Option<Mat4>;

    /// Record a rendered frame. A camera cut discards the temporal history first.
    fn record_frame(&self, view_projection: Mat4, camera_cut: bool);

    /// Keep `object` alive for as long as this state exists.
    ///
    /// Called by the renderer while drawing (textures, cached meshes).
    fn add_referenced_object(&self, object: ObjectId);

    /// Report every object this state keeps alive.
    fn add_referenced_objects(&self, collector: &mut dyn ReferenceCollector);
}

/// Shared handle to a view state.
pub type ViewStateHandle = Arc<dyn ViewState>;

/// Renderer-side allocator for view states.
pub trait ViewStateAllocator: Send + Sync {
    /// Allocate a fresh view state.
    ///
    /// # Errors
    ///
    /// Returns an error if the renderer cannot provide another state.
    fn allocate_view_state(&self) -> Result<ViewStateHandle>;

    /// Give a view state back.
    ///
    /// Must not free the state while the renderer may still read it;
    /// implementations defer the actual release until it is safe.
    fn release_view_state(&self, handle: ViewStateHandle);
}
