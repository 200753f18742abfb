/// View-state pool - the crate's concrete `ViewStateAllocator`.
///
/// Allocates `SceneViewState`s and routes releases through a
/// `DeferredReleaseQueue`. Live states are counted so hosts can check
/// that released states are actually freed once the renderer catches up.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use glam::Mat4;
use crate::error::{Error, Result};
use super::deferred_release::DeferredReleaseQueue;
use super::view_state::{
    ObjectId, ReferenceCollector, ViewState, ViewStateAllocator, ViewStateHandle,
};

/// Pool configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewStatePoolConfig {
    /// Upper bound on simultaneously live states (`None` = unlimited).
    /// States waiting in the release queue still count as live.
    pub max_live_states: Option<usize>,
}

/// Temporal history kept for motion blur and temporal filtering.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TemporalHistory {
    pub previous_view_projection: Option<Mat4>,
    pub frame_index: u64,
    /// Frames since the last camera cut, used to trust occlusion queries
    pub occlusion_frame_counter: u32,
}

/// Renderer state for one capture view.
pub struct SceneViewState {
    id: u64,
    history: Mutex<TemporalHistory>,
    referenced_objects: Mutex<Vec<ObjectId>>,
    live_counter: Arc<AtomicUsize>,
}

impl SceneViewState {
    /// Build a state for a slot already reserved in `live_counter`.
    fn new(id: u64, live_counter: Arc<AtomicUsize>) -> Self {
        Self {
            id,
            history: Mutex::new(TemporalHistory::default()),
            referenced_objects: Mutex::new(Vec::new()),
            live_counter,
        }
    }

    /// Snapshot of the temporal history
    pub fn history(&self) -> TemporalHistory {
        *self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ViewState for SceneViewState {
    fn id(&self) -> u64 {
        self.id
    }

    fn frame_index(&self) -> u64 {
        self.history().frame_index
    }

    fn previous_view_projection(&self) -> Option<Mat4> {
        self.history().previous_view_projection
    }

    fn record_frame(&self, view_projection: Mat4, camera_cut: bool) {
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        if camera_cut {
            *history = TemporalHistory::default();
        }
        history.previous_view_projection = Some(view_projection);
        history.frame_index += 1;
        history.occlusion_frame_counter = history.occlusion_frame_counter.saturating_add(1);
    }

    fn add_referenced_object(&self, object: ObjectId) {
        let mut objects = self.referenced_objects.lock().unwrap_or_else(PoisonError::into_inner);
        if !objects.contains(&object) {
            objects.push(object);
        }
    }

    fn add_referenced_objects(&self, collector: &mut dyn ReferenceCollector) {
        let objects = self.referenced_objects.lock().unwrap_or_else(PoisonError::into_inner);
        for object in objects.iter() {
            collector.add_referenced_object(*object);
        }
    }
}

impl Drop for SceneViewState {
    fn drop(&mut self) {
        self.live_counter.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Allocator handing out `SceneViewState`s with frame-fenced release.
pub struct ViewStatePool {
    config: ViewStatePoolConfig,
    release_queue: DeferredReleaseQueue,
    next_id: AtomicU64,
    live_counter: Arc<AtomicUsize>,
    shut_down: AtomicBool,
}

impl ViewStatePool {
    /// Create a pool with the given configuration
    pub fn new(config: ViewStatePoolConfig) -> Self {
        Self {
            config,
            release_queue: DeferredReleaseQueue::new(),
            next_id: AtomicU64::new(1),
            live_counter: Arc::new(AtomicUsize::new(0)),
            shut_down: AtomicBool::new(false),
        }
    }

    /// Number of states not yet freed (including those awaiting their fence)
    pub fn live_count(&self) -> usize {
        self.live_counter.load(Ordering::Acquire)
    }

    /// Number of released states waiting for the renderer
    pub fn pending_release_count(&self) -> usize {
        self.release_queue.pending_count()
    }

    /// Renderer notification: a new frame was submitted
    pub fn begin_frame(&self) -> u64 {
        self.release_queue.begin_frame()
    }

    /// Renderer notification: `frame` has completed on the renderer
    pub fn frame_completed(&self, frame: u64) -> usize {
        let released = self.release_queue.frame_completed(frame);
        if released > 0 {
            crate::cine_trace!("cine::ViewStatePool",
                "Frame {} completed, dropped {} view state(s)", frame, released);
        }
        released
    }

    /// Drop all pending releases and refuse further allocations.
    ///
    /// Call only once the renderer is idle.
    pub fn shutdown(&self) -> usize {
        self.shut_down.store(true, Ordering::Release);
        self.release_queue.release_all_now()
    }

    /// The pool's release queue
    pub fn release_queue(&self) -> &DeferredReleaseQueue {
        &self.release_queue
    }
}

impl Default for ViewStatePool {
    fn default() -> Self {
        Self::new(ViewStatePoolConfig::default())
    }
}

impl ViewStateAllocator for ViewStatePool {
    fn allocate_view_state(&self) -> Result<ViewStateHandle> {
        if self.shut_down.load(Ordering::Acquire) {
            return Err(Error::InvalidState("view state pool is shut down".to_string()));
        }
        // Reserve the slot before building the state so concurrent
        // allocations cannot overshoot the limit.
        let max = self.config.max_live_states;
        let reserved = self.live_counter.fetch_update(Ordering::AcqRel, Ordering::Acquire, |live| {
            match max {
                Some(max) if live >= max => None,
                _ => Some(live + 1),
            }
        });
        if reserved.is_err() {
            crate::cine_warn!("cine::ViewStatePool",
                "View state limit reached ({} live)", max.unwrap_or_default());
            return Err(Error::OutOfMemory);
        }

        let id = self.next_id.fetch_add(1, Ordering::AcqRel);
        let state = SceneViewState::new(id, self.live_counter.clone());
        crate::cine_trace!("cine::ViewStatePool", "Allocated view state {}", id);
        Ok(Arc::new(state))
    }

    fn release_view_state(&self, handle: ViewStateHandle) {
        crate::cine_trace!("cine::ViewStatePool", "Released view state {}", handle.id());
        self.release_queue.release(handle);
    }
}

#[cfg(test)]
#[path = "view_state_pool_tests.rs"]
mod tests;
