/// Frame-fenced deferred release of view states.
///
/// The owning thread releases a handle while the renderer may still be
/// processing frames that reference it. The queue tags each release with
/// the latest submitted frame and keeps the handle alive until the
/// renderer reports that frame as completed. Dropping the queue's `Arc`
/// then frees the state unless the renderer itself still holds a clone.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use super::view_state::ViewStateHandle;

struct PendingRelease {
    /// Last frame that may reference the handle
    fence: u64,
    handle: ViewStateHandle,
}

/// Holds released view states until the renderer has moved past them.
pub struct DeferredReleaseQueue {
    /// Ordered by fence (read from a monotonic counter under this lock)
    pending: Mutex<VecDeque<PendingRelease>>,
    submitted_frame: AtomicU64,
    completed_frame: AtomicU64,
}

impl DeferredReleaseQueue {
    /// Create an empty queue with no frame in flight
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(VecDeque::new()),
            submitted_frame: AtomicU64::new(0),
            completed_frame: AtomicU64::new(0),
        }
    }

    /// Mark the start of a new renderer frame and return its number.
    pub fn begin_frame(&self) -> u64 {
        self.submitted_frame.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Latest frame handed to the renderer
    pub fn submitted_frame(&self) -> u64 {
        self.submitted_frame.load(Ordering::Acquire)
    }

    /// Latest frame the renderer has finished
    pub fn completed_frame(&self) -> u64 {
        self.completed_frame.load(Ordering::Acquire)
    }

    /// Release a handle once every in-flight frame has completed.
    ///
    /// With no frame in flight the handle is dropped immediately.
    pub fn release(&self, handle: ViewStateHandle) {
        // Fences are read under the lock so the queue stays sorted by fence.
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let fence = self.submitted_frame();
        if fence <= self.completed_frame() {
            drop(pending);
            drop(handle);
            return;
        }
        pending.push_back(PendingRelease { fence, handle });
    }

    /// Renderer notification: `frame` and every earlier frame are done.
    ///
    /// Returns the number of handles dropped.
    pub fn frame_completed(&self, frame: u64) -> usize {
        self.completed_frame.fetch_max(frame, Ordering::AcqRel);
        let completed = self.completed_frame();

        let retired: Vec<PendingRelease> = {
            let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
            let (ready, waiting): (VecDeque<_>, VecDeque<_>) =
                pending.drain(..).partition(|p| p.fence <= completed);
            *pending = waiting;
            ready.into()
        };

        retired.len()
    }

    /// Drop every pending handle regardless of fences.
    ///
    /// Only valid once the renderer is idle (shutdown).
    pub fn release_all_now(&self) -> usize {
        let retired: Vec<PendingRelease> = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();
        retired.len()
    }

    /// Number of handles waiting for their fence
    pub fn pending_count(&self) -> usize {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Default for DeferredReleaseQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "deferred_release_tests.rs"]
mod tests;
