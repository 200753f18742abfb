/// Per-capture view-state slot.
///
/// Holds one optional view state per logical view (0 = mono/left eye,
/// 1 = right eye, ...). Whether a view keeps its state is decided on each
/// access from the capture's persistence policy; states that are no longer
/// wanted go back to the allocator for deferred release.

use std::sync::Arc;
use crate::error::Result;
use super::view_state::{ReferenceCollector, ViewStateAllocator, ViewStateHandle};

/// Ordered view states of a single capture, indexed by view index.
pub struct ViewStateSlot {
    states: Vec<Option<ViewStateHandle>>,
    allocator: Arc<dyn ViewStateAllocator>,
}

impl ViewStateSlot {
    /// Create an empty slot that allocates from `allocator`
    pub fn new(allocator: Arc<dyn ViewStateAllocator>) -> Self {
        Self {
            states: Vec::new(),
            allocator,
        }
    }

    /// Get the view state for `view_index`, applying the persistence policy.
    ///
    /// - Grows the slot to cover `view_index` (new entries are empty).
    /// - `persist` and no state: allocates one.
    /// - `!persist` and a state: releases it and returns `None`.
    /// - Otherwise returns what is there.
    ///
    /// # Errors
    ///
    /// Propagates allocator failures. The slot is left unchanged in that case.
    pub fn get(&mut self, view_index: usize, persist: bool) -> Result<Option<ViewStateHandle>> {
        if view_index >= self.states.len() {
            self.states.resize_with(view_index + 1, || None);
        }

        let entry = &mut self.states[view_index];
        match (persist, entry.is_some()) {
            (true, false) => {
                let handle = self.allocator.allocate_view_state()?;
                crate::cine_trace!("cine::ViewStateSlot",
                    "View {} allocated state {}", view_index, handle.id());
                *entry = Some(handle.clone());
                Ok(Some(handle))
            }
            (false, true) => {
                if let Some(handle) = entry.take() {
                    crate::cine_trace!("cine::ViewStateSlot",
                        "View {} no longer persistent, releasing state {}", view_index, handle.id());
                    self.allocator.release_view_state(handle);
                }
                Ok(None)
            }
            _ => Ok(entry.clone()),
        }
    }

    /// View state at `view_index` without applying the policy
    pub fn peek(&self, view_index: usize) -> Option<&ViewStateHandle> {
        self.states.get(view_index).and_then(|s| s.as_ref())
    }

    /// Number of view indices covered (live or empty)
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether no view index has been accessed yet
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Number of live view states
    pub fn live_count(&self) -> usize {
        self.states.iter().filter(|s| s.is_some()).count()
    }

    /// Release every view state (capture teardown). Empty entries are skipped.
    pub fn destroy_all(&mut self) {
        for entry in self.states.iter_mut() {
            if let Some(handle) = entry.take() {
                self.allocator.release_view_state(handle);
            }
        }
    }

    /// Report objects referenced by every live view state.
    ///
    /// Must be called from the owning capture's own reference-collection pass.
    pub fn collect_references(&self, collector: &mut dyn ReferenceCollector) {
        for handle in self.states.iter().flatten() {
            handle.add_referenced_objects(collector);
        }
    }
}

impl Drop for ViewStateSlot {
    fn drop(&mut self) {
        self.destroy_all();
    }
}

#[cfg(test)]
#[path = "view_state_slot_tests.rs"]
mod tests;
