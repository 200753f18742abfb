/// DeferredCaptureRegistry - captures waiting for their world's flush.
///
/// Maps each world to the captures that asked to render this frame. The
/// registry never owns a capture: entries are `Weak` references, so a
/// capture destroyed before the flush is simply skipped.

use std::cmp::Reverse;
use std::sync::{Arc, Mutex, PoisonError, Weak};
use rustc_hash::FxHashMap;
use crate::capture::{SceneCapture, SharedCapture};
use super::world::WorldKey;

/// Pending captures, per world, in insertion order.
pub struct DeferredCaptureRegistry {
    pending: Mutex<FxHashMap<WorldKey, Vec<Weak<Mutex<SceneCapture>>>>>,
}

impl DeferredCaptureRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(FxHashMap::default()),
        }
    }

    /// Queue `capture` for the next flush of `world`.
    ///
    /// Idempotent within a flush cycle. Safe to call from several threads;
    /// the lock is held for the insert only.
    ///
    /// # Returns
    ///
    /// `true` if the capture was added, `false` if it was already pending.
    pub fn request_capture(&self, world: WorldKey, capture: &SharedCapture) -> bool {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let entries = pending.entry(world).or_default();

        let target = Arc::as_ptr(capture);
        if entries.iter().any(|entry| std::ptr::eq(entry.as_ptr(), target)) {
            return false;
        }

        entries.push(Arc::downgrade(capture));
        true
    }

    /// Remove and return every capture pending for `world`.
    ///
    /// Destroyed captures are dropped from the result. The rest are sorted by
    /// descending sort priority; equal priorities keep insertion order.
    pub fn drain(&self, world: WorldKey) -> Vec<SharedCapture> {
        self.drain_counted(world).0
    }

    /// `drain` plus the number of destroyed captures that were skipped.
    pub(crate) fn drain_counted(&self, world: WorldKey) -> (Vec<SharedCapture>, usize) {
        let entries = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&world)
            .unwrap_or_default();

        let total = entries.len();
        let mut live: Vec<(i32, SharedCapture)> = entries
            .iter()
            .filter_map(Weak::upgrade)
            .map(|capture| {
                let priority = capture
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .settings()
                    .sort_priority;
                (priority, capture)
            })
            .collect();
        let stale = total - live.len();

        // Stable sort: ties stay in insertion order
        live.sort_by_key(|(priority, _)| Reverse(*priority));

        if stale > 0 {
            crate::cine_trace!("cine::Registry",
                "Skipped {} destroyed capture(s) while draining", stale);
        }

        (live.into_iter().map(|(_, capture)| capture).collect(), stale)
    }

    /// Drop everything pending for `world` without rendering it.
    ///
    /// # Returns
    ///
    /// Number of entries discarded (live or stale).
    pub fn discard_world(&self, world: WorldKey) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&world)
            .map_or(0, |entries| entries.len())
    }

    /// Keep only worlds for which `keep` returns true, and prune destroyed
    /// captures from the remaining ones.
    pub fn retain_worlds(&self, mut keep: impl FnMut(WorldKey) -> bool) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending.retain(|world, entries| {
            if !keep(*world) {
                return false;
            }
            entries.retain(|entry| entry.strong_count() > 0);
            !entries.is_empty()
        });
    }

    /// Number of entries pending for `world` (stale entries included)
    pub fn pending_count(&self, world: WorldKey) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&world)
            .map_or(0, Vec::len)
    }

    /// Number of worlds with at least one pending entry
    pub fn world_count(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|entries| !entries.is_empty())
            .count()
    }
}

impl Default for DeferredCaptureRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
