/// CaptureScheduler - decides when captures render.
///
/// Captures are queued (Idle → PendingFlush) from ticks, movement events or
/// explicit requests, possibly from several threads. Once per frame the
/// host calls `flush_world`, which renders everything queued for that world
/// in priority order (PendingFlush → Rendering → Idle).
///
/// Lock order is always capture, then registry. The registry lock is never
/// held while a capture is locked by the flush.

use std::sync::{Arc, PoisonError, RwLock};
use slotmap::SlotMap;
use glam::{Quat, Vec3};
use crate::capture::{CaptureState, SceneCapture, SharedCapture};
use crate::error::{Error, Result};
use super::registry::DeferredCaptureRegistry;
use super::world::{CaptureWorld, WorldKey};

/// Outcome of one `flush_world` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlushStats {
    /// Captures rendered, in priority order
    pub rendered: usize,
    /// Pending entries skipped (capture destroyed or detached before the flush)
    pub skipped_stale: usize,
}

/// Owns the registered worlds and the deferred capture registry.
pub struct CaptureScheduler {
    worlds: RwLock<SlotMap<WorldKey, Arc<dyn CaptureWorld>>>,
    registry: DeferredCaptureRegistry,
}

impl CaptureScheduler {
    /// Create a scheduler with no worlds
    pub fn new() -> Self {
        Self {
            worlds: RwLock::new(SlotMap::with_key()),
            registry: DeferredCaptureRegistry::new(),
        }
    }

    // ===== WORLDS =====

    /// Register a world and return its key
    pub fn register_world(&self, world: Arc<dyn CaptureWorld>) -> WorldKey {
        let key = self
            .worlds
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(world);
        crate::cine_debug!("cine::Scheduler", "Registered world {:?}", key);
        key
    }

    /// Unregister a world, discarding its pending captures.
    ///
    /// Captures still attached to it become silent no-ops until re-registered.
    ///
    /// # Returns
    ///
    /// `false` if the key was unknown.
    pub fn unregister_world(&self, key: WorldKey) -> bool {
        let removed = self
            .worlds
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .is_some();

        let discarded = self.registry.discard_world(key);
        if removed {
            crate::cine_debug!("cine::Scheduler",
                "Unregistered world {:?} ({} pending capture(s) discarded)", key, discarded);
        }
        removed
    }

    /// The world registered under `key`
    pub fn world(&self, key: WorldKey) -> Option<Arc<dyn CaptureWorld>> {
        self.worlds
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Number of registered worlds
    pub fn world_count(&self) -> usize {
        self.worlds.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// The deferred capture registry
    pub fn registry(&self) -> &DeferredCaptureRegistry {
        &self.registry
    }

    /// Number of captures pending for `key` (stale entries included)
    pub fn pending_count(&self, key: WorldKey) -> usize {
        self.registry.pending_count(key)
    }

    /// Drop pending entries of unregistered worlds and destroyed captures.
    pub fn prune_stale(&self) {
        let worlds = self.worlds.read().unwrap_or_else(PoisonError::into_inner);
        self.registry.retain_worlds(|key| worlds.contains_key(key));
    }

    // ===== CAPTURE LIFECYCLE =====

    /// Attach a capture to a world.
    ///
    /// Refreshes its show flags and queues one deferred capture so the target
    /// has content on the first flush.
    ///
    /// # Errors
    ///
    /// `InvalidResource` if `world` is not registered.
    pub fn register_capture(&self, world: WorldKey, capture: &SharedCapture) -> Result<()> {
        self.lookup_world(world)?;

        let mut guard = capture.lock().unwrap_or_else(PoisonError::into_inner);
        guard.attach_world(world);
        guard.update_show_flags(None);
        crate::cine_debug!("cine::Scheduler",
            "Capture '{}' registered with world {:?}", guard.name(), world);

        self.request_locked(&mut guard, capture);
        Ok(())
    }

    /// Detach a capture from its world and release its view states.
    ///
    /// A pending entry left in the registry is skipped at the next flush.
    pub fn unregister_capture(&self, capture: &SharedCapture) {
        let mut guard = capture.lock().unwrap_or_else(PoisonError::into_inner);
        guard.destroy_view_states();
        if let Some(world) = guard.world() {
            crate::cine_debug!("cine::Scheduler",
                "Capture '{}' unregistered from world {:?}", guard.name(), world);
        }
        guard.detach_world();
    }

    // ===== SCHEDULING =====

    /// Per-frame tick: queues the capture if it captures every frame.
    ///
    /// # Returns
    ///
    /// `true` if the capture is now pending.
    pub fn tick_capture(&self, capture: &SharedCapture) -> bool {
        let mut guard = capture.lock().unwrap_or_else(PoisonError::into_inner);
        if !guard.settings().capture_every_frame {
            return false;
        }
        self.request_locked(&mut guard, capture)
    }

    /// Move a capture; queues it if it captures on movement.
    ///
    /// # Returns
    ///
    /// `true` if the capture is now pending.
    pub fn notify_transform_updated(
        &self,
        capture: &SharedCapture,
        location: Vec3,
        rotation: Quat,
    ) -> bool {
        let mut guard = capture.lock().unwrap_or_else(PoisonError::into_inner);
        guard.set_transform(location, rotation);
        if !guard.settings().capture_on_movement {
            return false;
        }
        self.request_locked(&mut guard, capture)
    }

    /// Queue a capture for the next flush of its world.
    ///
    /// Silent no-op when the capture has no world, the world has no active
    /// scene, or the capture is not visible.
    ///
    /// # Returns
    ///
    /// `true` if the capture is now pending.
    pub fn request_capture_deferred(&self, capture: &SharedCapture) -> bool {
        let mut guard = capture.lock().unwrap_or_else(PoisonError::into_inner);
        self.request_locked(&mut guard, capture)
    }

    /// Idle → PendingFlush with the capture already locked.
    fn request_locked(&self, capture: &mut SceneCapture, shared: &SharedCapture) -> bool {
        let Some(key) = capture.world() else {
            crate::cine_trace!("cine::Scheduler",
                "Capture '{}' has no world, request ignored", capture.name());
            return false;
        };
        let Some(world) = self.world(key) else {
            crate::cine_trace!("cine::Scheduler",
                "Capture '{}' world {:?} is gone, request ignored", capture.name(), key);
            return false;
        };

        if !world.has_active_scene() {
            crate::cine_trace!("cine::Scheduler",
                "World {:?} has no active scene, capture '{}' ignored", key, capture.name());
            return false;
        }
        if !world.is_capture_visible(capture) {
            crate::cine_trace!("cine::Scheduler",
                "Capture '{}' is not visible, request ignored", capture.name());
            return false;
        }

        capture.update_lens(world.world_to_meters_scale(), world.delta_time_seconds());
        capture.set_state(CaptureState::PendingFlush);
        self.registry.request_capture(key, shared);
        true
    }

    // ===== RENDERING =====

    /// Render a capture right now, bypassing the flush.
    ///
    /// Waits for pending scene updates of the world first. Warns when the
    /// capture also captures every frame since the work is then done twice.
    ///
    /// # Errors
    ///
    /// `InvalidResource` if the capture is not attached to a registered world.
    /// A missing scene or an invisible capture is not an error.
    pub fn capture_scene(&self, capture: &SharedCapture) -> Result<()> {
        let mut guard = capture.lock().unwrap_or_else(PoisonError::into_inner);

        let Some(key) = guard.world() else {
            let name = guard.name().to_string();
            crate::cine_error!("cine::Scheduler",
                "Manual capture of '{}' without a world", name);
            return Err(Error::InvalidResource(format!(
                "capture '{}' is not attached to a world", name)));
        };
        let world = self.lookup_world(key)?;

        if guard.settings().capture_every_frame {
            crate::cine_warn!("cine::Scheduler",
                "Capture '{}' is captured manually while capture_every_frame is enabled; \
                 the scene is rendered twice this frame", guard.name());
        }

        if !world.has_active_scene() || !world.is_capture_visible(&guard) {
            crate::cine_trace!("cine::Scheduler",
                "Manual capture of '{}' skipped (no scene or not visible)", guard.name());
            return Ok(());
        }

        let resume = guard.state();
        world.finish_pending_updates();
        Self::render(world.as_ref(), &mut guard, resume);
        Ok(())
    }

    /// Render everything queued for `key`, highest priority first.
    ///
    /// Must be called once per frame per world, after every other update of
    /// the world has been queued. This is not checked.
    ///
    /// # Errors
    ///
    /// `InvalidResource` if `key` is not registered. Pending entries for it
    /// are discarded.
    pub fn flush_world(&self, key: WorldKey) -> Result<FlushStats> {
        let world = match self.lookup_world(key) {
            Ok(world) => world,
            Err(err) => {
                self.registry.discard_world(key);
                return Err(err);
            }
        };

        let (captures, stale) = self.registry.drain_counted(key);
        let mut stats = FlushStats {
            rendered: 0,
            skipped_stale: stale,
        };

        for capture in captures {
            let mut guard = capture.lock().unwrap_or_else(PoisonError::into_inner);
            if guard.world() != Some(key) {
                // unregistered or moved since the request; its state now
                // belongs to the other world
                stats.skipped_stale += 1;
                continue;
            }
            Self::render(world.as_ref(), &mut guard, CaptureState::Idle);
            stats.rendered += 1;
        }

        if stats.rendered > 0 || stats.skipped_stale > 0 {
            crate::cine_trace!("cine::Scheduler",
                "Flushed world {:?}: {} rendered, {} skipped",
                key, stats.rendered, stats.skipped_stale);
        }
        Ok(stats)
    }

    /// Rendering around one render call, then `after`.
    fn render(world: &dyn CaptureWorld, capture: &mut SceneCapture, after: CaptureState) {
        let (request, mut view_states) = capture.begin_render();
        world.render_capture(&request, &mut view_states);
        capture.end_render(after);
    }

    /// Registered world for `key`, as an error when missing.
    fn lookup_world(&self, key: WorldKey) -> Result<Arc<dyn CaptureWorld>> {
        let worlds = self
            .worlds
            .read()
            .map_err(|_| crate::cine_err!("cine::Scheduler", "World table lock poisoned"))?;
        worlds.get(key).cloned().ok_or_else(|| Self::unknown_world(key))
    }

    fn unknown_world(key: WorldKey) -> Error {
        crate::cine_error!("cine::Scheduler", "Unknown world {:?}", key);
        Error::InvalidResource(format!("world {:?} is not registered", key))
    }
}

impl Default for CaptureScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "capture_scheduler_tests.rs"]
mod tests;
