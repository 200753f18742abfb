/// Mock world for unit tests (no renderer required)
///
/// Records every render and every finish-pending-updates barrier so tests
/// can assert on ordering and view-state handling.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use crate::capture::{CaptureRequest, ViewStateAccess};
use crate::log::{LogEntry, LogSeverity, Logger};
use crate::view_state::{ObjectId, ViewStateHandle, ViewStatePool};
use super::world::CaptureWorld;

// ============================================================================
// Mock World
// ============================================================================

/// One render observed by the mock world
#[derive(Debug, Clone)]
pub struct RenderRecord {
    pub name: String,
    pub sort_priority: i32,
    pub camera_cut: bool,
    pub view_state_id: Option<u64>,
    pub view_index: usize,
}

pub struct MockWorld {
    pub active_scene: AtomicBool,
    pub delta_time: f32,
    pub world_to_meters: f32,
    pub renders: Mutex<Vec<RenderRecord>>,
    pub barriers: AtomicUsize,
    /// Handles seen during renders (kept to test deferred release)
    pub observed_states: Mutex<Vec<ViewStateHandle>>,
    pub keep_handles: bool,
    /// Object the renderer attaches to every view state it draws with
    pub referenced_object: Option<ObjectId>,
}

impl MockWorld {
    pub fn new() -> Self {
        Self {
            active_scene: AtomicBool::new(true),
            delta_time: 1.0 / 60.0,
            world_to_meters: 100.0,
            renders: Mutex::new(Vec::new()),
            barriers: AtomicUsize::new(0),
            observed_states: Mutex::new(Vec::new()),
            keep_handles: false,
            referenced_object: None,
        }
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn set_active_scene(&self, active: bool) {
        self.active_scene.store(active, Ordering::SeqCst);
    }

    pub fn render_names(&self) -> Vec<String> {
        self.renders.lock().unwrap().iter().map(|r| r.name.clone()).collect()
    }

    pub fn render_count(&self) -> usize {
        self.renders.lock().unwrap().len()
    }

    pub fn last_render(&self) -> Option<RenderRecord> {
        self.renders.lock().unwrap().last().cloned()
    }

    pub fn barrier_count(&self) -> usize {
        self.barriers.load(Ordering::SeqCst)
    }
}

impl CaptureWorld for MockWorld {
    fn has_active_scene(&self) -> bool {
        self.active_scene.load(Ordering::SeqCst)
    }

    fn delta_time_seconds(&self) -> f32 {
        self.delta_time
    }

    fn world_to_meters_scale(&self) -> f32 {
        self.world_to_meters
    }

    fn finish_pending_updates(&self) {
        self.barriers.fetch_add(1, Ordering::SeqCst);
    }

    fn render_capture(&self, request: &CaptureRequest, view_states: &mut ViewStateAccess<'_>) {
        let state = view_states.get(request.view_index).unwrap();
        if let Some(state) = &state {
            state.record_frame(request.view_projection_matrix(), request.camera_cut);
            if let Some(object) = self.referenced_object {
                state.add_referenced_object(object);
            }
            if self.keep_handles {
                self.observed_states.lock().unwrap().push(state.clone());
            }
        }

        self.renders.lock().unwrap().push(RenderRecord {
            name: request.name.clone(),
            sort_priority: request.sort_priority,
            camera_cut: request.camera_cut,
            view_state_id: state.map(|s| s.id()),
            view_index: request.view_index,
        });
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Shared pool for captures created in tests
pub fn test_pool() -> Arc<ViewStatePool> {
    Arc::new(ViewStatePool::default())
}

// ============================================================================
// Capturing Logger
// ============================================================================

/// Logger collecting entries of one source at or above a severity
pub struct CapturingLogger {
    pub source: &'static str,
    pub min_severity: LogSeverity,
    pub entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl CapturingLogger {
    pub fn new(source: &'static str, min_severity: LogSeverity) -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { source, min_severity, entries: entries.clone() }, entries)
    }
}

impl Logger for CapturingLogger {
    fn log(&self, entry: &LogEntry) {
        if entry.source == self.source && entry.severity >= self.min_severity {
            self.entries.lock().unwrap().push(entry.clone());
        }
    }
}
