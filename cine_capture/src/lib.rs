/*!
# Cine Capture

Scene capture scheduling for real-time renderers.

A scene capture is a camera-like object that renders a view of its world
into an offscreen target (mirrors, security monitors, portals, reflection
cubemaps). This crate owns when and in which order captures render, the cine
lens simulation that drives their depth of field, and the lifetime of the
renderer-side view states they keep between frames. Drawing itself is
delegated to the host through the `CaptureWorld` trait.

## Architecture

- **CaptureScheduler**: queues captures and flushes each world once per frame
- **DeferredCaptureRegistry**: per-world pending set, priority-ordered drain
- **SceneCapture**: per-capture settings, visibility lists, lens, view states
- **LensSimulator**: focus distance clamping and smoothing
- **ViewStateSlot / ViewStatePool**: lazily allocated, deferred-released view states
*/

// Internal modules
pub mod error;
pub mod log;
pub mod lens;
pub mod view_state;
pub mod capture;
pub mod scheduler;

// Main cine namespace module
pub mod cine {
    // Error types
    pub use crate::error::{Error, Result};

    // Scheduler entry points
    pub use crate::scheduler::{CaptureScheduler, CaptureWorld, WorldKey, FlushStats};

    // Logging sub-module (types and logger slot, macros live at crate root)
    pub mod log {
        pub use crate::log::{
            Logger, LogEntry, LogSeverity, DefaultLogger,
            set_logger, reset_logger, set_min_severity, is_enabled,
        };
    }

    // Lens sub-module
    pub mod lens {
        pub use crate::lens::*;
    }

    // View state sub-module
    pub mod view_state {
        pub use crate::view_state::*;
    }

    // Capture sub-module
    pub mod capture {
        pub use crate::capture::*;
    }

    // Scheduler sub-module
    pub mod scheduler {
        pub use crate::scheduler::*;
    }
}

// Re-export math library at crate root
pub use glam;
