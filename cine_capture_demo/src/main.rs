/// Headless frame loop driving a few scene captures.
///
/// A fake world stands in for the renderer: it logs every capture it is
/// asked to draw. The loop ticks captures, moves one of them, flushes the
/// world, fakes renderer frame completion, then tears everything down.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use cine_capture::cine::capture::{
    CaptureRequest, CaptureSettings, SceneCapture, ShowFlagOverride, ShowFlags, ViewStateAccess,
};
use cine_capture::cine::lens::FocusMethod;
use cine_capture::cine::log::{LogEntry, LogSeverity, Logger};
use cine_capture::cine::view_state::{ViewStatePool, ViewStatePoolConfig};
use cine_capture::cine::{CaptureScheduler, CaptureWorld, Result};
use cine_capture::glam::{Quat, Vec3};
use cine_capture::{cine_info, cine_warn};

const FRAME_COUNT: u64 = 4;

/// Forwards capture diagnostics to the `log` facade (filtered by `RUST_LOG`)
struct LogFacade;

impl Logger for LogFacade {
    fn log(&self, entry: &LogEntry) {
        let level = match entry.severity {
            LogSeverity::Trace => log::Level::Trace,
            LogSeverity::Debug => log::Level::Debug,
            LogSeverity::Info => log::Level::Info,
            LogSeverity::Warn => log::Level::Warn,
            LogSeverity::Error => log::Level::Error,
        };
        match (entry.file, entry.line) {
            (Some(file), Some(line)) => {
                log::log!(target: entry.source.as_str(), level, "{} ({}:{})", entry.message, file, line)
            }
            _ => log::log!(target: entry.source.as_str(), level, "{}", entry.message),
        }
    }
}

struct DemoWorld {
    frame: AtomicU64,
}

impl CaptureWorld for DemoWorld {
    fn has_active_scene(&self) -> bool {
        true
    }

    fn delta_time_seconds(&self) -> f32 {
        1.0 / 30.0
    }

    fn finish_pending_updates(&self) {
        cine_info!("demo::World", "Pending scene updates flushed");
    }

    fn render_capture(&self, request: &CaptureRequest, view_states: &mut ViewStateAccess<'_>) {
        let state = match view_states.get(request.view_index) {
            Ok(state) => state,
            Err(err) => {
                cine_warn!("demo::World", "No view state for '{}': {}", request.name, err);
                None
            }
        };
        if let Some(state) = &state {
            state.record_frame(request.view_projection_matrix(), request.camera_cut);
        }

        cine_info!("demo::World",
            "Frame {}: rendered '{}' (priority {}, focus {:?}, view state {:?})",
            self.frame.load(Ordering::Relaxed),
            request.profiling_label(),
            request.sort_priority,
            request.depth_of_field.focal_distance,
            state.map(|s| s.id()));
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    cine_capture::log::set_logger(LogFacade);

    let pool = Arc::new(ViewStatePool::new(ViewStatePoolConfig { max_live_states: Some(16) }));
    let world = Arc::new(DemoWorld { frame: AtomicU64::new(0) });
    let scheduler = CaptureScheduler::new();
    let world_key = scheduler.register_world(world.clone());

    let mirror = SceneCapture::new("Mirror", pool.clone())
        .with_settings(CaptureSettings { sort_priority: 10, ..Default::default() })
        .into_shared();

    let security_cam = SceneCapture::new("SecurityCam", pool.clone())
        .with_settings(CaptureSettings {
            capture_every_frame: false,
            sort_priority: 20,
            profiling_event_name: "SecurityCamera".to_string(),
            ..Default::default()
        })
        .into_shared();
    {
        let mut cam = security_cam.lock().unwrap_or_else(|e| e.into_inner());
        let focus = &mut cam.lens_mut().focus_settings;
        focus.method = FocusMethod::Tracking;
        focus.tracking.tracked_location = Some(Vec3::new(500.0, 0.0, 0.0));
        focus.smooth_focus_changes = true;
        cam.set_show_flag_overrides(vec![ShowFlagOverride::new(ShowFlags::BLOOM, false)]);
    }

    scheduler.register_capture(world_key, &mirror)?;
    scheduler.register_capture(world_key, &security_cam)?;

    for frame in 1..=FRAME_COUNT {
        world.frame.store(frame, Ordering::Relaxed);
        let submitted = pool.begin_frame();

        scheduler.tick_capture(&mirror);
        scheduler.tick_capture(&security_cam);

        let location = Vec3::new(frame as f32 * 100.0, 0.0, 0.0);
        scheduler.notify_transform_updated(&security_cam, location, Quat::IDENTITY);

        let stats = scheduler.flush_world(world_key)?;
        cine_info!("demo", "Frame {} flushed: {:?}", frame, stats);

        pool.frame_completed(submitted);
    }

    // Redundant on purpose: the mirror already captures every frame
    scheduler.capture_scene(&mirror)?;

    scheduler.unregister_capture(&mirror);
    scheduler.unregister_capture(&security_cam);
    scheduler.unregister_world(world_key);
    pool.shutdown();

    cine_info!("demo", "Done, {} view state(s) still alive", pool.live_count());
    Ok(())
}
