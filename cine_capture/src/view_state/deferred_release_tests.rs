/// Tests for DeferredReleaseQueue
///
/// These tests validate fence tracking, immediate release when idle, and
/// that the renderer's own clones keep a state alive past its fence.

use super::*;
use crate::view_state::{ViewStateAllocator, ViewStatePool};
use std::sync::Arc;

// ============================================================================
// Helper Functions
// ============================================================================

fn handle(pool: &ViewStatePool) -> ViewStateHandle {
    pool.allocate_view_state().unwrap()
}

// ============================================================================
// Tests: Frame Counters
// ============================================================================

#[test]
fn test_new_queue_is_idle() {
    let queue = DeferredReleaseQueue::new();
    assert_eq!(queue.submitted_frame(), 0);
    assert_eq!(queue.completed_frame(), 0);
    assert_eq!(queue.pending_count(), 0);
}

#[test]
fn test_begin_frame_increments() {
    let queue = DeferredReleaseQueue::default();
    assert_eq!(queue.begin_frame(), 1);
    assert_eq!(queue.begin_frame(), 2);
    assert_eq!(queue.submitted_frame(), 2);
}

#[test]
fn test_completed_frame_never_goes_backwards() {
    let queue = DeferredReleaseQueue::new();
    queue.begin_frame();
    queue.begin_frame();
    queue.frame_completed(2);
    queue.frame_completed(1);
    assert_eq!(queue.completed_frame(), 2);
}

// ============================================================================
// Tests: Release
// ============================================================================

#[test]
fn test_release_when_idle_drops_immediately() {
    let pool = ViewStatePool::default();
    let queue = DeferredReleaseQueue::new();
    let h = handle(&pool);
    assert_eq!(pool.live_count(), 1);

    queue.release(h);

    assert_eq!(queue.pending_count(), 0);
    assert_eq!(pool.live_count(), 0);
}

#[test]
fn test_release_in_flight_waits_for_fence() {
    let pool = ViewStatePool::default();
    let queue = DeferredReleaseQueue::new();
    let frame = queue.begin_frame();

    queue.release(handle(&pool));
    assert_eq!(queue.pending_count(), 1);
    assert_eq!(pool.live_count(), 1);

    assert_eq!(queue.frame_completed(frame), 1);
    assert_eq!(queue.pending_count(), 0);
    assert_eq!(pool.live_count(), 0);
}

#[test]
fn test_release_only_retires_completed_fences() {
    let pool = ViewStatePool::default();
    let queue = DeferredReleaseQueue::new();

    let f1 = queue.begin_frame();
    queue.release(handle(&pool));
    let f2 = queue.begin_frame();
    queue.release(handle(&pool));

    assert_eq!(queue.frame_completed(f1), 1);
    assert_eq!(queue.pending_count(), 1);
    assert_eq!(pool.live_count(), 1);

    assert_eq!(queue.frame_completed(f2), 1);
    assert_eq!(pool.live_count(), 0);
}

#[test]
fn test_concurrent_releases_all_retire_at_latest_frame() {
    let pool = Arc::new(ViewStatePool::default());
    let queue = Arc::new(DeferredReleaseQueue::new());
    queue.begin_frame();

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let pool = Arc::clone(&pool);
            let queue = Arc::clone(&queue);
            std::thread::spawn(move || {
                for _ in 0..50 {
                    queue.release(pool.allocate_view_state().unwrap());
                    queue.begin_frame();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let pending = queue.pending_count();
    assert_eq!(pending, 200);
    // Completing an earlier frame must not leave ready entries behind a later fence
    let middle = queue.submitted_frame() / 2;
    let retired_early = queue.frame_completed(middle);
    assert_eq!(queue.pending_count(), pending - retired_early);

    queue.frame_completed(queue.submitted_frame());
    assert_eq!(queue.pending_count(), 0);
    assert_eq!(pool.live_count(), 0);
}

#[test]
fn test_renderer_clone_outlives_fence() {
    let pool = ViewStatePool::default();
    let queue = DeferredReleaseQueue::new();
    let frame = queue.begin_frame();

    let h = handle(&pool);
    let renderer_copy = Arc::clone(&h);
    queue.release(h);
    queue.frame_completed(frame);

    // The renderer still holds its clone: state stays alive
    assert_eq!(pool.live_count(), 1);
    drop(renderer_copy);
    assert_eq!(pool.live_count(), 0);
}

#[test]
fn test_release_all_now() {
    let pool = ViewStatePool::default();
    let queue = DeferredReleaseQueue::new();
    queue.begin_frame();
    queue.release(handle(&pool));
    queue.release(handle(&pool));

    assert_eq!(queue.release_all_now(), 2);
    assert_eq!(queue.pending_count(), 0);
    assert_eq!(pool.live_count(), 0);
}
