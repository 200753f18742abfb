/// Tests for DeferredCaptureRegistry
///
/// These tests validate idempotent insertion, priority ordering with
/// insertion-order ties, stale entry filtering and per-world discard.

use super::*;
use crate::capture::SceneCapture;
use crate::scheduler::mock_world::test_pool;
use slotmap::SlotMap;
use std::thread;

// ============================================================================
// Helper Functions
// ============================================================================

fn world_keys(count: usize) -> Vec<WorldKey> {
    let mut worlds: SlotMap<WorldKey, ()> = SlotMap::with_key();
    (0..count).map(|_| worlds.insert(())).collect()
}

fn capture(name: &str, priority: i32) -> SharedCapture {
    let mut capture = SceneCapture::new(name, test_pool());
    capture.set_sort_priority(priority);
    capture.into_shared()
}

fn names(captures: &[SharedCapture]) -> Vec<String> {
    captures
        .iter()
        .map(|c| c.lock().unwrap().name().to_string())
        .collect()
}

// ============================================================================
// Tests: Insertion
// ============================================================================

#[test]
fn test_new_registry_is_empty() {
    let registry = DeferredCaptureRegistry::new();
    let world = world_keys(1)[0];
    assert_eq!(registry.pending_count(world), 0);
    assert_eq!(registry.world_count(), 0);
    assert!(registry.drain(world).is_empty());
}

#[test]
fn test_request_capture_is_idempotent() {
    let registry = DeferredCaptureRegistry::new();
    let world = world_keys(1)[0];
    let a = capture("A", 0);

    assert!(registry.request_capture(world, &a));
    for _ in 0..5 {
        assert!(!registry.request_capture(world, &a));
    }
    assert_eq!(registry.pending_count(world), 1);

    let drained = registry.drain(world);
    assert_eq!(drained.len(), 1);
    assert!(Arc::ptr_eq(&drained[0], &a));
}

#[test]
fn test_same_capture_in_two_worlds() {
    let registry = DeferredCaptureRegistry::new();
    let keys = world_keys(2);
    let a = capture("A", 0);

    assert!(registry.request_capture(keys[0], &a));
    assert!(registry.request_capture(keys[1], &a));
    assert_eq!(registry.world_count(), 2);
}

#[test]
fn test_concurrent_requests_insert_once() {
    let registry = Arc::new(DeferredCaptureRegistry::new());
    let world = world_keys(1)[0];
    let captures: Vec<SharedCapture> = (0..4).map(|i| capture(&format!("C{}", i), i)).collect();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = registry.clone();
            let captures = captures.clone();
            thread::spawn(move || {
                for capture in &captures {
                    registry.request_capture(world, capture);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(registry.pending_count(world), 4);
    assert_eq!(names(&registry.drain(world)), vec!["C3", "C2", "C1", "C0"]);
}

// ============================================================================
// Tests: Drain
// ============================================================================

#[test]
fn test_drain_sorts_by_descending_priority() {
    let registry = DeferredCaptureRegistry::new();
    let world = world_keys(1)[0];
    let low = capture("Low", -5);
    let high = capture("High", 100);
    let mid = capture("Mid", 3);

    registry.request_capture(world, &low);
    registry.request_capture(world, &high);
    registry.request_capture(world, &mid);

    assert_eq!(names(&registry.drain(world)), vec!["High", "Mid", "Low"]);
}

#[test]
fn test_drain_equal_priority_keeps_insertion_order() {
    let registry = DeferredCaptureRegistry::new();
    let world = world_keys(1)[0];
    let captures: Vec<SharedCapture> = ["First", "Second", "Third", "Fourth"]
        .iter()
        .map(|name| capture(name, 1))
        .collect();
    let top = capture("Top", 2);

    registry.request_capture(world, &captures[0]);
    registry.request_capture(world, &captures[1]);
    registry.request_capture(world, &top);
    registry.request_capture(world, &captures[2]);
    registry.request_capture(world, &captures[3]);

    assert_eq!(
        names(&registry.drain(world)),
        vec!["Top", "First", "Second", "Third", "Fourth"]
    );
}

#[test]
fn test_second_drain_is_empty() {
    let registry = DeferredCaptureRegistry::new();
    let world = world_keys(1)[0];
    let a = capture("A", 0);

    registry.request_capture(world, &a);
    assert_eq!(registry.drain(world).len(), 1);
    assert!(registry.drain(world).is_empty());
    assert_eq!(registry.world_count(), 0);
}

#[test]
fn test_drain_skips_destroyed_captures() {
    let registry = DeferredCaptureRegistry::new();
    let world = world_keys(1)[0];
    let a = capture("A", 10);
    let b = capture("B", 20);
    let c = capture("C", 30);

    registry.request_capture(world, &a);
    registry.request_capture(world, &b);
    registry.request_capture(world, &c);
    drop(c);

    let (drained, stale) = registry.drain_counted(world);
    assert_eq!(names(&drained), vec!["B", "A"]);
    assert_eq!(stale, 1);
}

#[test]
fn test_drain_reads_priority_at_drain_time() {
    let registry = DeferredCaptureRegistry::new();
    let world = world_keys(1)[0];
    let a = capture("A", 0);
    let b = capture("B", 1);

    registry.request_capture(world, &a);
    registry.request_capture(world, &b);
    a.lock().unwrap().set_sort_priority(5);

    assert_eq!(names(&registry.drain(world)), vec!["A", "B"]);
}

#[test]
fn test_drain_only_touches_its_world() {
    let registry = DeferredCaptureRegistry::new();
    let keys = world_keys(2);
    let a = capture("A", 0);
    let b = capture("B", 0);

    registry.request_capture(keys[0], &a);
    registry.request_capture(keys[1], &b);

    assert_eq!(names(&registry.drain(keys[0])), vec!["A"]);
    assert_eq!(registry.pending_count(keys[1]), 1);
}

// ============================================================================
// Tests: Discard / Retain
// ============================================================================

#[test]
fn test_discard_world_drops_entries() {
    let registry = DeferredCaptureRegistry::new();
    let world = world_keys(1)[0];
    let a = capture("A", 0);
    let b = capture("B", 0);

    registry.request_capture(world, &a);
    registry.request_capture(world, &b);

    assert_eq!(registry.discard_world(world), 2);
    assert_eq!(registry.pending_count(world), 0);
    assert_eq!(registry.discard_world(world), 0);
}

#[test]
fn test_retain_worlds_prunes_worlds_and_stale_entries() {
    let registry = DeferredCaptureRegistry::new();
    let keys = world_keys(3);
    let a = capture("A", 0);
    let b = capture("B", 0);
    let gone = capture("Gone", 0);

    registry.request_capture(keys[0], &a);
    registry.request_capture(keys[0], &gone);
    registry.request_capture(keys[1], &b);
    registry.request_capture(keys[2], &gone);
    drop(gone);

    registry.retain_worlds(|key| key != keys[1]);

    assert_eq!(registry.pending_count(keys[0]), 1);
    assert_eq!(registry.pending_count(keys[1]), 0);
    // only a stale entry was left
    assert_eq!(registry.pending_count(keys[2]), 0);
    assert_eq!(registry.world_count(), 1);
}
