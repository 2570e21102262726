use std::sync::atomic::Ordering;
use std::sync::{Arc, Barrier};
use std::thread;

use crate::tests::test_utils::{config_with_epoch, CountingClock, FixedClock, SharedClock};
use crate::*;

#[test]
fn test_same_offset_returns_same_generator() {
    let registry = WorkerRegistry::with_clock(config_with_epoch(0), FixedClock(1));
    assert!(registry.is_empty());
    assert!(registry.get(3).is_none());

    let first = registry.get_or_create(3).unwrap();
    let second = registry.get_or_create(3).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&first, &registry.get(3).unwrap()));
    assert_eq!(registry.len(), 1);

    let other = registry.get_or_create(4).unwrap();
    assert!(!Arc::ptr_eq(&first, &other));
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_generator_carries_offset() {
    let registry = WorkerRegistry::new(config_with_epoch(0));
    let generator = registry.get_or_create(128).unwrap();

    assert_eq!(generator.config().sequence_start_offset(), 128);
    assert_eq!(generator.worker_id(), registry.base_config().worker_id());
    assert_eq!(registry.base_config().sequence_start_offset(), 0);
}

#[test]
fn test_concurrent_first_access_builds_once() {
    const THREADS: usize = 16;
    let clock = CountingClock::new(10);
    let constructed = clock.clone_counter();
    let registry = Arc::new(WorkerRegistry::with_clock(config_with_epoch(0), clock));
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                registry.get_or_create(7).unwrap()
            })
        })
        .collect();

    let generators: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(generators.iter().all(|g| Arc::ptr_eq(g, &generators[0])));
    assert_eq!(registry.len(), 1);
    assert_eq!(constructed.load(Ordering::SeqCst), 1);

    // later lookups reuse the cached generator
    registry.get_or_create(7).unwrap();
    registry.next_id(7).unwrap();
    assert_eq!(constructed.load(Ordering::SeqCst), 1);

    registry.get_or_create(8).unwrap();
    assert_eq!(constructed.load(Ordering::SeqCst), 2);
}

#[test]
fn test_invalid_offset_is_not_registered() {
    let registry = WorkerRegistry::with_clock(config_with_epoch(0), FixedClock(1));

    assert_eq!(
        registry.get_or_create(4096).unwrap_err(),
        SnowflakeError::InvalidSequenceOffset {
            offset: 4096,
            max: 4095
        }
    );
    assert!(registry.next_id(-1).is_err());
    assert!(registry.is_empty());
}

#[test]
fn test_registry_ids_per_path() {
    let clock = SharedClock::new(1000);
    let registry = WorkerRegistry::with_clock(config_with_epoch(0), clock.clone());

    let first = registry.next_id(0).unwrap();
    assert_eq!(first, pack(1000, 1, 1, 0));
    assert_eq!(registry.next_id(0).unwrap(), pack(1000, 1, 1, 1));

    clock.set(900);
    assert!(matches!(
        registry.next_id(0),
        Err(SnowflakeError::ClockMovedBackwards { .. })
    ));
    assert!(registry.next_id_tolerant(0).is_ok());
    assert!(registry
        .next_id_with(0, GenerationPath::ClockBackTolerant)
        .is_ok());
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_registries_are_isolated() {
    let clock = SharedClock::new(50);
    let left = WorkerRegistry::with_clock(config_with_epoch(0), clock.clone());
    let right = WorkerRegistry::with_clock(config_with_epoch(0), clock.clone());

    let a = left.get_or_create(0).unwrap();
    let b = right.get_or_create(0).unwrap();
    assert!(!Arc::ptr_eq(&a, &b));

    // separate generators, separate sequences
    assert_eq!(left.next_id(0).unwrap(), pack(50, 1, 1, 0));
    assert_eq!(right.next_id(0).unwrap(), pack(50, 1, 1, 0));
}

#[test]
fn test_default_registry_needs_host_identity() {
    match next_id() {
        Ok(id) => {
            assert!(id > 0);
            let generator = default_generator(0).unwrap();
            assert!(Arc::ptr_eq(&generator, &default_generator(0).unwrap()));
            assert!(next_id_with_offset(16).unwrap() > 0);
            assert!(next_id_tolerant(16).unwrap() > 0);
        }
        Err(err) => {
            assert!(matches!(err, SnowflakeError::NodeIdentityUnavailable { .. }));
        }
    }
}
