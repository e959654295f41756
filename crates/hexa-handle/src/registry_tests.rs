//! Tests for the handle registry.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

static_assertions::assert_impl_all!(HandleRegistry: Send, Sync);
static_assertions::assert_impl_all!(Handle<String>: Send, Sync, Copy);

#[derive(Debug, PartialEq)]
struct Table(Vec<u8>);

#[derive(Debug)]
struct Other;

/// Counts drops so tests can observe when the registry frees an object.
struct DropCounter(Arc<AtomicUsize>);

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

// -- register / resolve --

#[test]
fn test_register_then_resolve_returns_same_object() {
    let registry = HandleRegistry::new();
    let handle = registry.register(Table(vec![3, 1, 2]));
    let table = registry.resolve(handle).unwrap();
    assert_eq!(*table, Table(vec![3, 1, 2]));
}

#[test]
fn test_handles_are_unique_and_never_null() {
    let registry = HandleRegistry::new();
    let handles: Vec<_> = (0..100).map(|i| registry.register(i).raw()).collect();
    let unique: HashSet<_> = handles.iter().copied().collect();
    assert_eq!(unique.len(), handles.len());
    assert!(handles.iter().all(|h| !h.is_null()));
}

#[test]
fn test_handles_not_reused_after_release() {
    let registry = HandleRegistry::new();
    let first = registry.register(1_u32);
    registry.release(first).unwrap();
    let second = registry.register(2_u32);
    assert_ne!(first.raw(), second.raw());
}

#[test]
fn test_resolve_wrong_kind_is_invalid_handle() {
    let registry = HandleRegistry::new();
    let handle = registry.register(Other);
    let wrong: Handle<Table> = Handle::from_raw(handle.raw());
    let err = registry.resolve(wrong).unwrap_err();
    assert!(matches!(
        err,
        RegistryError::InvalidHandle { handle: h, .. } if h == handle.raw()
    ));
    // The original registration is untouched.
    assert!(registry.resolve(handle).is_ok());
}

#[test]
fn test_resolve_unknown_handle_is_invalid_handle() {
    let registry = HandleRegistry::new();
    let handle: Handle<Table> = Handle::from_raw(RawHandle(12345));
    assert!(matches!(
        registry.resolve(handle),
        Err(RegistryError::InvalidHandle { .. })
    ));
}

#[test]
fn test_kind_of_reports_type_name() {
    let registry = HandleRegistry::new();
    let handle = registry.register(Other);
    let kind = registry.kind_of(handle.raw()).unwrap();
    assert!(kind.ends_with("Other"), "unexpected kind {kind}");
    assert_eq!(registry.kind_of(RawHandle(999)), None);
}

// -- release --

#[test]
fn test_resolve_after_release_fails() {
    let registry = HandleRegistry::new();
    let handle = registry.register(Table(vec![]));
    registry.release(handle).unwrap();
    assert!(matches!(
        registry.resolve(handle),
        Err(RegistryError::InvalidHandle { .. })
    ));
    assert!(!registry.contains(handle.raw()));
}

#[test]
fn test_double_release_reports_not_found() {
    let registry = HandleRegistry::new();
    let handle = registry.register(Table(vec![]));
    registry.release(handle).unwrap();
    assert_eq!(
        registry.release(handle),
        Err(RegistryError::NotFound(handle.raw()))
    );
    assert_eq!(
        registry.release_raw(handle.raw()),
        Err(RegistryError::NotFound(handle.raw()))
    );
}

#[test]
fn test_release_with_wrong_kind_keeps_entry() {
    let registry = HandleRegistry::new();
    let handle = registry.register(Other);
    let wrong: Handle<Table> = Handle::from_raw(handle.raw());
    assert!(matches!(
        registry.release(wrong),
        Err(RegistryError::InvalidHandle { .. })
    ));
    assert!(registry.contains(handle.raw()));
}

#[test]
fn test_release_frees_object_once_unused() {
    let drops = Arc::new(AtomicUsize::new(0));
    let registry = HandleRegistry::new();
    let handle = registry.register(DropCounter(Arc::clone(&drops)));

    let in_use = registry.resolve(handle).unwrap();
    registry.release(handle).unwrap();
    assert_eq!(drops.load(Ordering::SeqCst), 0, "object dropped while in use");

    drop(in_use);
    assert_eq!(drops.load(Ordering::SeqCst), 1);
}

#[test]
fn test_clear_releases_everything() {
    let registry = HandleRegistry::new();
    let a = registry.register(1_u8);
    let b = registry.register(2_u8);
    assert_eq!(registry.len(), 2);

    registry.clear();
    assert!(registry.is_empty());
    assert!(registry.resolve(a).is_err());
    assert!(registry.resolve(b).is_err());

    let c = registry.register(3_u8);
    assert!(c.raw() > b.raw());
}

// -- concurrency --

#[test]
fn test_concurrent_register_yields_unique_handles() {
    let registry = HandleRegistry::new();
    let per_thread = 500;
    let threads = 8;

    let all: Vec<RawHandle> = std::thread::scope(|s| {
        let workers: Vec<_> = (0..threads)
            .map(|t| {
                let registry = &registry;
                s.spawn(move || {
                    (0..per_thread)
                        .map(|i| registry.register(t * per_thread + i).raw())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        workers
            .into_iter()
            .flat_map(|w| w.join().unwrap())
            .collect()
    });

    let unique: HashSet<_> = all.iter().copied().collect();
    assert_eq!(unique.len(), threads * per_thread);
    assert_eq!(registry.len(), threads * per_thread);
}

#[test]
fn test_concurrent_release_and_resolve_never_see_freed_object() {
    let registry = HandleRegistry::new();
    let handles: Vec<_> = (0..1000_u32)
        .map(|i| registry.register(Table(vec![i as u8; 16])))
        .collect();

    std::thread::scope(|s| {
        s.spawn(|| {
            for handle in &handles {
                registry.release(*handle).unwrap();
            }
        });
        for _ in 0..4 {
            s.spawn(|| {
                for handle in handles.iter().rev() {
                    match registry.resolve(*handle) {
                        Ok(table) => assert_eq!(table.0.len(), 16),
                        Err(RegistryError::InvalidHandle { .. }) => {}
                        Err(other) => panic!("unexpected error {other:?}"),
                    }
                }
            });
        }
    });

    assert!(registry.is_empty());
}

#[test]
fn test_concurrent_double_release_succeeds_exactly_once() {
    let registry = HandleRegistry::new();
    let handle = registry.register(Table(vec![]));
    let successes = AtomicUsize::new(0);

    std::thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| match registry.release(handle) {
                Ok(()) => {
                    successes.fetch_add(1, Ordering::SeqCst);
                }
                Err(err) => assert_eq!(err, RegistryError::NotFound(handle.raw())),
            });
        }
    });

    assert_eq!(successes.load(Ordering::SeqCst), 1);
}
