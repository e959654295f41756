//! The handle-to-object table.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use crate::{Handle, RawHandle, RegistryError};

/// Shared, type-erased object as stored in the registry.
pub type AnyObject = Arc<dyn Any + Send + Sync>;

struct Entry {
    /// Type name recorded at registration, for diagnostics.
    kind: &'static str,
    value: AnyObject,
}

/// Owns registered objects and maps opaque handles to them.
///
/// Mutation is serialized per shard of a [`DashMap`], so lookups of distinct
/// handles rarely contend. Resolving clones the stored `Arc`; a concurrent
/// [`release`](Self::release) only drops the registry's reference, and the
/// object is freed once the last resolved reference goes away.
///
/// Handle values come from a monotonic counter starting at 1 and are never
/// reused for the lifetime of the registry.
pub struct HandleRegistry {
    entries: DashMap<u64, Entry>,
    next: AtomicU64,
}

impl HandleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            next: AtomicU64::new(1),
        }
    }

    /// Takes ownership of `value` and returns a handle to it.
    pub fn register<T: Send + Sync + 'static>(&self, value: T) -> Handle<T> {
        let value: AnyObject = Arc::new(value);
        let raw = self.next.fetch_add(1, Ordering::Relaxed);
        debug_assert_ne!(raw, u64::MAX, "handle counter exhausted");

        let kind = type_name::<T>();
        let previous = self.entries.insert(raw, Entry { kind, value });
        debug_assert!(
            previous.is_none(),
            "handle #{raw} issued while still live (registry corrupted)"
        );

        tracing::trace!(handle = raw, kind, "registered handle");
        Handle::from_raw(RawHandle(raw))
    }

    /// Resolves a typed handle to a shared reference to its object.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidHandle`] if the handle is unknown,
    /// released, or registered as a different type.
    pub fn resolve<T: Send + Sync + 'static>(
        &self,
        handle: Handle<T>,
    ) -> Result<Arc<T>, RegistryError> {
        let raw = handle.raw();
        let invalid = || RegistryError::InvalidHandle {
            handle: raw,
            expected: type_name::<T>(),
        };

        let value = self.resolve_raw(raw).map_err(|_| invalid())?;
        value.downcast::<T>().map_err(|_| {
            tracing::debug!(handle = raw.0, expected = type_name::<T>(), "handle kind mismatch");
            invalid()
        })
    }

    /// Resolves a handle without knowing its type.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidHandle`] if the handle is not live.
    pub fn resolve_raw(&self, raw: RawHandle) -> Result<AnyObject, RegistryError> {
        match self.entries.get(&raw.0) {
            Some(entry) => Ok(Arc::clone(&entry.value)),
            None => {
                tracing::debug!(handle = raw.0, "resolve of unknown handle");
                Err(RegistryError::InvalidHandle {
                    handle: raw,
                    expected: "object",
                })
            }
        }
    }

    /// Releases a typed handle, dropping the registry's ownership.
    ///
    /// A live handle registered as a different type is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if the handle is not registered and
    /// [`RegistryError::InvalidHandle`] if it denotes another type.
    pub fn release<T: Send + Sync + 'static>(&self, handle: Handle<T>) -> Result<(), RegistryError> {
        let raw = handle.raw();
        if self
            .entries
            .remove_if(&raw.0, |_, entry| entry.value.is::<T>())
            .is_some()
        {
            tracing::trace!(handle = raw.0, "released handle");
            return Ok(());
        }

        if self.entries.contains_key(&raw.0) {
            Err(RegistryError::InvalidHandle {
                handle: raw,
                expected: type_name::<T>(),
            })
        } else {
            tracing::debug!(handle = raw.0, "release of unknown handle");
            Err(RegistryError::NotFound(raw))
        }
    }

    /// Releases a handle of any type.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if the handle is not registered.
    pub fn release_raw(&self, raw: RawHandle) -> Result<(), RegistryError> {
        match self.entries.remove(&raw.0) {
            Some((_, entry)) => {
                tracing::trace!(handle = raw.0, kind = entry.kind, "released handle");
                Ok(())
            }
            None => {
                tracing::debug!(handle = raw.0, "release of unknown handle");
                Err(RegistryError::NotFound(raw))
            }
        }
    }

    /// Returns the type name recorded for a live handle.
    pub fn kind_of(&self, raw: RawHandle) -> Option<&'static str> {
        self.entries.get(&raw.0).map(|entry| entry.kind)
    }

    /// Returns `true` if the handle is currently live.
    pub fn contains(&self, raw: RawHandle) -> bool {
        self.entries.contains_key(&raw.0)
    }

    /// Returns the number of live handles.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no handles are live.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Releases every live handle. The counter is not reset, so handle values
    /// issued before the teardown stay invalid.
    pub fn clear(&self) {
        let count = self.entries.len();
        self.entries.clear();
        tracing::debug!(count, "registry cleared");
    }
}

impl Default for HandleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HandleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandleRegistry")
            .field("live", &self.entries.len())
            .field("next", &self.next.load(Ordering::Relaxed))
            .finish()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
