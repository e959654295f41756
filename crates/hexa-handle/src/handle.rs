//! Handle value types.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// The opaque 64-bit value passed across the call boundary.
///
/// Zero is never issued by a registry, so callers may use it as "no handle".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RawHandle(pub u64);

impl RawHandle {
    /// The value no registry ever hands out.
    pub const NULL: Self = Self(0);

    /// Returns the underlying integer.
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }

    /// Returns `true` for [`RawHandle::NULL`].
    #[inline]
    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for RawHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for RawHandle {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<RawHandle> for u64 {
    fn from(handle: RawHandle) -> Self {
        handle.0
    }
}

/// A [`RawHandle`] tagged at compile time with the kind of object it denotes.
///
/// The tag is a convenience for Rust callers: a handle rebuilt from a raw value
/// with the wrong tag is caught by the registry at resolve time.
pub struct Handle<T> {
    raw: RawHandle,
    _kind: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    /// Wraps a raw value received from the other side of the boundary.
    #[inline]
    pub fn from_raw(raw: RawHandle) -> Self {
        Self {
            raw,
            _kind: PhantomData,
        }
    }

    /// Returns the untyped value to hand across the boundary.
    #[inline]
    pub fn raw(self) -> RawHandle {
        self.raw
    }
}

// Manual impls: deriving would put bounds on `T`.

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle")
            .field(&std::any::type_name::<T>())
            .field(&self.raw.0)
            .finish()
    }
}

impl<T> From<Handle<T>> for RawHandle {
    fn from(handle: Handle<T>) -> Self {
        handle.raw
    }
}
