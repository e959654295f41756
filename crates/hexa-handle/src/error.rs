//! Registry error types.

use thiserror::Error;

use crate::RawHandle;

/// Errors reported by [`crate::HandleRegistry`].
///
/// Both variants are recoverable caller errors, never crash conditions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The handle is unknown, already released, or denotes a different kind
    /// of object than the one requested.
    #[error("handle {handle} does not refer to a live {expected}")]
    InvalidHandle {
        /// The handle that failed to resolve.
        handle: RawHandle,
        /// Type name of the object the caller asked for.
        expected: &'static str,
    },

    /// Release of a handle that is not (or no longer) registered.
    #[error("handle {0} is not registered")]
    NotFound(RawHandle),
}
