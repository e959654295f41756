//! Noise engine error types.

use hexa_handle::{RawHandle, RegistryError};
use thiserror::Error;

/// Errors reported at the engine's call boundary.
///
/// All variants are recoverable; none of them abort the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoiseError {
    /// Malformed input: wrong table length, values that are not a
    /// permutation, an empty octave list, or mixed dimensions.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The handle does not resolve to a live object of the expected kind.
    #[error("invalid handle {0}")]
    InvalidHandle(RawHandle),

    /// Release of a handle that is not (or no longer) registered.
    #[error("handle {0} not found")]
    NotFound(RawHandle),
}

impl From<RegistryError> for NoiseError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::InvalidHandle { handle, .. } => Self::InvalidHandle(handle),
            RegistryError::NotFound(handle) => Self::NotFound(handle),
        }
    }
}
