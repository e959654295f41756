//! Noise debug visualization: greyscale images of planar slices through a
//! sampler or layered generator.
//!
//! Provides [`DebugImage`] plus renderers that sample an engine handle over a
//! rectangular region. Used by the command line tool to eyeball seeds and
//! octave settings without attaching a full client.

mod image;
mod renderers;

use thiserror::Error;

pub use self::image::DebugImage;
pub use renderers::{SliceParams, render_slice_3d, render_slice_4d, value_to_grey};

/// Errors raised while writing a debug image to disk.
#[derive(Debug, Error)]
pub enum DebugVizError {
    /// The output file could not be created or written.
    #[error("failed to write image: {0}")]
    Io(#[from] std::io::Error),

    /// PNG encoding failed.
    #[error("failed to encode PNG: {0}")]
    Encode(#[from] png::EncodingError),
}
