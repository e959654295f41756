//! Layered gradient noise: permutation tables, 3D/4D Improved Perlin samplers,
//! fractal octave sums, and a handle-based engine that owns them all.

mod engine;
mod error;
mod gradient;
mod layered;
mod permutation;

pub mod debug_viz;

pub use engine::NoiseEngine;
pub use error::NoiseError;
pub use gradient::{Dimension, GradientSampler, fade, perlin_3d, perlin_4d};
pub use hexa_handle::{Handle, RawHandle};
pub use layered::{LayeredNoise, Octave, OctaveScheme, fractal_sum};
pub use permutation::{PERMUTATION_SIZE, PermutationTable};
