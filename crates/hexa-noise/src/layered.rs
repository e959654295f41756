//! Multi-octave (fractal Brownian motion) composition of gradient samplers.
//!
//! Octave `i` contributes `persistence^i * noise(point * scale * lacunarity^i)`,
//! summed in creation order. The sum is not normalized.

use glam::{DVec3, DVec4};
use hexa_handle::{Handle, HandleRegistry};

use crate::{Dimension, GradientSampler, NoiseError};

/// Frequency/amplitude growth between successive octaves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OctaveScheme {
    /// Amplitude multiplier between successive octaves.
    pub persistence: f64,
    /// Frequency multiplier between successive octaves.
    pub lacunarity: f64,
}

impl OctaveScheme {
    /// Halving amplitude, doubling frequency: octave `i` samples at
    /// `scale / amplitude_i`.
    pub const DEFAULT: Self = Self {
        persistence: 0.5,
        lacunarity: 2.0,
    };

    /// The `(frequency, amplitude)` of octave `index`.
    pub fn octave(&self, index: usize) -> Octave {
        let exp = index as i32;
        Octave {
            frequency: self.lacunarity.powi(exp),
            amplitude: self.persistence.powi(exp),
        }
    }

    /// Iterator over the first `count` octaves.
    pub fn octaves(self, count: usize) -> impl Iterator<Item = Octave> {
        (0..count).map(move |i| self.octave(i))
    }

    /// Upper bound on the summed amplitudes of `count` octaves.
    pub fn max_amplitude(&self, count: usize) -> f64 {
        self.octaves(count).map(|o| o.amplitude).sum()
    }
}

impl Default for OctaveScheme {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Frequency and amplitude multipliers of a single octave.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Octave {
    /// Multiplies the caller's scale.
    pub frequency: f64,
    /// Weight of this octave's contribution.
    pub amplitude: f64,
}

/// Sums `sample(octave_index, octave_scale)` over `count` octaves, in order.
///
/// Octave `i` is sampled at `scale * lacunarity^i` and weighted by
/// `persistence^i`. The first error returned by `sample` stops the sum.
pub fn fractal_sum<E>(
    scheme: OctaveScheme,
    count: usize,
    scale: f64,
    mut sample: impl FnMut(usize, f64) -> Result<f64, E>,
) -> Result<f64, E> {
    scheme
        .octaves(count)
        .enumerate()
        .try_fold(0.0, |total, (i, octave)| {
            Ok(total + octave.amplitude * sample(i, scale * octave.frequency)?)
        })
}

/// An ordered set of sampler handles evaluated as one fractal sum.
///
/// The generator refers to its octaves by handle and does not own them:
/// releasing it leaves the samplers alive, and releasing a sampler makes later
/// samples of this generator fail with [`NoiseError::InvalidHandle`].
#[derive(Clone, Debug)]
pub struct LayeredNoise {
    dimension: Dimension,
    scheme: OctaveScheme,
    octaves: Vec<Handle<GradientSampler>>,
}

impl LayeredNoise {
    /// Validates `octaves` against `registry` and builds the generator.
    ///
    /// # Errors
    ///
    /// [`NoiseError::InvalidArgument`] for an empty list or mixed dimensions,
    /// [`NoiseError::InvalidHandle`] for a handle that is not a live sampler.
    pub fn new(
        registry: &HandleRegistry,
        scheme: OctaveScheme,
        octaves: Vec<Handle<GradientSampler>>,
    ) -> Result<Self, NoiseError> {
        let Some(&first) = octaves.first() else {
            return Err(NoiseError::InvalidArgument(
                "a layered generator needs at least one octave".to_string(),
            ));
        };

        let dimension = registry.resolve(first)?.dimension();
        for &handle in &octaves[1..] {
            let other = registry.resolve(handle)?.dimension();
            if other != dimension {
                return Err(NoiseError::InvalidArgument(format!(
                    "octave {} is {other} but the first octave is {dimension}",
                    handle.raw()
                )));
            }
        }

        Ok(Self {
            dimension,
            scheme,
            octaves,
        })
    }

    /// The shared dimension of every octave.
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// The growth factors used between octaves.
    pub fn scheme(&self) -> OctaveScheme {
        self.scheme
    }

    /// Octave handles in evaluation order.
    pub fn octaves(&self) -> &[Handle<GradientSampler>] {
        &self.octaves
    }

    /// Upper bound on the magnitude of the unscaled amplitude sum.
    pub fn max_amplitude(&self) -> f64 {
        self.scheme.max_amplitude(self.octaves.len())
    }

    /// 3D fractal sum at `point`.
    ///
    /// # Errors
    ///
    /// [`NoiseError::InvalidHandle`] if any octave has been released.
    pub fn sample_3d(
        &self,
        registry: &HandleRegistry,
        scale: f64,
        point: DVec3,
    ) -> Result<f64, NoiseError> {
        fractal_sum(self.scheme, self.octaves.len(), scale, |i, s| {
            registry
                .resolve(self.octaves[i])
                .map(|sampler| sampler.noise_3d(s, point))
                .map_err(NoiseError::from)
        })
    }

    /// 4D fractal sum at `point`.
    ///
    /// # Errors
    ///
    /// [`NoiseError::InvalidHandle`] if any octave has been released.
    pub fn sample_4d(
        &self,
        registry: &HandleRegistry,
        scale: f64,
        point: DVec4,
    ) -> Result<f64, NoiseError> {
        fractal_sum(self.scheme, self.octaves.len(), scale, |i, s| {
            registry
                .resolve(self.octaves[i])
                .map(|sampler| sampler.noise_4d(s, point))
                .map_err(NoiseError::from)
        })
    }
}
