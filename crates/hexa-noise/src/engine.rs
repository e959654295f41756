//! The engine's call surface: every native object is reached through a handle.
//!
//! Typical flow: store a caller-shuffled permutation per octave to get sampler
//! handles, combine them into a layered handle, then sample that handle with a
//! scale and coordinates as often as needed.

use std::sync::{Arc, LazyLock};

use glam::{DVec3, DVec4};
use hexa_handle::{Handle, HandleRegistry, RawHandle};

use crate::{Dimension, GradientSampler, LayeredNoise, NoiseError, OctaveScheme, PermutationTable};

static GLOBAL: LazyLock<NoiseEngine> = LazyLock::new(|| {
    tracing::debug!("initializing process-wide noise engine");
    NoiseEngine::new()
});

/// Owns a [`HandleRegistry`] holding permutation tables, samplers and layered
/// generators, and exposes the handle-based operations on them.
///
/// All methods take `&self` and are safe to call from any number of threads.
#[derive(Debug)]
pub struct NoiseEngine {
    registry: HandleRegistry,
    scheme: OctaveScheme,
}

impl NoiseEngine {
    /// Creates an engine using [`OctaveScheme::DEFAULT`] for layering.
    pub fn new() -> Self {
        Self::with_scheme(OctaveScheme::DEFAULT)
    }

    /// Creates an engine whose layered generators use `scheme`.
    pub fn with_scheme(scheme: OctaveScheme) -> Self {
        Self {
            registry: HandleRegistry::new(),
            scheme,
        }
    }

    /// The process-wide engine, created on first use and never re-created.
    pub fn global() -> &'static NoiseEngine {
        &GLOBAL
    }

    /// The octave scheme applied to layered generators created here.
    pub fn scheme(&self) -> OctaveScheme {
        self.scheme
    }

    /// The underlying registry.
    pub fn registry(&self) -> &HandleRegistry {
        &self.registry
    }

    /// Number of live handles of any kind.
    pub fn live_handles(&self) -> usize {
        self.registry.len()
    }

    /// Validates and stores a permutation table.
    ///
    /// # Errors
    ///
    /// [`NoiseError::InvalidArgument`] if `values` is not a 256-entry (or
    /// doubled 512-entry) permutation of `0..=255`.
    pub fn store_permutation(&self, values: &[i32]) -> Result<Handle<PermutationTable>, NoiseError> {
        let table = PermutationTable::from_values(values)?;
        Ok(self.registry.register(table))
    }

    /// Returns a stored permutation table.
    ///
    /// # Errors
    ///
    /// [`NoiseError::InvalidHandle`] if the handle is not a live table.
    pub fn permutation(
        &self,
        handle: Handle<PermutationTable>,
    ) -> Result<Arc<PermutationTable>, NoiseError> {
        Ok(self.registry.resolve(handle)?)
    }

    /// Creates a sampler over a stored table. The table stays registered
    /// independently; the sampler shares it.
    ///
    /// # Errors
    ///
    /// [`NoiseError::InvalidHandle`] if `table` is not a live table.
    pub fn create_sampler(
        &self,
        dimension: Dimension,
        table: Handle<PermutationTable>,
    ) -> Result<Handle<GradientSampler>, NoiseError> {
        let table = self.registry.resolve(table)?;
        Ok(self
            .registry
            .register(GradientSampler::new(dimension, table)))
    }

    /// Stores a permutation and wraps it in a sampler in one step, returning
    /// only the sampler handle.
    ///
    /// # Errors
    ///
    /// [`NoiseError::InvalidArgument`] as for [`store_permutation`](Self::store_permutation).
    pub fn store_perms(
        &self,
        dimension: Dimension,
        values: &[i32],
    ) -> Result<Handle<GradientSampler>, NoiseError> {
        let table = Arc::new(PermutationTable::from_values(values)?);
        Ok(self
            .registry
            .register(GradientSampler::new(dimension, table)))
    }

    /// Combines sampler handles, in order, into a layered generator.
    ///
    /// # Errors
    ///
    /// [`NoiseError::InvalidArgument`] for an empty list or mixed dimensions,
    /// [`NoiseError::InvalidHandle`] for a handle that is not a live sampler.
    pub fn create_layered(&self, octaves: &[RawHandle]) -> Result<Handle<LayeredNoise>, NoiseError> {
        let octaves = octaves.iter().map(|&raw| Handle::from_raw(raw)).collect();
        let layered = LayeredNoise::new(&self.registry, self.scheme, octaves)?;
        tracing::debug!(
            octaves = layered.octaves().len(),
            dimension = %layered.dimension(),
            "created layered generator"
        );
        Ok(self.registry.register(layered))
    }

    /// Samples a 3D sampler or layered generator at `(x, y, z) * scale`.
    ///
    /// # Errors
    ///
    /// [`NoiseError::InvalidHandle`] if `handle` is not a live 3D sampler or
    /// layered generator, or if one of a layered generator's octaves has been
    /// released.
    pub fn sample_3d(
        &self,
        handle: impl Into<RawHandle>,
        scale: f64,
        x: f64,
        y: f64,
        z: f64,
    ) -> Result<f64, NoiseError> {
        let raw = handle.into();
        let point = DVec3::new(x, y, z);
        let object = self.registry.resolve_raw(raw)?;

        if let Some(sampler) = object.downcast_ref::<GradientSampler>()
            && sampler.dimension() == Dimension::Three
        {
            return Ok(sampler.noise_3d(scale, point));
        }
        if let Some(layered) = object.downcast_ref::<LayeredNoise>()
            && layered.dimension() == Dimension::Three
        {
            return layered.sample_3d(&self.registry, scale, point);
        }
        Err(NoiseError::InvalidHandle(raw))
    }

    /// Samples a 4D sampler or layered generator at `(x, y, z, w) * scale`.
    ///
    /// # Errors
    ///
    /// [`NoiseError::InvalidHandle`] if `handle` is not a live 4D sampler or
    /// layered generator, or if one of a layered generator's octaves has been
    /// released.
    pub fn sample_4d(
        &self,
        handle: impl Into<RawHandle>,
        scale: f64,
        x: f64,
        y: f64,
        z: f64,
        w: f64,
    ) -> Result<f64, NoiseError> {
        let raw = handle.into();
        let point = DVec4::new(x, y, z, w);
        let object = self.registry.resolve_raw(raw)?;

        if let Some(sampler) = object.downcast_ref::<GradientSampler>()
            && sampler.dimension() == Dimension::Four
        {
            return Ok(sampler.noise_4d(scale, point));
        }
        if let Some(layered) = object.downcast_ref::<LayeredNoise>()
            && layered.dimension() == Dimension::Four
        {
            return layered.sample_4d(&self.registry, scale, point);
        }
        Err(NoiseError::InvalidHandle(raw))
    }

    /// Upper bound on the amplitude sum of a sampler (1) or layered generator.
    ///
    /// # Errors
    ///
    /// [`NoiseError::InvalidHandle`] if `handle` is neither.
    pub fn max_amplitude(&self, handle: impl Into<RawHandle>) -> Result<f64, NoiseError> {
        let raw = handle.into();
        let object = self.registry.resolve_raw(raw)?;
        if object.is::<GradientSampler>() {
            Ok(1.0)
        } else if let Some(layered) = object.downcast_ref::<LayeredNoise>() {
            Ok(layered.max_amplitude())
        } else {
            Err(NoiseError::InvalidHandle(raw))
        }
    }

    /// Destroys whatever `handle` denotes. Layered generators do not take
    /// their octaves down with them.
    ///
    /// # Errors
    ///
    /// [`NoiseError::NotFound`] if the handle was never issued or is already
    /// released.
    pub fn release(&self, handle: impl Into<RawHandle>) -> Result<(), NoiseError> {
        Ok(self.registry.release_raw(handle.into())?)
    }
}

impl Default for NoiseEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
