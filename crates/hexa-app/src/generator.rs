//! Builds engine objects from the loaded configuration.

use hexa_config::{ConfigError, NoiseConfig, SliceConfig};
use hexa_noise::debug_viz::{DebugVizError, SliceParams};
use hexa_noise::{Dimension, Handle, LayeredNoise, NoiseEngine, NoiseError, PermutationTable};

/// Failures surfaced by the command line tool.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Noise(#[from] NoiseError),

    #[error(transparent)]
    Image(#[from] DebugVizError),

    #[error("{0}")]
    Usage(String),
}

/// The sampler dimension named by the config.
pub fn dimension(config: &NoiseConfig) -> Result<Dimension, AppError> {
    Dimension::from_axes(config.dimension as usize).ok_or_else(|| {
        AppError::Usage(format!("dimension must be 3 or 4, got {}", config.dimension))
    })
}

/// Registers one shuffled permutation per octave and layers them.
///
/// Octave `i` is seeded with `seed + i` (wrapping), so neighbouring seeds
/// share all but one octave.
pub fn build_layered(
    engine: &NoiseEngine,
    config: &NoiseConfig,
) -> Result<Handle<LayeredNoise>, AppError> {
    let dimension = dimension(config)?;

    let mut octaves = Vec::with_capacity(config.octaves as usize);
    for i in 0..u64::from(config.octaves) {
        let table = PermutationTable::shuffled(config.seed.wrapping_add(i));
        let sampler = engine.store_perms(dimension, &table.to_vec())?;
        octaves.push(sampler.raw());
    }

    let layered = engine.create_layered(&octaves)?;
    tracing::info!(
        seed = config.seed,
        octaves = config.octaves,
        %dimension,
        handle = %layered.raw(),
        "built layered generator"
    );
    Ok(layered)
}

pub fn slice_params(slice: &SliceConfig) -> SliceParams {
    SliceParams {
        width: slice.width,
        height: slice.height,
        region: (slice.x0, slice.y0, slice.x1, slice.y1),
        depth: slice.depth,
        time: slice.time,
    }
}
