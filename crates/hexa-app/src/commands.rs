//! Subcommand implementations. Each returns its report as a string so the
//! caller decides where it goes.

use std::path::Path;

use hexa_config::Config;
use hexa_noise::debug_viz::{render_slice_3d, render_slice_4d};
use hexa_noise::{Dimension, Handle, LayeredNoise, NoiseEngine};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::generator::{AppError, dimension, slice_params};

/// Coordinates are drawn from `[-STATS_EXTENT, STATS_EXTENT)` on every axis.
const STATS_EXTENT: f64 = 1024.0;

/// Samples `handle` at one point. `w` is required to be absent for 3D.
pub fn sample(
    engine: &NoiseEngine,
    handle: Handle<LayeredNoise>,
    config: &Config,
    point: [f64; 3],
    w: Option<f64>,
) -> Result<String, AppError> {
    let [x, y, z] = point;
    let scale = config.noise.scale;
    let value = match (dimension(&config.noise)?, w) {
        (Dimension::Three, None) => engine.sample_3d(handle, scale, x, y, z)?,
        (Dimension::Three, Some(_)) => {
            return Err(AppError::Usage(
                "--w is only valid with a 4D generator".to_string(),
            ));
        }
        (Dimension::Four, w) => engine.sample_4d(handle, scale, x, y, z, w.unwrap_or(0.0))?,
    };
    Ok(format!("{value}"))
}

/// Renders the configured slice and writes it to `out` as PNG.
pub fn render(
    engine: &NoiseEngine,
    handle: Handle<LayeredNoise>,
    config: &Config,
    out: &Path,
) -> Result<String, AppError> {
    let params = slice_params(&config.slice);
    let scale = config.noise.scale;
    let image = match dimension(&config.noise)? {
        Dimension::Three => render_slice_3d(engine, handle.raw(), scale, &params)?,
        Dimension::Four => render_slice_4d(engine, handle.raw(), scale, &params)?,
    };
    image.write_png(out)?;
    tracing::info!(path = %out.display(), "rendered slice");
    Ok(format!(
        "wrote {}x{} slice to {}",
        image.width,
        image.height,
        out.display()
    ))
}

/// Summary of a batch of samples.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl SampleStats {
    fn of(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let (min, max, sum) = values.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(min, max, sum), &v| (min.min(v), max.max(v), sum + v),
        );
        Some(Self {
            count: values.len(),
            min,
            max,
            mean: sum / values.len() as f64,
        })
    }
}

/// Draws `samples` deterministic points from `seed` and samples them on a
/// few worker threads sharing `engine`.
pub fn collect_stats(
    engine: &NoiseEngine,
    handle: Handle<LayeredNoise>,
    config: &Config,
    samples: usize,
) -> Result<SampleStats, AppError> {
    if samples == 0 {
        return Err(AppError::Usage("--samples must be at least 1".to_string()));
    }
    let dimension = dimension(&config.noise)?;
    let scale = config.noise.scale;

    let mut rng = ChaCha8Rng::seed_from_u64(config.noise.seed);
    let points: Vec<[f64; 4]> = (0..samples)
        .map(|_| std::array::from_fn(|_| rng.random_range(-STATS_EXTENT..STATS_EXTENT)))
        .collect();

    let workers = num_cpus::get().clamp(1, 8);
    let chunk = points.len().div_ceil(workers);
    tracing::debug!(samples, workers, "collecting sample statistics");

    let values = std::thread::scope(|scope| {
        let jobs: Vec<_> = points
            .chunks(chunk)
            .map(|part| {
                scope.spawn(move || {
                    part.iter()
                        .map(|&[x, y, z, w]| match dimension {
                            Dimension::Three => engine.sample_3d(handle, scale, x, y, z),
                            Dimension::Four => engine.sample_4d(handle, scale, x, y, z, w),
                        })
                        .collect::<Result<Vec<f64>, _>>()
                })
            })
            .collect();

        let mut values = Vec::with_capacity(samples);
        for job in jobs {
            match job.join() {
                Ok(part) => values.extend(part?),
                Err(panic) => std::panic::resume_unwind(panic),
            }
        }
        Ok::<_, AppError>(values)
    })?;

    SampleStats::of(&values).ok_or_else(|| AppError::Usage("no samples taken".to_string()))
}

/// Formats [`collect_stats`] alongside the generator's amplitude bound.
pub fn stats(
    engine: &NoiseEngine,
    handle: Handle<LayeredNoise>,
    config: &Config,
    samples: usize,
) -> Result<String, AppError> {
    let stats = collect_stats(engine, handle, config, samples)?;
    let bound = engine.max_amplitude(handle)?;
    let peak = stats.min.abs().max(stats.max.abs());
    Ok(format!(
        "samples: {}\nmin: {:.6}\nmax: {:.6}\nmean: {:.6}\nmax amplitude: {:.6}\npeak / amplitude: {:.3}",
        stats.count,
        stats.min,
        stats.max,
        stats.mean,
        bound,
        peak / bound
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::build_layered;

    fn setup(dimension: u8) -> (NoiseEngine, Handle<LayeredNoise>, Config) {
        let mut config = Config::default();
        config.noise.dimension = dimension;
        config.noise.seed = 11;
        config.slice.width = 16;
        config.slice.height = 8;
        let engine = NoiseEngine::new();
        let handle = build_layered(&engine, &config.noise).unwrap();
        (engine, handle, config)
    }

    #[test]
    fn test_sample_prints_engine_value() {
        let (engine, handle, config) = setup(3);
        let expected = engine
            .sample_3d(handle, config.noise.scale, 10.0, 20.0, 30.0)
            .unwrap();
        let out = sample(&engine, handle, &config, [10.0, 20.0, 30.0], None).unwrap();
        assert_eq!(out.parse::<f64>().unwrap(), expected);
    }

    #[test]
    fn test_sample_rejects_w_for_3d() {
        let (engine, handle, config) = setup(3);
        let result = sample(&engine, handle, &config, [0.0; 3], Some(1.0));
        assert!(matches!(result, Err(AppError::Usage(_))));
    }

    #[test]
    fn test_sample_4d_defaults_w_to_zero() {
        let (engine, handle, config) = setup(4);
        let implicit = sample(&engine, handle, &config, [1.5, 2.5, 3.5], None).unwrap();
        let explicit = sample(&engine, handle, &config, [1.5, 2.5, 3.5], Some(0.0)).unwrap();
        assert_eq!(implicit, explicit);
    }

    #[test]
    fn test_render_writes_png() {
        let (engine, handle, config) = setup(4);
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("slice.png");

        let report = render(&engine, handle, &config, &out).unwrap();
        assert!(report.contains("16x8"));
        assert!(std::fs::metadata(&out).unwrap().len() > 0);
    }

    #[test]
    fn test_stats_deterministic_and_bounded() {
        let (engine, handle, config) = setup(3);
        let a = collect_stats(&engine, handle, &config, 2_000).unwrap();
        let b = collect_stats(&engine, handle, &config, 2_000).unwrap();

        assert_eq!(a.count, 2_000);
        assert_eq!((a.min, a.max), (b.min, b.max));
        assert!(a.min < a.max);
        assert!(a.min <= a.mean && a.mean <= a.max);

        let bound = 1.5 * engine.max_amplitude(handle).unwrap();
        assert!(a.min >= -bound && a.max <= bound);
    }

    #[test]
    fn test_stats_zero_samples_rejected() {
        let (engine, handle, config) = setup(3);
        assert!(matches!(
            collect_stats(&engine, handle, &config, 0),
            Err(AppError::Usage(_))
        ));
    }

    #[test]
    fn test_stats_after_release_fails() {
        let (engine, handle, config) = setup(3);
        engine.release(handle).unwrap();
        assert!(matches!(
            stats(&engine, handle, &config, 10),
            Err(AppError::Noise(_))
        ));
    }

    #[test]
    fn test_sample_stats_of() {
        let stats = SampleStats::of(&[1.0, -1.0, 0.5, 0.5]).unwrap();
        assert_eq!(stats.min, -1.0);
        assert_eq!(stats.max, 1.0);
        assert_eq!(stats.mean, 0.25);
        assert!(SampleStats::of(&[]).is_none());
    }
}
