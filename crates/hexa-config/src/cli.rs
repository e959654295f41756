//! Command-line overrides for the configuration.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Hexa command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "hexa", about = "Hexa layered noise tools")]
pub struct CliArgs {
    /// Base seed for the octave permutations.
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Number of octaves.
    #[arg(long, global = true)]
    pub octaves: Option<u32>,

    /// Sampler dimension (3 or 4).
    #[arg(long, global = true)]
    pub dimension: Option<u8>,

    /// Coordinate scale applied before the first octave.
    #[arg(long, global = true)]
    pub scale: Option<f64>,

    /// Rendered image width.
    #[arg(long, global = true)]
    pub width: Option<u32>,

    /// Rendered image height.
    #[arg(long, global = true)]
    pub height: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.noise.seed = seed;
        }
        if let Some(octaves) = args.octaves {
            self.noise.octaves = octaves;
        }
        if let Some(dimension) = args.dimension {
            self.noise.dimension = dimension;
        }
        if let Some(scale) = args.scale {
            self.noise.scale = scale;
        }
        if let Some(w) = args.width {
            self.slice.width = w;
        }
        if let Some(h) = args.height {
            self.slice.height = h;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            seed: Some(99),
            dimension: Some(4),
            width: Some(64),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.noise.seed, 99);
        assert_eq!(config.noise.dimension, 4);
        assert_eq!(config.slice.width, 64);
        // Non-overridden fields retain defaults
        assert_eq!(config.noise.octaves, 4);
        assert_eq!(config.slice.height, 256);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::parse_from(["hexa", "--octaves", "6", "--scale", "0.5"]);
        assert_eq!(args.octaves, Some(6));
        assert_eq!(args.scale, Some(0.5));
        assert!(args.config.is_none());
    }

    #[test]
    fn test_override_can_make_config_invalid() {
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs {
            octaves: Some(0),
            ..Default::default()
        });
        assert!(config.validate().is_err());
    }
}
