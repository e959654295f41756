//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Default location of the config directory: `<platform config dir>/hexa`.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("hexa"))
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Generator settings.
    pub noise: NoiseConfig,
    /// Region rendered by the `render` command.
    pub slice: SliceConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Layered generator configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NoiseConfig {
    /// Base seed; octave `i` shuffles its permutation with `seed + i`.
    pub seed: u64,
    /// Number of octaves (at least 1).
    pub octaves: u32,
    /// Sampler dimension, 3 or 4.
    pub dimension: u8,
    /// Coordinate multiplier applied before the first octave.
    pub scale: f64,
}

/// Slice rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SliceConfig {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Left edge of the region.
    pub x0: f64,
    /// Top edge of the region.
    pub y0: f64,
    /// Right edge of the region.
    pub x1: f64,
    /// Bottom edge of the region.
    pub y1: f64,
    /// Z coordinate of the slice.
    pub depth: f64,
    /// W coordinate of the slice (4D only).
    pub time: f64,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            octaves: 4,
            dimension: 3,
            scale: 1.0 / 32.0,
        }
    }
}

impl Default for SliceConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            x0: 0.0,
            y0: 0.0,
            x1: 256.0,
            y1: 256.0,
            depth: 0.5,
            time: 0.0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Validation ---

impl Config {
    /// Checks that the config describes a generator and slice that can be
    /// built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let noise = &self.noise;
        if noise.octaves == 0 {
            return Err(ConfigError::Invalid("octaves must be at least 1".to_string()));
        }
        if !matches!(noise.dimension, 3 | 4) {
            return Err(ConfigError::Invalid(format!(
                "dimension must be 3 or 4, got {}",
                noise.dimension
            )));
        }
        if !noise.scale.is_finite() || noise.scale <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "scale must be finite and positive, got {}",
                noise.scale
            )));
        }

        let slice = &self.slice;
        if slice.width == 0 || slice.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "slice size must be non-zero, got {}x{}",
                slice.width, slice.height
            )));
        }
        let coords = [slice.x0, slice.y0, slice.x1, slice.y1, slice.depth, slice.time];
        if coords.iter().any(|c| !c.is_finite()) {
            return Err(ConfigError::Invalid(
                "slice coordinates must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
