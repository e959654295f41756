//! Configuration for the Hexa noise tools.
//!
//! Settings persist to disk as a RON file, can be overridden from the command
//! line via clap, and are validated before any generator is built.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, NoiseConfig, SliceConfig, default_config_dir};
pub use error::ConfigError;
