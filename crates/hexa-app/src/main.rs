//! `hexa`: sample, render and inspect layered noise from the command line.
//!
//! Configuration is loaded from `config.ron` (created with defaults on first
//! run) and can be overridden via global CLI flags, e.g.
//! `hexa --seed 7 --octaves 6 render --out slice.png`.

mod commands;
mod generator;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hexa_config::{CliArgs, Config};
use hexa_noise::NoiseEngine;

use crate::generator::AppError;

#[derive(Parser, Debug)]
#[command(name = "hexa", about = "Hexa layered noise tools", version)]
struct Cli {
    #[command(flatten)]
    args: CliArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the layered noise value at one point.
    Sample {
        #[arg(long, allow_hyphen_values = true)]
        x: f64,
        #[arg(long, allow_hyphen_values = true)]
        y: f64,
        #[arg(long, allow_hyphen_values = true)]
        z: f64,
        /// Fourth coordinate; only valid for 4D generators (defaults to 0).
        #[arg(long, allow_hyphen_values = true)]
        w: Option<f64>,
    },
    /// Render the configured slice to a PNG file.
    Render {
        #[arg(long)]
        out: PathBuf,
    },
    /// Sample pseudo-random points and print min/max/mean.
    Stats {
        #[arg(long, default_value_t = 10_000)]
        samples: usize,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("hexa: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config_dir = match cli.args.config.clone() {
        Some(dir) => dir,
        None => hexa_config::default_config_dir()
            .ok_or_else(|| AppError::Usage("could not resolve a config directory".to_string()))?,
    };

    let mut config = Config::load_or_create(&config_dir)?;
    config.apply_cli_overrides(&cli.args);
    config.validate()?;

    let log_dir = config_dir.join("logs");
    hexa_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));
    tracing::debug!(config_dir = %config_dir.display(), "configuration loaded");

    let engine = NoiseEngine::global();
    let layered = generator::build_layered(engine, &config.noise)?;

    let report = match cli.command {
        Command::Sample { x, y, z, w } => commands::sample(engine, layered, &config, [x, y, z], w)?,
        Command::Render { out } => commands::render(engine, layered, &config, &out)?,
        Command::Stats { samples } => commands::stats(engine, layered, &config, samples)?,
    };
    println!("{report}");
    Ok(())
}
