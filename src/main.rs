//! # Voxel Terrain Demo
//!
//! Builds a terrain world from a configuration file and logs its statistics.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- --config world_config.json --seed 42 --stitch
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use voxel_terrain::RunOptions;

/// Generate and mesh a voxel terrain world.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON world configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured world seed
    #[arg(short, long, allow_negative_numbers = true)]
    seed: Option<i64>,

    /// Mesh chunk borders against their neighbors
    #[arg(long)]
    stitch: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let options = RunOptions {
        config: args.config,
        seed: args.seed,
        stitch: args.stitch,
    };

    match voxel_terrain::run(options) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
