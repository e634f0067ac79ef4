#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Terrain
//!
//! Chunked heightmap terrain generation and greedy meshing for voxel worlds.
//!
//! The crate fills fixed-size cubic chunks from a deterministic 2D noise field and
//! converts each chunk's occupancy into a small set of rectangular surface quads.
//! The output is renderer-agnostic: per chunk, a world-space origin, a geometry
//! buffer (positions, normals and UV placeholders) and a bounding box for culling.
//! Windowing, cameras, textures and draw submission belong to the host engine.
//!
//! ## Key Modules
//!
//! * `config` - JSON configuration and its validated settings
//! * `voxels` - voxel grids, noise, terrain generation and the world grid
//! * `meshing` - the greedy mesher and its geometry buffers
//! * `task_management` - the worker pool that builds worlds in parallel
//!
//! ## Usage
//!
//! ```
//! use voxel_terrain::config::WorldConfig;
//! use voxel_terrain::voxels::world::WorldGrid;
//!
//! let config = WorldConfig {
//!     chunk_size: 8,
//!     world_extent: [2, 2, 2],
//!     ..WorldConfig::default()
//! };
//! let world = WorldGrid::new(&config).unwrap();
//!
//! for chunk in world.chunks() {
//!     let _origin = chunk.origin();
//!     let _vertices = chunk.mesh().vertices();
//!     let _indices = chunk.mesh().indices();
//! }
//! ```

use std::path::PathBuf;

use log::info;

use config::WorldConfig;
use voxels::world::{WorldError, WorldGrid, WorldStats};

pub mod config;
pub mod meshing;
pub mod task_management;
pub mod voxels;

/// Command-line overrides applied on top of the configuration file.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// JSON configuration file. Defaults apply when absent.
    pub config: Option<PathBuf>,
    /// Replaces the configured seed.
    pub seed: Option<i64>,
    /// Forces chunk border stitching on.
    pub stitch: bool,
}

/// Initializes logging, builds a world and reports its statistics.
///
/// Logging goes to stdout, filtered by `RUST_LOG`. The logger is installed by the
/// first call; later calls in the same process keep it.
///
/// # Errors
/// Returns a [`WorldError`] if the configuration cannot be loaded or is invalid, or
/// if the worker pool fails.
pub fn run(options: RunOptions) -> Result<WorldStats, WorldError> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG");
    if log_builder.try_init().is_ok() {
        info!("Logger initialized");
    }

    let mut config = match &options.config {
        Some(path) => WorldConfig::load(path)?,
        None => WorldConfig::default(),
    };
    if let Some(seed) = options.seed {
        config.seed = seed;
    }
    config.stitch_chunk_borders |= options.stitch;

    let world = WorldGrid::new(&config)?;
    let stats = world.stats();

    info!(
        "{} chunks, {} solid voxels, {} quads, {} vertices",
        stats.chunks, stats.solid_voxels, stats.quads, stats.vertices
    );

    Ok(stats)
}
