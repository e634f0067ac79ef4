//! # World Configuration
//!
//! This module holds the process-wide values a world is built from: the chunk edge
//! length, the noise frequency and height scale, the chunk-count extent and the seed.
//!
//! ## Two Stages
//!
//! * [`WorldConfig`] is the serde-facing shape. Every field has a default, so a JSON
//!   file only needs to name the values it overrides.
//! * [`WorldSettings`] is the validated, strongly typed form. It is produced once by
//!   [`WorldConfig::validate`] before any chunk is generated and is immutable for the
//!   lifetime of the world.
//!
//! Degenerate values (a chunk edge of zero, a negative extent, a non-finite frequency)
//! are rejected here so that terrain generation and meshing never have to check them.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::voxels::noise::NoiseKind;
use crate::voxels::world::ChunkExtent;

/// Default chunk edge length in voxels.
pub const DEFAULT_CHUNK_SIZE: i32 = 16;
/// Default horizontal noise frequency. Smaller values give longer terrain features.
pub const DEFAULT_FREQUENCY: f64 = 0.01;
/// Default world seed.
pub const DEFAULT_SEED: i64 = 1337;
/// Default world extent in chunks along x, y and z.
pub const DEFAULT_WORLD_EXTENT: [i32; 3] = [4, 2, 4];
/// Largest accepted chunk edge length. A chunk allocates `size³` bits per flag.
pub const MAX_CHUNK_SIZE: i32 = 512;
/// Largest accepted number of chunks in one world.
pub const MAX_WORLD_CHUNKS: usize = 1 << 20;

const _: () = assert!(MAX_WORLD_CHUNKS as i64 * MAX_CHUNK_SIZE as i64 <= i32::MAX as i64);

/// Errors raised while loading or validating a [`WorldConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("chunk size must be positive, got {0}")]
    InvalidChunkSize(i32),
    #[error("chunk size must not exceed {MAX_CHUNK_SIZE}, got {0}")]
    ChunkSizeTooLarge(i32),
    #[error("world extent along {axis} must not be negative, got {value}")]
    NegativeExtent { axis: char, value: i32 },
    #[error("world extent {extent:?} exceeds {MAX_WORLD_CHUNKS} chunks")]
    WorldTooLarge { extent: [u32; 3] },
    #[error("world extent along {axis} spans more than i32::MAX voxels with chunk size {chunk_size}")]
    WorldSpanTooLarge { axis: char, chunk_size: usize },
    #[error("noise frequency must be finite and positive, got {0}")]
    InvalidFrequency(f64),
    #[error("max height must not be negative, got {0}")]
    InvalidMaxHeight(i32),
    #[error("constant noise value must be finite, got {0}")]
    InvalidConstantNoise(f64),
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// User-facing world configuration, deserialized from JSON.
///
/// # Examples
///
/// ```
/// use voxel_terrain::config::WorldConfig;
///
/// let config = WorldConfig::from_json_str(r#"{ "seed": 7, "world_extent": [2, 1, 2] }"#).unwrap();
/// let settings = config.validate().unwrap();
/// assert_eq!(settings.seed, 7);
/// assert_eq!(settings.max_height, 2 * settings.chunk_size as i64);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// The 64-bit seed driving every noise sample.
    pub seed: i64,
    /// Edge length `N` of every chunk, in voxels.
    pub chunk_size: i32,
    /// Multiplier applied to world column coordinates before sampling noise.
    pub frequency: f64,
    /// Height that a noise value of `1.0` maps to. Defaults to `2 * chunk_size`.
    pub max_height: Option<i32>,
    /// Number of chunks along x, y and z. Chunk coordinates run from zero to the
    /// extent (exclusive) on each axis.
    pub world_extent: [i32; 3],
    /// Which coherent noise function fills the heightmap.
    pub noise: NoiseKind,
    /// Number of worker threads used while building the world. Zero selects the
    /// available parallelism of the machine.
    pub worker_threads: usize,
    /// Mesh chunk borders against their neighbors instead of treating the outside
    /// of each chunk as empty.
    pub stitch_chunk_borders: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            seed: DEFAULT_SEED,
            chunk_size: DEFAULT_CHUNK_SIZE,
            frequency: DEFAULT_FREQUENCY,
            max_height: None,
            world_extent: DEFAULT_WORLD_EXTENT,
            noise: NoiseKind::default(),
            worker_threads: 0,
            stitch_chunk_borders: false,
        }
    }
}

impl WorldConfig {
    /// Parses a configuration from a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Arguments
    /// * `path` - Location of the JSON document
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not a valid configuration document.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded world config from {}", path.display());
        Self::from_json_str(&json)
    }

    /// Checks every value and converts the configuration into [`WorldSettings`].
    ///
    /// This is the single place where configuration preconditions are enforced.
    /// Nothing downstream re-validates them.
    pub fn validate(&self) -> Result<WorldSettings, ConfigError> {
        if self.chunk_size <= 0 {
            return Err(ConfigError::InvalidChunkSize(self.chunk_size));
        }
        if self.chunk_size > MAX_CHUNK_SIZE {
            return Err(ConfigError::ChunkSizeTooLarge(self.chunk_size));
        }
        for (axis, value) in ['x', 'y', 'z'].into_iter().zip(self.world_extent) {
            if value < 0 {
                return Err(ConfigError::NegativeExtent { axis, value });
            }
        }
        if !self.frequency.is_finite() || self.frequency <= 0.0 {
            return Err(ConfigError::InvalidFrequency(self.frequency));
        }
        let max_height = self.max_height.unwrap_or(2 * self.chunk_size);
        if max_height < 0 {
            return Err(ConfigError::InvalidMaxHeight(max_height));
        }
        if let NoiseKind::Constant { value } = self.noise {
            if !value.is_finite() {
                return Err(ConfigError::InvalidConstantNoise(value));
            }
        }

        let [x, y, z] = self.world_extent;
        let extent = ChunkExtent::new(x as u32, y as u32, z as u32);
        let chunk_size = self.chunk_size as usize;
        check_world_size(extent, chunk_size)?;

        let worker_threads = match self.worker_threads {
            0 => std::thread::available_parallelism().map_or(1, |n| n.get()),
            n => n,
        };

        Ok(WorldSettings {
            seed: self.seed,
            chunk_size,
            frequency: self.frequency,
            max_height: max_height as i64,
            extent,
            noise: self.noise,
            worker_threads,
            stitch_chunk_borders: self.stitch_chunk_borders,
        })
    }
}

/// Checks that a world fits in memory and in `i32` voxel coordinates.
///
/// # Returns
/// The number of chunks in the world.
pub(crate) fn check_world_size(extent: ChunkExtent, chunk_size: usize) -> Result<usize, ConfigError> {
    let chunks = extent
        .checked_len()
        .filter(|&chunks| chunks <= MAX_WORLD_CHUNKS)
        .ok_or(ConfigError::WorldTooLarge {
            extent: [extent.x, extent.y, extent.z],
        })?;

    for (axis, chunks_along) in ['x', 'y', 'z'].into_iter().zip([extent.x, extent.y, extent.z]) {
        let span = i32::try_from(chunk_size)
            .ok()
            .and_then(|size| i32::try_from(chunks_along).ok()?.checked_mul(size));
        if span.is_none() {
            return Err(ConfigError::WorldSpanTooLarge { axis, chunk_size });
        }
    }

    Ok(chunks)
}

/// Validated world settings. Constructed only through [`WorldConfig::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct WorldSettings {
    /// World seed.
    pub seed: i64,
    /// Chunk edge length `N`, always at least one.
    pub chunk_size: usize,
    /// Noise frequency, finite and positive.
    pub frequency: f64,
    /// Height reached by a noise value of `1.0`.
    pub max_height: i64,
    /// Chunk-count extent of the world.
    pub extent: ChunkExtent,
    /// Selected noise function.
    pub noise: NoiseKind,
    /// Worker thread count, always at least one.
    pub worker_threads: usize,
    /// Whether chunk borders are meshed against neighbor chunks.
    pub stitch_chunk_borders: bool,
}

impl Default for WorldSettings {
    fn default() -> Self {
        WorldSettings {
            seed: DEFAULT_SEED,
            chunk_size: DEFAULT_CHUNK_SIZE as usize,
            frequency: DEFAULT_FREQUENCY,
            max_height: 2 * DEFAULT_CHUNK_SIZE as i64,
            extent: ChunkExtent::new(
                DEFAULT_WORLD_EXTENT[0] as u32,
                DEFAULT_WORLD_EXTENT[1] as u32,
                DEFAULT_WORLD_EXTENT[2] as u32,
            ),
            noise: NoiseKind::default(),
            worker_threads: 1,
            stitch_chunk_borders: false,
        }
    }
}
