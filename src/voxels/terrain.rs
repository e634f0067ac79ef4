//! # Terrain Generation
//!
//! This module fills chunks from a 2D noise heightmap.
//!
//! Every column `(x, z)` of a chunk samples the noise field once at its world-space
//! position scaled by the configured frequency. The sample is mapped from `[-1, 1]`
//! to `[0, 1]`, scaled by the maximum height and floored; every voxel at or below
//! that world height is solid. There are no caves, overhangs or biomes.
//!
//! Generation is a pure function of the seed, the chunk coordinate and the settings,
//! so a chunk can always be regenerated instead of stored.

use std::sync::Arc;

use crate::config::WorldSettings;

use super::chunk::{voxel_grid::VoxelGrid, ChunkCoord};
use super::noise::NoiseSource;

/// Deterministic heightmap terrain generator.
#[derive(Clone)]
pub struct TerrainGenerator {
    seed: i64,
    chunk_size: usize,
    frequency: f64,
    max_height: i64,
    noise: Arc<dyn NoiseSource>,
}

impl TerrainGenerator {
    /// Creates a generator sampling the given noise source.
    ///
    /// # Arguments
    /// * `settings` - Seed, chunk size, frequency and maximum height
    /// * `noise` - The 2D noise field the heightmap is read from
    pub fn new(settings: &WorldSettings, noise: Arc<dyn NoiseSource>) -> Self {
        TerrainGenerator {
            seed: settings.seed,
            chunk_size: settings.chunk_size,
            frequency: settings.frequency,
            max_height: settings.max_height,
            noise,
        }
    }

    /// Creates a generator using the noise function named in the settings.
    pub fn from_settings(settings: &WorldSettings) -> Self {
        Self::new(settings, settings.noise.build(settings.seed))
    }

    /// World-space height of the terrain surface at a column.
    ///
    /// Voxels with a world `y` at or below this value are solid.
    pub fn column_height(&self, world_x: i64, world_z: i64) -> i64 {
        let raw = self
            .noise
            .noise2(
                self.seed,
                world_x as f64 * self.frequency,
                world_z as f64 * self.frequency,
            )
            .clamp(-1.0, 1.0);
        let h01 = (raw + 1.0) / 2.0;
        (h01 * self.max_height as f64).floor() as i64
    }

    /// Generates the occupancy of the chunk at `position`.
    pub fn generate(&self, position: ChunkCoord) -> VoxelGrid {
        let n = self.chunk_size;
        let size = n as i64;
        let mut grid = VoxelGrid::new(n);

        let base_x = position.x as i64 * size;
        let base_y = position.y as i64 * size;
        let base_z = position.z as i64 * size;

        for z in 0..n {
            for x in 0..n {
                let height = self.column_height(base_x + x as i64, base_z + z as i64);
                // Local y values with base_y + y <= height.
                let solid = (height - base_y + 1).clamp(0, size) as usize;
                grid.fill_column(x, z, solid);
            }
        }

        grid
    }
}
