//! # World Module
//!
//! This module provides the `WorldGrid`, which owns every chunk of a world and maps
//! chunk coordinates to them.
//!
//! ## Construction
//!
//! A world is built eagerly. For every coordinate in its extent a generation task
//! fills a grid and a meshing task turns it into a [`Chunk`]. Both run on the
//! [`TaskManager`] worker pool; results are collected in a [`WorldAssembly`] on the
//! constructing thread, so the chunk map is never shared while it is being filled.
//! Chunks are published as `Arc<Chunk>` only once their mesh is complete, and the set
//! of chunks never changes afterwards.
//!
//! ## Chunk Borders
//!
//! By default each chunk is meshed in isolation and emits faces on all of its outer
//! boundaries, including the ones it shares with a solid neighbor. With
//! `stitch_chunk_borders` enabled, meshing waits until every grid exists and each
//! chunk is meshed with a [`NeighborBorder`] that reads the single layer of voxels
//! just across its faces. Chunks still never reference each other.

use std::collections::HashMap;
use std::sync::Arc;

use cgmath::Point3;
use log::{debug, info};
use thiserror::Error;
use web_time::Instant;

use crate::config::{check_world_size, ConfigError, WorldConfig, WorldSettings};
use crate::meshing::tasks::chunk_mesh_generation_task::ChunkMeshGenerationTask;
use crate::meshing::{Aabb, BorderQuery};
use crate::task_management::task::Task;
use crate::task_management::{TaskError, TaskManager};

use super::chunk::{voxel_grid::VoxelGrid, Chunk, ChunkCoord};
use super::noise::NoiseSource;
use super::tasks::chunk_generation_task::ChunkGenerationTask;
use super::terrain::TerrainGenerator;

/// Errors raised while building a world.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Task(#[from] TaskError),
}

/// Number of chunks along each axis. Chunk coordinates run from zero up to, but not
/// including, the extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkExtent {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl ChunkExtent {
    pub fn new(x: u32, y: u32, z: u32) -> Self {
        ChunkExtent { x, y, z }
    }

    /// Total number of chunks, saturating at `usize::MAX`.
    pub fn len(&self) -> usize {
        self.checked_len().unwrap_or(usize::MAX)
    }

    /// Total number of chunks, or `None` if it does not fit in `usize`.
    pub fn checked_len(&self) -> Option<usize> {
        (self.x as usize)
            .checked_mul(self.y as usize)?
            .checked_mul(self.z as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, position: ChunkCoord) -> bool {
        (0..self.x as i64).contains(&(position.x as i64))
            && (0..self.y as i64).contains(&(position.y as i64))
            && (0..self.z as i64).contains(&(position.z as i64))
    }

    /// Every chunk coordinate in the extent, x fastest.
    pub fn positions(&self) -> impl Iterator<Item = ChunkCoord> {
        let (ex, ey, ez) = (self.x as i32, self.y as i32, self.z as i32);
        (0..ez).flat_map(move |z| {
            (0..ey).flat_map(move |y| (0..ex).map(move |x| Point3::new(x, y, z)))
        })
    }
}

/// Aggregate counts over every chunk of a world.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorldStats {
    pub chunks: usize,
    pub solid_voxels: usize,
    pub quads: usize,
    pub vertices: usize,
}

/// Neighbor lookup for one chunk, backed by the grids of the whole world.
///
/// Out-of-range local coordinates are resolved to the neighboring chunk and its
/// local coordinate. Positions outside the world read as empty.
#[derive(Debug, Clone)]
pub struct NeighborBorder {
    position: ChunkCoord,
    size: i32,
    grids: Arc<HashMap<ChunkCoord, Arc<VoxelGrid>>>,
}

impl NeighborBorder {
    pub fn new(
        position: ChunkCoord,
        size: usize,
        grids: Arc<HashMap<ChunkCoord, Arc<VoxelGrid>>>,
    ) -> Self {
        NeighborBorder {
            position,
            size: size as i32,
            grids,
        }
    }
}

impl BorderQuery for NeighborBorder {
    fn is_solid(&self, coord: Point3<i32>) -> bool {
        let n = self.size;
        let neighbor = Point3::new(
            self.position.x + coord.x.div_euclid(n),
            self.position.y + coord.y.div_euclid(n),
            self.position.z + coord.z.div_euclid(n),
        );
        let local = Point3::new(
            coord.x.rem_euclid(n),
            coord.y.rem_euclid(n),
            coord.z.rem_euclid(n),
        );
        self.grids
            .get(&neighbor)
            .is_some_and(|grid| grid.is_solid(local))
    }
}

/// The state of a world while its chunks are still being built.
///
/// Owned by the constructing thread and handed to task results one at a time.
pub struct WorldAssembly {
    expected_chunks: usize,
    stitch_chunk_borders: bool,
    parked_grids: HashMap<ChunkCoord, Arc<VoxelGrid>>,
    chunks: HashMap<ChunkCoord, Arc<Chunk>>,
}

impl WorldAssembly {
    pub(crate) fn new(expected_chunks: usize, stitch_chunk_borders: bool) -> Self {
        WorldAssembly {
            expected_chunks,
            stitch_chunk_borders,
            parked_grids: HashMap::new(),
            chunks: HashMap::with_capacity(expected_chunks),
        }
    }

    /// Accepts a freshly generated grid.
    ///
    /// # Returns
    /// The meshing tasks that can start now. Without stitching that is a task for
    /// this grid alone; with stitching nothing starts until the last grid arrives,
    /// and then every chunk is scheduled at once.
    pub(crate) fn accept_grid(
        &mut self,
        position: ChunkCoord,
        grid: Arc<VoxelGrid>,
    ) -> Vec<Box<dyn Task + Send>> {
        if !self.stitch_chunk_borders {
            return vec![Box::new(ChunkMeshGenerationTask::new(position, grid, None))];
        }

        self.parked_grids.insert(position, grid);
        if self.parked_grids.len() < self.expected_chunks {
            return Vec::new();
        }

        debug!("All {} grids generated, meshing with stitched borders", self.expected_chunks);
        let grids = Arc::new(std::mem::take(&mut self.parked_grids));
        grids
            .iter()
            .map(|(&position, grid)| {
                let border = NeighborBorder::new(position, grid.size(), grids.clone());
                Box::new(ChunkMeshGenerationTask::new(position, grid.clone(), Some(border)))
                    as Box<dyn Task + Send>
            })
            .collect()
    }

    /// Publishes a finished chunk.
    pub(crate) fn insert_chunk(&mut self, chunk: Chunk) {
        self.chunks.insert(chunk.position(), Arc::new(chunk));
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }
}

/// A fixed set of terrain chunks keyed by chunk coordinate.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_terrain::config::WorldConfig;
/// use voxel_terrain::voxels::world::WorldGrid;
///
/// let config = WorldConfig {
///     chunk_size: 8,
///     world_extent: [2, 1, 2],
///     worker_threads: 2,
///     ..WorldConfig::default()
/// };
/// let world = WorldGrid::new(&config).unwrap();
///
/// assert_eq!(world.len(), 4);
/// assert!(world.get_chunk_at(Point3::new(1, 0, 1)).is_some());
/// assert!(world.get_chunk_at(Point3::new(2, 0, 0)).is_none());
/// ```
pub struct WorldGrid {
    settings: WorldSettings,
    chunks: HashMap<ChunkCoord, Arc<Chunk>>,
}

impl WorldGrid {
    /// Validates a configuration and builds the world it describes.
    ///
    /// # Errors
    /// Returns [`WorldError::Config`] for invalid settings, before any chunk is
    /// generated, and [`WorldError::Task`] if the worker pool fails.
    pub fn new(config: &WorldConfig) -> Result<Self, WorldError> {
        Self::from_settings(config.validate()?)
    }

    /// Builds a world with the noise function named in the settings.
    pub fn from_settings(settings: WorldSettings) -> Result<Self, WorldError> {
        let noise = settings.noise.build(settings.seed);
        Self::with_noise(settings, noise)
    }

    /// Builds a world sampling the given noise source.
    ///
    /// # Errors
    /// Returns [`WorldError::Config`] if the extent holds more than
    /// [`MAX_WORLD_CHUNKS`](crate::config::MAX_WORLD_CHUNKS) chunks or its voxel span
    /// overflows `i32`.
    pub fn with_noise(
        settings: WorldSettings,
        noise: Arc<dyn NoiseSource>,
    ) -> Result<Self, WorldError> {
        let start = Instant::now();
        let expected = check_world_size(settings.extent, settings.chunk_size)?;
        let generator = Arc::new(TerrainGenerator::new(&settings, noise));

        let mut assembly = WorldAssembly::new(expected, settings.stitch_chunk_borders);
        {
            let mut task_manager = TaskManager::new(settings.worker_threads.min(expected.max(1)))?;
            for position in settings.extent.positions() {
                task_manager.publish_task(Box::new(ChunkGenerationTask::new(
                    generator.clone(),
                    position,
                )));
            }
            task_manager.run_to_completion(&mut assembly)?;
        }

        let world = WorldGrid {
            settings,
            chunks: assembly.chunks,
        };

        let stats = world.stats();
        info!(
            "Built world with seed {}: {} chunks, {} solid voxels, {} quads in {:?}",
            world.seed(),
            stats.chunks,
            stats.solid_voxels,
            stats.quads,
            start.elapsed()
        );
        debug!("World geometry bounds: {:?}", world.bounds());

        Ok(world)
    }

    /// All chunks, in no particular order.
    pub fn chunks(&self) -> impl Iterator<Item = &Arc<Chunk>> {
        self.chunks.values()
    }

    /// Retrieves the chunk at the specified chunk coordinates.
    ///
    /// # Returns
    /// A shared handle to the chunk, or `None` if the coordinate lies outside the
    /// world.
    pub fn get_chunk_at(&self, position: ChunkCoord) -> Option<Arc<Chunk>> {
        self.chunks.get(&position).cloned()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn seed(&self) -> i64 {
        self.settings.seed
    }

    pub fn settings(&self) -> &WorldSettings {
        &self.settings
    }

    /// World-space bounds of all drawn geometry, or `None` if no chunk has faces.
    pub fn bounds(&self) -> Option<Aabb> {
        self.chunks()
            .filter_map(|chunk| chunk.bounds())
            .reduce(Aabb::union)
    }

    pub fn stats(&self) -> WorldStats {
        self.chunks().fold(
            WorldStats {
                chunks: self.len(),
                ..WorldStats::default()
            },
            |stats, chunk| WorldStats {
                solid_voxels: stats.solid_voxels + chunk.grid().len(),
                quads: stats.quads + chunk.mesh().quad_count(),
                vertices: stats.vertices + chunk.mesh().vertex_count(),
                ..stats
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_positions_cover_the_extent() {
        let extent = ChunkExtent::new(3, 2, 1);
        let positions: Vec<_> = extent.positions().collect();
        assert_eq!(positions.len(), extent.len());
        assert_eq!(positions[0], Point3::new(0, 0, 0));
        assert_eq!(positions[1], Point3::new(1, 0, 0));
        assert!(positions.iter().all(|&p| extent.contains(p)));
        assert!(!extent.contains(Point3::new(3, 0, 0)));
        assert!(!extent.contains(Point3::new(0, -1, 0)));
    }

    #[test]
    fn empty_extent_has_no_positions() {
        let extent = ChunkExtent::new(4, 0, 4);
        assert!(extent.is_empty());
        assert_eq!(extent.positions().count(), 0);
    }

    #[test]
    fn oversized_extent_length_saturates() {
        let extent = ChunkExtent::new(u32::MAX, u32::MAX, u32::MAX);
        assert_eq!(extent.checked_len(), None);
        assert_eq!(extent.len(), usize::MAX);
        assert!(!extent.is_empty());
    }

    #[test]
    fn oversized_settings_fail_before_generation() {
        use crate::voxels::noise::ConstantNoise;

        let settings = WorldSettings {
            extent: ChunkExtent::new(1 << 30, 1 << 30, 1 << 30),
            ..WorldSettings::default()
        };
        let result = WorldGrid::with_noise(settings, Arc::new(ConstantNoise(0.0)));
        assert!(matches!(
            result,
            Err(WorldError::Config(ConfigError::WorldTooLarge { .. }))
        ));

        let settings = WorldSettings {
            chunk_size: 1 << 28,
            extent: ChunkExtent::new(16, 1, 1),
            ..WorldSettings::default()
        };
        let result = WorldGrid::with_noise(settings, Arc::new(ConstantNoise(0.0)));
        assert!(matches!(
            result,
            Err(WorldError::Config(ConfigError::WorldSpanTooLarge { .. }))
        ));
    }

    #[test]
    fn neighbor_border_resolves_across_chunks() {
        let mut below = VoxelGrid::new(4);
        below.set(Point3::new(1, 3, 2), true).unwrap();
        let grids = Arc::new(HashMap::from([
            (Point3::new(0, 0, 0), Arc::new(VoxelGrid::new(4))),
            (Point3::new(0, -1, 0), Arc::new(below)),
        ]));

        let border = NeighborBorder::new(Point3::new(0, 0, 0), 4, grids);
        assert!(border.is_solid(Point3::new(1, -1, 2)));
        assert!(!border.is_solid(Point3::new(2, -1, 2)));
        // No chunk exists above.
        assert!(!border.is_solid(Point3::new(1, 4, 2)));
    }

    #[test]
    fn isolated_assembly_schedules_one_mesh_per_grid() {
        let mut assembly = WorldAssembly::new(2, false);
        let tasks = assembly.accept_grid(Point3::new(0, 0, 0), Arc::new(VoxelGrid::new(2)));
        assert_eq!(tasks.len(), 1);
    }

    #[test]
    fn stitched_assembly_waits_for_every_grid() {
        let mut assembly = WorldAssembly::new(2, true);
        assert!(assembly
            .accept_grid(Point3::new(0, 0, 0), Arc::new(VoxelGrid::new(2)))
            .is_empty());
        let tasks = assembly.accept_grid(Point3::new(1, 0, 0), Arc::new(VoxelGrid::new(2)));
        assert_eq!(tasks.len(), 2);
    }
}
