//! # Chunk Generation Task
//!
//! This module defines the `ChunkGenerationTask`, which fills the occupancy grid of
//! one chunk from the terrain generator on a worker thread.

use std::sync::Arc;

use log::trace;

use crate::task_management::task::{Task, TaskResult};
use crate::voxels::{
    chunk::{voxel_grid::VoxelGrid, ChunkCoord},
    terrain::TerrainGenerator,
    world::WorldAssembly,
};

/// A task that generates chunk occupancy.
///
/// This task is responsible for:
/// 1. Generating the grid at the specified position
/// 2. Handing the grid to the world under construction, which schedules meshing
pub struct ChunkGenerationTask {
    /// The shared, immutable terrain generator
    generator: Arc<TerrainGenerator>,
    /// The position of the chunk to generate (in chunk coordinates)
    position: ChunkCoord,
}

impl ChunkGenerationTask {
    /// Creates a new chunk generation task.
    ///
    /// # Arguments
    /// * `generator` - The terrain generator of the world
    /// * `position` - The chunk coordinates where the chunk should be generated
    pub fn new(generator: Arc<TerrainGenerator>, position: ChunkCoord) -> Self {
        ChunkGenerationTask {
            generator,
            position,
        }
    }
}

impl Task for ChunkGenerationTask {
    fn process(&self) -> Box<dyn TaskResult + Send> {
        let grid = self.generator.generate(self.position);
        trace!("Generated chunk {:?}: {} solid voxels", self.position, grid.len());

        Box::new(ChunkGenerationTaskResult {
            position: self.position,
            grid: Arc::new(grid),
        })
    }
}

/// The result of a chunk generation task.
///
/// This contains the generated grid and is responsible for scheduling the meshing
/// that depends on it.
pub struct ChunkGenerationTaskResult {
    position: ChunkCoord,
    grid: Arc<VoxelGrid>,
}

impl TaskResult for ChunkGenerationTaskResult {
    fn handle_result(self: Box<Self>, assembly: &mut WorldAssembly) -> Vec<Box<dyn Task + Send>> {
        assembly.accept_grid(self.position, self.grid)
    }
}
