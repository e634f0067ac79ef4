//! Task for meshing a generated chunk grid on a worker thread.
//!
//! This module contains the `ChunkMeshGenerationTask`, which runs the greedy mesher
//! over one grid and hands the finished, immutable chunk back to the world.

use std::sync::Arc;

use log::trace;

use crate::{
    meshing::{BorderQuery, GreedyMesher},
    task_management::task::{Task, TaskResult},
    voxels::{
        chunk::{voxel_grid::VoxelGrid, Chunk, ChunkCoord},
        world::{NeighborBorder, WorldAssembly},
    },
};

/// A task that meshes one chunk.
///
/// This task is responsible for:
/// 1. Running the greedy mesher over the chunk's grid
/// 2. Computing the chunk's bounding box
/// 3. Returning the finished chunk for publication
pub struct ChunkMeshGenerationTask {
    /// The chunk coordinates of the grid
    position: ChunkCoord,
    /// The generated occupancy
    grid: Arc<VoxelGrid>,
    /// Neighbor lookup when borders are stitched
    border: Option<NeighborBorder>,
}

impl ChunkMeshGenerationTask {
    /// Creates a new chunk mesh generation task.
    ///
    /// # Arguments
    /// * `position` - The chunk coordinates of the grid
    /// * `grid` - The occupancy to mesh
    /// * `border` - Neighbor lookup, or `None` to mesh the chunk in isolation
    pub fn new(position: ChunkCoord, grid: Arc<VoxelGrid>, border: Option<NeighborBorder>) -> Self {
        ChunkMeshGenerationTask {
            position,
            grid,
            border,
        }
    }
}

impl Task for ChunkMeshGenerationTask {
    fn process(&self) -> Box<dyn TaskResult + Send> {
        let mut mesher = GreedyMesher::new(self.grid.size());
        let border = self.border.as_ref().map(|border| border as &dyn BorderQuery);
        let chunk = Chunk::build(self.position, self.grid.clone(), &mut mesher, border);

        trace!(
            "Meshed chunk {:?}: {} quads",
            self.position,
            chunk.mesh().quad_count()
        );

        Box::new(ChunkMeshGenerationTaskResult { chunk })
    }
}

/// The result of a chunk mesh generation task: a chunk ready for readers.
pub struct ChunkMeshGenerationTaskResult {
    chunk: Chunk,
}

impl TaskResult for ChunkMeshGenerationTaskResult {
    /// Publishes the chunk into the world. Nothing follows.
    fn handle_result(self: Box<Self>, assembly: &mut WorldAssembly) -> Vec<Box<dyn Task + Send>> {
        assembly.insert_chunk(self.chunk);
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point3;

    use super::*;

    #[test]
    fn meshing_result_publishes_the_chunk() {
        let task = ChunkMeshGenerationTask::new(
            Point3::new(0, 0, 0),
            Arc::new(VoxelGrid::filled(3)),
            None,
        );
        let mut assembly = WorldAssembly::new(1, false);

        let follow_ups = task.process().handle_result(&mut assembly);
        assert!(follow_ups.is_empty());
        assert_eq!(assembly.chunk_count(), 1);
    }
}
