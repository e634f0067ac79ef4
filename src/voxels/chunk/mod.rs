//! # Chunk Module
//!
//! This module provides the `Chunk` struct: one cubic region of the world together
//! with everything derived from its voxels.
//!
//! A chunk bundles its coordinate, its occupancy grid, the mesh built from that grid
//! and the world-space bounding box of the mesh. The mesh and the box are computed
//! once in [`Chunk::build`] and never updated on their own; new occupancy means a new
//! chunk.
//!
//! ## Coordinates
//!
//! Chunk coordinates count chunks, not voxels. The world-space origin of a chunk is
//! its coordinate times the chunk edge length `N`, and its voxels cover
//! `[origin, origin + N)` on every axis.

use std::sync::Arc;

use cgmath::{Point3, Vector3};

use crate::meshing::{Aabb, BorderQuery, ChunkMesh, GreedyMesher};

use voxel_grid::VoxelGrid;

pub mod chunk_iteration;
pub mod voxel_grid;

/// Position of a chunk in chunk coordinates.
pub type ChunkCoord = Point3<i32>;

/// A meshed chunk. Immutable once built.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// The position of this chunk in chunk coordinates (not voxel coordinates).
    position: ChunkCoord,
    /// The occupancy the mesh was built from.
    grid: Arc<VoxelGrid>,
    /// Chunk-local geometry.
    mesh: ChunkMesh,
    /// World-space bounds of the mesh, `None` when there is nothing to draw.
    bounds: Option<Aabb>,
}

impl Chunk {
    /// Meshes a grid and assembles the chunk around it.
    ///
    /// # Arguments
    /// * `position` - The chunk coordinates of the new chunk
    /// * `grid` - Its occupancy
    /// * `mesher` - A mesher to reuse; its mask adapts to the grid size
    /// * `border` - Lookup of neighboring voxels, or `None` to mesh in isolation
    pub fn build(
        position: ChunkCoord,
        grid: Arc<VoxelGrid>,
        mesher: &mut GreedyMesher,
        border: Option<&dyn BorderQuery>,
    ) -> Self {
        let mesh = match border {
            Some(border) => mesher.mesh_with_border(&grid, border),
            None => mesher.mesh(&grid),
        };
        let origin = Self::origin_of(position, grid.size());
        let bounds = mesh.bounds().map(|bounds| bounds.translate(origin));

        let chunk = Chunk {
            position,
            grid,
            mesh,
            bounds,
        };
        debug_assert!(chunk
            .bounds
            .map_or(true, |bounds| chunk.extent_bounds().encloses(&bounds)));
        chunk
    }

    fn origin_of(position: ChunkCoord, size: usize) -> Vector3<f32> {
        let size = size as f32;
        Vector3::new(
            position.x as f32 * size,
            position.y as f32 * size,
            position.z as f32 * size,
        )
    }

    pub fn position(&self) -> ChunkCoord {
        self.position
    }

    /// Edge length `N` of the chunk in voxels.
    pub fn size(&self) -> usize {
        self.grid.size()
    }

    pub fn grid(&self) -> &Arc<VoxelGrid> {
        &self.grid
    }

    /// Chunk-local geometry. Add [`Chunk::origin`] to place it in the world.
    pub fn mesh(&self) -> &ChunkMesh {
        &self.mesh
    }

    /// World-space bounds of the geometry, or `None` for a chunk with no faces.
    pub fn bounds(&self) -> Option<Aabb> {
        self.bounds
    }

    /// World-space position of the chunk's voxel `(0, 0, 0)` corner.
    pub fn origin(&self) -> Point3<i32> {
        self.position * self.size() as i32
    }

    /// World-space box of the whole chunk volume, drawn or not.
    pub fn extent_bounds(&self) -> Aabb {
        let min = Point3::new(0.0, 0.0, 0.0) + Self::origin_of(self.position, self.size());
        let size = self.size() as f32;
        Aabb::new(min, min + Vector3::new(size, size, size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_scales_by_size() {
        let chunk = Chunk::build(
            Point3::new(2, -1, 3),
            Arc::new(VoxelGrid::new(8)),
            &mut GreedyMesher::new(8),
            None,
        );
        assert_eq!(chunk.origin(), Point3::new(16, -8, 24));
        assert_eq!(chunk.size(), 8);
        assert!(chunk.mesh().is_empty());
        assert_eq!(chunk.bounds(), None);
    }

    #[test]
    fn bounds_are_in_world_space() {
        let mut grid = VoxelGrid::new(4);
        grid.set(Point3::new(1, 2, 3), true).unwrap();
        let chunk = Chunk::build(Point3::new(1, 0, -1), Arc::new(grid), &mut GreedyMesher::new(4), None);

        let bounds = chunk.bounds().unwrap();
        assert_eq!(bounds.min, Point3::new(5.0, 2.0, -1.0));
        assert_eq!(bounds.max, Point3::new(6.0, 3.0, 0.0));
        assert!(chunk.extent_bounds().encloses(&bounds));
    }
}
