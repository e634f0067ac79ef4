//! Greedy meshing implementation for voxel chunks.
//!
//! This module turns the occupancy of a [`VoxelGrid`] into the smallest set of
//! rectangles this greedy heuristic finds that exactly covers the boundary between
//! solid and empty space.
//!
//! ## Algorithm
//!
//! Each of the six face directions is handled on its own. For a direction
//! perpendicular to `axis`, a plane index `p` sweeps from `-1` to `N - 1`. At every
//! plane an `N × N` mask over the two in-plane axes `u = (axis + 1) % 3` and
//! `v = (axis + 2) % 3` marks where solid meets non-solid between plane `p` and plane
//! `p + 1`. Each boundary belongs to the direction facing away from its solid voxel:
//! positive directions keep the cells whose voxel at `p` is solid, negative
//! directions keep the cells whose voxel at `p + 1` is solid. Together the two
//! directions of an axis cover every `current XOR neighbor` cell exactly once.
//!
//! The mask is then merged in row-major `(v, u)` order: the first unconsumed cell
//! grows a run along `u`, then whole rows along `v` are accepted while every cell
//! under the run is set. Accepted cells are cleared so nothing is emitted twice.
//! Width always grows before height; the result is deterministic but not the
//! globally largest set of rectangles.
//!
//! ## Performance
//!
//! Building the masks is O(N³) per chunk regardless of how many voxels are solid;
//! merging is O(N²) per plane. The mask is a flat byte array owned by the mesher and
//! reused across planes, directions and chunks.

use cgmath::Point3;
use log::trace;
use web_time::Instant;

use crate::voxels::{block::block_side::BlockSide, chunk::voxel_grid::VoxelGrid};

use super::{border::BorderQuery, mesh::ChunkMesh, quad::Quad};

/// A run of set mask cells accepted by the merge step, in mask coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskRect {
    pub u: usize,
    pub v: usize,
    pub width: usize,
    pub height: usize,
}

/// Reusable greedy mesher for chunks of one edge length.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_terrain::meshing::GreedyMesher;
/// use voxel_terrain::voxels::chunk::voxel_grid::VoxelGrid;
///
/// let mut grid = VoxelGrid::new(4);
/// grid.set(Point3::new(0, 0, 0), true).unwrap();
///
/// let mesh = GreedyMesher::new(4).mesh(&grid);
/// assert_eq!(mesh.quad_count(), 6);
/// ```
#[derive(Debug, Clone)]
pub struct GreedyMesher {
    size: usize,
    mask: Vec<bool>,
}

impl GreedyMesher {
    /// Creates a mesher with its mask allocated for chunks of edge length `size`.
    pub fn new(size: usize) -> Self {
        GreedyMesher {
            size,
            mask: vec![false; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Meshes a grid in isolation: everything outside it counts as empty.
    pub fn mesh(&mut self, grid: &VoxelGrid) -> ChunkMesh {
        self.mesh_sides(grid, None, &BlockSide::all())
    }

    /// Meshes a grid, asking `border` about voxels just outside it.
    pub fn mesh_with_border(&mut self, grid: &VoxelGrid, border: &dyn BorderQuery) -> ChunkMesh {
        self.mesh_sides(grid, Some(border), &BlockSide::all())
    }

    /// Meshes only the requested sides of a grid. The other sides stay empty.
    ///
    /// # Arguments
    /// * `grid` - The occupancy to mesh
    /// * `border` - Optional lookup for voxels one step outside the grid
    /// * `sides` - Face directions to generate
    pub fn mesh_sides(
        &mut self,
        grid: &VoxelGrid,
        border: Option<&dyn BorderQuery>,
        sides: &[BlockSide],
    ) -> ChunkMesh {
        let start = Instant::now();
        self.resize(grid.size());

        let mut mesh = ChunkMesh::new();
        for &side in sides {
            let quads = &mut mesh.side_mut(side).quads;
            quads.clear();
            for plane in -1..self.size as i32 {
                if self.build_mask(grid, border, side, plane) == 0 {
                    continue;
                }
                for rect in self.merge_mask() {
                    quads.push(Self::rect_to_quad(side, plane, rect));
                }
            }
        }

        trace!(
            "Meshed {} voxels into {} quads in {:?}",
            grid.len(),
            mesh.quad_count(),
            start.elapsed()
        );
        mesh
    }

    fn resize(&mut self, size: usize) {
        if size != self.size {
            self.size = size;
            self.mask = vec![false; size * size];
        }
    }

    /// Chunk-local coordinate of mask cell `(iu, iv)` in plane `plane`.
    fn coord(axis: usize, plane: i32, iu: usize, iv: usize) -> Point3<i32> {
        let mut coord = [0; 3];
        coord[axis] = plane;
        coord[(axis + 1) % 3] = iu as i32;
        coord[(axis + 2) % 3] = iv as i32;
        Point3::from(coord)
    }

    /// Fills the mask for one direction and plane.
    ///
    /// Voxels owning a face are always read from the grid itself, so a chunk never
    /// emits a face belonging to a neighbor. The occluding side may be looked up
    /// through `border` when it lies outside the grid.
    ///
    /// # Returns
    /// The number of set cells.
    pub(crate) fn build_mask(
        &mut self,
        grid: &VoxelGrid,
        border: Option<&dyn BorderQuery>,
        side: BlockSide,
        plane: i32,
    ) -> usize {
        let axis = side.axis();
        let n = self.size;
        let mut count = 0;

        for iv in 0..n {
            for iu in 0..n {
                let current = Self::coord(axis, plane, iu, iv);
                let neighbor = Self::coord(axis, plane + 1, iu, iv);
                let (owner, occluder) = if side.is_negative() {
                    (neighbor, current)
                } else {
                    (current, neighbor)
                };

                let visible = grid.is_solid(owner) && !Self::sample(grid, border, occluder);
                self.mask[iu + iv * n] = visible;
                count += visible as usize;
            }
        }

        count
    }

    fn sample(grid: &VoxelGrid, border: Option<&dyn BorderQuery>, coord: Point3<i32>) -> bool {
        if grid.contains(coord) {
            grid.is_solid(coord)
        } else {
            border.is_some_and(|border| border.is_solid(coord))
        }
    }

    /// Greedily merges the current mask into rectangles and clears it.
    pub(crate) fn merge_mask(&mut self) -> Vec<MaskRect> {
        let n = self.size;
        let mut rects = Vec::new();

        for iv in 0..n {
            let mut iu = 0;
            while iu < n {
                if !self.mask[iu + iv * n] {
                    iu += 1;
                    continue;
                }

                let mut width = 1;
                while iu + width < n && self.mask[iu + width + iv * n] {
                    width += 1;
                }

                let mut height = 1;
                while iv + height < n {
                    let row = (iv + height) * n;
                    if !self.mask[row + iu..row + iu + width].iter().all(|&cell| cell) {
                        break;
                    }
                    height += 1;
                }

                for dv in 0..height {
                    let row = (iv + dv) * n;
                    self.mask[row + iu..row + iu + width].fill(false);
                }

                rects.push(MaskRect {
                    u: iu,
                    v: iv,
                    width,
                    height,
                });
                iu += width;
            }
        }

        rects
    }

    fn rect_to_quad(side: BlockSide, plane: i32, rect: MaskRect) -> Quad {
        let origin = Self::coord(side.axis(), plane + 1, rect.u, rect.v);
        Quad::new(side, origin, rect.width as u32, rect.height as u32)
    }
}
