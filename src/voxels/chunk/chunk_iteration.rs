//! # Chunk Iteration Module
//!
//! This module provides an iterator over the present voxels of a [`VoxelGrid`].
//!
//! The iterator walks the set bits of the grid's presence vector, so empty space is
//! skipped a machine word at a time rather than one position at a time. Voxels are
//! yielded in storage order: x fastest, then y, then z.

use bitvec::order::Lsb0;
use bitvec::slice::IterOnes;
use cgmath::Point3;

use crate::voxels::block::Voxel;

use super::voxel_grid::VoxelGrid;

/// An iterator over all present voxels in a grid, with their chunk-local positions.
pub struct VoxelIter<'a> {
    /// The grid being iterated over
    grid: &'a VoxelGrid,
    /// Indices of the set bits in the grid's presence vector
    ones: IterOnes<'a, usize, Lsb0>,
}

impl<'a> VoxelIter<'a> {
    /// Creates a new `VoxelIter` over the given set-bit iterator.
    ///
    /// # Arguments
    /// * `grid` - The grid the bit indices belong to
    /// * `ones` - Iterator over the grid's present-voxel bit indices
    pub(crate) fn new(grid: &'a VoxelGrid, ones: IterOnes<'a, usize, Lsb0>) -> Self {
        VoxelIter { grid, ones }
    }
}

impl Iterator for VoxelIter<'_> {
    type Item = (Point3<i32>, Voxel);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.ones.next()?;
        let voxel = self.grid.voxel_at_index(index)?;
        Some((self.grid.coord_of(index), voxel))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ones.size_hint()
    }
}
