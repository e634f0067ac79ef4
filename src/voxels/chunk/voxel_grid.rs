//! # Voxel Grid Module
//!
//! This module provides the `VoxelGrid`, the occupancy volume of a single chunk.
//!
//! ## Memory Layout
//!
//! The grid keeps two bit vectors of `N³` bits each:
//! - `present`: whether a voxel exists at a position
//! - `opaque`: whether that voxel hides its neighbors' faces
//!
//! Bits are stored x-fastest, then y, then z: the index of `(x, y, z)` is
//! `x + y * N + z * N * N`. Empty space costs one bit per flag, and a solidity check
//! is two bit reads.
//!
//! ## Lookup Contract
//!
//! Although storage is dense, the grid behaves like a sparse map from coordinate to
//! voxel: a position without a voxel reads as empty, and so does every coordinate
//! outside `[0, N)³`. Out-of-range reads never fail, which lets the mesher look one
//! voxel past each chunk boundary without branching.

use bitvec::prelude::BitVec;
use cgmath::Point3;
use thiserror::Error;

use crate::voxels::block::Voxel;

use super::chunk_iteration::VoxelIter;

/// Errors raised when writing to a [`VoxelGrid`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VoxelGridError {
    #[error("voxel ({x}, {y}, {z}) lies outside a chunk of size {size}")]
    OutOfBounds { x: i32, y: i32, z: i32, size: usize },
}

/// The occupancy volume of one chunk: an `N×N×N` cube of optional voxels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoxelGrid {
    /// Edge length `N` of the cube.
    size: usize,
    /// One bit per position, set when a voxel is present.
    present: BitVec,
    /// One bit per position, set when the voxel there is opaque.
    opaque: BitVec,
}

impl VoxelGrid {
    /// Creates a new, completely empty grid.
    ///
    /// # Arguments
    /// * `size` - Edge length of the cube in voxels
    pub fn new(size: usize) -> Self {
        let volume = size * size * size;
        VoxelGrid {
            size,
            present: BitVec::repeat(false, volume),
            opaque: BitVec::repeat(false, volume),
        }
    }

    /// Creates a grid with every position holding an opaque voxel.
    pub fn filled(size: usize) -> Self {
        let volume = size * size * size;
        VoxelGrid {
            size,
            present: BitVec::repeat(true, volume),
            opaque: BitVec::repeat(true, volume),
        }
    }

    /// Edge length `N` of the grid.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of present voxels.
    pub fn len(&self) -> usize {
        self.present.count_ones()
    }

    /// Returns `true` if no voxel is present.
    pub fn is_empty(&self) -> bool {
        self.present.not_any()
    }

    /// Returns `true` if `coord` lies within `[0, N)³`.
    pub fn contains(&self, coord: Point3<i32>) -> bool {
        self.index(coord).is_some()
    }

    /// Maps a coordinate to its bit index, or `None` when it is out of range.
    fn index(&self, coord: Point3<i32>) -> Option<usize> {
        let size = self.size as i64;
        let (x, y, z) = (coord.x as i64, coord.y as i64, coord.z as i64);
        if !(0..size).contains(&x) || !(0..size).contains(&y) || !(0..size).contains(&z) {
            return None;
        }
        Some((x + y * size + z * size * size) as usize)
    }

    /// Converts a bit index back into its coordinate.
    pub(crate) fn coord_of(&self, index: usize) -> Point3<i32> {
        let x = index % self.size;
        let y = (index / self.size) % self.size;
        let z = index / (self.size * self.size);
        Point3::new(x as i32, y as i32, z as i32)
    }

    /// Marks a position as holding an opaque voxel, or clears it.
    ///
    /// # Errors
    /// Returns [`VoxelGridError::OutOfBounds`] if `coord` is outside the grid.
    pub fn set(&mut self, coord: Point3<i32>, present: bool) -> Result<(), VoxelGridError> {
        self.set_voxel(coord, present.then_some(Voxel::OPAQUE))
    }

    /// Writes a full voxel record, or clears the position with `None`.
    ///
    /// # Errors
    /// Returns [`VoxelGridError::OutOfBounds`] if `coord` is outside the grid.
    pub fn set_voxel(&mut self, coord: Point3<i32>, voxel: Option<Voxel>) -> Result<(), VoxelGridError> {
        let index = self.index(coord).ok_or(VoxelGridError::OutOfBounds {
            x: coord.x,
            y: coord.y,
            z: coord.z,
            size: self.size,
        })?;
        self.present.set(index, voxel.is_some());
        self.opaque.set(index, voxel.is_some_and(Voxel::is_solid));
        Ok(())
    }

    /// Returns the voxel at `coord`, or `None` for empty and out-of-range positions.
    pub fn voxel(&self, coord: Point3<i32>) -> Option<Voxel> {
        let index = self.index(coord)?;
        self.voxel_at_index(index)
    }

    pub(crate) fn voxel_at_index(&self, index: usize) -> Option<Voxel> {
        self.present[index].then(|| Voxel {
            opaque: self.opaque[index],
        })
    }

    /// Checks whether the position holds a present, opaque voxel.
    ///
    /// # Returns
    /// `false` if the position is empty, holds a transparent voxel, or lies outside
    /// the grid.
    #[inline]
    pub fn is_solid(&self, coord: Point3<i32>) -> bool {
        match self.index(coord) {
            Some(index) => self.present[index] && self.opaque[index],
            None => false,
        }
    }

    /// Fills the bottom `height` voxels of the column at `(x, z)` with opaque voxels.
    ///
    /// Heights beyond the grid are clamped. Used by terrain generation, whose
    /// columns are in range by construction.
    pub(crate) fn fill_column(&mut self, x: usize, z: usize, height: usize) {
        let plane = self.size * self.size;
        for y in 0..height.min(self.size) {
            let index = x + y * self.size + z * plane;
            self.present.set(index, true);
            self.opaque.set(index, true);
        }
    }

    /// Iterates over every present voxel in storage order (x fastest, then y, then z).
    pub fn iter(&self) -> VoxelIter<'_> {
        VoxelIter::new(self, self.present.iter_ones())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_empty() {
        let grid = VoxelGrid::new(4);
        assert!(grid.is_empty());
        assert_eq!(grid.len(), 0);
        assert!(!grid.is_solid(Point3::new(0, 0, 0)));
    }

    #[test]
    fn set_and_read_back() {
        let mut grid = VoxelGrid::new(4);
        grid.set(Point3::new(1, 2, 3), true).unwrap();

        assert!(grid.is_solid(Point3::new(1, 2, 3)));
        assert_eq!(grid.voxel(Point3::new(1, 2, 3)), Some(Voxel::OPAQUE));
        assert_eq!(grid.voxel(Point3::new(3, 2, 1)), None);
        assert_eq!(grid.len(), 1);

        grid.set(Point3::new(1, 2, 3), false).unwrap();
        assert!(grid.is_empty());
    }

    #[test]
    fn out_of_range_reads_are_empty() {
        let grid = VoxelGrid::filled(4);
        for coord in [
            Point3::new(-1, 0, 0),
            Point3::new(0, -1, 0),
            Point3::new(0, 0, -1),
            Point3::new(4, 0, 0),
            Point3::new(0, 4, 0),
            Point3::new(0, 0, 4),
            Point3::new(i32::MIN, i32::MAX, 0),
        ] {
            assert!(!grid.is_solid(coord), "{coord:?} should not be solid");
            assert_eq!(grid.voxel(coord), None);
        }
    }

    #[test]
    fn out_of_range_writes_are_rejected() {
        let mut grid = VoxelGrid::new(2);
        assert_eq!(
            grid.set(Point3::new(2, 0, 0), true),
            Err(VoxelGridError::OutOfBounds { x: 2, y: 0, z: 0, size: 2 })
        );
        assert!(grid.is_empty());
    }

    #[test]
    fn transparent_voxels_are_present_but_not_solid() {
        let mut grid = VoxelGrid::new(2);
        grid.set_voxel(Point3::new(0, 1, 0), Some(Voxel::TRANSPARENT)).unwrap();

        assert_eq!(grid.len(), 1);
        assert_eq!(grid.voxel(Point3::new(0, 1, 0)), Some(Voxel::TRANSPARENT));
        assert!(!grid.is_solid(Point3::new(0, 1, 0)));
    }

    #[test]
    fn fill_column_clamps_to_grid() {
        let mut grid = VoxelGrid::new(3);
        grid.fill_column(1, 2, 10);
        assert_eq!(grid.len(), 3);
        for y in 0..3 {
            assert!(grid.is_solid(Point3::new(1, y, 2)));
        }
    }

    #[test]
    fn coord_of_inverts_index() {
        let grid = VoxelGrid::new(5);
        let coord = Point3::new(4, 1, 3);
        let index = grid.index(coord).unwrap();
        assert_eq!(index, 4 + 5 + 3 * 25);
        assert_eq!(grid.coord_of(index), coord);
    }
}
