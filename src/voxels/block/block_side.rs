//! # Block Side Module
//!
//! This module defines the six axis-aligned faces of a voxel and the geometry each
//! one carries: the axis it is perpendicular to, whether it points toward the
//! negative end of that axis, and its outward unit normal.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel block.
///
/// Each variant is assigned a unique integer value so it can index per-side
/// storage directly.
///
/// The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The front face (facing positive Z)
    FRONT = 0,

    /// The back face (facing negative Z)
    BACK = 1,

    /// The bottom face (facing negative Y)
    BOTTOM = 2,

    /// The top face (facing positive Y)
    TOP = 3,

    /// The left face (facing negative X)
    LEFT = 4,

    /// The right face (facing positive X)
    RIGHT = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in a consistent order.
    ///
    /// The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::BOTTOM,
            BlockSide::TOP,
            BlockSide::LEFT,
            BlockSide::RIGHT,
        ]
    }

    /// Looks up the side perpendicular to `axis` (0 = x, 1 = y, 2 = z).
    ///
    /// # Returns
    /// `None` if `axis` is not 0, 1 or 2.
    pub fn from_axis(axis: usize, negative: bool) -> Option<BlockSide> {
        match (axis, negative) {
            (0, true) => Some(BlockSide::LEFT),
            (0, false) => Some(BlockSide::RIGHT),
            (1, true) => Some(BlockSide::BOTTOM),
            (1, false) => Some(BlockSide::TOP),
            (2, true) => Some(BlockSide::BACK),
            (2, false) => Some(BlockSide::FRONT),
            _ => None,
        }
    }

    /// The axis this face is perpendicular to: 0 = x, 1 = y, 2 = z.
    pub fn axis(self) -> usize {
        match self {
            BlockSide::LEFT | BlockSide::RIGHT => 0,
            BlockSide::BOTTOM | BlockSide::TOP => 1,
            BlockSide::FRONT | BlockSide::BACK => 2,
        }
    }

    /// Whether the face points toward the negative end of its axis.
    pub fn is_negative(self) -> bool {
        matches!(self, BlockSide::BACK | BlockSide::BOTTOM | BlockSide::LEFT)
    }

    /// Integer step from a voxel to the neighbor this face looks at.
    pub fn offset(self) -> Vector3<i32> {
        let mut offset = Vector3::new(0, 0, 0);
        offset[self.axis()] = if self.is_negative() { -1 } else { 1 };
        offset
    }

    /// Outward unit normal of the face.
    pub fn normal(self) -> Vector3<f32> {
        self.offset().cast::<f32>().unwrap_or(Vector3::new(0.0, 0.0, 0.0))
    }
}
