//! # Block Module
//!
//! This module provides the per-voxel record stored in a chunk and the six face
//! directions a voxel surface can point in.

pub mod block_side;

/// Represents a single present voxel.
///
/// Absence of a voxel means empty space, so the record only carries what a present
/// voxel needs beyond its existence. Opacity is the extension point for materials:
/// a present but non-opaque voxel does not hide the faces of its neighbors and is
/// not meshed as solid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Voxel {
    /// Whether the voxel blocks sight through it.
    pub opaque: bool,
}

impl Voxel {
    /// A regular, solid voxel.
    pub const OPAQUE: Voxel = Voxel { opaque: true };
    /// A present voxel that does not occlude its neighbors.
    pub const TRANSPARENT: Voxel = Voxel { opaque: false };

    /// Returns `true` if the voxel takes part in meshing as solid.
    pub fn is_solid(self) -> bool {
        self.opaque
    }
}

impl Default for Voxel {
    fn default() -> Self {
        Voxel::OPAQUE
    }
}
