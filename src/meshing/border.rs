//! Read-only access to the voxels just across a chunk's boundary.
//!
//! Meshing a chunk in isolation treats everything outside it as empty, so two
//! touching solid chunks both emit a face on their shared boundary. A
//! [`BorderQuery`] lets the mesher look one voxel past the boundary instead. The
//! query is borrowed for a single meshing call; chunks never hold references to
//! their neighbors.

use cgmath::Point3;

/// Answers whether an out-of-range, chunk-local coordinate holds a solid voxel.
///
/// Coordinates passed in lie outside `[0, N)³` of the chunk being meshed, at most
/// one voxel beyond any face. Positions nobody knows about must read as empty.
pub trait BorderQuery {
    fn is_solid(&self, coord: Point3<i32>) -> bool;
}

impl<F> BorderQuery for F
where
    F: Fn(Point3<i32>) -> bool,
{
    fn is_solid(&self, coord: Point3<i32>) -> bool {
        self(coord)
    }
}
