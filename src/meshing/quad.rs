//! A single merged rectangle of voxel faces.

use cgmath::{Point3, Vector3};

use crate::voxels::block::block_side::BlockSide;

/// An axis-aligned rectangle covering `width × height` coplanar voxel faces.
///
/// Corners are chunk-local lattice points, ordered so that walking them in
/// sequence is counter-clockwise when viewed from the side the normal points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quad {
    /// Which way the quad faces
    pub side: BlockSide,
    /// The four corners in front-facing winding order
    pub corners: [Point3<i32>; 4],
    /// Extent along the first in-plane axis, `(axis + 1) % 3`
    pub width: u32,
    /// Extent along the second in-plane axis, `(axis + 2) % 3`
    pub height: u32,
}

impl Quad {
    /// Builds a quad from its minimum corner and its extent in the sweep plane.
    ///
    /// # Arguments
    /// * `side` - The face direction, which fixes the plane axis and the winding
    /// * `origin` - The corner with the smallest in-plane coordinates
    /// * `width` - Number of faces along `u = (axis + 1) % 3`
    /// * `height` - Number of faces along `v = (axis + 2) % 3`
    pub fn new(side: BlockSide, origin: Point3<i32>, width: u32, height: u32) -> Self {
        let axis = side.axis();
        let mut du = Vector3::new(0, 0, 0);
        let mut dv = Vector3::new(0, 0, 0);
        du[(axis + 1) % 3] = width as i32;
        dv[(axis + 2) % 3] = height as i32;

        // Negative faces swap the diagonal pair so the visible side flips.
        let corners = if side.is_negative() {
            [origin, origin + dv, origin + du + dv, origin + du]
        } else {
            [origin, origin + du, origin + du + dv, origin + dv]
        };

        Quad {
            side,
            corners,
            width,
            height,
        }
    }

    /// Outward unit normal shared by all four corners.
    pub fn normal(&self) -> Vector3<f32> {
        self.side.normal()
    }

    /// Number of unit voxel faces the quad covers.
    pub fn area(&self) -> u32 {
        self.width * self.height
    }

    /// Corner positions as floats, in winding order.
    pub fn positions(&self) -> [[f32; 3]; 4] {
        self.corners
            .map(|corner| [corner.x as f32, corner.y as f32, corner.z as f32])
    }

    /// Texture coordinate placeholders for each corner, in winding order.
    ///
    /// Coordinates span `(0, 0)` to `(width, height)`, so a repeating texture tiles
    /// once per voxel face.
    pub fn uvs(&self) -> [[f32; 2]; 4] {
        let axis = self.side.axis();
        let (u, v) = ((axis + 1) % 3, (axis + 2) % 3);
        let origin = self.corners[0];
        self.corners.map(|corner| {
            [
                (corner[u] - origin[u]) as f32,
                (corner[v] - origin[v]) as f32,
            ]
        })
    }
}
