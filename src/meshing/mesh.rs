//! Mesh data structures for meshed chunks.
//!
//! This module holds the geometry buffer produced by the greedy mesher and the
//! conversions from that quad list into flat vertex and index buffers that a
//! renderer can upload as-is.

use cgmath::Point3;

use crate::voxels::block::block_side::BlockSide;

use super::{bounds::Aabb, quad::Quad};

/// A vertex of a meshed chunk, laid out for direct upload to a GPU buffer.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes), chunk-local
/// - Normal: 3x f32 (12 bytes)
/// - Texture Coordinates: 2x f32 (8 bytes), placeholders spanning the quad in voxels
///
/// Total size: 32 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// The quads of one face direction of a chunk.
///
/// Keeping sides apart lets a renderer skip whole directions that face away from
/// the camera.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshSide {
    /// Which block side every quad in this list faces
    pub side: BlockSide,
    /// Quads in emission order
    pub quads: Vec<Quad>,
}

impl MeshSide {
    /// Creates a new, empty `MeshSide` for the specified block side.
    pub fn new(side: BlockSide) -> Self {
        MeshSide {
            side,
            quads: Vec::new(),
        }
    }

    /// Four vertices per quad, in winding order.
    pub fn vertices(&self) -> Vec<Vertex> {
        let normal: [f32; 3] = self.side.normal().into();
        self.quads
            .iter()
            .flat_map(|quad| {
                quad.positions()
                    .into_iter()
                    .zip(quad.uvs())
                    .map(move |(position, uv)| Vertex {
                        position,
                        normal,
                        uv,
                    })
            })
            .collect()
    }

    /// Two triangles per quad, indexing into [`MeshSide::vertices`].
    pub fn indices(&self) -> Vec<u32> {
        (0..self.quads.len() as u32)
            .flat_map(ChunkMesh::generate_face_indices)
            .collect()
    }
}

/// The geometry buffer of one chunk, grouped by face direction.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkMesh {
    /// Array of mesh sides, indexed by `BlockSide` discriminant.
    pub sides: [MeshSide; 6],
}

impl Default for ChunkMesh {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkMesh {
    /// Creates a new mesh with no quads on any side.
    pub fn new() -> Self {
        ChunkMesh {
            sides: BlockSide::all().map(MeshSide::new),
        }
    }

    pub fn side(&self, side: BlockSide) -> &MeshSide {
        &self.sides[side as usize]
    }

    pub(crate) fn side_mut(&mut self, side: BlockSide) -> &mut MeshSide {
        &mut self.sides[side as usize]
    }

    /// Every quad of the mesh, side by side in `BlockSide` order.
    pub fn quads(&self) -> impl Iterator<Item = &Quad> {
        self.sides.iter().flat_map(|side| side.quads.iter())
    }

    pub fn quad_count(&self) -> usize {
        self.sides.iter().map(|side| side.quads.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.quad_count() == 0
    }

    pub fn vertex_count(&self) -> usize {
        self.quad_count() * 4
    }

    /// Total number of unit voxel faces covered by the mesh.
    pub fn face_area(&self) -> u64 {
        self.quads().map(|quad| quad.area() as u64).sum()
    }

    /// Flattens all sides into a single vertex buffer.
    pub fn vertices(&self) -> Vec<Vertex> {
        self.sides.iter().flat_map(MeshSide::vertices).collect()
    }

    /// Index buffer matching [`ChunkMesh::vertices`].
    pub fn indices(&self) -> Vec<u32> {
        (0..self.quad_count() as u32)
            .flat_map(Self::generate_face_indices)
            .collect()
    }

    /// Generates index data for a quad, offset by the number of quads before it.
    ///
    /// # Returns
    /// Six indices forming two triangles that keep the quad's winding.
    pub fn generate_face_indices(num_faces_generated: u32) -> [u32; 6] {
        let base = num_faces_generated * 4;
        [base, base + 1, base + 2, base, base + 2, base + 3]
    }

    /// Chunk-local bounding box of the geometry, or `None` if there is none.
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(
            self.quads()
                .flat_map(|quad| quad.corners)
                .map(|corner| Point3::new(corner.x as f32, corner.y as f32, corner.z as f32)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_top_quad() -> ChunkMesh {
        let mut mesh = ChunkMesh::new();
        mesh.side_mut(BlockSide::TOP)
            .quads
            .push(Quad::new(BlockSide::TOP, Point3::new(0, 1, 0), 2, 1));
        mesh
    }

    #[test]
    fn new_mesh_is_empty() {
        let mesh = ChunkMesh::new();
        assert!(mesh.is_empty());
        assert!(mesh.vertices().is_empty());
        assert_eq!(mesh.bounds(), None);
        for side in BlockSide::all() {
            assert_eq!(mesh.side(side).side, side);
        }
    }

    #[test]
    fn vertices_carry_normal_and_uv() {
        let mesh = single_top_quad();
        let vertices = mesh.vertices();
        assert_eq!(vertices.len(), 4);
        assert!(vertices.iter().all(|v| v.normal == [0.0, 1.0, 0.0]));
        assert_eq!(vertices[2].uv, [2.0, 1.0]);
        assert_eq!(vertices[2].position, [1.0, 1.0, 2.0]);
    }

    #[test]
    fn indices_reference_four_vertices_per_quad() {
        let mut mesh = single_top_quad();
        mesh.side_mut(BlockSide::FRONT)
            .quads
            .push(Quad::new(BlockSide::FRONT, Point3::new(0, 0, 1), 1, 1));

        let indices = mesh.indices();
        assert_eq!(indices, vec![0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7]);
        assert!(indices.iter().all(|&i| (i as usize) < mesh.vertices().len()));
    }

    #[test]
    fn vertex_bytes_are_tightly_packed() {
        let mesh = single_top_quad();
        let vertices = mesh.vertices();
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len(), 4 * 32);
    }

    #[test]
    fn bounds_cover_every_corner() {
        let bounds = single_top_quad().bounds().unwrap();
        assert_eq!(bounds.min, Point3::new(0.0, 1.0, 0.0));
        assert_eq!(bounds.max, Point3::new(1.0, 1.0, 2.0));
    }
}
