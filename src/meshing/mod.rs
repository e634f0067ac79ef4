//! Mesh generation for voxel chunks.
//!
//! This module converts chunk occupancy into renderer-agnostic geometry. It knows
//! nothing about shaders, cameras or frame timing; the output is a list of quads per
//! face direction that flattens into plain vertex and index buffers.
//!
//! # Architecture
//! - [`GreedyMesher`]: sweeps a chunk plane by plane and merges coplanar faces
//! - [`Quad`]: one merged rectangle with its winding and normal
//! - [`ChunkMesh`]: the per-side quad lists of one chunk, plus buffer conversion
//! - [`Aabb`]: bounding boxes handed to the renderer for culling
//! - [`BorderQuery`]: optional lookup of voxels just outside a chunk
//!
//! # Usage
//! ```
//! use voxel_terrain::meshing::GreedyMesher;
//! use voxel_terrain::voxels::chunk::voxel_grid::VoxelGrid;
//!
//! let grid = VoxelGrid::filled(8);
//! let mesh = GreedyMesher::new(8).mesh(&grid);
//!
//! assert_eq!(mesh.quad_count(), 6);
//! assert_eq!(mesh.indices().len(), 6 * 6);
//! ```

mod border;
mod bounds;
mod greedy;
mod mesh;
mod quad;
pub mod tasks;

pub use border::BorderQuery;
pub use bounds::Aabb;
pub use greedy::{GreedyMesher, MaskRect};
pub use mesh::{ChunkMesh, MeshSide, Vertex};
pub use quad::Quad;
