//! Background tasks for the meshing system.
//!
//! # Available Tasks
//! - `ChunkMeshGenerationTask`: Meshes a generated grid and assembles the finished chunk

pub mod chunk_mesh_generation_task;
