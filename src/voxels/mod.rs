//! # Voxel Terrain Core
//!
//! This module contains the voxel data model and the procedural process that fills
//! it.
//!
//! ## Architecture
//!
//! * **Block**: the per-voxel record and the six face directions
//! * **Chunk**: fixed-size cubic occupancy grids and the meshed chunks built on them
//! * **Noise**: deterministic 2D coherent noise sources
//! * **Terrain**: the heightmap generator turning noise into chunk occupancy
//! * **World**: the eagerly built, immutable map from chunk coordinates to chunks
//! * **Tasks**: background work for chunk generation
//!
//! ## Data Flow
//!
//! 1. The world enumerates the chunk coordinates of its extent
//! 2. The terrain generator fills a grid for each coordinate
//! 3. The greedy mesher turns each grid into a geometry buffer
//! 4. The finished chunk is published and never modified again
//!
//! ## Thread Safety
//!
//! Grids and chunks are immutable once published and shared through `Arc`, so any
//! number of readers can use them concurrently without locks.

pub mod block;
pub mod chunk;
pub mod noise;
pub mod tasks;
pub mod terrain;
pub mod world;
