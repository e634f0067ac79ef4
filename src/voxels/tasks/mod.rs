//! # Voxel Task System
//!
//! This module contains tasks related to voxel world generation. They run on the
//! worker pool while a world is being built.

pub mod chunk_generation_task;
