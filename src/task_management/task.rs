//! # Task System Core Traits
//!
//! This module defines the two halves of a unit of background work.
//!
//! ## Task Lifecycle
//! 1. A `Task` is published via `TaskManager::publish_task()`
//! 2. The task's `process()` method runs on a worker thread
//! 3. The task returns a boxed `TaskResult`
//! 4. The result's `handle_result()` runs on the thread driving the manager, with
//!    exclusive access to the world being assembled
//! 5. The result may hand back follow-up tasks, which are published in turn
//!
//! ## Thread Safety
//! - `Task` must be `Send` to be transferred to a worker
//! - `TaskResult` must be `Send` to be transferred back
//! - Tasks own the data they work on (grids are shared through `Arc`), so workers
//!   never need a lock

use crate::voxels::world::WorldAssembly;

/// A unit of work executed on a worker thread.
///
/// Tasks should be coarse-grained (a whole chunk, not a single voxel) to amortize
/// the channel round trip.
pub trait Task: Send {
    /// Performs the work and packages its output.
    ///
    /// Runs on a worker thread. Must not touch shared mutable state.
    fn process(&self) -> Box<dyn TaskResult + Send>;
}

/// The output of a processed [`Task`].
pub trait TaskResult: Send {
    /// Applies the result to the world under construction.
    ///
    /// # Returns
    /// Follow-up tasks to publish. Can be empty.
    fn handle_result(self: Box<Self>, assembly: &mut WorldAssembly) -> Vec<Box<dyn Task + Send>>;
}
