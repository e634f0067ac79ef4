//! # Task Management System
//!
//! This module provides the worker pool that builds a world in parallel.
//!
//! ## Architecture Overview
//!
//! - `TaskManager`: owns the worker threads and distributes tasks to them
//! - `Task`: a unit of work that runs on a worker
//! - `TaskResult`: the output of a task, applied on the driving thread, which can
//!   spawn follow-up tasks
//! - `TaskChannel`: the sending half of one worker's task queue
//!
//! Every worker has its own task channel and tasks are dealt out round-robin, with at
//! most [`MAX_TASKS_IN_FLIGHT`] outstanding per worker. Excess tasks wait in a local
//! queue. All workers report back through one shared result channel, so the driving
//! thread can block on a single receiver.
//!
//! ## Task Lifecycle
//! 1. Tasks are published via `TaskManager::publish_task()`
//! 2. The manager sends them to workers with free capacity, or queues them
//! 3. Workers process tasks and send back results
//! 4. Results are applied in `process_completed_tasks()` or `run_to_completion()`,
//!    and any follow-up tasks they return are published
//!
//! Chunks do not depend on each other, so there is no ordering between tasks on
//! different workers.
//!
//! ## Failure
//!
//! A worker that panics drops its end of the result channel. The manager notices
//! the stopped thread while waiting and reports [`TaskError::WorkerDisconnected`]
//! instead of waiting forever for results that will never arrive.
//!
//! ## Example Usage
//! ```ignore
//! let mut task_manager = TaskManager::new(num_workers)?;
//!
//! for position in extent.positions() {
//!     task_manager.publish_task(Box::new(ChunkGenerationTask::new(generator.clone(), position)));
//! }
//!
//! task_manager.run_to_completion(&mut assembly)?;
//! ```

pub mod task;

use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, info, warn};
use thiserror::Error;

use crate::voxels::world::WorldAssembly;
use task::{Task, TaskResult};

/// Maximum number of tasks that can be in flight per worker channel.
///
/// Two lets a worker start on its next task while the driving thread is still
/// applying the previous result.
pub const MAX_TASKS_IN_FLIGHT: usize = 2;

/// How long to block on results before checking whether a worker has died.
const WORKER_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A finished task, tagged with the index of the worker that ran it.
type CompletedTask = (usize, Box<dyn TaskResult + Send>);

/// Errors raised while running tasks.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("no worker threads are available to run {0} queued tasks")]
    NoWorkers(usize),
    #[error("worker {0} stopped before finishing its tasks")]
    WorkerDisconnected(usize),
}

/// The sending half of one worker's queue.
struct TaskChannel {
    task_sender: Sender<Box<dyn Task + Send>>,
    num_tasks_in_flight: usize,
    worker: JoinHandle<()>,
}

/// Manages a pool of worker threads and coordinates task execution.
///
/// Worker threads are joined when the manager is dropped.
pub struct TaskManager {
    channels: Vec<TaskChannel>,
    result_receiver: Receiver<CompletedTask>,
    queued_tasks: VecDeque<Box<dyn Task + Send>>,
    current_channel: usize,
}

impl TaskManager {
    /// Creates a new `TaskManager` with the specified number of worker threads.
    ///
    /// # Arguments
    /// * `num_workers` - Number of worker threads to start
    ///
    /// # Errors
    /// Returns [`TaskError::Spawn`] if the operating system refuses a thread.
    pub fn new(num_workers: usize) -> Result<Self, TaskError> {
        let (result_tx, result_rx) = channel::<CompletedTask>();
        let mut channels = Vec::with_capacity(num_workers);

        for index in 0..num_workers {
            let (task_tx, task_rx) = channel::<Box<dyn Task + Send>>();
            let result_tx = result_tx.clone();

            let worker = thread::Builder::new()
                .name(format!("chunk-worker-{index}"))
                .spawn(move || {
                    while let Ok(task) = task_rx.recv() {
                        let result = task.process();
                        if result_tx.send((index, result)).is_err() {
                            break;
                        }
                    }
                })?;

            channels.push(TaskChannel {
                task_sender: task_tx,
                num_tasks_in_flight: 0,
                worker,
            });
        }

        info!(
            "Started {} workers (available parallelism: {:?})",
            num_workers,
            thread::available_parallelism()
        );

        Ok(TaskManager {
            channels,
            result_receiver: result_rx,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
        })
    }

    pub fn num_workers(&self) -> usize {
        self.channels.len()
    }

    /// Returns `true` when nothing is queued and no worker holds a task.
    pub fn is_idle(&self) -> bool {
        self.queued_tasks.is_empty()
            && self
                .channels
                .iter()
                .all(|channel| channel.num_tasks_in_flight == 0)
    }

    /// Attempts to send a task to a specific worker channel.
    ///
    /// # Returns
    /// - `Ok(())` if the worker accepted the task
    /// - `Err(task)` if the worker is gone, handing the task back
    fn try_send_task(
        &mut self,
        task: Box<dyn Task + Send>,
        channel_idx: usize,
    ) -> Result<(), Box<dyn Task + Send>> {
        match self.channels[channel_idx].task_sender.send(task) {
            Ok(()) => {
                self.channels[channel_idx].num_tasks_in_flight += 1;
                Ok(())
            }
            Err(error) => Err(error.0),
        }
    }

    /// Finds a worker channel that can accept a new task, round-robin from the last
    /// one used.
    ///
    /// # Returns
    /// `None` if every channel is at [`MAX_TASKS_IN_FLIGHT`] or there are none.
    fn find_available_channel(&self) -> Option<usize> {
        let len = self.channels.len();
        (0..len)
            .map(|offset| (self.current_channel + offset) % len)
            .find(|&idx| self.channels[idx].num_tasks_in_flight < MAX_TASKS_IN_FLIGHT)
    }

    /// Publishes a new task for execution.
    ///
    /// # Returns
    /// - `true` if the task was handed to a worker right away
    /// - `false` if it was queued because all workers are busy
    pub fn publish_task(&mut self, task: Box<dyn Task + Send>) -> bool {
        let Some(channel_idx) = self.find_available_channel() else {
            self.queued_tasks.push_back(task);
            return false;
        };

        match self.try_send_task(task, channel_idx) {
            Ok(()) => {
                self.current_channel = (channel_idx + 1) % self.channels.len();
                true
            }
            Err(task) => {
                self.queued_tasks.push_back(task);
                false
            }
        }
    }

    /// Hands queued tasks to workers until the queue is empty or all workers are busy.
    ///
    /// # Errors
    /// Returns [`TaskError::WorkerDisconnected`] if a worker no longer accepts tasks.
    /// The task it refused stays queued.
    pub fn process_queued_tasks(&mut self) -> Result<(), TaskError> {
        while let Some(channel_idx) = self.find_available_channel() {
            let Some(task) = self.queued_tasks.pop_front() else {
                break;
            };
            if let Err(task) = self.try_send_task(task, channel_idx) {
                self.queued_tasks.push_front(task);
                return Err(TaskError::WorkerDisconnected(channel_idx));
            }
            self.current_channel = (channel_idx + 1) % self.channels.len();
        }
        Ok(())
    }

    /// Applies every result that has already arrived, without blocking.
    ///
    /// Follow-up tasks returned by the results are published.
    ///
    /// # Returns
    /// The number of results applied.
    pub fn process_completed_tasks(&mut self, assembly: &mut WorldAssembly) -> usize {
        let mut handled = 0;
        while let Ok(completed) = self.result_receiver.try_recv() {
            self.complete(completed, assembly);
            handled += 1;
        }
        handled
    }

    /// Runs until every published task and all of their follow-ups have finished.
    ///
    /// # Errors
    /// - [`TaskError::NoWorkers`] if tasks are queued but the pool is empty
    /// - [`TaskError::WorkerDisconnected`] if a worker dies with work outstanding
    pub fn run_to_completion(&mut self, assembly: &mut WorldAssembly) -> Result<(), TaskError> {
        loop {
            if self.channels.is_empty() && !self.queued_tasks.is_empty() {
                return Err(TaskError::NoWorkers(self.queued_tasks.len()));
            }

            self.process_queued_tasks()?;
            if self.is_idle() {
                debug!("All tasks finished");
                return Ok(());
            }

            let completed = self.wait_for_result()?;
            self.complete(completed, assembly);
            self.process_completed_tasks(assembly);
        }
    }

    fn complete(&mut self, (channel_idx, result): CompletedTask, assembly: &mut WorldAssembly) {
        let channel = &mut self.channels[channel_idx];
        channel.num_tasks_in_flight = channel.num_tasks_in_flight.saturating_sub(1);

        for task in result.handle_result(assembly) {
            self.publish_task(task);
        }
    }

    fn wait_for_result(&self) -> Result<CompletedTask, TaskError> {
        loop {
            match self.result_receiver.recv_timeout(WORKER_POLL_INTERVAL) {
                Ok(completed) => return Ok(completed),
                Err(RecvTimeoutError::Timeout) => {
                    if let Some(idx) = self.find_stopped_worker() {
                        return Err(TaskError::WorkerDisconnected(idx));
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(TaskError::WorkerDisconnected(
                        self.find_stopped_worker().unwrap_or_default(),
                    ));
                }
            }
        }
    }

    /// A worker that owes results but whose thread has exited.
    fn find_stopped_worker(&self) -> Option<usize> {
        self.channels
            .iter()
            .position(|channel| channel.num_tasks_in_flight > 0 && channel.worker.is_finished())
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        for (index, channel) in self.channels.drain(..).enumerate() {
            let TaskChannel {
                task_sender,
                worker,
                ..
            } = channel;
            drop(task_sender);
            if worker.join().is_err() {
                warn!("Worker {index} panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    struct CountdownTask {
        remaining: u32,
        processed: Arc<AtomicUsize>,
    }

    struct CountdownResult {
        remaining: u32,
        processed: Arc<AtomicUsize>,
    }

    impl Task for CountdownTask {
        fn process(&self) -> Box<dyn TaskResult + Send> {
            self.processed.fetch_add(1, Ordering::SeqCst);
            Box::new(CountdownResult {
                remaining: self.remaining,
                processed: self.processed.clone(),
            })
        }
    }

    impl TaskResult for CountdownResult {
        fn handle_result(self: Box<Self>, _assembly: &mut WorldAssembly) -> Vec<Box<dyn Task + Send>> {
            if self.remaining == 0 {
                return Vec::new();
            }
            vec![Box::new(CountdownTask {
                remaining: self.remaining - 1,
                processed: self.processed,
            })]
        }
    }

    struct PanickingTask;

    impl Task for PanickingTask {
        fn process(&self) -> Box<dyn TaskResult + Send> {
            panic!("task failed on purpose");
        }
    }

    #[test]
    fn runs_tasks_and_their_follow_ups() {
        let processed = Arc::new(AtomicUsize::new(0));
        let mut manager = TaskManager::new(3).unwrap();
        let mut assembly = WorldAssembly::new(0, false);

        for _ in 0..5 {
            manager.publish_task(Box::new(CountdownTask {
                remaining: 3,
                processed: processed.clone(),
            }));
        }
        manager.run_to_completion(&mut assembly).unwrap();

        assert_eq!(processed.load(Ordering::SeqCst), 20);
        assert!(manager.is_idle());
    }

    #[test]
    fn excess_tasks_are_queued() {
        let processed = Arc::new(AtomicUsize::new(0));
        let mut manager = TaskManager::new(1).unwrap();

        let scheduled: Vec<bool> = (0..MAX_TASKS_IN_FLIGHT + 1)
            .map(|_| {
                manager.publish_task(Box::new(CountdownTask {
                    remaining: 0,
                    processed: processed.clone(),
                }))
            })
            .collect();

        assert!(scheduled[..MAX_TASKS_IN_FLIGHT].iter().all(|&s| s));
        assert!(!scheduled[MAX_TASKS_IN_FLIGHT]);

        manager.run_to_completion(&mut WorldAssembly::new(0, false)).unwrap();
        assert_eq!(processed.load(Ordering::SeqCst), MAX_TASKS_IN_FLIGHT + 1);
    }

    #[test]
    fn idle_manager_completes_immediately() {
        let mut manager = TaskManager::new(2).unwrap();
        assert_eq!(manager.num_workers(), 2);
        manager.run_to_completion(&mut WorldAssembly::new(0, false)).unwrap();
    }

    #[test]
    fn empty_pool_reports_no_workers() {
        let mut manager = TaskManager::new(0).unwrap();
        assert!(!manager.publish_task(Box::new(PanickingTask)));
        assert!(matches!(
            manager.run_to_completion(&mut WorldAssembly::new(0, false)),
            Err(TaskError::NoWorkers(1))
        ));
    }

    #[test]
    fn panicking_worker_is_reported() {
        let mut manager = TaskManager::new(2).unwrap();
        manager.publish_task(Box::new(PanickingTask));
        assert!(matches!(
            manager.run_to_completion(&mut WorldAssembly::new(0, false)),
            Err(TaskError::WorkerDisconnected(0))
        ));
    }
}
