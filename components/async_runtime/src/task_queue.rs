//! Task and microtask queue management.
//!
//! This module provides the task and microtask queues used by the event loop.
//! Tasks are executed one per turn, with all microtasks draining after each task.
//! Both queues are strictly FIFO.

use core_types::JsError;
use std::collections::VecDeque;

type Callback = Box<dyn FnOnce() -> Result<(), JsError>>;

/// A task to be executed by the event loop.
///
/// Tasks represent work deferred to a later turn of the loop, such as the
/// start of a coroutine or the registration of an observer on an awaited
/// promise.
pub struct Task {
    callback: Callback,
}

impl Task {
    /// Creates a new Task from a closure.
    ///
    /// # Arguments
    ///
    /// * `f` - The function to execute when the task runs
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() -> Result<(), JsError> + 'static,
    {
        Self {
            callback: Box::new(f),
        }
    }

    /// Executes the task.
    pub fn run(self) -> Result<(), JsError> {
        (self.callback)()
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Task {{ ... }}")
    }
}

/// A microtask to be executed by the event loop.
///
/// Microtasks run after the current task, before the next one starts.
/// Promise reactions are delivered as microtasks.
pub struct MicroTask {
    callback: Callback,
}

impl MicroTask {
    /// Creates a new MicroTask from a closure.
    ///
    /// # Arguments
    ///
    /// * `f` - The function to execute when the microtask runs
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() -> Result<(), JsError> + 'static,
    {
        Self {
            callback: Box::new(f),
        }
    }

    /// Executes the microtask.
    pub fn run(self) -> Result<(), JsError> {
        (self.callback)()
    }
}

impl std::fmt::Debug for MicroTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MicroTask {{ ... }}")
    }
}

/// A FIFO queue of deferred jobs.
///
/// The event loop keeps one for tasks and one for microtasks.
#[derive(Debug)]
pub struct JobQueue<T> {
    queue: VecDeque<T>,
}

impl<T> Default for JobQueue<T> {
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }
}

impl<T> JobQueue<T> {
    /// Adds a job to the end of the queue.
    pub fn enqueue(&mut self, job: T) {
        self.queue.push_back(job);
    }

    /// Removes and returns the oldest job.
    pub fn dequeue(&mut self) -> Option<T> {
        self.queue.pop_front()
    }

    /// Returns true if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of queued jobs.
    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

/// Tasks, processed one per turn.
pub type TaskQueue = JobQueue<Task>;

/// Microtasks, drained completely after each task.
pub type MicrotaskQueue = JobQueue<MicroTask>;
