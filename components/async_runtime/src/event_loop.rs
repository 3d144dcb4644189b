//! Event loop implementation.
//!
//! This module provides the single-threaded event loop that coordinates task
//! and microtask execution, and the [`LoopHandle`] through which promises and
//! the task driver schedule deferred work.

use crate::config::LoopConfig;
use crate::error::LoopError;
use crate::promise::{Promise, PromiseState};
use crate::task_queue::{MicroTask, MicrotaskQueue, Task, TaskQueue};
use core_types::JsError;
use log::trace;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Default)]
struct Queues {
    tasks: TaskQueue,
    microtasks: MicrotaskQueue,
}

/// A cloneable handle to an event loop's queues.
///
/// The handle is the deferral primitive of the runtime: anything scheduled
/// through it runs on a later turn, never on the caller's stack. Handles are
/// single-threaded and cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct LoopHandle {
    queues: Rc<RefCell<Queues>>,
}

impl LoopHandle {
    /// Schedules `f` to run as a task on a later turn.
    pub fn defer<F>(&self, f: F)
    where
        F: FnOnce() -> Result<(), JsError> + 'static,
    {
        self.enqueue_task(Task::new(f));
    }

    /// Schedules `f` to run as a microtask after the current task.
    pub fn queue_microtask<F>(&self, f: F)
    where
        F: FnOnce() -> Result<(), JsError> + 'static,
    {
        self.enqueue_microtask(MicroTask::new(f));
    }

    /// Adds a task to the task queue.
    pub fn enqueue_task(&self, task: Task) {
        self.queues.borrow_mut().tasks.enqueue(task);
    }

    /// Adds a microtask to the microtask queue.
    pub fn enqueue_microtask(&self, microtask: MicroTask) {
        self.queues.borrow_mut().microtasks.enqueue(microtask);
    }

    /// Returns the number of queued tasks.
    pub fn pending_tasks(&self) -> usize {
        self.queues.borrow().tasks.len()
    }

    /// Returns the number of queued microtasks.
    pub fn pending_microtasks(&self) -> usize {
        self.queues.borrow().microtasks.len()
    }

    // The queue borrow must end before the callback runs: callbacks enqueue.
    fn next_task(&self) -> Option<Task> {
        self.queues.borrow_mut().tasks.dequeue()
    }

    fn next_microtask(&self) -> Option<MicroTask> {
        self.queues.borrow_mut().microtasks.dequeue()
    }

    fn is_idle(&self) -> bool {
        let queues = self.queues.borrow();
        queues.tasks.is_empty() && queues.microtasks.is_empty()
    }
}

/// The event loop.
///
/// Each iteration (turn) of the loop:
/// 1. Takes the oldest task from the task queue and executes it
/// 2. Drains all microtasks in the microtask queue
/// 3. Repeats
///
/// # Examples
///
/// ```
/// use async_runtime::{EventLoop, Task};
///
/// let mut event_loop = EventLoop::new();
///
/// event_loop.enqueue_task(Task::new(|| Ok(())));
/// event_loop.run_until_done().unwrap();
/// assert_eq!(event_loop.turns(), 1);
/// ```
#[derive(Debug, Default)]
pub struct EventLoop {
    handle: LoopHandle,
    config: LoopConfig,
    turns: usize,
    run_start: usize,
}

impl EventLoop {
    /// Creates a new EventLoop with empty queues and no turn limit.
    pub fn new() -> Self {
        Self::with_config(LoopConfig::default())
    }

    /// Creates a new EventLoop with the given configuration.
    pub fn with_config(config: LoopConfig) -> Self {
        Self {
            handle: LoopHandle::default(),
            config,
            turns: 0,
            run_start: 0,
        }
    }

    /// Returns a handle for scheduling work on this loop.
    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    /// Returns the loop configuration.
    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    /// Replaces the configuration. Queued work and existing handles are kept.
    pub fn set_config(&mut self, config: LoopConfig) {
        self.config = config;
    }

    /// Number of turns executed over the loop's lifetime.
    pub fn turns(&self) -> usize {
        self.turns
    }

    /// Number of turns executed since the current run started.
    pub fn turns_this_run(&self) -> usize {
        self.turns - self.run_start
    }

    /// Runs the event loop until all tasks and microtasks are processed.
    ///
    /// # Returns
    ///
    /// `Ok(())` once both queues are empty, or an error if a task failed or
    /// the turn limit was reached. The limit applies to this call alone.
    pub fn run_until_done(&mut self) -> Result<(), LoopError> {
        self.run_start = self.turns;
        while !self.handle.is_idle() {
            self.process_one_cycle()?;
        }
        Ok(())
    }

    /// Runs the event loop until `promise` settles or there is no work left.
    ///
    /// Returns the promise state at that point, which is still
    /// [`PromiseState::Pending`] if the loop ran dry first.
    pub fn run_until_settled(&mut self, promise: &Promise) -> Result<PromiseState, LoopError> {
        self.run_start = self.turns;
        while promise.is_pending() && !self.handle.is_idle() {
            self.process_one_cycle()?;
        }
        Ok(promise.state())
    }

    /// Adds a task to the task queue.
    ///
    /// The task will be executed in the next available iteration of the event loop.
    pub fn enqueue_task(&mut self, task: Task) {
        self.handle.enqueue_task(task);
    }

    /// Adds a microtask to the microtask queue.
    ///
    /// The microtask will be executed after the current task completes.
    pub fn enqueue_microtask(&mut self, microtask: MicroTask) {
        self.handle.enqueue_microtask(microtask);
    }

    /// Returns true if the task queue is empty.
    pub fn is_task_queue_empty(&self) -> bool {
        self.handle.pending_tasks() == 0
    }

    /// Returns true if the microtask queue is empty.
    pub fn is_microtask_queue_empty(&self) -> bool {
        self.handle.pending_microtasks() == 0
    }

    /// Runs all microtasks in the queue until empty.
    ///
    /// New microtasks added during execution are also processed before this
    /// method returns.
    pub fn run_all_microtasks(&mut self) -> Result<(), LoopError> {
        while let Some(microtask) = self.handle.next_microtask() {
            microtask.run()?;
        }
        Ok(())
    }

    /// Processes one complete cycle: one task followed by all microtasks.
    ///
    /// Counts toward the turn limit of the current run.
    pub fn process_one_cycle(&mut self) -> Result<(), LoopError> {
        if let Some(limit) = self.config.turn_limit {
            if self.turns_this_run() >= limit {
                return Err(LoopError::TurnLimitExceeded(limit));
            }
        }
        self.turns += 1;
        trace!(
            "turn {}: {} task(s), {} microtask(s) queued",
            self.turns,
            self.handle.pending_tasks(),
            self.handle.pending_microtasks()
        );

        let task = self.handle.next_task();
        if let Some(task) = task {
            task.run()?;
        }

        self.run_all_microtasks()
    }
}
