//! Completion driver.
//!
//! Drives one [`CoroutineInstance`] to termination on an event loop and
//! settles a single task promise with the outcome. The driver is the only
//! place where coroutine steps meet scheduling:
//!
//! 1. the first step runs on a later task turn, so the task promise is always
//!    pending when [`run_task`] returns;
//! 2. a `Pending` suspension must wrap a [`Promise`]; anything else rejects
//!    the task with `NotAwaitable`;
//! 3. observer registration is deferred to a later task turn and the
//!    notification arrives as a promise reaction, so each resume starts from
//!    the loop with a fresh stack;
//! 4. a raised failure, at any step, rejects the task.
//!
//! # Examples
//!
//! ```
//! use async_runtime::{run_task, EventLoop, GeneratorProgram, Promise, PromiseState};
//! use core_types::Value;
//!
//! let mut event_loop = EventLoop::new();
//! let handle = event_loop.handle();
//!
//! let h = handle.clone();
//! let program = GeneratorProgram::new(move |co| {
//!     let h = h.clone();
//!     async move {
//!         let a = co.suspend(Promise::resolved(&h, Value::Smi(1))).await?;
//!         let b = co.suspend(Promise::resolved(&h, Value::Smi(2))).await?;
//!         Ok(Value::from(vec![a, b]))
//!     }
//! });
//!
//! let task = run_task(&handle, &program);
//! assert!(task.is_pending());
//!
//! event_loop.run_until_done().unwrap();
//! assert_eq!(
//!     task.state(),
//!     PromiseState::Fulfilled(Value::from(vec![Value::Smi(1), Value::Smi(2)]))
//! );
//! ```

use crate::config::RunnerConfig;
use crate::coroutine::{CoroutineInstance, CoroutineProgram, Suspension};
use crate::event_loop::LoopHandle;
use crate::promise::{as_promise, Promise};
use core_types::{JsError, Value};
use log::{debug, trace};
use std::cell::RefCell;
use std::rc::Rc;

/// Runs `program` on the loop behind `handle`.
///
/// Returns the task promise, which settles exactly once: fulfilled with the
/// program's return value, or rejected with the first failure on any path.
/// Nothing is ever reported synchronously.
pub fn run_task<P>(handle: &LoopHandle, program: &P) -> Promise
where
    P: CoroutineProgram + ?Sized,
{
    TaskRunner::new(handle).run(program)
}

/// Starts programs on an event loop.
///
/// # Examples
///
/// ```
/// use async_runtime::{EventLoop, Resume, Suspension, TaskRunner};
/// use core_types::{JsError, Value};
///
/// let mut event_loop = EventLoop::new();
/// let runner = TaskRunner::new(&event_loop.handle()).with_label("answer");
///
/// let program = || |_: Resume| -> Result<Suspension, JsError> {
///     Ok(Suspension::Done(Value::Smi(42)))
/// };
/// let task = runner.run(&program);
///
/// event_loop.run_until_done().unwrap();
/// assert_eq!(task.value(), Some(Value::Smi(42)));
/// ```
#[derive(Debug, Clone)]
pub struct TaskRunner {
    handle: LoopHandle,
    config: RunnerConfig,
}

impl TaskRunner {
    /// Creates a runner scheduling on `handle`.
    pub fn new(handle: &LoopHandle) -> Self {
        Self {
            handle: handle.clone(),
            config: RunnerConfig::default(),
        }
    }

    /// Replaces the runner configuration.
    pub fn with_config(mut self, config: RunnerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the label used for tasks in log output.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.config.label = Some(label.into());
        self
    }

    /// Returns the runner configuration.
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Instantiates `program` and schedules its first step.
    pub fn run<P>(&self, program: &P) -> Promise
    where
        P: CoroutineProgram + ?Sized,
    {
        let task = Promise::new(&self.handle);
        let label = match &self.config.label {
            Some(label) => label.clone(),
            None => format!("task-{}", task.id()),
        };
        debug!("{}: scheduled", label);

        let driver = Rc::new(Driver {
            label,
            instance: RefCell::new(CoroutineInstance::new(program)),
            task: task.clone(),
            handle: self.handle.clone(),
        });
        self.handle.defer(move || {
            let step = driver.step(|instance| instance.start());
            driver.advance(step);
            Ok(())
        });
        task
    }
}

struct Driver {
    label: String,
    instance: RefCell<CoroutineInstance>,
    task: Promise,
    handle: LoopHandle,
}

impl Driver {
    fn step<F>(&self, f: F) -> Result<Suspension, JsError>
    where
        F: FnOnce(&mut CoroutineInstance) -> Result<Suspension, JsError>,
    {
        let mut instance = self
            .instance
            .try_borrow_mut()
            .map_err(|_| JsError::invalid_state("coroutine resumed while already executing"))?;
        let outcome = f(&mut *instance);
        trace!("{}: step {} -> {:?}", self.label, instance.steps(), outcome);
        outcome
    }

    fn advance(self: &Rc<Self>, step: Result<Suspension, JsError>) {
        match step {
            Ok(Suspension::Done(value)) => self.settle(Ok(value)),
            Err(error) => self.settle(Err(error)),
            Ok(Suspension::Pending(awaited)) => match as_promise(&awaited) {
                Some(promise) => self.await_promise(promise),
                None => self.settle(Err(JsError::not_awaitable(awaited.type_of()))),
            },
        }
    }

    fn await_promise(self: &Rc<Self>, promise: Promise) {
        let driver = Rc::clone(self);
        self.handle.defer(move || {
            trace!("{}: awaiting promise {}", driver.label, promise.id());
            promise.observe(move |outcome| {
                let step = match outcome {
                    Ok(value) => driver.step(|instance| instance.resume_with_value(value)),
                    Err(error) => driver.step(|instance| instance.resume_with_failure(error)),
                };
                driver.advance(step);
            });
            Ok(())
        });
    }

    fn settle(&self, outcome: Result<Value, JsError>) {
        match outcome {
            Ok(value) => {
                debug!("{}: resolved with {}", self.label, value);
                self.task.resolve(value);
            }
            Err(error) => {
                debug!("{}: rejected with {}", self.label, error);
                self.task.reject(error);
            }
        }
    }
}
