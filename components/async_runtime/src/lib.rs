//! Async runtime for generator-driven tasks.
//!
//! This crate runs coroutines to completion on a single-threaded event loop:
//! - Event loop with task and microtask queues
//! - Single-shot promises whose reactions always run on the loop
//! - A coroutine stepper with an explicit lifecycle
//! - A completion driver turning suspensions into promise waits
//!
//! # Overview
//!
//! - [`EventLoop`] / [`LoopHandle`] - Turn-based scheduling and deferral
//! - [`Promise`] - Single-shot future bound to a loop
//! - [`CoroutineInstance`] - One execution of a [`CoroutineProgram`]
//! - [`run_task`] / [`TaskRunner`] - Drive a program and get its task promise
//!
//! # Examples
//!
//! ```
//! use async_runtime::{run_task, EventLoop, GeneratorProgram, Promise};
//! use core_types::{ErrorKind, JsError, Value};
//!
//! let mut event_loop = EventLoop::new();
//! let handle = event_loop.handle();
//!
//! let h = handle.clone();
//! let program = GeneratorProgram::new(move |co| {
//!     let h = h.clone();
//!     async move {
//!         co.suspend(Promise::resolved(&h, Value::Smi(1))).await?;
//!         co.suspend(Promise::rejected(&h, JsError::program_failure("boom"))).await?;
//!         Ok(Value::Undefined)
//!     }
//! });
//!
//! let task = run_task(&handle, &program);
//! event_loop.run_until_done().unwrap();
//!
//! let error = task.error().unwrap();
//! assert_eq!(error.kind, ErrorKind::ProgramFailure);
//! assert_eq!(error.message, "boom");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod coroutine;
pub mod driver;
pub mod error;
pub mod event_loop;
pub mod promise;
pub mod task_queue;

// Re-export main types at crate root
pub use config::{LoopConfig, RunnerConfig};
pub use coroutine::{
    Coroutine, CoroutineInstance, CoroutineProgram, CoroutineState, GeneratorProgram, Resume,
    Suspender, Suspension,
};
pub use driver::{run_task, TaskRunner};
pub use error::LoopError;
pub use event_loop::{EventLoop, LoopHandle};
pub use promise::{as_promise, is_promise, Promise, PromiseReaction, PromiseState};
pub use task_queue::{JobQueue, MicroTask, MicrotaskQueue, Task, TaskQueue};
