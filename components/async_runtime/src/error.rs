//! Event loop errors.

use core_types::JsError;
use thiserror::Error;

/// Errors that stop the event loop itself.
///
/// Task outcomes never surface here: a failing coroutine rejects its task
/// promise. These errors are for tasks queued directly on the loop that fail,
/// and for runs that exceed their configured turn budget.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoopError {
    /// A task or microtask returned an error
    #[error("task failed: {0}")]
    TaskFailed(#[from] JsError),
    /// The loop ran more turns than its configuration allows
    #[error("event loop exceeded its limit of {0} turns")]
    TurnLimitExceeded(usize),
}
