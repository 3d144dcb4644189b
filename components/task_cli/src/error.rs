//! Error types for the CLI

use async_runtime::LoopError;
use core_types::JsError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    /// The task promise was rejected
    #[error("task rejected: {0}")]
    Js(#[from] JsError),

    /// The event loop stopped before the task settled
    #[error("event loop error: {0}")]
    Loop(#[from] LoopError),

    /// No scenario with this name
    #[error("unknown scenario '{0}' (try --list)")]
    UnknownScenario(String),

    /// The loop ran out of work while the task was still pending
    #[error("task '{0}' never settled")]
    Pending(String),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
