//! Task error types.
//!
//! Every failure a task can end with is a [`JsError`]. The [`ErrorKind`]
//! distinguishes failures raised by the program itself from contract
//! violations detected by the runtime.

use std::fmt;
use thiserror::Error;

/// The kind of task error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Raised by the program's own logic, or the rejection reason of a
    /// future the program awaited
    ProgramFailure,
    /// The program suspended on something that is not a promise
    NotAwaitable,
    /// A coroutine was started twice, resumed after termination, or resumed
    /// while already executing
    InvalidState,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::ProgramFailure => "ProgramFailure",
            ErrorKind::NotAwaitable => "NotAwaitable",
            ErrorKind::InvalidState => "InvalidState",
        };
        f.write_str(name)
    }
}

/// A task error with its kind and a human-readable message.
///
/// # Examples
///
/// ```
/// use core_types::{ErrorKind, JsError};
///
/// let error = JsError::program_failure("boom");
/// assert_eq!(error.kind, ErrorKind::ProgramFailure);
/// assert_eq!(error.message, "boom");
/// assert_eq!(error.to_string(), "ProgramFailure: boom");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct JsError {
    /// The type of error
    pub kind: ErrorKind,
    /// Human-readable error message
    pub message: String,
}

impl JsError {
    /// Creates an error of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// A failure raised by the program.
    pub fn program_failure(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ProgramFailure, message)
    }

    /// A suspension payload of type `type_of` that cannot be awaited.
    pub fn not_awaitable(type_of: &str) -> Self {
        Self::new(
            ErrorKind::NotAwaitable,
            format!("Expecting a promise, got {}", type_of),
        )
    }

    /// A coroutine lifecycle violation.
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidState, message)
    }

    /// Returns true if this error has the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}
