//! Core value and error types for the task runtime.
//!
//! This crate provides the foundational types shared by every component:
//! the dynamic value carried through suspensions and promises, and the error
//! taxonomy tasks settle with.
//!
//! # Overview
//!
//! - [`Value`] - Dynamic representation of task values
//! - [`JsError`] - Task error with kind and message
//! - [`ErrorKind`] - Program failure or runtime contract violation
//!
//! # Examples
//!
//! ```
//! use core_types::{ErrorKind, JsError, Value};
//!
//! let num = Value::Smi(42);
//! assert_eq!(num.type_of(), "number");
//!
//! let error = JsError::not_awaitable(num.type_of());
//! assert_eq!(error.kind, ErrorKind::NotAwaitable);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod value;

pub use error::{ErrorKind, JsError};
pub use value::Value;
