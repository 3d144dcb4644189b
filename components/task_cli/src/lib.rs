//! Task Runner CLI Library
//!
//! Provides the Runtime struct and the built-in scenarios behind the
//! `corten-task` binary.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod error;
pub mod runtime;
pub mod scenarios;

pub use cli::Cli;
pub use error::{CliError, CliResult};
pub use runtime::Runtime;
pub use scenarios::Scenario;
