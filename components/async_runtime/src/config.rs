//! Configuration for the event loop and the task runner.

/// Event loop configuration.
///
/// # Examples
///
/// ```
/// use async_runtime::LoopConfig;
///
/// let config = LoopConfig::default().with_turn_limit(1_000);
/// assert_eq!(config.turn_limit, Some(1_000));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoopConfig {
    /// Maximum number of turns a single run may execute; `None` is unbounded
    pub turn_limit: Option<usize>,
}

impl LoopConfig {
    /// Bounds the number of turns per run.
    pub fn with_turn_limit(mut self, limit: usize) -> Self {
        self.turn_limit = Some(limit);
        self
    }
}

/// Task runner configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Name used for the task in log output; defaults to `task-<promise id>`
    pub label: Option<String>,
}

impl RunnerConfig {
    /// Sets the label used in log output.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}
