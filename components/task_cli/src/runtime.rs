//! Runtime orchestration for task execution
//!
//! The Runtime owns one event loop and runs programs on it through the task
//! driver, turning the task promise's settlement into a `CliResult`.

use crate::error::{CliError, CliResult};
use crate::scenarios::Scenario;
use async_runtime::{CoroutineProgram, EventLoop, LoopConfig, LoopHandle, PromiseState, TaskRunner};
use core_types::Value;
use log::info;

/// Main runtime that drives programs to completion
#[derive(Debug)]
pub struct Runtime {
    /// Event loop every task is scheduled on
    event_loop: EventLoop,
    /// Number of suspensions in the `chain` scenario
    steps: u16,
}

impl Runtime {
    /// Create a new runtime with an unbounded event loop
    ///
    /// # Example
    /// ```
    /// use task_cli::Runtime;
    ///
    /// let runtime = Runtime::new();
    /// assert_eq!(runtime.turns(), 0);
    /// ```
    pub fn new() -> Self {
        Self {
            event_loop: EventLoop::new(),
            steps: 100,
        }
    }

    /// Apply `config` to the event loop
    ///
    /// Handles taken earlier through [`handle`](Self::handle) stay attached.
    pub fn with_config(mut self, config: LoopConfig) -> Self {
        self.event_loop.set_config(config);
        self
    }

    /// Set the number of suspensions in the `chain` scenario
    pub fn with_steps(mut self, steps: u16) -> Self {
        self.steps = steps;
        self
    }

    /// Handle for scheduling work on the runtime's loop
    pub fn handle(&self) -> LoopHandle {
        self.event_loop.handle()
    }

    /// Turns executed by the event loop so far
    pub fn turns(&self) -> usize {
        self.event_loop.turns()
    }

    /// Run `program` as a task and drive the loop until it settles
    ///
    /// # Returns
    /// The fulfillment value of the task
    ///
    /// # Errors
    /// `CliError::Js` if the task was rejected, `CliError::Loop` if the loop
    /// failed first, `CliError::Pending` if the loop ran out of work
    ///
    /// # Example
    /// ```
    /// use async_runtime::{Resume, Suspension};
    /// use core_types::{JsError, Value};
    /// use task_cli::Runtime;
    ///
    /// let mut runtime = Runtime::new();
    /// let program = || |_: Resume| -> Result<Suspension, JsError> {
    ///     Ok(Suspension::Done(Value::Smi(42)))
    /// };
    /// assert_eq!(runtime.run_program("answer", &program).unwrap(), Value::Smi(42));
    /// ```
    pub fn run_program<P>(&mut self, label: &str, program: &P) -> CliResult<Value>
    where
        P: CoroutineProgram + ?Sized,
    {
        let task = TaskRunner::new(&self.handle())
            .with_label(label)
            .run(program);
        let state = self.event_loop.run_until_settled(&task)?;
        info!("{}: settled after {} turn(s)", label, self.turns());
        match state {
            PromiseState::Fulfilled(value) => Ok(value),
            PromiseState::Rejected(error) => Err(CliError::Js(error)),
            PromiseState::Pending => Err(CliError::Pending(label.to_string())),
        }
    }

    /// Run a built-in scenario
    pub fn run_scenario(&mut self, scenario: Scenario) -> CliResult<Value> {
        let program = scenario.program(&self.handle(), self.steps);
        self.run_program(scenario.name(), &program)
    }

    /// Run the scenario called `name`
    pub fn run_named(&mut self, name: &str) -> CliResult<Value> {
        let scenario: Scenario = name.parse()?;
        self.run_scenario(scenario)
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}
