//! Built-in demonstration programs
//!
//! Each scenario is a [`GeneratorProgram`] exercising one path through the
//! task driver: plain completion, suspension on pending and settled
//! promises, rejection, recovery and the non-awaitable check.

use crate::error::CliError;
use async_runtime::{GeneratorProgram, LoopHandle, Promise};
use core_types::{JsError, Value};
use std::fmt;
use std::str::FromStr;

/// A named demonstration program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// Awaits three values settled on later turns and returns them as an array
    Collect,
    /// Adds three awaited numbers
    Sum,
    /// Awaits a value, then a rejection that ends the task
    Reject,
    /// Catches a rejection and keeps going
    Recover,
    /// Suspends on a plain number
    NotAwaitable,
    /// Returns without suspending
    Immediate,
    /// Fails before its first suspension
    FailFast,
    /// Suspends `--steps` times in sequence
    Chain,
}

impl Scenario {
    /// Every scenario, in listing order
    pub const ALL: [Scenario; 8] = [
        Scenario::Collect,
        Scenario::Sum,
        Scenario::Reject,
        Scenario::Recover,
        Scenario::NotAwaitable,
        Scenario::Immediate,
        Scenario::FailFast,
        Scenario::Chain,
    ];

    /// Name accepted by `--scenario`
    pub fn name(self) -> &'static str {
        match self {
            Scenario::Collect => "collect",
            Scenario::Sum => "sum",
            Scenario::Reject => "reject",
            Scenario::Recover => "recover",
            Scenario::NotAwaitable => "not-awaitable",
            Scenario::Immediate => "immediate",
            Scenario::FailFast => "fail-fast",
            Scenario::Chain => "chain",
        }
    }

    /// One-line description for `--list`
    pub fn description(self) -> &'static str {
        match self {
            Scenario::Collect => "await 1, 2 and 3 on later turns and return [1, 2, 3]",
            Scenario::Sum => "await three numbers and return their sum",
            Scenario::Reject => "await a value, then a rejection with \"boom\"",
            Scenario::Recover => "catch a rejected await and continue",
            Scenario::NotAwaitable => "suspend on a plain number",
            Scenario::Immediate => "return without suspending",
            Scenario::FailFast => "fail before the first suspension",
            Scenario::Chain => "suspend --steps times in sequence",
        }
    }

    /// Builds the program; promises it awaits are scheduled on `handle`.
    pub fn program(self, handle: &LoopHandle, steps: u16) -> GeneratorProgram {
        let h = handle.clone();
        match self {
            Scenario::Collect => GeneratorProgram::new(move |co| {
                let h = h.clone();
                async move {
                    let a = co.suspend(delayed(&h, Value::Smi(1))).await?;
                    let b = co.suspend(delayed(&h, Value::Smi(2))).await?;
                    let c = co.suspend(delayed(&h, Value::Smi(3))).await?;
                    Ok(Value::from(vec![a, b, c]))
                }
            }),
            Scenario::Sum => GeneratorProgram::new(move |co| {
                let h = h.clone();
                async move {
                    let mut total = 0;
                    for n in 1..=3 {
                        let value = co.suspend(Promise::resolved(&h, Value::Smi(n))).await?;
                        total += smi(&value)?;
                    }
                    Ok(Value::Smi(total))
                }
            }),
            Scenario::Reject => GeneratorProgram::new(move |co| {
                let h = h.clone();
                async move {
                    co.suspend(Promise::resolved(&h, Value::Smi(1))).await?;
                    co.suspend(delayed_failure(&h, JsError::program_failure("boom")))
                        .await?;
                    Ok(Value::from("unreachable"))
                }
            }),
            Scenario::Recover => GeneratorProgram::new(move |co| {
                let h = h.clone();
                async move {
                    let failed = Promise::rejected(&h, JsError::program_failure("boom"));
                    let first = match co.suspend(failed).await {
                        Ok(value) => value,
                        Err(error) => Value::from(format!("recovered from {}", error.message)),
                    };
                    let second = co.suspend(Promise::resolved(&h, Value::Smi(2))).await?;
                    Ok(Value::from(vec![first, second]))
                }
            }),
            Scenario::NotAwaitable => GeneratorProgram::new(|co| async move {
                co.suspend(Value::Smi(42)).await?;
                Ok(Value::Undefined)
            }),
            Scenario::Immediate => GeneratorProgram::new(|_co| async { Ok(Value::from("done")) }),
            Scenario::FailFast => GeneratorProgram::new(|_co| async {
                Err(JsError::program_failure("failed before first suspension"))
            }),
            Scenario::Chain => GeneratorProgram::new(move |co| {
                let h = h.clone();
                async move {
                    let mut count = 0;
                    for _ in 0..steps {
                        let next = Value::Smi(count + 1);
                        count = smi(&co.suspend(delayed(&h, next)).await?)?;
                    }
                    Ok(Value::Smi(count))
                }
            }),
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scenario::ALL
            .iter()
            .copied()
            .find(|scenario| scenario.name() == s)
            .ok_or_else(|| CliError::UnknownScenario(s.to_string()))
    }
}

/// A promise fulfilled with `value` by a task on a later turn.
fn delayed(handle: &LoopHandle, value: Value) -> Promise {
    let promise = Promise::new(handle);
    let target = promise.clone();
    handle.defer(move || {
        target.resolve(value);
        Ok(())
    });
    promise
}

/// A promise rejected with `error` by a task on a later turn.
fn delayed_failure(handle: &LoopHandle, error: JsError) -> Promise {
    let promise = Promise::new(handle);
    let target = promise.clone();
    handle.defer(move || {
        target.reject(error);
        Ok(())
    });
    promise
}

fn smi(value: &Value) -> Result<i32, JsError> {
    match value {
        Value::Smi(n) => Ok(*n),
        other => Err(JsError::program_failure(format!(
            "expected an integer, got {}",
            other.type_of()
        ))),
    }
}
