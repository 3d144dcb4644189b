//! Coroutine stepper.
//!
//! A coroutine is a computation that pauses at suspension points and is
//! resumed from outside with either a value or a failure. This module knows
//! nothing about promises or scheduling: it only moves a single
//! [`CoroutineInstance`] through its lifecycle and reports what the
//! computation is waiting on.
//!
//! Programs can be written two ways:
//! - as an explicit state machine, any `FnMut(Resume) -> Result<Suspension, JsError>`;
//! - as an `async` block wrapped in a [`GeneratorProgram`], suspending through
//!   [`Suspender::suspend`].
//!
//! # Examples
//!
//! ```
//! use async_runtime::{CoroutineInstance, GeneratorProgram, Suspension};
//! use core_types::Value;
//!
//! let program = GeneratorProgram::new(|co| async move {
//!     let x = co.suspend(Value::from("first")).await?;
//!     Ok(Value::from(vec![x]))
//! });
//!
//! let mut instance = CoroutineInstance::new(&program);
//! assert_eq!(instance.start().unwrap(), Suspension::Pending(Value::from("first")));
//! assert_eq!(
//!     instance.resume_with_value(Value::Smi(1)).unwrap(),
//!     Suspension::Done(Value::from(vec![Value::Smi(1)]))
//! );
//! assert!(instance.is_terminal());
//! ```

use core_types::{JsError, Value};
use genawaiter::rc::{Co, Gen};
use genawaiter::GeneratorState;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

/// What a suspended coroutine is resumed with.
#[derive(Debug, Clone, PartialEq)]
pub enum Resume {
    /// The awaited future resolved with this value
    Value(Value),
    /// The awaited future rejected with this error
    Failure(JsError),
}

/// The outcome of advancing a coroutine one step.
///
/// A failure raised by the program is not a variant: the resume call itself
/// returns `Err`.
#[derive(Debug, Clone, PartialEq)]
pub enum Suspension {
    /// The coroutine waits for the outcome of this value
    Pending(Value),
    /// The coroutine finished with this value
    Done(Value),
}

/// A resumable computation.
///
/// `resume` runs the computation from its last suspension point (or from the
/// beginning, on the first call) until it suspends again or finishes.
pub trait Coroutine {
    /// Advances the computation with `input`.
    fn resume(&mut self, input: Resume) -> Result<Suspension, JsError>;
}

impl<F> Coroutine for F
where
    F: FnMut(Resume) -> Result<Suspension, JsError>,
{
    fn resume(&mut self, input: Resume) -> Result<Suspension, JsError> {
        self(input)
    }
}

/// A definition of a coroutine that can be started any number of times.
pub trait CoroutineProgram {
    /// Creates a fresh, not yet started, coroutine.
    fn instantiate(&self) -> Box<dyn Coroutine>;
}

impl<F, C> CoroutineProgram for F
where
    F: Fn() -> C,
    C: Coroutine + 'static,
{
    fn instantiate(&self) -> Box<dyn Coroutine> {
        Box::new(self())
    }
}

type Body = Pin<Box<dyn Future<Output = Result<Value, JsError>>>>;
type Factory = Rc<dyn Fn(Suspender) -> Body>;

/// The suspension side of a [`GeneratorProgram`] body.
pub struct Suspender {
    co: Co<Value, Result<Value, JsError>>,
}

impl Suspender {
    /// Suspends the program until `awaited` settles.
    ///
    /// Resolves to `Ok` with the settled value, or `Err` with the rejection,
    /// so `?` propagates the failure and a `match` recovers from it.
    pub async fn suspend(&self, awaited: impl Into<Value>) -> Result<Value, JsError> {
        self.co.yield_(awaited.into()).await
    }
}

/// A program whose body is an `async` block driven as a generator.
///
/// The body may only await [`Suspender::suspend`]; each such await is one
/// suspension point of the coroutine.
#[derive(Clone)]
pub struct GeneratorProgram {
    factory: Factory,
}

impl GeneratorProgram {
    /// Creates a program from a body factory.
    pub fn new<F, Fut>(body: F) -> Self
    where
        F: Fn(Suspender) -> Fut + 'static,
        Fut: Future<Output = Result<Value, JsError>> + 'static,
    {
        let factory: Factory = Rc::new(move |suspender| Box::pin(body(suspender)) as Body);
        Self { factory }
    }
}

impl fmt::Debug for GeneratorProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GeneratorProgram {{ ... }}")
    }
}

impl CoroutineProgram for GeneratorProgram {
    fn instantiate(&self) -> Box<dyn Coroutine> {
        let factory = Rc::clone(&self.factory);
        let gen = Gen::new(move |co| (*factory)(Suspender { co }));
        Box::new(GeneratorCoroutine { gen })
    }
}

struct GeneratorCoroutine {
    gen: Gen<Value, Result<Value, JsError>, Body>,
}

impl Coroutine for GeneratorCoroutine {
    fn resume(&mut self, input: Resume) -> Result<Suspension, JsError> {
        let arg = match input {
            Resume::Value(value) => Ok(value),
            Resume::Failure(error) => Err(error),
        };
        match self.gen.resume_with(arg) {
            GeneratorState::Yielded(awaited) => Ok(Suspension::Pending(awaited)),
            GeneratorState::Complete(result) => result.map(Suspension::Done),
        }
    }
}

/// Lifecycle of a [`CoroutineInstance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoroutineState {
    /// Created but never run
    SuspendedStart,
    /// Paused at a suspension point
    SuspendedYield,
    /// Running a step (also left behind if a step panicked)
    Executing,
    /// Finished with a value
    Completed,
    /// Finished with an error
    Failed,
}

impl CoroutineState {
    /// Returns true for `Completed` and `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, CoroutineState::Completed | CoroutineState::Failed)
    }
}

/// A single execution of a [`CoroutineProgram`].
///
/// Owns the coroutine's state exclusively. Each instance terminates exactly
/// once; every operation on a terminated instance fails with
/// `InvalidState` without touching it.
pub struct CoroutineInstance {
    body: Box<dyn Coroutine>,
    state: CoroutineState,
    steps: usize,
}

impl CoroutineInstance {
    /// Creates an instance of `program`. The program does not run yet.
    pub fn new<P>(program: &P) -> Self
    where
        P: CoroutineProgram + ?Sized,
    {
        Self {
            body: program.instantiate(),
            state: CoroutineState::SuspendedStart,
            steps: 0,
        }
    }

    /// Runs the program up to its first suspension or completion.
    pub fn start(&mut self) -> Result<Suspension, JsError> {
        if self.state != CoroutineState::SuspendedStart {
            return Err(JsError::invalid_state(format!(
                "coroutine already started (state {:?})",
                self.state
            )));
        }
        self.step(Resume::Value(Value::Undefined))
    }

    /// Resumes the most recent suspension point with `value`.
    ///
    /// On an instance that was never started this behaves like
    /// [`start`](Self::start) and the value is discarded.
    pub fn resume_with_value(&mut self, value: Value) -> Result<Suspension, JsError> {
        self.check_resumable()?;
        if self.state == CoroutineState::SuspendedStart {
            return self.start();
        }
        self.step(Resume::Value(value))
    }

    /// Raises `error` at the most recent suspension point.
    ///
    /// The program may recover and suspend again or finish. On an instance
    /// that was never started the program does not run at all: the instance
    /// fails with `error`.
    pub fn resume_with_failure(&mut self, error: JsError) -> Result<Suspension, JsError> {
        self.check_resumable()?;
        if self.state == CoroutineState::SuspendedStart {
            self.state = CoroutineState::Failed;
            return Err(error);
        }
        self.step(Resume::Failure(error))
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CoroutineState {
        self.state
    }

    /// Returns true once the instance has completed or failed.
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Number of steps run so far, including the first.
    pub fn steps(&self) -> usize {
        self.steps
    }

    fn check_resumable(&self) -> Result<(), JsError> {
        match self.state {
            CoroutineState::SuspendedStart | CoroutineState::SuspendedYield => Ok(()),
            CoroutineState::Executing => Err(JsError::invalid_state(
                "coroutine is already executing",
            )),
            CoroutineState::Completed | CoroutineState::Failed => Err(JsError::invalid_state(
                format!("cannot resume a coroutine in state {:?}", self.state),
            )),
        }
    }

    fn step(&mut self, input: Resume) -> Result<Suspension, JsError> {
        self.state = CoroutineState::Executing;
        self.steps += 1;
        let outcome = self.body.resume(input);
        self.state = match &outcome {
            Ok(Suspension::Pending(_)) => CoroutineState::SuspendedYield,
            Ok(Suspension::Done(_)) => CoroutineState::Completed,
            Err(_) => CoroutineState::Failed,
        };
        outcome
    }
}

impl fmt::Debug for CoroutineInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoroutineInstance")
            .field("state", &self.state)
            .field("steps", &self.steps)
            .finish()
    }
}
