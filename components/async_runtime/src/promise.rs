//! Single-shot promise bound to an event loop.
//!
//! A [`Promise`] starts pending and settles exactly once, either fulfilled
//! with a [`Value`] or rejected with a [`JsError`]. Reactions registered on it
//! always run as microtasks on the owning loop, whether the promise settles
//! after registration or had already settled before it.

use crate::event_loop::LoopHandle;
use core_types::{JsError, Value};
use log::warn;
use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_PROMISE_ID: AtomicU64 = AtomicU64::new(1);

/// The state of a Promise.
///
/// Once settled (Fulfilled or Rejected), a Promise cannot change state.
#[derive(Debug, Clone, PartialEq)]
pub enum PromiseState {
    /// Neither fulfilled nor rejected yet.
    Pending,
    /// Resolved with a value.
    Fulfilled(Value),
    /// Rejected with an error.
    Rejected(JsError),
}

impl PromiseState {
    fn outcome(&self) -> Option<Result<Value, JsError>> {
        match self {
            PromiseState::Pending => None,
            PromiseState::Fulfilled(value) => Some(Ok(value.clone())),
            PromiseState::Rejected(error) => Some(Err(error.clone())),
        }
    }
}

/// A one-shot observer of a promise's settlement.
pub struct PromiseReaction {
    handler: Box<dyn FnOnce(Result<Value, JsError>)>,
}

impl PromiseReaction {
    fn new<F>(handler: F) -> Self
    where
        F: FnOnce(Result<Value, JsError>) + 'static,
    {
        Self {
            handler: Box::new(handler),
        }
    }
}

impl fmt::Debug for PromiseReaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PromiseReaction {{ ... }}")
    }
}

struct PromiseInner {
    id: u64,
    state: PromiseState,
    reactions: Vec<PromiseReaction>,
}

/// A promise.
///
/// Cloning a `Promise` yields another handle to the same settlement; the
/// producer keeps one handle to settle it while observers hold others.
///
/// # Examples
///
/// ```
/// use async_runtime::{EventLoop, Promise, PromiseState};
/// use core_types::Value;
///
/// let event_loop = EventLoop::new();
/// let promise = Promise::new(&event_loop.handle());
/// assert!(promise.is_pending());
///
/// assert!(promise.resolve(Value::Smi(42)));
/// assert!(!promise.resolve(Value::Smi(100)));
/// assert_eq!(promise.state(), PromiseState::Fulfilled(Value::Smi(42)));
/// ```
#[derive(Clone)]
pub struct Promise {
    inner: Rc<RefCell<PromiseInner>>,
    handle: LoopHandle,
}

impl Promise {
    /// Creates a new pending Promise whose reactions run on `handle`'s loop.
    pub fn new(handle: &LoopHandle) -> Self {
        Self {
            inner: Rc::new(RefCell::new(PromiseInner {
                id: NEXT_PROMISE_ID.fetch_add(1, Ordering::Relaxed),
                state: PromiseState::Pending,
                reactions: Vec::new(),
            })),
            handle: handle.clone(),
        }
    }

    /// Creates a Promise already fulfilled with `value`.
    pub fn resolved(handle: &LoopHandle, value: Value) -> Self {
        let promise = Self::new(handle);
        promise.resolve(value);
        promise
    }

    /// Creates a Promise already rejected with `error`.
    pub fn rejected(handle: &LoopHandle, error: JsError) -> Self {
        let promise = Self::new(handle);
        promise.reject(error);
        promise
    }

    /// Unique identifier, stable across clones.
    pub fn id(&self) -> u64 {
        self.inner.borrow().id
    }

    /// Resolves the Promise with a value.
    ///
    /// Returns `false` and leaves the promise untouched if it had already
    /// settled.
    pub fn resolve(&self, value: Value) -> bool {
        self.settle(PromiseState::Fulfilled(value))
    }

    /// Rejects the Promise with an error.
    ///
    /// Returns `false` and leaves the promise untouched if it had already
    /// settled.
    pub fn reject(&self, error: JsError) -> bool {
        self.settle(PromiseState::Rejected(error))
    }

    /// Registers a one-shot observer for the settlement.
    ///
    /// The observer runs as a microtask: after settlement, or on the current
    /// loop pass if the promise has already settled. It is never invoked on
    /// the caller's stack.
    pub fn observe<F>(&self, observer: F)
    where
        F: FnOnce(Result<Value, JsError>) + 'static,
    {
        let reaction = PromiseReaction::new(observer);
        let outcome = {
            let mut inner = self.inner.borrow_mut();
            match inner.state.outcome() {
                Some(outcome) => outcome,
                None => {
                    inner.reactions.push(reaction);
                    return;
                }
            }
        };
        self.schedule(reaction, outcome);
    }

    /// Adds handlers for fulfillment and rejection.
    ///
    /// Returns a new Promise settled with whatever the invoked handler
    /// returns.
    pub fn then<F, R>(&self, on_fulfilled: F, on_rejected: R) -> Promise
    where
        F: FnOnce(Value) -> Result<Value, JsError> + 'static,
        R: FnOnce(JsError) -> Result<Value, JsError> + 'static,
    {
        let chained = Promise::new(&self.handle);
        let target = chained.clone();
        self.observe(move |outcome| {
            let next = match outcome {
                Ok(value) => on_fulfilled(value),
                Err(error) => on_rejected(error),
            };
            match next {
                Ok(value) => target.resolve(value),
                Err(error) => target.reject(error),
            };
        });
        chained
    }

    /// Current state.
    pub fn state(&self) -> PromiseState {
        self.inner.borrow().state.clone()
    }

    /// Checks if the promise is still pending.
    pub fn is_pending(&self) -> bool {
        matches!(self.inner.borrow().state, PromiseState::Pending)
    }

    /// Checks if the promise is fulfilled.
    pub fn is_fulfilled(&self) -> bool {
        matches!(self.inner.borrow().state, PromiseState::Fulfilled(_))
    }

    /// Checks if the promise is rejected.
    pub fn is_rejected(&self) -> bool {
        matches!(self.inner.borrow().state, PromiseState::Rejected(_))
    }

    /// The fulfilled value, if fulfilled.
    pub fn value(&self) -> Option<Value> {
        match &self.inner.borrow().state {
            PromiseState::Fulfilled(value) => Some(value.clone()),
            _ => None,
        }
    }

    /// The rejection error, if rejected.
    pub fn error(&self) -> Option<JsError> {
        match &self.inner.borrow().state {
            PromiseState::Rejected(error) => Some(error.clone()),
            _ => None,
        }
    }

    /// Number of reactions still waiting for settlement.
    pub fn pending_reactions(&self) -> usize {
        self.inner.borrow().reactions.len()
    }

    /// Wraps this promise as a [`Value`] so a coroutine can suspend on it.
    pub fn into_value(self) -> Value {
        Value::NativeObject(Rc::new(RefCell::new(self)) as Rc<RefCell<dyn Any>>)
    }

    fn settle(&self, state: PromiseState) -> bool {
        let (outcome, reactions) = {
            let mut inner = self.inner.borrow_mut();
            if !matches!(inner.state, PromiseState::Pending) {
                warn!("promise {} already settled; ignoring second settlement", inner.id);
                return false;
            }
            let outcome = state.outcome();
            inner.state = state;
            (outcome, std::mem::take(&mut inner.reactions))
        };
        if let Some(outcome) = outcome {
            for reaction in reactions {
                self.schedule(reaction, outcome.clone());
            }
        }
        true
    }

    fn schedule(&self, reaction: PromiseReaction, outcome: Result<Value, JsError>) {
        self.handle.queue_microtask(move || {
            (reaction.handler)(outcome);
            Ok(())
        });
    }
}

impl fmt::Debug for Promise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Promise")
            .field("id", &inner.id)
            .field("state", &inner.state)
            .field("reactions", &inner.reactions.len())
            .finish()
    }
}

impl From<Promise> for Value {
    fn from(promise: Promise) -> Self {
        promise.into_value()
    }
}

/// Returns the promise wrapped in `value`, if it holds one.
///
/// This is the only awaitability test the task driver applies: a value is
/// awaitable exactly when it wraps this crate's [`Promise`]. Other native
/// objects, however promise-like, are not.
pub fn as_promise(value: &Value) -> Option<Promise> {
    match value {
        Value::NativeObject(obj) => {
            let promise = obj.borrow().downcast_ref::<Promise>().cloned();
            promise
        }
        _ => None,
    }
}

/// Checks if a Value wraps a Promise.
pub fn is_promise(value: &Value) -> bool {
    match value {
        Value::NativeObject(obj) => obj.borrow().is::<Promise>(),
        _ => false,
    }
}
