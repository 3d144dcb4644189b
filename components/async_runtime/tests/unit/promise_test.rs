//! Unit tests for Promise

use async_runtime::{as_promise, is_promise, EventLoop, Promise, PromiseState};
use core_types::{JsError, Value};
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn new_promise_is_pending() {
    let event_loop = EventLoop::new();
    let promise = Promise::new(&event_loop.handle());
    assert!(promise.is_pending());
    assert!(!promise.is_fulfilled());
    assert!(!promise.is_rejected());
}

#[test]
fn new_promise_has_no_reactions() {
    let event_loop = EventLoop::new();
    let promise = Promise::new(&event_loop.handle());
    assert_eq!(promise.pending_reactions(), 0);
}

#[test]
fn resolve_changes_state_to_fulfilled() {
    let event_loop = EventLoop::new();
    let promise = Promise::new(&event_loop.handle());
    assert!(promise.resolve(Value::Smi(42)));
    assert_eq!(promise.state(), PromiseState::Fulfilled(Value::Smi(42)));
}

#[test]
fn reject_changes_state_to_rejected() {
    let event_loop = EventLoop::new();
    let promise = Promise::new(&event_loop.handle());
    assert!(promise.reject(JsError::program_failure("test")));
    assert!(promise.is_rejected());
}

#[test]
fn cannot_resolve_already_fulfilled_promise() {
    let event_loop = EventLoop::new();
    let promise = Promise::resolved(&event_loop.handle(), Value::Smi(42));
    assert!(!promise.resolve(Value::Smi(100)));
    assert_eq!(promise.value(), Some(Value::Smi(42)));
}

#[test]
fn cannot_reject_already_fulfilled_promise() {
    let event_loop = EventLoop::new();
    let promise = Promise::resolved(&event_loop.handle(), Value::Smi(42));
    assert!(!promise.reject(JsError::program_failure("late")));
    assert!(promise.is_fulfilled());
}

#[test]
fn cannot_resolve_already_rejected_promise() {
    let event_loop = EventLoop::new();
    let promise = Promise::rejected(&event_loop.handle(), JsError::program_failure("first"));
    assert!(!promise.resolve(Value::Smi(1)));
    assert_eq!(promise.error(), Some(JsError::program_failure("first")));
}

#[test]
fn reactions_run_on_microtask_queue() {
    let mut event_loop = EventLoop::new();
    let promise = Promise::new(&event_loop.handle());
    let seen = Rc::new(RefCell::new(vec![]));

    let s = Rc::clone(&seen);
    promise.observe(move |outcome| s.borrow_mut().push(outcome));
    promise.resolve(Value::from("done"));

    assert!(seen.borrow().is_empty());
    assert!(!event_loop.is_microtask_queue_empty());

    event_loop.run_all_microtasks().unwrap();
    assert_eq!(*seen.borrow(), vec![Ok(Value::from("done"))]);
}

#[test]
fn observer_added_after_settlement_is_notified() {
    let mut event_loop = EventLoop::new();
    let promise = Promise::rejected(&event_loop.handle(), JsError::program_failure("boom"));
    let seen = Rc::new(RefCell::new(None));

    let s = Rc::clone(&seen);
    promise.observe(move |outcome| *s.borrow_mut() = Some(outcome));
    event_loop.run_until_done().unwrap();

    assert_eq!(*seen.borrow(), Some(Err(JsError::program_failure("boom"))));
}

#[test]
fn reactions_run_in_registration_order() {
    let mut event_loop = EventLoop::new();
    let promise = Promise::new(&event_loop.handle());
    let order = Rc::new(RefCell::new(vec![]));

    for i in 0..4 {
        let o = Rc::clone(&order);
        promise.observe(move |_| o.borrow_mut().push(i));
    }
    promise.resolve(Value::Null);
    event_loop.run_until_done().unwrap();

    assert_eq!(*order.borrow(), vec![0, 1, 2, 3]);
}

#[test]
fn then_handler_error_rejects_chained_promise() {
    let mut event_loop = EventLoop::new();
    let promise = Promise::resolved(&event_loop.handle(), Value::Smi(1));
    let chained = promise.then(|_| Err(JsError::program_failure("handler failed")), Err);

    event_loop.run_until_done().unwrap();
    assert_eq!(chained.error().map(|e| e.message), Some("handler failed".to_string()));
}

#[test]
fn promise_ids_are_unique() {
    let event_loop = EventLoop::new();
    let a = Promise::new(&event_loop.handle());
    let b = Promise::new(&event_loop.handle());
    assert_ne!(a.id(), b.id());
}

#[test]
fn promise_wrapped_as_value_is_detected() {
    let event_loop = EventLoop::new();
    let promise = Promise::new(&event_loop.handle());
    let value = promise.clone().into_value();

    assert!(is_promise(&value));
    assert_eq!(as_promise(&value).map(|p| p.id()), Some(promise.id()));
    assert!(!is_promise(&Value::from("promise")));
}
