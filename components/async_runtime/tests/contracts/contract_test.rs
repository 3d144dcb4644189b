//! Contract tests for async_runtime component
//!
//! These tests pin down the observable contract of `run_task`: when the task
//! promise settles, with what, and what the coroutine sees along the way.

use async_runtime::{
    run_task, CoroutineInstance, CoroutineState, EventLoop, GeneratorProgram, LoopHandle,
    Promise, PromiseState, Resume, Suspension,
};
use core_types::{ErrorKind, JsError, Value};
use std::cell::RefCell;
use std::rc::Rc;

/// Records every value or failure injected into a program.
type Trace = Rc<RefCell<Vec<String>>>;

fn resolved(handle: &LoopHandle, n: i32) -> Promise {
    Promise::resolved(handle, Value::Smi(n))
}

mod settlement_contract {
    use super::*;

    #[test]
    fn program_without_suspension_resolves_asynchronously() {
        let mut event_loop = EventLoop::new();
        let program = GeneratorProgram::new(|_co| async move { Ok(Value::from("value")) });

        let task = run_task(&event_loop.handle(), &program);
        assert_eq!(task.state(), PromiseState::Pending);

        event_loop.run_until_done().unwrap();
        assert_eq!(task.state(), PromiseState::Fulfilled(Value::from("value")));
    }

    #[test]
    fn failure_before_first_suspension_rejects_asynchronously() {
        let mut event_loop = EventLoop::new();
        let program = GeneratorProgram::new(|_co| async move {
            Err(JsError::program_failure("before any await"))
        });

        let task = run_task(&event_loop.handle(), &program);
        assert!(task.is_pending());

        event_loop.run_until_done().unwrap();
        let error = task.error().unwrap();
        assert_eq!(error.kind, ErrorKind::ProgramFailure);
        assert_eq!(error.message, "before any await");
    }

    #[test]
    fn observers_attached_after_run_task_see_the_outcome() {
        let mut event_loop = EventLoop::new();
        let program = GeneratorProgram::new(|_co| async move { Ok(Value::Smi(1)) });
        let task = run_task(&event_loop.handle(), &program);

        let seen = Rc::new(RefCell::new(Vec::new()));
        for _ in 0..2 {
            let s = Rc::clone(&seen);
            task.observe(move |outcome| s.borrow_mut().push(outcome));
        }
        event_loop.run_until_done().unwrap();

        assert_eq!(*seen.borrow(), vec![Ok(Value::Smi(1)), Ok(Value::Smi(1))]);
    }
}

mod suspension_contract {
    use super::*;

    #[test]
    fn three_resolved_futures_are_summed() {
        let mut event_loop = EventLoop::new();
        let handle = event_loop.handle();
        let h = handle.clone();
        let program = GeneratorProgram::new(move |co| {
            let h = h.clone();
            async move {
                let a = co.suspend(resolved(&h, 1)).await?;
                let b = co.suspend(resolved(&h, 2)).await?;
                let c = co.suspend(resolved(&h, 3)).await?;
                let sum = [a, b, c].iter().filter_map(Value::as_number).sum::<f64>();
                Ok(Value::Smi(sum as i32))
            }
        });

        let task = run_task(&handle, &program);
        event_loop.run_until_done().unwrap();
        assert_eq!(task.value(), Some(Value::Smi(6)));
    }

    #[test]
    fn values_are_injected_in_suspension_order() {
        let mut event_loop = EventLoop::new();
        let handle = event_loop.handle();
        let trace: Trace = Rc::new(RefCell::new(Vec::new()));

        // settled out of order on purpose
        let gates: Vec<Promise> = (0..3).map(|_| Promise::new(&handle)).collect();
        let (t, g) = (Rc::clone(&trace), gates.clone());
        let program = GeneratorProgram::new(move |co| {
            let (t, g) = (Rc::clone(&t), g.clone());
            async move {
                for gate in g {
                    let v = co.suspend(gate).await?;
                    t.borrow_mut().push(v.to_string());
                }
                Ok(Value::Undefined)
            }
        });

        let task = run_task(&handle, &program);
        gates[2].resolve(Value::from("c"));
        gates[1].resolve(Value::from("b"));
        gates[0].resolve(Value::from("a"));
        event_loop.run_until_done().unwrap();

        assert!(task.is_fulfilled());
        assert_eq!(*trace.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn rejection_stops_the_chain() {
        let mut event_loop = EventLoop::new();
        let handle = event_loop.handle();
        let trace: Trace = Rc::new(RefCell::new(Vec::new()));
        let (h, t) = (handle.clone(), Rc::clone(&trace));
        let program = GeneratorProgram::new(move |co| {
            let (h, t) = (h.clone(), Rc::clone(&t));
            async move {
                co.suspend(resolved(&h, 1)).await?;
                t.borrow_mut().push("first".to_string());
                co.suspend(Promise::rejected(&h, JsError::program_failure("boom")))
                    .await?;
                t.borrow_mut().push("second".to_string());
                co.suspend(resolved(&h, 3)).await?;
                t.borrow_mut().push("third".to_string());
                Ok(Value::Undefined)
            }
        });

        let task = run_task(&handle, &program);
        event_loop.run_until_done().unwrap();

        assert_eq!(
            task.state(),
            PromiseState::Rejected(JsError::program_failure("boom"))
        );
        assert_eq!(*trace.borrow(), vec!["first"]);
    }

    #[test]
    fn caught_rejection_lets_the_program_continue() {
        let mut event_loop = EventLoop::new();
        let handle = event_loop.handle();
        let h = handle.clone();
        let program = GeneratorProgram::new(move |co| {
            let h = h.clone();
            async move {
                let fallback = match co
                    .suspend(Promise::rejected(&h, JsError::program_failure("boom")))
                    .await
                {
                    Ok(v) => v,
                    Err(_) => Value::Smi(0),
                };
                let next = co.suspend(resolved(&h, 5)).await?;
                Ok(Value::from(vec![fallback, next]))
            }
        });

        let task = run_task(&handle, &program);
        event_loop.run_until_done().unwrap();
        assert_eq!(
            task.value(),
            Some(Value::from(vec![Value::Smi(0), Value::Smi(5)]))
        );
    }

    #[test]
    fn plain_value_rejects_with_not_awaitable() {
        let mut event_loop = EventLoop::new();
        let program = GeneratorProgram::new(|co| async move {
            co.suspend(Value::Smi(42)).await?;
            Ok(Value::from("unreachable"))
        });

        let task = run_task(&event_loop.handle(), &program);
        event_loop.run_until_done().unwrap();
        assert_eq!(task.error().map(|e| e.kind), Some(ErrorKind::NotAwaitable));
    }
}

mod lifecycle_contract {
    use super::*;

    #[test]
    fn resuming_terminal_instance_is_invalid_and_leaves_task_alone() {
        let mut event_loop = EventLoop::new();
        let program = || {
            |_: Resume| -> Result<Suspension, JsError> { Ok(Suspension::Done(Value::Smi(1))) }
        };

        let task = run_task(&event_loop.handle(), &program);
        event_loop.run_until_done().unwrap();
        assert_eq!(task.value(), Some(Value::Smi(1)));

        let mut instance = CoroutineInstance::new(&program);
        instance.start().unwrap();
        assert_eq!(instance.state(), CoroutineState::Completed);
        let error = instance.resume_with_value(Value::Smi(2)).unwrap_err();
        assert_eq!(error.kind, ErrorKind::InvalidState);

        assert!(!task.resolve(Value::Smi(2)));
        assert!(!task.reject(error));
        assert_eq!(task.value(), Some(Value::Smi(1)));
    }

    #[test]
    fn runs_of_the_same_program_are_independent() {
        let mut event_loop = EventLoop::new();
        let handle = event_loop.handle();
        let first_gate = Promise::new(&handle);
        let second_gate = Promise::new(&handle);
        let gates = Rc::new(RefCell::new(vec![second_gate.clone(), first_gate.clone()]));

        let g = Rc::clone(&gates);
        let program = GeneratorProgram::new(move |co| {
            let gate = g.borrow_mut().pop();
            async move {
                let gate = gate.ok_or_else(|| JsError::program_failure("no gate"))?;
                let v = co.suspend(gate).await?;
                Ok(Value::from(vec![v]))
            }
        });

        let first = run_task(&handle, &program);
        let second = run_task(&handle, &program);
        event_loop.run_until_done().unwrap();

        second_gate.resolve(Value::from("second"));
        event_loop.run_until_done().unwrap();
        assert!(first.is_pending());
        assert_eq!(second.value(), Some(Value::from(vec![Value::from("second")])));

        first_gate.reject(JsError::program_failure("first failed"));
        event_loop.run_until_done().unwrap();
        assert_eq!(
            first.error(),
            Some(JsError::program_failure("first failed"))
        );
        assert_eq!(second.value(), Some(Value::from(vec![Value::from("second")])));
    }
}
