//! End-to-End CLI Integration Tests
//!
//! Tests the complete task runner through the task_cli Runtime API.
//! This is the highest level integration test - scenario name to final result.

use async_runtime::LoopConfig;
use core_types::Value;
use task_cli::{CliError, Runtime, Scenario};

/// Test: the canonical collect scenario
#[test]
fn test_e2e_collect() {
    let mut runtime = Runtime::new();
    let result = runtime.run_named("collect").expect("Execution failed");

    match result {
        Value::Array(items) => assert_eq!(items, vec![Value::Smi(1), Value::Smi(2), Value::Smi(3)]),
        _ => panic!("Expected array, got {:?}", result),
    }
}

/// Test: rejection is reported as a JS error, not a loop error
#[test]
fn test_e2e_reject() {
    let mut runtime = Runtime::new();
    match runtime.run_named("reject") {
        Err(CliError::Js(e)) => assert_eq!(e.to_string(), "ProgramFailure: boom"),
        other => panic!("Expected rejection, got {:?}", other),
    }
}

/// Test: a bounded loop still completes short scenarios
#[test]
fn test_e2e_turn_limit_large_enough() {
    let mut runtime = Runtime::new()
        .with_config(LoopConfig::default().with_turn_limit(1_000))
        .with_steps(10);
    let result = runtime.run_scenario(Scenario::Chain).expect("Execution failed");
    assert_eq!(result, Value::Smi(10));
    assert!(runtime.turns() <= 1_000);
}

/// Test: scenarios share one runtime without interfering
#[test]
fn test_e2e_sequential_scenarios() {
    let mut runtime = Runtime::new();
    let results: Vec<_> = ["sum", "immediate", "recover"]
        .iter()
        .map(|name| runtime.run_named(name).expect("Execution failed"))
        .collect();

    assert_eq!(results[0], Value::Smi(6));
    assert_eq!(results[1], Value::from("done"));
    assert_eq!(
        results[2],
        Value::from(vec![Value::from("recovered from boom"), Value::Smi(2)])
    );
}
