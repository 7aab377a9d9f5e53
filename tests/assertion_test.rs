//! Integration tests for assertions in the finalization stage.

use inquest::{Configure, ErrorKind, Item, Processor, Schema, ValidationErrors};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Helper to extract the error value from a Validation
fn unwrap_failure<T>(v: stillwater::Validation<T, ValidationErrors>) -> ValidationErrors
where
    T: std::fmt::Debug,
{
    v.into_result().unwrap_err()
}

fn is_even(item: &Item) -> bool {
    item.as_i64().is_some_and(|n| n % 2 == 0)
}

fn is_power_of_two(item: &Item) -> bool {
    item.as_i64().is_some_and(|n| n > 0 && (n & (n - 1)) == 0)
}

#[test]
fn test_first_failure_stops_the_chain() {
    let second_calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&second_calls);
    let schema = Schema::int().assert(is_even).assert(move |_: &Item| {
        counter.fetch_add(1, Ordering::SeqCst);
        false
    });

    let errors = unwrap_failure(Processor::new().validate(&schema, json!(3)).unwrap());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first().kind, ErrorKind::FailedAssertion);
    assert_eq!(second_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_all_assertions_run_when_passing() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let schema = Schema::int()
        .assert(is_even)
        .assert(is_power_of_two)
        .assert(move |_: &Item| {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        });

    let processed = Processor::new().process(&schema, json!(8)).unwrap();
    assert_eq!(processed.value.unwrap(), json!(8));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_assertion_labels() {
    let processor = Processor::new();

    let named = Schema::int().assert(is_power_of_two);
    let errors = unwrap_failure(processor.validate(&named, json!(6)).unwrap());
    assert_eq!(
        errors.first().render(),
        "Failed assertion is_power_of_two() for item with value 6."
    );

    let described = Schema::int().assert_described(is_even, "Is even");
    let errors = unwrap_failure(processor.validate(&described, json!(7)).unwrap());
    assert_eq!(
        errors.first().render(),
        "Failed assertion 'Is even' for item with value 7."
    );

    let positional = Schema::int()
        .assert(|_: &Item| true)
        .assert(|_: &Item| true)
        .assert(|item: &Item| item.as_i64() != Some(0));
    let errors = unwrap_failure(processor.validate(&positional, json!(0)).unwrap());
    assert_eq!(
        errors.first().render(),
        "Failed assertion #2 for item with value 0."
    );
}

#[test]
fn test_failed_assertion_drops_the_value() {
    let schema = Schema::structure()
        .field("workers", Schema::int().assert(is_even))
        .field("name", Schema::string());

    let errors = unwrap_failure(
        Processor::new()
            .validate(&schema, json!({"workers": 3, "name": "api"}))
            .unwrap(),
    );
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors.first().render(),
        "Failed assertion is_even() for item 'workers' with value 3."
    );
}

#[test]
fn test_assertions_skipped_on_invalid_value() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let schema = Schema::int().max(5).assert(move |_: &Item| {
        counter.fetch_add(1, Ordering::SeqCst);
        true
    });

    let errors = unwrap_failure(Processor::new().validate(&schema, json!(9)).unwrap());
    assert_eq!(errors.first().kind, ErrorKind::ValueOutOfRange);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_assertion_on_structure_sees_children() {
    let schema = Schema::structure()
        .field("min", Schema::int())
        .field("max", Schema::int())
        .assert_described(
            |item: &Item| match (item.get("min"), item.get("max")) {
                (Some(min), Some(max)) => min.as_i64() <= max.as_i64(),
                _ => true,
            },
            "min <= max",
        );

    let processor = Processor::new();
    assert!(processor.process(&schema, json!({"min": 1, "max": 2})).is_ok());

    let errors = unwrap_failure(processor.validate(&schema, json!({"min": 3, "max": 2})).unwrap());
    assert_eq!(
        errors.first().render(),
        "Failed assertion 'min <= max' for item with value object."
    );
}

#[test]
fn test_assertion_runs_on_cast_value() {
    let schema = Schema::of_type("numericint")
        .unwrap()
        .cast_to("int")
        .assert_described(|item: &Item| item.as_i64().is_some(), "is an integer");

    let processed = Processor::new().process(&schema, json!("42")).unwrap();
    assert_eq!(processed.value.unwrap(), json!(42));
}
