//! Integration tests for alternatives.

use inquest::{Configure, ErrorKind, Processor, Schema, ValidationErrors};
use serde_json::json;

/// Helper to extract the error value from a Validation
fn unwrap_failure<T>(v: stillwater::Validation<T, ValidationErrors>) -> ValidationErrors
where
    T: std::fmt::Debug,
{
    v.into_result().unwrap_err()
}

#[test]
fn test_literal_alternatives() {
    let schema = Schema::any_of().value("debug").value("info").value("warn");
    let processor = Processor::new();

    assert!(processor.validate(&schema, json!("info")).unwrap().is_success());

    let errors = unwrap_failure(processor.validate(&schema, json!("trace")).unwrap());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first().kind, ErrorKind::TypeMismatch);
    assert_eq!(
        errors.first().render(),
        "The item expects to be 'debug'|'info'|'warn', 'trace' given."
    );
}

#[test]
fn test_schema_alternatives_keep_the_winning_value() {
    let schema = Schema::any_of()
        .schema(Schema::string().cast_to("int"))
        .schema(Schema::list_of(Schema::int()));
    let processor = Processor::new();

    let processed = processor.process(&schema, json!("15")).unwrap();
    assert_eq!(processed.value.unwrap(), json!(15));

    let processed = processor.process(&schema, json!([1, 2])).unwrap();
    assert_eq!(processed.value.unwrap(), json!([1, 2]));
}

#[test]
fn test_nested_errors_win_over_type_mismatch() {
    let schema = Schema::any_of()
        .value(false)
        .schema(Schema::structure().field("port", Schema::int().required()));

    let errors = unwrap_failure(Processor::new().validate(&schema, json!({})).unwrap());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first().render(), "The mandatory item 'port' is missing.");
}

#[test]
fn test_any_of_inside_structure() {
    let schema = Schema::structure().field(
        "listen",
        Schema::any_of().schema(Schema::int()).schema(Schema::string()).required(),
    );

    let errors = unwrap_failure(
        Processor::new()
            .validate(&schema, json!({"listen": [80]}))
            .unwrap(),
    );
    assert_eq!(
        errors.first().render(),
        "The item 'listen' expects to be int|string, array given."
    );
}

#[test]
fn test_nullable_and_first_is_default() {
    let schema = Schema::structure().field(
        "mode",
        Schema::any_of().value("fast").value("safe").first_is_default().nullable(),
    );
    let processor = Processor::new();

    let processed = processor.process(&schema, json!({})).unwrap();
    assert_eq!(processed.value.unwrap(), json!({"mode": "fast"}));

    let processed = processor.process(&schema, json!({"mode": null})).unwrap();
    assert_eq!(processed.value.unwrap(), json!({"mode": null}));
}

#[test]
fn test_assertions_on_any_of_run_after_match() {
    let schema = Schema::any_of()
        .schema(Schema::int())
        .schema(Schema::string())
        .assert_described(|item: &inquest::Item| item.as_str() != Some(""), "not empty");

    let errors = unwrap_failure(Processor::new().validate(&schema, json!("")).unwrap());
    assert_eq!(errors.first().kind, ErrorKind::FailedAssertion);
}

#[test]
fn test_empty_alternatives_reject_everything() {
    let schema = Schema::structure().field("mode", Schema::any_of());
    let errors = unwrap_failure(
        Processor::new()
            .validate(&schema, json!({"mode": "fast"}))
            .unwrap(),
    );
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors.first().render(),
        "The item 'mode' expects to be nothing, 'fast' given."
    );
}
