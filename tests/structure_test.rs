//! Integration tests for structure schemas.

use inquest::{Configure, ErrorKind, Path, PathSegment, Processor, Schema, ValidationErrors};
use serde_json::json;

/// Helper to extract the error value from a Validation
fn unwrap_failure<T>(v: stillwater::Validation<T, ValidationErrors>) -> ValidationErrors
where
    T: std::fmt::Debug,
{
    v.into_result().unwrap_err()
}

fn path(keys: &[&str]) -> String {
    Path::from_segments(keys.iter().map(|k| PathSegment::key(*k))).to_string()
}

fn database() -> inquest::StructureSchema {
    Schema::structure()
        .field("host", Schema::string().required())
        .field("port", Schema::int().min(1).max(65535).default(5432))
        .field("options", Schema::map_of(Schema::of_type("scalar").unwrap()))
}

#[test]
fn test_valid_structure() {
    let schema = Schema::structure().field("database", database());
    let processed = Processor::new()
        .process(
            &schema,
            json!({"database": {"host": "db", "options": {"sslmode": "require"}}}),
        )
        .unwrap();
    assert_eq!(
        processed.value.unwrap(),
        json!({"database": {"host": "db", "port": 5432, "options": {"sslmode": "require"}}})
    );
}

#[test]
fn test_all_errors_are_accumulated_with_paths() {
    let schema = Schema::structure().field("database", database());
    let errors = unwrap_failure(
        Processor::new()
            .validate(
                &schema,
                json!({"database": {"port": 0, "options": {"pool": [1]}, "user": "x"}}),
            )
            .unwrap(),
    );

    let rendered: Vec<(String, ErrorKind)> = errors
        .iter()
        .map(|e| (e.path.to_string(), e.kind))
        .collect();
    assert_eq!(
        rendered,
        vec![
            (path(&["database", "host"]), ErrorKind::MissingItem),
            (path(&["database", "port"]), ErrorKind::ValueOutOfRange),
            (path(&["database", "options", "pool"]), ErrorKind::TypeMismatch),
            (path(&["database", "user"]), ErrorKind::UnexpectedItem),
        ]
    );
}

#[test]
fn test_nested_path_rendering() {
    let schema = Schema::structure().field("database", database());
    let errors = unwrap_failure(
        Processor::new()
            .validate(&schema, json!({"database": {"host": 1}}))
            .unwrap(),
    );
    assert_eq!(
        errors.first().render(),
        "The item 'database\u{a0}›\u{a0}host' expects to be string, 1 given."
    );
}

#[test]
fn test_other_items_schema() {
    let schema = Schema::structure()
        .field("name", Schema::string())
        .other_items(Schema::int());

    let processed = Processor::new()
        .process(&schema, json!({"name": "n", "a": 1, "b": 2}))
        .unwrap();
    assert_eq!(processed.value.unwrap(), json!({"name": "n", "a": 1, "b": 2}));

    let errors = unwrap_failure(
        Processor::new()
            .validate(&schema, json!({"name": "n", "a": "1"}))
            .unwrap(),
    );
    assert_eq!(errors.first().path.to_string(), "a");
    assert_eq!(errors.first().kind, ErrorKind::TypeMismatch);
}

#[test]
fn test_explicit_default_replaces_completion() {
    let schema = Schema::structure().field(
        "limits",
        Schema::structure()
            .field("max", Schema::int().default(10))
            .default(json!({"max": 99})),
    );
    let processed = Processor::new().process(&schema, json!({})).unwrap();
    assert_eq!(processed.value.unwrap(), json!({"limits": {"max": 99}}));
}

#[test]
fn test_structure_rejects_non_mapping() {
    let errors = unwrap_failure(
        Processor::new()
            .validate(&database(), json!("postgres://db"))
            .unwrap(),
    );
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors.first().render(),
        "The item expects to be object, 'postgres://db' given."
    );
}
