//! Tests for sharing schemas, processors and registries across threads.

use inquest::{Configure, Processor, Schema, TypeDescriptor};
use serde_json::json;
use std::sync::Arc;
use std::thread;

#[derive(Default)]
struct Worker {
    id: u64,
}

#[test]
fn test_concurrent_processing() {
    let schema = Arc::new(
        Schema::structure()
            .field("name", Schema::string().required())
            .field("age", Schema::int().min(0)),
    );
    let processor = Arc::new(Processor::new());

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let schema = Arc::clone(&schema);
            let processor = Arc::clone(&processor);
            thread::spawn(move || {
                let result = processor
                    .validate(&*schema, json!({"name": format!("User{}", i), "age": 20 + i}))
                    .unwrap();
                assert!(result.is_success());
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_runs_do_not_share_errors() {
    let schema = Arc::new(Schema::structure().field("age", Schema::int().min(0)));
    let processor = Arc::new(Processor::new());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let schema = Arc::clone(&schema);
            let processor = Arc::clone(&processor);
            thread::spawn(move || {
                let age = if i % 2 == 0 { json!(-1) } else { json!(i) };
                let result = processor.validate(&*schema, json!({"age": age})).unwrap();
                match result.into_result() {
                    Ok(_) => assert_eq!(i % 2, 1),
                    Err(errors) => {
                        assert_eq!(i % 2, 0);
                        assert_eq!(errors.len(), 1);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_concurrent_registration() {
    let processor = Processor::new();

    let handles: Vec<_> = (0..5)
        .map(|i| {
            let registry = processor.registry().clone();
            thread::spawn(move || {
                registry
                    .register(
                        TypeDescriptor::new(format!("Worker{}", i), Worker::default)
                            .field("id", |w: &mut Worker, id: u64| w.id = id),
                    )
                    .unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    for i in 0..5 {
        assert!(processor.registry().contains(&format!("Worker{}", i)));
    }

    let schema = Schema::structure()
        .field("id", Schema::int())
        .cast_to_reflected("Worker3");
    let processed = processor.process(&schema, json!({"id": 7})).unwrap();
    assert_eq!(processed.value.unwrap().downcast_ref::<Worker>().unwrap().id, 7);
}

#[cfg(feature = "parallel")]
#[test]
fn test_process_batch_keeps_input_order() {
    let schema = Schema::structure().field("port", Schema::int().min(1).max(65535));
    let documents: Vec<_> = (0..50)
        .map(|i: usize| {
            let port = if i == 17 { 0 } else { 1000 + i };
            json!({ "port": port })
        })
        .collect();

    let results = Processor::new().process_batch(&schema, documents);
    assert_eq!(results.len(), 50);
    for (i, result) in results.into_iter().enumerate() {
        match result {
            Ok(processed) => assert_eq!(processed.value.unwrap(), json!({"port": 1000 + i})),
            Err(err) => {
                assert_eq!(i, 17);
                assert_eq!(err.validation().unwrap().len(), 1);
            }
        }
    }
}
