//! Integration tests for Path.

use inquest::{Context, ErrorKind, Params, Path, PathSegment, TypeRegistry};

const SEP: &str = "\u{a0}›\u{a0}";

#[test]
fn test_path_construction_and_display() {
    // Root path
    assert_eq!(Path::root().to_string(), "");
    assert!(Path::root().is_root());

    // Nested path
    let mut path = Path::root();
    path.push_key("servers");
    path.push_index(0);
    path.push_key("port");
    assert_eq!(path.to_string(), format!("servers{SEP}0{SEP}port"));
    assert_eq!(path.len(), 3);
}

#[test]
fn test_pop_returns_segments_in_reverse() {
    let mut path = Path::from_segments([
        PathSegment::key("data"),
        PathSegment::index(42),
        PathSegment::key("value"),
    ]);

    match path.pop() {
        Some(PathSegment::Key(name)) => assert_eq!(name, "value"),
        other => panic!("Expected Key segment, got {:?}", other),
    }

    match path.pop() {
        Some(PathSegment::Index(idx)) => assert_eq!(idx, 42),
        other => panic!("Expected Index segment, got {:?}", other),
    }

    assert_eq!(path.to_string(), "data");
}

#[test]
fn test_paths_compare_by_segments() {
    let mut built = Path::root();
    built.push_key("items");
    built.push_index(1);

    assert_eq!(
        built,
        Path::from_segments([PathSegment::key("items"), PathSegment::index(1)])
    );
    assert_ne!(
        built,
        Path::from_segments([PathSegment::key("items"), PathSegment::key("1")])
    );
    assert_eq!(built.to_string(), format!("items{SEP}1"));
}

#[test]
fn test_context_pushes_and_pops_around_children() {
    let mut ctx = Context::new(TypeRegistry::new());
    ctx.within(PathSegment::key("a"), |ctx| {
        ctx.within(PathSegment::index(2), |ctx| {
            ctx.add_error("deep %path%", ErrorKind::TypeMismatch, Params::new());
        });
        ctx.add_error("shallow %path%", ErrorKind::TypeMismatch, Params::new());
    });

    assert!(ctx.path().is_root());
    let rendered: Vec<String> = ctx.errors().iter().map(|m| m.render()).collect();
    assert_eq!(
        rendered,
        vec![format!("deep 'a{SEP}2'"), "shallow 'a'".to_string()]
    );
}
