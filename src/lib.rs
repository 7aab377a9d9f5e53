//! # Inquest
//!
//! A declarative schema engine for configuration data. A tree of schema nodes
//! normalizes, validates and optionally casts an input value, and reports
//! every violation with a path-qualified message instead of stopping at the
//! first one.
//!
//! ## Overview
//!
//! Every node runs the same ordered stages: completion of absent values,
//! the `before` hook, its own checks, a deprecation warning, then casting and
//! assertions. Stages report into a shared [`Context`]; soft errors are
//! accumulated into a `stillwater::Validation`, while a failed cast into a
//! structured type aborts the run with a [`CastingError`].
//!
//! ## Core Types
//!
//! - [`Schema`]: Entry point for creating schema nodes
//! - [`Configure`]: Builder methods shared by every node (`required`, `default`, `assert`, ...)
//! - [`Processor`]: Runs a schema over a document
//! - [`Message`]: A single error or warning with its path and parameters
//! - [`ValidationErrors`]: A non-empty collection of error messages
//! - [`TypeRegistry`]: Cast targets for structured types
//!
//! ## Example
//!
//! ```rust
//! use inquest::{Configure, Processor, Schema};
//! use serde_json::json;
//!
//! let schema = Schema::structure()
//!     .field("host", Schema::string().required())
//!     .field("port", Schema::int().min(1).max(65535).default(json!(80)))
//!     .field("timeout", Schema::of_type("int|float").unwrap().cast_to("float"));
//!
//! let processed = Processor::new()
//!     .process(&schema, json!({"host": "example.org", "timeout": 5}))
//!     .unwrap();
//! assert_eq!(
//!     processed.value.unwrap(),
//!     json!({"host": "example.org", "port": 80, "timeout": 5.0})
//! );
//!
//! // All problems are reported at once.
//! let err = Processor::new()
//!     .process(&schema, json!({"port": 0, "timeout": "soon"}))
//!     .unwrap_err();
//! assert_eq!(err.validation().unwrap().len(), 3);
//! ```

pub mod cast;
pub mod context;
pub mod error;
pub mod item;
pub mod path;
pub mod processor;
pub mod range;
pub mod reflect;
pub mod registry;
pub mod schema;
pub mod types;

pub use cast::{coerce, CastMode, CastTarget, ScalarTarget};
pub use context::Context;
pub use error::{
    CastingError, ErrorKind, Message, Param, Params, ProcessError, ReflectionError,
    ValidationErrors,
};
pub use item::{AssignFields, Attributes, Instance, Item};
pub use path::{Path, PathSegment};
pub use processor::{Processed, Processor};
pub use range::{check_range, Bound, Range};
pub use reflect::{Assignable, Blueprint, PartialInstance, TypeDescriptor};
pub use registry::{RegistryError, TypeEntry, TypeRegistry};
pub use schema::{
    Alternative, AnyOfSchema, Base, CollectionSchema, Configure, Schema, SchemaLike,
    StructureSchema, TypeSchema,
};
pub use types::{check_type, BuiltinType, TypeAlternative, TypeExpr, TypeExprError};

/// Type alias for validation results using ValidationErrors
pub type ValidationResult<T> = stillwater::Validation<T, ValidationErrors>;
