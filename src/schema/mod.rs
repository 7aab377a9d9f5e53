//! Schema definitions.
//!
//! This module provides the schema node types. Every node runs the same stage
//! pipeline (see [`Base`]) around its own validation step, and every node is
//! configured through the [`Configure`] trait.
//!
//! # Example
//!
//! ```rust
//! use inquest::{Configure, Processor, Schema};
//! use serde_json::json;
//!
//! let schema = Schema::structure()
//!     .field("name", Schema::string().min(1).required())
//!     .field("tags", Schema::list_of(Schema::string()).default(json!([])));
//!
//! let processed = Processor::new().process(&schema, json!({"name": "api"})).unwrap();
//! assert_eq!(processed.value.unwrap(), json!({"name": "api", "tags": []}));
//! ```

mod any_of;
mod base;
mod collection;
mod scalar;
mod structure;
mod traits;

pub use any_of::{Alternative, AnyOfSchema};
pub use base::{Base, Configure};
pub use collection::CollectionSchema;
pub use scalar::TypeSchema;
pub use structure::StructureSchema;
pub use traits::SchemaLike;

use crate::types::{BuiltinType, TypeExpr, TypeExprError};

/// Entry point for creating schemas.
///
/// # Example
///
/// ```rust
/// use inquest::Schema;
///
/// let port = Schema::of_type("int:1..65535").unwrap();
/// let host = Schema::string().pattern(r"[a-z0-9.-]+").unwrap();
///
/// assert!(Schema::of_type("integer|text").is_err());
/// ```
pub struct Schema;

impl Schema {
    /// Creates a leaf schema from a type expression such as `int|string:1..`.
    ///
    /// # Errors
    ///
    /// Returns `TypeExprError` if the expression names an unknown type or has
    /// a malformed range qualifier.
    pub fn of_type(expr: &str) -> Result<TypeSchema, TypeExprError> {
        Ok(TypeSchema::new(TypeExpr::parse(expr)?))
    }

    /// Creates a leaf schema expecting an integer.
    pub fn int() -> TypeSchema {
        Self::builtin(BuiltinType::Int)
    }

    /// Creates a leaf schema expecting a floating point number.
    pub fn float() -> TypeSchema {
        Self::builtin(BuiltinType::Float)
    }

    /// Creates a leaf schema expecting a string; lengths count bytes.
    pub fn string() -> TypeSchema {
        Self::builtin(BuiltinType::String)
    }

    /// Creates a leaf schema expecting a string; lengths count code points.
    pub fn unicode() -> TypeSchema {
        Self::builtin(BuiltinType::Unicode)
    }

    /// Creates a leaf schema expecting a boolean.
    pub fn bool() -> TypeSchema {
        Self::builtin(BuiltinType::Bool)
    }

    fn builtin(ty: BuiltinType) -> TypeSchema {
        TypeSchema::new(TypeExpr::of(ty))
    }

    /// Creates a structure with no fields.
    pub fn structure() -> StructureSchema {
        StructureSchema::new()
    }

    /// Creates a schema for a list whose elements match `item`.
    pub fn list_of<S>(item: S) -> CollectionSchema
    where
        S: SchemaLike + 'static,
    {
        CollectionSchema::list_of(item)
    }

    /// Creates a schema for a map whose values match `item`.
    pub fn map_of<S>(item: S) -> CollectionSchema
    where
        S: SchemaLike + 'static,
    {
        CollectionSchema::map_of(item)
    }

    /// Creates a schema accepting any of several alternatives.
    pub fn any_of() -> AnyOfSchema {
        AnyOfSchema::new()
    }
}
