//! Traits for schema polymorphism.
//!
//! This module provides the [`SchemaLike`] trait that lets the different node
//! types (typed leaves, structures, collections, alternatives) be nested in
//! one another.

use serde_json::Value;

use crate::context::Context;
use crate::error::CastingError;
use crate::item::Item;

/// A schema node that can process a value.
///
/// Soft problems are recorded in the [`Context`]; only a failed cast into a
/// structured type aborts the run with a [`CastingError`].
///
/// The `Send + Sync` bounds allow schemas to be shared across threads and
/// used in trait objects like `Box<dyn SchemaLike>`.
///
/// # Example
///
/// ```rust
/// use inquest::{Context, Schema, SchemaLike, TypeRegistry};
/// use serde_json::json;
///
/// let mut ctx = Context::new(TypeRegistry::new());
/// let item = Schema::string().validate(Some(json!(42)), &mut ctx).unwrap();
///
/// // The mismatch is recorded and the raw value is handed back.
/// assert_eq!(item.unwrap(), json!(42));
/// assert_eq!(ctx.errors().len(), 1);
/// ```
pub trait SchemaLike: Send + Sync {
    /// Processes `value`, which is `None` when the input is absent.
    ///
    /// Returns `Ok(None)` when the node contributes no value: a missing
    /// required item, an absent item without a default, or a failed
    /// assertion.
    fn validate(&self, value: Option<Value>, ctx: &mut Context) -> Result<Option<Item>, CastingError>;
}

impl<S: SchemaLike + ?Sized> SchemaLike for Box<S> {
    fn validate(&self, value: Option<Value>, ctx: &mut Context) -> Result<Option<Item>, CastingError> {
        (**self).validate(value, ctx)
    }
}
