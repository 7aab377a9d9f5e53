//! Homogeneous collection schemas.
//!
//! This module provides [`CollectionSchema`] for lists and maps whose every
//! element is processed by the same item schema.

use indexmap::IndexMap;
use serde_json::Value;

use crate::context::Context;
use crate::error::CastingError;
use crate::item::Item;
use crate::path::PathSegment;
use crate::range::{check_range, Bound, Range};
use crate::types::{check_type, BuiltinType, TypeExpr};

use super::base::{Base, Configure};
use super::traits::SchemaLike;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    List,
    Map,
}

/// A schema for lists or maps of uniformly shaped elements.
///
/// The element count is checked first; elements are only processed when the
/// count is in range. Each element is processed with its index (lists) or key
/// (maps) pushed on the path.
///
/// # Example
///
/// ```rust
/// use inquest::{Processor, Schema};
/// use serde_json::json;
///
/// let schema = Schema::list_of(Schema::string()).min(1);
/// let processor = Processor::new();
///
/// assert!(processor.validate(&schema, json!(["a", "b"])).unwrap().is_success());
/// assert!(processor.validate(&schema, json!([])).unwrap().is_failure());
///
/// let errors = processor
///     .validate(&schema, json!(["a", 2]))
///     .unwrap()
///     .into_result()
///     .unwrap_err();
/// assert_eq!(errors.first().path.to_string(), "1");
/// ```
pub struct CollectionSchema {
    base: Base,
    item: Box<dyn SchemaLike>,
    shape: Shape,
    range: Range,
}

impl CollectionSchema {
    /// A JSON array whose elements match `item`.
    pub fn list_of<S>(item: S) -> Self
    where
        S: SchemaLike + 'static,
    {
        Self::new(item, Shape::List)
    }

    /// A JSON object whose values match `item`.
    pub fn map_of<S>(item: S) -> Self
    where
        S: SchemaLike + 'static,
    {
        Self::new(item, Shape::Map)
    }

    fn new<S>(item: S, shape: Shape) -> Self
    where
        S: SchemaLike + 'static,
    {
        Self {
            base: Base::default(),
            item: Box::new(item),
            shape,
            range: Range::default(),
        }
    }

    /// Sets the minimum element count.
    pub fn min(mut self, count: usize) -> Self {
        self.range.min = Some(Bound::from(count));
        self
    }

    /// Sets the maximum element count.
    pub fn max(mut self, count: usize) -> Self {
        self.range.max = Some(Bound::from(count));
        self
    }

    fn expected(&self) -> TypeExpr {
        match self.shape {
            Shape::List => TypeExpr::of(BuiltinType::List),
            Shape::Map => TypeExpr::of(BuiltinType::Object),
        }
    }

    fn check(&self, value: Value, ctx: &mut Context) -> Result<Item, CastingError> {
        if !check_type(&value, &self.expected(), ctx) {
            return Ok(Item::Value(value));
        }
        if !self.range.is_unbounded() && !check_range(&value, &self.range, false, ctx) {
            return Ok(Item::Value(value));
        }

        match value {
            Value::Array(elements) => {
                let mut output = Vec::with_capacity(elements.len());
                for (index, element) in elements.into_iter().enumerate() {
                    let item = ctx.within(PathSegment::index(index), |ctx| {
                        self.item.validate(Some(element), ctx)
                    })?;
                    output.extend(item);
                }
                Ok(Item::List(output))
            }
            Value::Object(entries) => {
                let mut output = IndexMap::with_capacity(entries.len());
                for (key, element) in entries {
                    let item = ctx.within(PathSegment::key(key.as_str()), |ctx| {
                        self.item.validate(Some(element), ctx)
                    })?;
                    if let Some(item) = item {
                        output.insert(key, item);
                    }
                }
                Ok(Item::Map(output))
            }
            other => Ok(Item::Value(other)),
        }
    }
}

impl Configure for CollectionSchema {
    fn base_mut(&mut self) -> &mut Base {
        &mut self.base
    }
}

impl SchemaLike for CollectionSchema {
    fn validate(&self, value: Option<Value>, ctx: &mut Context) -> Result<Option<Item>, CastingError> {
        self.base.run(value, ctx, |value, ctx| self.check(value, ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::registry::TypeRegistry;
    use crate::schema::Schema;
    use serde_json::json;

    fn run(schema: &CollectionSchema, value: Value) -> (Option<Item>, Context) {
        let mut ctx = Context::new(TypeRegistry::new());
        let item = schema.validate(Some(value), &mut ctx).unwrap();
        (item, ctx)
    }

    #[test]
    fn test_list_elements_get_index_paths() {
        let schema = CollectionSchema::list_of(Schema::int());
        let (_, ctx) = run(&schema, json!([1, "two", 3, null]));
        let paths: Vec<String> = ctx.errors().iter().map(|e| e.path.to_string()).collect();
        assert_eq!(paths, vec!["1", "3"]);
    }

    #[test]
    fn test_count_is_checked_before_elements() {
        let schema = CollectionSchema::list_of(Schema::int()).max(2);
        let (_, ctx) = run(&schema, json!(["a", "b", "c"]));
        assert_eq!(ctx.errors().len(), 1);
        assert_eq!(
            ctx.errors()[0].render(),
            "The length of item expects to be in range ..2, 3 items given."
        );
    }

    #[test]
    fn test_map_of() {
        let schema = CollectionSchema::map_of(Schema::string());
        let (item, ctx) = run(&schema, json!({"x": "1", "y": 2}));
        assert_eq!(ctx.errors().len(), 1);
        assert_eq!(ctx.errors()[0].path.to_string(), "y");
        assert_eq!(item.unwrap(), json!({"x": "1", "y": 2}));

        let (_, ctx) = run(&schema, json!(["x"]));
        assert_eq!(ctx.errors()[0].kind, ErrorKind::TypeMismatch);
    }
}
