//! Structure schema.
//!
//! This module provides [`StructureSchema`] for mappings with a fixed set of
//! named fields, each processed by its own schema.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::context::Context;
use crate::error::{CastingError, ErrorKind, Params};
use crate::item::Item;
use crate::path::PathSegment;
use crate::types::{check_type, BuiltinType, TypeExpr};

use super::base::{Base, Configure};
use super::traits::SchemaLike;

/// How to handle keys not declared in the structure.
enum OtherItems {
    /// Report each unknown key as an error.
    Deny,
    /// Keep unknown keys unchanged.
    Allow,
    /// Process unknown keys with a schema.
    Validate(Box<dyn SchemaLike>),
}

/// A schema for mappings with named fields.
///
/// Fields are processed in declaration order with the field key pushed on the
/// path. Fields that yield no value (absent without default, failed
/// assertion) are left out of the result. Unknown keys are errors unless
/// [`allow_other_items`](Self::allow_other_items) or
/// [`other_items`](Self::other_items) is used.
///
/// An absent structure that is neither required nor given a default is
/// completed from an empty mapping, so its fields still supply their own
/// defaults.
///
/// # Example
///
/// ```rust
/// use inquest::{Configure, Processor, Schema};
/// use serde_json::json;
///
/// let schema = Schema::structure()
///     .field("host", Schema::string().required())
///     .field("port", Schema::int().default(json!(5432)));
///
/// let processed = Processor::new()
///     .process(&schema, json!({"host": "db.local"}))
///     .unwrap();
/// assert_eq!(
///     processed.value.unwrap(),
///     json!({"host": "db.local", "port": 5432})
/// );
/// ```
pub struct StructureSchema {
    base: Base,
    fields: IndexMap<String, Box<dyn SchemaLike>>,
    other_items: OtherItems,
}

impl StructureSchema {
    /// Creates a structure with no fields.
    pub fn new() -> Self {
        Self {
            base: Base::default(),
            fields: IndexMap::new(),
            other_items: OtherItems::Deny,
        }
    }

    /// Declares a field.
    pub fn field<S>(mut self, name: impl Into<String>, schema: S) -> Self
    where
        S: SchemaLike + 'static,
    {
        self.fields.insert(name.into(), Box::new(schema));
        self
    }

    /// Keeps undeclared keys as they are.
    pub fn allow_other_items(mut self) -> Self {
        self.other_items = OtherItems::Allow;
        self
    }

    /// Processes undeclared keys with `schema`.
    pub fn other_items<S>(mut self, schema: S) -> Self
    where
        S: SchemaLike + 'static,
    {
        self.other_items = OtherItems::Validate(Box::new(schema));
        self
    }

    /// Returns the declared field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    fn check(&self, value: Value, ctx: &mut Context) -> Result<Item, CastingError> {
        let mut input = match value {
            Value::Object(map) => map,
            other => {
                check_type(&other, &TypeExpr::of(BuiltinType::Object), ctx);
                return Ok(Item::Value(other));
            }
        };

        let mut output = IndexMap::with_capacity(self.fields.len());
        for (name, schema) in &self.fields {
            let child = input.remove(name);
            let item = ctx.within(PathSegment::key(name.as_str()), |ctx| schema.validate(child, ctx))?;
            if let Some(item) = item {
                output.insert(name.clone(), item);
            }
        }

        self.check_other_items(input, &mut output, ctx)?;
        Ok(Item::Map(output))
    }

    fn check_other_items(
        &self,
        rest: Map<String, Value>,
        output: &mut IndexMap<String, Item>,
        ctx: &mut Context,
    ) -> Result<(), CastingError> {
        for (key, value) in rest {
            match &self.other_items {
                OtherItems::Deny => ctx.within(PathSegment::key(key.as_str()), |ctx| {
                    ctx.add_error("Unexpected item %path%.", ErrorKind::UnexpectedItem, Params::new())
                }),
                OtherItems::Allow => {
                    output.insert(key, Item::Value(value));
                }
                OtherItems::Validate(schema) => {
                    let item = ctx.within(PathSegment::key(key.as_str()), |ctx| schema.validate(Some(value), ctx))?;
                    if let Some(item) = item {
                        output.insert(key, item);
                    }
                }
            }
        }
        Ok(())
    }
}

impl Default for StructureSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl Configure for StructureSchema {
    fn base_mut(&mut self) -> &mut Base {
        &mut self.base
    }
}

impl SchemaLike for StructureSchema {
    fn validate(&self, value: Option<Value>, ctx: &mut Context) -> Result<Option<Item>, CastingError> {
        let value = match value {
            None if !self.base.is_required() && self.base.default_value().is_none() => {
                Some(Value::Object(Map::new()))
            }
            value => value,
        };
        self.base.run(value, ctx, |value, ctx| self.check(value, ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TypeRegistry;
    use crate::schema::Schema;
    use serde_json::json;

    fn run(schema: &StructureSchema, value: Option<Value>) -> (Option<Item>, Context) {
        let mut ctx = Context::new(TypeRegistry::new());
        let item = schema.validate(value, &mut ctx).unwrap();
        (item, ctx)
    }

    #[test]
    fn test_fields_are_processed_in_order_with_paths() {
        let schema = StructureSchema::new()
            .field("a", Schema::int().required())
            .field("b", Schema::string());
        let (item, ctx) = run(&schema, Some(json!({"b": 1})));

        assert_eq!(ctx.errors().len(), 2);
        assert_eq!(ctx.errors()[0].path.to_string(), "a");
        assert_eq!(ctx.errors()[0].kind, ErrorKind::MissingItem);
        assert_eq!(ctx.errors()[1].path.to_string(), "b");
        assert_eq!(item.unwrap(), json!({"b": 1}));
    }

    #[test]
    fn test_field_names_keep_declaration_order() {
        let schema = StructureSchema::new()
            .field("port", Schema::int())
            .field("host", Schema::string());
        assert_eq!(schema.field_names().collect::<Vec<_>>(), vec!["port", "host"]);
    }

    #[test]
    fn test_unknown_keys() {
        let schema = StructureSchema::new().field("a", Schema::int());
        let (_, ctx) = run(&schema, Some(json!({"a": 1, "zz": 2})));
        assert_eq!(ctx.errors()[0].render(), "Unexpected item 'zz'.");

        let schema = StructureSchema::new().allow_other_items();
        let (item, ctx) = run(&schema, Some(json!({"zz": 2})));
        assert!(!ctx.has_errors());
        assert_eq!(item.unwrap(), json!({"zz": 2}));

        let schema = StructureSchema::new().other_items(Schema::string());
        let (_, ctx) = run(&schema, Some(json!({"zz": 2})));
        assert_eq!(ctx.errors()[0].kind, ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_absent_optional_structure_completes_children() {
        let schema = StructureSchema::new().field("debug", Schema::bool().default(false));
        let (item, ctx) = run(&schema, None);
        assert!(!ctx.has_errors());
        assert_eq!(item.unwrap(), json!({"debug": false}));
    }

    #[test]
    fn test_non_mapping_is_a_type_mismatch() {
        let (item, ctx) = run(&StructureSchema::new(), Some(json!([1])));
        assert_eq!(item.unwrap(), json!([1]));
        assert_eq!(
            ctx.errors()[0].render(),
            "The item expects to be object, array given."
        );
    }
}
