//! Alternatives schema.
//!
//! This module provides [`AnyOfSchema`], which accepts a value matching any of
//! a list of literal values or schemas.

use serde_json::Value;

use crate::context::Context;
use crate::error::{format_value, params, CastingError, ErrorKind, Message, Param};
use crate::item::Item;

use super::base::{Base, Configure};
use super::traits::SchemaLike;

/// One accepted alternative.
pub enum Alternative {
    /// Accepted if equal to the input.
    Literal(Value),
    /// Accepted if the schema processes the input without errors.
    Schema(Box<dyn SchemaLike>),
}

/// A schema accepting any of several alternatives.
///
/// Alternatives are tried in order. Each schema alternative runs in its own
/// forked [`Context`] so a failed attempt leaves no trace; the first one
/// without errors wins and its warnings are kept.
///
/// When nothing matches, errors raised below the current location (or
/// without an expected type) are reported as they are, since they are more
/// precise. Otherwise a single type mismatch lists every expected
/// alternative.
///
/// # Example
///
/// ```rust
/// use inquest::{Processor, Schema};
/// use serde_json::json;
///
/// let mode = Schema::any_of().value("strict").value("lenient").schema(Schema::int());
/// let processor = Processor::new();
///
/// assert!(processor.validate(&mode, json!("strict")).unwrap().is_success());
/// assert!(processor.validate(&mode, json!(3)).unwrap().is_success());
///
/// let errors = processor
///     .validate(&mode, json!("loose"))
///     .unwrap()
///     .into_result()
///     .unwrap_err();
/// assert_eq!(
///     errors.first().render(),
///     "The item expects to be 'strict'|'lenient'|int, 'loose' given."
/// );
/// ```
pub struct AnyOfSchema {
    base: Base,
    alternatives: Vec<Alternative>,
}

impl AnyOfSchema {
    /// Creates a schema with no alternatives.
    pub fn new() -> Self {
        Self {
            base: Base::default(),
            alternatives: Vec::new(),
        }
    }

    /// Accepts a literal value.
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.alternatives.push(Alternative::Literal(value.into()));
        self
    }

    /// Accepts anything `schema` accepts.
    pub fn schema<S>(mut self, schema: S) -> Self
    where
        S: SchemaLike + 'static,
    {
        self.alternatives.push(Alternative::Schema(Box::new(schema)));
        self
    }

    /// Also accepts `null`.
    pub fn nullable(self) -> Self {
        self.value(Value::Null)
    }

    /// Uses the first alternative as the default, if it is a literal.
    pub fn first_is_default(mut self) -> Self {
        if let Some(Alternative::Literal(first)) = self.alternatives.first() {
            let first = first.clone();
            self = self.default(first);
        }
        self
    }

    /// Returns the alternatives in order.
    pub fn alternatives(&self) -> &[Alternative] {
        &self.alternatives
    }

    fn check(&self, value: Value, ctx: &mut Context) -> Result<Item, CastingError> {
        let mut expecteds: Vec<String> = Vec::new();
        let mut nested: Vec<Message> = Vec::new();

        for alternative in &self.alternatives {
            match alternative {
                Alternative::Literal(literal) => {
                    if *literal == value {
                        return Ok(Item::Value(value));
                    }
                    expecteds.push(format_value(literal));
                }
                Alternative::Schema(schema) => {
                    let mut attempt = ctx.fork();
                    let item = schema.validate(Some(value.clone()), &mut attempt)?;
                    let (errors, warnings) = attempt.into_parts();
                    if errors.is_empty() {
                        ctx.extend_warnings(warnings);
                        return Ok(item.unwrap_or(Item::Value(Value::Null)));
                    }
                    for error in errors {
                        let expected = error.param("expected").and_then(|p| p.as_text()).map(str::to_string);
                        match expected {
                            Some(expected) if error.path == *ctx.path() => expecteds.push(expected),
                            _ => nested.push(error),
                        }
                    }
                }
            }
        }

        if nested.is_empty() {
            let mut unique: Vec<String> = Vec::with_capacity(expecteds.len());
            for expected in expecteds {
                if !unique.contains(&expected) {
                    unique.push(expected);
                }
            }
            ctx.add_error(
                "The %label% %path% expects to be %expected%, %value% given.",
                ErrorKind::TypeMismatch,
                params([
                    ("value", Param::Value(value.clone())),
                    ("expected", Param::Text(expected_text(&unique))),
                ]),
            );
        } else {
            ctx.extend_errors(nested);
        }
        Ok(Item::Value(value))
    }
}

/// Joins the expected alternatives; a schema without any accepts nothing.
fn expected_text(expecteds: &[String]) -> String {
    if expecteds.is_empty() {
        "nothing".to_string()
    } else {
        expecteds.join("|")
    }
}

impl Default for AnyOfSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl Configure for AnyOfSchema {
    fn base_mut(&mut self) -> &mut Base {
        &mut self.base
    }
}

impl SchemaLike for AnyOfSchema {
    fn validate(&self, value: Option<Value>, ctx: &mut Context) -> Result<Option<Item>, CastingError> {
        self.base.run(value, ctx, |value, ctx| self.check(value, ctx))
    }
}
