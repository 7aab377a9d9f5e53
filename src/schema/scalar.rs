//! Typed leaf schema.
//!
//! This module provides [`TypeSchema`], which checks a value against a type
//! expression, an optional range and an optional regex pattern.

use regex::Regex;
use serde_json::Value;

use crate::context::Context;
use crate::error::{params, CastingError, ErrorKind, Param};
use crate::item::Item;
use crate::range::{check_range, Bound, Range};
use crate::types::{check_type, TypeExpr};

use super::base::{Base, Configure};
use super::traits::SchemaLike;

#[derive(Clone)]
struct Pattern {
    regex: Regex,
    source: String,
}

/// A schema for a single typed value.
///
/// The checks run in order and stop at the first failure: type, range,
/// pattern. The range applies to the length of strings and collections and to
/// the value of numbers; the pattern applies to strings only and must match
/// the whole string.
///
/// # Example
///
/// ```rust
/// use inquest::{Configure, Processor, Schema};
/// use serde_json::json;
///
/// let port = Schema::int().min(1).max(65535).required();
/// let processor = Processor::new();
///
/// assert!(processor.validate(&port, json!(8080)).unwrap().is_success());
/// assert!(processor.validate(&port, json!(0)).unwrap().is_failure());
/// assert!(processor.validate(&port, json!("8080")).unwrap().is_failure());
/// ```
#[derive(Clone)]
pub struct TypeSchema {
    base: Base,
    expected: TypeExpr,
    range: Range,
    pattern: Option<Pattern>,
}

impl TypeSchema {
    /// Creates a schema expecting `expected`.
    pub fn new(expected: TypeExpr) -> Self {
        Self {
            base: Base::default(),
            expected,
            range: Range::default(),
            pattern: None,
        }
    }

    /// Returns the expected type expression.
    pub fn expected(&self) -> &TypeExpr {
        &self.expected
    }

    /// Returns the configured range.
    pub fn range(&self) -> Range {
        self.range
    }

    /// Sets the inclusive lower bound.
    pub fn min(mut self, min: impl Into<Bound>) -> Self {
        self.range.min = Some(min.into());
        self
    }

    /// Sets the inclusive upper bound.
    pub fn max(mut self, max: impl Into<Bound>) -> Self {
        self.range.max = Some(max.into());
        self
    }

    /// Requires strings to match `pattern` in full.
    ///
    /// Returns an error if the regex pattern is invalid.
    ///
    /// # Example
    ///
    /// ```rust
    /// use inquest::{Processor, Schema};
    /// use serde_json::json;
    ///
    /// let schema = Schema::string().pattern(r"\d+").unwrap();
    /// let processor = Processor::new();
    ///
    /// assert!(processor.validate(&schema, json!("123")).unwrap().is_success());
    /// assert!(processor.validate(&schema, json!("123abc")).unwrap().is_failure());
    /// ```
    pub fn pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{})$", pattern))?;
        self.pattern = Some(Pattern {
            regex,
            source: pattern.to_string(),
        });
        Ok(self)
    }

    /// Also accepts `null`.
    pub fn nullable(mut self) -> Self {
        self.expected = self.expected.or_null();
        self
    }

    fn check(&self, value: Value, ctx: &mut Context) -> Result<Item, CastingError> {
        if !check_type(&value, &self.expected, ctx) {
            return Ok(Item::Value(value));
        }
        if !self.range.is_unbounded() && !check_range(&value, &self.range, self.expected.is_unicode(), ctx) {
            return Ok(Item::Value(value));
        }
        if let (Some(pattern), Value::String(s)) = (&self.pattern, &value) {
            if !pattern.regex.is_match(s) {
                ctx.add_error(
                    "The %label% %path% expects to match pattern '%pattern%', %value% given.",
                    ErrorKind::PatternMismatch,
                    params([
                        ("value", Param::Value(value.clone())),
                        ("pattern", Param::Text(pattern.source.clone())),
                    ]),
                );
            }
        }
        Ok(Item::Value(value))
    }
}

impl Configure for TypeSchema {
    fn base_mut(&mut self) -> &mut Base {
        &mut self.base
    }
}

impl SchemaLike for TypeSchema {
    fn validate(&self, value: Option<Value>, ctx: &mut Context) -> Result<Option<Item>, CastingError> {
        self.base.run(value, ctx, |value, ctx| self.check(value, ctx))
    }
}
