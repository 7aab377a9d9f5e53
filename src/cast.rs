//! Casting validated values into target types.
//!
//! A node may name a cast target. Builtin scalar names (`int`, `string`, ...)
//! select [`CastMode::Coerce`], which converts the value in place and never
//! fails. Any other name is looked up in the [`TypeRegistry`] and built either
//! by open field assignment ([`CastMode::Assign`]) or through the type's field
//! descriptor table ([`CastMode::Reflect`]). Those two modes fail hard with a
//! [`CastingError`].

use serde_json::Value;

use crate::error::{CastingError, ReflectionError};
use crate::item::Item;
use crate::path::Path;
use crate::registry::{TypeEntry, TypeRegistry};

/// How a cast target is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastMode {
    /// In-place conversion to a builtin scalar type.
    Coerce,
    /// Default construction, then one assignment per input key.
    Assign,
    /// Blank allocation bypassing the constructor, then checked field setters.
    Reflect,
}

impl CastMode {
    fn label(&self) -> &'static str {
        match self {
            CastMode::Coerce => "builtin",
            CastMode::Assign => "field-assignment",
            CastMode::Reflect => "reflective",
        }
    }
}

/// Builtin types a value can be coerced into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarTarget {
    Int,
    Float,
    String,
    Bool,
    /// A sequence or mapping; scalars are wrapped into a one-element list.
    Array,
    /// A sequence; mappings keep only their values.
    List,
    Null,
}

impl ScalarTarget {
    /// Looks up a builtin cast target by name.
    pub fn from_name(name: &str) -> Option<Self> {
        let target = match name {
            "int" | "integer" => ScalarTarget::Int,
            "float" | "double" => ScalarTarget::Float,
            "string" => ScalarTarget::String,
            "bool" | "boolean" => ScalarTarget::Bool,
            "array" => ScalarTarget::Array,
            "list" => ScalarTarget::List,
            "null" => ScalarTarget::Null,
            _ => return None,
        };
        Some(target)
    }
}

/// The cast configured on a node.
#[derive(Debug, Clone, PartialEq)]
pub struct CastTarget {
    name: String,
    mode: CastMode,
}

impl CastTarget {
    /// Builtin coercion if `name` is a builtin type, field assignment
    /// otherwise.
    pub fn new(name: impl Into<String>) -> Self {
        Self::resolve(name.into(), CastMode::Assign)
    }

    /// Builtin coercion if `name` is a builtin type, reflective construction
    /// otherwise.
    pub fn reflected(name: impl Into<String>) -> Self {
        Self::resolve(name.into(), CastMode::Reflect)
    }

    fn resolve(name: String, structured: CastMode) -> Self {
        let mode = if ScalarTarget::from_name(&name).is_some() {
            CastMode::Coerce
        } else {
            structured
        };
        Self { name, mode }
    }

    /// Returns the target type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the construction mode.
    pub fn mode(&self) -> CastMode {
        self.mode
    }

    /// Casts `item`. `path` locates the node for error reporting.
    pub fn apply(&self, item: Item, registry: &TypeRegistry, path: &Path) -> Result<Item, CastingError> {
        tracing::debug!(target_type = %self.name, mode = self.mode.label(), path = %path, "casting value");

        let result = match self.mode {
            CastMode::Coerce => Ok(self.coerce(item)),
            CastMode::Assign => self.assign(item, registry),
            CastMode::Reflect => self.reflect(item, registry),
        };

        result.map_err(|source| {
            tracing::warn!(target_type = %self.name, path = %path, error = %source, "cast failed");
            CastingError::new(self.name.clone(), path.clone(), source)
        })
    }

    fn coerce(&self, item: Item) -> Item {
        let Some(target) = ScalarTarget::from_name(&self.name) else {
            return item;
        };
        match item.to_json() {
            Some(value) => Item::Value(coerce(value, target)),
            None => item,
        }
    }

    fn entry(&self, registry: &TypeRegistry) -> Result<std::sync::Arc<TypeEntry>, ReflectionError> {
        registry
            .get(&self.name)
            .ok_or_else(|| ReflectionError::UnknownType(self.name.clone()))
    }

    fn assign(&self, item: Item, registry: &TypeRegistry) -> Result<Item, ReflectionError> {
        let entry = self.entry(registry)?;
        let TypeEntry::Assignable(assignable) = entry.as_ref() else {
            return Err(ReflectionError::ModeUnsupported {
                type_name: self.name.clone(),
                mode: self.mode.label(),
            });
        };
        let entries = item
            .into_entries()
            .map_err(|other| ReflectionError::NotAMapping {
                found: other.kind_name(),
            })?;
        Ok(Item::Instance(assignable.construct(entries)))
    }

    fn reflect(&self, item: Item, registry: &TypeRegistry) -> Result<Item, ReflectionError> {
        let entry = self.entry(registry)?;
        let TypeEntry::Reflective(blueprint) = entry.as_ref() else {
            return Err(ReflectionError::ModeUnsupported {
                type_name: self.name.clone(),
                mode: self.mode.label(),
            });
        };
        let entries = item
            .into_entries()
            .map_err(|other| ReflectionError::NotAMapping {
                found: other.kind_name(),
            })?;

        let mut partial = blueprint.allocate_blank();
        for (field, value) in entries {
            partial.set_field(&field, value)?;
        }
        Ok(Item::Instance(partial.finalize()))
    }
}

/// Converts a value to a builtin type. Never fails.
///
/// # Example
///
/// ```rust
/// use inquest::{coerce, ScalarTarget};
/// use serde_json::json;
///
/// assert_eq!(coerce(json!("42 workers"), ScalarTarget::Int), json!(42));
/// assert_eq!(coerce(json!(8080), ScalarTarget::String), json!("8080"));
/// assert_eq!(coerce(json!("0"), ScalarTarget::Bool), json!(false));
/// assert_eq!(coerce(json!("solo"), ScalarTarget::List), json!(["solo"]));
/// ```
pub fn coerce(value: Value, target: ScalarTarget) -> Value {
    match target {
        ScalarTarget::Int => Value::from(to_int(&value)),
        ScalarTarget::Float => Value::from(to_float(&value)),
        ScalarTarget::String => Value::String(to_text(&value)),
        ScalarTarget::Bool => Value::Bool(truthy(&value)),
        ScalarTarget::Array => match value {
            Value::Null => Value::Array(Vec::new()),
            Value::Array(_) | Value::Object(_) => value,
            scalar => Value::Array(vec![scalar]),
        },
        ScalarTarget::List => match value {
            Value::Null => Value::Array(Vec::new()),
            Value::Array(_) => value,
            Value::Object(map) => Value::Array(map.into_iter().map(|(_, v)| v).collect()),
            scalar => Value::Array(vec![scalar]),
        },
        ScalarTarget::Null => Value::Null,
    }
}

fn to_int(value: &Value) -> i64 {
    match value {
        Value::Null => 0,
        Value::Bool(b) => i64::from(*b),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|u| i64::try_from(u).unwrap_or(i64::MAX)))
            .unwrap_or_else(|| truncate(n.as_f64().unwrap_or(0.0))),
        Value::String(s) => {
            let prefix = numeric_prefix(s);
            prefix
                .parse::<i64>()
                .unwrap_or_else(|_| truncate(prefix.parse::<f64>().unwrap_or(0.0)))
        }
        Value::Array(items) => i64::from(!items.is_empty()),
        Value::Object(map) => i64::from(!map.is_empty()),
    }
}

fn to_float(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => numeric_prefix(s).parse::<f64>().unwrap_or(0.0),
        Value::Array(items) => f64::from(u8::from(!items.is_empty())),
        Value::Object(map) => f64::from(u8::from(!map.is_empty())),
    }
}

fn to_text(value: &Value) -> String {
    match value {
        Value::Null | Value::Bool(false) => String::new(),
        Value::Bool(true) => "1".to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn truncate(f: f64) -> i64 {
    if f.is_nan() {
        0
    } else {
        f.trunc() as i64
    }
}

/// Returns the longest leading part of `s` that reads as a decimal number,
/// after skipping leading whitespace. Empty if there is none.
fn numeric_prefix(s: &str) -> &str {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - (end + 1);
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }
    &s[..end]
}
