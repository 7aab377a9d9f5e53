//! Type expressions and the type check stage.
//!
//! A type expression is a `|`-separated union of alternatives. Each
//! alternative names a builtin type and may carry a range qualifier after a
//! colon, e.g. `int:0..65535|string:1..`. A value matches the expression if it
//! matches at least one alternative.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde_json::Value;

use crate::context::Context;
use crate::error::{params, ErrorKind, Param};
use crate::range::{measure, Measure, Range};

/// Builtin type names understood in type expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinType {
    Bool,
    Int,
    Float,
    /// Any number.
    Number,
    /// A number or a numeric string.
    Numeric,
    /// An integer or a string holding an integer.
    NumericInt,
    String,
    /// A string whose length is counted in code points.
    Unicode,
    Null,
    /// Bool, number or string.
    Scalar,
    /// A sequence.
    List,
    /// A sequence or a mapping.
    Array,
    /// A mapping.
    Object,
    Iterable,
    Mixed,
}

impl BuiltinType {
    /// Looks up a builtin type by name (including aliases).
    pub fn from_name(name: &str) -> Option<Self> {
        let ty = match name {
            "bool" | "boolean" => BuiltinType::Bool,
            "int" | "integer" => BuiltinType::Int,
            "float" => BuiltinType::Float,
            "number" => BuiltinType::Number,
            "numeric" => BuiltinType::Numeric,
            "numericint" => BuiltinType::NumericInt,
            "string" => BuiltinType::String,
            "unicode" => BuiltinType::Unicode,
            "null" => BuiltinType::Null,
            "scalar" => BuiltinType::Scalar,
            "list" => BuiltinType::List,
            "array" => BuiltinType::Array,
            "object" => BuiltinType::Object,
            "iterable" => BuiltinType::Iterable,
            "mixed" => BuiltinType::Mixed,
            _ => return None,
        };
        Some(ty)
    }

    /// Returns the canonical name.
    pub fn name(&self) -> &'static str {
        match self {
            BuiltinType::Bool => "bool",
            BuiltinType::Int => "int",
            BuiltinType::Float => "float",
            BuiltinType::Number => "number",
            BuiltinType::Numeric => "numeric",
            BuiltinType::NumericInt => "numericint",
            BuiltinType::String => "string",
            BuiltinType::Unicode => "unicode",
            BuiltinType::Null => "null",
            BuiltinType::Scalar => "scalar",
            BuiltinType::List => "list",
            BuiltinType::Array => "array",
            BuiltinType::Object => "object",
            BuiltinType::Iterable => "iterable",
            BuiltinType::Mixed => "mixed",
        }
    }

    /// Returns true if `value` is of this type.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            BuiltinType::Bool => value.is_boolean(),
            BuiltinType::Int => value.is_i64() || value.is_u64(),
            BuiltinType::Float => value.is_f64(),
            BuiltinType::Number => value.is_number(),
            BuiltinType::Numeric => match value {
                Value::Number(_) => true,
                Value::String(s) => is_numeric_str(s),
                _ => false,
            },
            BuiltinType::NumericInt => match value {
                Value::Number(n) => n.is_i64() || n.is_u64(),
                Value::String(s) => is_integer_str(s),
                _ => false,
            },
            BuiltinType::String | BuiltinType::Unicode => value.is_string(),
            BuiltinType::Null => value.is_null(),
            BuiltinType::Scalar => value.is_boolean() || value.is_number() || value.is_string(),
            BuiltinType::List => value.is_array(),
            BuiltinType::Array | BuiltinType::Iterable => value.is_array() || value.is_object(),
            BuiltinType::Object => value.is_object(),
            BuiltinType::Mixed => true,
        }
    }
}

impl Display for BuiltinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn is_integer_str(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn is_numeric_str(s: &str) -> bool {
    let body = s.strip_prefix(['+', '-']).unwrap_or(s);
    let (int, frac) = match body.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (body, None),
    };
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    match frac {
        None => !int.is_empty() && all_digits(int),
        Some(frac) if int.is_empty() => !frac.is_empty() && all_digits(frac),
        Some(frac) => all_digits(int) && all_digits(frac),
    }
}

/// One alternative of a type expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeAlternative {
    pub ty: BuiltinType,
    pub range: Option<Range>,
}

impl TypeAlternative {
    /// Returns true if `value` matches the type and its range qualifier.
    pub fn matches(&self, value: &Value) -> bool {
        if !self.ty.matches(value) {
            return false;
        }
        let Some(range) = self.range else {
            return true;
        };
        match measure(value, self.ty == BuiltinType::Unicode) {
            Measure::Length { length, .. } => range.contains(length),
            Measure::Magnitude(n) => range.contains(n),
            Measure::Unmeasurable => true,
        }
    }
}

/// Errors raised when a type expression cannot be parsed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TypeExprError {
    #[error("type expression is empty")]
    Empty,

    #[error("unknown type '{0}'")]
    UnknownType(String),

    #[error("invalid range qualifier in '{0}'")]
    InvalidRange(String),
}

/// A parsed type expression.
///
/// # Example
///
/// ```rust
/// use inquest::TypeExpr;
/// use serde_json::json;
///
/// let expr: TypeExpr = "int:1..10|string".parse().unwrap();
/// assert!(expr.matches(&json!(5)));
/// assert!(expr.matches(&json!("five")));
/// assert!(!expr.matches(&json!(50)));
/// assert_eq!(expr.humanize(), "int in range 1..10 or string");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TypeExpr {
    source: String,
    alternatives: Vec<TypeAlternative>,
}

impl TypeExpr {
    /// Parses an expression such as `int|string:1..5`.
    pub fn parse(expr: &str) -> Result<Self, TypeExprError> {
        let source = expr.trim();
        if source.is_empty() {
            return Err(TypeExprError::Empty);
        }

        let alternatives = source
            .split('|')
            .map(|alt| {
                let alt = alt.trim();
                let (name, qualifier) = match alt.split_once(':') {
                    Some((name, qualifier)) => (name, Some(qualifier)),
                    None => (alt, None),
                };
                let ty = BuiltinType::from_name(name)
                    .ok_or_else(|| TypeExprError::UnknownType(name.to_string()))?;
                let range = qualifier
                    .map(|q| Range::parse(q).ok_or_else(|| TypeExprError::InvalidRange(alt.to_string())))
                    .transpose()?;
                Ok(TypeAlternative { ty, range })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            source: source.to_string(),
            alternatives,
        })
    }

    /// Builds an expression for a single builtin type.
    pub fn of(ty: BuiltinType) -> Self {
        Self {
            source: ty.name().to_string(),
            alternatives: vec![TypeAlternative { ty, range: None }],
        }
    }

    /// Returns the expression text as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns the parsed alternatives.
    pub fn alternatives(&self) -> &[TypeAlternative] {
        &self.alternatives
    }

    /// Returns true if `value` matches at least one alternative.
    pub fn matches(&self, value: &Value) -> bool {
        self.alternatives.iter().any(|alt| alt.matches(value))
    }

    /// Returns true if any alternative is `unicode`, which switches text
    /// length measurement to code points.
    pub fn is_unicode(&self) -> bool {
        self.alternatives
            .iter()
            .any(|alt| alt.ty == BuiltinType::Unicode)
    }

    /// Returns true if `null` is accepted.
    pub fn accepts_null(&self) -> bool {
        self.matches(&Value::Null)
    }

    /// Returns a copy that also accepts `null`.
    pub fn or_null(&self) -> Self {
        if self.accepts_null() {
            return self.clone();
        }
        let mut expr = self.clone();
        expr.source.push_str("|null");
        expr.alternatives.push(TypeAlternative {
            ty: BuiltinType::Null,
            range: None,
        });
        expr
    }

    /// Rewrites the expression for messages: `|` becomes " or ", `:` becomes
    /// " in range ".
    pub fn humanize(&self) -> String {
        self.source.replace('|', " or ").replace(':', " in range ")
    }
}

impl FromStr for TypeExpr {
    type Err = TypeExprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Checks `value` against `expected`, recording `TYPE_MISMATCH` on failure.
pub fn check_type(value: &Value, expected: &TypeExpr, ctx: &mut Context) -> bool {
    if expected.matches(value) {
        return true;
    }
    ctx.add_error(
        "The %label% %path% expects to be %expected%, %value% given.",
        ErrorKind::TypeMismatch,
        params([
            ("value", Param::Value(value.clone())),
            ("expected", Param::Text(expected.humanize())),
        ]),
    );
    false
}
