//! Inclusive numeric ranges and the range check stage.
//!
//! A [`Range`] is an inclusive interval whose bounds may each be absent
//! (unbounded). [`check_range`] applies it to a value: collections and text
//! are measured by length, numbers by value, anything else passes.

use std::cmp::Ordering;
use std::fmt::{self, Display};

use serde_json::{Number, Value};

use crate::context::Context;
use crate::error::{params, ErrorKind, Param};

/// A range bound or a measured magnitude.
///
/// Integers are kept exact; comparisons between two integers never go
/// through floating point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Int(i128),
    Float(f64),
}

impl Bound {
    /// Converts a JSON number, preferring the exact integer form.
    pub fn from_number(n: &Number) -> Option<Self> {
        n.as_i64()
            .map(|i| Bound::Int(i128::from(i)))
            .or_else(|| n.as_u64().map(|u| Bound::Int(i128::from(u))))
            .or_else(|| n.as_f64().map(Bound::Float))
    }

    /// Orders two bounds. Returns None only when a NaN is involved.
    pub fn compare(&self, other: &Bound) -> Option<Ordering> {
        match (*self, *other) {
            (Bound::Int(a), Bound::Int(b)) => Some(a.cmp(&b)),
            (Bound::Int(a), Bound::Float(b)) => compare_int_float(a, b),
            (Bound::Float(a), Bound::Int(b)) => compare_int_float(b, a).map(Ordering::reverse),
            (Bound::Float(a), Bound::Float(b)) => a.partial_cmp(&b),
        }
    }
}

fn compare_int_float(i: i128, f: f64) -> Option<Ordering> {
    if f.is_nan() {
        return None;
    }
    let floor = f.floor();
    // 2^127 is the first float above every i128
    if floor >= i128::MAX as f64 {
        return Some(Ordering::Less);
    }
    if floor < i128::MIN as f64 {
        return Some(Ordering::Greater);
    }
    match i.cmp(&(floor as i128)) {
        Ordering::Equal if f > floor => Some(Ordering::Less),
        ordering => Some(ordering),
    }
}

macro_rules! bound_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Bound {
            fn from(n: $t) -> Self {
                Bound::Int(n as i128)
            }
        })*
    };
}

bound_from_int!(i8, i16, i32, i64, i128, u8, u16, u32, u64, usize);

impl From<f32> for Bound {
    fn from(n: f32) -> Self {
        Bound::Float(f64::from(n))
    }
}

impl From<f64> for Bound {
    fn from(n: f64) -> Self {
        Bound::Float(n)
    }
}

impl Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Int(i) => write!(f, "{}", i),
            Bound::Float(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Bound::Float(n) => write!(f, "{}", n),
        }
    }
}

/// An inclusive interval with optional bounds.
///
/// # Example
///
/// ```rust
/// use inquest::Range;
///
/// let range = Range::between(2, 5);
/// assert!(range.contains(2));
/// assert!(range.contains(5.0));
/// assert!(!range.contains(6));
/// assert_eq!(range.to_string(), "2..5");
///
/// assert_eq!(Range::at_most(10).to_string(), "..10");
/// assert!(!Range::at_most(i64::MAX).contains(u64::MAX));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Range {
    pub min: Option<Bound>,
    pub max: Option<Bound>,
}

impl Range {
    /// Creates a range from optional bounds.
    pub fn new(min: Option<Bound>, max: Option<Bound>) -> Self {
        Self { min, max }
    }

    /// A range with both bounds.
    pub fn between(min: impl Into<Bound>, max: impl Into<Bound>) -> Self {
        Self::new(Some(min.into()), Some(max.into()))
    }

    /// A range with only a lower bound.
    pub fn at_least(min: impl Into<Bound>) -> Self {
        Self::new(Some(min.into()), None)
    }

    /// A range with only an upper bound.
    pub fn at_most(max: impl Into<Bound>) -> Self {
        Self::new(None, Some(max.into()))
    }

    /// Returns true when neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// `(min is absent OR n >= min) AND (max is absent OR n <= max)`
    pub fn contains(&self, n: impl Into<Bound>) -> bool {
        let n = n.into();
        let above_min = self.min.map_or(true, |min| {
            matches!(n.compare(&min), Some(Ordering::Greater | Ordering::Equal))
        });
        let below_max = self.max.map_or(true, |max| {
            matches!(n.compare(&max), Some(Ordering::Less | Ordering::Equal))
        });
        above_min && below_max
    }

    /// Parses a range qualifier: `min..max` with either side empty, or a
    /// single number meaning exactly that number.
    pub(crate) fn parse(spec: &str) -> Option<Self> {
        let bound = |s: &str| -> Option<Option<Bound>> {
            let s = s.trim();
            if s.is_empty() {
                return Some(None);
            }
            s.parse::<i128>()
                .map(Bound::Int)
                .or_else(|_| s.parse::<f64>().map(Bound::Float))
                .ok()
                .map(Some)
        };

        match spec.split_once("..") {
            Some((min, max)) => Some(Self::new(bound(min)?, bound(max)?)),
            None => {
                let exact = bound(spec)??;
                Some(Self::new(Some(exact), Some(exact)))
            }
        }
    }
}

impl Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(min) = self.min {
            write!(f, "{}", min)?;
        }
        f.write_str("..")?;
        if let Some(max) = self.max {
            write!(f, "{}", max)?;
        }
        Ok(())
    }
}

/// What a range is measured against for a given value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Measure {
    Length { length: usize, unit: &'static str },
    Magnitude(Bound),
    Unmeasurable,
}

/// Measures a value: element count for collections, byte or code point count
/// for text, the number itself for numbers.
pub(crate) fn measure(value: &Value, unicode: bool) -> Measure {
    match value {
        Value::Array(items) => Measure::Length {
            length: items.len(),
            unit: "items",
        },
        Value::Object(map) => Measure::Length {
            length: map.len(),
            unit: "items",
        },
        Value::String(s) if unicode => Measure::Length {
            length: s.chars().count(),
            unit: "characters",
        },
        Value::String(s) => Measure::Length {
            length: s.len(),
            unit: "bytes",
        },
        Value::Number(n) => Bound::from_number(n).map_or(Measure::Unmeasurable, Measure::Magnitude),
        Value::Null | Value::Bool(_) => Measure::Unmeasurable,
    }
}

/// Checks `value` against `range`, recording `LENGTH_OUT_OF_RANGE` or
/// `VALUE_OUT_OF_RANGE` on violation.
///
/// `unicode` selects code point counting for text instead of bytes.
pub fn check_range(value: &Value, range: &Range, unicode: bool, ctx: &mut Context) -> bool {
    match measure(value, unicode) {
        Measure::Length { length, unit } => {
            if range.contains(length) {
                return true;
            }
            ctx.add_error(
                format!(
                    "The length of %label% %path% expects to be in range %expected%, %length% {} given.",
                    unit
                ),
                ErrorKind::LengthOutOfRange,
                params([
                    ("value", Param::Value(value.clone())),
                    ("length", Param::from(length)),
                    ("expected", Param::Text(range.to_string())),
                ]),
            );
            false
        }
        Measure::Magnitude(n) => {
            if range.contains(n) {
                return true;
            }
            ctx.add_error(
                "The %label% %path% expects to be in range %expected%, %value% given.",
                ErrorKind::ValueOutOfRange,
                params([
                    ("value", Param::Value(value.clone())),
                    ("expected", Param::Text(range.to_string())),
                ]),
            );
            false
        }
        Measure::Unmeasurable => true,
    }
}
