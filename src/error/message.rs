//! Validation messages and their rendering.
//!
//! A [`Message`] is created exactly once by the stage that detects a problem
//! and is never mutated afterwards. It keeps the raw template, the path at the
//! moment it was raised and the parameters needed to render it.

use std::fmt::{self, Display};
use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::{Captures, Regex};
use serde_json::Value;

use crate::path::Path;

/// Machine-readable classification of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required item was absent.
    MissingItem,
    /// The value does not satisfy the expected type expression.
    TypeMismatch,
    /// A string or collection length is outside the allowed range.
    LengthOutOfRange,
    /// A number is outside the allowed range.
    ValueOutOfRange,
    /// A string does not match the configured pattern.
    PatternMismatch,
    /// A user assertion returned false.
    FailedAssertion,
    /// A structure received a key it does not declare.
    UnexpectedItem,
    /// The item is deprecated (warning only).
    Deprecated,
}

impl ErrorKind {
    /// Returns the stable code used for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::MissingItem => "schema.missingItem",
            ErrorKind::TypeMismatch => "schema.typeMismatch",
            ErrorKind::LengthOutOfRange => "schema.lengthOutOfRange",
            ErrorKind::ValueOutOfRange => "schema.valueOutOfRange",
            ErrorKind::PatternMismatch => "schema.patternMismatch",
            ErrorKind::FailedAssertion => "schema.failedAssertion",
            ErrorKind::UnexpectedItem => "schema.unexpectedItem",
            ErrorKind::Deprecated => "schema.deprecated",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A message parameter.
///
/// `Value` parameters hold data taken from the input; `Text` parameters are
/// already human-readable (expected type descriptions, instance labels).
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Value(Value),
    Text(String),
}

impl Param {
    /// Returns the text of a `Text` parameter.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Param::Text(t) => Some(t),
            Param::Value(_) => None,
        }
    }

    /// Returns the JSON value of a `Value` parameter.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Param::Value(v) => Some(v),
            Param::Text(_) => None,
        }
    }
}

impl From<Value> for Param {
    fn from(value: Value) -> Self {
        Param::Value(value)
    }
}

impl From<String> for Param {
    fn from(text: String) -> Self {
        Param::Text(text)
    }
}

impl From<&str> for Param {
    fn from(text: &str) -> Self {
        Param::Text(text.to_string())
    }
}

impl From<usize> for Param {
    fn from(n: usize) -> Self {
        Param::Value(Value::from(n))
    }
}

/// Named message parameters, in insertion order.
pub type Params = IndexMap<String, Param>;

/// Builds a parameter map from literal pairs.
pub(crate) fn params<const N: usize>(pairs: [(&str, Param); N]) -> Params {
    pairs
        .into_iter()
        .map(|(name, param)| (name.to_string(), param))
        .collect()
}

/// A single error or warning raised during processing.
///
/// # Example
///
/// ```rust
/// use inquest::{ErrorKind, Message, Param, Params, Path, PathSegment};
/// use serde_json::json;
///
/// let mut params = Params::new();
/// params.insert("value".into(), Param::Value(json!(8080.5)));
/// params.insert("expected".into(), Param::Text("int".into()));
///
/// let message = Message::new(
///     "The %label% %path% expects to be %expected%, %value% given.",
///     ErrorKind::TypeMismatch,
///     Path::from_segments([PathSegment::key("port")]),
///     params,
/// );
///
/// assert_eq!(message.render(), "The item 'port' expects to be int, 8080.5 given.");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Template containing `%placeholder%` variables.
    pub template: String,
    /// Classification of the message.
    pub kind: ErrorKind,
    /// Location of the offending item when the message was raised.
    pub path: Path,
    /// Template parameters.
    pub params: Params,
}

impl Message {
    /// Creates a new message.
    pub fn new(template: impl Into<String>, kind: ErrorKind, path: Path, params: Params) -> Self {
        Self {
            template: template.into(),
            kind,
            path,
            params,
        }
    }

    /// Returns the stable code of this message's kind.
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Returns a parameter by name.
    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.get(name)
    }

    /// Renders the template into a human-readable sentence.
    ///
    /// A placeholder whose variable is absent is removed together with a
    /// single preceding space.
    pub fn render(&self) -> String {
        placeholder_regex()
            .replace_all(&self.template, |caps: &Captures<'_>| {
                match self.variable(&caps[2]) {
                    Some(text) => format!("{}{}", &caps[1], text),
                    None => String::new(),
                }
            })
            .into_owned()
    }

    fn variable(&self, name: &str) -> Option<String> {
        match name {
            "label" => Some("item".to_string()),
            "path" if self.path.is_root() => None,
            "path" => Some(format!("'{}'", self.path)),
            "value" => Some(match self.params.get("value") {
                Some(Param::Value(v)) => format_value(v),
                Some(Param::Text(t)) => t.clone(),
                None => "null".to_string(),
            }),
            _ => self.params.get(name).map(|param| match param {
                Param::Text(t) => t.clone(),
                Param::Value(Value::String(s)) => s.clone(),
                Param::Value(v) => v.to_string(),
            }),
        }
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"( ?)%(\w+)%").expect("placeholder pattern is valid"))
}

const MAX_QUOTED_CHARS: usize = 15;
const ELLIPSIS: &str = "...";

/// Formats an input value for inclusion in a message.
pub(crate) fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("'{}'", truncate(s)),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}

/// Shortens long strings, preferring to cut at a word boundary.
fn truncate(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= MAX_QUOTED_CHARS {
        return s.to_string();
    }

    let keep = MAX_QUOTED_CHARS - ELLIPSIS.len();
    let cut = (1..=keep)
        .rev()
        .find(|&n| is_boundary(chars[n]))
        .unwrap_or(keep);
    let mut out: String = chars[..cut].iter().collect();
    out.push_str(ELLIPSIS);
    out
}

fn is_boundary(c: char) -> bool {
    c.is_whitespace() || c.is_ascii_punctuation() || c.is_ascii_control()
}
