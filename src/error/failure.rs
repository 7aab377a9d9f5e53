//! Hard failures that abort a processing run.

use crate::error::validation_errors::ValidationErrors;
use crate::path::Path;

/// The underlying reason a value could not be cast into a target type.
#[derive(Debug, thiserror::Error)]
pub enum ReflectionError {
    /// No type with this name is registered.
    #[error("type '{0}' is not registered")]
    UnknownType(String),

    /// The type is registered, but not for the requested cast mode.
    #[error("type '{type_name}' does not support {mode} casting")]
    ModeUnsupported {
        type_name: String,
        mode: &'static str,
    },

    /// The type has no field with this name.
    #[error("type '{type_name}' has no field '{field}'")]
    UnknownField { type_name: String, field: String },

    /// The field exists but the value has the wrong shape for it.
    #[error("field '{field}' rejected the value")]
    FieldType {
        field: String,
        #[source]
        source: serde_json::Error,
    },

    /// The field setter refused the value.
    #[error("field '{field}' rejected the value: {reason}")]
    FieldRejected { field: String, reason: String },

    /// Field-wise casting needs a key/value mapping.
    #[error("expected a mapping to assign fields from, found {found}")]
    NotAMapping { found: &'static str },
}

/// A cast into a structured type failed.
///
/// Unlike soft validation errors, a `CastingError` is never accumulated: it
/// aborts the processing run and is returned to the caller directly. The
/// reflection failure that caused it is available through
/// [`std::error::Error::source`].
#[derive(Debug, thiserror::Error)]
#[error("Failed casting to type {target}")]
pub struct CastingError {
    /// Name of the target type.
    pub target: String,
    /// Location of the node whose value was being cast.
    pub path: Path,
    #[source]
    source: ReflectionError,
}

impl CastingError {
    /// Wraps a reflection failure for the given target type.
    pub fn new(target: impl Into<String>, path: Path, source: ReflectionError) -> Self {
        Self {
            target: target.into(),
            path,
            source,
        }
    }

    /// Returns the underlying reflection failure.
    pub fn reflection(&self) -> &ReflectionError {
        &self.source
    }
}

/// Either failure class of a processing run, for callers that want a plain
/// `Result`.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// One or more soft errors were recorded.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// A cast aborted the run.
    #[error(transparent)]
    Casting(#[from] CastingError),
}

impl ProcessError {
    /// Returns the soft errors, if this is a validation failure.
    pub fn validation(&self) -> Option<&ValidationErrors> {
        match self {
            ProcessError::Validation(errors) => Some(errors),
            ProcessError::Casting(_) => None,
        }
    }

    /// Returns the casting failure, if this is one.
    pub fn casting(&self) -> Option<&CastingError> {
        match self {
            ProcessError::Casting(error) => Some(error),
            ProcessError::Validation(_) => None,
        }
    }
}
