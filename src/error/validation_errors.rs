//! Accumulated soft errors of a processing run.
//!
//! [`ValidationErrors`] wraps a `NonEmptyVec<Message>` so a failed run always
//! carries at least one error. Warnings raised during the same run travel
//! alongside the errors.

use std::fmt::{self, Display};

use stillwater::prelude::*;

use crate::error::message::{ErrorKind, Message};
use crate::path::Path;

/// A non-empty collection of errors from a processing run.
///
/// # Combining Errors
///
/// `ValidationErrors` implements `Semigroup`, so failures of several runs
/// (for example one per configuration file) can be merged into one report:
///
/// ```rust
/// use inquest::{ErrorKind, Message, Params, Path, ValidationErrors};
/// use stillwater::prelude::*;
///
/// let missing = |key: &str| {
///     let mut path = Path::root();
///     path.push_key(key);
///     Message::new("The mandatory item %path% is missing.", ErrorKind::MissingItem, path, Params::new())
/// };
///
/// let combined = ValidationErrors::single(missing("host"))
///     .combine(ValidationErrors::single(missing("port")));
/// assert_eq!(combined.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors {
    errors: NonEmptyVec<Message>,
    warnings: Vec<Message>,
}

impl ValidationErrors {
    /// Creates a `ValidationErrors` containing a single error.
    pub fn single(error: Message) -> Self {
        Self {
            errors: NonEmptyVec::singleton(error),
            warnings: Vec::new(),
        }
    }

    /// Creates a `ValidationErrors` from a `NonEmptyVec` of errors.
    pub fn from_non_empty(errors: NonEmptyVec<Message>) -> Self {
        Self {
            errors,
            warnings: Vec::new(),
        }
    }

    /// Creates a `ValidationErrors` from a vec, or None if it is empty.
    pub fn from_vec(errors: Vec<Message>) -> Option<Self> {
        NonEmptyVec::from_vec(errors).map(Self::from_non_empty)
    }

    /// Attaches the warnings raised during the same run.
    pub fn with_warnings(mut self, warnings: Vec<Message>) -> Self {
        self.warnings = warnings;
        self
    }

    /// Returns the number of errors in this collection.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Always false; the collection is guaranteed non-empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns an iterator over the errors.
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.errors.iter()
    }

    /// Returns the first error.
    pub fn first(&self) -> &Message {
        self.errors.head()
    }

    /// Returns all errors raised at the given path.
    pub fn at_path(&self, path: &Path) -> Vec<&Message> {
        self.errors.iter().filter(|e| &e.path == path).collect()
    }

    /// Returns all errors of the given kind.
    pub fn with_kind(&self, kind: ErrorKind) -> Vec<&Message> {
        self.errors.iter().filter(|e| e.kind == kind).collect()
    }

    /// Renders every error into its final human-readable form.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(Message::render).collect()
    }

    /// Returns the warnings raised during the same run.
    pub fn warnings(&self) -> &[Message] {
        &self.warnings
    }

    /// Converts this collection into a `Vec<Message>` of errors.
    pub fn into_vec(self) -> Vec<Message> {
        self.errors.into_vec()
    }
}

impl Semigroup for ValidationErrors {
    fn combine(mut self, other: Self) -> Self {
        self.warnings.extend(other.warnings);
        Self {
            errors: self.errors.combine(other.errors),
            warnings: self.warnings,
        }
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} error(s):", self.len())?;
        for (i, error) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = Message;
    type IntoIter = std::vec::IntoIter<Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_vec().into_iter()
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ValidationErrors>();
    assert_sync::<ValidationErrors>();
};
