//! The error context shared by every node of one processing run.
//!
//! This module provides the [`Context`] type. One `Context` is created per
//! top-level call and passed by mutable reference through the whole recursive
//! descent. Nodes report into it and never abort on soft errors; composite
//! nodes push and pop path segments around each child.

use crate::error::{ErrorKind, Message, Params};
use crate::path::{Path, PathSegment};
use crate::registry::TypeRegistry;

/// Accumulates errors and warnings and tracks the current path.
///
/// The context also carries the [`TypeRegistry`] used to resolve cast
/// targets. The registry handle is cheap to clone and is shared with forked
/// contexts.
///
/// # Example
///
/// ```rust
/// use inquest::{Context, ErrorKind, Params, PathSegment, TypeRegistry};
///
/// let mut ctx = Context::new(TypeRegistry::new());
/// ctx.within(PathSegment::key("port"), |ctx| {
///     ctx.add_error("The mandatory item %path% is missing.", ErrorKind::MissingItem, Params::new());
/// });
///
/// assert!(ctx.path().is_root());
/// assert_eq!(ctx.errors()[0].render(), "The mandatory item 'port' is missing.");
/// ```
pub struct Context {
    errors: Vec<Message>,
    warnings: Vec<Message>,
    path: Path,
    registry: TypeRegistry,
}

impl Context {
    /// Creates an empty context rooted at the top of the input tree.
    pub fn new(registry: TypeRegistry) -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            path: Path::root(),
            registry,
        }
    }

    /// Records an error at the current path.
    pub fn add_error(&mut self, template: impl Into<String>, kind: ErrorKind, params: Params) {
        let message = Message::new(template, kind, self.path.clone(), params);
        tracing::trace!(code = kind.code(), path = %message.path, "error recorded");
        self.errors.push(message);
    }

    /// Records a warning at the current path.
    pub fn add_warning(&mut self, template: impl Into<String>, kind: ErrorKind, params: Params) {
        let message = Message::new(template, kind, self.path.clone(), params);
        tracing::trace!(code = kind.code(), path = %message.path, "warning recorded");
        self.warnings.push(message);
    }

    /// Returns the current path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Descends into a child location.
    pub fn push(&mut self, segment: PathSegment) {
        self.path.push(segment);
    }

    /// Returns from the innermost child location.
    pub fn pop(&mut self) -> Option<PathSegment> {
        self.path.pop()
    }

    /// Runs `f` with `segment` pushed onto the path, popping it afterwards.
    pub fn within<T>(&mut self, segment: PathSegment, f: impl FnOnce(&mut Self) -> T) -> T {
        self.push(segment);
        let out = f(self);
        self.pop();
        out
    }

    /// Returns the errors recorded so far, in the order they were raised.
    pub fn errors(&self) -> &[Message] {
        &self.errors
    }

    /// Returns the warnings recorded so far, in the order they were raised.
    pub fn warnings(&self) -> &[Message] {
        &self.warnings
    }

    /// Returns the number of errors recorded so far.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Returns true if at least one error was recorded.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns the registry used to resolve cast targets.
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Consumes the context, returning `(errors, warnings)`.
    pub fn into_parts(self) -> (Vec<Message>, Vec<Message>) {
        (self.errors, self.warnings)
    }

    /// Creates an empty context at the same path, sharing the registry.
    pub(crate) fn fork(&self) -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            path: self.path.clone(),
            registry: self.registry.clone(),
        }
    }

    pub(crate) fn extend_errors(&mut self, errors: impl IntoIterator<Item = Message>) {
        self.errors.extend(errors);
    }

    pub(crate) fn extend_warnings(&mut self, warnings: impl IntoIterator<Item = Message>) {
        self.warnings.extend(warnings);
    }
}
