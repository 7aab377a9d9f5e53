//! Location tracking inside the input tree.
//!
//! This module provides [`Path`] and [`PathSegment`]. A single `Path` lives in
//! the [`Context`](crate::Context) for the whole processing run; composite
//! schemas push a segment before descending into a child and pop it afterwards.
//! Every recorded message keeps a snapshot of the path at the moment it was
//! raised.

use std::fmt::{self, Display};

/// A segment of a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A mapping key (e.g. `database`, `port`)
    Key(String),
    /// A sequence index (e.g. `0`, `42`)
    Index(usize),
}

impl PathSegment {
    /// Creates a new key segment.
    pub fn key(name: impl Into<String>) -> Self {
        PathSegment::Key(name.into())
    }

    /// Creates a new index segment.
    pub fn index(idx: usize) -> Self {
        PathSegment::Index(idx)
    }
}

impl Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(name) => write!(f, "{}", name),
            PathSegment::Index(idx) => write!(f, "{}", idx),
        }
    }
}

/// The location of a value inside the input tree.
///
/// Segments are rendered joined by ` › ` (with non-breaking spaces), which is
/// the form used when the `%path%` placeholder of a message is rendered.
///
/// # Example
///
/// ```rust
/// use inquest::Path;
///
/// let mut path = Path::root();
/// path.push_key("database");
/// path.push_index(0);
/// path.push_key("host");
///
/// assert_eq!(path.to_string(), "database\u{a0}›\u{a0}0\u{a0}›\u{a0}host");
/// path.pop();
/// assert_eq!(path.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    /// Creates an empty path representing the root value.
    pub fn root() -> Self {
        Self::default()
    }

    /// Builds a path from a sequence of segments.
    pub fn from_segments(segments: impl IntoIterator<Item = PathSegment>) -> Self {
        Self {
            segments: segments.into_iter().collect(),
        }
    }

    /// Appends a segment.
    pub fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    /// Appends a key segment.
    pub fn push_key(&mut self, name: impl Into<String>) {
        self.push(PathSegment::Key(name.into()));
    }

    /// Appends an index segment.
    pub fn push_index(&mut self, index: usize) {
        self.push(PathSegment::Index(index));
    }

    /// Removes and returns the last segment, or None at the root.
    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }

    /// Returns true if this is the root path (no segments).
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the number of segments in this path.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if this path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "\u{a0}›\u{a0}")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}
