//! Registry of cast targets.
//!
//! This module provides the [`TypeRegistry`] type that maps type names to the
//! descriptors used when casting validated values into structured types.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::item::{AssignFields, Attributes};
use crate::reflect::{Assignable, Blueprint, TypeDescriptor};

/// How a registered type is constructed.
pub enum TypeEntry {
    /// Blank allocation followed by checked per-field setters.
    Reflective(Blueprint),
    /// Default construction followed by open field assignment.
    Assignable(Assignable),
}

impl TypeEntry {
    /// Returns the registered type name.
    pub fn type_name(&self) -> &str {
        match self {
            TypeEntry::Reflective(blueprint) => blueprint.type_name(),
            TypeEntry::Assignable(assignable) => assignable.type_name(),
        }
    }
}

/// Type alias for the entry storage map.
type TypeMap = Arc<RwLock<HashMap<String, Arc<TypeEntry>>>>;

/// A thread-safe registry of cast targets.
///
/// Types are registered once, while the schema is being set up; processing
/// runs then look them up by the name given to
/// [`cast_to`](crate::Configure::cast_to) or
/// [`cast_to_reflected`](crate::Configure::cast_to_reflected).
///
/// # Thread Safety
///
/// The registry uses `Arc<RwLock<...>>`; clones share the same table, so a
/// registry can be handed to several processors and concurrent runs.
///
/// # Example
///
/// ```rust
/// use inquest::{TypeDescriptor, TypeRegistry};
///
/// #[derive(Default)]
/// struct Limits {
///     max_connections: u32,
/// }
///
/// let registry = TypeRegistry::new();
/// registry
///     .register(
///         TypeDescriptor::new("Limits", Limits::default)
///             .field("max_connections", |l: &mut Limits, n: u32| l.max_connections = n),
///     )
///     .unwrap();
///
/// assert!(registry.contains("Limits"));
/// assert!(registry.contains("Attributes"));
/// ```
pub struct TypeRegistry {
    types: TypeMap,
}

impl TypeRegistry {
    /// Creates a registry holding only the open [`Attributes`] type.
    pub fn new() -> Self {
        let registry = Self::empty();
        registry.types.write().insert(
            "Attributes".to_string(),
            Arc::new(TypeEntry::Assignable(Assignable::of::<Attributes>("Attributes"))),
        );
        registry
    }

    /// Creates a registry with no types at all.
    pub fn empty() -> Self {
        Self {
            types: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Registers a type built through its field descriptor table.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateName` if the name is already taken.
    pub fn register<T>(&self, descriptor: TypeDescriptor<T>) -> Result<(), RegistryError>
    where
        T: std::any::Any + Send + Sync,
    {
        let blueprint = descriptor.into_blueprint();
        let name = blueprint.type_name().to_string();
        self.insert(name, TypeEntry::Reflective(blueprint))
    }

    /// Registers a type built by default construction and open field
    /// assignment.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateName` if the name is already taken.
    pub fn register_assignable<T: AssignFields>(
        &self,
        name: impl Into<String>,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        let entry = TypeEntry::Assignable(Assignable::of::<T>(name.clone()));
        self.insert(name, entry)
    }

    fn insert(&self, name: String, entry: TypeEntry) -> Result<(), RegistryError> {
        let mut types = self.types.write();
        if types.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }
        tracing::debug!(type_name = %name, "cast target registered");
        types.insert(name, Arc::new(entry));
        Ok(())
    }

    /// Retrieves a type entry by name.
    pub fn get(&self, name: &str) -> Option<Arc<TypeEntry>> {
        self.types.read().get(name).cloned()
    }

    /// Returns true if a type with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.types.read().contains_key(name)
    }

    /// Returns the registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.types.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for TypeRegistry {
    fn clone(&self) -> Self {
        Self {
            types: Arc::clone(&self.types),
        }
    }
}

/// Errors that can occur during registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Attempted to register a type with a name that already exists.
    #[error("type '{0}' already registered")]
    DuplicateName(String),
}
