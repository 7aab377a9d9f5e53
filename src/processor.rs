//! Top-level entry point.
//!
//! This module provides [`Processor`], which runs a schema over one input
//! document with a fresh [`Context`] and turns the collected messages into a
//! result.

use serde_json::Value;
use stillwater::Validation;

use crate::context::Context;
use crate::error::{CastingError, Message, ProcessError, ValidationErrors};
use crate::item::Item;
use crate::registry::TypeRegistry;
use crate::schema::SchemaLike;
use crate::ValidationResult;

/// The outcome of a successful run.
#[derive(Debug)]
pub struct Processed {
    /// The final value, or `None` if the root contributed no value.
    pub value: Option<Item>,
    /// Deprecation warnings raised along the way.
    pub warnings: Vec<Message>,
}

/// Runs schemas over input documents.
///
/// Each call gets its own [`Context`]; nothing mutable is shared between
/// calls, so a single processor can serve many threads. The [`TypeRegistry`]
/// is shared and resolves cast targets.
///
/// # Example
///
/// ```rust
/// use inquest::{Configure, Processor, Schema};
/// use serde_json::json;
///
/// let schema = Schema::structure()
///     .field("name", Schema::string().required())
///     .field("legacy", Schema::bool().deprecated());
///
/// let processor = Processor::new();
///
/// let processed = processor
///     .process(&schema, json!({"name": "api", "legacy": true}))
///     .unwrap();
/// assert_eq!(processed.warnings[0].render(), "The item 'legacy' is deprecated.");
///
/// let err = processor.process(&schema, json!({})).unwrap_err();
/// assert_eq!(
///     err.validation().unwrap().messages(),
///     vec!["The mandatory item 'name' is missing."]
/// );
/// ```
#[derive(Clone, Default)]
pub struct Processor {
    registry: TypeRegistry,
}

impl Processor {
    /// Creates a processor with a fresh registry holding only
    /// [`Attributes`](crate::Attributes).
    pub fn new() -> Self {
        Self::with_registry(TypeRegistry::new())
    }

    /// Creates a processor resolving cast targets in `registry`.
    pub fn with_registry(registry: TypeRegistry) -> Self {
        Self { registry }
    }

    /// Returns the registry used to resolve cast targets.
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Processes `data` (`None` for an absent document).
    ///
    /// Soft errors are accumulated into `Validation::Failure`, together with
    /// the warnings of the same run.
    ///
    /// # Errors
    ///
    /// Returns `CastingError` if casting into a structured type fails. The
    /// run stops at that point.
    pub fn validate<S>(&self, schema: &S, data: impl Into<Option<Value>>) -> Result<ValidationResult<Processed>, CastingError>
    where
        S: SchemaLike + ?Sized,
    {
        let mut ctx = Context::new(self.registry.clone());
        let value = schema.validate(data.into(), &mut ctx)?;
        let (errors, warnings) = ctx.into_parts();
        tracing::debug!(errors = errors.len(), warnings = warnings.len(), "processing finished");

        Ok(match ValidationErrors::from_vec(errors) {
            Some(errors) => Validation::Failure(errors.with_warnings(warnings)),
            None => Validation::Success(Processed { value, warnings }),
        })
    }

    /// Processes `data`, flattening soft and hard failures into one error.
    pub fn process<S>(&self, schema: &S, data: impl Into<Option<Value>>) -> Result<Processed, ProcessError>
    where
        S: SchemaLike + ?Sized,
    {
        Ok(self.validate(schema, data)?.into_result()?)
    }

    /// Processes many documents in parallel, each with its own context.
    /// Results come back in input order.
    #[cfg(feature = "parallel")]
    pub fn process_batch<S>(&self, schema: &S, documents: Vec<Value>) -> Vec<Result<Processed, ProcessError>>
    where
        S: SchemaLike + ?Sized,
    {
        use rayon::prelude::*;

        documents
            .into_par_iter()
            .map(|document| self.process(schema, document))
            .collect()
    }
}
