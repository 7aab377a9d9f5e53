//! The per-node stage pipeline shared by every schema type.
//!
//! Each node runs its input through the same ordered stages:
//!
//! 1. completion: an absent value becomes the default, or a missing-item error
//! 2. normalization: the `before` hook, applied once
//! 3. validation: the node's own checks (type, range, pattern, children)
//! 4. deprecation: a warning, if the node is deprecated
//! 5. finalization: the cast, then the assertions, only if validation passed

use std::sync::Arc;

use serde_json::Value;

use crate::cast::CastTarget;
use crate::context::Context;
use crate::error::{params, CastingError, ErrorKind, Param, Params};
use crate::item::Item;

type BeforeHook = Arc<dyn Fn(Value) -> Value + Send + Sync>;
type Predicate = Arc<dyn Fn(&Item) -> bool + Send + Sync>;

const DEFAULT_DEPRECATION: &str = "The item %path% is deprecated.";

#[derive(Clone)]
struct Assertion {
    predicate: Predicate,
    description: Option<String>,
    function: Option<String>,
}

impl Assertion {
    fn label(&self, index: usize) -> String {
        self.description
            .clone()
            .or_else(|| self.function.as_ref().map(|name| format!("{}()", name)))
            .unwrap_or_else(|| format!("#{}", index))
    }
}

/// Configuration common to every schema node.
///
/// Built through the [`Configure`] trait and never modified once processing
/// starts.
#[derive(Clone, Default)]
pub struct Base {
    required: bool,
    default: Option<Value>,
    before: Option<BeforeHook>,
    asserts: Vec<Assertion>,
    cast: Option<CastTarget>,
    deprecated: Option<String>,
}

/// Result of the completion stage.
pub(crate) enum Completion {
    /// The value was present and continues down the pipeline.
    Present(Value),
    /// The value was absent; this is the node's final result.
    Settled(Option<Item>),
}

impl Base {
    /// Returns true if absence is an error.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Returns the value substituted for an absent input.
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Returns the configured cast target.
    pub fn cast_target(&self) -> Option<&CastTarget> {
        self.cast.as_ref()
    }

    /// Returns the deprecation message, if the node is deprecated.
    pub fn deprecation(&self) -> Option<&str> {
        self.deprecated.as_deref()
    }

    pub(crate) fn complete(&self, value: Option<Value>, ctx: &mut Context) -> Completion {
        match value {
            Some(value) => Completion::Present(value),
            None if self.required => {
                ctx.add_error(
                    "The mandatory item %path% is missing.",
                    ErrorKind::MissingItem,
                    Params::new(),
                );
                Completion::Settled(None)
            }
            None => Completion::Settled(self.default.clone().map(Item::Value)),
        }
    }

    pub(crate) fn normalize(&self, value: Value) -> Value {
        match &self.before {
            Some(hook) => hook(value),
            None => value,
        }
    }

    pub(crate) fn emit_deprecation(&self, ctx: &mut Context) {
        if let Some(message) = &self.deprecated {
            ctx.add_warning(message.clone(), ErrorKind::Deprecated, Params::new());
        }
    }

    /// Casts, then runs the assertions in order. The first failing assertion
    /// is recorded and the node yields no value.
    pub(crate) fn finalize(&self, item: Item, ctx: &mut Context) -> Result<Option<Item>, CastingError> {
        let item = match &self.cast {
            Some(target) => target.apply(item, ctx.registry(), ctx.path())?,
            None => item,
        };

        for (index, assertion) in self.asserts.iter().enumerate() {
            if (assertion.predicate)(&item) {
                continue;
            }
            let template = if assertion.description.is_some() {
                "Failed assertion '%assertion%' for %label% %path% with value %value%."
            } else {
                "Failed assertion %assertion% for %label% %path% with value %value%."
            };
            ctx.add_error(
                template,
                ErrorKind::FailedAssertion,
                params([
                    ("value", item.to_param()),
                    ("assertion", Param::Text(assertion.label(index))),
                ]),
            );
            return Ok(None);
        }
        Ok(Some(item))
    }

    /// Runs the full pipeline. `check` is the node's validation stage; it
    /// reports into `ctx` and returns the best-effort value.
    pub(crate) fn run<F>(&self, value: Option<Value>, ctx: &mut Context, check: F) -> Result<Option<Item>, CastingError>
    where
        F: FnOnce(Value, &mut Context) -> Result<Item, CastingError>,
    {
        let value = match self.complete(value, ctx) {
            Completion::Present(value) => value,
            Completion::Settled(item) => return Ok(item),
        };
        let value = self.normalize(value);

        let errors_before = ctx.error_count();
        let item = check(value, ctx)?;
        self.emit_deprecation(ctx);

        if ctx.error_count() > errors_before {
            return Ok(Some(item));
        }
        self.finalize(item, ctx)
    }
}

/// Name of a predicate if it is a plain function, `None` for closures.
fn function_name<F>() -> Option<String> {
    let full = std::any::type_name::<F>();
    let last = full.rsplit("::").next()?;
    let is_ident = !last.is_empty()
        && last.chars().all(|c| c.is_alphanumeric() || c == '_')
        && !last.starts_with(|c: char| c.is_ascii_digit());
    is_ident.then(|| last.to_string())
}

/// Builder methods shared by every schema node.
///
/// # Example
///
/// ```rust
/// use inquest::{Configure, Processor, Schema};
/// use serde_json::json;
///
/// fn is_even(item: &inquest::Item) -> bool {
///     item.as_i64().is_some_and(|n| n % 2 == 0)
/// }
///
/// let workers = Schema::int()
///     .before(|v| if v.is_string() { json!(v.as_str().map_or(0, str::len)) } else { v })
///     .assert(is_even)
///     .default(json!(2));
///
/// let processed = Processor::new().process(&workers, json!("four")).unwrap();
/// assert_eq!(processed.value.unwrap(), json!(4));
/// ```
pub trait Configure: Sized {
    /// Gives access to the shared node configuration.
    fn base_mut(&mut self) -> &mut Base;

    /// Makes absence an error.
    fn required(mut self) -> Self {
        self.base_mut().required = true;
        self
    }

    /// Sets the value used when the input is absent. The default is not
    /// validated.
    fn default(mut self, value: impl Into<Value>) -> Self {
        self.base_mut().default = Some(value.into());
        self
    }

    /// Sets a transform applied to the input before validation.
    fn before<F>(mut self, hook: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.base_mut().before = Some(Arc::new(hook));
        self
    }

    /// Adds an assertion. A named function is reported by its name, a closure
    /// by its position.
    fn assert<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Item) -> bool + Send + Sync + 'static,
    {
        self.base_mut().asserts.push(Assertion {
            predicate: Arc::new(predicate),
            description: None,
            function: function_name::<F>(),
        });
        self
    }

    /// Adds an assertion reported by `description`.
    fn assert_described<F>(mut self, predicate: F, description: impl Into<String>) -> Self
    where
        F: Fn(&Item) -> bool + Send + Sync + 'static,
    {
        self.base_mut().asserts.push(Assertion {
            predicate: Arc::new(predicate),
            description: Some(description.into()),
            function: None,
        });
        self
    }

    /// Casts the validated value to a builtin type, or to a registered type
    /// by default construction and field assignment.
    fn cast_to(mut self, type_name: impl Into<String>) -> Self {
        self.base_mut().cast = Some(CastTarget::new(type_name));
        self
    }

    /// Casts the validated value to a builtin type, or to a registered type
    /// through its field descriptor table without running its constructor.
    fn cast_to_reflected(mut self, type_name: impl Into<String>) -> Self {
        self.base_mut().cast = Some(CastTarget::reflected(type_name));
        self
    }

    /// Marks the node deprecated with the default message.
    fn deprecated(self) -> Self {
        self.deprecated_with(DEFAULT_DEPRECATION)
    }

    /// Marks the node deprecated. The message may use `%path%`.
    fn deprecated_with(mut self, message: impl Into<String>) -> Self {
        self.base_mut().deprecated = Some(message.into());
        self
    }
}
