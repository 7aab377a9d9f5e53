//! Field descriptor tables for casting into structured types.
//!
//! Rust has no runtime reflection, so a target type is described once, when
//! it is registered, by a [`TypeDescriptor`]: how to allocate a blank value
//! without going through the type's normal constructor, and one setter per
//! field name. The descriptor is erased into a [`Blueprint`], which builds
//! instances in two checked phases:
//!
//! 1. [`Blueprint::allocate_blank`] yields a [`PartialInstance`]
//! 2. [`PartialInstance::set_field`] is called once per input key
//! 3. [`PartialInstance::finalize`] yields the finished [`Instance`]

use std::any::Any;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;

use crate::error::ReflectionError;
use crate::item::{AssignFields, Instance, Item};

type TypedSetter<T> = Box<dyn Fn(&mut T, Item) -> Result<(), ReflectionError> + Send + Sync>;
type ErasedSetter =
    Box<dyn Fn(&mut (dyn Any + Send + Sync), Item) -> Result<(), ReflectionError> + Send + Sync>;
type ErasedBlank = Box<dyn Fn() -> Box<dyn Any + Send + Sync> + Send + Sync>;

/// Describes how to build a `T` field by field.
///
/// # Example
///
/// ```rust
/// use inquest::TypeDescriptor;
///
/// struct Endpoint {
///     host: String,
///     port: u16,
/// }
///
/// let descriptor = TypeDescriptor::new("Endpoint", || Endpoint { host: String::new(), port: 0 })
///     .field("host", |e: &mut Endpoint, host: String| e.host = host)
///     .field("port", |e: &mut Endpoint, port: u16| e.port = port);
///
/// assert_eq!(descriptor.name(), "Endpoint");
/// ```
pub struct TypeDescriptor<T> {
    name: String,
    blank: Box<dyn Fn() -> T + Send + Sync>,
    fields: IndexMap<String, TypedSetter<T>>,
}

impl<T: Any + Send + Sync> TypeDescriptor<T> {
    /// Starts a descriptor. `blank` produces an empty value to be filled in;
    /// it stands in for the type's real constructor.
    pub fn new(name: impl Into<String>, blank: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self {
            name: name.into(),
            blank: Box::new(blank),
            fields: IndexMap::new(),
        }
    }

    /// Returns the registered type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declares a field whose value is deserialized into `V`.
    ///
    /// A value of the wrong shape is rejected with
    /// [`ReflectionError::FieldType`].
    pub fn field<V, F>(self, name: impl Into<String>, set: F) -> Self
    where
        V: DeserializeOwned,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let name = name.into();
        let field = name.clone();
        self.raw_field(name, move |target, item| {
            let json = item.to_json().ok_or_else(|| ReflectionError::FieldRejected {
                field: field.clone(),
                reason: "an instance cannot be converted to a plain value".to_string(),
            })?;
            let value = serde_json::from_value::<V>(json).map_err(|source| {
                ReflectionError::FieldType {
                    field: field.clone(),
                    source,
                }
            })?;
            set(target, value);
            Ok(())
        })
    }

    /// Declares a field holding a nested cast instance of type `U`.
    pub fn nested<U, F>(self, name: impl Into<String>, set: F) -> Self
    where
        U: Any,
        F: Fn(&mut T, U) + Send + Sync + 'static,
    {
        let name = name.into();
        let field = name.clone();
        self.raw_field(name, move |target, item| {
            let rejected = |reason: String| ReflectionError::FieldRejected {
                field: field.clone(),
                reason,
            };
            match item {
                Item::Instance(instance) => {
                    let value = instance
                        .downcast::<U>()
                        .map_err(|i| rejected(format!("unexpected instance of {}", i.type_name())))?;
                    set(target, value);
                    Ok(())
                }
                other => Err(rejected(format!("expected an instance, found {}", other.kind_name()))),
            }
        })
    }

    /// Declares a field with a setter that receives the raw item.
    pub fn raw_field<F>(mut self, name: impl Into<String>, set: F) -> Self
    where
        F: Fn(&mut T, Item) -> Result<(), ReflectionError> + Send + Sync + 'static,
    {
        self.fields.insert(name.into(), Box::new(set));
        self
    }

    /// Erases the descriptor into a [`Blueprint`].
    pub fn into_blueprint(self) -> Blueprint {
        let blank = self.blank;
        let fields = self
            .fields
            .into_iter()
            .map(|(name, set)| {
                let field = name.clone();
                let erased: ErasedSetter = Box::new(move |target: &mut (dyn Any + Send + Sync), item: Item| {
                    let target = target.downcast_mut::<T>().ok_or_else(|| {
                        ReflectionError::FieldRejected {
                            field: field.clone(),
                            reason: "blank value has an unexpected type".to_string(),
                        }
                    })?;
                    set(target, item)
                });
                (name, erased)
            })
            .collect();

        Blueprint {
            name: self.name,
            blank: Box::new(move || Box::new(blank()) as Box<dyn Any + Send + Sync>),
            fields,
        }
    }
}

/// A type-erased field descriptor table.
pub struct Blueprint {
    name: String,
    blank: ErasedBlank,
    fields: IndexMap<String, ErasedSetter>,
}

impl Blueprint {
    /// Returns the registered type name.
    pub fn type_name(&self) -> &str {
        &self.name
    }

    /// Returns true if the type declares `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns the declared field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Allocates a blank value, bypassing the type's constructor.
    pub fn allocate_blank(&self) -> PartialInstance<'_> {
        PartialInstance {
            blueprint: self,
            value: (self.blank)(),
        }
    }
}

/// A blank instance being filled in field by field.
pub struct PartialInstance<'a> {
    blueprint: &'a Blueprint,
    value: Box<dyn Any + Send + Sync>,
}

impl PartialInstance<'_> {
    /// Writes one field.
    pub fn set_field(&mut self, field: &str, value: Item) -> Result<(), ReflectionError> {
        let set = self
            .blueprint
            .fields
            .get(field)
            .ok_or_else(|| ReflectionError::UnknownField {
                type_name: self.blueprint.name.clone(),
                field: field.to_string(),
            })?;
        set(self.value.as_mut(), value)
    }

    /// Completes construction.
    pub fn finalize(self) -> Instance {
        Instance::from_boxed(self.blueprint.name.clone(), self.value)
    }
}

/// Builds instances of a type through its normal default construction
/// followed by open field assignment.
pub struct Assignable {
    name: String,
    build: Box<dyn Fn(Vec<(String, Item)>) -> Instance + Send + Sync>,
}

impl Assignable {
    /// Describes `T` under the given name.
    pub fn of<T: AssignFields>(name: impl Into<String>) -> Self {
        let name = name.into();
        let type_name = name.clone();
        Self {
            name,
            build: Box::new(move |entries| {
                let mut target = T::default();
                for (field, value) in entries {
                    target.assign(field, value);
                }
                Instance::new(type_name.clone(), target)
            }),
        }
    }

    /// Returns the registered type name.
    pub fn type_name(&self) -> &str {
        &self.name
    }

    /// Constructs a value and assigns every entry to it.
    pub fn construct(&self, entries: Vec<(String, Item)>) -> Instance {
        (self.build)(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Attributes;
    use serde_json::json;

    #[derive(Debug, PartialEq)]
    struct Pair {
        left: String,
        right: i64,
    }

    fn pair_blueprint() -> Blueprint {
        TypeDescriptor::new("Pair", || Pair {
            left: String::new(),
            right: 0,
        })
        .field("left", |p: &mut Pair, v: String| p.left = v)
        .field("right", |p: &mut Pair, v: i64| p.right = v)
        .into_blueprint()
    }

    #[test]
    fn test_two_phase_build() {
        let blueprint = pair_blueprint();
        let mut partial = blueprint.allocate_blank();
        partial.set_field("left", Item::Value(json!("l"))).unwrap();
        partial.set_field("right", Item::Value(json!(7))).unwrap();

        let instance = partial.finalize();
        assert_eq!(instance.type_name(), "Pair");
        assert_eq!(
            instance.downcast_ref::<Pair>(),
            Some(&Pair {
                left: "l".into(),
                right: 7
            })
        );
    }

    #[test]
    fn test_unknown_field() {
        let blueprint = pair_blueprint();
        let mut partial = blueprint.allocate_blank();
        let err = partial.set_field("middle", Item::Value(json!(1))).unwrap_err();
        assert!(matches!(err, ReflectionError::UnknownField { ref field, .. } if field == "middle"));
    }

    #[test]
    fn test_field_type_mismatch_keeps_source() {
        let blueprint = pair_blueprint();
        let mut partial = blueprint.allocate_blank();
        let err = partial
            .set_field("right", Item::Value(json!("seven")))
            .unwrap_err();
        assert!(matches!(err, ReflectionError::FieldType { .. }));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_nested_instance_field() {
        struct Outer {
            inner: Option<Pair>,
        }
        let blueprint = TypeDescriptor::new("Outer", || Outer { inner: None })
            .nested("inner", |o: &mut Outer, p: Pair| o.inner = Some(p))
            .into_blueprint();

        let mut partial = blueprint.allocate_blank();
        let pair = Instance::new(
            "Pair",
            Pair {
                left: "a".into(),
                right: 1,
            },
        );
        partial.set_field("inner", Item::Instance(pair)).unwrap();
        let outer = partial.finalize();
        assert!(outer.downcast_ref::<Outer>().unwrap().inner.is_some());

        let mut partial = blueprint.allocate_blank();
        assert!(partial.set_field("inner", Item::Value(json!(1))).is_err());
    }

    #[test]
    fn test_assignable_accepts_any_key() {
        let assignable = Assignable::of::<Attributes>("Attributes");
        let instance = assignable.construct(vec![
            ("anything".into(), Item::Value(json!(1))),
            ("else".into(), Item::Value(json!("x"))),
        ]);
        let attrs = instance.downcast_ref::<Attributes>().unwrap();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get("else").and_then(Item::as_str), Some("x"));
    }
}
