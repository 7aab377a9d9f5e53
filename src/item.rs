//! Values produced by processing.
//!
//! Processing turns raw `serde_json::Value` input into an [`Item`]. Leaves
//! stay plain JSON values; structures and collections become maps and lists
//! of items; a cast into a structured type produces an [`Instance`].

use std::any::Any;
use std::fmt;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::{format_value, Param};

/// The final value of a processed node.
pub enum Item {
    /// A plain JSON value.
    Value(Value),
    /// The processed fields of a structure or map, in order.
    Map(IndexMap<String, Item>),
    /// The processed elements of a list.
    List(Vec<Item>),
    /// An instance of a registered structured type.
    Instance(Instance),
}

impl Item {
    /// Returns the plain JSON value, if this is one.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Item::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the string slice of a JSON string item.
    pub fn as_str(&self) -> Option<&str> {
        self.as_value().and_then(Value::as_str)
    }

    /// Returns the integer of a JSON number item.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_value().and_then(Value::as_i64)
    }

    /// Returns the entry for `key` of a map item.
    pub fn get(&self, key: &str) -> Option<&Item> {
        match self {
            Item::Map(map) => map.get(key),
            _ => None,
        }
    }

    /// Returns the instance, if this is one.
    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Item::Instance(instance) => Some(instance),
            _ => None,
        }
    }

    /// Borrows the instance as `T`, if this is an instance of `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_instance().and_then(Instance::downcast_ref)
    }

    /// Converts to JSON. Returns None if the tree contains an instance.
    pub fn to_json(&self) -> Option<Value> {
        match self {
            Item::Value(v) => Some(v.clone()),
            Item::Map(map) => map
                .iter()
                .map(|(k, v)| v.to_json().map(|v| (k.clone(), v)))
                .collect::<Option<Map<String, Value>>>()
                .map(Value::Object),
            Item::List(items) => items
                .iter()
                .map(Item::to_json)
                .collect::<Option<Vec<_>>>()
                .map(Value::Array),
            Item::Instance(_) => None,
        }
    }

    /// Splits a mapping into its entries.
    ///
    /// Accepts both processed maps and raw JSON objects. On failure the
    /// item is handed back.
    pub fn into_entries(self) -> Result<Vec<(String, Item)>, Item> {
        match self {
            Item::Map(map) => Ok(map.into_iter().collect()),
            Item::Value(Value::Object(map)) => Ok(map
                .into_iter()
                .map(|(k, v)| (k, Item::Value(v)))
                .collect()),
            other => Err(other),
        }
    }

    /// Short description of the item's shape.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Item::Value(Value::Null) => "null",
            Item::Value(Value::Bool(_)) => "bool",
            Item::Value(Value::Number(_)) => "number",
            Item::Value(Value::String(_)) => "string",
            Item::Value(Value::Array(_)) | Item::List(_) => "list",
            Item::Value(Value::Object(_)) | Item::Map(_) => "map",
            Item::Instance(_) => "instance",
        }
    }

    /// Converts the item into a message parameter.
    pub(crate) fn to_param(&self) -> Param {
        match self {
            Item::Instance(instance) => Param::Text(format!("object {}", instance.type_name())),
            Item::Value(v) => Param::Value(v.clone()),
            Item::Map(_) => Param::Value(Value::Object(Map::new())),
            Item::List(_) => Param::Value(Value::Array(Vec::new())),
        }
    }
}

impl From<Value> for Item {
    fn from(value: Value) -> Self {
        Item::Value(value)
    }
}

impl From<Instance> for Item {
    fn from(instance: Instance) -> Self {
        Item::Instance(instance)
    }
}

impl PartialEq for Item {
    /// Instances never compare equal.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Item::Value(a), Item::Value(b)) => a == b,
            (Item::Map(a), Item::Map(b)) => a == b,
            (Item::List(a), Item::List(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialEq<Value> for Item {
    fn eq(&self, other: &Value) -> bool {
        self.to_json().as_ref() == Some(other)
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Value(v) => write!(f, "Value({})", v),
            Item::Map(map) => f.debug_map().entries(map.iter()).finish(),
            Item::List(items) => f.debug_list().entries(items.iter()).finish(),
            Item::Instance(instance) => instance.fmt(f),
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Value(v) => f.write_str(&format_value(v)),
            Item::Map(_) => f.write_str("object"),
            Item::List(_) => f.write_str("array"),
            Item::Instance(instance) => write!(f, "object {}", instance.type_name()),
        }
    }
}

/// A value of a registered structured type, produced by casting.
pub struct Instance {
    type_name: String,
    inner: Box<dyn Any + Send + Sync>,
}

impl Instance {
    /// Wraps a value under its registered type name.
    pub fn new<T: Any + Send + Sync>(type_name: impl Into<String>, value: T) -> Self {
        Self::from_boxed(type_name, Box::new(value))
    }

    pub(crate) fn from_boxed(type_name: impl Into<String>, inner: Box<dyn Any + Send + Sync>) -> Self {
        Self {
            type_name: type_name.into(),
            inner,
        }
    }

    /// Returns the registered type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns true if the wrapped value is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Borrows the wrapped value as `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Takes the wrapped value out as `T`, or returns the instance unchanged.
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        let type_name = self.type_name;
        match self.inner.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(inner) => Err(Self { type_name, inner }),
        }
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Instance({})", self.type_name)
    }
}

/// A target type that accepts fields assigned one at a time after its normal
/// default construction.
///
/// Implement this for types used with [`cast_to`](crate::Configure::cast_to)
/// and register them with
/// [`TypeRegistry::register_assignable`](crate::TypeRegistry::register_assignable).
pub trait AssignFields: Default + Any + Send + Sync {
    /// Stores `value` under `name`.
    fn assign(&mut self, name: String, value: Item);
}

/// An open attribute bag: accepts any field name.
#[derive(Debug, Default, PartialEq)]
pub struct Attributes(IndexMap<String, Item>);

impl Attributes {
    /// Returns the attribute stored under `name`.
    pub fn get(&self, name: &str) -> Option<&Item> {
        self.0.get(name)
    }

    /// Returns the number of attributes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no attribute was assigned.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates attributes in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Item)> {
        self.0.iter()
    }
}

impl AssignFields for Attributes {
    fn assign(&mut self, name: String, value: Item) {
        self.0.insert(name, value);
    }
}
