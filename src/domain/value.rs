// SPDX-License-Identifier: MIT OR Apache-2.0

//! The tagged document tree node.
//!
//! This module provides [`Value`], a tagged union that is either a scalar leaf
//! (null, signed/unsigned integer, real, string, boolean) or a composite node
//! (array or object). Codecs walk a `Value` tree to produce or consume an external
//! representation; the configuration store keeps a flat map of them.
//!
//! # Containers
//!
//! - [`ArrayList`] is an ordered `Vec<Value>`. An element must never itself be an
//!   array. That rule is *not* checked when the tree is built; codecs reject such
//!   a tree when they try to write it.
//! - [`ObjectMap`] is a `BTreeMap<String, Value>`. Keys are unique and iterate in
//!   sorted order, so insertion order does not survive a round trip.
//!
//! # Accessors
//!
//! Typed accessors never fail. Asking a value for a type it does not hold yields a
//! zero-equivalent default (`0`, `0.0`, `false`, `""`).

use crate::domain::iter::Iter;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Index, IndexMut};

/// Ordered sequence of child values.
pub type ArrayList = Vec<Value>;

/// Key-to-value mapping with unique keys, iterated in key order.
pub type ObjectMap = BTreeMap<String, Value>;

static NULL: Value = Value::Null;

/// The discriminant of a [`Value`].
///
/// # Examples
///
/// ```
/// use treecfg::domain::{Value, ValueType};
///
/// let value = Value::from(-8);
/// assert_eq!(value.value_type(), ValueType::SignedInteger);
/// assert_eq!(value.type_name(), "SignedInteger");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    /// No value; the default.
    Null,
    /// A signed 64-bit integer.
    SignedInteger,
    /// An unsigned 64-bit integer.
    UnsignedInteger,
    /// A double-precision floating point number.
    RealNumber,
    /// A UTF-8 string.
    String,
    /// A boolean.
    Boolean,
    /// An ordered list of values.
    ArrayValues,
    /// A key-ordered map of values.
    ObjectValues,
}

impl ValueType {
    /// Returns the display name of this type.
    pub fn type_name(self) -> &'static str {
        match self {
            ValueType::Null => "null",
            ValueType::SignedInteger => "SignedInteger",
            ValueType::UnsignedInteger => "UnsignedInteger",
            ValueType::RealNumber => "RealNumber",
            ValueType::String => "String",
            ValueType::Boolean => "Boolean",
            ValueType::ArrayValues => "ArrayValues",
            ValueType::ObjectValues => "ObjectValues",
        }
    }

    /// Returns `true` for every type except arrays and objects.
    pub fn is_scalar(self) -> bool {
        !matches!(self, ValueType::ArrayValues | ValueType::ObjectValues)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A node of the document tree.
///
/// Exactly one variant is active at a time and it owns its payload, so cloning a
/// `Value` always produces a deep, independent copy.
///
/// # Examples
///
/// ```
/// use treecfg::domain::Value;
///
/// let mut root = Value::default();
/// root["count"] = Value::from(42);
/// root["name"] = Value::from("Squall");
///
/// assert!(root.is_object());
/// assert_eq!(root["count"].get_int(), 42);
/// assert_eq!(root["name"].get_str(), "Squall");
/// assert_eq!(root["missing"].get_int(), 0);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// No value.
    #[default]
    Null,
    /// A signed integer.
    SignedInteger(i64),
    /// An unsigned integer.
    UnsignedInteger(u64),
    /// A real number.
    Real(f64),
    /// A string.
    String(String),
    /// A boolean.
    Boolean(bool),
    /// An ordered list of values.
    Array(ArrayList),
    /// A key-ordered map of values.
    Object(ObjectMap),
}

impl Value {
    /// Creates the zero value of the given type; containers start out empty.
    ///
    /// ```
    /// use treecfg::domain::{Value, ValueType};
    ///
    /// let array = Value::with_type(ValueType::ArrayValues);
    /// assert!(array.is_array());
    /// assert_eq!(array.size(), 0);
    /// ```
    pub fn with_type(value_type: ValueType) -> Self {
        match value_type {
            ValueType::Null => Value::Null,
            ValueType::SignedInteger => Value::SignedInteger(0),
            ValueType::UnsignedInteger => Value::UnsignedInteger(0),
            ValueType::RealNumber => Value::Real(0.0),
            ValueType::String => Value::String(String::new()),
            ValueType::Boolean => Value::Boolean(false),
            ValueType::ArrayValues => Value::Array(ArrayList::new()),
            ValueType::ObjectValues => Value::Object(ObjectMap::new()),
        }
    }

    /// Returns the active tag.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Null => ValueType::Null,
            Value::SignedInteger(_) => ValueType::SignedInteger,
            Value::UnsignedInteger(_) => ValueType::UnsignedInteger,
            Value::Real(_) => ValueType::RealNumber,
            Value::String(_) => ValueType::String,
            Value::Boolean(_) => ValueType::Boolean,
            Value::Array(_) => ValueType::ArrayValues,
            Value::Object(_) => ValueType::ObjectValues,
        }
    }

    /// Returns the display name of the active tag.
    pub fn type_name(&self) -> &'static str {
        self.value_type().type_name()
    }

    /// Returns `true` if the value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if the value is a signed integer.
    pub fn is_int(&self) -> bool {
        matches!(self, Value::SignedInteger(_))
    }

    /// Returns `true` if the value is an unsigned integer.
    pub fn is_uint(&self) -> bool {
        matches!(self, Value::UnsignedInteger(_))
    }

    /// Returns `true` if the value is a real number.
    pub fn is_real(&self) -> bool {
        matches!(self, Value::Real(_))
    }

    /// Returns `true` if the value is a string.
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns `true` if the value is a boolean.
    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Boolean(_))
    }

    /// Returns `true` if the value is an array.
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Returns `true` if the value is an object.
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Returns `true` unless the value is an array or an object.
    pub fn is_scalar(&self) -> bool {
        self.value_type().is_scalar()
    }

    /// Returns the signed integer, or `0` for any other tag.
    pub fn get_int(&self) -> i64 {
        match self {
            Value::SignedInteger(n) => *n,
            _ => 0,
        }
    }

    /// Returns the unsigned integer, or `0` for any other tag.
    pub fn get_uint(&self) -> u64 {
        match self {
            Value::UnsignedInteger(n) => *n,
            _ => 0,
        }
    }

    /// Returns the real number, or `0.0` for any other tag.
    pub fn get_double(&self) -> f64 {
        match self {
            Value::Real(n) => *n,
            _ => 0.0,
        }
    }

    /// Returns the real number narrowed to `f32`, or `0.0` for any other tag.
    pub fn get_float(&self) -> f32 {
        self.get_double() as f32
    }

    /// Returns the string, or `""` for any other tag.
    pub fn get_str(&self) -> &str {
        match self {
            Value::String(s) => s,
            _ => "",
        }
    }

    /// Returns an owned copy of the string, or an empty string for any other tag.
    pub fn get_string(&self) -> String {
        self.get_str().to_string()
    }

    /// Returns the boolean, or `false` for any other tag.
    pub fn get_bool(&self) -> bool {
        matches!(self, Value::Boolean(true))
    }

    /// Borrows the elements of an array.
    pub fn as_array(&self) -> Option<&ArrayList> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Mutably borrows the elements of an array.
    pub fn as_array_mut(&mut self) -> Option<&mut ArrayList> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Borrows the members of an object.
    pub fn as_object(&self) -> Option<&ObjectMap> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Mutably borrows the members of an object.
    pub fn as_object_mut(&mut self) -> Option<&mut ObjectMap> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the number of children of an array or object, `1` for a scalar
    /// and `0` for null.
    pub fn size(&self) -> usize {
        match self {
            Value::Null => 0,
            Value::Array(items) => items.len(),
            Value::Object(map) => map.len(),
            _ => 1,
        }
    }

    /// Returns `true` for null and for containers without children.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Removes every child of an array or object; the tag is unchanged.
    ///
    /// Has no effect on scalars.
    pub fn clear(&mut self) {
        match self {
            Value::Array(items) => items.clear(),
            Value::Object(map) => map.clear(),
            _ => {}
        }
    }

    /// Appends an element and returns a reference to it.
    ///
    /// A null receiver becomes an empty array first. Any other non-array receiver
    /// is replaced by a new array, discarding its previous payload.
    ///
    /// ```
    /// use treecfg::domain::Value;
    ///
    /// let mut list = Value::default();
    /// list.append(1);
    /// list.append("two");
    /// assert!(list.is_array());
    /// assert_eq!(list.size(), 2);
    /// ```
    pub fn append(&mut self, value: impl Into<Value>) -> &mut Value {
        let items = self.coerce_array();
        let index = items.len();
        items.push(value.into());
        &mut items[index]
    }

    /// Returns the member stored under `key`, if this is an object holding it.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Returns the element at `index`, if this is an array that long.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.as_array().and_then(|items| items.get(index))
    }

    /// Returns the member stored under `key`, or a null value when absent.
    pub fn find(&self, key: &str) -> &Value {
        self.get(key).unwrap_or(&NULL)
    }

    /// Removes and returns the member stored under `key`.
    ///
    /// Returns `None` (and leaves the value untouched) when the key is absent or
    /// the value is not an object.
    pub fn erase(&mut self, key: &str) -> Option<Value> {
        self.as_object_mut().and_then(|map| map.remove(key))
    }

    /// Returns the member keys of an object in iteration (sorted) order.
    ///
    /// Every other tag has no member names.
    pub fn member_names(&self) -> Vec<String> {
        self.as_object()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Iterates over array elements or object members.
    ///
    /// Array elements are yielded with a `None` key; object members with their key.
    /// Iterating a scalar yields nothing.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }

    /// Renders a scalar as text.
    ///
    /// Reals always carry a fractional or exponent marker (`1.0`, `1e100`) so they
    /// remain distinguishable from integers. Arrays and objects render as `""`.
    ///
    /// ```
    /// use treecfg::domain::Value;
    ///
    /// assert_eq!(Value::from(100).stringify(), "100");
    /// assert_eq!(Value::from(2.0).stringify(), "2.0");
    /// assert_eq!(Value::Null.stringify(), "null");
    /// ```
    pub fn stringify(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::SignedInteger(n) => n.to_string(),
            Value::UnsignedInteger(n) => n.to_string(),
            Value::Real(n) => format!("{:?}", n),
            Value::String(s) => s.clone(),
            Value::Boolean(b) => b.to_string(),
            Value::Array(_) | Value::Object(_) => String::new(),
        }
    }

    /// Renders the whole tree for diagnostics.
    ///
    /// Each node is annotated with `[type=..., size=...]` and its depth. The output
    /// is not meant to be parsed back.
    pub fn dump(&self) -> String {
        self.dump_at(0)
    }

    /// Renders the tree as [`dump`](Self::dump) does, starting at `depth`.
    pub fn dump_at(&self, depth: usize) -> String {
        let mut out = String::new();
        self.write_dump(&mut out, depth);
        out
    }

    fn write_dump(&self, out: &mut String, depth: usize) {
        let depth = depth + 1;
        out.push_str(&format!(
            " [type={}, size={}] ({})\n",
            self.type_name(),
            self.size(),
            depth
        ));

        for (key, member) in self.iter() {
            out.push_str(&"-".repeat(depth));
            out.push_str(" subvalue (");
            if let Some(key) = key {
                out.push_str(key);
                if member.is_scalar() {
                    out.push_str(": ");
                }
            }
            if member.is_scalar() {
                out.push_str(&member.stringify());
            }
            out.push(')');
            member.write_dump(out, depth);
        }
    }

    fn coerce_array(&mut self) -> &mut ArrayList {
        if !self.is_array() {
            if !self.is_null() {
                tracing::debug!("replacing {} value with an array", self.type_name());
            }
            *self = Value::Array(ArrayList::new());
        }
        match self {
            Value::Array(items) => items,
            _ => unreachable!("value was just replaced by an array"),
        }
    }

    fn coerce_object(&mut self) -> &mut ObjectMap {
        if !self.is_object() {
            if !self.is_null() {
                tracing::debug!("replacing {} value with an object", self.type_name());
            }
            *self = Value::Object(ObjectMap::new());
        }
        match self {
            Value::Object(map) => map,
            _ => unreachable!("value was just replaced by an object"),
        }
    }
}

impl Index<&str> for Value {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        self.find(key)
    }
}

/// Mutable member access; the receiver becomes an object if it is not one and a
/// missing member is inserted as null.
impl IndexMut<&str> for Value {
    fn index_mut(&mut self, key: &str) -> &mut Value {
        self.coerce_object().entry(key.to_string()).or_default()
    }
}

impl Index<usize> for Value {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        self.get_index(index).unwrap_or(&NULL)
    }
}

/// Mutable element access; the receiver becomes an array if it is not one and is
/// padded with nulls up to `index`.
impl IndexMut<usize> for Value {
    fn index_mut(&mut self, index: usize) -> &mut Value {
        let items = self.coerce_array();
        if items.len() <= index {
            items.resize(index + 1, Value::Null);
        }
        &mut items[index]
    }
}

impl<'a> IntoIterator for &'a Value {
    type Item = (Option<&'a str>, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dump())
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::SignedInteger(n) => serializer.serialize_i64(*n),
            Value::UnsignedInteger(n) => serializer.serialize_u64(*n),
            Value::Real(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Array(items) => serializer.collect_seq(items),
            Value::Object(map) => serializer.collect_map(map),
        }
    }
}

macro_rules! impl_from_integer {
    ($variant:ident, $target:ty, $($source:ty),+) => {
        $(
            impl From<$source> for Value {
                fn from(n: $source) -> Self {
                    Value::$variant(<$target>::from(n))
                }
            }
        )+
    };
}

impl_from_integer!(SignedInteger, i64, i8, i16, i32, i64);
impl_from_integer!(UnsignedInteger, u64, u8, u16, u32, u64);

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Real(f64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Real(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl From<ArrayList> for Value {
    fn from(items: ArrayList) -> Self {
        Value::Array(items)
    }
}

impl From<ObjectMap> for Value {
    fn from(map: ObjectMap) -> Self {
        Value::Object(map)
    }
}

impl From<ValueType> for Value {
    fn from(value_type: ValueType) -> Self {
        Value::with_type(value_type)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::Array(iter.into_iter().collect())
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Value::Object(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
