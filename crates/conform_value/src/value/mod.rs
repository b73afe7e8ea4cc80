//! The `Value` enum and its factories.
//!
//! All container payloads go through the factory methods (`Value::list`,
//! `Value::dict`, ...), which also enforce container invariants: sets hold no
//! duplicates, mappings hold each key once (a later entry replaces an earlier
//! one, keeping the earlier position).
//!
//! Two equalities exist. Duplicates in sets and mapping keys, and `Literal`
//! membership, use host equality ([`Value::loose_eq`]): `{1, True, 1.0}` is
//! the one-element set `{1}`. `PartialEq` is structural and keeps `1`,
//! `True` and `1.0` apart; it is what tests and the checker's own
//! bookkeeping compare with.
//!
//! Dropping a value tears nested containers down with an explicit worklist,
//! so freeing a deeply nested document does not recurse.

mod record;
mod unique;

use std::fmt;

use conform_stack::with_stack;

use crate::{Heap, MapKind, Name, ValueKind};

pub use record::{EnumMember, RecordValue};

/// A dynamically typed runtime value.
#[derive(Clone, Debug)]
pub enum Value {
    /// The "no value" singleton.
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Heap<String>),
    Bytes(Heap<Vec<u8>>),

    // Containers
    List(Heap<Vec<Value>>),
    Tuple(Heap<Vec<Value>>),
    /// Unordered, duplicate-free. Stored in first-insertion order.
    Set(Heap<Vec<Value>>),
    FrozenSet(Heap<Vec<Value>>),
    /// Mapping with arbitrary keys, in insertion order.
    Map {
        kind: MapKind,
        entries: Heap<Vec<(Value, Value)>>,
    },

    // Nominal values
    /// Instance of a declared record type.
    Record(RecordValue),
    /// Member of a declared enum type.
    Enum(EnumMember),
    /// A class object (what a `Type[X]` field holds).
    Class(Name),
    /// An opaque callable, identified by name.
    Function(Name),
}

// Factories

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(Heap::new(s.into()))
    }

    pub fn bytes(b: impl Into<Vec<u8>>) -> Self {
        Value::Bytes(Heap::new(b.into()))
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Heap::new(items))
    }

    pub fn tuple(items: Vec<Value>) -> Self {
        Value::Tuple(Heap::new(items))
    }

    /// Create a set; duplicate items are dropped.
    pub fn set(items: Vec<Value>) -> Self {
        Value::Set(Heap::new(dedup(items)))
    }

    /// Create a frozen set; duplicate items are dropped.
    pub fn frozen_set(items: Vec<Value>) -> Self {
        Value::FrozenSet(Heap::new(dedup(items)))
    }

    /// Create a plain mapping.
    pub fn dict(entries: Vec<(Value, Value)>) -> Self {
        Value::map(MapKind::Dict, entries)
    }

    /// Create an ordered mapping.
    pub fn ordered_dict(entries: Vec<(Value, Value)>) -> Self {
        Value::map(MapKind::OrderedDict, entries)
    }

    /// Create a mapping of the given flavour.
    ///
    /// A repeated key keeps its first position and takes the last value.
    pub fn map(kind: MapKind, entries: Vec<(Value, Value)>) -> Self {
        let unique = unique::unique_by(entries, |(k, _)| k, |slot, (_, value)| slot.1 = value);
        Value::Map {
            kind,
            entries: Heap::new(unique),
        }
    }

    pub fn record(record: RecordValue) -> Self {
        Value::Record(record)
    }

    pub fn enum_member(
        type_name: impl Into<Name>,
        member: impl Into<Name>,
        value: Value,
    ) -> Self {
        Value::Enum(EnumMember::new(type_name, member, value))
    }

    pub fn class(name: impl Into<Name>) -> Self {
        Value::Class(name.into())
    }

    pub fn function(name: impl Into<Name>) -> Self {
        Value::Function(name.into())
    }
}

fn dedup(items: Vec<Value>) -> Vec<Value> {
    unique::unique_by(items, |item| item, |_, _| {})
}

// Inspection

impl Value {
    /// Runtime kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::None => ValueKind::None,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
            Value::Bytes(_) => ValueKind::Bytes,
            Value::List(_) => ValueKind::List,
            Value::Tuple(_) => ValueKind::Tuple,
            Value::Set(_) => ValueKind::Set,
            Value::FrozenSet(_) => ValueKind::FrozenSet,
            Value::Map {
                kind: MapKind::Dict,
                ..
            } => ValueKind::Dict,
            Value::Map {
                kind: MapKind::OrderedDict,
                ..
            } => ValueKind::OrderedDict,
            Value::Record(_) => ValueKind::Record,
            Value::Enum(_) => ValueKind::Enum,
            Value::Class(_) => ValueKind::Class,
            Value::Function(_) => ValueKind::Function,
        }
    }

    /// Name of this value's runtime type, as shown in error messages.
    ///
    /// Records and enum members report their declared type name.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Record(r) => r.type_name(),
            Value::Enum(e) => e.type_name(),
            _ => self.kind().name(),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RecordValue> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Entries of a mapping value.
    pub fn as_entries(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map { entries, .. } => Some(entries),
            _ => None,
        }
    }

    /// Items of a sized, non-string iterable.
    ///
    /// Sequences and sets yield their elements; mappings yield their keys.
    /// Strings and bytes yield `None`: they are never treated as a
    /// sequence of characters.
    pub fn sized_items(&self) -> Option<Items<'_>> {
        match self {
            Value::List(items)
            | Value::Tuple(items)
            | Value::Set(items)
            | Value::FrozenSet(items) => Some(Items::Elements(items.iter())),
            Value::Map { entries, .. } => Some(Items::Keys(entries.iter())),
            _ => None,
        }
    }

    /// Equality as the host language's `==` sees it.
    ///
    /// Numbers compare across `bool`, `int` and `float` (`True == 1 == 1.0`),
    /// exactly: an int equals a float only when the float is that integer.
    /// Containers compare element-wise with the same rule. Everything else
    /// falls back to structural equality.
    pub fn loose_eq(&self, other: &Value) -> bool {
        if let Some(eq) = self.numeric_eq(other) {
            return eq;
        }
        match (self, other) {
            (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.loose_eq(y))
            }
            _ => self == other,
        }
    }

    /// Numeric comparison, or `None` when either side is not a number.
    fn numeric_eq(&self, other: &Value) -> Option<bool> {
        fn as_int(value: &Value) -> Option<i64> {
            match value {
                Value::Bool(b) => Some(i64::from(*b)),
                Value::Int(n) => Some(*n),
                _ => None,
            }
        }

        if let (Some(a), Some(b)) = (as_int(self), as_int(other)) {
            return Some(a == b);
        }
        match (self, other) {
            (Value::Float(a), Value::Float(b)) => Some(a == b),
            (Value::Float(f), n) | (n, Value::Float(f)) => {
                as_int(n).map(|i| unique::integral(*f) == Some(i))
            }
            _ => None,
        }
    }

    /// Move the children of uniquely owned containers into `out`.
    fn take_children(&mut self, out: &mut Vec<Value>) {
        match self {
            Value::List(items)
            | Value::Tuple(items)
            | Value::Set(items)
            | Value::FrozenSet(items) => {
                if let Some(items) = Heap::get_mut(items) {
                    out.append(items);
                }
            }
            Value::Map { entries, .. } => {
                if let Some(entries) = Heap::get_mut(entries) {
                    for (k, v) in entries.drain(..) {
                        out.push(k);
                        out.push(v);
                    }
                }
            }
            Value::Record(record) => record.take_children(out),
            Value::Enum(member) => member.take_children(out),
            Value::None
            | Value::Bool(_)
            | Value::Int(_)
            | Value::Float(_)
            | Value::Str(_)
            | Value::Bytes(_)
            | Value::Class(_)
            | Value::Function(_) => {}
        }
    }
}

impl Drop for Value {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.take_children(&mut pending);
        while let Some(mut value) = pending.pop() {
            // Emptied before it drops, so its own `drop` finds nothing.
            value.take_children(&mut pending);
        }
    }
}

/// Iterator over the items of a sized iterable (see [`Value::sized_items`]).
#[derive(Clone, Debug)]
pub enum Items<'a> {
    Elements(std::slice::Iter<'a, Value>),
    Keys(std::slice::Iter<'a, (Value, Value)>),
}

impl<'a> Iterator for Items<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<&'a Value> {
        match self {
            Items::Elements(it) => it.next(),
            Items::Keys(it) => it.next().map(|(k, _)| k),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Items::Elements(it) => it.size_hint(),
            Items::Keys(it) => it.size_hint(),
        }
    }
}

impl ExactSizeIterator for Items<'_> {}

// Equality

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (
                Value::Set(a) | Value::FrozenSet(a),
                Value::Set(b) | Value::FrozenSet(b),
            ) => a.len() == b.len() && a.iter().all(|x| b.contains(x)),
            (
                Value::Map {
                    kind: MapKind::OrderedDict,
                    entries: a,
                },
                Value::Map {
                    kind: MapKind::OrderedDict,
                    entries: b,
                },
            ) => a == b,
            (Value::Map { entries: a, .. }, Value::Map { entries: b, .. }) => {
                a.len() == b.len() && a.iter().all(|entry| b.contains(entry))
            }
            (Value::Record(a), Value::Record(b)) => a == b,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::Class(a), Value::Class(b)) | (Value::Function(a), Value::Function(b)) => {
                a == b
            }
            _ => false,
        }
    }
}

// Conversions

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<RecordValue> for Value {
    fn from(r: RecordValue) -> Self {
        Value::Record(r)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::None, Into::into)
    }
}

// Display

fn write_seq(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_entries(f: &mut fmt::Formatter<'_>, entries: &[(Value, Value)]) -> fmt::Result {
    f.write_str("{")?;
    for (i, (k, v)) in entries.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{k}: {v}")?;
    }
    f.write_str("}")
}

/// Renders values the way the host language's `repr` would.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        with_stack(|| self.fmt_repr(f))
    }
}

impl Value {
    fn fmt_repr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{x:.1}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{:?}", &***s),
            Value::Bytes(b) => write!(f, "b{:?}", String::from_utf8_lossy(b)),
            Value::List(items) => {
                f.write_str("[")?;
                write_seq(f, items)?;
                f.write_str("]")
            }
            Value::Tuple(items) => {
                f.write_str("(")?;
                write_seq(f, items)?;
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Value::Set(items) if items.is_empty() => f.write_str("set()"),
            Value::Set(items) => {
                f.write_str("{")?;
                write_seq(f, items)?;
                f.write_str("}")
            }
            Value::FrozenSet(items) => {
                f.write_str("frozenset(")?;
                if !items.is_empty() {
                    f.write_str("{")?;
                    write_seq(f, items)?;
                    f.write_str("}")?;
                }
                f.write_str(")")
            }
            Value::Map {
                kind: MapKind::Dict,
                entries,
            } => write_entries(f, entries),
            Value::Map {
                kind: MapKind::OrderedDict,
                entries,
            } => {
                f.write_str("OrderedDict(")?;
                write_entries(f, entries)?;
                f.write_str(")")
            }
            Value::Record(r) => write!(f, "{r}"),
            Value::Enum(e) => write!(f, "{e}"),
            Value::Class(name) => write!(f, "<class '{name}'>"),
            Value::Function(name) => write!(f, "<function {name}>"),
        }
    }
}

#[cfg(test)]
mod tests;
