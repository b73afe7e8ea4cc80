//! Nominal values: record instances and enum members.

use std::fmt;

use crate::{Heap, Name, Value};

/// An instance of a declared record type.
///
/// Fields are stored in declaration order. A `RecordValue` can be built
/// directly with any field values; nothing here checks them against the
/// declaration. That is the checker's job.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordValue {
    type_name: Name,
    fields: Heap<Vec<(Name, Value)>>,
}

impl RecordValue {
    pub fn new(type_name: impl Into<Name>, fields: Vec<(Name, Value)>) -> Self {
        RecordValue {
            type_name: type_name.into(),
            fields: Heap::new(fields),
        }
    }

    /// Name of the record's dynamic type.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn type_name_ref(&self) -> &Name {
        &self.type_name
    }

    /// Look up a field by name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name.as_str() == field)
            .map(|(_, v)| v)
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[(Name, Value)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(super) fn take_children(&mut self, out: &mut Vec<Value>) {
        if let Some(fields) = Heap::get_mut(&mut self.fields) {
            out.extend(fields.drain(..).map(|(_, value)| value));
        }
    }
}

impl fmt::Display for RecordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.type_name)?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str(")")
    }
}

/// A member of a declared enum type.
///
/// Identity is the pair (type, member); the carried value is what the member
/// stands for in documents.
#[derive(Clone, Debug)]
pub struct EnumMember {
    type_name: Name,
    member: Name,
    value: Heap<Value>,
}

impl EnumMember {
    pub fn new(type_name: impl Into<Name>, member: impl Into<Name>, value: Value) -> Self {
        EnumMember {
            type_name: type_name.into(),
            member: member.into(),
            value: Heap::new(value),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn member(&self) -> &str {
        &self.member
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub(super) fn take_children(&mut self, out: &mut Vec<Value>) {
        if let Some(value) = Heap::get_mut(&mut self.value) {
            out.push(std::mem::replace(value, Value::None));
        }
    }
}

impl PartialEq for EnumMember {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name && self.member == other.member
    }
}

impl fmt::Display for EnumMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.type_name, self.member)
    }
}
