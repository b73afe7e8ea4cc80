//! Conversion between parsed JSON documents and [`Value`].
//!
//! Documents are the coercer's usual input: objects become plain mappings
//! with string keys, arrays become lists, integers become `Int` and other
//! numbers `Float`. An integer outside the `i64` range is an error rather
//! than a silently rounded float.
//!
//! The reverse direction flattens nominal values: records become objects,
//! enum members become the value they stand for, tuples and sets become
//! arrays. Mapping keys that are not strings are rendered with `Display`.

use conform_stack::with_stack;
use serde_json::{Map, Number};

use crate::{MapKind, Value};

/// Error converting a document into a value.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum JsonError {
    #[error("integer {0} does not fit in a 64-bit signed int")]
    IntegerOutOfRange(Number),
}

/// Convert a parsed JSON document into a value.
pub fn from_json(doc: &serde_json::Value) -> Result<Value, JsonError> {
    with_stack(|| {
        Ok(match doc {
            serde_json::Value::Null => Value::None,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => from_number(n)?,
            serde_json::Value::String(s) => Value::string(s.as_str()),
            serde_json::Value::Array(items) => {
                Value::list(items.iter().map(from_json).collect::<Result<_, _>>()?)
            }
            serde_json::Value::Object(fields) => Value::map(
                MapKind::Dict,
                fields
                    .iter()
                    .map(|(k, v)| Ok::<_, JsonError>((Value::string(k.as_str()), from_json(v)?)))
                    .collect::<Result<_, _>>()?,
            ),
        })
    })
}

fn from_number(n: &Number) -> Result<Value, JsonError> {
    if let Some(i) = n.as_i64() {
        Ok(Value::Int(i))
    } else if n.is_u64() {
        Err(JsonError::IntegerOutOfRange(n.clone()))
    } else {
        Ok(n.as_f64().map_or(Value::None, Value::Float))
    }
}

/// Convert a value into a JSON document.
pub fn to_json(value: &Value) -> serde_json::Value {
    with_stack(|| to_json_inner(value))
}

fn to_json_inner(value: &Value) -> serde_json::Value {
    match value {
        Value::None => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(n) => serde_json::Value::Number((*n).into()),
        Value::Float(f) => {
            Number::from_f64(*f).map_or(serde_json::Value::Null, serde_json::Value::Number)
        }
        Value::Str(s) => serde_json::Value::String(s.to_string()),
        Value::Bytes(b) => {
            serde_json::Value::Array(b.iter().map(|byte| (*byte).into()).collect())
        }
        Value::List(items) | Value::Tuple(items) | Value::Set(items) | Value::FrozenSet(items) => {
            serde_json::Value::Array(items.iter().map(to_json).collect())
        }
        Value::Map { entries, .. } => {
            let mut object = Map::with_capacity(entries.len());
            for (k, v) in entries.iter() {
                let key = match k {
                    Value::Str(s) => s.to_string(),
                    other => other.to_string(),
                };
                object.insert(key, to_json(v));
            }
            serde_json::Value::Object(object)
        }
        Value::Record(record) => {
            let mut object = Map::with_capacity(record.len());
            for (name, v) in record.fields() {
                object.insert(name.to_string(), to_json(v));
            }
            serde_json::Value::Object(object)
        }
        Value::Enum(member) => to_json(member.value()),
        Value::Class(name) | Value::Function(name) => serde_json::Value::String(name.to_string()),
    }
}

impl TryFrom<&serde_json::Value> for Value {
    type Error = JsonError;

    fn try_from(doc: &serde_json::Value) -> Result<Self, JsonError> {
        from_json(doc)
    }
}
