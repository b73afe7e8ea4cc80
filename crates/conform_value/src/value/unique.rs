//! Duplicate removal for sets and mapping keys.
//!
//! Duplicates are decided by host equality ([`Value::loose_eq`]), so `1`,
//! `True` and `1.0` are one element. Keys with a hashable projection
//! (none, numbers, strings, bytes) are indexed in an `FxHashMap`; the rest
//! (containers, records, NaN) fall back to a linear scan among themselves.

use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;

use crate::{Heap, Value};

/// Hashable stand-in for a key. Equal slots mean `loose_eq` keys.
#[derive(PartialEq, Eq, Hash)]
enum Slot {
    None,
    /// Bools, ints and integral floats that fit in an `i64`.
    Int(i64),
    /// Other finite or infinite floats, by bit pattern.
    Float(u64),
    Str(Heap<String>),
    Bytes(Heap<Vec<u8>>),
}

impl Slot {
    fn of(value: &Value) -> Option<Slot> {
        match value {
            Value::None => Some(Slot::None),
            Value::Bool(b) => Some(Slot::Int(i64::from(*b))),
            Value::Int(n) => Some(Slot::Int(*n)),
            Value::Float(f) if f.is_nan() => None,
            Value::Float(f) => Some(integral(*f).map_or(Slot::Float(f.to_bits()), Slot::Int)),
            Value::Str(s) => Some(Slot::Str(s.clone())),
            Value::Bytes(b) => Some(Slot::Bytes(b.clone())),
            _ => None,
        }
    }
}

/// The `i64` equal to `f`, if there is one.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    reason = "range and fraction are checked before the cast"
)]
pub(super) fn integral(f: f64) -> Option<i64> {
    // -2^63 is exact; 2^63 is the first float past i64::MAX.
    const LOW: f64 = i64::MIN as f64;
    if f.fract() == 0.0 && f >= LOW && f < -LOW {
        Some(f as i64)
    } else {
        None
    }
}

/// Keep the first occurrence of each key; `merge` folds later duplicates in.
pub(super) fn unique_by<T>(
    items: Vec<T>,
    key: fn(&T) -> &Value,
    mut merge: impl FnMut(&mut T, T),
) -> Vec<T> {
    let mut unique: Vec<T> = Vec::with_capacity(items.len());
    let mut hashed: FxHashMap<Slot, usize> = FxHashMap::default();
    let mut unhashed: Vec<usize> = Vec::new();

    for item in items {
        let k = key(&item);
        let found = match Slot::of(k) {
            Some(slot) => match hashed.entry(slot) {
                Entry::Occupied(e) => Some(*e.get()),
                Entry::Vacant(e) => {
                    e.insert(unique.len());
                    None
                }
            },
            None => {
                let hit = unhashed
                    .iter()
                    .copied()
                    .find(|&i| key(&unique[i]).loose_eq(k));
                if hit.is_none() {
                    unhashed.push(unique.len());
                }
                hit
            }
        };
        match found {
            Some(i) => merge(&mut unique[i], item),
            None => unique.push(item),
        }
    }
    unique
}
