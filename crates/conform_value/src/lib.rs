//! Runtime values for conform.
//!
//! `Value` models the dynamically typed host data the checker and coercer
//! operate on: scalars, homogeneous containers, mappings with arbitrary keys,
//! record instances, enum members and a few opaque objects (classes and
//! callables). Containers live behind [`Heap`], so cloning a value is cheap
//! and a freshly built container is always a new allocation.
//!
//! Parsed documents enter through the [`json`] module.

mod heap;
mod kind;
mod name;
mod value;

pub mod json;

pub use heap::Heap;
pub use kind::{Kinds, MapKind, ValueKind};
pub use name::Name;
pub use value::{EnumMember, Items, RecordValue, Value};
