//! The type descriptor tree.
//!
//! `Ty` is the closed set of shapes the checker and coercer match on. Record
//! and enum types appear only as [`Ty::Named`] references; their definitions
//! live in the [`TypeRegistry`](crate::TypeRegistry) and are looked up when
//! the recursion reaches them.
//!
//! Dropping a descriptor releases nested arguments with an explicit
//! worklist, so an annotation nested arbitrarily deep frees without
//! recursing.

mod format;

use std::mem;

use conform_stack::with_stack;
use conform_value::{MapKind, Name, Value, ValueKind};

/// A type descriptor.
#[derive(Clone, Debug, PartialEq)]
pub enum Ty {
    /// Conforms to everything; never coerced.
    Any,
    /// The "no value" type.
    None,
    /// A concrete scalar type.
    Scalar(Scalar),
    /// A declared record or enum type, resolved by name.
    Named(Name),
    /// Homogeneous container: `List[T]`, `Set[T]`, `FrozenSet[T]`.
    Container { kind: ContainerKind, item: Box<Ty> },
    /// `Dict[K, V]` or `OrderedDict[K, V]`.
    Mapping {
        kind: MapKind,
        key: Box<Ty>,
        value: Box<Ty>,
    },
    /// Fixed-arity positional tuple.
    Tuple(Vec<Ty>),
    /// `Tuple[T, ...]`: any length, every element a `T`.
    VarTuple(Box<Ty>),
    /// Alternatives in declaration order. `Optional[T]` is `Union[T, None]`.
    Union(Vec<Ty>),
    /// One of a fixed set of constants.
    Literal(Vec<Value>),
    /// Any callable; the signature is not inspected.
    Callable,
    /// `Type[T]`: a class object that is `T` or a subclass of it.
    Class(Box<Ty>),
    /// Unconstrained type-variable placeholder.
    Var(Name),
}

/// Scalar types.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Scalar {
    Int,
    Float,
    Bool,
    Str,
    Bytes,
}

impl Scalar {
    pub fn name(self) -> &'static str {
        match self {
            Scalar::Int => "int",
            Scalar::Float => "float",
            Scalar::Bool => "bool",
            Scalar::Str => "str",
            Scalar::Bytes => "bytes",
        }
    }

    /// Whether a value of runtime kind `kind` is an instance of this scalar.
    ///
    /// Exact kind match: a `bool` is not an `int` here even though the host
    /// treats it as one, and an `int` is not a `float`.
    #[inline]
    pub fn admits(self, kind: ValueKind) -> bool {
        matches!(
            (self, kind),
            (Scalar::Int, ValueKind::Int)
                | (Scalar::Float, ValueKind::Float)
                | (Scalar::Bool, ValueKind::Bool)
                | (Scalar::Str, ValueKind::Str)
                | (Scalar::Bytes, ValueKind::Bytes)
        )
    }
}

/// Origin kind of a homogeneous container descriptor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    List,
    Set,
    FrozenSet,
}

impl ContainerKind {
    pub fn name(self) -> &'static str {
        match self {
            ContainerKind::List => "List",
            ContainerKind::Set => "Set",
            ContainerKind::FrozenSet => "FrozenSet",
        }
    }

    /// Runtime kind a value must have to be this container.
    pub fn value_kind(self) -> ValueKind {
        match self {
            ContainerKind::List => ValueKind::List,
            ContainerKind::Set => ValueKind::Set,
            ContainerKind::FrozenSet => ValueKind::FrozenSet,
        }
    }

    /// Build a fresh container of this kind.
    pub fn build(self, items: Vec<Value>) -> Value {
        match self {
            ContainerKind::List => Value::list(items),
            ContainerKind::Set => Value::set(items),
            ContainerKind::FrozenSet => Value::frozen_set(items),
        }
    }
}

// Constructors

impl Ty {
    pub fn int() -> Ty {
        Ty::Scalar(Scalar::Int)
    }

    pub fn float() -> Ty {
        Ty::Scalar(Scalar::Float)
    }

    pub fn bool() -> Ty {
        Ty::Scalar(Scalar::Bool)
    }

    pub fn str() -> Ty {
        Ty::Scalar(Scalar::Str)
    }

    pub fn bytes() -> Ty {
        Ty::Scalar(Scalar::Bytes)
    }

    pub fn named(name: impl Into<Name>) -> Ty {
        Ty::Named(name.into())
    }

    pub fn var(name: impl Into<Name>) -> Ty {
        Ty::Var(name.into())
    }

    pub fn list(item: Ty) -> Ty {
        Ty::Container {
            kind: ContainerKind::List,
            item: Box::new(item),
        }
    }

    pub fn set(item: Ty) -> Ty {
        Ty::Container {
            kind: ContainerKind::Set,
            item: Box::new(item),
        }
    }

    pub fn frozen_set(item: Ty) -> Ty {
        Ty::Container {
            kind: ContainerKind::FrozenSet,
            item: Box::new(item),
        }
    }

    pub fn dict(key: Ty, value: Ty) -> Ty {
        Ty::Mapping {
            kind: MapKind::Dict,
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn ordered_dict(key: Ty, value: Ty) -> Ty {
        Ty::Mapping {
            kind: MapKind::OrderedDict,
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn tuple(elements: Vec<Ty>) -> Ty {
        Ty::Tuple(elements)
    }

    pub fn var_tuple(item: Ty) -> Ty {
        Ty::VarTuple(Box::new(item))
    }

    pub fn class(of: Ty) -> Ty {
        Ty::Class(Box::new(of))
    }

    pub fn literal(allowed: Vec<Value>) -> Ty {
        Ty::Literal(allowed)
    }

    /// Build a union.
    ///
    /// Nested unions are flattened and repeated alternatives dropped, keeping
    /// first occurrence order. A single remaining alternative is returned
    /// as is.
    pub fn union(alternatives: Vec<Ty>) -> Ty {
        fn push_unique(flat: &mut Vec<Ty>, ty: Ty) {
            if !flat.contains(&ty) {
                flat.push(ty);
            }
        }

        let mut flat: Vec<Ty> = Vec::with_capacity(alternatives.len());
        for mut alt in alternatives {
            if let Ty::Union(inner) = &mut alt {
                for ty in mem::take(inner) {
                    push_unique(&mut flat, ty);
                }
            } else {
                push_unique(&mut flat, alt);
            }
        }
        if flat.len() == 1 {
            flat.pop().unwrap_or(Ty::None)
        } else {
            Ty::Union(flat)
        }
    }

    /// `Optional[T]`, i.e. `Union[T, None]`.
    pub fn optional(ty: Ty) -> Ty {
        Ty::union(vec![ty, Ty::None])
    }
}

// Queries

impl Ty {
    /// The wrapped type if this is `Optional[T]`.
    pub fn as_optional(&self) -> Option<&Ty> {
        match self {
            Ty::Union(alts) if alts.len() == 2 => match (&alts[0], &alts[1]) {
                (ty, Ty::None) | (Ty::None, ty) => Some(ty),
                _ => None,
            },
            _ => None,
        }
    }

    /// Call `f` on every named reference in this descriptor.
    pub fn for_each_named(&self, f: &mut impl FnMut(&Name)) {
        with_stack(|| self.for_each_named_inner(f));
    }

    fn for_each_named_inner(&self, f: &mut impl FnMut(&Name)) {
        match self {
            Ty::Named(name) => f(name),
            Ty::Container { item, .. } | Ty::VarTuple(item) | Ty::Class(item) => {
                item.for_each_named(f);
            }
            Ty::Mapping { key, value, .. } => {
                key.for_each_named(f);
                value.for_each_named(f);
            }
            Ty::Tuple(tys) | Ty::Union(tys) => {
                for ty in tys {
                    ty.for_each_named(f);
                }
            }
            Ty::Any
            | Ty::None
            | Ty::Scalar(_)
            | Ty::Literal(_)
            | Ty::Callable
            | Ty::Var(_) => {}
        }
    }
}

impl Ty {
    /// Move nested argument descriptors into `out`, leaving `Any` behind.
    fn take_children(&mut self, out: &mut Vec<Ty>) {
        match self {
            Ty::Container { item, .. } | Ty::VarTuple(item) | Ty::Class(item) => {
                out.push(mem::replace(&mut **item, Ty::Any));
            }
            Ty::Mapping { key, value, .. } => {
                out.push(mem::replace(&mut **key, Ty::Any));
                out.push(mem::replace(&mut **value, Ty::Any));
            }
            Ty::Tuple(tys) | Ty::Union(tys) => out.append(tys),
            Ty::Any
            | Ty::None
            | Ty::Scalar(_)
            | Ty::Named(_)
            | Ty::Literal(_)
            | Ty::Callable
            | Ty::Var(_) => {}
        }
    }
}

impl Drop for Ty {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.take_children(&mut pending);
        while let Some(mut ty) = pending.pop() {
            ty.take_children(&mut pending);
        }
    }
}

impl From<Scalar> for Ty {
    fn from(s: Scalar) -> Self {
        Ty::Scalar(s)
    }
}
