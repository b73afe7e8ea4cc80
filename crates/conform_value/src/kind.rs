//! Runtime kinds of values.
//!
//! `ValueKind` is the discriminant the checker compares against a
//! descriptor's origin kind; `Kinds` is a set of them for the "any of"
//! tests the coercer needs (sized iterables, mappings).

use std::fmt;

use bitflags::bitflags;

/// Flavour of a mapping value.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum MapKind {
    /// Plain mapping (insertion ordered, compared without regard to order).
    #[default]
    Dict,
    /// Ordered mapping (order participates in equality).
    OrderedDict,
}

impl MapKind {
    pub fn name(self) -> &'static str {
        match self {
            MapKind::Dict => "dict",
            MapKind::OrderedDict => "OrderedDict",
        }
    }
}

/// Discriminant of a [`Value`](crate::Value).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    None,
    Bool,
    Int,
    Float,
    Str,
    Bytes,
    List,
    Tuple,
    Set,
    FrozenSet,
    Dict,
    OrderedDict,
    Record,
    Enum,
    Class,
    Function,
}

impl ValueKind {
    /// Host-level name of the kind, as shown in error messages.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::None => "NoneType",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Str => "str",
            ValueKind::Bytes => "bytes",
            ValueKind::List => "list",
            ValueKind::Tuple => "tuple",
            ValueKind::Set => "set",
            ValueKind::FrozenSet => "frozenset",
            ValueKind::Dict => "dict",
            ValueKind::OrderedDict => "OrderedDict",
            ValueKind::Record => "record",
            ValueKind::Enum => "enum",
            ValueKind::Class => "type",
            ValueKind::Function => "function",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// A set of [`ValueKind`]s.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct Kinds: u16 {
        const NONE = 1 << 0;
        const BOOL = 1 << 1;
        const INT = 1 << 2;
        const FLOAT = 1 << 3;
        const STR = 1 << 4;
        const BYTES = 1 << 5;
        const LIST = 1 << 6;
        const TUPLE = 1 << 7;
        const SET = 1 << 8;
        const FROZEN_SET = 1 << 9;
        const DICT = 1 << 10;
        const ORDERED_DICT = 1 << 11;
        const RECORD = 1 << 12;
        const ENUM = 1 << 13;
        const CLASS = 1 << 14;
        const FUNCTION = 1 << 15;

        /// Any mapping. An ordered mapping is also a plain mapping.
        const MAPPING = Self::DICT.bits() | Self::ORDERED_DICT.bits();
        /// Iterables with a known length that are not strings.
        ///
        /// Strings and bytes are iterable too, but a string is never taken
        /// as a sequence of its characters.
        const SIZED_ITERABLE = Self::LIST.bits()
            | Self::TUPLE.bits()
            | Self::SET.bits()
            | Self::FROZEN_SET.bits()
            | Self::MAPPING.bits();
        /// Kinds that can be called.
        const CALLABLE = Self::FUNCTION.bits() | Self::CLASS.bits();
    }
}

impl Kinds {
    /// The singleton set for `kind`.
    pub fn of(kind: ValueKind) -> Kinds {
        match kind {
            ValueKind::None => Kinds::NONE,
            ValueKind::Bool => Kinds::BOOL,
            ValueKind::Int => Kinds::INT,
            ValueKind::Float => Kinds::FLOAT,
            ValueKind::Str => Kinds::STR,
            ValueKind::Bytes => Kinds::BYTES,
            ValueKind::List => Kinds::LIST,
            ValueKind::Tuple => Kinds::TUPLE,
            ValueKind::Set => Kinds::SET,
            ValueKind::FrozenSet => Kinds::FROZEN_SET,
            ValueKind::Dict => Kinds::DICT,
            ValueKind::OrderedDict => Kinds::ORDERED_DICT,
            ValueKind::Record => Kinds::RECORD,
            ValueKind::Enum => Kinds::ENUM,
            ValueKind::Class => Kinds::CLASS,
            ValueKind::Function => Kinds::FUNCTION,
        }
    }

    /// Whether `kind` is a member of this set.
    #[inline]
    pub fn admits(self, kind: ValueKind) -> bool {
        self.contains(Kinds::of(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_are_not_sized_iterables() {
        assert!(!Kinds::SIZED_ITERABLE.admits(ValueKind::Str));
        assert!(!Kinds::SIZED_ITERABLE.admits(ValueKind::Bytes));
        assert!(Kinds::SIZED_ITERABLE.admits(ValueKind::Tuple));
        assert!(Kinds::SIZED_ITERABLE.admits(ValueKind::OrderedDict));
    }

    #[test]
    fn mapping_covers_both_flavours() {
        assert!(Kinds::MAPPING.admits(ValueKind::Dict));
        assert!(Kinds::MAPPING.admits(ValueKind::OrderedDict));
        assert!(!Kinds::MAPPING.admits(ValueKind::Record));
    }

    #[test]
    fn kind_names() {
        assert_eq!(ValueKind::None.name(), "NoneType");
        assert_eq!(ValueKind::FrozenSet.to_string(), "frozenset");
        assert_eq!(MapKind::OrderedDict.name(), "OrderedDict");
    }
}
