//! Type descriptors for conform.
//!
//! - [`Ty`]: the closed descriptor tree the checker and coercer dispatch on.
//! - [`TypeRegistry`]: declared records and enums, looked up by name through
//!   the [`FieldTable`] trait. Named references are resolved lazily, which is
//!   what makes self-referential and forward-referenced records work.
//! - [`parse_ty`] / [`TypeParser`]: annotation syntax (`Dict[str, List[int]]`).
//! - [`Declarations`]: a JSON document that populates a registry.

mod decl;
mod parse;
mod registry;
mod ty;

pub use decl::{DeclError, Declarations, EnumDoc, RecordDoc};
pub use parse::{parse_ty, ParseError, TypeParser};
pub use registry::{
    ConstructError, EnumDecl, EnumDef, FieldDef, FieldDefault, FieldTable, RecordDecl, RecordDef,
    RegistryError, TypeEntry, TypeKind, TypeRegistry, Validator,
};
pub use ty::{ContainerKind, Scalar, Ty};

pub use conform_value::{MapKind, Name};
