//! Registry for declared record and enum types.
//!
//! The registry is the field table the checker and coercer consult when the
//! recursion reaches a [`Ty::Named`] reference. Names are resolved at lookup
//! time, never at registration, so a field may name a record declared later
//! or the record it belongs to.
//!
//! # Design
//!
//! - `FxHashMap` keyed by name for lookup, plus a `Vec` of names in
//!   registration order for iteration
//! - Record fields are stored flattened: base fields first, then the
//!   record's own
//! - Subtyping is nominal and follows declared bases

mod construct;

use std::fmt;
use std::sync::Arc;

use conform_value::{Name, RecordValue, Value};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::Ty;

pub use construct::ConstructError;

/// Post-construction check run on a freshly built record.
///
/// Returns a message describing the rejection.
pub type Validator = Arc<dyn Fn(&RecordValue) -> Result<(), String> + Send + Sync>;

/// Registry of declared types.
#[derive(Clone, Debug, Default)]
pub struct TypeRegistry {
    /// Types indexed by name.
    types_by_name: FxHashMap<Name, TypeEntry>,

    /// Names in registration order.
    order: Vec<Name>,

    /// Declared type-variable names.
    type_vars: FxHashSet<Name>,
}

/// A registered type definition.
#[derive(Clone, Debug)]
pub struct TypeEntry {
    pub name: Name,
    pub kind: TypeKind,
}

/// The kind of a declared type.
#[derive(Clone, Debug)]
pub enum TypeKind {
    Record(RecordDef),
    Enum(EnumDef),
}

impl TypeKind {
    #[inline]
    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record(_))
    }

    #[inline]
    pub fn is_enum(&self) -> bool {
        matches!(self, Self::Enum(_))
    }
}

/// Definition of a record type.
#[derive(Clone, Default)]
pub struct RecordDef {
    /// All fields in declaration order, inherited ones first.
    pub fields: Vec<FieldDef>,

    /// Direct base records.
    pub bases: Vec<Name>,

    /// Validators run after construction, inherited ones first.
    pub validators: Vec<Validator>,
}

impl RecordDef {
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}

impl fmt::Debug for RecordDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordDef")
            .field("fields", &self.fields)
            .field("bases", &self.bases)
            .field("validators", &self.validators.len())
            .finish()
    }
}

/// Definition of a record field.
#[derive(Clone, Debug)]
pub struct FieldDef {
    pub name: Name,
    pub ty: Ty,
    pub default: Option<FieldDefault>,
}

impl FieldDef {
    /// A field without a default.
    pub fn required(name: impl Into<Name>, ty: Ty) -> Self {
        FieldDef {
            name: name.into(),
            ty,
            default: None,
        }
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// Where a field's value comes from when construction does not supply one.
#[derive(Clone, Debug)]
pub enum FieldDefault {
    /// A fixed value.
    Value(Value),
    /// Called once per construction.
    Factory(fn() -> Value),
}

impl FieldDefault {
    pub fn produce(&self) -> Value {
        match self {
            FieldDefault::Value(v) => v.clone(),
            FieldDefault::Factory(make) => make(),
        }
    }
}

/// Definition of an enum type.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnumDef {
    /// Members in declaration order, with the value each stands for.
    pub members: Vec<(Name, Value)>,
}

impl EnumDef {
    /// Value of the named member.
    pub fn member(&self, name: &str) -> Option<&Value> {
        self.members
            .iter()
            .find(|(member, _)| *member == name)
            .map(|(_, value)| value)
    }

    /// Name of the first member whose value equals `value`.
    pub fn member_by_value(&self, value: &Value) -> Option<&Name> {
        self.members
            .iter()
            .find(|(_, v)| v == value)
            .map(|(member, _)| member)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.member(name).is_some()
    }
}

/// Errors raised while populating a registry.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("type `{0}` is already declared")]
    DuplicateType(Name),

    #[error("record `{record}` names unknown base `{base}`")]
    UnknownBase { record: Name, base: Name },

    #[error("record `{record}` names base `{base}`, which is not a record")]
    BaseNotRecord { record: Name, base: Name },

    #[error("field `{record}.{field}` refers to undeclared type `{name}`")]
    UnresolvedReference {
        record: Name,
        field: Name,
        name: Name,
    },
}

/// Declaration of a record type, before base fields are merged in.
#[derive(Clone)]
pub struct RecordDecl {
    name: Name,
    bases: Vec<Name>,
    fields: Vec<FieldDef>,
    validators: Vec<Validator>,
}

impl RecordDecl {
    pub fn new(name: impl Into<Name>) -> Self {
        RecordDecl {
            name: name.into(),
            bases: Vec::new(),
            fields: Vec::new(),
            validators: Vec::new(),
        }
    }

    #[must_use]
    pub fn base(mut self, base: impl Into<Name>) -> Self {
        self.bases.push(base.into());
        self
    }

    /// Add a required field.
    #[must_use]
    pub fn field(mut self, name: impl Into<Name>, ty: Ty) -> Self {
        self.fields.push(FieldDef::required(name, ty));
        self
    }

    /// Add a field with a fixed default value.
    #[must_use]
    pub fn field_default(mut self, name: impl Into<Name>, ty: Ty, default: Value) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            ty,
            default: Some(FieldDefault::Value(default)),
        });
        self
    }

    /// Add a field whose default is produced by `factory` on each construction.
    #[must_use]
    pub fn field_factory(mut self, name: impl Into<Name>, ty: Ty, factory: fn() -> Value) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            ty,
            default: Some(FieldDefault::Factory(factory)),
        });
        self
    }

    #[must_use]
    pub fn push_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a post-construction validator.
    #[must_use]
    pub fn validator(
        mut self,
        check: impl Fn(&RecordValue) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.validators.push(Arc::new(check));
        self
    }

    pub fn name(&self) -> &Name {
        &self.name
    }
}

impl fmt::Debug for RecordDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordDecl")
            .field("name", &self.name)
            .field("bases", &self.bases)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

/// Declaration of an enum type.
#[derive(Clone, Debug)]
pub struct EnumDecl {
    name: Name,
    members: Vec<(Name, Value)>,
}

impl EnumDecl {
    pub fn new(name: impl Into<Name>) -> Self {
        EnumDecl {
            name: name.into(),
            members: Vec::new(),
        }
    }

    #[must_use]
    pub fn member(mut self, name: impl Into<Name>, value: impl Into<Value>) -> Self {
        self.members.push((name.into(), value.into()));
        self
    }

    pub fn name(&self) -> &Name {
        &self.name
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a record type.
    ///
    /// Every base must already be registered as a record. Bases are merged
    /// right to left: the last base's fields come first, the record's own
    /// fields last. A field declared again keeps its first position and
    /// takes the later definition.
    pub fn register_record(&mut self, decl: RecordDecl) -> Result<(), RegistryError> {
        let RecordDecl {
            name,
            bases,
            fields: own_fields,
            validators: own_validators,
        } = decl;

        if self.types_by_name.contains_key(&name) {
            return Err(RegistryError::DuplicateType(name));
        }

        let mut fields: Vec<FieldDef> = Vec::new();
        let mut validators: Vec<Validator> = Vec::new();
        for base in bases.iter().rev() {
            let def = match self.types_by_name.get(base).map(|e| &e.kind) {
                Some(TypeKind::Record(def)) => def,
                Some(TypeKind::Enum(_)) => {
                    return Err(RegistryError::BaseNotRecord {
                        record: name,
                        base: base.clone(),
                    });
                }
                None => {
                    return Err(RegistryError::UnknownBase {
                        record: name,
                        base: base.clone(),
                    });
                }
            };
            for field in &def.fields {
                merge_field(&mut fields, field.clone());
            }
            validators.extend(def.validators.iter().cloned());
        }
        for field in own_fields {
            merge_field(&mut fields, field);
        }
        validators.extend(own_validators);

        tracing::debug!(record = %name, fields = fields.len(), "registered record");
        self.insert_entry(TypeEntry {
            name,
            kind: TypeKind::Record(RecordDef {
                fields,
                bases,
                validators,
            }),
        });
        Ok(())
    }

    /// Register an enum type.
    pub fn register_enum(&mut self, decl: EnumDecl) -> Result<(), RegistryError> {
        let EnumDecl { name, members } = decl;
        if self.types_by_name.contains_key(&name) {
            return Err(RegistryError::DuplicateType(name));
        }
        tracing::debug!(enum_type = %name, members = members.len(), "registered enum");
        self.insert_entry(TypeEntry {
            name,
            kind: TypeKind::Enum(EnumDef { members }),
        });
        Ok(())
    }

    /// Declare a type-variable name.
    ///
    /// The annotation parser turns declared names into [`Ty::Var`]
    /// placeholders instead of named references.
    pub fn register_type_var(&mut self, name: impl Into<Name>) {
        self.type_vars.insert(name.into());
    }

    fn insert_entry(&mut self, entry: TypeEntry) {
        self.order.push(entry.name.clone());
        self.types_by_name.insert(entry.name.clone(), entry);
    }

    // Lookup

    #[inline]
    pub fn get(&self, name: &str) -> Option<&TypeEntry> {
        self.types_by_name.get(name)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.types_by_name.contains_key(name)
    }

    #[inline]
    pub fn is_type_var(&self, name: &str) -> bool {
        self.type_vars.contains(name)
    }

    /// Iterate over registered types in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeEntry> {
        self.order
            .iter()
            .filter_map(|name| self.types_by_name.get(name))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Verify that every named reference in every record field resolves.
    ///
    /// Registration accepts dangling names so that forward references work;
    /// call this once all declarations are in.
    pub fn check_references(&self) -> Result<(), RegistryError> {
        for entry in self.iter() {
            let TypeKind::Record(def) = &entry.kind else {
                continue;
            };
            for field in &def.fields {
                let mut dangling: Option<Name> = None;
                field.ty.for_each_named(&mut |name| {
                    if dangling.is_none() && !self.contains(name) {
                        dangling = Some(name.clone());
                    }
                });
                if let Some(name) = dangling {
                    return Err(RegistryError::UnresolvedReference {
                        record: entry.name.clone(),
                        field: field.name.clone(),
                        name,
                    });
                }
            }
        }
        Ok(())
    }
}

fn merge_field(fields: &mut Vec<FieldDef>, field: FieldDef) {
    if let Some(slot) = fields.iter_mut().find(|f| f.name == field.name) {
        *slot = field;
    } else {
        fields.push(field);
    }
}

/// Read access to declared types, as the checker and coercer need it.
pub trait FieldTable {
    /// Look up a declared type by name.
    fn lookup(&self, name: &str) -> Option<&TypeEntry>;

    fn record(&self, name: &str) -> Option<&RecordDef> {
        match &self.lookup(name)?.kind {
            TypeKind::Record(def) => Some(def),
            TypeKind::Enum(_) => None,
        }
    }

    fn enumeration(&self, name: &str) -> Option<&EnumDef> {
        match &self.lookup(name)?.kind {
            TypeKind::Enum(def) => Some(def),
            TypeKind::Record(_) => None,
        }
    }

    /// Whether `sub` is `sup` or declares it, directly or transitively, as
    /// a base.
    fn is_subtype(&self, sub: &str, sup: &str) -> bool {
        sub == sup
            || self
                .record(sub)
                .is_some_and(|def| def.bases.iter().any(|base| self.is_subtype(base, sup)))
    }

    /// Build an instance of record `name` from the provided field values.
    ///
    /// Missing fields take their defaults; validators run on the result.
    /// Field values are not checked against their declared types.
    fn instantiate(
        &self,
        name: &str,
        provided: Vec<(Name, Value)>,
    ) -> Result<RecordValue, ConstructError> {
        construct::instantiate(self, name, provided)
    }
}

impl FieldTable for TypeRegistry {
    #[inline]
    fn lookup(&self, name: &str) -> Option<&TypeEntry> {
        self.get(name)
    }
}
