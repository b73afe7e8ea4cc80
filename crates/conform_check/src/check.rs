//! Conformance checking of built values.
//!
//! Walks a value and a descriptor in lockstep and reports the first position
//! where they disagree. Nothing is converted: a mapping never satisfies a
//! record type here, and `1` never satisfies `bool`.

use conform_stack::with_stack;
use conform_types::{FieldTable, Ty, TypeKind};
use conform_value::{Kinds, MapKind, RecordValue, Value, ValueKind};

use crate::error::{ConformError, PathSegment};

pub(crate) struct Checker<'t, T: FieldTable + ?Sized> {
    table: &'t T,
}

impl<'t, T: FieldTable + ?Sized> Checker<'t, T> {
    pub(crate) fn new(table: &'t T) -> Self {
        Checker { table }
    }

    pub(crate) fn check(&self, value: &Value, ty: &Ty) -> Result<(), ConformError> {
        with_stack(|| self.check_inner(value, ty))
    }

    fn check_inner(&self, value: &Value, ty: &Ty) -> Result<(), ConformError> {
        let mismatch = || Err(ConformError::mismatch(ty, value));
        match ty {
            Ty::Named(name) => match self.table.lookup(name).map(|entry| &entry.kind) {
                Some(TypeKind::Record(_)) => match value {
                    Value::Record(record) if self.table.is_subtype(record.type_name(), name) => {
                        self.check_record(record)
                    }
                    _ => mismatch(),
                },
                Some(TypeKind::Enum(def)) => match value {
                    Value::Enum(member)
                        if member.type_name() == name.as_str() && def.contains(member.member()) =>
                    {
                        Ok(())
                    }
                    _ => mismatch(),
                },
                None => {
                    tracing::warn!(type_name = %name, "reference to undeclared type");
                    mismatch()
                }
            },

            // Generic shapes: origin kind first, then the arguments.
            Ty::Container { kind, item } => {
                if value.kind() != kind.value_kind() {
                    return mismatch();
                }
                for element in value.sized_items().into_iter().flatten() {
                    self.check(element, item)?;
                }
                Ok(())
            }
            Ty::Mapping {
                kind,
                key: key_ty,
                value: value_ty,
            } => {
                let admitted = match kind {
                    MapKind::Dict => Kinds::MAPPING,
                    MapKind::OrderedDict => Kinds::ORDERED_DICT,
                };
                let Some(entries) = value.as_entries().filter(|_| admitted.admits(value.kind()))
                else {
                    return mismatch();
                };
                for (k, v) in entries {
                    self.check(k, key_ty)?;
                    self.check(v, value_ty)
                        .map_err(|e| e.within(PathSegment::Key(k.clone())))?;
                }
                Ok(())
            }
            Ty::Tuple(elements) => match value {
                Value::Tuple(items) if items.len() == elements.len() => {
                    for (item, element_ty) in items.iter().zip(elements) {
                        self.check(item, element_ty)?;
                    }
                    Ok(())
                }
                _ => mismatch(),
            },
            Ty::VarTuple(item_ty) => match value {
                Value::Tuple(items) => {
                    for item in items.iter() {
                        self.check(item, item_ty)?;
                    }
                    Ok(())
                }
                _ => mismatch(),
            },
            Ty::Literal(allowed) => {
                if allowed.iter().any(|a| a.loose_eq(value)) {
                    Ok(())
                } else {
                    mismatch()
                }
            }
            Ty::Union(alternatives) => {
                if alternatives.iter().any(|alt| self.check(value, alt).is_ok()) {
                    Ok(())
                } else {
                    mismatch()
                }
            }
            Ty::Class(of) => match value {
                Value::Class(name) if class_conforms(self.table, name, of) => Ok(()),
                _ => mismatch(),
            },

            Ty::Scalar(scalar) => {
                if scalar.admits(value.kind()) {
                    Ok(())
                } else {
                    mismatch()
                }
            }
            Ty::None => {
                if value.is_none() {
                    Ok(())
                } else {
                    mismatch()
                }
            }
            Ty::Callable => {
                if Kinds::CALLABLE.admits(value.kind()) {
                    Ok(())
                } else {
                    mismatch()
                }
            }
            Ty::Any => Ok(()),
            Ty::Var(name) => {
                tracing::debug!(type_var = %name, "type variable accepts any value");
                Ok(())
            }
        }
    }

    /// Check every field of `record` against its dynamic type's declaration.
    pub(crate) fn check_record(&self, record: &RecordValue) -> Result<(), ConformError> {
        let Some(def) = self.table.record(record.type_name()) else {
            tracing::warn!(record = record.type_name(), "instance of undeclared record type");
            return Err(ConformError::mismatch(
                &Ty::Named(record.type_name_ref().clone()),
                &Value::Record(record.clone()),
            ));
        };

        for field in &def.fields {
            match record.get(&field.name) {
                Some(value) => self
                    .check(value, &field.ty)
                    .map_err(|e| e.within(PathSegment::Field(field.name.clone())))?,
                None => {
                    return Err(ConformError::construction(
                        conform_types::ConstructError::MissingField {
                            field: field.name.clone(),
                        },
                        &Ty::Named(record.type_name_ref().clone()),
                        &Value::Record(record.clone()),
                    ));
                }
            }
        }

        if let Some((extra, _)) = record.fields().iter().find(|(n, _)| !def.has_field(n)) {
            return Err(ConformError::unknown_field(
                extra.clone(),
                &Ty::Named(record.type_name_ref().clone()),
                &Value::Record(record.clone()),
            ));
        }
        Ok(())
    }
}

/// Whether the class named `name` satisfies `Type[of]`.
pub(crate) fn class_conforms<T: FieldTable + ?Sized>(table: &T, name: &str, of: &Ty) -> bool {
    match of {
        Ty::Any => true,
        Ty::Named(sup) => table.is_subtype(name, sup),
        Ty::Scalar(scalar) => name == scalar.name(),
        Ty::None => name == ValueKind::None.name(),
        Ty::Union(alternatives) => alternatives
            .iter()
            .any(|alt| class_conforms(table, name, alt)),
        _ => false,
    }
}
