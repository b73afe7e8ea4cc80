//! Coercion of untyped data into declared shapes.
//!
//! Mappings become record instances, sequences become the declared container
//! kind, and every container in the result is freshly built. Leaves are
//! only kind-checked; nothing is parsed or converted (`"1"` is never an
//! `int`).

use conform_stack::with_stack;
use conform_types::{EnumDef, FieldTable, RecordDef, Ty, TypeKind};
use conform_value::{Kinds, Name, Value};

use crate::check::class_conforms;
use crate::config::{ConformConfig, OpaquePolicy};
use crate::error::{ConformError, PathSegment};

pub(crate) struct Coercer<'t, T: FieldTable + ?Sized> {
    table: &'t T,
    config: &'t ConformConfig,
}

impl<'t, T: FieldTable + ?Sized> Coercer<'t, T> {
    pub(crate) fn new(table: &'t T, config: &'t ConformConfig) -> Self {
        Coercer { table, config }
    }

    pub(crate) fn coerce(&self, data: &Value, ty: &Ty) -> Result<Value, ConformError> {
        with_stack(|| self.coerce_inner(data, ty))
    }

    fn coerce_inner(&self, data: &Value, ty: &Ty) -> Result<Value, ConformError> {
        let mismatch = || Err(ConformError::mismatch(ty, data));
        match ty {
            Ty::Named(name) => match self.table.lookup(name).map(|entry| &entry.kind) {
                Some(TypeKind::Record(def)) => self.coerce_record(data, name, def, ty),
                Some(TypeKind::Enum(def)) => self.coerce_enum(data, name, def, ty),
                None => {
                    tracing::warn!(type_name = %name, "reference to undeclared type");
                    mismatch()
                }
            },

            Ty::Container { kind, item } => {
                let Some(items) = data.sized_items() else {
                    return mismatch();
                };
                let out = items
                    .map(|element| self.coerce(element, item))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(kind.build(out))
            }
            Ty::Mapping {
                kind,
                key: key_ty,
                value: value_ty,
            } => {
                let Some(entries) = data.as_entries() else {
                    return mismatch();
                };
                let mut out = Vec::with_capacity(entries.len());
                for (k, v) in entries {
                    let key = self.coerce(k, key_ty)?;
                    let value = self
                        .coerce(v, value_ty)
                        .map_err(|e| e.within(PathSegment::Key(k.clone())))?;
                    out.push((key, value));
                }
                Ok(Value::map(*kind, out))
            }
            Ty::Tuple(elements) => {
                let Some(items) = data.sized_items().filter(|it| it.len() == elements.len())
                else {
                    return mismatch();
                };
                let out = items
                    .zip(elements)
                    .map(|(item, element_ty)| self.coerce(item, element_ty))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::tuple(out))
            }
            Ty::VarTuple(item_ty) => {
                let Some(items) = data.sized_items() else {
                    return mismatch();
                };
                let out = items
                    .map(|item| self.coerce(item, item_ty))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::tuple(out))
            }
            Ty::Union(alternatives) => {
                for (i, alt) in alternatives.iter().enumerate() {
                    if let Ok(value) = self.coerce(data, alt) {
                        tracing::trace!(alternative = i, ty = %alt, "union alternative matched");
                        return Ok(value);
                    }
                }
                mismatch()
            }
            Ty::Literal(allowed) => {
                if allowed.iter().any(|a| a.loose_eq(data)) {
                    Ok(data.clone())
                } else {
                    mismatch()
                }
            }
            Ty::Class(of) => match data {
                Value::Class(name) if class_conforms(self.table, name, of) => Ok(data.clone()),
                _ => mismatch(),
            },

            Ty::Scalar(scalar) => {
                if scalar.admits(data.kind()) {
                    Ok(data.clone())
                } else {
                    mismatch()
                }
            }
            Ty::None => {
                if data.is_none() {
                    Ok(Value::None)
                } else {
                    mismatch()
                }
            }
            Ty::Callable => {
                if Kinds::CALLABLE.admits(data.kind()) {
                    Ok(data.clone())
                } else {
                    mismatch()
                }
            }
            Ty::Any => Ok(data.clone()),
            Ty::Var(name) => match self.config.opaque {
                OpaquePolicy::Accept => {
                    tracing::warn!(
                        type_var = %name,
                        value = %data,
                        "accepting value for unconstrained type variable without checking it"
                    );
                    Ok(data.clone())
                }
                OpaquePolicy::Reject => mismatch(),
            },
        }
    }

    /// Build a record from a mapping of field name to raw value.
    fn coerce_record(
        &self,
        data: &Value,
        name: &Name,
        def: &RecordDef,
        ty: &Ty,
    ) -> Result<Value, ConformError> {
        let Some(entries) = data.as_entries() else {
            return Err(ConformError::mismatch(ty, data));
        };

        let mut fields = Vec::with_capacity(entries.len());
        for (k, v) in entries {
            let Some(key) = k.as_str() else {
                return Err(ConformError::mismatch(&Ty::str(), k));
            };
            let Some(field) = def.field(key) else {
                return Err(ConformError::unknown_field(Name::new(key), ty, data));
            };
            let value = self
                .coerce(v, &field.ty)
                .map_err(|e| e.within(PathSegment::Field(field.name.clone())))?;
            fields.push((field.name.clone(), value));
        }

        self.table
            .instantiate(name, fields)
            .map(Value::Record)
            .map_err(|cause| ConformError::construction(cause, ty, data))
    }

    fn coerce_enum(
        &self,
        data: &Value,
        name: &Name,
        def: &EnumDef,
        ty: &Ty,
    ) -> Result<Value, ConformError> {
        match data {
            Value::Enum(member)
                if member.type_name() == name.as_str() && def.contains(member.member()) =>
            {
                Ok(data.clone())
            }
            Value::Enum(_) => Err(ConformError::mismatch(ty, data)),
            _ if self.config.enums_by_value => match def.member_by_value(data) {
                Some(member) => Ok(Value::enum_member(name.clone(), member.clone(), data.clone())),
                None => Err(ConformError::mismatch(ty, data)),
            },
            _ => Err(ConformError::mismatch(ty, data)),
        }
    }
}
