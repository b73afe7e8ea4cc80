//! Checked construction.
//!
//! Build a record from field values, then check the result against its
//! declaration. Either failure surfaces as a [`TypeError`].

use conform_types::{FieldTable, Ty};
use conform_value::{Name, RecordValue, Value};

use crate::check_type;
use crate::error::{ConformError, TypeError};

/// Construct record `name` from `fields` and check it.
///
/// Missing fields take their declared defaults. A missing required field, an
/// undeclared field or a validator rejection is reported as a construction
/// failure; a field value of the wrong type as a mismatch at that field.
#[tracing::instrument(level = "debug", skip(table, fields))]
pub fn construct_checked<T: FieldTable + ?Sized>(
    table: &T,
    name: &str,
    fields: Vec<(Name, Value)>,
) -> Result<RecordValue, TypeError> {
    let provided = Value::dict(
        fields
            .iter()
            .map(|(field, value)| (Value::string(field.as_str()), value.clone()))
            .collect(),
    );
    let record = table
        .instantiate(name, fields)
        .map_err(|cause| ConformError::construction(cause, &Ty::named(name), &provided))?;
    check_type(table, &record)?;
    Ok(record)
}

/// Builder over [`construct_checked`].
///
/// ```text
/// let job = RecordBuilder::new(&registry, "Job")
///     .set("id", 7)
///     .set("tags", Value::frozen_set(vec![]))
///     .build()?;
/// ```
pub struct RecordBuilder<'t, T: FieldTable + ?Sized> {
    table: &'t T,
    name: Name,
    fields: Vec<(Name, Value)>,
}

impl<'t, T: FieldTable + ?Sized> RecordBuilder<'t, T> {
    pub fn new(table: &'t T, name: impl Into<Name>) -> Self {
        RecordBuilder {
            table,
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Set a field. Setting the same field again replaces the earlier value.
    #[must_use]
    pub fn set(mut self, field: impl Into<Name>, value: impl Into<Value>) -> Self {
        let field = field.into();
        let value = value.into();
        if let Some(slot) = self.fields.iter_mut().find(|(n, _)| *n == field) {
            slot.1 = value;
        } else {
            self.fields.push((field, value));
        }
        self
    }

    pub fn build(self) -> Result<RecordValue, TypeError> {
        construct_checked(self.table, &self.name, self.fields)
    }
}
