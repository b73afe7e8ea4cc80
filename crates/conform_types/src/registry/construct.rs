//! Record construction from field values.

use conform_value::{Name, RecordValue, Value};

use super::FieldTable;

/// Why a record could not be built.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConstructError {
    #[error("`{0}` is not a declared record type")]
    UnknownRecord(Name),

    #[error("missing required field `{field}`")]
    MissingField { field: Name },

    #[error("unexpected field `{field}`")]
    UnexpectedField { field: Name },

    /// A validator refused the constructed record.
    #[error("{message}")]
    Rejected { message: String },
}

pub(super) fn instantiate<T: FieldTable + ?Sized>(
    table: &T,
    name: &str,
    provided: Vec<(Name, Value)>,
) -> Result<RecordValue, ConstructError> {
    let Some(def) = table.record(name) else {
        return Err(ConstructError::UnknownRecord(Name::new(name)));
    };

    if let Some((field, _)) = provided.iter().find(|(field, _)| !def.has_field(field)) {
        return Err(ConstructError::UnexpectedField {
            field: field.clone(),
        });
    }

    let mut provided = provided;
    let mut fields = Vec::with_capacity(def.fields.len());
    for field in &def.fields {
        let value = match provided.iter().position(|(n, _)| *n == field.name) {
            Some(pos) => provided.swap_remove(pos).1,
            None => match &field.default {
                Some(default) => default.produce(),
                None => {
                    return Err(ConstructError::MissingField {
                        field: field.name.clone(),
                    });
                }
            },
        };
        fields.push((field.name.clone(), value));
    }

    let record = RecordValue::new(name, fields);
    for validate in &def.validators {
        validate(&record).map_err(|message| ConstructError::Rejected { message })?;
    }

    tracing::trace!(record = name, "constructed record");
    Ok(record)
}
