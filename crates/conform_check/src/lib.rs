//! Structural conformance checking and coercion.
//!
//! Two recursive walks over a [`Ty`] descriptor and a [`Value`]:
//!
//! - **check**: does an already built value conform? Records are checked
//!   field by field against the declaration of their dynamic type.
//! - **coerce**: build the declared shape from untyped data, turning
//!   mappings into record instances and rebuilding every container.
//!
//! Both stop at the first violation and report it with the path from the
//! root to the offending value:
//!
//! ```text
//! Error in field 'inner -> n'. Expected type int, got str (value: "bad")
//! ```
//!
//! Internally every frame returns `Result<_, ConformError>`; the public entry
//! points wrap the error in [`TypeError`].

mod check;
mod coerce;
mod config;
mod error;
mod guard;

use conform_types::{FieldTable, Ty};
use conform_value::{RecordValue, Value};

use check::Checker;
use coerce::Coercer;

pub use config::{ConformConfig, OpaquePolicy};
pub use error::{ConformError, ErrorKind, PathSegment, TypeError};
pub use guard::{construct_checked, RecordBuilder};

/// Check a record instance against its declared fields.
///
/// The declaration used is that of the record's dynamic type, so an
/// instance of a derived record is checked against all of its fields.
#[tracing::instrument(level = "debug", skip_all, fields(record = record.type_name()))]
pub fn check_type<T: FieldTable + ?Sized>(
    table: &T,
    record: &RecordValue,
) -> Result<(), TypeError> {
    Checker::new(table).check_record(record)?;
    Ok(())
}

/// Check any value against any descriptor.
#[tracing::instrument(level = "debug", skip_all, fields(ty = %ty))]
pub fn check_root<T: FieldTable + ?Sized>(
    table: &T,
    value: &Value,
    ty: &Ty,
) -> Result<(), TypeError> {
    Checker::new(table).check(value, ty)?;
    Ok(())
}

/// Coerce `data` into an instance of record `record` with default options.
pub fn coerce_into<T: FieldTable + ?Sized>(
    table: &T,
    data: &Value,
    record: &str,
) -> Result<Value, TypeError> {
    coerce_root(table, data, &Ty::named(record))
}

/// Coerce `data` into an instance of record `record`.
pub fn coerce_into_with<T: FieldTable + ?Sized>(
    table: &T,
    data: &Value,
    record: &str,
    config: &ConformConfig,
) -> Result<Value, TypeError> {
    coerce_root_with(table, data, &Ty::named(record), config)
}

/// Coerce `data` into the shape `ty` with default options.
pub fn coerce_root<T: FieldTable + ?Sized>(
    table: &T,
    data: &Value,
    ty: &Ty,
) -> Result<Value, TypeError> {
    coerce_root_with(table, data, ty, &ConformConfig::default())
}

/// Coerce `data` into the shape `ty`.
#[tracing::instrument(level = "debug", skip_all, fields(ty = %ty))]
pub fn coerce_root_with<T: FieldTable + ?Sized>(
    table: &T,
    data: &Value,
    ty: &Ty,
    config: &ConformConfig,
) -> Result<Value, TypeError> {
    let value = Coercer::new(table, config).coerce(data, ty)?;
    Ok(value)
}
