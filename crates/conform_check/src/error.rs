//! Conformance errors.
//!
//! A [`ConformError`] is created by the frame that detects the problem. Each
//! enclosing frame that owns a piece of the path (a record field, a mapping
//! key) pushes it while the error unwinds, so the path is stored innermost
//! first and rendered reversed.

use std::error::Error;
use std::fmt;

use conform_types::{ConstructError, Ty};
use conform_value::{Name, Value};
use smallvec::SmallVec;

/// What went wrong at the offending position.
#[derive(Clone, Debug, PartialEq)]
pub enum ErrorKind {
    /// The value's shape or kind does not satisfy the expected type.
    Mismatch,
    /// A mapping key names no declared field of the target record.
    UnknownField { key: Name },
    /// The target record could not be built from the collected fields.
    Construction { cause: ConstructError },
}

/// One step of the path from the root value to the offending one.
#[derive(Clone, Debug, PartialEq)]
pub enum PathSegment {
    Field(Name),
    Key(Value),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => f.write_str(name),
            PathSegment::Key(Value::Str(s)) => f.write_str(s),
            PathSegment::Key(key) => write!(f, "{key}"),
        }
    }
}

/// First violation found by the checker or coercer.
#[derive(Clone, Debug, PartialEq)]
pub struct ConformError {
    kind: ErrorKind,
    expected: Ty,
    value: Value,
    /// Innermost segment first.
    path: SmallVec<[PathSegment; 4]>,
}

impl ConformError {
    pub(crate) fn mismatch(expected: &Ty, value: &Value) -> Self {
        Self::new(ErrorKind::Mismatch, expected.clone(), value.clone())
    }

    pub(crate) fn unknown_field(key: Name, record: &Ty, value: &Value) -> Self {
        Self::new(ErrorKind::UnknownField { key }, record.clone(), value.clone())
    }

    pub(crate) fn construction(cause: ConstructError, record: &Ty, value: &Value) -> Self {
        Self::new(ErrorKind::Construction { cause }, record.clone(), value.clone())
    }

    fn new(kind: ErrorKind, expected: Ty, value: Value) -> Self {
        ConformError {
            kind,
            expected,
            value,
            path: SmallVec::new(),
        }
    }

    /// Record the segment owned by the frame the error is unwinding through.
    #[must_use]
    pub(crate) fn within(mut self, segment: PathSegment) -> Self {
        self.path.push(segment);
        self
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The type the offending value was checked against.
    pub fn expected(&self) -> &Ty {
        &self.expected
    }

    /// The offending value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Path segments from the root down to the offending value.
    pub fn path(&self) -> impl DoubleEndedIterator<Item = &PathSegment> + ExactSizeIterator {
        self.path.iter().rev()
    }

    /// The path joined with ` -> `, root first.
    pub fn path_string(&self) -> String {
        let mut out = String::new();
        for (i, segment) in self.path().enumerate() {
            if i > 0 {
                out.push_str(" -> ");
            }
            out.push_str(&segment.to_string());
        }
        out
    }
}

impl fmt::Display for ConformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error in field '{}'. ", self.path_string())?;
        match &self.kind {
            ErrorKind::Mismatch => write!(
                f,
                "Expected type {}, got {} (value: {})",
                self.expected,
                self.value.type_name(),
                self.value
            ),
            ErrorKind::UnknownField { key } => write!(
                f,
                "Unknown field `{key}` for type {} (value: {})",
                self.expected, self.value
            ),
            ErrorKind::Construction { cause } => write!(
                f,
                "Could not construct {}: {cause} (value: {})",
                self.expected, self.value
            ),
        }
    }
}

impl Error for ConformError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            ErrorKind::Construction { cause } => Some(cause),
            ErrorKind::Mismatch | ErrorKind::UnknownField { .. } => None,
        }
    }
}

/// Failure raised by the public entry points.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error(transparent)]
pub struct TypeError(Box<ConformError>);

impl TypeError {
    /// The underlying conformance error.
    pub fn detail(&self) -> &ConformError {
        &self.0
    }
}

impl From<ConformError> for TypeError {
    fn from(err: ConformError) -> Self {
        TypeError(Box::new(err))
    }
}
