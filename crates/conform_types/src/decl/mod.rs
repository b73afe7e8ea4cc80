//! Declarations documents.
//!
//! A JSON document that declares type variables, enums and records, and
//! loads into a [`TypeRegistry`]:
//!
//! ```json
//! {
//!   "type_vars": ["T"],
//!   "enums": [{ "name": "Color", "members": { "RED": "red" } }],
//!   "records": [
//!     { "name": "Inner", "fields": { "n": "int" } },
//!     { "name": "Outer", "bases": [],
//!       "fields": { "inner": "Inner", "tag": { "type": "str", "default": "x" } } }
//!   ]
//! }
//! ```
//!
//! A field is either an annotation string or an object with a `type`
//! annotation and an optional `default`. Defaults are taken as given; they
//! are not coerced to the field type.

use conform_value::json::{from_json, JsonError};
use serde::Deserialize;
use serde_json::Map;

use crate::{
    EnumDecl, ParseError, RecordDecl, RegistryError, TypeParser, TypeRegistry,
};

/// Error loading a declarations document.
#[derive(Debug, thiserror::Error)]
pub enum DeclError {
    #[error("invalid declarations document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("field `{record}.{field}`: {source}")]
    Parse {
        record: String,
        field: String,
        #[source]
        source: ParseError,
    },

    #[error("`{owner}`: {source}")]
    Value {
        owner: String,
        #[source]
        source: JsonError,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("field `{record}.{field}` must be an annotation string or an object with a `type` annotation")]
    InvalidField { record: String, field: String },
}

/// A parsed declarations document.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Declarations {
    #[serde(default)]
    pub type_vars: Vec<String>,

    #[serde(default)]
    pub enums: Vec<EnumDoc>,

    #[serde(default)]
    pub records: Vec<RecordDoc>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnumDoc {
    pub name: String,
    /// Member name to member value, in declaration order.
    pub members: Map<String, serde_json::Value>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordDoc {
    pub name: String,
    #[serde(default)]
    pub bases: Vec<String>,
    /// Field name to annotation or field object, in declaration order.
    #[serde(default)]
    pub fields: Map<String, serde_json::Value>,
}

impl Declarations {
    pub fn from_json_str(src: &str) -> Result<Self, DeclError> {
        Ok(serde_json::from_str(src)?)
    }

    /// Build a registry from these declarations.
    ///
    /// Type variables and enums are registered first so that record field
    /// annotations can refer to them. Records are registered in document
    /// order, so a base must appear before the records that extend it; field
    /// types may refer to records declared anywhere in the document.
    pub fn to_registry(&self) -> Result<TypeRegistry, DeclError> {
        let mut registry = TypeRegistry::new();

        for name in &self.type_vars {
            registry.register_type_var(name.as_str());
        }

        for doc in &self.enums {
            let mut decl = EnumDecl::new(doc.name.as_str());
            for (member, value) in &doc.members {
                let value = from_json(value).map_err(|source| DeclError::Value {
                    owner: format!("{}.{member}", doc.name),
                    source,
                })?;
                decl = decl.member(member.as_str(), value);
            }
            registry.register_enum(decl)?;
        }

        for doc in &self.records {
            let decl = record_decl(&registry, doc)?;
            registry.register_record(decl)?;
        }

        registry.check_references()?;
        tracing::debug!(types = registry.len(), "loaded declarations");
        Ok(registry)
    }
}

fn record_decl(registry: &TypeRegistry, doc: &RecordDoc) -> Result<RecordDecl, DeclError> {
    let parser = TypeParser::with_registry(registry);
    let mut decl = doc
        .bases
        .iter()
        .fold(RecordDecl::new(doc.name.as_str()), |decl, base| {
            decl.base(base.as_str())
        });

    for (field, entry) in &doc.fields {
        let invalid = || DeclError::InvalidField {
            record: doc.name.clone(),
            field: field.clone(),
        };
        let (annotation, default) = match entry {
            serde_json::Value::String(annotation) => (annotation.as_str(), None),
            serde_json::Value::Object(object) => {
                let annotation = object
                    .get("type")
                    .and_then(serde_json::Value::as_str)
                    .ok_or_else(invalid)?;
                if object.keys().any(|k| k != "type" && k != "default") {
                    return Err(invalid());
                }
                (annotation, object.get("default"))
            }
            _ => return Err(invalid()),
        };

        let ty = parser.parse(annotation).map_err(|source| DeclError::Parse {
            record: doc.name.clone(),
            field: field.clone(),
            source,
        })?;
        decl = match default {
            Some(default) => {
                let default = from_json(default).map_err(|source| DeclError::Value {
                    owner: format!("{}.{field}", doc.name),
                    source,
                })?;
                decl.field_default(field.as_str(), ty, default)
            }
            None => decl.field(field.as_str(), ty),
        };
    }

    Ok(decl)
}

impl TypeRegistry {
    /// Parse a declarations document and build a registry from it.
    pub fn from_declarations(src: &str) -> Result<TypeRegistry, DeclError> {
        Declarations::from_json_str(src)?.to_registry()
    }
}

#[cfg(test)]
mod tests;
