//! The `check`, `coerce` and `types` commands.
//!
//! Each command returns the text it would print, leaving output and exit
//! codes to the binary.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use conform_check::{check_root, coerce_root_with, ConformConfig};
use conform_types::{FieldDefault, Ty, TypeKind, TypeParser, TypeRegistry};
use conform_value::json::{from_json, to_json};
use conform_value::{Name, Value};

use crate::CliError;

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_owned(),
        source,
    })
}

/// Load a declarations document into a registry.
pub fn load_registry(path: &Path) -> Result<TypeRegistry, CliError> {
    let src = read(path)?;
    let registry = TypeRegistry::from_declarations(&src).map_err(|source| CliError::Decl {
        path: path.to_owned(),
        source,
    })?;
    tracing::debug!(path = %path.display(), types = registry.len(), "loaded declarations");
    Ok(registry)
}

/// Load a data document, choosing the format by extension.
pub fn load_document(path: &Path) -> Result<Value, CliError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let doc: serde_json::Value = match ext.as_deref() {
        Some("json") => {
            let src = read(path)?;
            serde_json::from_str(&src).map_err(|source| CliError::Json {
                path: path.to_owned(),
                source,
            })?
        }
        Some("yaml" | "yml") => {
            let src = read(path)?;
            serde_yaml::from_str(&src).map_err(|source| CliError::Yaml {
                path: path.to_owned(),
                source,
            })?
        }
        _ => {
            return Err(CliError::UnsupportedFormat {
                path: path.to_owned(),
            })
        }
    };
    from_json(&doc).map_err(|source| CliError::Document {
        path: path.to_owned(),
        source,
    })
}

/// Parse a target type expression, requiring every name in it to be declared.
pub fn resolve_target(registry: &TypeRegistry, target: &str) -> Result<Ty, CliError> {
    let ty = TypeParser::with_registry(registry).parse(target)?;
    let mut missing = None;
    ty.for_each_named(&mut |name| {
        if missing.is_none() && !registry.contains(name) {
            missing = Some(name.clone());
        }
    });
    match missing {
        Some(name) => Err(CliError::UnknownType(name)),
        None => Ok(ty),
    }
}

fn coerce_document(
    decls: &Path,
    target: &str,
    data: &Path,
    config: &ConformConfig,
) -> Result<(TypeRegistry, Ty, Value), CliError> {
    let registry = load_registry(decls)?;
    let ty = resolve_target(&registry, target)?;
    let doc = load_document(data)?;
    let value = coerce_root_with(&registry, &doc, &ty, config)?;
    Ok((registry, ty, value))
}

/// Coerce the document and check the result.
pub fn check(
    decls: &Path,
    target: &str,
    data: &Path,
    config: &ConformConfig,
) -> Result<String, CliError> {
    let (registry, ty, value) = coerce_document(decls, target, data, config)?;
    check_root(&registry, &value, &ty)?;
    Ok(format!("OK: {ty}"))
}

/// Coerce the document and render the result as pretty JSON.
pub fn coerce(
    decls: &Path,
    target: &str,
    data: &Path,
    config: &ConformConfig,
) -> Result<String, CliError> {
    let (_, _, value) = coerce_document(decls, target, data, config)?;
    serde_json::to_string_pretty(&to_json(&value)).map_err(CliError::Render)
}

/// List declared types in declaration order.
pub fn types(decls: &Path) -> Result<String, CliError> {
    let registry = load_registry(decls)?;
    let mut out = String::new();
    for entry in registry.iter() {
        match &entry.kind {
            TypeKind::Record(def) => {
                let _ = write!(out, "record {}", entry.name);
                if !def.bases.is_empty() {
                    let bases: Vec<&str> = def.bases.iter().map(Name::as_str).collect();
                    let _ = write!(out, "({})", bases.join(", "));
                }
                out.push('\n');
                for field in &def.fields {
                    let _ = write!(out, "    {}: {}", field.name, field.ty);
                    match &field.default {
                        Some(FieldDefault::Value(v)) => {
                            let _ = write!(out, " = {v}");
                        }
                        Some(FieldDefault::Factory(_)) => out.push_str(" = <factory>"),
                        None => {}
                    }
                    out.push('\n');
                }
            }
            TypeKind::Enum(def) => {
                let _ = writeln!(out, "enum {}", entry.name);
                for (member, value) in &def.members {
                    let _ = writeln!(out, "    {member} = {value}");
                }
            }
        }
    }
    Ok(out.trim_end().to_owned())
}
