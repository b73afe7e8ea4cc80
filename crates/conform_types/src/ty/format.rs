//! Rendering descriptors in annotation syntax.
//!
//! The output parses back with [`parse_ty`](crate::parse_ty).

use std::fmt;

use conform_stack::with_stack;
use conform_value::MapKind;

use super::Ty;

fn write_list(f: &mut fmt::Formatter<'_>, tys: &[Ty]) -> fmt::Result {
    for (i, ty) in tys.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{ty}")?;
    }
    Ok(())
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        with_stack(|| self.fmt_annotation(f))
    }
}

impl Ty {
    fn fmt_annotation(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Any => f.write_str("Any"),
            Ty::None => f.write_str("None"),
            Ty::Scalar(s) => f.write_str(s.name()),
            Ty::Named(name) => f.write_str(name),
            Ty::Container { kind, item } => write!(f, "{}[{item}]", kind.name()),
            Ty::Mapping { kind, key, value } => {
                let origin = match kind {
                    MapKind::Dict => "Dict",
                    MapKind::OrderedDict => "OrderedDict",
                };
                write!(f, "{origin}[{key}, {value}]")
            }
            Ty::Tuple(elements) if elements.is_empty() => f.write_str("Tuple[()]"),
            Ty::Tuple(elements) => {
                f.write_str("Tuple[")?;
                write_list(f, elements)?;
                f.write_str("]")
            }
            Ty::VarTuple(item) => write!(f, "Tuple[{item}, ...]"),
            Ty::Union(_) if self.as_optional().is_some() => {
                let any = Ty::Any;
                let inner = self.as_optional().unwrap_or(&any);
                write!(f, "Optional[{inner}]")
            }
            Ty::Union(alts) => {
                f.write_str("Union[")?;
                write_list(f, alts)?;
                f.write_str("]")
            }
            Ty::Literal(allowed) => {
                f.write_str("Literal[")?;
                for (i, v) in allowed.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
            Ty::Callable => f.write_str("Callable"),
            Ty::Class(of) => write!(f, "Type[{of}]"),
            Ty::Var(name) => write!(f, "~{name}"),
        }
    }
}
