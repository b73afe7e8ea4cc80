use pretty_assertions::assert_eq;

use super::*;
use crate::{EnumDecl, TypeRegistry};

fn parse(src: &str) -> Ty {
    parse_ty(src).unwrap_or_else(|e| panic!("failed to parse `{src}`: {e}"))
}

#[test]
fn scalars_and_specials() {
    assert_eq!(parse("int"), Ty::int());
    assert_eq!(parse("float"), Ty::float());
    assert_eq!(parse("bool"), Ty::bool());
    assert_eq!(parse("str"), Ty::str());
    assert_eq!(parse("bytes"), Ty::bytes());
    assert_eq!(parse("None"), Ty::None);
    assert_eq!(parse("Any"), Ty::Any);
    assert_eq!(parse("typing.Any"), Ty::Any);
}

#[test]
fn containers_in_both_spellings() {
    assert_eq!(parse("List[int]"), Ty::list(Ty::int()));
    assert_eq!(parse("list[str]"), Ty::list(Ty::str()));
    assert_eq!(parse("Set[int]"), Ty::set(Ty::int()));
    assert_eq!(parse("frozenset[str]"), Ty::frozen_set(Ty::str()));
    assert_eq!(parse("typing.List[int]"), Ty::list(Ty::int()));
    assert_eq!(parse("list"), Ty::list(Ty::Any));
}

#[test]
fn nested_mappings() {
    assert_eq!(
        parse("Dict[str, List[Dict[str, int]]]"),
        Ty::dict(Ty::str(), Ty::list(Ty::dict(Ty::str(), Ty::int())))
    );
    assert_eq!(
        parse("collections.OrderedDict[str, Job]"),
        Ty::ordered_dict(Ty::str(), Ty::named("Job"))
    );
    assert_eq!(parse("dict"), Ty::dict(Ty::Any, Ty::Any));
}

#[test]
fn unions_and_optionals() {
    assert_eq!(parse("Optional[int]"), Ty::optional(Ty::int()));
    assert_eq!(parse("int | None"), Ty::optional(Ty::int()));
    assert_eq!(
        parse("Union[int, str, None]"),
        Ty::Union(vec![Ty::int(), Ty::str(), Ty::None])
    );
    assert_eq!(
        parse("Optional[Union[int, str]]"),
        Ty::Union(vec![Ty::int(), Ty::str(), Ty::None])
    );
    assert_eq!(parse("Union[int]"), Ty::int());
}

#[test]
fn tuples() {
    assert_eq!(
        parse("Tuple[int, str]"),
        Ty::tuple(vec![Ty::int(), Ty::str()])
    );
    assert_eq!(parse("Tuple[int, ...]"), Ty::var_tuple(Ty::int()));
    assert_eq!(parse("tuple[()]"), Ty::tuple(vec![]));
    assert_eq!(parse("Tuple"), Ty::var_tuple(Ty::Any));
    assert!(parse_ty("Tuple[int, str, ...]").is_err());
}

#[test]
fn literals() {
    assert_eq!(
        parse("Literal['a', \"b\", 1, -2, True, None]"),
        Ty::literal(vec![
            Value::string("a"),
            Value::string("b"),
            Value::Int(1),
            Value::Int(-2),
            Value::Bool(true),
            Value::None,
        ])
    );
}

#[test]
fn enum_literals_take_member_values_from_registry() {
    let mut registry = TypeRegistry::new();
    registry
        .register_enum(EnumDecl::new("Color").member("RED", "red"))
        .expect("Color");

    let ty = TypeParser::with_registry(&registry)
        .parse("Literal[Color.RED]")
        .expect("parse");
    let Ty::Literal(values) = &ty else {
        panic!("expected a literal, got {ty:?}");
    };
    match &values[0] {
        Value::Enum(member) => {
            assert_eq!(member.member(), "RED");
            assert_eq!(member.value(), &Value::string("red"));
        }
        other => panic!("expected an enum member, got {other:?}"),
    }

    let err = TypeParser::with_registry(&registry)
        .parse("Literal[Color.BLUE]")
        .expect_err("unknown member");
    assert_eq!(
        err,
        ParseError::BadLiteral {
            text: "Color.BLUE".to_owned()
        }
    );
}

#[test]
fn callable_and_class() {
    assert_eq!(parse("Callable"), Ty::Callable);
    assert_eq!(parse("Callable[[int, str], bool]"), Ty::Callable);
    assert_eq!(parse("Type[Job]"), Ty::class(Ty::named("Job")));
    assert_eq!(parse("type"), Ty::class(Ty::Any));
}

#[test]
fn forward_references() {
    assert_eq!(parse("'Node'"), Ty::named("Node"));
    assert_eq!(
        parse("List['Optional[Node]']"),
        Ty::list(Ty::optional(Ty::named("Node")))
    );
}

#[test]
fn type_vars_need_a_registry() {
    let mut registry = TypeRegistry::new();
    registry.register_type_var("T");

    assert_eq!(parse("List[T]"), Ty::list(Ty::named("T")));
    assert_eq!(
        TypeParser::with_registry(&registry)
            .parse("List[T]")
            .expect("parse"),
        Ty::list(Ty::var("T"))
    );
}

#[test]
fn display_parses_back() {
    for src in [
        "Dict[str, List[int]]",
        "Optional[FrozenSet[str]]",
        "Union[int, str, None]",
        "Tuple[int, ...]",
        "Tuple[()]",
        "OrderedDict[str, Type[Job]]",
    ] {
        assert_eq!(parse(src).to_string(), src);
    }
}

#[test]
fn errors() {
    assert_eq!(
        parse_ty("List[int"),
        Err(ParseError::UnexpectedEnd {
            src: "List[int".to_owned()
        })
    );
    assert_eq!(
        parse_ty("Dict[str]"),
        Err(ParseError::Arity {
            name: "Dict".to_owned(),
            expected: 2,
            found: 1,
        })
    );
    assert_eq!(
        parse_ty("int[str]"),
        Err(ParseError::NotGeneric {
            name: "int".to_owned()
        })
    );
    assert_eq!(
        parse_ty("'Node"),
        Err(ParseError::UnterminatedString { offset: 0 })
    );
    assert!(matches!(
        parse_ty("List[int]]"),
        Err(ParseError::Unexpected { offset: 9, .. })
    ));
    assert!(matches!(
        parse_ty("List[$]"),
        Err(ParseError::Unexpected { offset: 5, .. })
    ));
    assert!(matches!(parse_ty("Optional"), Err(ParseError::Arity { .. })));
}

#[test]
fn deeply_nested_annotation_parses_and_frees() {
    const DEPTH: usize = 200_000;
    let src = format!("{}Leaf{}", "List[".repeat(DEPTH), "]".repeat(DEPTH));
    let ty = parse(&src);

    let mut depth = 0;
    let mut cursor = &ty;
    while let Ty::Container { item, .. } = cursor {
        depth += 1;
        cursor = item;
    }
    assert_eq!(depth, DEPTH);
    assert_eq!(cursor, &Ty::named("Leaf"));

    let mut names = Vec::new();
    ty.for_each_named(&mut |name| names.push(name.to_string()));
    assert_eq!(names, vec!["Leaf".to_owned()]);
    assert_eq!(ty.to_string().len(), src.len());
    drop(ty);
}
