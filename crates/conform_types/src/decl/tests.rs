use pretty_assertions::assert_eq;

use conform_value::Value;

use super::*;
use crate::{FieldDefault, FieldTable, Ty};

const DOC: &str = r#"{
    "type_vars": ["T"],
    "enums": [{ "name": "Color", "members": { "RED": "red", "BLUE": "blue" } }],
    "records": [
        { "name": "Outer", "fields": { "inner": "Inner", "tag": { "type": "str", "default": "x" } } },
        { "name": "Inner", "fields": { "n": "int", "color": "Optional[Color]", "extra": "T" } },
        { "name": "Special", "bases": ["Inner"], "fields": { "flag": "Literal[Color.RED, 'on']" } }
    ]
}"#;

#[test]
fn loads_records_enums_and_type_vars() {
    let registry = TypeRegistry::from_declarations(DOC).expect("load");

    let names: Vec<&str> = registry.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Color", "Outer", "Inner", "Special"]);

    let outer = registry.record("Outer").expect("Outer");
    assert_eq!(outer.fields[0].ty, Ty::named("Inner"));
    assert_eq!(outer.fields[1].ty, Ty::str());
    assert!(matches!(
        outer.fields[1].default.as_ref().map(FieldDefault::produce),
        Some(Value::Str(ref s)) if s.as_str() == "x"
    ));

    let inner = registry.record("Inner").expect("Inner");
    assert_eq!(inner.fields[1].ty, Ty::optional(Ty::named("Color")));
    assert_eq!(inner.fields[2].ty, Ty::var("T"));

    let special = registry.record("Special").expect("Special");
    let names: Vec<&str> = special.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["n", "color", "extra", "flag"]);
    assert!(registry.is_subtype("Special", "Inner"));

    let color = registry.enumeration("Color").expect("Color");
    assert_eq!(color.member("BLUE"), Some(&Value::string("blue")));
}

#[test]
fn null_default_is_a_default() {
    let registry = TypeRegistry::from_declarations(
        r#"{ "records": [{ "name": "A", "fields": { "x": { "type": "Optional[int]", "default": null } } }] }"#,
    )
    .expect("load");
    let record = registry.instantiate("A", vec![]).expect("construct");
    assert_eq!(record.get("x"), Some(&Value::None));
}

#[test]
fn unresolved_reference_is_reported() {
    let err = TypeRegistry::from_declarations(
        r#"{ "records": [{ "name": "A", "fields": { "b": "List[B]" } }] }"#,
    )
    .expect_err("B undeclared");
    assert_eq!(err.to_string(), "field `A.b` refers to undeclared type `B`");
}

#[test]
fn bad_annotation_names_the_field() {
    let err = TypeRegistry::from_declarations(
        r#"{ "records": [{ "name": "A", "fields": { "b": "Dict[str]" } }] }"#,
    )
    .expect_err("arity");
    assert!(matches!(err, DeclError::Parse { ref record, ref field, .. } if record == "A" && field == "b"));
    assert_eq!(
        err.to_string(),
        "field `A.b`: `Dict` takes 2 type argument(s), got 1"
    );
}

#[test]
fn invalid_field_declarations() {
    for entry in [r#"42"#, r#"{ "default": 1 }"#, r#"{ "type": "int", "doc": "x" }"#] {
        let src = format!(r#"{{ "records": [{{ "name": "A", "fields": {{ "b": {entry} }} }}] }}"#);
        let err = TypeRegistry::from_declarations(&src).expect_err("invalid field");
        assert!(matches!(err, DeclError::InvalidField { .. }), "{entry}: {err}");
    }
}

#[test]
fn base_must_come_first() {
    let err = TypeRegistry::from_declarations(
        r#"{ "records": [{ "name": "B", "bases": ["A"] }, { "name": "A" }] }"#,
    )
    .expect_err("base after");
    assert!(matches!(
        err,
        DeclError::Registry(RegistryError::UnknownBase { .. })
    ));
}

#[test]
fn malformed_json() {
    let err = Declarations::from_json_str("{ records: ").expect_err("json");
    assert!(matches!(err, DeclError::Json(_)));
    let err = Declarations::from_json_str(r#"{ "recrods": [] }"#).expect_err("unknown key");
    assert!(matches!(err, DeclError::Json(_)));
}

#[test]
fn oversized_integer_defaults_name_their_owner() {
    let err = TypeRegistry::from_declarations(
        r#"{ "records": [{ "name": "Big", "fields": {
            "n": { "type": "int", "default": 18446744073709551615 }
        } }] }"#,
    )
    .expect_err("u64 default");
    assert!(matches!(&err, DeclError::Value { owner, .. } if owner == "Big.n"));
    assert_eq!(
        err.to_string(),
        "`Big.n`: integer 18446744073709551615 does not fit in a 64-bit signed int"
    );

    let err = TypeRegistry::from_declarations(
        r#"{ "enums": [{ "name": "Size", "members": { "HUGE": 9223372036854775808 } }] }"#,
    )
    .expect_err("u64 member");
    assert!(matches!(&err, DeclError::Value { owner, .. } if owner == "Size.HUGE"));
}
