use pretty_assertions::assert_eq;

use super::*;

fn s(text: &str) -> Value {
    Value::string(text)
}

#[test]
fn set_drops_duplicates() {
    let set = Value::set(vec![Value::Int(1), Value::Int(2), Value::Int(1)]);
    assert_eq!(set.to_string(), "{1, 2}");
}

#[test]
fn set_equality_ignores_order_and_flavour() {
    let a = Value::set(vec![Value::Int(1), Value::Int(2)]);
    let b = Value::frozen_set(vec![Value::Int(2), Value::Int(1)]);
    assert_eq!(a, b);
}

#[test]
fn repeated_map_key_keeps_position_takes_last_value() {
    let map = Value::dict(vec![(s("a"), Value::Int(1)), (s("b"), Value::Int(2)), (s("a"), Value::Int(3))]);
    assert_eq!(map.to_string(), r#"{"a": 3, "b": 2}"#);
}

#[test]
fn dict_equality_ignores_order_unless_both_ordered() {
    let a = Value::dict(vec![(s("x"), Value::Int(1)), (s("y"), Value::Int(2))]);
    let b = Value::dict(vec![(s("y"), Value::Int(2)), (s("x"), Value::Int(1))]);
    assert_eq!(a, b);

    let c = Value::ordered_dict(vec![(s("x"), Value::Int(1)), (s("y"), Value::Int(2))]);
    let d = Value::ordered_dict(vec![(s("y"), Value::Int(2)), (s("x"), Value::Int(1))]);
    assert_ne!(c, d);
    assert_eq!(a, c);
}

#[test]
fn strict_equality_separates_bool_and_int() {
    assert_ne!(Value::Bool(true), Value::Int(1));
    assert_ne!(Value::Int(1), Value::Float(1.0));
}

#[test]
fn loose_equality_follows_host_numbers() {
    assert!(Value::Bool(true).loose_eq(&Value::Int(1)));
    assert!(Value::Int(1).loose_eq(&Value::Float(1.0)));
    assert!(!Value::Int(2).loose_eq(&Value::Bool(true)));
    assert!(!s("1").loose_eq(&Value::Int(1)));
    assert!(Value::tuple(vec![Value::Int(0)]).loose_eq(&Value::tuple(vec![Value::Bool(false)])));
}

#[test]
fn kinds_and_type_names() {
    assert_eq!(Value::None.kind(), ValueKind::None);
    assert_eq!(Value::ordered_dict(vec![]).kind(), ValueKind::OrderedDict);
    let rec = Value::record(RecordValue::new("Point", vec![]));
    assert_eq!(rec.kind(), ValueKind::Record);
    assert_eq!(rec.type_name(), "Point");
    assert_eq!(Value::enum_member("Color", "RED", s("red")).type_name(), "Color");
    assert_eq!(s("x").type_name(), "str");
}

#[test]
fn strings_have_no_sized_items() {
    assert!(s("abc").sized_items().is_none());
    assert!(Value::bytes(b"abc".to_vec()).sized_items().is_none());
    assert!(Value::Int(3).sized_items().is_none());
}

#[test]
fn mapping_items_are_keys() {
    let map = Value::dict(vec![(s("a"), Value::Int(1)), (s("b"), Value::Int(2))]);
    let keys: Vec<&Value> = map.sized_items().into_iter().flatten().collect();
    assert_eq!(keys, vec![&s("a"), &s("b")]);
    assert_eq!(map.sized_items().map(|it| it.len()), Some(2));
}

#[test]
fn display_matches_host_repr() {
    assert_eq!(Value::None.to_string(), "None");
    assert_eq!(Value::Bool(false).to_string(), "False");
    assert_eq!(Value::Float(5.0).to_string(), "5.0");
    assert_eq!(Value::Float(0.25).to_string(), "0.25");
    assert_eq!(Value::tuple(vec![Value::Int(1)]).to_string(), "(1,)");
    assert_eq!(Value::set(vec![]).to_string(), "set()");
    assert_eq!(Value::frozen_set(vec![]).to_string(), "frozenset()");
    assert_eq!(Value::frozen_set(vec![s("a")]).to_string(), r#"frozenset({"a"})"#);
    assert_eq!(Value::class("Job").to_string(), "<class 'Job'>");

    let inner = RecordValue::new("Inner", vec![(Name::from("n"), Value::Int(5))]);
    let outer = RecordValue::new(
        "Outer",
        vec![(Name::from("inner"), inner.into()), (Name::from("tag"), s("x"))],
    );
    assert_eq!(outer.to_string(), r#"Outer(inner=Inner(n=5), tag="x")"#);
}

#[test]
fn record_field_lookup() {
    let rec = RecordValue::new("P", vec![(Name::from("x"), Value::Int(1))]);
    assert_eq!(rec.get("x"), Some(&Value::Int(1)));
    assert_eq!(rec.get("y"), None);
    assert_eq!(rec.len(), 1);
}

#[test]
fn enum_identity_ignores_carried_value() {
    let a = EnumMember::new("Color", "RED", s("red"));
    let b = EnumMember::new("Color", "RED", Value::Int(1));
    let c = EnumMember::new("Color", "BLUE", s("red"));
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn set_members_dedup_by_host_equality() {
    let set = Value::set(vec![Value::Int(1), Value::Bool(true), Value::Float(1.0)]);
    assert_eq!(set.to_string(), "{1}");

    let set = Value::set(vec![Value::Float(0.5), Value::Int(0), Value::Bool(false), Value::Float(0.5)]);
    assert_eq!(set.to_string(), "{0.5, 0}");

    let nan = Value::set(vec![Value::Float(f64::NAN), Value::Float(f64::NAN)]);
    assert_eq!(nan.sized_items().map(|items| items.len()), Some(2));
}

#[test]
fn map_keys_merge_across_numeric_kinds() {
    let map = Value::dict(vec![
        (Value::Int(1), s("a")),
        (Value::Bool(true), s("b")),
        (Value::Float(2.0), s("c")),
        (Value::Int(2), s("d")),
    ]);
    assert_eq!(map.to_string(), r#"{1: "b", 2.0: "d"}"#);
}

#[test]
fn container_members_dedup_without_hashing() {
    let set = Value::frozen_set(vec![
        Value::tuple(vec![Value::Int(1), s("x")]),
        Value::tuple(vec![Value::Bool(true), s("x")]),
        Value::tuple(vec![Value::Int(2), s("x")]),
    ]);
    assert_eq!(set.to_string(), r#"frozenset({(1, "x"), (2, "x")})"#);
}

#[test]
fn loose_equality_is_exact_for_large_numbers() {
    let big = i64::MAX;
    // i64::MAX rounds up to 2^63 as a float.
    #[allow(clippy::cast_precision_loss, reason = "the rounding is the point")]
    let rounded = big as f64;
    assert!(!Value::Int(big).loose_eq(&Value::Float(rounded)));
    assert!(Value::Int(1 << 53).loose_eq(&Value::Float(9_007_199_254_740_992.0)));
    assert!(!Value::Int(1).loose_eq(&Value::Float(1.5)));
}

#[test]
fn large_sets_and_maps_build_quickly() {
    let n = 200_000;
    let items: Vec<Value> = (0..n).chain(0..n).map(Value::Int).collect();
    let set = Value::set(items);
    assert_eq!(set.sized_items().map(|items| items.len()), Some(200_000));

    let entries: Vec<(Value, Value)> = (0..n)
        .map(|i| (Value::string(format!("k{i}")), Value::Int(i)))
        .collect();
    let map = Value::dict(entries);
    assert_eq!(map.as_entries().map(<[_]>::len), Some(200_000));
}

#[test]
fn deeply_nested_values_drop() {
    let mut value = Value::None;
    for i in 0..100_000 {
        value = match i % 4 {
            0 => Value::list(vec![value]),
            1 => Value::dict(vec![(s("k"), value)]),
            2 => Value::record(RecordValue::new("R", vec![(Name::from("f"), value)])),
            _ => Value::tuple(vec![value, Value::Int(i)]),
        };
    }
    let shared = value.clone();
    drop(value);
    assert!(matches!(shared, Value::Tuple(_)));
    drop(shared);
}
