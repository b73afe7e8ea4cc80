//! Property-based tests for the checker and coercer.
//!
//! Random descriptors and random document-shaped values are generated and
//! the following is verified:
//! 1. Whatever the coercer produces conforms to the target type.
//! 2. Checking is deterministic: the same value and type give the same
//!    verdict and the same error.
//! 3. Coercion is idempotent: coercing a coerced value changes nothing.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use conform_check::{check_root, check_type, coerce_into, coerce_root};
use conform_types::{Ty, TypeRegistry};
use conform_value::Value;
use proptest::prelude::*;

// -- Strategies --

/// Descriptors over builtin shapes (no named records).
fn ty_strategy() -> impl Strategy<Value = Ty> {
    let leaf = prop_oneof![
        Just(Ty::int()),
        Just(Ty::str()),
        Just(Ty::bool()),
        Just(Ty::float()),
        Just(Ty::None),
        Just(Ty::Any),
    ];
    leaf.prop_recursive(4, 24, 3, |inner| {
        prop_oneof![
            inner.clone().prop_map(Ty::list),
            inner.clone().prop_map(Ty::set),
            inner.clone().prop_map(Ty::frozen_set),
            inner.clone().prop_map(|v| Ty::dict(Ty::str(), v)),
            inner.clone().prop_map(Ty::optional),
            inner.clone().prop_map(Ty::var_tuple),
            prop::collection::vec(inner, 0..3).prop_map(Ty::tuple),
        ]
    })
}

/// Values shaped like parsed documents.
fn value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::None),
        any::<bool>().prop_map(Value::Bool),
        (-50i64..50).prop_map(Value::Int),
        (-50i32..50).prop_map(|n| Value::Float(f64::from(n) / 4.0)),
        "[a-c]{0,3}".prop_map(Value::string),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::list),
            prop::collection::vec(("[a-c]{1,2}", inner), 0..4).prop_map(|entries| {
                Value::dict(
                    entries
                        .into_iter()
                        .map(|(k, v)| (Value::string(k), v))
                        .collect(),
                )
            }),
        ]
    })
}

fn outer_registry() -> TypeRegistry {
    TypeRegistry::from_declarations(
        r#"{
            "records": [
                { "name": "Inner", "fields": { "n": "int", "tags": { "type": "List[str]", "default": [] } } },
                { "name": "Outer", "fields": { "inner": "Optional[Inner]", "tag": "str" } }
            ]
        }"#,
    )
    .expect("declarations")
}

// -- Properties --

proptest! {
    #[test]
    fn coerced_output_conforms(ty in ty_strategy(), data in value_strategy()) {
        let registry = TypeRegistry::new();
        if let Ok(out) = coerce_root(&registry, &data, &ty) {
            prop_assert!(
                check_root(&registry, &out, &ty).is_ok(),
                "coerced {} into {} which does not conform to {}",
                data,
                out,
                ty
            );
        }
    }

    #[test]
    fn checking_is_deterministic(ty in ty_strategy(), value in value_strategy()) {
        let registry = TypeRegistry::new();
        let first = check_root(&registry, &value, &ty);
        let second = check_root(&registry, &value, &ty);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn coercion_is_idempotent(ty in ty_strategy(), data in value_strategy()) {
        let registry = TypeRegistry::new();
        if let Ok(once) = coerce_root(&registry, &data, &ty) {
            let twice = coerce_root(&registry, &once, &ty);
            prop_assert_eq!(twice, Ok(once));
        }
    }

    #[test]
    fn well_formed_documents_become_conforming_records(
        n in any::<i64>(),
        tag in "[a-z]{0,8}",
        tags in prop::collection::vec("[a-z]{1,4}", 0..4),
        with_inner in any::<bool>(),
    ) {
        let registry = outer_registry();
        let inner = if with_inner {
            Value::dict(vec![
                (Value::string("n"), Value::Int(n)),
                (
                    Value::string("tags"),
                    Value::list(tags.into_iter().map(Value::string).collect()),
                ),
            ])
        } else {
            Value::None
        };
        let data = Value::dict(vec![
            (Value::string("inner"), inner),
            (Value::string("tag"), Value::string(tag)),
        ]);

        let out = coerce_into(&registry, &data, "Outer").unwrap();
        let record = out.as_record().unwrap();
        prop_assert!(check_type(&registry, record).is_ok());
        prop_assert_eq!(record.get("inner").map(Value::is_none), Some(!with_inner));
    }
}
