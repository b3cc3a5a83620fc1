//! Integration tests for the logical combinators.

use serde_json::json;
use sluice::{combinators, Chain, Discrete, ErrorTree, Pipeline, Schema, SchemaLike};

#[test]
fn test_all_of_requires_both() {
    let a: Pipeline = Schema::integer().min(0).into();
    let b: Pipeline = Schema::integer()
        .satisfies(|v, _, _| v.as_i64().is_some_and(|n| n % 2 == 0), "odd")
        .into();

    let schema = Schema::integer().all_of([a.clone(), b.clone()], "must be a non-negative even number");

    let cases = [
        (json!(4), true),
        (json!(-4), false),
        (json!(3), false),
        (json!(-3), false),
    ];
    for (value, expected) in cases {
        let both = a.try_validate(value.clone()).accepted && b.try_validate(value.clone()).accepted;
        assert_eq!(both, expected);
        assert_eq!(schema.try_validate(value).accepted, expected);
    }
}

#[test]
fn test_only_combinator_message_is_reported() {
    let schema = Schema::string().all_of(
        [
            Schema::string().min_len(3).into(),
            Schema::string().max_len(5).into(),
        ],
        "must be 3 to 5 characters",
    );

    assert_eq!(
        schema.try_validate(json!("ab")).errors,
        Some(ErrorTree::message("must be 3 to 5 characters"))
    );
}

#[test]
fn test_any_of() {
    let id = Schema::string().coerce().any_of(
        [
            Schema::string().pattern(r"^\d+$").unwrap().into(),
            Schema::string().pattern(r"^[a-f0-9-]{36}$").unwrap().into(),
        ],
        "must be a numeric id or a uuid",
    );

    assert!(id.try_validate(json!(42)).accepted);
    assert!(id.try_validate(json!("123e4567-e89b-12d3-a456-426614174000")).accepted);
    assert!(!id.try_validate(json!("abc")).accepted);
}

#[test]
fn test_any_of_inner_schemas_see_the_narrowed_value() {
    // The coerced integer is what the alternatives see
    let schema = Schema::integer()
        .coerce()
        .any_of(
            [Schema::integer().max(0).into(), Schema::integer().min(100).into()],
            "must be <= 0 or >= 100",
        );

    assert!(schema.try_validate(json!("150")).accepted);
    assert!(!schema.try_validate(json!("50")).accepted);
}

#[test]
fn test_not() {
    let schema = Schema::string().not(
        Schema::string().allowed_or_absent(["root"]).required("x"),
        "reserved name",
    );

    // The inner schema accepts only "root", so everything else passes
    assert!(schema.try_validate(json!("ada")).accepted);
    assert_eq!(
        schema.try_validate(json!("root")).errors,
        Some(ErrorTree::message("reserved name"))
    );
}

#[test]
fn test_combinator_as_standalone_check() {
    let positive_or_zero = combinators::any_of(
        [
            Schema::integer().positive().into(),
            Schema::integer().allowed([0], "not zero").into(),
        ],
        "must not be negative",
    );

    let schema = Schema::integer().check(positive_or_zero);
    assert!(schema.try_validate(json!(0)).accepted);
    assert!(schema.try_validate(json!(3)).accepted);
    assert!(!schema.try_validate(json!(-3)).accepted);
}

#[test]
fn test_combinators_inside_records_see_payload() {
    let same_as_password = Schema::string().satisfies(
        |value, _, payload| payload.get("password") == Some(value),
        "mismatch",
    );

    let schema = Schema::object()
        .field("password", Schema::string())
        .field(
            "confirm",
            Schema::string().all_of([same_as_password.into()], "passwords do not match"),
        );

    assert!(schema
        .try_validate(json!({"password": "pw", "confirm": "pw"}))
        .accepted);
    assert_eq!(
        schema
            .try_validate(json!({"password": "pw", "confirm": "wp"}))
            .errors
            .map(|t| t.flatten_pairs()),
        Some(vec![("confirm".to_string(), "passwords do not match".to_string())])
    );
}
