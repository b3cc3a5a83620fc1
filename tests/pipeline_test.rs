//! Integration tests for the field pipeline: ordering, absence, coercion and
//! type transitions.

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use sluice::{Chain, ErrorTree, Schema, SchemaLike, ValidationError, ABSENT};

#[test]
fn test_absent_skips_checks_without_required() {
    let schema = Schema::string().min_len(5);

    let outcome = schema.try_validate(ABSENT);
    assert!(outcome.accepted);
    assert_eq!(outcome.value, None);
    assert_eq!(outcome.errors, None);
}

#[test]
fn test_absent_returns_default() {
    let schema = Schema::string().min_len(5).default_value("fallback");
    assert_eq!(schema.validate(ABSENT).unwrap(), Some(json!("fallback")));
}

#[test]
fn test_null_input_is_absent() {
    let schema = Schema::integer().default_value(7);
    assert_eq!(schema.validate(Value::Null).unwrap(), Some(json!(7)));
}

#[test]
fn test_coercion_turns_empty_string_into_absent() {
    assert_eq!(Schema::string().coerce().validate(json!("")).unwrap(), None);
    assert_eq!(Schema::integer().coerce().validate(json!("")).unwrap(), None);
    assert_eq!(Schema::float().coerce().validate(json!("")).unwrap(), None);
    assert_eq!(Schema::boolean().coerce().validate(json!("")).unwrap(), None);
    assert_eq!(Schema::map().coerce().validate(json!("")).unwrap(), None);
    assert_eq!(Schema::list().coerce().validate(json!("")).unwrap(), Some(json!([])));
}

#[test]
fn test_coercion_then_default() {
    let schema = Schema::integer().coerce().default_value(10);
    assert_eq!(schema.validate(json!("")).unwrap(), Some(json!(10)));
}

#[test]
fn test_without_coercion_empty_string_is_a_string() {
    assert_eq!(Schema::string().validate(json!("")).unwrap(), Some(json!("")));
    assert!(Schema::integer().validate(json!("")).is_err());
}

#[test]
fn test_required_after_nullify_fails() {
    let schema = Schema::string()
        .trim()
        .nullify_empty()
        .required("this field is required");

    let outcome = schema.try_validate(json!("    "));
    assert!(!outcome.accepted);
    assert_eq!(outcome.errors, Some(ErrorTree::message("this field is required")));
}

#[test]
fn test_required_before_nullify_passes() {
    let schema = Schema::string()
        .required("this field is required")
        .nullify_empty();

    assert_eq!(schema.validate(json!("    ")).unwrap(), None);

    let defaulted = schema.default_value("n/a");
    assert_eq!(defaulted.validate(json!("    ")).unwrap(), Some(json!("n/a")));
}

#[test]
fn test_required_on_absent() {
    let schema = Schema::integer().required("missing");
    assert_eq!(
        schema.try_validate(ABSENT).errors,
        Some(ErrorTree::message("missing"))
    );
}

#[test]
fn test_validation_is_fail_fast() {
    let schema = Schema::string()
        .satisfies(|_, _, _| false, "first")
        .satisfies(|_, _, _| false, "second");

    assert_eq!(
        schema.try_validate(json!("x")).errors,
        Some(ErrorTree::message("first"))
    );
}

#[test]
fn test_failure_keeps_narrowed_value() {
    let outcome = Schema::integer().coerce().max(3).try_validate(json!("9"));
    assert!(!outcome.accepted);
    assert_eq!(outcome.value, Some(json!(9)));
}

#[test]
fn test_validation_runs_before_transformation() {
    let schema = Schema::string().trim().max_len(3);
    // The untrimmed input is what max_len sees
    assert!(!schema.try_validate(json!(" ab ")).accepted);
}

#[test]
fn test_custom_type_error() {
    let schema = Schema::integer().type_error("age must be a whole number");
    assert_eq!(
        schema.try_validate(json!("ten")).errors,
        Some(ErrorTree::message("age must be a whole number"))
    );
}

#[test]
fn test_string_to_list_to_integer() {
    let schema = Schema::string()
        .split(",")
        .pipe(|v| match v {
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| (format!("k{}", i), item))
                .collect::<serde_json::Map<_, _>>()
                .into(),
            other => other,
        })
        .transform(|v| json!(v.as_array().map_or(0, Vec::len)))
        .pipe(|v| json!(v.as_f64().unwrap_or(0.0) * 2.0));

    // The keyed map from the second step is re-indexed as a list, and the
    // float from the last step is normalized back to an integer.
    assert_eq!(schema.validate(json!("a, b, c")).unwrap(), Some(json!(6)));
}

#[test]
fn test_type_marker_does_not_leak_between_calls() {
    let schema = Schema::string()
        .transform(|v| match v {
            Value::String(s) if s.is_empty() => json!(0),
            other => json!([other]),
        })
        .pipe(|v| v);

    assert_eq!(schema.validate(json!("x")).unwrap(), Some(json!(["x"])));
    assert_eq!(schema.validate(json!("")).unwrap(), Some(json!(0)));
    assert_eq!(schema.validate(json!("y")).unwrap(), Some(json!(["y"])));
}

#[test]
fn test_transforms_skip_absent_values() {
    let schema = Schema::string()
        .nullify_empty()
        .pipe(|_| json!("never"))
        .default_value("d");

    assert_eq!(schema.validate(json!("")).unwrap(), Some(json!("d")));
}

#[test]
fn test_fallible_transform() {
    let schema = Schema::string().try_pipe(|v| {
        if v == "forbidden" {
            Err(ValidationError::message("that word is not allowed"))
        } else {
            Ok(v)
        }
    });

    assert_eq!(schema.validate(json!("fine")).unwrap(), Some(json!("fine")));
    assert_eq!(
        schema.try_validate(json!("forbidden")).errors,
        Some(ErrorTree::message("that word is not allowed"))
    );
}

#[test]
fn test_fallible_transform_with_structured_error() {
    let schema = Schema::list().try_pipe(|v| match v.as_array().map(Vec::len) {
        Some(len) if len > 1 => Err(ValidationError::new(ErrorTree::nested([(
            1usize,
            ErrorTree::nested([("email", ErrorTree::message("taken"))]),
        )]))),
        _ => Ok(v),
    });

    assert!(schema.try_validate(json!([{}])).accepted);
    assert_eq!(
        schema
            .try_validate(json!([{}, {}]))
            .errors
            .map(|t| t.flatten_pairs()),
        Some(vec![("1.email".to_string(), "taken".to_string())])
    );
}

#[test]
fn test_clone_diverges() {
    let base = Schema::string().trim();
    let shouted = base.clone().uppercase();

    assert_eq!(base.validate(json!(" a ")).unwrap(), Some(json!("a")));
    assert_eq!(shouted.validate(json!(" a ")).unwrap(), Some(json!("A")));
}

#[test]
fn test_into_validation() {
    let validation = Schema::integer().min(1).try_validate(json!(0)).into_validation();
    assert!(validation.is_failure());
}

#[test]
fn test_transform_to_null_is_absent() {
    let cleared = Schema::string().pipe(|_| Value::Null).required("required");
    assert_eq!(
        cleared.try_validate(json!("x")).errors,
        Some(ErrorTree::message("required"))
    );

    let defaulted = Schema::string().transform(|_| Value::Null).default_value("d");
    assert_eq!(defaulted.validate(json!("x")).unwrap(), Some(json!("d")));
}
