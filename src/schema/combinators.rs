//! Logical combinators over whole pipelines.
//!
//! Each combinator runs complete pipelines against the value being checked and
//! folds their verdicts into one [`Check`]. The result is an ordinary
//! validation step, so it composes with coercion, transformation and record
//! embedding like any other:
//! - `all_of`: every pipeline must accept the value
//! - `any_of`: at least one pipeline must accept the value
//! - `not`: the pipeline must reject the value
//!
//! Only the combinator's own message is reported; the messages of the inner
//! pipelines are not surfaced.
//!
//! # Example
//!
//! ```rust
//! use sluice::{Chain, Schema, SchemaLike};
//! use serde_json::json;
//!
//! // A handle is either a short lowercase slug or a numeric id
//! let handle = Schema::string().any_of(
//!     [
//!         Schema::string().pattern("^[a-z]{3,12}$").unwrap().into(),
//!         Schema::string().pattern("^[0-9]+$").unwrap().into(),
//!     ],
//!     "must be a slug or a numeric id",
//! );
//!
//! assert!(handle.try_validate(json!("alice")).accepted);
//! assert!(handle.try_validate(json!("1234")).accepted);
//! assert!(!handle.try_validate(json!("Alice!")).accepted);
//! ```

use std::sync::Arc;

use serde_json::Value;

use super::check::Check;
use super::pipeline::Pipeline;

fn accepts(engine: &Pipeline, value: &Value, key: &crate::JsonPath, payload: &Value) -> bool {
    engine.run(Some(value.clone()), key, payload).accepted
}

/// A check that passes iff every pipeline accepts the value.
pub fn all_of<I>(engines: I, message: impl Into<String>) -> Check
where
    I: IntoIterator<Item = Pipeline>,
{
    let engines: Arc<[Pipeline]> = engines.into_iter().collect();
    Check::new(
        move |value, key, payload| engines.iter().all(|e| accepts(e, value, key, payload)),
        message,
    )
}

/// A check that passes iff at least one pipeline accepts the value.
///
/// Pipelines are tried in order and the first acceptance short-circuits.
pub fn any_of<I>(engines: I, message: impl Into<String>) -> Check
where
    I: IntoIterator<Item = Pipeline>,
{
    let engines: Arc<[Pipeline]> = engines.into_iter().collect();
    Check::new(
        move |value, key, payload| engines.iter().any(|e| accepts(e, value, key, payload)),
        message,
    )
}

/// A check that passes iff the pipeline rejects the value.
pub fn not(engine: impl Into<Pipeline>, message: impl Into<String>) -> Check {
    let engine: Pipeline = engine.into();
    Check::new(
        move |value, key, payload| !accepts(&engine, value, key, payload),
        message,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use crate::{Chain, JsonPath};
    use serde_json::json;

    fn passes(check: &Check, value: Value) -> bool {
        check.passes(&value, &JsonPath::root(), &Value::Null)
    }

    #[test]
    fn test_all_of() {
        let check = all_of(
            [
                Schema::integer().min(1).into(),
                Schema::integer().max(10).into(),
            ],
            "must be between 1 and 10",
        );

        assert!(passes(&check, json!(5)));
        assert!(!passes(&check, json!(0)));
        assert!(!passes(&check, json!(11)));
    }

    #[test]
    fn test_any_of() {
        let check = any_of(
            [Schema::string().into(), Schema::integer().into()],
            "must be text or a whole number",
        );

        assert!(passes(&check, json!("a")));
        assert!(passes(&check, json!(3)));
        assert!(!passes(&check, json!(true)));
    }

    #[test]
    fn test_any_of_empty_never_passes() {
        let check = any_of(Vec::new(), "nothing matches");
        assert!(!passes(&check, json!(1)));
    }

    #[test]
    fn test_not() {
        let check = not(Schema::string().max_len(3), "must be longer than 3");
        assert!(passes(&check, json!("abcd")));
        assert!(!passes(&check, json!("abc")));
    }
}
