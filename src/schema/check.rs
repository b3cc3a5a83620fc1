//! Validation steps.
//!
//! A [`Check`] wraps any `(value, key, payload) -> bool` predicate together
//! with the message reported when it fails. Every built-in constraint
//! (`min_len`, `min`, `min_items`, the logical combinators) and every custom
//! rule registered through `satisfies` ends up as one `Check` on a pipeline.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::path::JsonPath;

/// Shared predicate signature: the narrowed value, its key path, and the
/// payload of the enclosing record (or `null` at the top level).
pub type PredicateFn = Arc<dyn Fn(&Value, &JsonPath, &Value) -> bool + Send + Sync>;

/// A predicate plus the message reported when it fails.
///
/// # Example
///
/// ```rust
/// use sluice::{Chain, Check, Schema, SchemaLike};
/// use serde_json::json;
///
/// let even = Check::value(|v| v.as_i64().is_some_and(|n| n % 2 == 0), "must be even");
/// let schema = Schema::integer().check(even);
///
/// assert!(schema.try_validate(json!(4)).accepted);
/// assert!(!schema.try_validate(json!(5)).accepted);
/// ```
#[derive(Clone)]
pub struct Check {
    test: PredicateFn,
    message: String,
}

impl Check {
    /// Creates a check from a predicate that sees the key and payload.
    ///
    /// The payload is the full input of the enclosing record, which lets a
    /// field compare itself with its siblings.
    pub fn new<F>(test: F, message: impl Into<String>) -> Self
    where
        F: Fn(&Value, &JsonPath, &Value) -> bool + Send + Sync + 'static,
    {
        Self {
            test: Arc::new(test),
            message: message.into(),
        }
    }

    /// Creates a check from a predicate over the value alone.
    pub fn value<F>(test: F, message: impl Into<String>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::new(move |value, _, _| test(value), message)
    }

    /// Returns a copy of this check reporting `message` instead.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub(crate) fn set_message(&mut self, message: String) {
        self.message = message;
    }

    /// The message reported on failure.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Evaluates the predicate.
    pub fn passes(&self, value: &Value, key: &JsonPath, payload: &Value) -> bool {
        (self.test)(value, key, payload)
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}
