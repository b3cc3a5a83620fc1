//! List schema validation.
//!
//! This module provides [`ListSchema`] for validating lists with an optional
//! item schema, length constraints, filtering and uniqueness requirements.
//!
//! Validation happens in two layers. The item schema runs on every index and
//! all failing indices are reported together, keyed by index. Cross-item
//! constraints (`unique_by`, `cross_item`) then look at the validated items as
//! a whole and their errors are merged into the same tree.

use std::sync::Arc;

use serde_json::Value;

use crate::error::ErrorTree;
use crate::path::PathSegment;

use super::kind::Kind;
use super::pipeline::Pipeline;
use super::traits::{Chain, SchemaLike};

/// A schema for validating list values.
///
/// # Example
///
/// ```rust
/// use sluice::{Chain, Schema, SchemaLike};
/// use serde_json::json;
///
/// let scores = Schema::list_of(Schema::integer().min(1)).max_items(10);
///
/// let errors = scores.validate(json!([5, -2, 0, 10])).unwrap_err();
/// assert_eq!(
///     errors.tree().flatten_pairs(),
///     vec![
///         ("1".to_string(), "must be at least 1".to_string()),
///         ("2".to_string(), "must be at least 1".to_string()),
///     ]
/// );
/// ```
#[derive(Clone, Debug)]
pub struct ListSchema {
    pipeline: Pipeline,
}

impl ListSchema {
    /// Creates a list schema that accepts items of any kind.
    pub fn new() -> Self {
        Self {
            pipeline: Pipeline::new(Kind::List),
        }
    }

    /// Validates every item with `schema`.
    ///
    /// Items come out in their validated form. An item whose result is
    /// absent is kept as `null` so indices do not shift.
    pub fn item(mut self, schema: impl Into<Pipeline>) -> Self {
        self.pipeline.set_item(schema.into());
        self
    }

    /// Requires at least `min` items.
    pub fn min_items(self, min: usize) -> Self {
        self.check_list(
            move |items| items.len() >= min,
            format!("must have at least {} items", min),
        )
    }

    /// Requires at most `max` items.
    pub fn max_items(self, max: usize) -> Self {
        self.check_list(
            move |items| items.len() <= max,
            format!("must have at most {} items", max),
        )
    }

    /// Requires at least one item.
    pub fn non_empty(self) -> Self {
        self.min_items(1)
    }

    /// Keeps only the items for which `keep` returns true.
    ///
    /// Runs as a transformation step.
    pub fn filter<F>(self, keep: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.pipe(move |value| match value {
            Value::Array(items) => Value::Array(items.into_iter().filter(|item| keep(item)).collect()),
            other => other,
        })
    }

    /// Drops repeated items, keeping the first occurrence of each.
    ///
    /// Runs as a transformation step; items are compared by JSON equality.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Schema, SchemaLike};
    /// use serde_json::json;
    ///
    /// let tags = Schema::list().unique();
    /// assert_eq!(tags.validate(json!(["a", "b", "a"])).unwrap(), Some(json!(["a", "b"])));
    /// ```
    pub fn unique(self) -> Self {
        self.pipe(|value| match value {
            Value::Array(items) => {
                let mut kept: Vec<Value> = Vec::with_capacity(items.len());
                for item in items {
                    if !kept.contains(&item) {
                        kept.push(item);
                    }
                }
                Value::Array(kept)
            }
            other => other,
        })
    }

    /// Requires the items' `field` values to be distinct.
    ///
    /// Every repeat occurrence fails with `message` at `index.field`; the
    /// first occurrence is not reported. Items without the field are ignored.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Schema, SchemaLike};
    /// use serde_json::json;
    ///
    /// let users = Schema::list().unique_by("email", "email already used");
    ///
    /// let errors = users
    ///     .validate(json!([{"email": "a@x"}, {"email": "b@x"}, {"email": "a@x"}]))
    ///     .unwrap_err();
    /// assert_eq!(
    ///     errors.tree().flatten_pairs(),
    ///     vec![("2.email".to_string(), "email already used".to_string())]
    /// );
    /// ```
    pub fn unique_by(self, field: impl Into<String>, message: impl Into<String>) -> Self {
        let field = field.into();
        let message = message.into();
        self.cross_item(move |items| {
            let mut seen: Vec<&Value> = Vec::new();
            let mut repeats = Vec::new();
            for (index, item) in items.iter().enumerate() {
                let Some(key) = item.get(&field).filter(|v| !v.is_null()) else {
                    continue;
                };
                if seen.contains(&key) {
                    repeats.push((
                        PathSegment::Index(index),
                        ErrorTree::nested([(field.as_str(), ErrorTree::message(message.clone()))]),
                    ));
                } else {
                    seen.push(key);
                }
            }
            (!repeats.is_empty()).then(|| ErrorTree::nested(repeats))
        })
    }

    /// Adds a constraint over the validated items as a whole.
    ///
    /// `check` returns `None` to accept, or an error tree (usually keyed by
    /// index) that is merged with the per-item errors.
    pub fn cross_item<F>(mut self, check: F) -> Self
    where
        F: Fn(&[Value]) -> Option<ErrorTree> + Send + Sync + 'static,
    {
        self.pipeline.push_cross_item(Arc::new(check));
        self
    }

    fn check_list<F>(self, test: F, message: String) -> Self
    where
        F: Fn(&[Value]) -> bool + Send + Sync + 'static,
    {
        self.satisfies(
            move |value, _, _| value.as_array().is_some_and(|items| test(items)),
            message,
        )
    }
}

impl Default for ListSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaLike for ListSchema {
    fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }
}

impl Chain for ListSchema {
    fn pipeline_mut(&mut self) -> &mut Pipeline {
        &mut self.pipeline
    }
}

impl From<ListSchema> for Pipeline {
    fn from(schema: ListSchema) -> Self {
        schema.pipeline
    }
}
