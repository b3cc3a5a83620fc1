//! Traits shared by every schema type.
//!
//! [`SchemaLike`] is the invocation side (`validate`, `try_validate`) and
//! [`Chain`] the configuration side: every builder method that is meaningful
//! for any kind lives here once, as a default method over the underlying
//! [`Pipeline`].

use std::sync::Arc;

use serde_json::Value;

use crate::error::ValidationError;
use crate::path::JsonPath;
use crate::registry::{CheckRegistry, RegistryError};
use crate::validation::Outcome;

use super::check::Check;
use super::combinators;
use super::pipeline::{AllowedValues, Mismatch, Pipeline};

/// A validator that can be run on a value.
///
/// # Example
///
/// ```rust
/// use sluice::{Chain, Schema, SchemaLike, ABSENT};
/// use serde_json::json;
///
/// let age = Schema::integer().coerce().min(0);
///
/// assert_eq!(age.validate(json!("42")).unwrap(), Some(json!(42)));
/// assert_eq!(age.validate(ABSENT).unwrap(), None);
/// assert!(age.validate(json!(-1)).is_err());
/// ```
pub trait SchemaLike {
    /// The pipeline that implements this schema.
    fn pipeline(&self) -> &Pipeline;

    /// Validates a value found at `key` inside `payload`.
    ///
    /// Records call this on their children with the field path and the
    /// record's own input, so checks can look at sibling fields.
    fn try_validate_at(&self, value: Option<Value>, key: &JsonPath, payload: &Value) -> Outcome {
        self.pipeline().run(value, key, payload)
    }

    /// Validates a top-level value and returns the full outcome.
    ///
    /// Pass a `Value` directly, or [`ABSENT`](crate::ABSENT) for no value.
    fn try_validate(&self, value: impl Into<Option<Value>>) -> Outcome {
        self.try_validate_at(value.into(), &JsonPath::root(), &Value::Null)
    }

    /// Validates a top-level value, returning the error tree on failure.
    fn validate(&self, value: impl Into<Option<Value>>) -> Result<Option<Value>, ValidationError> {
        self.try_validate(value).into_result()
    }
}

/// Builder methods common to every kind.
///
/// Each method consumes the schema and returns it, so configuration reads as
/// one chain. Transformation steps run in the order they are chained.
pub trait Chain: Sized {
    /// Mutable access to the underlying pipeline.
    fn pipeline_mut(&mut self) -> &mut Pipeline;

    /// Enables the kind's coercion of raw input before the type check.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Chain, Schema, SchemaLike};
    /// use serde_json::json;
    ///
    /// let flag = Schema::boolean().coerce();
    /// assert_eq!(flag.validate(json!("yes")).unwrap(), Some(json!(true)));
    /// assert_eq!(flag.validate(json!("")).unwrap(), None);
    /// ```
    fn coerce(mut self) -> Self {
        self.pipeline_mut().set_coerce(true);
        self
    }

    /// Fails with `message` if the value is absent at this point of the chain.
    fn required(mut self, message: impl Into<String>) -> Self {
        self.pipeline_mut().push_required(message.into());
        self
    }

    /// Substitutes `value` when the result is absent. Applied last.
    fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.pipeline_mut().set_default(value.into());
        self
    }

    /// Adds a validation step from a predicate over value, key and payload.
    fn satisfies<F>(self, test: F, message: impl Into<String>) -> Self
    where
        F: Fn(&Value, &JsonPath, &Value) -> bool + Send + Sync + 'static,
    {
        self.check(Check::new(test, message))
    }

    /// Adds a prepared validation step.
    fn check(mut self, check: Check) -> Self {
        self.pipeline_mut().push_check(check);
        self
    }

    /// Adds the check registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::CheckNotFound` if nothing is registered under
    /// `name`.
    fn check_named(self, registry: &CheckRegistry, name: &str) -> Result<Self, RegistryError> {
        let check = registry
            .get(name)
            .ok_or_else(|| RegistryError::CheckNotFound(name.to_string()))?;
        Ok(self.check(check))
    }

    /// Adds a type-preserving transform.
    ///
    /// The output is re-normalized for the kind the chain is currently in,
    /// so a list transform may return a keyed map and still yield a list.
    fn pipe<F>(self, f: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.try_pipe(move |v| Ok(f(v)))
    }

    /// Adds a fallible type-preserving transform.
    ///
    /// Returning `Err` fails the field with the error's tree.
    fn try_pipe<F>(mut self, f: F) -> Self
    where
        F: Fn(Value) -> Result<Value, ValidationError> + Send + Sync + 'static,
    {
        self.pipeline_mut().push_transform(Arc::new(f), false);
        self
    }

    /// Adds a type-switching transform.
    ///
    /// Later type-preserving transforms normalize for the kind of this
    /// transform's output instead of the declared kind.
    fn transform<F>(self, f: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.try_transform(move |v| Ok(f(v)))
    }

    /// Adds a fallible type-switching transform.
    fn try_transform<F>(mut self, f: F) -> Self
    where
        F: Fn(Value) -> Result<Value, ValidationError> + Send + Sync + 'static,
    {
        self.pipeline_mut().push_transform(Arc::new(f), true);
        self
    }

    /// Turns blank strings, empty lists and empty maps into absent.
    fn nullify_empty(mut self) -> Self {
        self.pipeline_mut().push_nullify_empty();
        self
    }

    /// Writes this field's value under `key` in the enclosing record.
    fn rename(mut self, key: impl Into<String>) -> Self {
        self.pipeline_mut().set_output_key(key.into());
        self
    }

    /// Sets a custom message for the most recent validation step.
    ///
    /// If no validation step has been added yet, this sets the type error
    /// message instead.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Chain, ErrorTree, Schema, SchemaLike};
    /// use serde_json::json;
    ///
    /// let age = Schema::integer()
    ///     .min(18)
    ///     .error("must be at least 18 years old");
    ///
    /// let outcome = age.try_validate(json!(16));
    /// assert_eq!(outcome.errors, Some(ErrorTree::message("must be at least 18 years old")));
    /// ```
    fn error(mut self, message: impl Into<String>) -> Self {
        self.pipeline_mut().set_error(message.into());
        self
    }

    /// Replaces the message reported when the type check fails.
    fn type_error(mut self, message: impl Into<String>) -> Self {
        self.pipeline_mut().set_type_error(message.into());
        self
    }

    /// Requires every one of `engines` to accept the value.
    fn all_of<I>(self, engines: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = Pipeline>,
    {
        self.check(combinators::all_of(engines, message))
    }

    /// Requires at least one of `engines` to accept the value.
    fn any_of<I>(self, engines: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = Pipeline>,
    {
        self.check(combinators::any_of(engines, message))
    }

    /// Requires `engine` to reject the value.
    fn not(self, engine: impl Into<Pipeline>, message: impl Into<String>) -> Self {
        self.check(combinators::not(engine, message))
    }
}

/// Membership restrictions for kinds compared by exact equality.
///
/// Implemented by the string, integer, float and boolean schemas only.
pub trait Discrete: Chain {
    /// Rejects any value that is not exactly one of `values`.
    ///
    /// The check runs before the type check and reports `message` alone.
    fn allowed<I, V>(mut self, values: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.pipeline_mut()
            .restrict(AllowedValues::new(values, Mismatch::Reject(message.into())));
        self
    }

    /// Replaces any value that is not one of `values` with absent.
    ///
    /// Runs as a transformation step, after the transforms chained before it.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Chain, Discrete, Schema, SchemaLike};
    /// use serde_json::json;
    ///
    /// let size = Schema::string()
    ///     .lowercase()
    ///     .allowed_or_absent(["s", "m", "l"])
    ///     .default_value("m");
    ///
    /// assert_eq!(size.validate(json!("L")).unwrap(), Some(json!("l")));
    /// assert_eq!(size.validate(json!("xxl")).unwrap(), Some(json!("m")));
    /// ```
    fn allowed_or_absent<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.pipeline_mut()
            .restrict(AllowedValues::new(values, Mismatch::Discard));
        self
    }
}

impl SchemaLike for Pipeline {
    fn pipeline(&self) -> &Pipeline {
        self
    }
}

impl Chain for Pipeline {
    fn pipeline_mut(&mut self) -> &mut Pipeline {
        self
    }
}
