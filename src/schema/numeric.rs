//! Numeric schema validation.
//!
//! This module provides [`IntegerSchema`] and [`FloatSchema`] for validating
//! numbers with bounds and sign requirements, and for clamping them into a
//! range instead of rejecting them.

use std::ops::RangeInclusive;

use serde_json::Value;

use super::kind::Kind;
use super::pipeline::Pipeline;
use super::traits::{Chain, Discrete, SchemaLike};

/// A schema for validating integer values.
///
/// Integral floats such as `3.0` pass the type check and come out as
/// integers. With coercion enabled, numeric strings and booleans are accepted
/// too.
///
/// # Example
///
/// ```rust
/// use sluice::{Chain, Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::integer().coerce().min(0).max(100);
///
/// assert_eq!(schema.validate(json!("42")).unwrap(), Some(json!(42)));
/// assert!(schema.validate(json!(-50)).is_err());
/// ```
#[derive(Clone, Debug)]
pub struct IntegerSchema {
    pipeline: Pipeline,
}

impl IntegerSchema {
    /// Creates a new integer schema with no constraints.
    pub fn new() -> Self {
        Self {
            pipeline: Pipeline::new(Kind::Integer),
        }
    }

    /// Adds a minimum value constraint (inclusive).
    pub fn min(self, value: i64) -> Self {
        self.check_int(move |n| n >= value, format!("must be at least {}", value))
    }

    /// Adds a maximum value constraint (inclusive).
    pub fn max(self, value: i64) -> Self {
        self.check_int(move |n| n <= value, format!("must be at most {}", value))
    }

    /// Adds both minimum and maximum value constraints (inclusive range).
    ///
    /// This is a convenience method equivalent to calling `.min(start).max(end)`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Schema, SchemaLike};
    /// use serde_json::json;
    ///
    /// let schema = Schema::integer().range(1..=100);
    ///
    /// assert!(schema.try_validate(json!(50)).accepted);
    /// assert!(!schema.try_validate(json!(150)).accepted);
    /// ```
    pub fn range(self, range: RangeInclusive<i64>) -> Self {
        self.min(*range.start()).max(*range.end())
    }

    /// Requires the integer to be greater than 0.
    pub fn positive(self) -> Self {
        self.check_int(|n| n > 0, "must be positive".to_string())
    }

    /// Requires the integer to be 0 or greater.
    pub fn non_negative(self) -> Self {
        self.check_int(|n| n >= 0, "must be non-negative".to_string())
    }

    /// Requires the integer to be less than 0.
    pub fn negative(self) -> Self {
        self.check_int(|n| n < 0, "must be negative".to_string())
    }

    /// Moves out-of-range values to the nearest bound instead of rejecting
    /// them.
    ///
    /// Runs as a transformation step.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Schema, SchemaLike};
    /// use serde_json::json;
    ///
    /// let page_size = Schema::integer().clamp(1, 100);
    ///
    /// assert_eq!(page_size.validate(json!(500)).unwrap(), Some(json!(100)));
    /// assert_eq!(page_size.validate(json!(0)).unwrap(), Some(json!(1)));
    /// ```
    pub fn clamp(mut self, min: i64, max: i64) -> Self {
        self.pipeline
            .push_clamp(Some(Value::from(min)), Some(Value::from(max)));
        self
    }

    fn check_int<F>(self, test: F, message: String) -> Self
    where
        F: Fn(i64) -> bool + Send + Sync + 'static,
    {
        self.satisfies(
            move |value, _, _| value.as_i64().is_some_and(|n| test(n)),
            message,
        )
    }
}

impl Default for IntegerSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaLike for IntegerSchema {
    fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }
}

impl Chain for IntegerSchema {
    fn pipeline_mut(&mut self) -> &mut Pipeline {
        &mut self.pipeline
    }
}

impl Discrete for IntegerSchema {}

impl From<IntegerSchema> for Pipeline {
    fn from(schema: IntegerSchema) -> Self {
        schema.pipeline
    }
}

/// A schema for validating floating-point values.
///
/// Integers pass the type check and come out as floats.
#[derive(Clone, Debug)]
pub struct FloatSchema {
    pipeline: Pipeline,
}

impl FloatSchema {
    /// Creates a new float schema with no constraints.
    pub fn new() -> Self {
        Self {
            pipeline: Pipeline::new(Kind::Float),
        }
    }

    /// Adds a minimum value constraint (inclusive).
    pub fn min(self, value: f64) -> Self {
        self.check_float(move |n| n >= value, format!("must be at least {}", value))
    }

    /// Adds a maximum value constraint (inclusive).
    pub fn max(self, value: f64) -> Self {
        self.check_float(move |n| n <= value, format!("must be at most {}", value))
    }

    /// Moves out-of-range values to the nearest bound.
    pub fn clamp(mut self, min: f64, max: f64) -> Self {
        self.pipeline
            .push_clamp(Some(Value::from(min)), Some(Value::from(max)));
        self
    }

    fn check_float<F>(self, test: F, message: String) -> Self
    where
        F: Fn(f64) -> bool + Send + Sync + 'static,
    {
        self.satisfies(
            move |value, _, _| value.as_f64().is_some_and(|n| test(n)),
            message,
        )
    }
}

impl Default for FloatSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaLike for FloatSchema {
    fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }
}

impl Chain for FloatSchema {
    fn pipeline_mut(&mut self) -> &mut Pipeline {
        &mut self.pipeline
    }
}

impl Discrete for FloatSchema {}

impl From<FloatSchema> for Pipeline {
    fn from(schema: FloatSchema) -> Self {
        schema.pipeline
    }
}
