//! String schema validation.
//!
//! This module provides [`StringSchema`] for validating string values with
//! constraints like minimum/maximum length and regex patterns, plus the usual
//! normalizing transforms for form input.

use regex::Regex;
use serde_json::Value;

use super::kind::Kind;
use super::pipeline::Pipeline;
use super::traits::{Chain, Discrete, SchemaLike};

/// A schema for validating string values.
///
/// Constraints are validation steps: they run in declaration order and the
/// first failing one is reported. Transforms (`trim`, `lowercase`, `split`)
/// run afterwards, also in declaration order.
///
/// # Example
///
/// ```rust
/// use sluice::{Chain, Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::string()
///     .min_len(3)
///     .max_len(20)
///     .pattern(r"^[a-z ]+$")
///     .unwrap()
///     .trim();
///
/// assert_eq!(schema.validate(json!(" abc ")).unwrap(), Some(json!("abc")));
///
/// // Only the first failing constraint is reported
/// let errors = schema.validate(json!("AB")).unwrap_err();
/// assert_eq!(errors.to_string(), "validation failed: __root__: length must be at least 3");
/// ```
#[derive(Clone, Debug)]
pub struct StringSchema {
    pipeline: Pipeline,
}

impl StringSchema {
    /// Creates a new string schema with no constraints.
    pub fn new() -> Self {
        Self {
            pipeline: Pipeline::new(Kind::String),
        }
    }

    /// Adds a minimum length constraint.
    ///
    /// The string must have at least `min` characters (Unicode scalar values).
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Schema, SchemaLike};
    /// use serde_json::json;
    ///
    /// let schema = Schema::string().min_len(5);
    ///
    /// assert!(schema.try_validate(json!("hello")).accepted);
    /// assert!(!schema.try_validate(json!("hi")).accepted);
    /// ```
    pub fn min_len(self, min: usize) -> Self {
        self.check_str(
            move |s| s.chars().count() >= min,
            format!("length must be at least {}", min),
        )
    }

    /// Adds a maximum length constraint.
    ///
    /// The string must have at most `max` characters (Unicode scalar values).
    pub fn max_len(self, max: usize) -> Self {
        self.check_str(
            move |s| s.chars().count() <= max,
            format!("length must be at most {}", max),
        )
    }

    /// Adds a regex pattern constraint.
    ///
    /// Returns an error if the regex pattern is invalid.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Schema, SchemaLike};
    /// use serde_json::json;
    ///
    /// let schema = Schema::string().pattern(r"^\d+$").unwrap();
    ///
    /// assert!(schema.try_validate(json!("12345")).accepted);
    /// assert!(!schema.try_validate(json!("abc")).accepted);
    /// assert!(Schema::string().pattern("(").is_err());
    /// ```
    pub fn pattern(self, pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(pattern)?;
        Ok(self.check_str(
            move |s| regex.is_match(s),
            format!("must match pattern '{}'", pattern),
        ))
    }

    /// Strips leading and trailing whitespace.
    pub fn trim(self) -> Self {
        self.map_str(|s| s.trim().to_string())
    }

    /// Lowercases the string.
    pub fn lowercase(self) -> Self {
        self.map_str(str::to_lowercase)
    }

    /// Uppercases the string.
    pub fn uppercase(self) -> Self {
        self.map_str(str::to_uppercase)
    }

    /// Splits the string on `separator` into a list of trimmed, non-empty
    /// parts.
    ///
    /// This switches the chain to the list kind, so later type-preserving
    /// transforms see a list.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Chain, Schema, SchemaLike};
    /// use serde_json::json;
    ///
    /// let tags = Schema::string().split(",");
    ///
    /// assert_eq!(
    ///     tags.validate(json!("rust, serde,,json ")).unwrap(),
    ///     Some(json!(["rust", "serde", "json"]))
    /// );
    /// ```
    pub fn split(self, separator: impl Into<String>) -> Self {
        let separator = separator.into();
        self.transform(move |value| match value {
            Value::String(s) => s
                .split(separator.as_str())
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(|part| Value::String(part.to_string()))
                .collect(),
            other => other,
        })
    }

    fn check_str<F>(self, test: F, message: String) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.satisfies(
            move |value, _, _| value.as_str().is_some_and(|s| test(s)),
            message,
        )
    }

    // Strings only; anything a type switch produced passes through.
    fn map_str<F>(self, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.pipe(move |value| match value {
            Value::String(s) => Value::String(f(&s)),
            other => other,
        })
    }
}

impl Default for StringSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaLike for StringSchema {
    fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }
}

impl Chain for StringSchema {
    fn pipeline_mut(&mut self) -> &mut Pipeline {
        &mut self.pipeline
    }
}

impl Discrete for StringSchema {}

impl From<StringSchema> for Pipeline {
    fn from(schema: StringSchema) -> Self {
        schema.pipeline
    }
}
