//! Record schema validation.
//!
//! This module provides [`ObjectSchema`] for validating JSON objects with
//! named child schemas. Fields are validated in declaration order and every
//! failing field is reported, each with the first error of its own chain.
//!
//! Each child sees the full input record as its payload, which is how
//! cross-field rules such as "confirm must equal password" are written.
//!
//! Two kinds share this type. `map` coerces a list into an index-keyed object
//! when coercion is enabled; `object` never converts containers.

use serde_json::{Map, Value};

use crate::error::ValidationError;

use super::kind::Kind;
use super::pipeline::{Pipeline, UnknownKeys};
use super::traits::{Chain, SchemaLike};

/// A schema for validating JSON objects.
///
/// # Example
///
/// ```rust
/// use sluice::{Chain, Schema, SchemaLike};
/// use serde_json::json;
///
/// let signup = Schema::object()
///     .field("name", Schema::string().trim().required("name is required"))
///     .field("age", Schema::integer().coerce().min(13))
///     .field("newsletter", Schema::boolean().coerce().default_value(false));
///
/// let output = signup.validate(json!({"name": " Ada ", "age": "36"})).unwrap();
/// assert_eq!(
///     output,
///     Some(json!({"name": "Ada", "age": 36, "newsletter": false}))
/// );
///
/// let errors = signup.validate(json!({"age": 7})).unwrap_err();
/// assert_eq!(
///     errors.tree().flatten_pairs(),
///     vec![
///         ("name".to_string(), "name is required".to_string()),
///         ("age".to_string(), "must be at least 13".to_string()),
///     ]
/// );
/// ```
#[derive(Clone, Debug)]
pub struct ObjectSchema {
    pipeline: Pipeline,
}

impl ObjectSchema {
    /// Creates a record schema of the `map` kind.
    pub fn map() -> Self {
        Self {
            pipeline: Pipeline::new(Kind::Map),
        }
    }

    /// Creates a record schema of the `object` kind.
    pub fn object() -> Self {
        Self {
            pipeline: Pipeline::new(Kind::Object),
        }
    }

    /// Declares a field validated by `schema`.
    ///
    /// Declaring the same name twice replaces the earlier schema but keeps
    /// its position.
    pub fn field(mut self, name: impl Into<String>, schema: impl Into<Pipeline>) -> Self {
        self.pipeline.insert_field(name.into(), schema.into());
        self
    }

    /// Sets how keys that are not declared as fields are handled.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Schema, SchemaLike, UnknownKeys};
    /// use serde_json::json;
    ///
    /// let strict = Schema::object()
    ///     .field("id", Schema::integer())
    ///     .unknown_keys(UnknownKeys::Reject("unexpected field".into()));
    ///
    /// let errors = strict.validate(json!({"id": 1, "admin": true})).unwrap_err();
    /// assert_eq!(
    ///     errors.tree().flatten_pairs(),
    ///     vec![("admin".to_string(), "unexpected field".to_string())]
    /// );
    /// ```
    pub fn unknown_keys(mut self, policy: UnknownKeys) -> Self {
        self.pipeline.set_unknown_keys(policy);
        self
    }

    /// The declared field names, in order.
    pub fn field_names(&self) -> Vec<&str> {
        self.pipeline.field_names()
    }

    /// Validates `record` and returns only the output map.
    ///
    /// Convenience for callers that always pass an object and want an empty
    /// map rather than absent back.
    pub fn validate_record(&self, record: Value) -> Result<Map<String, Value>, ValidationError> {
        match self.validate(record)? {
            Some(Value::Object(map)) => Ok(map),
            _ => Ok(Map::new()),
        }
    }
}

impl Default for ObjectSchema {
    fn default() -> Self {
        Self::map()
    }
}

impl SchemaLike for ObjectSchema {
    fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }
}

impl Chain for ObjectSchema {
    fn pipeline_mut(&mut self) -> &mut Pipeline {
        &mut self.pipeline
    }
}

impl From<ObjectSchema> for Pipeline {
    fn from(schema: ObjectSchema) -> Self {
        schema.pipeline
    }
}
