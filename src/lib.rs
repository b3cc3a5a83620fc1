//! # Sluice
//!
//! A declarative validation and transformation engine for untrusted
//! structured input such as form payloads and API bodies.
//!
//! ## Overview
//!
//! A schema is a chain of steps that runs in a fixed order: optional
//! coercion of the raw input, a type check, validation steps that stop at the
//! first failure, then transformation steps in declaration order, and finally
//! the default when the value is still absent. Records and lists compose
//! schemas recursively; within a record every failing field is reported, each
//! with the first error of its own chain.
//!
//! Values are [`serde_json::Value`]s. Absence is `None` (see [`ABSENT`]) and
//! is distinct from every data value; JSON `null` input is treated as absent.
//!
//! ## Core Types
//!
//! - [`Schema`]: entry point for creating validation schemas
//! - [`Pipeline`]: the kind-erased engine behind every schema
//! - [`Outcome`]: the `(accepted, value, errors)` result of one run
//! - [`ErrorTree`]: nested errors keyed by field name or index
//! - [`SchemaError`] / [`SchemaErrors`]: flattened `(path, message)` errors
//! - [`CheckRegistry`]: named, shareable validation steps
//!
//! ## Example
//!
//! ```rust
//! use sluice::{Chain, Schema, SchemaLike};
//! use serde_json::json;
//!
//! let user = Schema::object()
//!     .field("name", Schema::string().trim().nullify_empty().required("name is required"))
//!     .field("age", Schema::integer().coerce().min(0))
//!     .field("role", Schema::string().default_value("member"));
//!
//! let output = user.validate(json!({"name": "  Ada ", "age": "36"})).unwrap();
//! assert_eq!(output, Some(json!({"name": "Ada", "age": 36, "role": "member"})));
//!
//! // Every failing field is reported
//! let errors = user.validate(json!({"name": "   ", "age": -1})).unwrap_err();
//! assert_eq!(
//!     errors.tree().flatten_pairs(),
//!     vec![
//!         ("name".to_string(), "name is required".to_string()),
//!         ("age".to_string(), "must be at least 0".to_string()),
//!     ]
//! );
//! ```

use serde_json::Value;

pub mod error;
pub mod path;
pub mod registry;
pub mod schema;
pub mod validation;

pub use error::{ErrorTree, SchemaError, SchemaErrors, ValidationError};
pub use path::{JsonPath, PathSegment, ROOT_KEY};
pub use registry::{CheckRegistry, RegistryError};
pub use schema::{
    combinators, AllowedValues, BooleanSchema, Chain, Check, Discrete, FloatSchema,
    IntegerSchema, Kind, ListSchema, Mismatch, ObjectSchema, Pipeline, PredicateFn, Schema,
    SchemaLike, StringSchema, UnknownKeys,
};
pub use validation::Outcome;

/// The absent value.
///
/// Pass it wherever a validator expects an input to signal "no value at all",
/// as opposed to any data value.
pub const ABSENT: Option<Value> = None;

/// Type alias for validation results using an [`ErrorTree`].
pub type ValidationResult<T> = stillwater::Validation<T, ErrorTree>;
