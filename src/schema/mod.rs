//! Schema definitions for validation.
//!
//! Every schema type is a thin typed builder over one [`Pipeline`]. The typed
//! layer only decides which helpers are available (`min_len` on strings,
//! `item` on lists, `field` on records); validation and transformation are
//! the pipeline's job, and any schema converts into a `Pipeline` with `.into()`
//! so it can be nested inside another.
//!
//! # Example
//!
//! ```rust
//! use sluice::{Schema, SchemaLike};
//! use serde_json::json;
//!
//! let schema = Schema::string().min_len(1).max_len(100);
//!
//! assert!(schema.try_validate(json!("hello")).accepted);
//! ```

mod array;
mod boolean;
mod check;
pub mod combinators;
mod kind;
mod numeric;
mod object;
mod pipeline;
mod string;
mod traits;

pub use array::ListSchema;
pub use boolean::BooleanSchema;
pub use check::{Check, PredicateFn};
pub use kind::Kind;
pub use numeric::{FloatSchema, IntegerSchema};
pub use object::ObjectSchema;
pub use pipeline::{AllowedValues, Mismatch, Pipeline, UnknownKeys};
pub use string::StringSchema;
pub use traits::{Chain, Discrete, SchemaLike};

/// Entry point for creating validation schemas.
///
/// # Example
///
/// ```rust
/// use sluice::{Chain, Schema, SchemaLike};
/// use serde_json::json;
///
/// let email = Schema::string()
///     .trim()
///     .lowercase()
///     .pattern(r"^[^@\s]+@[^@\s]+$")
///     .unwrap()
///     .error("must be an email address");
///
/// let tags = Schema::list_of(Schema::string().trim().nullify_empty())
///     .coerce()
///     .unique();
///
/// let profile = Schema::object()
///     .field("email", email.required("email is required"))
///     .field("tags", tags);
///
/// let output = profile
///     .validate(json!({"email": "Ada@Example.com", "tags": "rust"}))
///     .unwrap();
/// assert_eq!(output, Some(json!({"email": "ada@example.com", "tags": ["rust"]})));
/// ```
pub struct Schema;

impl Schema {
    /// Creates a new string schema.
    pub fn string() -> StringSchema {
        StringSchema::new()
    }

    /// Creates a new integer schema.
    ///
    /// Integral floats are accepted and returned as integers; other floats
    /// fail the type check.
    pub fn integer() -> IntegerSchema {
        IntegerSchema::new()
    }

    /// Creates a new float schema.
    pub fn float() -> FloatSchema {
        FloatSchema::new()
    }

    /// Creates a new boolean schema.
    pub fn boolean() -> BooleanSchema {
        BooleanSchema::new()
    }

    /// Creates a list schema with no item schema.
    pub fn list() -> ListSchema {
        ListSchema::new()
    }

    /// Creates a list schema whose items are validated by `item`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Schema, SchemaLike};
    /// use serde_json::json;
    ///
    /// let ids = Schema::list_of(Schema::integer().positive());
    ///
    /// assert!(ids.try_validate(json!([1, 2, 3])).accepted);
    /// assert!(!ids.try_validate(json!([1, 0])).accepted);
    /// ```
    pub fn list_of(item: impl Into<Pipeline>) -> ListSchema {
        ListSchema::new().item(item)
    }

    /// Creates a record schema that coerces lists into index-keyed maps.
    pub fn map() -> ObjectSchema {
        ObjectSchema::map()
    }

    /// Creates a record schema that accepts only JSON objects.
    pub fn object() -> ObjectSchema {
        ObjectSchema::object()
    }
}
