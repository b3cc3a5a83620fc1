//! Error types for validation failures.
//!
//! [`ErrorTree`] is the hierarchical error value produced by validators,
//! [`ValidationError`] carries one through `Result`, and [`SchemaError`] /
//! [`SchemaErrors`] are the flattened `(path, message)` form.

mod schema_error;
mod tree;

pub use schema_error::{SchemaError, SchemaErrors};
pub use tree::{ErrorTree, ValidationError};
