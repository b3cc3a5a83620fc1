//! Boolean schema validation.

use super::kind::Kind;
use super::pipeline::Pipeline;
use super::traits::{Chain, Discrete, SchemaLike};

/// A schema for boolean values.
///
/// With coercion enabled, `"true"`/`"false"`, `"yes"`/`"no"`, `"on"`/`"off"`,
/// `"1"`/`"0"` (any case) and the numbers 1 and 0 are accepted. The empty
/// string becomes absent, never `false`.
///
/// # Example
///
/// ```rust
/// use sluice::{Chain, Schema, SchemaLike};
/// use serde_json::json;
///
/// let newsletter = Schema::boolean().coerce().default_value(false);
///
/// assert_eq!(newsletter.validate(json!("on")).unwrap(), Some(json!(true)));
/// assert_eq!(newsletter.validate(json!("")).unwrap(), Some(json!(false)));
/// ```
#[derive(Clone, Debug)]
pub struct BooleanSchema {
    pipeline: Pipeline,
}

impl BooleanSchema {
    /// Creates a new boolean schema.
    pub fn new() -> Self {
        Self {
            pipeline: Pipeline::new(Kind::Boolean),
        }
    }
}

impl Default for BooleanSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaLike for BooleanSchema {
    fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }
}

impl Chain for BooleanSchema {
    fn pipeline_mut(&mut self) -> &mut Pipeline {
        &mut self.pipeline
    }
}

impl Discrete for BooleanSchema {}

impl From<BooleanSchema> for Pipeline {
    fn from(schema: BooleanSchema) -> Self {
        schema.pipeline
    }
}
