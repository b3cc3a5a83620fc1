//! The result of running a validator.
//!
//! [`Outcome`] is the `(accepted, value, errors)` triple returned by every
//! `try_validate` call. It is created fresh per call and never stored on a
//! validator.

use serde_json::Value;
use stillwater::Validation;

use crate::error::{ErrorTree, ValidationError};
use crate::ValidationResult;

/// The outcome of validating one value.
///
/// `accepted` is true exactly when `errors` is `None`. On success `value`
/// holds the final (coerced, transformed, defaulted) value, where `None` means
/// absent. On failure `value` holds the value as far as the pipeline got
/// before it was rejected.
///
/// # Example
///
/// ```rust
/// use sluice::{Chain, Schema, SchemaLike};
/// use serde_json::json;
///
/// let outcome = Schema::string().min_len(3).try_validate(json!("ab"));
/// assert!(!outcome.accepted);
/// assert_eq!(outcome.value, Some(json!("ab")));
/// assert!(outcome.errors.is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Whether the value was accepted.
    pub accepted: bool,
    /// The resulting value; `None` is the absent sentinel.
    pub value: Option<Value>,
    /// The error tree when the value was rejected.
    pub errors: Option<ErrorTree>,
}

impl Outcome {
    /// Creates an accepted outcome.
    pub fn success(value: Option<Value>) -> Self {
        Self {
            accepted: true,
            value,
            errors: None,
        }
    }

    /// Creates a rejected outcome.
    pub fn failure(value: Option<Value>, errors: ErrorTree) -> Self {
        Self {
            accepted: false,
            value,
            errors: Some(errors),
        }
    }

    /// Returns true if the value was accepted.
    pub fn is_success(&self) -> bool {
        self.accepted
    }

    /// Returns true if the value was rejected.
    pub fn is_failure(&self) -> bool {
        !self.accepted
    }

    /// Converts into a `Result`, discarding the partial value on failure.
    pub fn into_result(self) -> Result<Option<Value>, ValidationError> {
        match self.errors {
            Some(tree) => Err(ValidationError::new(tree)),
            None => Ok(self.value),
        }
    }

    /// Converts into a stillwater `Validation`.
    pub fn into_validation(self) -> ValidationResult<Option<Value>> {
        match self.errors {
            Some(tree) => Validation::Failure(tree),
            None => Validation::Success(self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_has_no_errors() {
        let outcome = Outcome::success(Some(json!(1)));
        assert!(outcome.is_success());
        assert_eq!(outcome.into_result(), Ok(Some(json!(1))));
    }

    #[test]
    fn test_failure_into_result() {
        let outcome = Outcome::failure(Some(json!("x")), ErrorTree::message("bad"));
        assert!(outcome.is_failure());
        let error = outcome.into_result().unwrap_err();
        assert_eq!(error.tree(), &ErrorTree::message("bad"));
    }

    #[test]
    fn test_into_validation() {
        assert!(Outcome::success(None).into_validation().is_success());
        assert!(Outcome::failure(None, ErrorTree::message("bad"))
            .into_validation()
            .is_failure());
    }
}
