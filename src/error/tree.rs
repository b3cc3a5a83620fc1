//! Structured error trees.
//!
//! A scalar validator fails with a flat list of messages. Records and
//! collections fail with a map from field name or index to the nested error of
//! that child. [`ErrorTree`] models both shapes and [`ValidationError`] is the
//! error type that carries a tree across `Result` boundaries.

use std::fmt;

use indexmap::IndexMap;
use stillwater::prelude::*;

use crate::error::{SchemaError, SchemaErrors};
use crate::path::{JsonPath, PathSegment, ROOT_KEY};

/// A recursive validation error value.
///
/// # Example
///
/// ```rust
/// use sluice::ErrorTree;
///
/// let tree = ErrorTree::nested([
///     ("name", ErrorTree::message("required")),
///     ("address", ErrorTree::nested([("street", ErrorTree::message("required"))])),
/// ]);
///
/// assert_eq!(
///     tree.flatten_pairs(),
///     vec![
///         ("name".to_string(), "required".to_string()),
///         ("address.street".to_string(), "required".to_string()),
///     ]
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorTree {
    /// Messages attached to the value itself.
    Messages(Vec<String>),
    /// Errors of child values, keyed by field name or index.
    Nested(IndexMap<PathSegment, ErrorTree>),
}

impl ErrorTree {
    /// Creates a tree holding one message.
    pub fn message(message: impl Into<String>) -> Self {
        ErrorTree::Messages(vec![message.into()])
    }

    /// Creates a nested tree from `(segment, child)` pairs, preserving order.
    pub fn nested<K, I>(entries: I) -> Self
    where
        K: Into<PathSegment>,
        I: IntoIterator<Item = (K, ErrorTree)>,
    {
        ErrorTree::Nested(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Returns the child tree at `segment`, if this is a nested tree.
    pub fn get(&self, segment: impl Into<PathSegment>) -> Option<&ErrorTree> {
        match self {
            ErrorTree::Nested(children) => children.get(&segment.into()),
            ErrorTree::Messages(_) => None,
        }
    }

    /// Returns the messages attached directly to this node.
    pub fn messages(&self) -> &[String] {
        match self {
            ErrorTree::Messages(messages) => messages,
            ErrorTree::Nested(_) => &[],
        }
    }

    /// Returns true if the tree carries no message at any depth.
    pub fn is_empty(&self) -> bool {
        match self {
            ErrorTree::Messages(messages) => messages.is_empty(),
            ErrorTree::Nested(children) => children.values().all(ErrorTree::is_empty),
        }
    }

    /// Walks the tree into `(path, message)` errors in insertion order.
    pub fn flatten(&self) -> Vec<SchemaError> {
        let mut out = Vec::new();
        self.flatten_into(&JsonPath::root(), &mut out);
        out
    }

    /// Walks the tree into dot-joined `(key, message)` pairs.
    ///
    /// Messages that are not attached to any field use the `__root__` key.
    pub fn flatten_pairs(&self) -> Vec<(String, String)> {
        self.flatten()
            .into_iter()
            .map(SchemaError::into_pair)
            .collect()
    }

    /// Flattens into a non-empty [`SchemaErrors`], or `None` for an empty tree.
    pub fn to_errors(&self) -> Option<SchemaErrors> {
        SchemaErrors::from_vec(self.flatten())
    }

    fn flatten_into(&self, path: &JsonPath, out: &mut Vec<SchemaError>) {
        match self {
            ErrorTree::Messages(messages) => {
                out.extend(
                    messages
                        .iter()
                        .map(|m| SchemaError::new(path.clone(), m.clone())),
                );
            }
            ErrorTree::Nested(children) => {
                for (segment, child) in children {
                    // Messages merged into a nested tree stay on the parent.
                    if matches!(segment, PathSegment::Field(name) if name == ROOT_KEY) {
                        child.flatten_into(path, out);
                    } else {
                        child.flatten_into(&path.push(segment.clone()), out);
                    }
                }
            }
        }
    }
}

impl Semigroup for ErrorTree {
    /// Merges two trees.
    ///
    /// Message lists concatenate, nested maps merge key by key (recursively on
    /// collisions, keeping the left tree's key order). When a message list
    /// meets a nested map the messages are kept under the root key.
    fn combine(self, other: Self) -> Self {
        match (self, other) {
            (ErrorTree::Messages(mut left), ErrorTree::Messages(right)) => {
                left.extend(right);
                ErrorTree::Messages(left)
            }
            (ErrorTree::Nested(mut left), ErrorTree::Nested(right)) => {
                for (segment, child) in right {
                    match left.get_mut(&segment) {
                        Some(existing) => {
                            let current = std::mem::replace(existing, ErrorTree::Messages(Vec::new()));
                            *existing = current.combine(child);
                        }
                        None => {
                            left.insert(segment, child);
                        }
                    }
                }
                ErrorTree::Nested(left)
            }
            (messages @ ErrorTree::Messages(_), ErrorTree::Nested(right)) => {
                ErrorTree::Nested(IndexMap::from([(PathSegment::field(ROOT_KEY), messages)]))
                    .combine(ErrorTree::Nested(right))
            }
            (ErrorTree::Nested(left), messages @ ErrorTree::Messages(_)) => ErrorTree::Nested(left)
                .combine(ErrorTree::Nested(IndexMap::from([(
                    PathSegment::field(ROOT_KEY),
                    messages,
                )]))),
        }
    }
}

/// The structured error raised by validation.
///
/// `validate` returns it when a value is rejected. Fallible transforms
/// (`try_pipe`, `try_transform`) return it to fail the field with a custom
/// tree, for example an `index -> {field: [message]}` map from a cross-item
/// check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", render(.tree))]
pub struct ValidationError {
    tree: ErrorTree,
}

impl ValidationError {
    /// Wraps an error tree.
    pub fn new(tree: ErrorTree) -> Self {
        Self { tree }
    }

    /// Creates an error holding one unkeyed message.
    pub fn message(message: impl Into<String>) -> Self {
        Self::new(ErrorTree::message(message))
    }

    /// Returns the error tree.
    pub fn tree(&self) -> &ErrorTree {
        &self.tree
    }

    /// Consumes the error and returns its tree.
    pub fn into_tree(self) -> ErrorTree {
        self.tree
    }

    /// Flattens the tree into `(path, message)` errors.
    pub fn flatten(&self) -> Vec<SchemaError> {
        self.tree.flatten()
    }
}

impl From<ErrorTree> for ValidationError {
    fn from(tree: ErrorTree) -> Self {
        Self::new(tree)
    }
}

fn render(tree: &ErrorTree) -> String {
    let errors: Vec<String> = tree.flatten().iter().map(ToString::to_string).collect();
    if errors.is_empty() {
        "validation failed".to_string()
    } else {
        format!("validation failed: {}", errors.join("; "))
    }
}

impl fmt::Display for ErrorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.flatten().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ValidationError>();
    assert_sync::<ValidationError>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pair(key: &str, message: &str) -> (String, String) {
        (key.to_string(), message.to_string())
    }

    #[test]
    fn test_flatten_root_messages() {
        let tree = ErrorTree::message("bad");
        assert_eq!(tree.flatten_pairs(), vec![pair("__root__", "bad")]);
    }

    #[test]
    fn test_flatten_nested_in_declaration_order() {
        let tree = ErrorTree::nested([
            ("name", ErrorTree::message("required")),
            (
                "address",
                ErrorTree::nested([("street", ErrorTree::message("required"))]),
            ),
        ]);

        assert_eq!(
            tree.flatten_pairs(),
            vec![pair("name", "required"), pair("address.street", "required")]
        );
    }

    #[test]
    fn test_flatten_indices() {
        let tree = ErrorTree::nested([(
            "items",
            ErrorTree::nested([
                (1usize, ErrorTree::message("too small")),
                (
                    2usize,
                    ErrorTree::nested([("sku", ErrorTree::message("duplicate"))]),
                ),
            ]),
        )]);

        assert_eq!(
            tree.flatten_pairs(),
            vec![pair("items.1", "too small"), pair("items.2.sku", "duplicate")]
        );
    }

    #[test]
    fn test_combine_merges_overlapping_keys() {
        let left = ErrorTree::nested([
            (0usize, ErrorTree::nested([("name", ErrorTree::message("required"))])),
            (3usize, ErrorTree::message("invalid")),
        ]);
        let right = ErrorTree::nested([
            (0usize, ErrorTree::nested([("sku", ErrorTree::message("duplicate"))])),
            (1usize, ErrorTree::nested([("sku", ErrorTree::message("duplicate"))])),
        ]);

        let merged = left.combine(right);
        assert_eq!(
            merged.flatten_pairs(),
            vec![
                pair("0.name", "required"),
                pair("0.sku", "duplicate"),
                pair("3", "invalid"),
                pair("1.sku", "duplicate"),
            ]
        );
    }

    #[test]
    fn test_combine_messages_with_nested_keeps_messages_on_parent() {
        let merged = ErrorTree::message("too few items")
            .combine(ErrorTree::nested([(0usize, ErrorTree::message("bad"))]));

        assert_eq!(
            merged.flatten_pairs(),
            vec![pair("__root__", "too few items"), pair("0", "bad")]
        );
    }

    #[test]
    fn test_semigroup_associativity() {
        let a = ErrorTree::nested([("a", ErrorTree::message("1"))]);
        let b = ErrorTree::nested([("a", ErrorTree::message("2"))]);
        let c = ErrorTree::nested([("b", ErrorTree::message("3"))]);

        let left = a.clone().combine(b.clone()).combine(c.clone());
        let right = a.combine(b.combine(c));
        assert_eq!(left.flatten_pairs(), right.flatten_pairs());
    }

    #[test]
    fn test_get_and_messages() {
        let tree = ErrorTree::nested([("name", ErrorTree::message("required"))]);
        assert_eq!(tree.get("name").unwrap().messages(), ["required".to_string()]);
        assert!(tree.get("missing").is_none());
        assert!(tree.messages().is_empty());
    }

    #[test]
    fn test_validation_error_display() {
        let error = ValidationError::new(ErrorTree::nested([
            ("name", ErrorTree::message("required")),
            ("age", ErrorTree::message("must be an integer")),
        ]));

        assert_eq!(
            error.to_string(),
            "validation failed: name: required; age: must be an integer"
        );
    }

    #[test]
    fn test_to_errors_on_empty_tree() {
        assert!(ErrorTree::Messages(Vec::new()).to_errors().is_none());
        assert!(ErrorTree::Messages(Vec::new()).is_empty());
    }
}
