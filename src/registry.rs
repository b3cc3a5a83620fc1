//! Named check registry.
//!
//! This module provides the [`CheckRegistry`] type that stores named
//! validation steps. Format predicates (email, URL, UUID and so on) are
//! registered once by whoever owns them and attached to any schema by name
//! with [`Chain::check_named`](crate::Chain::check_named).

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::schema::Check;

/// Type alias for the check storage map.
type CheckMap = Arc<RwLock<HashMap<String, Check>>>;

/// A thread-safe registry of named checks.
///
/// # Thread Safety
///
/// The registry uses `Arc<RwLock<...>>` for thread-safe access:
/// - Multiple threads can look up checks concurrently (read-only access)
/// - Registration operations are serialized (write access)
///
/// Cloning a registry is cheap and the clone shares the same storage.
///
/// # Example
///
/// ```rust
/// use sluice::{Chain, CheckRegistry, Schema, SchemaLike};
/// use serde_json::json;
///
/// let registry = CheckRegistry::new();
/// let is_slug = |v: &serde_json::Value| {
///     v.as_str()
///         .is_some_and(|s| s.chars().all(|c| c.is_ascii_lowercase() || c == '-'))
/// };
/// registry.register_fn("slug", is_slug, "must be a slug").unwrap();
///
/// let schema = Schema::string().check_named(&registry, "slug").unwrap();
///
/// assert!(schema.try_validate(json!("hello-world")).accepted);
/// assert!(!schema.try_validate(json!("Hello World")).accepted);
/// ```
#[derive(Clone, Default)]
pub struct CheckRegistry {
    checks: CheckMap,
}

impl CheckRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a check under `name`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateName` if the name is already registered.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{Check, CheckRegistry};
    ///
    /// let registry = CheckRegistry::new();
    /// let non_empty = Check::value(|v| v.as_str().is_some_and(|s| !s.is_empty()), "must not be empty");
    /// registry.register("non_empty", non_empty).unwrap();
    ///
    /// // Duplicate registration fails
    /// assert!(registry.register("non_empty", Check::value(|_| true, "")).is_err());
    /// ```
    pub fn register(&self, name: impl Into<String>, check: Check) -> Result<(), RegistryError> {
        let name = name.into();
        let mut checks = self.checks.write();

        if checks.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }

        debug!(check = %name, "registered check");
        checks.insert(name, check);
        Ok(())
    }

    /// Registers a predicate over the value alone under `name`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateName` if the name is already registered.
    pub fn register_fn<F>(
        &self,
        name: impl Into<String>,
        test: F,
        message: impl Into<String>,
    ) -> Result<(), RegistryError>
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.register(name, Check::value(test, message))
    }

    /// Retrieves a check by name.
    pub fn get(&self, name: &str) -> Option<Check> {
        self.checks.read().get(name).cloned()
    }

    /// Returns true if a check is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.checks.read().contains_key(name)
    }

    /// Returns the registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.checks.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns the number of registered checks.
    pub fn len(&self) -> usize {
        self.checks.read().len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.checks.read().is_empty()
    }
}

impl std::fmt::Debug for CheckRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckRegistry")
            .field("names", &self.names())
            .finish()
    }
}

/// Errors that can occur during registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Attempted to register a check with a name that already exists.
    #[error("check '{0}' already registered")]
    DuplicateName(String),

    /// Attempted to attach a check by a name that doesn't exist.
    #[error("check '{0}' not found")]
    CheckNotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::JsonPath;
    use serde_json::json;

    #[test]
    fn test_register_and_get() {
        let registry = CheckRegistry::new();
        registry
            .register_fn("even", |v| v.as_i64().is_some_and(|n| n % 2 == 0), "must be even")
            .unwrap();

        let check = registry.get("even").unwrap();
        assert_eq!(check.message(), "must be even");
        assert!(check.passes(&json!(2), &JsonPath::root(), &Value::Null));
        assert!(registry.get("odd").is_none());
    }

    #[test]
    fn test_duplicate_name() {
        let registry = CheckRegistry::new();
        registry.register_fn("a", |_| true, "a").unwrap();

        assert_eq!(
            registry.register_fn("a", |_| true, "a"),
            Err(RegistryError::DuplicateName("a".to_string()))
        );
    }

    #[test]
    fn test_clone_shares_storage() {
        let registry = CheckRegistry::new();
        let clone = registry.clone();
        clone.register_fn("b", |_| true, "b").unwrap();
        clone.register_fn("a", |_| true, "a").unwrap();

        assert!(registry.contains("a"));
        assert_eq!(registry.names(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            RegistryError::CheckNotFound("email".into()).to_string(),
            "check 'email' not found"
        );
    }
}
