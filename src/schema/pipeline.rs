//! The field pipeline engine.
//!
//! [`Pipeline`] is the kind-erased validator every typed schema builds. One
//! run goes through a fixed sequence:
//!
//! 1. absent input with no transformation steps short-circuits to the default
//! 2. coercion (if enabled), then the absent short-circuit again
//! 3. the allowed-values restriction of discrete kinds
//! 4. the type check, which for lists and records is the recursive
//!    aggregation of items and fields
//! 5. validation steps in declaration order, stopping at the first failure
//! 6. transformation steps in declaration order
//! 7. the default, if the value is still absent
//!
//! Nothing in a run is written back to the pipeline, so one instance can be
//! shared by any number of concurrent callers.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use stillwater::prelude::*;
use tracing::{debug, trace};

use crate::error::{ErrorTree, ValidationError};
use crate::path::{JsonPath, PathSegment};
use crate::validation::Outcome;

use super::check::Check;
use super::kind::Kind;

/// Fallible value transform.
pub(crate) type TransformFn = Arc<dyn Fn(Value) -> Result<Value, ValidationError> + Send + Sync>;

/// Whole-collection constraint producing an `index -> error` tree.
pub(crate) type CrossItemFn = Arc<dyn Fn(&[Value]) -> Option<ErrorTree> + Send + Sync>;

/// What happens when a value is not one of the allowed values.
#[derive(Debug, Clone, PartialEq)]
pub enum Mismatch {
    /// Reject the field with this message before the type check.
    Reject(String),
    /// Replace the value with absent, in declaration order with the other
    /// transformation steps.
    Discard,
}

/// An exact-equality membership restriction.
#[derive(Debug, Clone, PartialEq)]
pub struct AllowedValues {
    values: Vec<Value>,
    on_mismatch: Mismatch,
}

impl AllowedValues {
    pub fn new(values: Vec<Value>, on_mismatch: Mismatch) -> Self {
        Self {
            values,
            on_mismatch,
        }
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.values.contains(value)
    }
}

/// How a record treats keys it does not declare.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum UnknownKeys {
    /// Leave them out of the output.
    #[default]
    Drop,
    /// Copy them into the output unvalidated.
    Keep,
    /// Fail each one with this message.
    Reject(String),
}

#[derive(Clone)]
enum Step {
    Required(String),
    NullifyEmpty,
    Apply { f: TransformFn, switches_type: bool },
    Allowed(AllowedValues),
    Clamp { min: Option<Value>, max: Option<Value> },
}

#[derive(Clone)]
enum Shape {
    Scalar,
    Items {
        item: Option<Box<Pipeline>>,
        cross: Vec<CrossItemFn>,
    },
    Fields {
        fields: IndexMap<String, Pipeline>,
        unknown: UnknownKeys,
    },
}

/// A validation and transformation pipeline for one value.
///
/// Pipelines are built through the typed schemas in [`Schema`](crate::Schema)
/// and convert from any of them with `.into()`. Cloning is deep: field maps
/// and item pipelines are owned, so a clone can be extended without touching
/// the original.
///
/// # Example
///
/// ```rust
/// use sluice::{Chain, Pipeline, Schema, SchemaLike};
/// use serde_json::json;
///
/// let base: Pipeline = Schema::string().trim().into();
/// let strict = base.clone().required("name is required");
///
/// assert_eq!(base.validate(json!("  bo ")).unwrap(), Some(json!("bo")));
/// assert!(strict.validate(sluice::ABSENT).is_err());
/// assert!(base.validate(sluice::ABSENT).is_ok());
/// ```
#[derive(Clone)]
pub struct Pipeline {
    kind: Kind,
    coerce: bool,
    default: Option<Value>,
    membership: Option<(AllowedValues, String)>,
    checks: Vec<Check>,
    steps: Vec<Step>,
    shape: Shape,
    output_key: Option<String>,
    type_error: Option<String>,
}

impl Pipeline {
    /// Creates an empty pipeline of the given kind.
    pub fn new(kind: Kind) -> Self {
        let shape = match kind {
            Kind::List => Shape::Items {
                item: None,
                cross: Vec::new(),
            },
            Kind::Map | Kind::Object => Shape::Fields {
                fields: IndexMap::new(),
                unknown: UnknownKeys::default(),
            },
            _ => Shape::Scalar,
        };
        Self {
            kind,
            coerce: false,
            default: None,
            membership: None,
            checks: Vec::new(),
            steps: Vec::new(),
            shape,
            output_key: None,
            type_error: None,
        }
    }

    /// The declared kind.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// The key this pipeline's value is written under inside a record.
    pub fn output_key(&self) -> Option<&str> {
        self.output_key.as_deref()
    }

    /// The configured default, if any.
    pub fn configured_default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub(crate) fn set_coerce(&mut self, coerce: bool) {
        self.coerce = coerce;
    }

    pub(crate) fn set_default(&mut self, value: Value) {
        self.default = Some(value);
    }

    pub(crate) fn set_output_key(&mut self, key: String) {
        self.output_key = Some(key);
    }

    pub(crate) fn set_type_error(&mut self, message: String) {
        self.type_error = Some(message);
    }

    pub(crate) fn push_check(&mut self, check: Check) {
        self.checks.push(check);
    }

    /// Relabels the most recent check, or the type error if there is none.
    pub(crate) fn set_error(&mut self, message: String) {
        match self.checks.last_mut() {
            Some(check) => check.set_message(message),
            None => self.type_error = Some(message),
        }
    }

    pub(crate) fn push_required(&mut self, message: String) {
        self.steps.push(Step::Required(message));
    }

    pub(crate) fn push_nullify_empty(&mut self) {
        self.steps.push(Step::NullifyEmpty);
    }

    pub(crate) fn push_transform(&mut self, f: TransformFn, switches_type: bool) {
        self.steps.push(Step::Apply { f, switches_type });
    }

    pub(crate) fn push_clamp(&mut self, min: Option<Value>, max: Option<Value>) {
        self.steps.push(Step::Clamp { min, max });
    }

    /// Installs an allowed-values restriction; reject mode replaces any
    /// earlier reject-mode restriction, discard mode is queued as a step.
    pub(crate) fn restrict(&mut self, allowed: AllowedValues) {
        match allowed.on_mismatch.clone() {
            Mismatch::Reject(message) => self.membership = Some((allowed, message)),
            Mismatch::Discard => self.steps.push(Step::Allowed(allowed)),
        }
    }

    pub(crate) fn set_item(&mut self, pipeline: Pipeline) {
        if let Shape::Items { item, .. } = &mut self.shape {
            *item = Some(Box::new(pipeline));
        }
    }

    pub(crate) fn push_cross_item(&mut self, check: CrossItemFn) {
        if let Shape::Items { cross, .. } = &mut self.shape {
            cross.push(check);
        }
    }

    pub(crate) fn insert_field(&mut self, name: String, pipeline: Pipeline) {
        if let Shape::Fields { fields, .. } = &mut self.shape {
            fields.insert(name, pipeline);
        }
    }

    pub(crate) fn set_unknown_keys(&mut self, policy: UnknownKeys) {
        if let Shape::Fields { unknown, .. } = &mut self.shape {
            *unknown = policy;
        }
    }

    /// Returns the declared field names of a record pipeline, in order.
    pub fn field_names(&self) -> Vec<&str> {
        match &self.shape {
            Shape::Fields { fields, .. } => fields.keys().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Runs the pipeline on one value.
    ///
    /// `key` is the path of the value inside the overall payload and `payload`
    /// the input of the enclosing record. Both are handed to every check.
    pub fn run(&self, value: Option<Value>, key: &JsonPath, payload: &Value) -> Outcome {
        let mut value = value.filter(|v| !v.is_null());
        if value.is_none() && self.steps.is_empty() {
            return Outcome::success(self.default.clone());
        }

        if self.coerce {
            value = value.and_then(|v| self.kind.coerce(v));
            if value.is_none() && self.steps.is_empty() {
                return Outcome::success(self.default.clone());
            }
        }

        let narrowed = match value {
            Some(raw) => match self.narrow(raw, key) {
                Ok(v) => Some(v),
                Err((v, errors)) => {
                    trace!(path = %key, kind = ?self.kind, "value failed type check");
                    return Outcome::failure(Some(v), errors);
                }
            },
            None => None,
        };

        if let Some(v) = &narrowed {
            if let Some(check) = self.checks.iter().find(|c| !c.passes(v, key, payload)) {
                trace!(path = %key, message = check.message(), "validation step failed");
                return Outcome::failure(narrowed.clone(), ErrorTree::message(check.message()));
            }
        }

        match self.apply_steps(narrowed) {
            Ok(v) => Outcome::success(v.or_else(|| self.default.clone())),
            Err((v, errors)) => {
                trace!(path = %key, "transformation step failed");
                Outcome::failure(v, errors)
            }
        }
    }

    fn type_error_message(&self) -> String {
        self.type_error
            .clone()
            .unwrap_or_else(|| self.kind.type_error().to_string())
    }

    fn narrow(&self, raw: Value, key: &JsonPath) -> Result<Value, (Value, ErrorTree)> {
        if let Some((allowed, message)) = &self.membership {
            if !allowed.contains(&raw) {
                return Err((raw, ErrorTree::message(message.clone())));
            }
        }

        let Some(value) = self.kind.narrow(&raw) else {
            return Err((raw, ErrorTree::message(self.type_error_message())));
        };

        match (&self.shape, value) {
            (Shape::Items { item, cross }, Value::Array(items)) => {
                narrow_items(item.as_deref(), cross, items, key)
            }
            (Shape::Fields { fields, unknown }, Value::Object(record)) => {
                narrow_fields(fields, unknown, record, key)
            }
            (_, value) => Ok(value),
        }
    }

    fn apply_steps(&self, mut value: Option<Value>) -> Result<Option<Value>, (Option<Value>, ErrorTree)> {
        // Per-call type marker; type-switching transforms move it.
        let mut current = self.kind;

        for step in &self.steps {
            value = match step {
                Step::Required(message) => match value {
                    Some(v) => Some(v),
                    None => return Err((None, ErrorTree::message(message.clone()))),
                },
                Step::NullifyEmpty => value.filter(|v| !is_blank(v)),
                Step::Apply { f, switches_type } => match value {
                    Some(v) => {
                        let out = f(v.clone()).map_err(|e| (Some(v), e.into_tree()))?;
                        if out.is_null() {
                            None
                        } else if *switches_type {
                            current = Kind::detect(&out).unwrap_or(current);
                            Some(out)
                        } else {
                            Some(current.normalize(out))
                        }
                    }
                    None => None,
                },
                Step::Allowed(allowed) => value.filter(|v| allowed.contains(v)),
                Step::Clamp { min, max } => value.map(|v| clamp(v, min.as_ref(), max.as_ref())),
            };
        }

        Ok(value)
    }
}

fn narrow_items(
    item: Option<&Pipeline>,
    cross: &[CrossItemFn],
    raw: Vec<Value>,
    key: &JsonPath,
) -> Result<Value, (Value, ErrorTree)> {
    let empty = Value::Array(Vec::new());
    let mut items = Vec::with_capacity(raw.len());
    let mut errors = IndexMap::new();

    for (index, raw_item) in raw.into_iter().enumerate() {
        match item {
            Some(engine) => {
                let outcome = engine.run(Some(raw_item), &key.push_index(index), &empty);
                if let Some(tree) = outcome.errors {
                    errors.insert(PathSegment::Index(index), tree);
                }
                items.push(outcome.value.unwrap_or(Value::Null));
            }
            None => items.push(raw_item),
        }
    }

    let mut tree = (!errors.is_empty()).then(|| ErrorTree::Nested(errors));
    for check in cross {
        if let Some(found) = check(items.as_slice()) {
            tree = Some(match tree {
                Some(existing) => existing.combine(found),
                None => found,
            });
        }
    }
    if let Some(ErrorTree::Nested(children)) = &mut tree {
        // Merged indices land after the existing ones; restore index order
        // and keep non-index keys (the root key) last.
        children.sort_by(|a, _, b, _| item_rank(a).cmp(&item_rank(b)));
    }

    match tree {
        Some(tree) => {
            debug!(path = %key, items = items.len(), "list rejected");
            Err((Value::Array(items), tree))
        }
        None => Ok(Value::Array(items)),
    }
}

fn item_rank(segment: &PathSegment) -> (u8, usize) {
    match segment {
        PathSegment::Index(index) => (0, *index),
        PathSegment::Field(_) => (1, 0),
    }
}

fn narrow_fields(
    fields: &IndexMap<String, Pipeline>,
    unknown: &UnknownKeys,
    record: Map<String, Value>,
    key: &JsonPath,
) -> Result<Value, (Value, ErrorTree)> {
    let record = Value::Object(record);
    let mut out = Map::new();
    let mut errors = IndexMap::new();

    for (name, child) in fields {
        let input = record.get(name).cloned();
        let present = input.is_some();
        let outcome = child.run(input, &key.push_field(name), &record);

        match outcome.errors {
            Some(tree) => {
                errors.insert(PathSegment::field(name.as_str()), tree);
            }
            None if present || outcome.value.is_some() => {
                let target = child.output_key().unwrap_or(name).to_string();
                out.insert(target, outcome.value.unwrap_or(Value::Null));
            }
            None => {}
        }
    }

    if let Value::Object(input) = &record {
        for (name, value) in input.iter().filter(|(k, _)| !fields.contains_key(*k)) {
            match unknown {
                UnknownKeys::Drop => {}
                // A declared field renamed onto this key owns it
                UnknownKeys::Keep if claims_output_key(fields, name) => {}
                UnknownKeys::Keep => {
                    out.insert(name.clone(), value.clone());
                }
                UnknownKeys::Reject(message) => {
                    errors.insert(PathSegment::field(name.as_str()), ErrorTree::message(message.clone()));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(Value::Object(out))
    } else {
        debug!(path = %key, failed = errors.len(), "record rejected");
        Err((record, ErrorTree::Nested(errors)))
    }
}

fn claims_output_key(fields: &IndexMap<String, Pipeline>, key: &str) -> bool {
    fields
        .iter()
        .any(|(name, child)| child.output_key().unwrap_or(name) == key)
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn clamp(value: Value, min: Option<&Value>, max: Option<&Value>) -> Value {
    let Some(n) = value.as_f64() else {
        return value;
    };
    if let Some(lo) = min.filter(|lo| lo.as_f64().is_some_and(|lo| n < lo)) {
        return lo.clone();
    }
    if let Some(hi) = max.filter(|hi| hi.as_f64().is_some_and(|hi| n > hi)) {
        return hi.clone();
    }
    value
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("kind", &self.kind)
            .field("coerce", &self.coerce)
            .field("default", &self.default)
            .field("checks", &self.checks)
            .field("steps", &self.steps.len())
            .field("fields", &self.field_names())
            .finish_non_exhaustive()
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Pipeline>();
    assert_sync::<Pipeline>();
};
