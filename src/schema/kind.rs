//! Value kinds and their coercion, narrowing and normalization hooks.

use serde_json::{Map, Number, Value};

/// The declared category of a validator.
///
/// The kind decides how input is coerced (when coercion is enabled), how it is
/// type-checked, and how the output of a type-preserving transform is
/// re-normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    String,
    Integer,
    Float,
    Boolean,
    List,
    Map,
    Object,
}

impl Kind {
    /// Detects the kind of a concrete value, or `None` for `null`.
    pub fn detect(value: &Value) -> Option<Kind> {
        match value {
            Value::Null => None,
            Value::Bool(_) => Some(Kind::Boolean),
            Value::Number(n) if n.is_i64() || n.is_u64() => Some(Kind::Integer),
            Value::Number(_) => Some(Kind::Float),
            Value::String(_) => Some(Kind::String),
            Value::Array(_) => Some(Kind::List),
            Value::Object(_) => Some(Kind::Map),
        }
    }

    /// Returns true for kinds where exact-equality membership is meaningful.
    pub fn is_discrete(self) -> bool {
        matches!(
            self,
            Kind::String | Kind::Integer | Kind::Float | Kind::Boolean
        )
    }

    /// Returns true for list, map and object kinds.
    pub fn is_container(self) -> bool {
        !self.is_discrete()
    }

    /// The message reported when a value fails the type check.
    pub fn type_error(self) -> &'static str {
        match self {
            Kind::String => "must be a string",
            Kind::Integer => "must be an integer",
            Kind::Float => "must be a number",
            Kind::Boolean => "must be a boolean",
            Kind::List => "must be a list",
            Kind::Map | Kind::Object => "must be an object",
        }
    }

    /// Coerces raw input towards this kind.
    ///
    /// Total: unrecognised input is returned unchanged so the type check
    /// reports it. Empty strings become absent for every kind except lists,
    /// where they become an empty list.
    pub fn coerce(self, value: Value) -> Option<Value> {
        if let Value::String(s) = &value {
            if s.is_empty() {
                return match self {
                    Kind::List => Some(Value::Array(Vec::new())),
                    _ => None,
                };
            }
        }

        let coerced = match (self, value) {
            (_, Value::Null) => return None,
            (Kind::String, Value::Number(n)) => Value::String(n.to_string()),
            (Kind::String, Value::Bool(b)) => Value::String(b.to_string()),
            (Kind::Integer, Value::String(s)) => parse_integer(&s).unwrap_or(Value::String(s)),
            (Kind::Integer, Value::Number(n)) => integral(&n).unwrap_or(Value::Number(n)),
            (Kind::Integer, Value::Bool(b)) => Value::from(i64::from(b)),
            (Kind::Float, Value::String(s)) => parse_float(&s).unwrap_or(Value::String(s)),
            (Kind::Boolean, Value::String(s)) => parse_bool(&s).unwrap_or(Value::String(s)),
            (Kind::Boolean, Value::Number(n)) => match n.as_i64() {
                Some(0) => Value::Bool(false),
                Some(1) => Value::Bool(true),
                _ => Value::Number(n),
            },
            (Kind::List, Value::Array(items)) => Value::Array(items),
            (Kind::List, Value::Object(map)) => Value::Array(map.into_iter().map(|(_, v)| v).collect()),
            (Kind::List, scalar) => Value::Array(vec![scalar]),
            (Kind::Map, Value::Array(items)) => index_keyed(items),
            (_, other) => other,
        };
        Some(self.normalize(coerced))
    }

    /// Re-normalizes the output of a type-preserving transform.
    ///
    /// Lists are re-indexed from keyed maps, maps keep keys (a list becomes an
    /// index-keyed map, objects leave it for the type check), integers absorb integral floats and floats absorb
    /// integers. Anything else is returned unchanged.
    pub fn normalize(self, value: Value) -> Value {
        match (self, value) {
            (Kind::List, Value::Object(map)) => Value::Array(map.into_iter().map(|(_, v)| v).collect()),
            (Kind::Map, Value::Array(items)) => index_keyed(items),
            (Kind::Integer, Value::Number(n)) => integral(&n).unwrap_or(Value::Number(n)),
            (Kind::Float, Value::Number(n)) => as_float(&n).unwrap_or(Value::Number(n)),
            (_, other) => other,
        }
    }

    /// Type-checks a scalar value, returning the narrowed value.
    ///
    /// Container kinds are narrowed by their own aggregation and only have
    /// their shape checked here.
    pub fn narrow(self, value: &Value) -> Option<Value> {
        match (self, value) {
            (Kind::String, Value::String(_))
            | (Kind::Boolean, Value::Bool(_))
            | (Kind::List, Value::Array(_))
            | (Kind::Map | Kind::Object, Value::Object(_)) => Some(value.clone()),
            (Kind::Integer, Value::Number(n)) if n.is_i64() || n.is_u64() => Some(value.clone()),
            (Kind::Integer, Value::Number(n)) => integral(n),
            (Kind::Float, Value::Number(n)) => as_float(n),
            _ => None,
        }
    }
}

fn parse_integer(s: &str) -> Option<Value> {
    let trimmed = s.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(Value::from(i));
    }
    let f = trimmed.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(Value::from(f as i64))
    } else {
        None
    }
}

fn parse_float(s: &str) -> Option<Value> {
    let f = s.trim().parse::<f64>().ok()?;
    Number::from_f64(f).map(Value::Number)
}

fn parse_bool(s: &str) -> Option<Value> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(Value::Bool(true)),
        "false" | "0" | "no" | "off" => Some(Value::Bool(false)),
        _ => None,
    }
}

fn integral(n: &Number) -> Option<Value> {
    if n.is_i64() || n.is_u64() {
        return None;
    }
    let f = n.as_f64()?;
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(Value::from(f as i64))
    } else {
        None
    }
}

fn as_float(n: &Number) -> Option<Value> {
    n.as_f64().and_then(Number::from_f64).map(Value::Number)
}

fn index_keyed(items: Vec<Value>) -> Value {
    let map: Map<String, Value> = items
        .into_iter()
        .enumerate()
        .map(|(i, v)| (i.to_string(), v))
        .collect();
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_string_coerces_to_absent_for_scalars() {
        for kind in [Kind::String, Kind::Integer, Kind::Float, Kind::Boolean, Kind::Map, Kind::Object] {
            assert_eq!(kind.coerce(json!("")), None, "{:?}", kind);
        }
    }

    #[test]
    fn test_empty_string_coerces_to_empty_list() {
        assert_eq!(Kind::List.coerce(json!("")), Some(json!([])));
    }

    #[test]
    fn test_integer_coercion() {
        assert_eq!(Kind::Integer.coerce(json!(" 42 ")), Some(json!(42)));
        assert_eq!(Kind::Integer.coerce(json!("3.0")), Some(json!(3)));
        assert_eq!(Kind::Integer.coerce(json!(7.0)), Some(json!(7)));
        assert_eq!(Kind::Integer.coerce(json!(true)), Some(json!(1)));
        assert_eq!(Kind::Integer.coerce(json!("abc")), Some(json!("abc")));
        assert_eq!(Kind::Integer.coerce(json!(1.5)), Some(json!(1.5)));
    }

    #[test]
    fn test_integer_coercion_rejects_out_of_range() {
        assert_eq!(
            Kind::Integer.coerce(json!("9223372036854775808")),
            Some(json!("9223372036854775808"))
        );
        assert_eq!(Kind::Integer.narrow(&json!(9223372036854775808.0)), None);
        assert_eq!(
            Kind::Integer.coerce(json!("-9223372036854775808")),
            Some(json!(i64::MIN))
        );
    }

    #[test]
    fn test_float_coercion() {
        assert_eq!(Kind::Float.coerce(json!("2.5")), Some(json!(2.5)));
        assert_eq!(Kind::Float.coerce(json!(2)), Some(json!(2.0)));
        assert_eq!(Kind::Float.coerce(json!("nope")), Some(json!("nope")));
    }

    #[test]
    fn test_boolean_coercion() {
        assert_eq!(Kind::Boolean.coerce(json!("Yes")), Some(json!(true)));
        assert_eq!(Kind::Boolean.coerce(json!("off")), Some(json!(false)));
        assert_eq!(Kind::Boolean.coerce(json!(0)), Some(json!(false)));
        assert_eq!(Kind::Boolean.coerce(json!("maybe")), Some(json!("maybe")));
    }

    #[test]
    fn test_string_coercion() {
        assert_eq!(Kind::String.coerce(json!(12)), Some(json!("12")));
        assert_eq!(Kind::String.coerce(json!(false)), Some(json!("false")));
        assert_eq!(Kind::String.coerce(json!([1])), Some(json!([1])));
    }

    #[test]
    fn test_list_coercion() {
        assert_eq!(Kind::List.coerce(json!("a")), Some(json!(["a"])));
        assert_eq!(Kind::List.coerce(json!({"x": 1, "y": 2})), Some(json!([1, 2])));
    }

    #[test]
    fn test_map_coercion_from_list() {
        assert_eq!(Kind::Map.coerce(json!(["a", "b"])), Some(json!({"0": "a", "1": "b"})));
        assert_eq!(Kind::Object.coerce(json!(["a"])), Some(json!(["a"])));
    }

    #[test]
    fn test_null_coerces_to_absent() {
        assert_eq!(Kind::List.coerce(Value::Null), None);
    }

    #[test]
    fn test_narrow() {
        assert_eq!(Kind::Integer.narrow(&json!(3)), Some(json!(3)));
        assert_eq!(Kind::Integer.narrow(&json!(3.5)), None);
        assert_eq!(Kind::Integer.narrow(&json!(3.0)), Some(json!(3)));
        assert_eq!(Kind::Float.narrow(&json!(3)), Some(json!(3.0)));
        assert_eq!(Kind::String.narrow(&json!(3)), None);
        assert_eq!(Kind::Map.narrow(&json!([])), None);
    }

    #[test]
    fn test_detect() {
        assert_eq!(Kind::detect(&json!("a")), Some(Kind::String));
        assert_eq!(Kind::detect(&json!(1)), Some(Kind::Integer));
        assert_eq!(Kind::detect(&json!(1.5)), Some(Kind::Float));
        assert_eq!(Kind::detect(&json!([])), Some(Kind::List));
        assert_eq!(Kind::detect(&json!({})), Some(Kind::Map));
        assert_eq!(Kind::detect(&Value::Null), None);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(Kind::List.normalize(json!({"b": 2, "a": 1})), json!([2, 1]));
        assert_eq!(Kind::Map.normalize(json!([true])), json!({"0": true}));
        assert_eq!(Kind::Integer.normalize(json!(4.0)), json!(4));
        assert_eq!(Kind::Float.normalize(json!(4)), json!(4.0));
        assert_eq!(Kind::String.normalize(json!(4)), json!(4));
    }
}
