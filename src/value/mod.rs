//! Dynamic value model for conform
//!
//! Schemas and codecs operate over `Value`, a dynamically typed value tree.
//! The JSON-native variants (`Null`, `Bool`, `Number`, `String`, `Array`,
//! `Object`) serialize directly; the rich variants (`BigInt`, `Timestamp`,
//! `Map`, `Set`) have no JSON representation and survive serialization only
//! when a type codec is registered for them.
//!
//! # Design Principles
//!
//! - Values are immutable: every transform produces a new tree
//! - Object members preserve insertion order for deterministic output
//! - `Undefined` is distinct from `Null` (absence vs. explicit null)

mod json;

use chrono::{DateTime, Utc};
use serde_json::Number;

/// A dynamically typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value, distinct from `Null`
    Undefined,
    /// Explicit null
    Null,
    /// Boolean
    Bool(bool),
    /// JSON number (integer or float)
    Number(Number),
    /// UTF-8 string
    String(String),
    /// Ordered sequence
    Array(Vec<Value>),
    /// Keyed container; members keep insertion order
    Object(Vec<(String, Value)>),
    /// Arbitrary-precision-style integer (not JSON-native)
    BigInt(i128),
    /// Point in time with millisecond precision (not JSON-native)
    Timestamp(DateTime<Utc>),
    /// Keyed container with arbitrary keys (not JSON-native)
    Map(Vec<(Value, Value)>),
    /// Collection of distinct values (not JSON-native)
    Set(Vec<Value>),
}

impl Value {
    /// Builds a `Set`, dropping duplicate elements (first occurrence wins).
    pub fn set(items: Vec<Value>) -> Value {
        let mut out: Vec<Value> = Vec::with_capacity(items.len());
        for item in items {
            if !out.contains(&item) {
                out.push(item);
            }
        }
        Value::Set(out)
    }

    /// Builds a `Map` from entries, deduplicating keys. A repeated key keeps
    /// its first position but takes the last value.
    pub fn map_entries(entries: Vec<(Value, Value)>) -> Value {
        let mut out: Vec<(Value, Value)> = Vec::with_capacity(entries.len());
        for (k, v) in entries {
            if let Some(existing) = out.iter_mut().find(|(ek, _)| *ek == k) {
                existing.1 = v;
            } else {
                out.push((k, v));
            }
        }
        Value::Map(out)
    }

    /// Returns whether this value is `Undefined`.
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Returns whether this value is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the string content, if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the numeric content as `f64`, if this is a `Number`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Returns the boolean content, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the elements, if this is an `Array`.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the members, if this is an `Object`.
    pub fn as_object(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Object(entries) => Some(entries),
            _ => None,
        }
    }

    /// Looks up an object member by key. Returns `None` for non-objects and
    /// absent keys alike.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Returns the runtime kind name, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::BigInt(_) => "bigint",
            Value::Timestamp(_) => "timestamp",
            Value::Map(_) => "map",
            Value::Set(_) => "set",
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Number(Number::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Number(Number::from(v))
    }
}

impl From<f64> for Value {
    /// Non-finite floats become `Null`, matching what JSON text encoding
    /// produces for them.
    fn from(v: f64) -> Self {
        match Number::from_f64(v) {
            Some(n) => Value::Number(n),
            None => Value::Null,
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_deduplicates() {
        let set = Value::set(vec![Value::from(1i64), Value::from(2i64), Value::from(2i64)]);
        assert_eq!(
            set,
            Value::Set(vec![Value::from(1i64), Value::from(2i64)])
        );
    }

    #[test]
    fn test_map_entries_last_value_wins() {
        let map = Value::map_entries(vec![
            (Value::from(1i64), Value::from("a")),
            (Value::from(2i64), Value::from("b")),
            (Value::from(1i64), Value::from("c")),
        ]);
        assert_eq!(
            map,
            Value::Map(vec![
                (Value::from(1i64), Value::from("c")),
                (Value::from(2i64), Value::from("b")),
            ])
        );
    }

    #[test]
    fn test_get_finds_members() {
        let obj = Value::Object(vec![
            ("a".into(), Value::from(1i64)),
            ("b".into(), Value::from(true)),
        ]);
        assert_eq!(obj.get("b"), Some(&Value::Bool(true)));
        assert_eq!(obj.get("c"), None);
        assert_eq!(Value::Null.get("a"), None);
    }

    #[test]
    fn test_non_finite_floats_become_null() {
        assert_eq!(Value::from(f64::NAN), Value::Null);
        assert_eq!(Value::from(f64::INFINITY), Value::Null);
        assert_eq!(Value::from(1.5), Value::Number(Number::from_f64(1.5).unwrap()));
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Undefined.type_name(), "undefined");
        assert_eq!(Value::BigInt(1).type_name(), "bigint");
        assert_eq!(Value::Map(vec![]).type_name(), "map");
    }
}
