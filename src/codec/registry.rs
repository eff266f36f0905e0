//! Type codec registry and envelope codec
//!
//! `create_codec` takes an ordered list of type codecs and produces an
//! `encode`/`decode` pair. Values of registered non-native types are wrapped
//! in tagged envelopes `{"$type": <index>, "value": <payload>}` on encode;
//! decode matches envelopes against pre-built schemas and reverses the
//! process. Registration order is significant: it fixes envelope indices and
//! is the tie-break at both encode and decode time. Codecs with overlapping
//! type guards are not an error; the first registered wins.
//!
//! Known limitation, preserved deliberately for wire compatibility: domain
//! data that happens to be shaped like a valid envelope is revived as if it
//! were one. Callers choosing field names share the `$type`/`value` namespace
//! with the envelope format.

use std::sync::Arc;

use serde_json::Number;

use super::errors::DecodeResult;
use crate::schema::{number, object, Schema, SchemaRecord};
use crate::value::Value;

/// Envelope field holding the codec index.
pub const TYPE_FIELD: &str = "$type";

/// Envelope field holding the encoded payload.
pub const VALUE_FIELD: &str = "value";

type TypeGuard = Arc<dyn Fn(&Value) -> bool + Send + Sync>;
type Unwrap = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// A registration entry teaching the codec how to serialize and deserialize
/// one non-native domain type.
#[derive(Clone)]
pub struct TypeCodec {
    schema: Schema,
    is_type: TypeGuard,
    unwrap: Unwrap,
}

impl TypeCodec {
    /// Creates a type codec from its three parts:
    ///
    /// - `schema` describes the wire (JSON) representation and maps it back
    ///   to the domain value, typically via `then_map`;
    /// - `is_type` detects domain values needing this codec at encode time;
    /// - `unwrap` converts a domain value to its wire representation, which
    ///   may itself still contain non-native values (they are encoded
    ///   recursively).
    pub fn new(
        schema: impl Into<Schema>,
        is_type: impl Fn(&Value) -> bool + Send + Sync + 'static,
        unwrap: impl Fn(&Value) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            schema: schema.into(),
            is_type: Arc::new(is_type),
            unwrap: Arc::new(unwrap),
        }
    }
}

/// An encode/decode pair over a fixed, ordered codec registration list.
pub struct Codec {
    codecs: Vec<TypeCodec>,
    envelopes: Vec<Schema>,
}

/// Creates a codec from an ordered list of type codecs.
///
/// One envelope schema is built per entry: an object schema requiring the
/// `$type` member to equal the entry's registration index and the `value`
/// member to satisfy the entry's wire schema, mapped down to the mapped
/// payload.
pub fn create_codec(codecs: Vec<TypeCodec>) -> Codec {
    let envelopes = codecs
        .iter()
        .enumerate()
        .map(|(i, codec)| {
            object(
                SchemaRecord::new()
                    .field(TYPE_FIELD, number().eq(&[i as f64]))
                    .field(VALUE_FIELD, codec.schema.clone()),
            )
            .then_map(|v| v.get(VALUE_FIELD).cloned().unwrap_or(Value::Undefined))
        })
        .collect();
    Codec { codecs, envelopes }
}

impl Codec {
    /// Encodes `v` as a JSON string. Registered codec matching always takes
    /// precedence over any intrinsic serialization behavior of the value;
    /// values no codec matches that JSON cannot represent degrade to `null`
    /// without raising an error.
    pub fn encode(&self, v: &Value) -> String {
        let substituted = self.deep_replace(v);
        serde_json::to_string(&substituted).unwrap_or_else(|_| String::from("null"))
    }

    /// Decodes a JSON string back into a value, reviving envelopes
    /// innermost-first. Malformed JSON is the one fatal error.
    pub fn decode(&self, text: &str) -> DecodeResult<Value> {
        let parsed: Value = serde_json::from_str(text)?;
        Ok(self.revive(parsed))
    }

    /// Replaces `v` with an envelope if a registered codec matches it.
    /// First registered codec wins; no match is a native passthrough.
    fn replace(&self, v: &Value) -> Value {
        for (i, codec) in self.codecs.iter().enumerate() {
            if (codec.is_type)(v) {
                return Value::Object(vec![
                    (TYPE_FIELD.to_string(), Value::Number(Number::from(i as u64))),
                    (VALUE_FIELD.to_string(), (codec.unwrap)(v)),
                ]);
            }
        }
        v.clone()
    }

    /// Applies `replace` at the current node, then recurses into the result
    /// so envelope payloads (and plain containers) are fully substituted.
    fn deep_replace(&self, v: &Value) -> Value {
        match self.replace(v) {
            Value::Array(items) => {
                Value::Array(items.iter().map(|item| self.deep_replace(item)).collect())
            }
            Value::Object(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(k, member)| (k.clone(), self.deep_replace(member)))
                    .collect(),
            ),
            other => other,
        }
    }

    /// Revives children before their parent, then probes envelope schemas in
    /// registration order at the current node.
    fn revive(&self, v: Value) -> Value {
        let v = match v {
            Value::Array(items) => {
                Value::Array(items.into_iter().map(|item| self.revive(item)).collect())
            }
            Value::Object(entries) => Value::Object(
                entries
                    .into_iter()
                    .map(|(k, member)| (k, self.revive(member)))
                    .collect(),
            ),
            other => other,
        };
        self.probe(v)
    }

    /// Matches `v` against the envelope schemas; the first whose type check
    /// and validity both hold wins. The mapped domain value is probed again
    /// in case the unwrap chain nested an envelope directly inside another.
    fn probe(&self, v: Value) -> Value {
        for schema in &self.envelopes {
            if schema.is_type(&v) && schema.validate(&v) {
                return self.probe(schema.map(&v));
            }
        }
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::string;

    fn tagged_codec(tag: &'static str) -> TypeCodec {
        TypeCodec::new(
            string().then_map(move |v| {
                Value::Object(vec![("tag".into(), Value::from(tag)), ("raw".into(), v)])
            }),
            move |v| v.get("tag").and_then(Value::as_str) == Some(tag),
            |v| v.get("raw").cloned().unwrap_or(Value::Undefined),
        )
    }

    #[test]
    fn test_replace_prefers_first_registration() {
        // Both codecs claim the same values; index 0 must win.
        let codec = create_codec(vec![tagged_codec("a"), tagged_codec("a")]);
        let domain = Value::Object(vec![
            ("tag".into(), Value::from("a")),
            ("raw".into(), Value::from("x")),
        ]);
        assert_eq!(codec.encode(&domain), r#"{"$type":0,"value":"x"}"#);
    }

    #[test]
    fn test_native_values_pass_through() {
        let codec = create_codec(vec![]);
        let v = Value::Object(vec![("a".into(), Value::from(1i64))]);
        assert_eq!(codec.encode(&v), r#"{"a":1}"#);
        assert_eq!(codec.decode(r#"{"a":1}"#).unwrap(), v);
    }

    #[test]
    fn test_decode_rejects_malformed_json() {
        let codec = create_codec(vec![]);
        assert!(codec.decode("{not json").is_err());
    }

    #[test]
    fn test_envelope_with_wrong_index_is_left_alone() {
        let codec = create_codec(vec![tagged_codec("a")]);
        let decoded = codec.decode(r#"{"$type":5,"value":"x"}"#).unwrap();
        assert_eq!(
            decoded,
            Value::Object(vec![
                ("$type".into(), Value::from(5u64)),
                ("value".into(), Value::from("x")),
            ])
        );
    }
}
