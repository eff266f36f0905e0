//! Builtin type codecs
//!
//! Registration entries for the rich `Value` variants JSON cannot represent.
//! Each pairs a wire schema (validating and reviving the JSON form) with an
//! encode-time type guard and an unwrap into the wire form. `unwrap` outputs
//! may themselves contain rich values; the codec encodes them recursively.

use chrono::{DateTime, SecondsFormat, Utc};

use super::registry::TypeCodec;
use crate::schema::{array, string, tuple, unknown};
use crate::value::Value;

/// Supports `Value::BigInt`, carried on the wire as a decimal string.
pub fn big_int_codec() -> TypeCodec {
    let wire = string()
        .then_validate(|v| v.as_str().is_some_and(|s| s.parse::<i128>().is_ok()))
        .then_map(|v| match v {
            Value::String(s) => Value::BigInt(s.parse().unwrap_or_default()),
            other => other,
        });
    TypeCodec::new(
        wire,
        |v| matches!(v, Value::BigInt(_)),
        |v| match v {
            Value::BigInt(n) => Value::String(n.to_string()),
            other => other.clone(),
        },
    )
}

/// Supports `Value::Timestamp`, carried on the wire as an RFC 3339 string
/// with millisecond precision in UTC (e.g. `1970-01-01T00:00:00.000Z`).
pub fn date_codec() -> TypeCodec {
    let wire = string()
        .then_validate(|v| {
            v.as_str()
                .is_some_and(|s| DateTime::parse_from_rfc3339(s).is_ok())
        })
        .then_map(|v| {
            let parsed = v
                .as_str()
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok());
            match parsed {
                Some(dt) => Value::Timestamp(dt.with_timezone(&Utc)),
                None => v,
            }
        });
    TypeCodec::new(
        wire,
        |v| matches!(v, Value::Timestamp(_)),
        |v| match v {
            Value::Timestamp(dt) => {
                Value::String(dt.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            other => other.clone(),
        },
    )
}

/// Supports `Value::Map`, carried on the wire as an array of two-element
/// `[key, value]` arrays.
pub fn map_codec() -> TypeCodec {
    let wire = array(tuple(vec![unknown(), unknown()])).then_map(|v| match v {
        Value::Array(items) => Value::map_entries(
            items
                .into_iter()
                .map(|pair| match pair {
                    Value::Array(mut kv) if kv.len() == 2 => {
                        let value = kv.pop().unwrap_or(Value::Undefined);
                        let key = kv.pop().unwrap_or(Value::Undefined);
                        (key, value)
                    }
                    other => (other, Value::Undefined),
                })
                .collect(),
        ),
        other => other,
    });
    TypeCodec::new(
        wire,
        |v| matches!(v, Value::Map(_)),
        |v| match v {
            Value::Map(entries) => Value::Array(
                entries
                    .iter()
                    .map(|(k, value)| Value::Array(vec![k.clone(), value.clone()]))
                    .collect(),
            ),
            other => other.clone(),
        },
    )
}

/// Supports `Value::Set`, carried on the wire as an array of its elements.
pub fn set_codec() -> TypeCodec {
    let wire = array(unknown()).then_map(|v| match v {
        Value::Array(items) => Value::set(items),
        other => other,
    });
    TypeCodec::new(
        wire,
        |v| matches!(v, Value::Set(_)),
        |v| match v {
            Value::Set(items) => Value::Array(items.clone()),
            other => other.clone(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::registry::create_codec;

    #[test]
    fn test_big_int_wire_schema_rejects_non_integers() {
        let codec = create_codec(vec![big_int_codec()]);
        // A malformed payload fails the wire schema's validity check, so the
        // envelope is left as plain data instead of being revived.
        let decoded = codec.decode(r#"{"$type":0,"value":"12x"}"#).unwrap();
        assert_eq!(
            decoded.get("value"),
            Some(&Value::String("12x".to_string()))
        );
    }

    #[test]
    fn test_date_unwrap_uses_millisecond_utc_form() {
        let codec = create_codec(vec![date_codec()]);
        let ts = Value::Timestamp(DateTime::from_timestamp_millis(9).unwrap());
        assert_eq!(
            codec.encode(&ts),
            r#"{"$type":0,"value":"1970-01-01T00:00:00.009Z"}"#
        );
    }

    #[test]
    fn test_set_deduplicates_on_revive() {
        let codec = create_codec(vec![set_codec()]);
        let decoded = codec.decode(r#"{"$type":0,"value":[1,2,2]}"#).unwrap();
        assert_eq!(
            decoded,
            Value::Set(vec![Value::from(1u64), Value::from(2u64)])
        );
    }
}
