//! Compound schema constructors: array, tuple, object
//!
//! Every compound schema honors the same composition contract: the container
//! kind (and fixed arity, where there is one) is rejected before children are
//! consulted, every declared child schema must hold for its member, and
//! mapping rebuilds the container member-wise through the child maps.
//!
//! Object schemas additionally carry an excess-member policy: undeclared
//! members are permitted and dropped by `map` unless `include_unknowns` is
//! set (pass through unchanged) or `strict` is set (rejected outright).

use std::ops::Deref;
use std::sync::Arc;

use super::core::{Schema, SchemaRecord};
use crate::value::Value;

/// Creates an array schema over a single element schema.
pub fn array(element: impl Into<Schema>) -> ArraySchema {
    ArraySchema::build(ArrayShape {
        element: element.into(),
        length: None,
        min_length: None,
        max_length: None,
    })
}

/// Creates a fixed-arity tuple schema. Each member is checked, validated,
/// and mapped by the schema at its position.
pub fn tuple(members: Vec<Schema>) -> Schema {
    let shape = Arc::new(members);
    let s1 = Arc::clone(&shape);
    let s2 = Arc::clone(&shape);
    let s3 = Arc::clone(&shape);
    Schema::from_parts(
        move |v| match v.as_array() {
            Some(items) => {
                items.len() == s1.len()
                    && items.iter().zip(s1.iter()).all(|(item, s)| s.is_type(item))
            }
            None => false,
        },
        move |v| match v.as_array() {
            Some(items) => items.iter().zip(s2.iter()).all(|(item, s)| s.validate(item)),
            None => false,
        },
        move |v| match v.as_array() {
            Some(items) => Value::Array(
                items
                    .iter()
                    .zip(s3.iter())
                    .map(|(item, s)| s.map(item))
                    .collect(),
            ),
            None => v.clone(),
        },
    )
}

/// Creates an object schema over a field record.
pub fn object(record: SchemaRecord) -> ObjectSchema {
    ObjectSchema::build(ObjectShape {
        record,
        strict: false,
        include_unknowns: false,
        partial: false,
    })
}

struct ArrayShape {
    element: Schema,
    length: Option<usize>,
    min_length: Option<usize>,
    max_length: Option<usize>,
}

impl ArrayShape {
    fn check_type(&self, v: &Value) -> bool {
        let items = match v.as_array() {
            Some(items) => items,
            None => return false,
        };
        let mut ok = self.length.is_none_or(|n| items.len() == n);
        ok &= self.min_length.is_none_or(|n| items.len() >= n);
        ok &= self.max_length.is_none_or(|n| items.len() <= n);
        ok && items.iter().all(|item| self.element.is_type(item))
    }

    fn check_valid(&self, v: &Value) -> bool {
        match v.as_array() {
            Some(items) => items.iter().all(|item| self.element.validate(item)),
            None => false,
        }
    }

    fn map_value(&self, v: &Value) -> Value {
        match v.as_array() {
            Some(items) => Value::Array(items.iter().map(|item| self.element.map(item)).collect()),
            None => v.clone(),
        }
    }
}

/// An array schema with length refinements.
#[derive(Clone)]
pub struct ArraySchema {
    shape: Arc<ArrayShape>,
    inner: Schema,
}

impl ArraySchema {
    fn build(shape: ArrayShape) -> ArraySchema {
        let shape = Arc::new(shape);
        let s1 = Arc::clone(&shape);
        let s2 = Arc::clone(&shape);
        let s3 = Arc::clone(&shape);
        let inner = Schema::from_parts(
            move |v| s1.check_type(v),
            move |v| s2.check_valid(v),
            move |v| s3.map_value(v),
        );
        ArraySchema { shape, inner }
    }

    fn with_shape(&self, f: impl FnOnce(&mut ArrayShape)) -> ArraySchema {
        let mut shape = ArrayShape {
            element: self.shape.element.clone(),
            length: self.shape.length,
            min_length: self.shape.min_length,
            max_length: self.shape.max_length,
        };
        f(&mut shape);
        ArraySchema::build(shape)
    }

    /// Requires arrays to have exactly `n` elements.
    pub fn length(&self, n: usize) -> ArraySchema {
        self.with_shape(|s| s.length = Some(n))
    }

    /// Requires arrays to have at least `n` elements.
    pub fn min_length(&self, n: usize) -> ArraySchema {
        self.with_shape(|s| s.min_length = Some(n))
    }

    /// Requires arrays to have at most `n` elements.
    pub fn max_length(&self, n: usize) -> ArraySchema {
        self.with_shape(|s| s.max_length = Some(n))
    }
}

impl Deref for ArraySchema {
    type Target = Schema;

    fn deref(&self) -> &Schema {
        &self.inner
    }
}

impl From<ArraySchema> for Schema {
    fn from(s: ArraySchema) -> Schema {
        s.inner
    }
}

struct ObjectShape {
    record: SchemaRecord,
    strict: bool,
    include_unknowns: bool,
    partial: bool,
}

impl ObjectShape {
    fn check_type(&self, v: &Value) -> bool {
        let entries = match v.as_object() {
            Some(entries) => entries,
            None => return false,
        };
        if self.strict && !entries.iter().all(|(k, _)| self.record.contains_key(k)) {
            return false;
        }
        self.record.iter().all(|(k, s)| match lookup(entries, k) {
            Some(member) => (self.partial && member.is_undefined()) || s.is_type(member),
            // Absent members are presented as Undefined so optional children
            // can accept them.
            None => self.partial || s.is_type(&Value::Undefined),
        })
    }

    fn check_valid(&self, v: &Value) -> bool {
        let entries = match v.as_object() {
            Some(entries) => entries,
            None => return false,
        };
        self.record.iter().all(|(k, s)| match lookup(entries, k) {
            Some(member) => (self.partial && member.is_undefined()) || s.validate(member),
            None => self.partial || s.validate(&Value::Undefined),
        })
    }

    fn map_value(&self, v: &Value) -> Value {
        let entries = match v.as_object() {
            Some(entries) => entries,
            None => return v.clone(),
        };
        if self.include_unknowns {
            // Keep input member order; declared members are replaced by
            // their mapped values, undeclared ones pass through unchanged.
            let mut out = Vec::with_capacity(entries.len());
            for (k, member) in entries {
                match self.record.get(k) {
                    Some(s) => {
                        if self.partial && member.is_undefined() {
                            continue;
                        }
                        out.push((k.clone(), s.map(member)));
                    }
                    None => out.push((k.clone(), member.clone())),
                }
            }
            // Declared members absent from the input still run through
            // their child map (as Undefined), so defaulting transforms
            // apply; an Undefined result stays omitted.
            for (k, s) in self.record.iter() {
                if lookup(entries, k).is_none() && !self.partial {
                    let mapped = s.map(&Value::Undefined);
                    if !mapped.is_undefined() {
                        out.push((k.clone(), mapped));
                    }
                }
            }
            Value::Object(out)
        } else {
            let mut out = Vec::with_capacity(self.record.len());
            for (k, s) in self.record.iter() {
                match lookup(entries, k) {
                    Some(member) => {
                        if self.partial && member.is_undefined() {
                            continue;
                        }
                        out.push((k.clone(), s.map(member)));
                    }
                    // An absent member maps the same way an explicit
                    // Undefined one does; Undefined results are omitted.
                    None => {
                        if !self.partial {
                            let mapped = s.map(&Value::Undefined);
                            if !mapped.is_undefined() {
                                out.push((k.clone(), mapped));
                            }
                        }
                    }
                }
            }
            Value::Object(out)
        }
    }
}

fn lookup<'a>(entries: &'a [(String, Value)], key: &str) -> Option<&'a Value> {
    entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

/// An object schema with excess-member and partiality policies.
#[derive(Clone)]
pub struct ObjectSchema {
    shape: Arc<ObjectShape>,
    inner: Schema,
}

impl ObjectSchema {
    fn build(shape: ObjectShape) -> ObjectSchema {
        let shape = Arc::new(shape);
        let s1 = Arc::clone(&shape);
        let s2 = Arc::clone(&shape);
        let s3 = Arc::clone(&shape);
        let inner = Schema::from_parts(
            move |v| s1.check_type(v),
            move |v| s2.check_valid(v),
            move |v| s3.map_value(v),
        );
        ObjectSchema { shape, inner }
    }

    fn with_shape(&self, f: impl FnOnce(&mut ObjectShape)) -> ObjectSchema {
        let mut shape = ObjectShape {
            record: self.shape.record.clone(),
            strict: self.shape.strict,
            include_unknowns: self.shape.include_unknowns,
            partial: self.shape.partial,
        };
        f(&mut shape);
        ObjectSchema::build(shape)
    }

    /// Rejects objects carrying members not declared in the record.
    pub fn strict(&self) -> ObjectSchema {
        self.with_shape(|s| s.strict = true)
    }

    /// Passes undeclared members through `map` unchanged instead of
    /// dropping them.
    pub fn include_unknowns(&self) -> ObjectSchema {
        self.with_shape(|s| s.include_unknowns = true)
    }

    /// Makes every declared member optional (missing or `Undefined`),
    /// preserving whichever excess-member policy is in effect. Absent
    /// members are omitted from the mapped output.
    pub fn partial(&self) -> ObjectSchema {
        self.with_shape(|s| s.partial = true)
    }
}

impl Deref for ObjectSchema {
    type Target = Schema;

    fn deref(&self) -> &Schema {
        &self.inner
    }
}

impl From<ObjectSchema> for Schema {
    fn from(s: ObjectSchema) -> Schema {
        s.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::primitives::{boolean, number, string, unknown};

    fn obj(entries: Vec<(&str, Value)>) -> Value {
        Value::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    #[test]
    fn test_array_rejects_wrong_kind_and_bad_lengths() {
        let s = array(number());
        assert!(s.is_type(&Value::Array(vec![Value::from(1i64)])));
        assert!(!s.is_type(&Value::from(1i64)));
        assert!(!s.is_type(&Value::Array(vec![Value::from("1")])));

        let bounded = array(number()).min_length(1).max_length(2);
        assert!(!bounded.is_type(&Value::Array(vec![])));
        assert!(bounded.is_type(&Value::Array(vec![Value::from(1i64)])));
        assert!(!bounded.is_type(&Value::Array(vec![
            Value::from(1i64),
            Value::from(2i64),
            Value::from(3i64),
        ])));
    }

    #[test]
    fn test_tuple_requires_exact_arity() {
        let s = tuple(vec![number().into(), string().into()]);
        assert!(s.is_type(&Value::Array(vec![Value::from(1i64), Value::from("a")])));
        assert!(!s.is_type(&Value::Array(vec![Value::from(1i64)])));
        assert!(!s.is_type(&Value::Array(vec![Value::from("a"), Value::from(1i64)])));
    }

    #[test]
    fn test_object_allows_and_strips_excess_members() {
        let s = object(SchemaRecord::new().field("a", boolean()));
        let input = obj(vec![("a", Value::from(true)), ("b", Value::from(3i64))]);
        assert!(s.is_type(&input));
        assert_eq!(s.map(&input), obj(vec![("a", Value::from(true))]));
    }

    #[test]
    fn test_object_include_unknowns_passes_excess_through() {
        let s = object(SchemaRecord::new().field("a", boolean())).include_unknowns();
        let input = obj(vec![("a", Value::from(true)), ("b", Value::from(3i64))]);
        assert_eq!(s.map(&input), input);
    }

    #[test]
    fn test_strict_object_rejects_excess_members() {
        let s = object(SchemaRecord::new().field("a", number()));
        let input = obj(vec![("a", Value::from(3i64)), ("b", Value::from("3"))]);
        assert!(s.is_type(&input));
        assert!(!s.strict().is_type(&input));
    }

    #[test]
    fn test_partial_object_accepts_missing_members() {
        let s = object(SchemaRecord::new().field("a", string())).partial();
        assert!(s.is_type(&obj(vec![])));
        assert!(s.is_type(&obj(vec![("a", Value::from("b"))])));
        assert!(s.is_type(&obj(vec![("a", Value::Undefined)])));
        assert!(!s.is_type(&obj(vec![("a", Value::from(1i64))])));
        assert_eq!(s.map(&obj(vec![("a", Value::Undefined)])), obj(vec![]));
    }

    #[test]
    fn test_absent_member_runs_defaulting_transform() {
        // A defaulting transform behind optional() fills in for a missing
        // member exactly as it does for an explicit Undefined one.
        let s = object(SchemaRecord::new().field(
            "a",
            number().optional().then_map(|v| {
                if v.is_undefined() {
                    Value::from(0i64)
                } else {
                    v
                }
            }),
        ));
        let expected = obj(vec![("a", Value::from(0i64))]);
        assert_eq!(s.map(&obj(vec![])), expected);
        assert_eq!(s.map(&obj(vec![("a", Value::Undefined)])), expected);
        assert_eq!(
            s.map(&obj(vec![("a", Value::from(7i64))])),
            obj(vec![("a", Value::from(7i64))])
        );
    }

    #[test]
    fn test_absent_member_defaults_with_include_unknowns() {
        let s = object(SchemaRecord::new().field(
            "a",
            number().optional().then_map(|v| {
                if v.is_undefined() {
                    Value::from(0i64)
                } else {
                    v
                }
            }),
        ))
        .include_unknowns();
        assert_eq!(
            s.map(&obj(vec![("b", Value::from(true))])),
            obj(vec![("b", Value::from(true)), ("a", Value::from(0i64))])
        );
    }

    #[test]
    fn test_absent_optional_member_stays_omitted() {
        // Without a defaulting transform the child maps absence to
        // Undefined, which is omitted from the output.
        let s = object(SchemaRecord::new().field("a", number().optional()));
        assert_eq!(s.map(&obj(vec![])), obj(vec![]));
    }

    #[test]
    fn test_partial_skips_absent_members_entirely() {
        // partial() omits absent members without running their transforms.
        let s = object(SchemaRecord::new().field(
            "a",
            number().optional().then_map(|v| {
                if v.is_undefined() {
                    Value::from(0i64)
                } else {
                    v
                }
            }),
        ))
        .partial();
        assert_eq!(s.map(&obj(vec![])), obj(vec![]));
    }

    #[test]
    fn test_optional_child_accepts_absence() {
        let s = object(SchemaRecord::new().field("a", number().optional()));
        assert!(s.is_type(&obj(vec![])));
        assert!(s.is_type(&obj(vec![("a", Value::from(1i64))])));
        assert!(!s.is_type(&obj(vec![("a", Value::from("1"))])));
    }

    #[test]
    fn test_nested_object_mapping() {
        let s = object(SchemaRecord::new().field(
            "inner",
            object(SchemaRecord::new().field(
                "n",
                number().then_map(|v| Value::from(v.as_f64().unwrap_or(0.0) - 1.0)),
            )),
        ));
        let input = obj(vec![("inner", obj(vec![("n", Value::from(4i64))]))]);
        assert_eq!(
            s.map(&input),
            obj(vec![("inner", obj(vec![("n", Value::from(3.0))]))])
        );
    }

    #[test]
    fn test_map_of_unknown_container_kind_is_identity() {
        // Precondition violations still return a value rather than panic.
        let s = object(SchemaRecord::new().field("a", unknown()));
        assert_eq!(s.map(&Value::Null), Value::Null);
    }
}
