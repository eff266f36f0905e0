//! Schema contract and combinators
//!
//! A `Schema` is an immutable triple of operations over dynamic values:
//! a type check, a validity (refinement) check, and a mapping. Combinators
//! never mutate the schema they wrap; they capture its operations and return
//! a fresh schema, so any schema can be shared freely across threads and
//! reused by any number of concurrent callers.
//!
//! Failure is silent by design: invalid input is communicated solely through
//! `is_type`/`validate` returning `false`. Calling `map` on input that fails
//! those checks is a caller-side precondition violation; gate on
//! `validate_and_map` when the input is untrusted.

use std::sync::Arc;

use crate::value::Value;

type TypePredicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;
type Validator = Arc<dyn Fn(&Value) -> bool + Send + Sync>;
type Mapper = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// An immutable, composable description of a class of values: how to
/// recognize them, how to validate their refinements, and how to map them
/// into a target representation.
#[derive(Clone)]
pub struct Schema {
    is_type: TypePredicate,
    validate: Validator,
    map: Mapper,
}

impl Schema {
    /// Builds a schema from its three operations. Every primitive, compound,
    /// and combinator in this crate goes through this constructor.
    pub fn from_parts(
        is_type: impl Fn(&Value) -> bool + Send + Sync + 'static,
        validate: impl Fn(&Value) -> bool + Send + Sync + 'static,
        map: impl Fn(&Value) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            is_type: Arc::new(is_type),
            validate: Arc::new(validate),
            map: Arc::new(map),
        }
    }

    /// Structural type membership test. Pure; never panics on any `Value`.
    pub fn is_type(&self, v: &Value) -> bool {
        (self.is_type)(v)
    }

    /// Refinement check. Precondition: `is_type(v)` holds.
    pub fn validate(&self, v: &Value) -> bool {
        (self.validate)(v)
    }

    /// Maps a value into this schema's target representation.
    /// Precondition: `is_type(v)` and `validate(v)` hold.
    pub fn map(&self, v: &Value) -> Value {
        (self.map)(v)
    }

    /// Gates `map` behind the type and validity checks. Returns `None` when
    /// either check fails.
    pub fn validate_and_map(&self, v: &Value) -> Option<Value> {
        if self.is_type(v) && self.validate(v) {
            Some(self.map(v))
        } else {
            None
        }
    }

    /// Union of this schema and `other`. This schema is probed first at
    /// `is_type`, `validate`, and `map` time, so when both sides match, this
    /// side's validate/map path is the one taken.
    pub fn or(&self, other: &Schema) -> Schema {
        let (a1, b1) = (self.clone(), other.clone());
        let (a2, b2) = (self.clone(), other.clone());
        let (a3, b3) = (self.clone(), other.clone());
        Schema::from_parts(
            move |v| a1.is_type(v) || b1.is_type(v),
            move |v| {
                if a2.is_type(v) {
                    a2.validate(v)
                } else {
                    b2.validate(v)
                }
            },
            move |v| {
                if a3.is_type(v) {
                    a3.map(v)
                } else {
                    b3.map(v)
                }
            },
        )
    }

    /// Widens this schema to also accept `Undefined`. An `Undefined` input
    /// short-circuits: the wrapped validate and map never observe it.
    pub fn optional(&self) -> Schema {
        let s1 = self.clone();
        let s2 = self.clone();
        let s3 = self.clone();
        Schema::from_parts(
            move |v| v.is_undefined() || s1.is_type(v),
            move |v| v.is_undefined() || s2.validate(v),
            move |v| {
                if v.is_undefined() {
                    Value::Undefined
                } else {
                    s3.map(v)
                }
            },
        )
    }

    /// Widens this schema to also accept `Null`, with the same short-circuit
    /// behavior as `optional`. The two compose in either order.
    pub fn nullable(&self) -> Schema {
        let s1 = self.clone();
        let s2 = self.clone();
        let s3 = self.clone();
        Schema::from_parts(
            move |v| v.is_null() || s1.is_type(v),
            move |v| v.is_null() || s2.validate(v),
            move |v| {
                if v.is_null() {
                    Value::Null
                } else {
                    s3.map(v)
                }
            },
        )
    }

    /// Adds a refinement. The new validity is the conjunction of the wrapped
    /// validity and `f` applied to the *mapped* value, so refinements observe
    /// the output of any `then_map` steps composed before them. `f` is not
    /// invoked when the wrapped validity already failed.
    pub fn then_validate(&self, f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Schema {
        let s1 = self.clone();
        let s2 = self.clone();
        let s3 = self.clone();
        Schema::from_parts(
            move |v| s1.is_type(v),
            move |v| s2.validate(v) && f(&s2.map(v)),
            move |v| s3.map(v),
        )
    }

    /// Composes `f` after this schema's map. Chaining composes left to
    /// right: `s.then_map(f).then_map(g).map(v) == g(f(s.map(v)))`.
    pub fn then_map(&self, f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Schema {
        let s1 = self.clone();
        let s2 = self.clone();
        let s3 = self.clone();
        Schema::from_parts(
            move |v| s1.is_type(v),
            move |v| s2.validate(v),
            move |v| f(s3.map(v)),
        )
    }
}

impl std::fmt::Debug for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Schema")
    }
}

/// An insertion-ordered mapping from property keys to schemas, used to build
/// compound object schemas. Insertion order determines mapped output order.
#[derive(Clone, Default)]
pub struct SchemaRecord {
    fields: Vec<(String, Schema)>,
}

impl SchemaRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field. Re-declaring a key replaces its schema in place.
    pub fn field(mut self, name: impl Into<String>, schema: impl Into<Schema>) -> Self {
        let name = name.into();
        let schema = schema.into();
        if let Some(existing) = self.fields.iter_mut().find(|(k, _)| *k == name) {
            existing.1 = schema;
        } else {
            self.fields.push((name, schema));
        }
        self
    }

    /// Iterates fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &(String, Schema)> {
        self.fields.iter()
    }

    /// Looks up a field schema by key.
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, s)| s)
    }

    /// Returns whether a key is declared.
    pub fn contains_key(&self, name: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == name)
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns whether no fields are declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
