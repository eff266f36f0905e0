//! Primitive schema constructors
//!
//! Leaf schemas for the scalar kinds, plus `unknown` (accepts everything)
//! and `custom` (caller-supplied type guard). The scalar constructors return
//! refinement wrappers (`StringSchema`, `NumberSchema`, `BooleanSchema`)
//! that deref to `Schema`, so combinators chain directly off them.

use std::ops::Deref;

use regex::Regex;

use super::core::Schema;
use crate::value::Value;

fn base(is_type: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Schema {
    Schema::from_parts(is_type, |_| true, Value::clone)
}

/// Creates a string schema.
pub fn string() -> StringSchema {
    StringSchema {
        inner: base(|v| matches!(v, Value::String(_))),
    }
}

/// Creates a number schema.
pub fn number() -> NumberSchema {
    NumberSchema {
        inner: base(|v| matches!(v, Value::Number(_))),
    }
}

/// Creates a boolean schema.
pub fn boolean() -> BooleanSchema {
    BooleanSchema {
        inner: base(|v| matches!(v, Value::Bool(_))),
    }
}

/// Creates a schema accepting only `Null`.
pub fn null() -> Schema {
    base(Value::is_null)
}

/// Creates a schema accepting only `Undefined`.
pub fn undefined() -> Schema {
    base(Value::is_undefined)
}

/// Creates a schema accepting any value.
pub fn unknown() -> Schema {
    base(|_| true)
}

/// Creates a schema from an arbitrary type guard.
pub fn custom(type_check: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Schema {
    base(type_check)
}

/// A string schema with length and pattern refinements.
#[derive(Clone, Debug)]
pub struct StringSchema {
    inner: Schema,
}

impl StringSchema {
    fn refined(self, f: impl Fn(&str) -> bool + Send + Sync + 'static) -> StringSchema {
        StringSchema {
            inner: self.inner.then_validate(move |v| v.as_str().is_some_and(&f)),
        }
    }

    /// Validates that strings have a length of at least `n`.
    pub fn min_length(self, n: usize) -> StringSchema {
        self.refined(move |s| s.chars().count() >= n)
    }

    /// Validates that strings have a length of at most `n`.
    pub fn max_length(self, n: usize) -> StringSchema {
        self.refined(move |s| s.chars().count() <= n)
    }

    /// Validates that strings have a length equal to `n`.
    pub fn length(self, n: usize) -> StringSchema {
        self.refined(move |s| s.chars().count() == n)
    }

    /// Validates that strings match the given regular expression.
    pub fn pattern(self, regex: Regex) -> StringSchema {
        self.refined(move |s| regex.is_match(s))
    }

    /// Restricts the type check to strings equal to one element of `options`.
    pub fn eq(self, options: &[&str]) -> Schema {
        let options: Vec<String> = options.iter().map(|s| s.to_string()).collect();
        Schema::from_parts(
            move |v| v.as_str().is_some_and(|s| options.iter().any(|o| o == s)),
            |_| true,
            Value::clone,
        )
    }
}

impl Deref for StringSchema {
    type Target = Schema;

    fn deref(&self) -> &Schema {
        &self.inner
    }
}

impl From<StringSchema> for Schema {
    fn from(s: StringSchema) -> Schema {
        s.inner
    }
}

/// A number schema with range and integrality refinements.
#[derive(Clone, Debug)]
pub struct NumberSchema {
    inner: Schema,
}

impl NumberSchema {
    fn refined(self, f: impl Fn(f64) -> bool + Send + Sync + 'static) -> NumberSchema {
        NumberSchema {
            inner: self.inner.then_validate(move |v| v.as_f64().is_some_and(&f)),
        }
    }

    /// Validates that numbers are at least `n`.
    pub fn min(self, n: f64) -> NumberSchema {
        self.refined(move |v| v >= n)
    }

    /// Validates that numbers are at most `n`.
    pub fn max(self, n: f64) -> NumberSchema {
        self.refined(move |v| v <= n)
    }

    /// Validates that numbers are integers exactly representable in an
    /// `f64` (magnitude at most 2^53 - 1).
    pub fn int(self) -> NumberSchema {
        const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
        self.refined(|v| v.is_finite() && v.fract() == 0.0 && v.abs() <= MAX_SAFE_INTEGER)
    }

    /// Validates that numbers are integers, without the exact-representation
    /// bound of `int`.
    pub fn unsafe_int(self) -> NumberSchema {
        self.refined(|v| v.is_finite() && v.fract() == 0.0)
    }

    /// Validates that numbers are finite.
    pub fn finite(self) -> NumberSchema {
        self.refined(f64::is_finite)
    }

    /// Restricts the type check to numbers equal to one element of `options`.
    pub fn eq(self, options: &[f64]) -> Schema {
        let options = options.to_vec();
        Schema::from_parts(
            move |v| v.as_f64().is_some_and(|n| options.iter().any(|o| *o == n)),
            |_| true,
            Value::clone,
        )
    }
}

impl Deref for NumberSchema {
    type Target = Schema;

    fn deref(&self) -> &Schema {
        &self.inner
    }
}

impl From<NumberSchema> for Schema {
    fn from(s: NumberSchema) -> Schema {
        s.inner
    }
}

/// A boolean schema.
#[derive(Clone, Debug)]
pub struct BooleanSchema {
    inner: Schema,
}

impl BooleanSchema {
    /// Restricts the type check to booleans equal to `b`.
    pub fn eq(self, b: bool) -> Schema {
        Schema::from_parts(move |v| v.as_bool() == Some(b), |_| true, Value::clone)
    }
}

impl Deref for BooleanSchema {
    type Target = Schema;

    fn deref(&self) -> &Schema {
        &self.inner
    }
}

impl From<BooleanSchema> for Schema {
    fn from(s: BooleanSchema) -> Schema {
        s.inner
    }
}
