//! Schema combinator engine for conform
//!
//! Schemas are immutable, composable descriptions of value shapes. Every
//! schema exposes the same three-operation contract (`is_type`, `validate`,
//! `map`); combinators (`or`, `optional`, `nullable`, `then_validate`,
//! `then_map`) wrap an existing schema and return a new one.
//!
//! # Design Principles
//!
//! - Schemas are stateless and reusable across concurrent calls
//! - Combinators never mutate the wrapped schema
//! - Validation failures are `false` returns, never errors
//! - `map` assumes its precondition (`is_type` and `validate`) holds

mod compound;
mod core;
mod primitives;

pub use compound::{array, object, tuple, ArraySchema, ObjectSchema};
pub use core::{Schema, SchemaRecord};
pub use primitives::{
    boolean, custom, null, number, string, undefined, unknown, BooleanSchema, NumberSchema,
    StringSchema,
};
