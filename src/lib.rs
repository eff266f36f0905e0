//! conform - A strict, composable runtime schema validation and
//! transformation library with a lossless JSON codec

pub mod codec;
pub mod schema;
pub mod value;
