//! Extensible structural JSON codec for conform
//!
//! Losslessly serializes and deserializes values JSON cannot natively
//! represent (big integers, timestamps, maps, sets) by wrapping them in
//! tagged envelopes and recursively re-applying the codec to nested
//! structures. Built entirely on the schema combinator engine: decode-time
//! envelope matching is validated schema matching.

mod builtins;
mod errors;
mod registry;

pub use builtins::{big_int_codec, date_codec, map_codec, set_codec};
pub use errors::{DecodeError, DecodeResult};
pub use registry::{create_codec, Codec, TypeCodec, TYPE_FIELD, VALUE_FIELD};
