//! Codec error types
//!
//! The codec surface has exactly one fatal condition: decode input that is
//! not well-formed JSON. Everything else is best-effort by design — encode
//! never fails, and unmatched values degrade to `null`.

use thiserror::Error;

/// Result type for codec decode operations
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Errors raised while decoding codec output
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The input text is not well-formed JSON
    #[error("malformed JSON input: {0}")]
    MalformedJson(#[from] serde_json::Error),
}
