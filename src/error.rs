//! Error types for the converter
//!
//! Only input that is not text at all is fatal. Unknown tags, unknown block types and
//! malformed block data are absorbed by the fallback paths and never reach this type.

use thiserror::Error;

/// Fatal conversion failures.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// HTML input bytes are not valid UTF-8.
    #[error("input is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// JSON input does not describe a block document.
    #[error("input is not a block document: {0}")]
    InvalidJson(#[from] serde_json::Error),
}
