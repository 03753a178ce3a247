//! Conversion options

use crate::model::SCHEMA_VERSION;

/// Knobs for both conversion directions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Level used when a header block's data is malformed.
    pub default_header_level: u8,
    /// Drop `script`, `style`, `noscript` and `template` elements when parsing.
    pub strip_unsafe: bool,
    /// Length of generated block ids, 1..=32.
    pub id_length: usize,
    /// Version stamped on parsed documents.
    pub version: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            default_header_level: 2,
            strip_unsafe: true,
            id_length: 10,
            version: SCHEMA_VERSION.to_string(),
        }
    }
}

impl ConvertOptions {
    pub fn header_level(&self) -> u8 {
        self.default_header_level.clamp(1, 6)
    }
}
