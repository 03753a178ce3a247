//! Shared configuration loader for blockhtml.
//!
//! `defaults/blockhtml.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`BlockhtmlConfig`].

use blockhtml::ConvertOptions;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/blockhtml.default.toml");

/// Top-level configuration consumed by blockhtml applications.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockhtmlConfig {
    pub render: RenderConfig,
    pub parse: ParseConfig,
}

/// Blocks → HTML knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    pub default_header_level: u8,
}

/// HTML → blocks knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct ParseConfig {
    pub strip_unsafe: bool,
    pub id_length: usize,
    pub version: String,
}

impl BlockhtmlConfig {
    /// The converter options these settings describe.
    pub fn to_options(&self) -> ConvertOptions {
        ConvertOptions {
            default_header_level: self.render.default_header_level,
            strip_unsafe: self.parse.strip_unsafe,
            id_length: self.parse.id_length,
            version: self.parse.version.clone(),
        }
    }
}

impl From<BlockhtmlConfig> for ConvertOptions {
    fn from(config: BlockhtmlConfig) -> Self {
        config.to_options()
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<BlockhtmlConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<BlockhtmlConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.render.default_header_level, 2);
        assert!(config.parse.strip_unsafe);
        assert_eq!(config.parse.id_length, 10);
        assert_eq!(config.parse.version, blockhtml::model::SCHEMA_VERSION);
    }

    #[test]
    fn defaults_match_converter_defaults() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.to_options(), ConvertOptions::default());
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("parse.strip_unsafe", false)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert!(!config.parse.strip_unsafe);
    }

    #[test]
    fn layers_files_over_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(file, "[render]\ndefault_header_level = 3").expect("write config");

        let config = Loader::new()
            .with_file(file.path())
            .build()
            .expect("config to build");
        assert_eq!(config.render.default_header_level, 3);
        assert_eq!(config.parse.id_length, 10);
    }

    #[test]
    fn missing_required_file_fails() {
        let result = Loader::new().with_file("/nonexistent/blockhtml.toml").build();
        assert!(result.is_err());
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("/nonexistent/blockhtml.toml")
            .build()
            .expect("config to build");
        assert_eq!(config.render.default_header_level, 2);
    }
}
