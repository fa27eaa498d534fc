//! Loader configuration.
//!
//! Read from TOML; every field has a default so an empty document is valid:
//!
//! ```toml
//! samm_version = "2.1.0"
//! seed = 7
//! fallback_namespace = "urn:samm:org.example:1.0.0"
//!
//! [prefixes]
//! ext = "urn:samm:org.example.ext:1.0.0#"
//! ```

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::ModelError;
use crate::vocab::{Samm, SammVersion};

/// Namespace used for synthesized names when neither an aspect nor any named
/// element has supplied one.
pub const DEFAULT_FALLBACK_NAMESPACE: &str = "urn:samm:org.eclipse.esmf.samm:anonymous:1.0.0";

/// Settings shared by loading and serialization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderConfig {
    /// Vocabulary version, validated by [`LoaderConfig::version`].
    pub samm_version: String,
    /// Seed for synthesized names. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Namespace for blank nodes built before any namespace is known.
    pub fallback_namespace: String,
    /// Extra prefix aliases for the Turtle writer.
    pub prefixes: IndexMap<String, String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            samm_version: SammVersion::default().as_str().to_owned(),
            seed: None,
            fallback_namespace: DEFAULT_FALLBACK_NAMESPACE.to_owned(),
            prefixes: IndexMap::new(),
        }
    }
}

impl LoaderConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Config`] for malformed TOML or unknown keys, and
    /// [`ModelError::UnsupportedVersion`] for an unknown `samm_version`.
    pub fn from_toml_str(source: &str) -> Result<Self, ModelError> {
        let config: Self = toml::from_str(source).map_err(|e| ModelError::Config(e.to_string()))?;
        config.version()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Io`] if the file cannot be read, otherwise as
    /// [`LoaderConfig::from_toml_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// A default configuration with a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// The parsed vocabulary version.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnsupportedVersion`] with the configured string.
    pub fn version(&self) -> Result<SammVersion, ModelError> {
        SammVersion::parse(&self.samm_version)
    }

    /// The vocabulary for the configured version.
    ///
    /// # Errors
    ///
    /// As [`LoaderConfig::version`].
    pub fn vocabulary(&self) -> Result<Samm, ModelError> {
        self.version().map(Samm::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        let config = LoaderConfig::from_toml_str("").map_err(|e| e.to_string());
        assert_eq!(config, Ok(LoaderConfig::default()));
    }

    #[test]
    fn reads_every_field() {
        let config = LoaderConfig::from_toml_str(
            r#"
            samm_version = "2.0.0"
            seed = 42
            fallback_namespace = "urn:samm:org.example:1.0.0"

            [prefixes]
            ext = "urn:samm:org.example.ext:1.0.0#"
            "#,
        );
        let Ok(config) = config else {
            unreachable!("valid config rejected");
        };
        assert_eq!(config.seed, Some(42));
        assert!(matches!(config.version(), Ok(SammVersion::V2_0_0)));
        assert_eq!(config.prefixes.get("ext").map(String::as_str), Some("urn:samm:org.example.ext:1.0.0#"));
    }

    #[test]
    fn rejects_unknown_versions_with_the_offending_string() {
        match LoaderConfig::from_toml_str(r#"samm_version = "9.9.9""#) {
            Err(ModelError::UnsupportedVersion { version }) => assert_eq!(version, "9.9.9"),
            other => unreachable!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(matches!(
            LoaderConfig::from_toml_str("colour = 1"),
            Err(ModelError::Config(_))
        ));
    }
}
