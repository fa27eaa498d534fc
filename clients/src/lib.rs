//! Setup shared by the `samm-*` binaries: logging and loader configuration.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use samm_model::LoaderConfig;
use tracing_subscriber::EnvFilter;

/// Installs a stderr subscriber filtered by `RUST_LOG`, `info` by default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Loader flags common to every binary.
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// TOML loader configuration.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// SAMM vocabulary version, overriding the configuration file.
    #[arg(long)]
    pub samm_version: Option<String>,

    /// Seed for synthesized names, overriding the configuration file.
    #[arg(long)]
    pub seed: Option<u64>,
}

impl ConfigArgs {
    /// The configuration file (or defaults) with flag overrides applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the
    /// resulting SAMM version is unsupported.
    pub fn resolve(&self) -> Result<LoaderConfig> {
        let mut config = match &self.config {
            Some(path) => LoaderConfig::from_path(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?,
            None => LoaderConfig::default(),
        };
        if let Some(version) = &self.samm_version {
            config.samm_version.clone_from(version);
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        config.version().context("Invalid SAMM version")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = ConfigArgs {
            config: None,
            samm_version: Some("2.0.0".to_owned()),
            seed: Some(3),
        };
        let config = args.resolve().expect("valid");
        assert_eq!(config.samm_version, "2.0.0");
        assert_eq!(config.seed, Some(3));
    }

    #[test]
    fn unknown_version_is_rejected() {
        let args = ConfigArgs {
            config: None,
            samm_version: Some("9.9.9".to_owned()),
            seed: None,
        };
        assert!(args.resolve().is_err());
    }
}
