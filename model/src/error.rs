//! Error types for loading and serializing aspect models.
//!
//! Only conditions that abort a whole load are errors. Recoverable conditions
//! (unresolved references, cache key collisions, `extends` cycles) are
//! recorded as [`Diagnostic`](crate::graph::Diagnostic)s on the graph instead.

use thiserror::Error;

/// Fatal failure of a load, parse or configuration step.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The triple store declares no `samm:Aspect` subject.
    #[error("model integrity: no aspect found in the triple store")]
    NoAspect,

    /// Several aspects exist and no URN was supplied to pick one.
    #[error("model integrity: {} aspects found and no aspect URN given: {}", .candidates.len(), .candidates.join(", "))]
    AmbiguousAspect {
        /// URNs of every aspect subject, in store order.
        candidates: Vec<String>,
    },

    /// The requested aspect URN is not declared as a `samm:Aspect`.
    #[error("model integrity: aspect {urn} not found")]
    AspectNotFound {
        /// The URN that was asked for.
        urn: String,
    },

    /// The vocabulary version is not one this crate understands.
    #[error("unsupported SAMM version: {version}")]
    UnsupportedVersion {
        /// The offending version string.
        version: String,
    },

    /// The RDF source could not be parsed.
    #[error("RDF parse error: {0}")]
    Parse(String),

    /// The loader configuration is malformed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Reading a configuration or model file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ModelError {
    /// Returns true for the zero / ambiguous / missing aspect conditions.
    #[must_use]
    pub fn is_integrity(&self) -> bool {
        matches!(
            self,
            ModelError::NoAspect | ModelError::AmbiguousAspect { .. } | ModelError::AspectNotFound { .. }
        )
    }
}
