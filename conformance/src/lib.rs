//! SAMM aspect model conformance suite.
//!
//! Runs every Turtle fixture below a directory through the validators and
//! aggregates the outcome into one [`ConformanceReport`].
//!
//! # Conformance Scope
//!
//! | Validator | Checks |
//! |-----------|--------|
//! | `turtle` | Turtle 1.1 parse, SAMM vocabulary version, `samm:Aspect` present |
//! | `round-trip/turtle` | load → serialize → Turtle → re-parse → reload is structurally equal |
//! | `round-trip/ntriples` | the same through N-Triples |
//!
//! # Entry Point
//!
//! ```no_run
//! use samm_conformance::run_all;
//! use samm_model::LoaderConfig;
//! use std::path::Path;
//!
//! let report = run_all(Path::new("model/tests/fixtures"), &LoaderConfig::default())?;
//! assert!(report.all_passed());
//! # Ok::<(), anyhow::Error>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::Path;

use samm_model::LoaderConfig;

pub mod fixtures;
pub mod report;
pub mod validators;

pub use fixtures::{Fixture, FixtureError};
pub use report::{ConformanceReport, Severity, Summary, TestResult};

/// Runs all validators over the fixtures below `fixtures_dir`.
///
/// Validators run in this order:
/// 1. Turtle well-formedness
/// 2. Round trip through Turtle
/// 3. Round trip through N-Triples
///
/// # Errors
///
/// Returns an error if the fixture directory is missing or empty, a fixture
/// cannot be read, or `config` names an unsupported SAMM version. Fixture
/// level problems are reported as results, not errors.
pub fn run_all(fixtures_dir: &Path, config: &LoaderConfig) -> anyhow::Result<ConformanceReport> {
    let fixtures = fixtures::discover(fixtures_dir)?;
    tracing::info!(count = fixtures.len(), dir = %fixtures_dir.display(), "fixtures_discovered");

    let mut report = ConformanceReport::new();
    report.extend(validators::turtle::validate(&fixtures, config)?);
    report.extend(validators::round_trip::validate(&fixtures, config)?);

    let summary = report.summary();
    tracing::info!(
        passed = summary.passed,
        warned = summary.warned,
        failed = summary.failed,
        "conformance_finished"
    );
    Ok(report)
}
