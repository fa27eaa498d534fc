use std::path::{Path, PathBuf};

use samm_conformance::{run_all, FixtureError, Severity};
use samm_model::LoaderConfig;

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../model/tests/fixtures")
}

#[test]
fn model_fixtures_conform() {
    let report = run_all(&fixtures_dir(), &LoaderConfig::seeded(11)).expect("fixtures run");
    let failures: Vec<_> = report.results.iter().filter(|r| r.is_failure()).collect();
    assert!(failures.is_empty(), "conformance failures: {failures:#?}");

    // one well-formedness result and two round trips per fixture
    let fixtures = samm_conformance::fixtures::discover(&fixtures_dir()).expect("fixtures found");
    assert_eq!(report.results.len(), fixtures.len() * 3);
    assert!(report.summary().passed >= fixtures.len());
}

#[test]
fn cycle_fixture_warns_but_passes() {
    let report = run_all(&fixtures_dir(), &LoaderConfig::seeded(11)).expect("fixtures run");
    let severities: Vec<Severity> = report
        .for_fixture("extends_cycle")
        .filter(|r| r.validator.starts_with("round-trip"))
        .map(|r| r.severity)
        .collect();
    assert_eq!(severities, [Severity::Warning, Severity::Warning]);
}

#[test]
fn missing_directory_is_an_error() {
    let err = run_all(Path::new("does/not/exist"), &LoaderConfig::default()).expect_err("no fixtures");
    assert!(matches!(
        err.downcast_ref::<FixtureError>(),
        Some(FixtureError::MissingDirectory(_))
    ));
}
