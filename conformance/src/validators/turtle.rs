//! Turtle 1.1 well-formedness of the input documents.
//!
//! Checks that each fixture:
//! - parses without errors
//! - uses the SAMM vocabulary version the run is configured for
//! - declares at least one `samm:Aspect`

use samm_model::store::TripleStore;
use samm_model::vocab::{iris, Samm, SammVersion};
use samm_model::LoaderConfig;

use crate::fixtures::Fixture;
use crate::report::{ConformanceReport, TestResult};

const VALIDATOR: &str = "turtle";

/// Validates every fixture.
///
/// # Errors
///
/// Returns an error if `config` names an unsupported SAMM version.
pub fn validate(fixtures: &[Fixture], config: &LoaderConfig) -> anyhow::Result<ConformanceReport> {
    let samm = config.vocabulary()?;
    let mut report = ConformanceReport::new();
    for fixture in fixtures {
        report.push(check(fixture, &samm));
    }
    Ok(report)
}

fn check(fixture: &Fixture, samm: &Samm) -> TestResult {
    let store = match TripleStore::from_turtle(&fixture.source) {
        Ok(store) => store,
        Err(e) => {
            return TestResult::fail(VALIDATOR, &fixture.name, "does not parse")
                .with_details(vec![e.to_string()]);
        }
    };
    if store.is_empty() {
        return TestResult::fail(VALIDATOR, &fixture.name, "contains no triples");
    }

    let used = versions_used(&store);
    if !used.contains(&samm.version()) {
        let found: Vec<String> = used.iter().map(|v| v.as_str().to_owned()).collect();
        return TestResult::warn(
            VALIDATOR,
            &fixture.name,
            format!("does not use SAMM {}", samm.version().as_str()),
        )
        .with_details(found);
    }

    let aspects = store.subjects_of_type(&samm.meta("Aspect"));
    if aspects.is_empty() {
        return TestResult::warn(VALIDATOR, &fixture.name, "declares no samm:Aspect");
    }

    TestResult::pass(
        VALIDATOR,
        &fixture.name,
        format!("{} triples, {} aspect(s)", store.len(), aspects.len()),
    )
}

/// Vocabulary versions whose meta-model namespace appears in a predicate or
/// in an `rdf:type` object.
fn versions_used(store: &TripleStore) -> Vec<SammVersion> {
    SammVersion::ALL
        .into_iter()
        .filter(|&version| {
            let samm = Samm::new(version);
            let ns = samm.meta_ns();
            store.quads().any(|q| {
                q.predicate.starts_with(ns)
                    || (q.predicate == iris::RDF_TYPE
                        && q.object.as_iri().is_some_and(|o| o.starts_with(ns)))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::report::Severity;

    fn fixture(source: &str) -> Fixture {
        Fixture {
            name: "inline".to_owned(),
            path: PathBuf::from("inline.ttl"),
            source: source.to_owned(),
        }
    }

    #[test]
    fn broken_turtle_fails() {
        let result = check(&fixture("<urn:a> <urn:b> ."), &Samm::default());
        assert_eq!(result.severity, Severity::Failure);
        assert_eq!(result.details.len(), 1);
    }

    #[test]
    fn other_version_warns() {
        let source = "@prefix samm: <urn:samm:org.eclipse.esmf.samm:meta-model:2.0.0#> .\n\
                      <urn:x:1.0.0#A> a samm:Aspect .";
        let result = check(&fixture(source), &Samm::default());
        assert_eq!(result.severity, Severity::Warning);
        assert_eq!(result.details, ["2.0.0"]);
    }

    #[test]
    fn aspect_document_passes() {
        let source = "@prefix samm: <urn:samm:org.eclipse.esmf.samm:meta-model:2.1.0#> .\n\
                      <urn:x:1.0.0#A> a samm:Aspect ; samm:properties () .";
        let result = check(&fixture(source), &Samm::default());
        assert_eq!(result.severity, Severity::Pass, "{result:?}");
    }
}
