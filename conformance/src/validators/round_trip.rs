//! Load → serialize → write → re-parse → reload.
//!
//! The re-parsed document must hold exactly the serializer's triples. A
//! fixture passes when the reloaded graph has a structurally equal
//! counterpart for every named element of the first load. Recoverable load
//! diagnostics turn a pass into a warning.

use std::collections::HashSet;

use samm_model::graph::compare::differences;
use samm_model::serializer::{ntriples::to_ntriples, serialize_aspect, turtle::to_turtle};
use samm_model::store::{Term, TripleStore};
use samm_model::{load_aspect, LoadedModel, LoaderConfig, ModelError};

use crate::fixtures::Fixture;
use crate::report::{ConformanceReport, TestResult};

/// Output syntax for the written document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    /// Prefixed Turtle with inline blank nodes and lists.
    Turtle,
    /// One triple per line.
    NTriples,
}

impl Syntax {
    fn validator(self) -> &'static str {
        match self {
            Syntax::Turtle => "round-trip/turtle",
            Syntax::NTriples => "round-trip/ntriples",
        }
    }

    fn write(self, store: &TripleStore) -> String {
        match self {
            Syntax::Turtle => to_turtle(store),
            Syntax::NTriples => to_ntriples(store),
        }
    }
}

/// Round-trips every fixture through both syntaxes.
///
/// # Errors
///
/// Returns an error if `config` names an unsupported SAMM version.
pub fn validate(fixtures: &[Fixture], config: &LoaderConfig) -> anyhow::Result<ConformanceReport> {
    config.version()?;
    let mut report = ConformanceReport::new();
    for fixture in fixtures {
        for syntax in [Syntax::Turtle, Syntax::NTriples] {
            let result = check(fixture, syntax, config);
            tracing::debug!(
                fixture = %fixture.name,
                validator = syntax.validator(),
                severity = result.severity.label(),
                "fixture_checked"
            );
            report.push(result);
        }
    }
    Ok(report)
}

/// Runs one fixture through one syntax.
#[must_use]
pub fn check(fixture: &Fixture, syntax: Syntax, config: &LoaderConfig) -> TestResult {
    let validator = syntax.validator();
    let first = match load(&fixture.source, config) {
        Ok(model) => model,
        Err(e) => {
            return TestResult::fail(validator, &fixture.name, "fixture does not load")
                .with_details(vec![e.to_string()]);
        }
    };

    let serialized = match serialize_aspect(&first.graph, first.aspect, config) {
        Ok(store) => store,
        Err(e) => {
            return TestResult::fail(validator, &fixture.name, "serialization failed")
                .with_details(vec![e.to_string()]);
        }
    };
    let written = syntax.write(&serialized);

    // N-Triples is a subset of Turtle, so one reader covers both.
    let reparsed = match TripleStore::from_turtle(&written) {
        Ok(store) => store,
        Err(e) => {
            return TestResult::fail(validator, &fixture.name, "written document does not parse")
                .with_details(vec![e.to_string()]);
        }
    };
    let mismatches = written_mismatches(&serialized, &reparsed);
    if !mismatches.is_empty() {
        return TestResult::fail(validator, &fixture.name, "written document changes the triples")
            .with_details(mismatches);
    }

    let second = match load_aspect(&reparsed, config, None) {
        Ok(model) => model,
        Err(e) => {
            return TestResult::fail(validator, &fixture.name, "written document does not reload")
                .with_details(vec![e.to_string()]);
        }
    };

    let diff = differences(&first.graph, &second.graph);
    if !diff.is_empty() {
        return TestResult::fail(
            validator,
            &fixture.name,
            format!("{} element(s) differ after reload", diff.len()),
        )
        .with_details(diff);
    }

    let diagnostics: Vec<String> = first.graph.diagnostics().iter().map(ToString::to_string).collect();
    if !diagnostics.is_empty() {
        return TestResult::warn(validator, &fixture.name, "round trip holds with load diagnostics")
            .with_details(diagnostics);
    }

    TestResult::pass(
        validator,
        &fixture.name,
        format!("{} elements, {} bytes written", first.graph.len(), written.len()),
    )
}

/// Compares the serializer's store with the written document read back.
///
/// The triple count must match, and every blank subject of the written
/// document must be referenced by some triple. Blank labels are not
/// compared, since the writer is free to inline or relabel them.
#[must_use]
pub fn written_mismatches(serialized: &TripleStore, reparsed: &TripleStore) -> Vec<String> {
    let mut mismatches = Vec::new();
    if serialized.len() != reparsed.len() {
        mismatches.push(format!(
            "serializer produced {} triples, written document holds {}",
            serialized.len(),
            reparsed.len()
        ));
    }
    let referenced: HashSet<&Term> = reparsed.quads().map(|q| &q.object).collect();
    mismatches.extend(
        reparsed
            .subjects()
            .filter(|s| s.is_blank() && !referenced.contains(s))
            .map(|s| format!("unreferenced blank subject {}", s.cache_key())),
    );
    mismatches
}

fn load(source: &str, config: &LoaderConfig) -> Result<LoadedModel, ModelError> {
    let store = TripleStore::from_turtle(source)?;
    load_aspect(&store, config, None)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::report::Severity;

    const ASPECT: &str = "\
@prefix samm: <urn:samm:org.eclipse.esmf.samm:meta-model:2.1.0#> .
@prefix samm-c: <urn:samm:org.eclipse.esmf.samm:characteristic:2.1.0#> .
@prefix : <urn:samm:org.example:1.0.0#> .

:Movement a samm:Aspect ;
  samm:properties ( :speed [ samm:property :label ; samm:optional true ] ) ;
  samm:operations ( ) .

:speed a samm:Property ;
  samm:characteristic samm-c:Boolean .

:label a samm:Property ;
  samm:characteristic samm-c:Text .
";

    fn fixture(source: &str) -> Fixture {
        Fixture {
            name: "inline".to_owned(),
            path: PathBuf::from("inline.ttl"),
            source: source.to_owned(),
        }
    }

    #[test]
    fn aspect_round_trips_in_both_syntaxes() {
        let config = LoaderConfig::seeded(5);
        for syntax in [Syntax::Turtle, Syntax::NTriples] {
            let result = check(&fixture(ASPECT), syntax, &config);
            assert_eq!(result.severity, Severity::Pass, "{result:?}");
        }
    }

    #[test]
    fn written_document_must_hold_the_serialized_triples() {
        let serialized = TripleStore::from_turtle(
            "<urn:x#s> <urn:x#p> [ <urn:x#q> \"v\" ] .",
        )
        .expect("parses");
        let faithful = TripleStore::from_turtle(&to_turtle(&serialized)).expect("parses");
        assert!(written_mismatches(&serialized, &faithful).is_empty());

        let duplicated = TripleStore::from_turtle(
            "<urn:x#s> <urn:x#p> [ <urn:x#q> \"v\" ] .\n_:w <urn:x#q> \"v\" .",
        )
        .expect("parses");
        let mismatches = written_mismatches(&serialized, &duplicated);
        assert_eq!(mismatches.len(), 2, "{mismatches:?}");
        assert!(mismatches[0].contains("produced 2 triples"));
        assert!(mismatches[1].starts_with("unreferenced blank subject"));
    }

    #[test]
    fn document_without_aspect_fails() {
        let source = "@prefix samm: <urn:samm:org.eclipse.esmf.samm:meta-model:2.1.0#> .\n\
                      <urn:x:1.0.0#p> a samm:Property .";
        let result = check(&fixture(source), Syntax::Turtle, &LoaderConfig::seeded(5));
        assert_eq!(result.severity, Severity::Failure);
        assert_eq!(result.message, "fixture does not load");
    }

    #[test]
    fn unresolved_characteristic_warns() {
        let source = ASPECT.replace("samm-c:Boolean", ":Missing");
        let result = check(&fixture(&source), Syntax::Turtle, &LoaderConfig::seeded(5));
        assert_eq!(result.severity, Severity::Warning, "{result:?}");
        assert_eq!(result.details.len(), 1);
    }
}
