//! Load → serialize → reload must produce a structurally equivalent graph.

#![cfg(feature = "turtle")]

use samm_model::graph::compare::differences;
use samm_model::graph::{CharacteristicKind, CollectionKind, Element};
use samm_model::serializer::{ntriples::to_ntriples, serialize_aspect, serialize_graph, turtle::to_turtle};
use samm_model::store::TripleStore;
use samm_model::{load_aspect, load_namespaces, LoadedModel, LoaderConfig};

const FIXTURES: &[(&str, &str)] = &[
    ("aspect_with_property", include_str!("fixtures/aspect_with_property.ttl")),
    ("enumeration_integers", include_str!("fixtures/enumeration_integers.ttl")),
    (
        "enumeration_entity_instances",
        include_str!("fixtures/enumeration_entity_instances.ttl"),
    ),
    ("payload_override", include_str!("fixtures/payload_override.ttl")),
    ("entity_extends", include_str!("fixtures/entity_extends.ttl")),
    ("shared_blank_node", include_str!("fixtures/shared_blank_node.ttl")),
    ("extends_cycle", include_str!("fixtures/extends_cycle.ttl")),
    ("aspect_with_everything", include_str!("fixtures/aspect_with_everything.ttl")),
];

fn load(source: &str, seed: u64) -> LoadedModel {
    let store = TripleStore::from_turtle(source).expect("document parses");
    load_aspect(&store, &LoaderConfig::seeded(seed), None).expect("document loads")
}

fn assert_equivalent(name: &str, first: &LoadedModel, second: &LoadedModel, written: &str) {
    let diff = differences(&first.graph, &second.graph);
    assert!(diff.is_empty(), "{name}:\n{}\n--- written ---\n{written}", diff.join("\n"));
}

#[test]
fn every_fixture_round_trips_through_turtle() {
    let config = LoaderConfig::seeded(7);
    for (name, source) in FIXTURES {
        let first = load(source, 7);
        let triples = serialize_aspect(&first.graph, first.aspect, &config).expect("serializes");
        let written = to_turtle(&triples);
        let second = load(&written, 8);
        assert_equivalent(name, &first, &second, &written);
        assert_eq!(second.graph.urn(second.aspect), first.graph.urn(first.aspect));
    }
}

#[test]
fn every_fixture_round_trips_through_ntriples() {
    let config = LoaderConfig::seeded(7);
    for (name, source) in FIXTURES {
        let first = load(source, 7);
        let triples = serialize_aspect(&first.graph, first.aspect, &config).expect("serializes");
        let written = to_ntriples(&triples);
        let second = load(&written, 9);
        assert_equivalent(name, &first, &second, &written);
    }
}

#[test]
fn second_round_trip_is_stable() {
    let config = LoaderConfig::seeded(7);
    let source = include_str!("fixtures/aspect_with_everything.ttl");
    let first = load(source, 7);
    let once = to_turtle(&serialize_aspect(&first.graph, first.aspect, &config).expect("serializes"));
    let second = load(&once, 7);
    let twice = to_turtle(&serialize_aspect(&second.graph, second.aspect, &config).expect("serializes"));
    let third = load(&twice, 7);
    assert_equivalent("second pass", &second, &third, &twice);
}

#[test]
fn rich_fixture_loads_without_diagnostics() {
    let model = load(include_str!("fixtures/aspect_with_everything.ttl"), 7);
    assert!(model.graph.diagnostics().is_empty(), "{:?}", model.graph.diagnostics());
    let aspect = model.aspect().expect("aspect");
    assert_eq!(aspect.structure.properties.len(), 14);
    assert_eq!(aspect.operations.len(), 1);
    assert_eq!(aspect.events.len(), 1);
}

#[test]
fn collection_kinds_survive_reload() {
    const NS: &str = "urn:samm:org.eclipse.esmf.test:1.0.0#";
    fn collection_kind(model: &LoadedModel, local: &str) -> Option<CollectionKind> {
        let graph = &model.graph;
        let characteristic = graph
            .get(&format!("{NS}{local}"))
            .and_then(|id| graph.element(id))
            .and_then(Element::as_characteristic)?;
        match characteristic.kind {
            CharacteristicKind::Collection { kind, .. } => Some(kind),
            _ => None,
        }
    }

    let config = LoaderConfig::seeded(7);
    let first = load(include_str!("fixtures/aspect_with_everything.ttl"), 7);
    let written = to_turtle(&serialize_aspect(&first.graph, first.aspect, &config).expect("serializes"));
    let second = load(&written, 9);
    for (local, kind) in [
        ("Waypoints", CollectionKind::Collection),
        ("Checkpoints", CollectionKind::SortedSet),
        ("History", CollectionKind::TimeSeries),
    ] {
        assert_eq!(collection_kind(&first, local), Some(kind), "{local}");
        assert_eq!(collection_kind(&second, local), Some(kind), "{local} after reload");
    }
    let reading = second
        .graph
        .get(&format!("{NS}Reading"))
        .and_then(|id| second.graph.element(id))
        .and_then(Element::as_entity)
        .and_then(|e| e.extends)
        .expect("Reading extends");
    assert_eq!(
        second.graph.urn(reading),
        "urn:samm:org.eclipse.esmf.samm:entity:2.1.0#TimeSeriesEntity"
    );
}

#[test]
fn namespace_load_round_trips() {
    let config = LoaderConfig::seeded(7);
    let store = TripleStore::from_turtle(include_str!("fixtures/aspect_with_everything.ttl")).expect("parses");
    let index = load_namespaces(&store, &config).expect("loads");
    assert!(index
        .namespaces
        .contains_key("urn:samm:org.eclipse.esmf.test:1.0.0"));

    let written = to_turtle(&serialize_graph(&index.graph, &config).expect("serializes"));
    let reparsed = TripleStore::from_turtle(&written).expect("written Turtle parses");
    let again = load_namespaces(&reparsed, &LoaderConfig::seeded(8)).expect("reloads");
    let diff = differences(&index.graph, &again.graph);
    assert!(diff.is_empty(), "{}\n--- written ---\n{written}", diff.join("\n"));
}
