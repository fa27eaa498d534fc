//! Property-based checks for ordering and identity.

use proptest::prelude::*;
use samm_model::graph::{Element, ElementKind, ElementMeta, Entity};
use samm_model::serializer::serialize_aspect;
use samm_model::store::{Term, TripleStore};
use samm_model::vocab::{iris, Samm};
use samm_model::{load_aspect, LoaderConfig, ModelGraph};

const NS: &str = "urn:samm:org.example:1.0.0#";

fn permutation() -> impl Strategy<Value = Vec<usize>> {
    (1usize..12).prop_flat_map(|n| Just((0..n).collect::<Vec<_>>()).prop_shuffle())
}

/// An aspect whose `samm:properties` list names `p{i}` in the given order.
fn aspect_store(order: &[usize]) -> TripleStore {
    let samm = Samm::default();
    let mut store = TripleStore::new();
    let aspect = Term::iri(format!("{NS}Ordered"));
    store.add(aspect.clone(), iris::RDF_TYPE, Term::iri(samm.meta("Aspect")));
    store.add(aspect.clone(), samm.meta("operations"), Term::iri(iris::RDF_NIL));

    let mut head = Term::iri(iris::RDF_NIL);
    for (cell, i) in order.iter().enumerate().rev() {
        let property = Term::iri(format!("{NS}p{i}"));
        store.add(property.clone(), iris::RDF_TYPE, Term::iri(samm.meta("Property")));
        store.add(
            property.clone(),
            samm.meta("characteristic"),
            Term::iri(samm.characteristic("Text")),
        );
        let node = Term::blank(format!("cell{cell}"));
        store.add(node.clone(), iris::RDF_FIRST, property);
        store.add(node.clone(), iris::RDF_REST, head);
        head = node;
    }
    store.add(aspect, samm.meta("properties"), head);
    store
}

fn property_names(store: &TripleStore, seed: u64) -> Vec<String> {
    let model = load_aspect(store, &LoaderConfig::seeded(seed), None).expect("aspect loads");
    let names: Vec<String> = model
        .aspect()
        .map(|a| {
            a.structure
                .properties
                .iter()
                .map(|&id| model.graph.urn(id).to_owned())
                .collect()
        })
        .unwrap_or_default();
    names
}

fn expected(order: &[usize]) -> Vec<String> {
    order.iter().map(|i| format!("{NS}p{i}")).collect()
}

proptest! {
    #[test]
    fn property_order_survives_load(order in permutation()) {
        let store = aspect_store(&order);
        prop_assert_eq!(property_names(&store, 1), expected(&order));
    }

    #[test]
    fn property_order_survives_serialization(order in permutation()) {
        let config = LoaderConfig::seeded(1);
        let model = load_aspect(&aspect_store(&order), &config, None).expect("aspect loads");
        let written = serialize_aspect(&model.graph, model.aspect, &config).expect("serializes");
        prop_assert_eq!(property_names(&written, 2), expected(&order));
    }

    #[test]
    fn first_registration_wins(first_abstract in any::<bool>(), second_abstract in any::<bool>()) {
        let mut graph = ModelGraph::new();
        let entity = |is_abstract| {
            Element::new(
                ElementMeta::named(format!("{NS}Shared"), "Shared"),
                ElementKind::Entity(Entity { is_abstract, ..Entity::default() }),
            )
        };
        let a = graph.resolve_instance(entity(first_abstract));
        let b = graph.resolve_instance(entity(second_abstract));
        prop_assert_eq!(a, b);
        prop_assert_eq!(graph.len(), 1);
        let kept = graph.element(a).and_then(Element::as_entity).map(|e| e.is_abstract);
        prop_assert_eq!(kept, Some(first_abstract));
    }

    #[test]
    fn anonymous_elements_are_never_merged(count in 1usize..8) {
        let mut graph = ModelGraph::new();
        let ids: Vec<_> = (0..count)
            .map(|_| {
                let mut meta = ElementMeta::named(format!("{NS}Anon"), "Anon");
                meta.anonymous = true;
                graph.resolve_instance(Element::new(meta, ElementKind::Entity(Entity::default())))
            })
            .collect();
        let mut unique = ids.clone();
        unique.dedup();
        prop_assert_eq!(unique.len(), count);
        prop_assert_eq!(graph.len(), count);
        prop_assert_eq!(graph.get(&format!("{NS}Anon")), None);
    }
}
