//! Characteristic dispatch.

use crate::graph::{
    Characteristic, CharacteristicKind, CollectionKind, ElementId, ElementKind, QuantityKindOf,
    StructuredElement,
};
use crate::store::Term;
use crate::vocab::PredefinedCharacteristic;

use super::{base, constraint, data_type, property, unit, value, LoadContext};

/// Characteristic kinds recognised by `rdf:type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum CharacteristicType {
    Trait,
    Quantity(QuantityKindOf),
    Enumeration,
    State,
    Collection(CollectionKind),
    Code,
    Either,
    SingleEntity,
    StructuredValue,
    Plain,
}

/// Characteristic-namespace types, most specific first. `State` precedes
/// `Enumeration` and every collection subtype precedes `Collection`, since
/// documents may assert the supertype alongside.
const PRIORITY: &[(&str, CharacteristicType)] = &[
    ("Trait", CharacteristicType::Trait),
    ("Measurement", CharacteristicType::Quantity(QuantityKindOf::Measurement)),
    ("Duration", CharacteristicType::Quantity(QuantityKindOf::Duration)),
    ("Quantifiable", CharacteristicType::Quantity(QuantityKindOf::Quantifiable)),
    ("State", CharacteristicType::State),
    ("Enumeration", CharacteristicType::Enumeration),
    ("TimeSeries", CharacteristicType::Collection(CollectionKind::TimeSeries)),
    ("SortedSet", CharacteristicType::Collection(CollectionKind::SortedSet)),
    ("Set", CharacteristicType::Collection(CollectionKind::Set)),
    ("List", CharacteristicType::Collection(CollectionKind::List)),
    ("Collection", CharacteristicType::Collection(CollectionKind::Collection)),
    ("Code", CharacteristicType::Code),
    ("Either", CharacteristicType::Either),
    ("SingleEntity", CharacteristicType::SingleEntity),
    ("StructuredValue", CharacteristicType::StructuredValue),
];

impl CharacteristicType {
    fn empty_kind(self) -> CharacteristicKind {
        match self {
            CharacteristicType::Trait => CharacteristicKind::Trait {
                base: None,
                constraints: Vec::new(),
            },
            CharacteristicType::Quantity(kind) => CharacteristicKind::Quantity { kind, unit: None },
            CharacteristicType::Enumeration => CharacteristicKind::Enumeration { values: Vec::new() },
            CharacteristicType::State => CharacteristicKind::State {
                values: Vec::new(),
                default_value: None,
            },
            CharacteristicType::Collection(kind) => CharacteristicKind::Collection {
                kind,
                element_characteristic: None,
            },
            CharacteristicType::Code => CharacteristicKind::Code,
            CharacteristicType::Either => CharacteristicKind::Either {
                left: None,
                right: None,
            },
            CharacteristicType::SingleEntity => CharacteristicKind::SingleEntity,
            CharacteristicType::StructuredValue => CharacteristicKind::StructuredValue {
                deconstruction_rule: String::new(),
                elements: Vec::new(),
            },
            CharacteristicType::Plain => CharacteristicKind::Plain,
        }
    }
}

/// First match of the node's types against [`PRIORITY`], falling back to a
/// plain `samm:Characteristic`.
pub(super) fn classify(ctx: &LoadContext<'_>, node: &Term) -> Option<CharacteristicType> {
    let samm = ctx.samm;
    let types = ctx.store.types_of(node);
    PRIORITY
        .iter()
        .find(|(local, _)| types.iter().any(|t| samm.is_characteristic(t, local)))
        .map(|&(_, kind)| kind)
        .or_else(|| {
            types
                .iter()
                .any(|t| samm.is_meta(t, "Characteristic"))
                .then_some(CharacteristicType::Plain)
        })
}

/// Builds the characteristic at `node`, or records it as unresolved.
pub(super) fn build(ctx: &mut LoadContext<'_>, node: &Term) -> Option<ElementId> {
    if let Some(id) = ctx.cached(node) {
        return Some(id);
    }
    if let Some(iri) = node.as_iri() {
        if let Some(predefined) = ctx.samm.predefined_characteristic(iri) {
            return Some(build_predefined(ctx, iri, predefined));
        }
    }
    let Some(kind) = classify(ctx, node) else {
        ctx.unresolved(node, "characteristic");
        return None;
    };
    let meta = base::extract(ctx, node, "characteristic");
    let id = ctx.reserve(
        node,
        meta,
        ElementKind::Characteristic(Characteristic::new(kind.empty_kind())),
    );
    let characteristic = fill(ctx, id, node, kind);
    ctx.finish(id, ElementKind::Characteristic(characteristic));
    Some(id)
}

fn build_predefined(ctx: &mut LoadContext<'_>, iri: &str, predefined: PredefinedCharacteristic) -> ElementId {
    let data_type_iri = predefined
        .data_type
        .map_or_else(|| ctx.samm.meta("curie"), str::to_owned);
    let data_type = data_type::scalar(ctx, &data_type_iri);
    let id = ctx.reserve(
        &Term::iri(iri),
        base::predefined(iri),
        ElementKind::Characteristic(Characteristic::new(CharacteristicKind::Plain)),
    );
    ctx.finish(
        id,
        ElementKind::Characteristic(Characteristic {
            data_type: Some(data_type),
            kind: CharacteristicKind::Plain,
        }),
    );
    id
}

fn fill(ctx: &mut LoadContext<'_>, id: ElementId, node: &Term, kind: CharacteristicType) -> Characteristic {
    let store = ctx.store;
    let samm = ctx.samm;
    let mut characteristic = Characteristic::new(kind.empty_kind());

    for quad in store.quads_for_subject(node) {
        let predicate = quad.predicate.as_str();
        let object = &quad.object;
        if samm.is_data_type(predicate) {
            characteristic.data_type = data_type::resolve(ctx, object);
            continue;
        }
        let Some(local) = samm.characteristic_local(predicate) else {
            continue;
        };
        match (&mut characteristic.kind, local) {
            (CharacteristicKind::Trait { base, .. }, "baseCharacteristic") => *base = build(ctx, object),
            (CharacteristicKind::Trait { constraints, .. }, "constraint") => {
                constraints.extend(constraint::build(ctx, object));
            }
            (CharacteristicKind::Quantity { unit, .. }, "unit") => *unit = unit::build_unit(ctx, object),
            (
                CharacteristicKind::Enumeration { values } | CharacteristicKind::State { values, .. },
                "values",
            ) => *values = value::resolve_values(ctx, object),
            (CharacteristicKind::State { default_value, .. }, "defaultValue") => {
                *default_value = value::resolve_value(ctx, object);
            }
            (
                CharacteristicKind::Collection {
                    element_characteristic,
                    ..
                },
                "elementCharacteristic",
            ) => *element_characteristic = build(ctx, object),
            (CharacteristicKind::Either { left, .. }, "left") => *left = build(ctx, object),
            (CharacteristicKind::Either { right, .. }, "right") => *right = build(ctx, object),
            (
                CharacteristicKind::StructuredValue {
                    deconstruction_rule, ..
                },
                "deconstructionRule",
            ) => *deconstruction_rule = base::text(object).unwrap_or_default(),
            (CharacteristicKind::StructuredValue { elements, .. }, "elements") => {
                *elements = structured_elements(ctx, object);
            }
            _ => {}
        }
    }
    tracing::trace!(urn = ctx.graph.urn(id), kind = characteristic.kind.type_name(), "characteristic_built");
    characteristic
}

fn structured_elements(ctx: &mut LoadContext<'_>, list: &Term) -> Vec<StructuredElement> {
    let store = ctx.store;
    store
        .resolve_list(list)
        .iter()
        .filter_map(|member| match member {
            Term::Literal(lit) => Some(StructuredElement::Text(lit.lexical.clone())),
            _ => property::build(ctx, member).map(StructuredElement::Property),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoaderConfig;
    use crate::store::TripleStore;
    use crate::vocab::{iris, Samm};

    fn typed(store: &mut TripleStore, node: &Term, types: &[String]) {
        for t in types {
            store.add(node.clone(), iris::RDF_TYPE, Term::iri(t.as_str()));
        }
    }

    #[test]
    fn most_specific_type_wins() {
        let samm = Samm::default();
        let mut store = TripleStore::new();
        let node = Term::iri("urn:x:1.0.0#Status");
        typed(
            &mut store,
            &node,
            &[samm.meta("Characteristic"), samm.characteristic("Enumeration"), samm.characteristic("State")],
        );
        let config = LoaderConfig::seeded(5);
        let ctx = LoadContext::new(&store, &samm, &config);
        assert_eq!(classify(&ctx, &node), Some(CharacteristicType::State));
    }

    #[test]
    fn plain_characteristic_is_the_fallback() {
        let samm = Samm::default();
        let mut store = TripleStore::new();
        let node = Term::iri("urn:x:1.0.0#Name");
        typed(&mut store, &node, &[samm.meta("Characteristic")]);
        let untyped = Term::iri("urn:x:1.0.0#Other");
        let config = LoaderConfig::seeded(5);
        let ctx = LoadContext::new(&store, &samm, &config);
        assert_eq!(classify(&ctx, &node), Some(CharacteristicType::Plain));
        assert_eq!(classify(&ctx, &untyped), None);
    }

    #[test]
    fn sorted_set_is_not_mistaken_for_set() {
        let samm = Samm::default();
        let mut store = TripleStore::new();
        let node = Term::iri("urn:x:1.0.0#Sorted");
        typed(&mut store, &node, &[samm.characteristic("Set"), samm.characteristic("SortedSet")]);
        let config = LoaderConfig::seeded(5);
        let ctx = LoadContext::new(&store, &samm, &config);
        assert_eq!(
            classify(&ctx, &node),
            Some(CharacteristicType::Collection(CollectionKind::SortedSet))
        );
    }

    #[test]
    fn predefined_text_has_string_data_type() {
        let samm = Samm::default();
        let store = TripleStore::new();
        let config = LoaderConfig::seeded(5);
        let mut ctx = LoadContext::new(&store, &samm, &config);
        let id = build(&mut ctx, &Term::iri(samm.characteristic("Text")));
        let characteristic = id.and_then(|id| ctx.graph.element(id));
        assert!(characteristic.is_some_and(|e| e.meta.predefined));
        let data_type = characteristic
            .and_then(|e| e.as_characteristic())
            .and_then(|c| c.data_type)
            .map(|dt| ctx.graph.urn(dt).to_owned());
        assert_eq!(data_type.as_deref(), Some(iris::XSD_STRING));
    }

    #[test]
    fn unit_reference_uses_curie() {
        let samm = Samm::default();
        let store = TripleStore::new();
        let config = LoaderConfig::seeded(5);
        let mut ctx = LoadContext::new(&store, &samm, &config);
        let id = build(&mut ctx, &Term::iri(samm.characteristic("UnitReference")));
        let data_type = id
            .and_then(|id| ctx.graph.element(id))
            .and_then(|e| e.as_characteristic())
            .and_then(|c| c.data_type)
            .map(|dt| ctx.graph.urn(dt).to_owned());
        assert_eq!(data_type, Some(samm.meta("curie")));
    }
}
