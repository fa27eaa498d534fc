//! Domain graph → triples.
//!
//! The output re-parses into an equivalent graph: property, operation, event
//! and value lists become `rdf:first`/`rdf:rest` chains in their current
//! order, non-default payload overrides become
//! `[ samm:property :p ; samm:optional true ]` nodes, and anonymous elements
//! are emitted as blank nodes at the point of reference. Predefined elements
//! are referenced by IRI and never defined.

use std::collections::{HashMap, HashSet};

use crate::config::LoaderConfig;
use crate::error::ModelError;
use crate::graph::{
    Characteristic, CharacteristicKind, ConstraintKind, Element, ElementId, ElementKind, ModelGraph,
    PayloadOverride, StructuredElement, Value,
};
use crate::store::{Literal, Term, TripleStore};
use crate::vocab::{iris, Samm};

use super::PrefixTable;

/// Walks a graph and collects its triples.
pub struct RdfSerializer<'g> {
    graph: &'g ModelGraph,
    samm: &'g Samm,
    store: TripleStore,
    defined: HashSet<ElementId>,
    blanks: HashMap<ElementId, Term>,
    next_blank: usize,
}

impl<'g> RdfSerializer<'g> {
    /// A serializer writing `samm` vocabulary terms for `graph`.
    #[must_use]
    pub fn new(graph: &'g ModelGraph, samm: &'g Samm) -> Self {
        Self {
            graph,
            samm,
            store: TripleStore::new(),
            defined: HashSet::new(),
            blanks: HashMap::new(),
            next_blank: 0,
        }
    }

    /// Emits the element at `id` (once) and everything it references, and
    /// returns the term other triples use to point at it.
    pub fn visit(&mut self, id: ElementId) -> Option<Term> {
        let graph = self.graph;
        let element = graph.element(id)?;
        if element.meta.anonymous {
            if let Some(term) = self.blanks.get(&id) {
                return Some(term.clone());
            }
            let term = self.fresh_blank();
            self.blanks.insert(id, term.clone());
            self.define(id, element, &term);
            return Some(term);
        }
        let term = Term::iri(element.urn());
        if !element.meta.predefined && self.defined.insert(id) {
            self.define(id, element, &term);
        }
        Some(term)
    }

    /// The collected triples.
    #[must_use]
    pub fn finish(self) -> TripleStore {
        self.store
    }

    fn fresh_blank(&mut self) -> Term {
        let term = Term::blank(format!("b{}", self.next_blank));
        self.next_blank += 1;
        term
    }

    fn add(&mut self, subject: &Term, predicate: impl Into<String>, object: Term) {
        self.store.add(subject.clone(), predicate, object);
    }

    fn add_opt(&mut self, subject: &Term, predicate: impl Into<String>, target: Option<ElementId>) {
        if let Some(object) = target.and_then(|id| self.visit(id)) {
            self.add(subject, predicate, object);
        }
    }

    fn define(&mut self, id: ElementId, element: &'g Element, subject: &Term) {
        let samm = self.samm;
        if let Some(type_iri) = self.type_iri(element) {
            self.add(subject, iris::RDF_TYPE, Term::iri(type_iri));
        }
        for (lang, text) in &element.meta.preferred_names {
            self.add(subject, samm.meta("preferredName"), Term::Literal(Literal::lang(text, lang)));
        }
        for (lang, text) in &element.meta.descriptions {
            self.add(subject, samm.meta("description"), Term::Literal(Literal::lang(text, lang)));
        }
        for see in &element.meta.see {
            self.add(subject, samm.meta("see"), Term::iri(see.as_str()));
        }

        match &element.kind {
            ElementKind::Aspect(aspect) => {
                let properties = self.structure_list(id, &aspect.structure.properties);
                self.add(subject, samm.meta("properties"), properties);
                let operations = self.element_list(&aspect.operations);
                self.add(subject, samm.meta("operations"), operations);
                if !aspect.events.is_empty() {
                    let events = self.element_list(&aspect.events);
                    self.add(subject, samm.meta("events"), events);
                }
            }
            ElementKind::Property(property) => {
                self.add_opt(subject, samm.meta("extends"), property.extends);
                self.add_opt(subject, samm.meta("characteristic"), property.characteristic);
                if let Some(example) = &property.example_value {
                    self.add(subject, samm.meta("exampleValue"), Term::Literal(example.to_literal()));
                }
            }
            ElementKind::Operation(operation) => {
                let input = self.element_list(&operation.input);
                self.add(subject, samm.meta("input"), input);
                self.add_opt(subject, samm.meta("output"), operation.output);
            }
            ElementKind::Event(event) => {
                let parameters = self.structure_list(id, &event.structure.properties);
                self.add(subject, samm.meta("parameters"), parameters);
            }
            ElementKind::Entity(entity) => {
                self.add_opt(subject, samm.meta("extends"), entity.extends);
                let properties = self.structure_list(id, &entity.structure.properties);
                self.add(subject, samm.meta("properties"), properties);
            }
            ElementKind::Characteristic(characteristic) => self.characteristic(subject, characteristic),
            ElementKind::Constraint(constraint) => self.constraint(subject, constraint),
            ElementKind::Unit(unit) => {
                let text = |s: &Option<String>| s.as_ref().map(|v| Term::Literal(Literal::string(v.as_str())));
                if let Some(symbol) = text(&unit.symbol) {
                    self.add(subject, samm.meta("symbol"), symbol);
                }
                if let Some(code) = text(&unit.code) {
                    self.add(subject, samm.meta("commonCode"), code);
                }
                if let Some(factor) = text(&unit.conversion_factor) {
                    self.add(subject, samm.meta("conversionFactor"), factor);
                }
                if let Some(numeric) = &unit.numeric_conversion_factor {
                    self.add(
                        subject,
                        samm.meta("numericConversionFactor"),
                        Term::Literal(Literal::typed(numeric.as_str(), iris::XSD_DOUBLE)),
                    );
                }
                self.add_opt(subject, samm.meta("referenceUnit"), unit.reference_unit);
                for &kind in &unit.quantity_kinds {
                    self.add_opt(subject, samm.meta("quantityKind"), Some(kind));
                }
            }
            ElementKind::QuantityKind(kind) => {
                if let Some(label) = &kind.label {
                    self.add(
                        subject,
                        format!("{}label", iris::RDFS),
                        Term::Literal(Literal::string(label.as_str())),
                    );
                }
            }
            ElementKind::Scalar(_) => {}
            ElementKind::EntityInstance(instance) => {
                self.add_opt(subject, iris::RDF_TYPE, instance.entity);
                for (property, values) in &instance.assertions {
                    let terms: Vec<Term> = values.iter().filter_map(|v| self.value(v)).collect();
                    if values.is_empty() || self.is_collection_property(property) {
                        let list = self.list(terms);
                        self.add(subject, property.as_str(), list);
                    } else {
                        for term in terms {
                            self.add(subject, property.as_str(), term);
                        }
                    }
                }
            }
        }
    }

    fn type_iri(&self, element: &Element) -> Option<String> {
        let samm = self.samm;
        match &element.kind {
            ElementKind::Aspect(_) => Some(samm.meta("Aspect")),
            ElementKind::Property(p) if element.meta.anonymous && p.extends.is_some() => None,
            ElementKind::Property(p) if p.is_abstract => Some(samm.meta("AbstractProperty")),
            ElementKind::Property(_) => Some(samm.meta("Property")),
            ElementKind::Operation(_) => Some(samm.meta("Operation")),
            ElementKind::Event(_) => Some(samm.meta("Event")),
            ElementKind::Entity(e) if e.is_abstract => Some(samm.meta("AbstractEntity")),
            ElementKind::Entity(_) => Some(samm.meta("Entity")),
            ElementKind::Characteristic(c) => Some(match c.kind {
                CharacteristicKind::Plain => samm.meta("Characteristic"),
                ref kind => samm.characteristic(kind.type_name()),
            }),
            ElementKind::Constraint(ConstraintKind::Plain) => Some(samm.meta("Constraint")),
            ElementKind::Constraint(c) => Some(samm.characteristic(c.type_name())),
            ElementKind::Unit(_) => Some(samm.meta("Unit")),
            ElementKind::QuantityKind(_) => Some(samm.meta("QuantityKind")),
            ElementKind::Scalar(_) | ElementKind::EntityInstance(_) => None,
        }
    }

    fn characteristic(&mut self, subject: &Term, characteristic: &Characteristic) {
        let samm = self.samm;
        self.add_opt(subject, samm.meta("dataType"), characteristic.data_type);
        match &characteristic.kind {
            CharacteristicKind::Trait { base, constraints } => {
                self.add_opt(subject, samm.characteristic("baseCharacteristic"), *base);
                for &constraint in constraints {
                    self.add_opt(subject, samm.characteristic("constraint"), Some(constraint));
                }
            }
            CharacteristicKind::Quantity { unit, .. } => {
                self.add_opt(subject, samm.characteristic("unit"), *unit);
            }
            CharacteristicKind::Enumeration { values } => {
                let list = self.value_list(values);
                self.add(subject, samm.characteristic("values"), list);
            }
            CharacteristicKind::State {
                values,
                default_value,
            } => {
                let list = self.value_list(values);
                self.add(subject, samm.characteristic("values"), list);
                if let Some(default) = default_value.as_ref().and_then(|v| self.value(v)) {
                    self.add(subject, samm.characteristic("defaultValue"), default);
                }
            }
            CharacteristicKind::Collection {
                element_characteristic,
                ..
            } => {
                self.add_opt(
                    subject,
                    samm.characteristic("elementCharacteristic"),
                    *element_characteristic,
                );
            }
            CharacteristicKind::Either { left, right } => {
                self.add_opt(subject, samm.characteristic("left"), *left);
                self.add_opt(subject, samm.characteristic("right"), *right);
            }
            CharacteristicKind::StructuredValue {
                deconstruction_rule,
                elements,
            } => {
                self.add(
                    subject,
                    samm.characteristic("deconstructionRule"),
                    Term::Literal(Literal::string(deconstruction_rule.as_str())),
                );
                let items = elements
                    .iter()
                    .filter_map(|element| match element {
                        StructuredElement::Text(text) => Some(Term::Literal(Literal::string(text.as_str()))),
                        StructuredElement::Property(id) => self.visit(*id),
                    })
                    .collect();
                let list = self.list(items);
                self.add(subject, samm.characteristic("elements"), list);
            }
            CharacteristicKind::Plain | CharacteristicKind::Code | CharacteristicKind::SingleEntity => {}
        }
    }

    fn constraint(&mut self, subject: &Term, constraint: &ConstraintKind) {
        let samm = self.samm;
        let unsigned = |n: u64| Term::Literal(Literal::typed(n.to_string(), iris::XSD_NON_NEGATIVE_INTEGER));
        match constraint {
            ConstraintKind::Plain => {}
            ConstraintKind::Length { min, max } => {
                if let Some(min) = min {
                    self.add(subject, samm.characteristic("minValue"), unsigned(*min));
                }
                if let Some(max) = max {
                    self.add(subject, samm.characteristic("maxValue"), unsigned(*max));
                }
            }
            ConstraintKind::Range {
                min,
                max,
                lower_bound,
                upper_bound,
            } => {
                if let Some(min) = min {
                    self.add(subject, samm.characteristic("minValue"), Term::Literal(min.to_literal()));
                }
                if let Some(max) = max {
                    self.add(subject, samm.characteristic("maxValue"), Term::Literal(max.to_literal()));
                }
                if let Some(bound) = lower_bound.local_name() {
                    self.add(
                        subject,
                        samm.characteristic("lowerBoundDefinition"),
                        Term::iri(samm.characteristic(bound)),
                    );
                }
                if let Some(bound) = upper_bound.local_name() {
                    self.add(
                        subject,
                        samm.characteristic("upperBoundDefinition"),
                        Term::iri(samm.characteristic(bound)),
                    );
                }
            }
            ConstraintKind::Encoding { value } => {
                if !value.is_empty() {
                    self.add(subject, samm.meta("value"), Term::iri(value.as_str()));
                }
            }
            ConstraintKind::Language { language_code } => {
                self.add(
                    subject,
                    samm.characteristic("languageCode"),
                    Term::Literal(Literal::string(language_code.as_str())),
                );
            }
            ConstraintKind::Locale { locale_code } => {
                self.add(
                    subject,
                    samm.characteristic("localeCode"),
                    Term::Literal(Literal::string(locale_code.as_str())),
                );
            }
            ConstraintKind::RegularExpression { pattern } => {
                self.add(subject, samm.meta("value"), Term::Literal(Literal::string(pattern.as_str())));
            }
            ConstraintKind::FixedPoint { scale, integer } => {
                let positive = |n: u64| Term::Literal(Literal::typed(n.to_string(), iris::XSD_POSITIVE_INTEGER));
                self.add(subject, samm.characteristic("scale"), positive(*scale));
                self.add(subject, samm.characteristic("integer"), positive(*integer));
            }
        }
    }

    /// Property list of a structure element. A default payload keeps the
    /// plain IRI; anything else wraps it in a `samm:property` node.
    fn structure_list(&mut self, owner: ElementId, properties: &[ElementId]) -> Term {
        let graph = self.graph;
        let samm = self.samm;
        let mut items = Vec::with_capacity(properties.len());
        for &property in properties {
            let Some(element) = graph.element(property) else {
                continue;
            };
            let Some(term) = self.visit(property) else {
                continue;
            };
            let payload = graph.payload_of(owner, property).cloned().unwrap_or_default();
            if element.meta.anonymous {
                self.payload_fields(&term, &payload);
                items.push(term);
            } else if payload.is_default() {
                items.push(term);
            } else {
                let node = self.fresh_blank();
                self.add(&node, samm.meta("property"), term);
                self.payload_fields(&node, &payload);
                items.push(node);
            }
        }
        self.list(items)
    }

    fn payload_fields(&mut self, node: &Term, payload: &PayloadOverride) {
        let samm = self.samm;
        if payload.optional {
            self.add(node, samm.meta("optional"), Term::Literal(Literal::boolean(true)));
        }
        if payload.not_in_payload {
            self.add(node, samm.meta("notInPayload"), Term::Literal(Literal::boolean(true)));
        }
        if let Some(name) = &payload.payload_name {
            self.add(node, samm.meta("payloadName"), Term::Literal(Literal::string(name.as_str())));
        }
    }

    fn element_list(&mut self, ids: &[ElementId]) -> Term {
        let items = ids.iter().filter_map(|&id| self.visit(id)).collect();
        self.list(items)
    }

    fn value_list(&mut self, values: &[Value]) -> Term {
        let items = values.iter().filter_map(|v| self.value(v)).collect();
        self.list(items)
    }

    fn value(&mut self, value: &Value) -> Option<Term> {
        match value {
            Value::Scalar(scalar) => Some(Term::Literal(scalar.to_literal())),
            Value::Instance(id) => self.visit(*id),
        }
    }

    /// An RDF list of `items`, in order; `rdf:nil` when empty.
    fn list(&mut self, items: Vec<Term>) -> Term {
        let nil = Term::iri(iris::RDF_NIL);
        let cells: Vec<Term> = items.iter().map(|_| self.fresh_blank()).collect();
        for (index, item) in items.into_iter().enumerate() {
            let (Some(cell), rest) = (cells.get(index), cells.get(index + 1)) else {
                continue;
            };
            self.add(cell, iris::RDF_FIRST, item);
            self.add(cell, iris::RDF_REST, rest.cloned().unwrap_or_else(|| nil.clone()));
        }
        cells.first().cloned().unwrap_or(nil)
    }

    /// Whether instance values of `property_urn` form an RDF list: the
    /// property's characteristic (or a trait's base) is a collection.
    fn is_collection_property(&self, property_urn: &str) -> bool {
        let graph = self.graph;
        let characteristic = |id: ElementId| graph.element(id).and_then(Element::as_characteristic);
        let Some(mut current) = graph
            .element_by_urn(property_urn)
            .and_then(Element::as_property)
            .and_then(|p| p.characteristic)
            .and_then(characteristic)
        else {
            return false;
        };
        if let CharacteristicKind::Trait { base: Some(base), .. } = current.kind {
            match characteristic(base) {
                Some(inner) => current = inner,
                None => return false,
            }
        }
        matches!(current.kind, CharacteristicKind::Collection { .. })
    }
}

/// Triples for one aspect and everything it references, with the standard
/// prefixes, the aspect namespace as `:` and the configured extras.
///
/// # Errors
///
/// [`ModelError::UnsupportedVersion`] if the configured version is unknown.
pub fn serialize_aspect(
    graph: &ModelGraph,
    aspect: ElementId,
    config: &LoaderConfig,
) -> Result<TripleStore, ModelError> {
    let samm = config.vocabulary()?;
    let mut serializer = RdfSerializer::new(graph, &samm);
    serializer.visit(aspect);
    let mut store = serializer.finish();

    let mut prefixes = PrefixTable::standard(&samm);
    prefixes.add_model_namespaces(graph.namespace_of(aspect));
    prefixes.extend(&config.prefixes);
    prefixes.apply(&mut store);
    tracing::info!(aspect = graph.urn(aspect), triples = store.len(), "aspect_serialized");
    Ok(store)
}

/// Triples for every named, non-predefined element of `graph`, in
/// registration order.
///
/// # Errors
///
/// [`ModelError::UnsupportedVersion`] if the configured version is unknown.
pub fn serialize_graph(graph: &ModelGraph, config: &LoaderConfig) -> Result<TripleStore, ModelError> {
    let samm = config.vocabulary()?;
    let named: Vec<ElementId> = graph.filter(|e| !e.meta.anonymous && !e.meta.predefined);
    let mut serializer = RdfSerializer::new(graph, &samm);
    for &id in &named {
        serializer.visit(id);
    }
    let mut store = serializer.finish();

    let mut prefixes = PrefixTable::standard(&samm);
    prefixes.add_model_namespaces(named.iter().filter_map(|&id| graph.namespace_of(id)));
    prefixes.extend(&config.prefixes);
    prefixes.apply(&mut store);
    tracing::debug!(elements = named.len(), triples = store.len(), "graph_serialized");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Aspect, ElementMeta, Property, Structure};

    fn aspect_with(payload: PayloadOverride) -> (ModelGraph, ElementId) {
        let mut graph = ModelGraph::new();
        let property = graph.resolve_instance(Element::new(
            ElementMeta::named("urn:a:1.0.0#speed", "speed"),
            ElementKind::Property(Property::default()),
        ));
        let mut structure = Structure {
            properties: vec![property],
            ..Structure::default()
        };
        structure.set_payload("urn:a:1.0.0#speed", payload);
        let aspect = graph.resolve_instance(Element::new(
            ElementMeta::named("urn:a:1.0.0#Movement", "Movement"),
            ElementKind::Aspect(Aspect {
                structure,
                ..Aspect::default()
            }),
        ));
        (graph, aspect)
    }

    #[test]
    fn optional_property_is_wrapped() {
        let (graph, aspect) = aspect_with(PayloadOverride {
            optional: true,
            ..PayloadOverride::default()
        });
        let store = serialize_aspect(&graph, aspect, &LoaderConfig::default());
        let Ok(store) = store else {
            unreachable!("default config is valid");
        };
        let samm = Samm::default();
        let property = samm.meta("property");
        let speed = Term::iri("urn:a:1.0.0#speed");
        let wrappers: Vec<_> = store.subjects_with(&property, &speed).collect();
        assert_eq!(wrappers.len(), 1);
    }

    #[test]
    fn default_payload_is_a_plain_reference() {
        let (graph, aspect) = aspect_with(PayloadOverride::default());
        let Ok(store) = serialize_aspect(&graph, aspect, &LoaderConfig::default()) else {
            unreachable!("default config is valid");
        };
        let samm = Samm::default();
        let property = samm.meta("property");
        let speed = Term::iri("urn:a:1.0.0#speed");
        assert_eq!(store.subjects_with(&property, &speed).count(), 0);
        let list = store.object(&Term::iri("urn:a:1.0.0#Movement"), &samm.meta("properties"));
        let members = list.map(|l| store.resolve_list(l)).unwrap_or_default();
        assert_eq!(members, vec![Term::iri("urn:a:1.0.0#speed")]);
    }

    #[test]
    fn empty_lists_are_nil() {
        let (graph, aspect) = aspect_with(PayloadOverride::default());
        let Ok(store) = serialize_aspect(&graph, aspect, &LoaderConfig::default()) else {
            unreachable!("default config is valid");
        };
        let samm = Samm::default();
        let operations = store.object(&Term::iri("urn:a:1.0.0#Movement"), &samm.meta("operations"));
        assert!(operations.is_some_and(Term::is_nil));
    }
}
