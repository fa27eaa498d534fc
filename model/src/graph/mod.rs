//! The aspect model as an arena of cross-referenced elements.
//!
//! Elements live in one `Vec` and point at each other by [`ElementId`].
//! Parent edges are stored on every element; child edges are derived from the
//! kind-specific fields. Identity is decided by the [`InstanceCache`] owned
//! by the graph, never by comparing element contents.

pub mod compare;
mod element;
mod value;

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::cache::{InstanceCache, Registration};

pub use element::{
    Aspect, BoundDefinition, Characteristic, CharacteristicKind, CollectionKind, ConstraintKind,
    Element, ElementId, ElementKind, ElementMeta, Entity, EntityInstance, Event, Operation,
    PayloadOverride, Property, QuantityKind, QuantityKindOf, Scalar, Structure, StructuredElement,
    Unit,
};
pub use value::{LiteralValue, ScalarValue, Value};

/// A recoverable condition met while building or editing the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A reference could not be resolved to any known kind; the child is absent.
    UnresolvedReference {
        /// Key of the referenced node.
        subject: String,
        /// What the reference was for (e.g. `characteristic`).
        role: &'static str,
    },
    /// `add_element` hit an existing key without `overwrite`.
    CacheKeyCollision {
        /// The contested key.
        key: String,
    },
    /// `add_element` replaced an existing key.
    CacheOverwrite {
        /// The replaced key.
        key: String,
    },
    /// An `extends` chain leads back to its start; the edge was dropped.
    CycleDetected {
        /// The element whose `extends` closes the cycle.
        urn: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnresolvedReference { subject, role } => {
                write!(f, "unresolved {role} reference: {subject}")
            }
            Diagnostic::CacheKeyCollision { key } => write!(f, "cache key already registered: {key}"),
            Diagnostic::CacheOverwrite { key } => write!(f, "cache entry overwritten: {key}"),
            Diagnostic::CycleDetected { urn } => write!(f, "extends cycle through {urn}"),
        }
    }
}

/// Arena of elements plus the instance cache that indexes them.
#[derive(Debug, Clone, Default)]
pub struct ModelGraph {
    elements: Vec<Element>,
    cache: InstanceCache,
    diagnostics: Vec<Diagnostic>,
}

impl ModelGraph {
    /// An empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `element` without registering it in the cache.
    pub fn alloc(&mut self, element: Element) -> ElementId {
        let id = ElementId(u32::try_from(self.elements.len()).unwrap_or(u32::MAX));
        self.elements.push(element);
        id
    }

    /// Stores `element` and, unless it is anonymous, deduplicates it by URN:
    /// an already registered URN returns the cached element and the new one
    /// is discarded.
    pub fn resolve_instance(&mut self, element: Element) -> ElementId {
        if element.meta.anonymous {
            return self.alloc(element);
        }
        if let Some(existing) = self.cache.get(&element.meta.urn) {
            return existing;
        }
        let urn = element.meta.urn.clone();
        let id = self.alloc(element);
        self.cache.add_element(urn, id, false);
        id
    }

    /// Registers `id` under `urn`. Collisions without `overwrite` keep the
    /// existing entry; overwrites replace it. Both are recorded as
    /// diagnostics.
    pub fn add_element(&mut self, urn: &str, id: ElementId, overwrite: bool) -> Registration {
        let outcome = self.cache.add_element(urn, id, overwrite);
        match outcome {
            Registration::Kept(existing) if existing != id => {
                tracing::debug!(key = urn, "cache_key_collision");
                self.diagnostics.push(Diagnostic::CacheKeyCollision {
                    key: urn.to_owned(),
                });
            }
            Registration::Replaced(_) => {
                tracing::warn!(key = urn, "cache_overwrite");
                self.diagnostics.push(Diagnostic::CacheOverwrite {
                    key: urn.to_owned(),
                });
            }
            _ => {}
        }
        outcome
    }

    /// Looks up an element by cache key.
    #[must_use]
    pub fn get(&self, urn: &str) -> Option<ElementId> {
        self.cache.get(urn)
    }

    /// The element behind `urn`.
    #[must_use]
    pub fn element_by_urn(&self, urn: &str) -> Option<&Element> {
        self.get(urn).and_then(|id| self.element(id))
    }

    /// The element at `id`.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.index())
    }

    /// Mutable access to the element at `id`.
    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id.index())
    }

    /// URN of the element at `id`, empty if out of range.
    #[must_use]
    pub fn urn(&self, id: ElementId) -> &str {
        self.element(id).map_or("", Element::urn)
    }

    /// The cache, read-only.
    #[must_use]
    pub fn cache(&self) -> &InstanceCache {
        &self.cache
    }

    /// Every cache-resident element, each once, in registration order.
    #[must_use]
    pub fn all_elements(&self) -> Vec<ElementId> {
        self.cache.ids()
    }

    /// Cache-resident elements matching `predicate`.
    pub fn filter<F>(&self, mut predicate: F) -> Vec<ElementId>
    where
        F: FnMut(&Element) -> bool,
    {
        self.all_elements()
            .into_iter()
            .filter(|&id| self.element(id).is_some_and(&mut predicate))
            .collect()
    }

    /// First cache-resident element named `name`.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<ElementId> {
        self.all_elements()
            .into_iter()
            .find(|&id| self.element(id).is_some_and(|e| e.name() == name))
    }

    /// Recoverable conditions recorded so far.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Records a recoverable condition.
    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Adds `parent` to the parents of `child`.
    pub fn add_parent(&mut self, child: ElementId, parent: ElementId) {
        if child == parent {
            return;
        }
        if let Some(element) = self.element_mut(child) {
            element.meta.parents.insert(parent);
        }
    }

    /// Removes `parent` from the parents of `child`.
    pub fn remove_parent(&mut self, child: ElementId, parent: ElementId) {
        if let Some(element) = self.element_mut(child) {
            element.meta.parents.remove(&parent);
        }
    }

    /// Parents of `id`.
    #[must_use]
    pub fn parents(&self, id: ElementId) -> Vec<ElementId> {
        self.element(id)
            .map(|e| e.meta.parents.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Elements `id` references, in field order. Computed on every call.
    #[must_use]
    pub fn children(&self, id: ElementId) -> Vec<ElementId> {
        let Some(element) = self.element(id) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        match &element.kind {
            ElementKind::Aspect(a) => {
                out.extend(&a.structure.properties);
                out.extend(&a.operations);
                out.extend(&a.events);
            }
            ElementKind::Property(p) => {
                out.extend(p.extends);
                out.extend(p.characteristic);
            }
            ElementKind::Operation(o) => {
                out.extend(&o.input);
                out.extend(o.output);
            }
            ElementKind::Event(e) => out.extend(&e.structure.properties),
            ElementKind::Entity(e) => {
                out.extend(e.extends);
                out.extend(&e.structure.properties);
            }
            ElementKind::Characteristic(c) => {
                out.extend(c.data_type);
                characteristic_children(&c.kind, &mut out);
            }
            ElementKind::Unit(u) => {
                out.extend(u.reference_unit);
                out.extend(&u.quantity_kinds);
            }
            ElementKind::EntityInstance(i) => {
                out.extend(i.entity);
                out.extend(i.assertions.values().flatten().filter_map(Value::as_instance));
            }
            ElementKind::Constraint(_) | ElementKind::QuantityKind(_) | ElementKind::Scalar(_) => {}
        }
        out
    }

    /// Properties of a structure element including inherited ones: for an
    /// entity, every ancestor's properties come first, root ancestor first.
    /// Stops at the first repeated entity of a cyclic chain.
    #[must_use]
    pub fn all_properties(&self, id: ElementId) -> Vec<ElementId> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if !seen.insert(current) {
                break;
            }
            chain.push(current);
            cursor = self
                .element(current)
                .and_then(Element::as_entity)
                .and_then(|e| e.extends);
        }
        chain
            .iter()
            .rev()
            .filter_map(|&e| self.element(e).and_then(|el| el.kind.structure()))
            .flat_map(|s| s.properties.iter().copied())
            .collect()
    }

    /// Payload override of `property` as referenced from `owner`, if any.
    #[must_use]
    pub fn payload_of(&self, owner: ElementId, property: ElementId) -> Option<&PayloadOverride> {
        let urn = self.urn(property);
        self.element(owner)
            .and_then(|e| e.kind.structure())
            .and_then(|s| s.payload_of(urn))
    }

    /// Namespace of the element at `id`.
    #[must_use]
    pub fn namespace_of(&self, id: ElementId) -> Option<&str> {
        self.element(id).and_then(|e| e.meta.namespace())
    }

    /// Groups cache-resident elements by namespace (URN prefix before `#`),
    /// skipping elements without one.
    #[must_use]
    pub fn by_namespace(&self) -> BTreeMap<String, Vec<ElementId>> {
        let mut groups: BTreeMap<String, Vec<ElementId>> = BTreeMap::new();
        for id in self.all_elements() {
            let Some(element) = self.element(id) else {
                continue;
            };
            if let Some(ns) = element.meta.namespace() {
                groups.entry(ns.to_owned()).or_default().push(id);
            }
        }
        groups
    }

    /// Moves every element of namespace `old` to namespace `new`, rewriting
    /// cache keys and element URNs together. Elements whose new URN would
    /// clash with a different element stay where they are; their URNs are
    /// returned.
    pub fn rename_namespace(&mut self, old: &str, new: &str) -> Vec<String> {
        let conflicts = self.cache.update_elements_namespace(old, new);
        for element in &mut self.elements {
            if conflicts.contains(&element.meta.urn) {
                continue;
            }
            let renamed = match element.meta.urn.split_once('#') {
                Some((ns, local)) if ns == old => Some(format!("{new}#{local}")),
                _ => None,
            };
            if let Some(urn) = renamed {
                element.meta.urn = urn;
            }
        }
        self.rekey_property_maps(|urn| match urn.split_once('#') {
            Some((ns, local)) if ns == old && !conflicts.iter().any(|c| c == urn) => {
                Some(format!("{new}#{local}"))
            }
            _ => None,
        });
        if !conflicts.is_empty() {
            tracing::warn!(old, new, conflicts = conflicts.len(), "namespace_rename_conflicts");
        }
        conflicts
    }

    /// Renames one element, keeping the cache key in step.
    ///
    /// Returns false if `new_urn` already names another element.
    pub fn rename_element(&mut self, id: ElementId, new_urn: &str) -> bool {
        let old_urn = self.urn(id).to_owned();
        if !self.cache.update_element_key(&old_urn, new_urn) && self.cache.contains(&old_urn) {
            return false;
        }
        if let Some(element) = self.element_mut(id) {
            element.meta.urn = new_urn.to_owned();
            if let Some((_, local)) = new_urn.split_once('#') {
                element.meta.name = local.to_owned();
            }
            element.meta.synthetic_name = false;
        }
        self.rekey_property_maps(|urn| (urn == old_urn).then(|| new_urn.to_owned()));
        true
    }

    /// Rewrites the property URN keys of payload overrides and instance
    /// assertions. `rekey` returns the new key, or None to keep the old one.
    fn rekey_property_maps<F>(&mut self, rekey: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for element in &mut self.elements {
            if let Some(structure) = element.kind.structure_mut() {
                let payload = std::mem::take(&mut structure.payload);
                structure.payload = payload
                    .into_iter()
                    .map(|(urn, p)| (rekey(&urn).unwrap_or(urn), p))
                    .collect();
            }
            if let ElementKind::EntityInstance(instance) = &mut element.kind {
                let assertions = std::mem::take(&mut instance.assertions);
                instance.assertions = assertions
                    .into_iter()
                    .map(|(urn, v)| (rekey(&urn).unwrap_or(urn), v))
                    .collect();
            }
        }
    }

    /// Number of elements in the arena, including anonymous ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

fn characteristic_children(kind: &CharacteristicKind, out: &mut Vec<ElementId>) {
    match kind {
        CharacteristicKind::Trait { base, constraints } => {
            out.extend(*base);
            out.extend(constraints);
        }
        CharacteristicKind::Quantity { unit, .. } => out.extend(*unit),
        CharacteristicKind::Enumeration { values } => {
            out.extend(values.iter().filter_map(Value::as_instance));
        }
        CharacteristicKind::State {
            values,
            default_value,
        } => {
            out.extend(values.iter().filter_map(Value::as_instance));
            out.extend(default_value.as_ref().and_then(Value::as_instance));
        }
        CharacteristicKind::Collection {
            element_characteristic,
            ..
        } => out.extend(*element_characteristic),
        CharacteristicKind::Either { left, right } => {
            out.extend(*left);
            out.extend(*right);
        }
        CharacteristicKind::StructuredValue { elements, .. } => {
            out.extend(elements.iter().filter_map(|e| match e {
                StructuredElement::Property(p) => Some(*p),
                StructuredElement::Text(_) => None,
            }));
        }
        CharacteristicKind::Plain | CharacteristicKind::Code | CharacteristicKind::SingleEntity => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(urn: &str, kind: ElementKind) -> Element {
        let name = urn.rsplit('#').next().unwrap_or(urn);
        Element::new(ElementMeta::named(urn, name), kind)
    }

    fn entity(graph: &mut ModelGraph, urn: &str, props: &[&str], extends: Option<ElementId>) -> ElementId {
        let properties = props
            .iter()
            .map(|p| graph.resolve_instance(named(p, ElementKind::Property(Property::default()))))
            .collect();
        graph.resolve_instance(named(
            urn,
            ElementKind::Entity(Entity {
                structure: Structure {
                    properties,
                    ..Structure::default()
                },
                extends,
                ..Entity::default()
            }),
        ))
    }

    #[test]
    fn resolve_instance_is_idempotent_by_urn() {
        let mut graph = ModelGraph::new();
        let first = graph.resolve_instance(named("urn:a#P", ElementKind::Property(Property::default())));
        let second = graph.resolve_instance(named("urn:a#P", ElementKind::Property(Property::default())));
        assert_eq!(first, second);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn anonymous_elements_are_never_deduplicated() {
        let mut graph = ModelGraph::new();
        let mut element = named("urn:a#c1", ElementKind::Scalar(Scalar));
        element.meta.anonymous = true;
        let a = graph.resolve_instance(element.clone());
        let b = graph.resolve_instance(element);
        assert_ne!(a, b);
        assert!(graph.get("urn:a#c1").is_none());
    }

    #[test]
    fn collisions_are_recorded_not_fatal() {
        let mut graph = ModelGraph::new();
        let a = graph.alloc(named("urn:a#X", ElementKind::Scalar(Scalar)));
        let b = graph.alloc(named("urn:a#X", ElementKind::Scalar(Scalar)));
        graph.add_element("urn:a#X", a, false);
        graph.add_element("urn:a#X", b, false);
        assert_eq!(graph.get("urn:a#X"), Some(a));
        assert_eq!(
            graph.diagnostics(),
            &[Diagnostic::CacheKeyCollision {
                key: "urn:a#X".into()
            }]
        );
    }

    #[test]
    fn all_properties_lists_ancestors_first() {
        let mut graph = ModelGraph::new();
        let a = entity(&mut graph, "urn:a#A", &["urn:a#p1", "urn:a#p2"], None);
        let b = entity(&mut graph, "urn:a#B", &["urn:a#p3"], Some(a));
        let urns: Vec<_> = graph
            .all_properties(b)
            .into_iter()
            .map(|p| graph.urn(p).to_owned())
            .collect();
        assert_eq!(urns, ["urn:a#p1", "urn:a#p2", "urn:a#p3"]);
    }

    #[test]
    fn all_properties_survives_cycles() {
        let mut graph = ModelGraph::new();
        let a = entity(&mut graph, "urn:a#A", &["urn:a#p1"], None);
        let b = entity(&mut graph, "urn:a#B", &["urn:a#p2"], Some(a));
        if let Some(ElementKind::Entity(e)) = graph.element_mut(a).map(|e| &mut e.kind) {
            e.extends = Some(b);
        }
        assert_eq!(graph.all_properties(b).len(), 2);
    }

    #[test]
    fn rename_namespace_moves_urns_and_keys() {
        let mut graph = ModelGraph::new();
        let a = entity(&mut graph, "urn:old#A", &["urn:old#p"], None);
        let conflicts = graph.rename_namespace("urn:old", "urn:new");
        assert!(conflicts.is_empty());
        assert_eq!(graph.urn(a), "urn:new#A");
        assert_eq!(graph.get("urn:new#A"), Some(a));
        assert!(graph.get("urn:new#p").is_some());
        assert_eq!(graph.by_namespace().keys().collect::<Vec<_>>(), ["urn:new"]);
    }

    #[test]
    fn children_follow_field_order() {
        let mut graph = ModelGraph::new();
        let a = entity(&mut graph, "urn:a#A", &["urn:a#p1"], None);
        let b = entity(&mut graph, "urn:a#B", &["urn:a#p2"], Some(a));
        let children: Vec<_> = graph
            .children(b)
            .into_iter()
            .map(|c| graph.urn(c).to_owned())
            .collect();
        assert_eq!(children, ["urn:a#A", "urn:a#p2"]);
    }
}
