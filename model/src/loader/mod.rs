//! RDF → domain graph.
//!
//! Every builder follows the same protocol:
//!
//! 1. return the cached element if the node's key is already registered;
//! 2. classify the node's `rdf:type` against an explicit priority list,
//!    most specific first, and give up with an
//!    [`UnresolvedReference`](crate::graph::Diagnostic::UnresolvedReference)
//!    if nothing matches;
//! 3. extract the shared named-element attributes;
//! 4. reserve the element in the cache *before* walking any reference, so a
//!    second path to the same node (or a cycle back to it) finds it;
//! 5. walk the node's triples once, building referenced children;
//! 6. store the kind fields and record `parent` edges on every child.
//!
//! All state lives in [`LoadContext`], threaded through every call.

mod aspect;
mod base;
mod characteristic;
mod constraint;
mod data_type;
mod entity;
mod property;
mod structure;
mod unit;
mod value;

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::LoaderConfig;
use crate::error::ModelError;
use crate::graph::{Aspect, Diagnostic, Element, ElementId, ElementKind, ElementMeta, ModelGraph};
use crate::store::{Term, TripleStore};
use crate::vocab::Samm;

/// Upper bound (exclusive) of the numeric suffix of synthesized names.
const SYNTHETIC_SUFFIX_RANGE: u32 = 1_000_000;

/// State of one load pass.
pub(crate) struct LoadContext<'s> {
    pub(crate) store: &'s TripleStore,
    pub(crate) samm: &'s Samm,
    pub(crate) graph: ModelGraph,
    rng: StdRng,
    aspect_namespace: Option<String>,
    last_namespace: Option<String>,
    fallback_namespace: String,
    /// `extends` edges whose target is still being built, outermost first.
    pending_extends: Vec<(ElementId, Term)>,
}

impl<'s> LoadContext<'s> {
    pub(crate) fn new(store: &'s TripleStore, samm: &'s Samm, config: &LoaderConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            store,
            samm,
            graph: ModelGraph::new(),
            rng,
            aspect_namespace: None,
            last_namespace: None,
            fallback_namespace: config.fallback_namespace.clone(),
            pending_extends: Vec::new(),
        }
    }

    /// The cached element for `node`, by IRI or `_:label`.
    pub(crate) fn cached(&self, node: &Term) -> Option<ElementId> {
        self.graph.get(&node.cache_key())
    }

    /// Namespace for synthesized names: the aspect's, else that of the most
    /// recently reserved named element, else the configured fallback.
    pub(crate) fn namespace_hint(&self) -> &str {
        self.aspect_namespace
            .as_deref()
            .or(self.last_namespace.as_deref())
            .unwrap_or(&self.fallback_namespace)
    }

    /// A fresh `(urn, name)` pair `<ns>#<prefix>_<n>` not yet in the cache.
    pub(crate) fn synthesize(&mut self, prefix: &str) -> (String, String) {
        loop {
            let n = self.rng.random_range(0..SYNTHETIC_SUFFIX_RANGE);
            let name = format!("{prefix}_{n}");
            let urn = format!("{}#{name}", self.namespace_hint());
            if self.graph.get(&urn).is_none() {
                return (urn, name);
            }
        }
    }

    /// Stores a placeholder element for `node` and registers it: named nodes
    /// under their IRI, blank nodes under `_:label` and, when synthesized,
    /// under the generated URN as well.
    pub(crate) fn reserve(&mut self, node: &Term, meta: ElementMeta, kind: ElementKind) -> ElementId {
        let element = Element::new(meta, kind);
        if !node.is_blank() {
            if !element.meta.predefined {
                if let Some(ns) = element.meta.namespace() {
                    self.last_namespace = Some(ns.to_owned());
                }
            }
            return self.graph.resolve_instance(element);
        }
        let synthetic = element.meta.synthetic_name.then(|| element.meta.urn.clone());
        let id = self.graph.alloc(element);
        self.graph.add_element(&node.cache_key(), id, false);
        if let Some(urn) = synthetic {
            self.graph.add_element(&urn, id, false);
        }
        id
    }

    /// Replaces the placeholder kind of a reserved element.
    pub(crate) fn set_kind(&mut self, id: ElementId, kind: ElementKind) {
        if let Some(element) = self.graph.element_mut(id) {
            element.kind = kind;
        }
    }

    /// Stores the kind fields of a reserved element and records it as parent
    /// of every child those fields reference.
    pub(crate) fn finish(&mut self, id: ElementId, kind: ElementKind) {
        self.set_kind(id, kind);
        for child in self.graph.children(id) {
            self.graph.add_parent(child, id);
        }
    }

    /// Records a reference that matched no known kind.
    pub(crate) fn unresolved(&mut self, node: &Term, role: &'static str) {
        let subject = node.cache_key();
        tracing::warn!(subject = %subject, role, "unresolved_reference");
        self.graph
            .push_diagnostic(Diagnostic::UnresolvedReference { subject, role });
    }

    /// Builds the `extends` target of `from` with `build` and returns it,
    /// unless the edge `from → target` would close a cycle. Such an edge is
    /// dropped and recorded as [`Diagnostic::CycleDetected`] on `from`.
    ///
    /// Edges still being resolved further up the call stack count as part
    /// of the chain, so the edge dropped is always the innermost one and
    /// every element stays reachable from the outer ones.
    pub(crate) fn resolve_extends<F>(&mut self, from: ElementId, target: &Term, build: F) -> Option<ElementId>
    where
        F: FnOnce(&mut Self, &Term) -> Option<ElementId>,
    {
        self.pending_extends.push((from, target.clone()));
        let parent = build(self, target);
        self.pending_extends.pop();
        let parent = parent?;
        if self.closes_extends_cycle(from, parent) {
            let urn = self.graph.urn(from).to_owned();
            tracing::warn!(urn = %urn, target = self.graph.urn(parent), "extends_cycle");
            self.graph.push_diagnostic(Diagnostic::CycleDetected { urn });
            return None;
        }
        Some(parent)
    }

    /// Returns true if following `extends` from `target`, including pending
    /// edges, reaches `from`.
    fn closes_extends_cycle(&self, from: ElementId, target: ElementId) -> bool {
        let mut cursor = Some(target);
        let mut steps = 0usize;
        while let Some(current) = cursor {
            if current == from {
                return true;
            }
            steps += 1;
            if steps > self.graph.len() {
                break;
            }
            cursor = self
                .graph
                .element(current)
                .and_then(|e| match &e.kind {
                    ElementKind::Entity(entity) => entity.extends,
                    ElementKind::Property(property) => property.extends,
                    _ => None,
                })
                .or_else(|| {
                    self.pending_extends
                        .iter()
                        .find(|(pending, _)| *pending == current)
                        .and_then(|(_, node)| self.cached(node))
                });
        }
        false
    }
}

/// A graph loaded for one aspect.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    /// Every element reachable from the aspect.
    pub graph: ModelGraph,
    /// The aspect root.
    pub aspect: ElementId,
}

impl LoadedModel {
    /// The aspect root element.
    #[must_use]
    pub fn aspect_element(&self) -> Option<&Element> {
        self.graph.element(self.aspect)
    }

    /// The aspect root's fields.
    #[must_use]
    pub fn aspect(&self) -> Option<&Aspect> {
        self.aspect_element().and_then(Element::as_aspect)
    }
}

/// A whole-store load grouped by namespace.
#[derive(Debug, Clone)]
pub struct NamespaceIndex {
    /// Every element built by the sweep.
    pub graph: ModelGraph,
    /// Elements grouped by URN namespace, in registration order.
    pub namespaces: BTreeMap<String, Vec<ElementId>>,
}

/// Loads one aspect and everything it references.
///
/// With `aspect_urn` unset the store must declare exactly one aspect.
///
/// # Errors
///
/// - [`ModelError::UnsupportedVersion`] before anything is built, if the
///   configured version is unknown.
/// - [`ModelError::NoAspect`] if the store declares no aspect.
/// - [`ModelError::AmbiguousAspect`] if several exist and none was named.
/// - [`ModelError::AspectNotFound`] if the named aspect is not declared.
pub fn load_aspect(
    store: &TripleStore,
    config: &LoaderConfig,
    aspect_urn: Option<&str>,
) -> Result<LoadedModel, ModelError> {
    let samm = config.vocabulary()?;
    let aspects = store.subjects_of_type(&samm.meta("Aspect"));
    let subject = match (aspect_urn, aspects.as_slice()) {
        (_, []) => return Err(ModelError::NoAspect),
        (Some(urn), candidates) => candidates
            .iter()
            .find(|a| a.as_iri() == Some(urn))
            .cloned()
            .ok_or_else(|| ModelError::AspectNotFound {
                urn: urn.to_owned(),
            })?,
        (None, [only]) => only.clone(),
        (None, many) => {
            return Err(ModelError::AmbiguousAspect {
                candidates: many.iter().map(Term::cache_key).collect(),
            })
        }
    };

    let mut ctx = LoadContext::new(store, &samm, config);
    ctx.aspect_namespace = subject
        .as_iri()
        .and_then(|iri| iri.split_once('#'))
        .map(|(ns, _)| ns.to_owned());
    let aspect = aspect::build_aspect(&mut ctx, &subject).ok_or_else(|| ModelError::AspectNotFound {
        urn: subject.cache_key(),
    })?;
    let graph = ctx.graph;
    tracing::info!(
        aspect = graph.urn(aspect),
        version = %samm.version(),
        elements = graph.len(),
        diagnostics = graph.diagnostics().len(),
        "aspect_loaded"
    );
    Ok(LoadedModel { graph, aspect })
}

/// Builds every top-level element the store declares and groups the result
/// by namespace.
///
/// Aspects go through the full aspect builder first; the later sweeps over
/// entities, events, operations, properties, characteristics, constraints
/// and units find already built elements in the cache.
///
/// # Errors
///
/// [`ModelError::UnsupportedVersion`] if the configured version is unknown.
pub fn load_namespaces(store: &TripleStore, config: &LoaderConfig) -> Result<NamespaceIndex, ModelError> {
    let samm = config.vocabulary()?;
    let mut ctx = LoadContext::new(store, &samm, config);

    for subject in store.subjects_of_type(&samm.meta("Aspect")) {
        ctx.aspect_namespace = subject
            .as_iri()
            .and_then(|iri| iri.split_once('#'))
            .map(|(ns, _)| ns.to_owned());
        aspect::build_aspect(&mut ctx, &subject);
    }
    ctx.aspect_namespace = None;

    for local in ["Entity", "AbstractEntity"] {
        for subject in store.subjects_of_type(&samm.meta(local)) {
            entity::build(&mut ctx, &subject);
        }
    }
    for subject in store.subjects_of_type(&samm.meta("Event")) {
        aspect::build_event(&mut ctx, &subject);
    }
    for subject in store.subjects_of_type(&samm.meta("Operation")) {
        aspect::build_operation(&mut ctx, &subject);
    }
    for local in ["Property", "AbstractProperty"] {
        for subject in store.subjects_of_type(&samm.meta(local)) {
            property::build(&mut ctx, &subject);
        }
    }
    let named: Vec<Term> = store.subjects().filter(|s| !s.is_blank()).cloned().collect();
    for subject in &named {
        if characteristic::classify(&ctx, subject).is_some() {
            characteristic::build(&mut ctx, subject);
        } else if constraint::classify(&ctx, subject).is_some() {
            constraint::build(&mut ctx, subject);
        } else if store.has_type(subject, &samm.meta("Unit")) {
            unit::build_unit(&mut ctx, subject);
        }
    }

    let graph = ctx.graph;
    let namespaces = graph.by_namespace();
    tracing::info!(
        namespaces = namespaces.len(),
        elements = graph.len(),
        diagnostics = graph.diagnostics().len(),
        "namespaces_loaded"
    );
    Ok(NamespaceIndex { graph, namespaces })
}
