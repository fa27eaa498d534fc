//! `samm:dataType` resolution: scalar or complex.

use crate::graph::{ElementId, ElementKind, Scalar};
use crate::store::Term;

use super::{base, entity, LoadContext};

/// Resolves the object of a `samm:dataType` triple.
///
/// XSD types, `rdf:langString` and `samm:curie` become predefined scalar
/// elements; nodes typed as (abstract) entities and entity-catalogue IRIs
/// become entities. Anything else is an unresolved reference.
pub(super) fn resolve(ctx: &mut LoadContext<'_>, node: &Term) -> Option<ElementId> {
    if let Some(id) = ctx.cached(node) {
        return Some(id);
    }
    if let Some(iri) = node.as_iri() {
        if ctx.samm.is_scalar_type(iri) {
            return Some(scalar(ctx, iri));
        }
    }
    let store = ctx.store;
    let samm = ctx.samm;
    let is_entity = store.has_type(node, &samm.meta("Entity"))
        || store.has_type(node, &samm.meta("AbstractEntity"))
        || node.as_iri().is_some_and(|iri| samm.is_entity_catalogue(iri));
    if is_entity {
        return entity::build(ctx, node);
    }
    ctx.unresolved(node, "data_type");
    None
}

/// The predefined scalar element for `iri`, created on first use.
pub(super) fn scalar(ctx: &mut LoadContext<'_>, iri: &str) -> ElementId {
    if let Some(id) = ctx.graph.get(iri) {
        return id;
    }
    ctx.reserve(&Term::iri(iri), base::predefined(iri), ElementKind::Scalar(Scalar))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoaderConfig;
    use crate::graph::Diagnostic;
    use crate::store::TripleStore;
    use crate::vocab::{iris, Samm};

    #[test]
    fn scalars_are_predefined_and_shared() {
        let samm = Samm::default();
        let store = TripleStore::new();
        let config = LoaderConfig::seeded(3);
        let mut ctx = LoadContext::new(&store, &samm, &config);
        let a = resolve(&mut ctx, &Term::iri(iris::XSD_STRING));
        let b = resolve(&mut ctx, &Term::iri(iris::XSD_STRING));
        assert!(a.is_some());
        assert_eq!(a, b);
        let element = a.and_then(|id| ctx.graph.element(id));
        assert!(element.is_some_and(|e| e.meta.predefined && e.name() == "string"));
    }

    #[test]
    fn curie_is_a_scalar() {
        let samm = Samm::default();
        let store = TripleStore::new();
        let config = LoaderConfig::seeded(3);
        let mut ctx = LoadContext::new(&store, &samm, &config);
        let id = resolve(&mut ctx, &Term::iri(samm.meta("curie")));
        assert!(id.and_then(|id| ctx.graph.element(id)).is_some_and(|e| matches!(e.kind, ElementKind::Scalar(_))));
    }

    #[test]
    fn unknown_types_are_reported() {
        let samm = Samm::default();
        let store = TripleStore::new();
        let config = LoaderConfig::seeded(3);
        let mut ctx = LoadContext::new(&store, &samm, &config);
        assert!(resolve(&mut ctx, &Term::iri("urn:x:1.0.0#Nothing")).is_none());
        assert!(matches!(
            ctx.graph.diagnostics(),
            [Diagnostic::UnresolvedReference { role: "data_type", .. }]
        ));
    }
}
