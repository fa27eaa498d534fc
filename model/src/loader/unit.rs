//! `samm:Unit` and `samm:QuantityKind`.

use crate::graph::{ElementId, ElementKind, QuantityKind, Unit};
use crate::store::Term;
use crate::vocab::iris;

use super::{base, LoadContext};

/// Builds the unit at `node`. Unit-catalogue IRIs without triples in the
/// store become predefined units.
pub(super) fn build_unit(ctx: &mut LoadContext<'_>, node: &Term) -> Option<ElementId> {
    if let Some(id) = ctx.cached(node) {
        return Some(id);
    }
    let store = ctx.store;
    let samm = ctx.samm;
    if !store.has_type(node, &samm.meta("Unit")) {
        return catalogue(ctx, node, ElementKind::Unit(Unit::default()), "unit");
    }
    let meta = base::extract(ctx, node, "unit");
    let id = ctx.reserve(node, meta, ElementKind::Unit(Unit::default()));
    let mut unit = Unit::default();
    for quad in store.quads_for_subject(node) {
        let object = &quad.object;
        match samm.meta_local(&quad.predicate) {
            Some("symbol") => unit.symbol = base::text(object),
            Some("commonCode") => unit.code = base::text(object),
            Some("conversionFactor") => unit.conversion_factor = base::text(object),
            Some("numericConversionFactor") => unit.numeric_conversion_factor = base::text(object),
            Some("referenceUnit") => unit.reference_unit = build_unit(ctx, object),
            Some("quantityKind") => unit.quantity_kinds.extend(build_quantity_kind(ctx, object)),
            _ => {}
        }
    }
    ctx.finish(id, ElementKind::Unit(unit));
    Some(id)
}

/// Builds the quantity kind at `node`.
pub(super) fn build_quantity_kind(ctx: &mut LoadContext<'_>, node: &Term) -> Option<ElementId> {
    if let Some(id) = ctx.cached(node) {
        return Some(id);
    }
    let store = ctx.store;
    if !store.has_type(node, &ctx.samm.meta("QuantityKind")) {
        return catalogue(
            ctx,
            node,
            ElementKind::QuantityKind(QuantityKind::default()),
            "quantity_kind",
        );
    }
    let meta = base::extract(ctx, node, "quantity_kind");
    let label = store
        .object(node, &format!("{}label", iris::RDFS))
        .and_then(base::text);
    let id = ctx.reserve(node, meta, ElementKind::QuantityKind(QuantityKind::default()));
    ctx.finish(id, ElementKind::QuantityKind(QuantityKind { label }));
    Some(id)
}

fn catalogue(
    ctx: &mut LoadContext<'_>,
    node: &Term,
    kind: ElementKind,
    role: &'static str,
) -> Option<ElementId> {
    match node.as_iri() {
        Some(iri) if ctx.samm.is_unit_catalogue(iri) && !ctx.store.has_triples(node) => {
            Some(ctx.reserve(node, base::predefined(iri), kind))
        }
        _ => {
            ctx.unresolved(node, role);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoaderConfig;
    use crate::store::{Literal, TripleStore};
    use crate::vocab::Samm;

    #[test]
    fn catalogue_units_are_predefined() {
        let samm = Samm::default();
        let store = TripleStore::new();
        let config = LoaderConfig::seeded(11);
        let mut ctx = LoadContext::new(&store, &samm, &config);
        let id = build_unit(&mut ctx, &Term::iri(samm.unit("kilometrePerHour")));
        let element = id.and_then(|id| ctx.graph.element(id));
        assert!(element.is_some_and(|e| e.meta.predefined && e.name() == "kilometrePerHour"));
    }

    #[test]
    fn custom_units_read_their_fields() {
        let samm = Samm::default();
        let mut store = TripleStore::new();
        let node = Term::iri("urn:x:1.0.0#furlong");
        store.add(node.clone(), iris::RDF_TYPE, Term::iri(samm.meta("Unit")));
        store.add(node.clone(), samm.meta("symbol"), Term::Literal(Literal::string("fur")));
        store.add(node.clone(), samm.meta("referenceUnit"), Term::iri(samm.unit("metre")));
        store.add(node.clone(), samm.meta("quantityKind"), Term::iri(samm.unit("length")));
        let config = LoaderConfig::seeded(11);
        let mut ctx = LoadContext::new(&store, &samm, &config);
        let id = build_unit(&mut ctx, &node);
        let unit = match id.and_then(|id| ctx.graph.element(id)).map(|e| &e.kind) {
            Some(ElementKind::Unit(unit)) => unit.clone(),
            other => unreachable!("unexpected element: {other:?}"),
        };
        assert_eq!(unit.symbol.as_deref(), Some("fur"));
        assert!(unit.reference_unit.is_some());
        assert_eq!(unit.quantity_kinds.len(), 1);
        let reference = unit.reference_unit.and_then(|r| ctx.graph.element(r));
        assert!(reference.is_some_and(|r| id.is_some_and(|id| r.meta.parents.contains(&id))));
    }
}
