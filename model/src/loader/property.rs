//! `samm:Property` / `samm:AbstractProperty`.

use crate::graph::{ElementId, ElementKind, Property, ScalarValue};
use crate::store::Term;

use super::{base, characteristic, LoadContext};

/// Builds the property at `node`.
pub(super) fn build(ctx: &mut LoadContext<'_>, node: &Term) -> Option<ElementId> {
    if let Some(id) = ctx.cached(node) {
        return Some(id);
    }
    let store = ctx.store;
    let samm = ctx.samm;
    let is_abstract = store.has_type(node, &samm.meta("AbstractProperty"));
    if !is_abstract && !store.has_type(node, &samm.meta("Property")) {
        ctx.unresolved(node, "property");
        return None;
    }
    let meta = base::extract(ctx, node, "property");
    let placeholder = Property {
        is_abstract,
        ..Property::default()
    };
    let id = ctx.reserve(node, meta, ElementKind::Property(placeholder.clone()));
    fill(ctx, id, node, placeholder);
    Some(id)
}

/// Builds the anonymous concrete property `[ samm:extends :abstract ; ... ]`.
///
/// One abstract property may be extended differently in several places, so
/// every extension gets its own name `<abstractName>_property_<n>`.
pub(super) fn build_extension(ctx: &mut LoadContext<'_>, node: &Term) -> Option<ElementId> {
    if let Some(id) = ctx.cached(node) {
        return Some(id);
    }
    let store = ctx.store;
    let target = store.object(node, &ctx.samm.meta("extends"))?;
    let parent = build(ctx, target)?;
    let prefix = format!(
        "{}_property",
        ctx.graph.element(parent).map_or("abstract", |e| e.name())
    );
    let meta = base::extract(ctx, node, &prefix);
    let id = ctx.reserve(node, meta, ElementKind::Property(Property::default()));
    fill(ctx, id, node, Property::default());
    Some(id)
}

fn fill(ctx: &mut LoadContext<'_>, id: ElementId, node: &Term, mut property: Property) {
    let store = ctx.store;
    let samm = ctx.samm;
    for quad in store.quads_for_subject(node) {
        let predicate = quad.predicate.as_str();
        if samm.is_characteristic_pred(predicate) {
            property.characteristic = characteristic::build(ctx, &quad.object);
        } else if samm.is_meta(predicate, "exampleValue") {
            property.example_value = quad.object.as_literal().map(ScalarValue::from_literal);
        } else if samm.is_extends(predicate) {
            property.extends = ctx.resolve_extends(id, &quad.object, build);
        }
    }
    ctx.finish(id, ElementKind::Property(property));
}
