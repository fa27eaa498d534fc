//! `samm:Entity` / `samm:AbstractEntity` and `extends` chains.

use crate::graph::{ElementId, ElementKind, Entity};
use crate::store::Term;

use super::{base, structure, LoadContext};

/// Builds the entity at `node`.
///
/// An IRI without any triples in the store (an entity-catalogue type or an
/// `extends` target defined elsewhere) becomes a predefined entity. An
/// `extends` edge that would close a cycle is dropped.
pub(super) fn build(ctx: &mut LoadContext<'_>, node: &Term) -> Option<ElementId> {
    if let Some(id) = ctx.cached(node) {
        return Some(id);
    }
    let store = ctx.store;
    let samm = ctx.samm;
    let is_abstract = store.has_type(node, &samm.meta("AbstractEntity"));
    if !is_abstract && !store.has_type(node, &samm.meta("Entity")) {
        return match node.as_iri() {
            Some(iri) if !store.has_triples(node) => Some(ctx.reserve(
                node,
                base::predefined(iri),
                ElementKind::Entity(Entity::default()),
            )),
            _ => {
                ctx.unresolved(node, "entity");
                None
            }
        };
    }

    let meta = base::extract(ctx, node, "entity");
    let placeholder = Entity {
        is_abstract,
        ..Entity::default()
    };
    let id = ctx.reserve(node, meta, ElementKind::Entity(placeholder.clone()));
    let mut entity = placeholder;

    for quad in store.quads_for_subject(node) {
        let predicate = quad.predicate.as_str();
        if samm.is_properties(predicate) {
            entity.structure = structure::read(ctx, &quad.object);
        } else if samm.is_extends(predicate) {
            entity.extends = ctx.resolve_extends(id, &quad.object, build);
        }
    }

    // Entities extending this one while it was being built registered
    // themselves on the placeholder.
    if let Some(ElementKind::Entity(current)) = ctx.graph.element(id).map(|e| &e.kind) {
        entity.extending_elements = current.extending_elements.clone();
    }
    let parent = entity.extends;
    ctx.finish(id, ElementKind::Entity(entity));
    if let Some(parent) = parent {
        register_extension(ctx, parent, id);
    }
    Some(id)
}

fn register_extension(ctx: &mut LoadContext<'_>, parent: ElementId, child: ElementId) {
    if let Some(ElementKind::Entity(entity)) = ctx.graph.element_mut(parent).map(|e| &mut e.kind) {
        if !entity.extending_elements.contains(&child) {
            entity.extending_elements.push(child);
        }
    }
}
