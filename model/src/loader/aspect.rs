//! `samm:Aspect`, `samm:Operation` and `samm:Event`.

use crate::graph::{Aspect, ElementId, ElementKind, Event, Operation};
use crate::store::Term;

use super::{base, property, structure, LoadContext};

/// Builds the aspect at `node` and everything it reaches.
pub(super) fn build_aspect(ctx: &mut LoadContext<'_>, node: &Term) -> Option<ElementId> {
    if let Some(id) = ctx.cached(node) {
        return Some(id);
    }
    let store = ctx.store;
    let samm = ctx.samm;
    if !store.has_type(node, &samm.meta("Aspect")) {
        ctx.unresolved(node, "aspect");
        return None;
    }
    let meta = base::extract(ctx, node, "aspect");
    let id = ctx.reserve(node, meta, ElementKind::Aspect(Aspect::default()));
    let mut aspect = Aspect::default();
    for quad in store.quads_for_subject(node) {
        let object = &quad.object;
        match samm.meta_local(&quad.predicate) {
            Some("properties") => aspect.structure = structure::read(ctx, object),
            Some("operations") => {
                for member in members(ctx, object) {
                    aspect.operations.extend(build_operation(ctx, &member));
                }
            }
            Some("events") => {
                for member in members(ctx, object) {
                    aspect.events.extend(build_event(ctx, &member));
                }
            }
            _ => {}
        }
    }
    ctx.finish(id, ElementKind::Aspect(aspect));
    Some(id)
}

/// Builds the operation at `node`.
pub(super) fn build_operation(ctx: &mut LoadContext<'_>, node: &Term) -> Option<ElementId> {
    if let Some(id) = ctx.cached(node) {
        return Some(id);
    }
    let store = ctx.store;
    let samm = ctx.samm;
    if !store.has_type(node, &samm.meta("Operation")) {
        ctx.unresolved(node, "operation");
        return None;
    }
    let meta = base::extract(ctx, node, "operation");
    let id = ctx.reserve(node, meta, ElementKind::Operation(Operation::default()));
    let mut operation = Operation::default();
    for quad in store.quads_for_subject(node) {
        let object = &quad.object;
        match samm.meta_local(&quad.predicate) {
            Some("input") => {
                for member in members(ctx, object) {
                    operation.input.extend(property::build(ctx, &member));
                }
            }
            Some("output") => operation.output = property::build(ctx, object),
            _ => {}
        }
    }
    ctx.finish(id, ElementKind::Operation(operation));
    Some(id)
}

/// Builds the event at `node`.
pub(super) fn build_event(ctx: &mut LoadContext<'_>, node: &Term) -> Option<ElementId> {
    if let Some(id) = ctx.cached(node) {
        return Some(id);
    }
    let store = ctx.store;
    let samm = ctx.samm;
    if !store.has_type(node, &samm.meta("Event")) {
        ctx.unresolved(node, "event");
        return None;
    }
    let meta = base::extract(ctx, node, "event");
    let id = ctx.reserve(node, meta, ElementKind::Event(Event::default()));
    let mut event = Event::default();
    if let Some(parameters) = store.object(node, &samm.meta("parameters")) {
        event.structure = structure::read(ctx, parameters);
    }
    ctx.finish(id, ElementKind::Event(event));
    Some(id)
}

fn members(ctx: &LoadContext<'_>, list: &Term) -> Vec<Term> {
    if ctx.store.is_list(list) {
        ctx.store.resolve_list(list)
    } else {
        vec![list.clone()]
    }
}
