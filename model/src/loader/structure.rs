//! `samm:properties` / `samm:parameters` lists with payload overrides.

use crate::graph::{PayloadOverride, Structure};
use crate::store::Term;

use super::{base, property, LoadContext};

/// Reads a property list. Members are one of:
///
/// - a property IRI;
/// - `[ samm:property :p ; samm:optional true ; ... ]`, a reference with a
///   payload override;
/// - `[ samm:extends :abstract ; samm:characteristic :c ]`, an anonymous
///   concrete property, optionally carrying payload fields too.
///
/// Only non-default overrides are kept.
pub(super) fn read(ctx: &mut LoadContext<'_>, list: &Term) -> Structure {
    let store = ctx.store;
    let samm = ctx.samm;
    let members = if store.is_list(list) {
        store.resolve_list(list)
    } else {
        vec![list.clone()]
    };

    let mut structure = Structure::default();
    for member in &members {
        match member {
            Term::Iri(_) => structure.properties.extend(property::build(ctx, member)),
            Term::BlankNode(_) => {
                let target = store.object(member, &samm.meta("property"));
                let id = match target {
                    Some(target) => property::build(ctx, target),
                    None if store.object(member, &samm.meta("extends")).is_some() => {
                        property::build_extension(ctx, member)
                    }
                    None => {
                        ctx.unresolved(member, "property");
                        None
                    }
                };
                if let Some(id) = id {
                    let urn = ctx.graph.urn(id).to_owned();
                    structure.properties.push(id);
                    structure.set_payload(urn, payload(ctx, member));
                }
            }
            Term::Literal(_) => ctx.unresolved(member, "property"),
        }
    }
    structure
}

fn payload(ctx: &LoadContext<'_>, node: &Term) -> PayloadOverride {
    let mut payload = PayloadOverride::default();
    for quad in ctx.store.quads_for_subject(node) {
        match ctx.samm.meta_local(&quad.predicate) {
            Some("optional") => payload.optional = base::boolean(&quad.object),
            Some("notInPayload") => payload.not_in_payload = base::boolean(&quad.object),
            Some("payloadName") => payload.payload_name = base::text(&quad.object),
            _ => {}
        }
    }
    payload
}
