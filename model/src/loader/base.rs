//! Named-element attributes shared by every kind.

use crate::graph::ElementMeta;
use crate::store::{Literal, Term};

use super::LoadContext;

/// Language used for `samm:preferredName` / `samm:description` literals
/// written without a tag.
const DEFAULT_LANGUAGE: &str = "en";

/// Reads name, URN, preferred names, descriptions and `see` links of
/// `node` in one pass over its triples.
///
/// URN priority: the node's own IRI; else the object of a `samm:property`
/// triple on the (blank) node; else a synthesized `<ns>#<prefix>_<n>`.
/// Nothing is registered here.
pub(super) fn extract(ctx: &mut LoadContext<'_>, node: &Term, prefix: &str) -> ElementMeta {
    let store = ctx.store;
    let samm = ctx.samm;
    let mut meta = ElementMeta::default();
    let mut property_ref = None;

    for quad in store.quads_for_subject(node) {
        let predicate = quad.predicate.as_str();
        if samm.is_preferred_name(predicate) {
            if let Some(lit) = quad.object.as_literal() {
                meta.preferred_names.insert(language_of(lit), lit.lexical.clone());
            }
        } else if samm.is_description(predicate) {
            if let Some(lit) = quad.object.as_literal() {
                meta.descriptions.insert(language_of(lit), lit.lexical.clone());
            }
        } else if samm.is_see(predicate) {
            match &quad.object {
                Term::Iri(iri) => meta.see.push(iri.clone()),
                Term::Literal(lit) => meta.see.push(lit.lexical.clone()),
                Term::BlankNode(_) => {}
            }
        } else if samm.is_property_ref(predicate) && property_ref.is_none() {
            property_ref = quad.object.as_iri().map(str::to_owned);
        }
    }

    match (node, property_ref) {
        (Term::Iri(iri), _) => {
            meta.urn = iri.clone();
            meta.name = local_name(iri).to_owned();
        }
        (_, Some(reference)) => {
            meta.name = local_name(&reference).to_owned();
            meta.urn = reference;
            meta.anonymous = true;
        }
        _ => {
            let (urn, name) = ctx.synthesize(prefix);
            meta.urn = urn;
            meta.name = name;
            meta.anonymous = true;
            meta.synthetic_name = true;
        }
    }
    meta
}

/// Meta for a vocabulary-owned element referenced by IRI.
pub(super) fn predefined(iri: &str) -> ElementMeta {
    ElementMeta {
        predefined: true,
        ..ElementMeta::named(iri, local_name(iri))
    }
}

/// The part of an IRI after `#`, else after the last `/` or `:`.
pub(crate) fn local_name(iri: &str) -> &str {
    if let Some((_, local)) = iri.rsplit_once('#') {
        return local;
    }
    iri.rsplit(['/', ':']).next().unwrap_or(iri)
}

fn language_of(lit: &Literal) -> String {
    lit.language
        .clone()
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_owned())
}

/// Lexical form of a literal object.
pub(super) fn text(term: &Term) -> Option<String> {
    term.as_literal().map(|lit| lit.lexical.clone())
}

/// `xsd:boolean` value of a literal object; anything but `true`/`1` is false.
pub(super) fn boolean(term: &Term) -> bool {
    term.as_literal()
        .is_some_and(|lit| matches!(lit.lexical.trim(), "true" | "1"))
}

/// Non-negative integer value of a literal object.
pub(super) fn unsigned(term: &Term) -> Option<u64> {
    term.as_literal().and_then(|lit| lit.lexical.trim().parse().ok())
}
