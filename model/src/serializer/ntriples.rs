//! N-Triples writer.
//!
//! One triple per line, absolute IRIs, blank nodes as `_:label`. Named
//! graphs are written as N-Quads graph labels.

use crate::store::{Literal, Term, TripleStore};

/// Writes every quad of `store` in insertion order.
#[must_use]
pub fn to_ntriples(store: &TripleStore) -> String {
    let mut out = String::with_capacity(store.len() * 96);
    for quad in store.quads() {
        triple(&mut out, &quad.subject, &quad.predicate, &quad.object, quad.graph.as_deref());
    }
    out
}

fn triple(out: &mut String, subj: &Term, pred: &str, obj: &Term, graph: Option<&str>) {
    out.push_str(&term(subj));
    out.push(' ');
    out.push_str(&iri(pred));
    out.push(' ');
    out.push_str(&term(obj));
    if let Some(graph) = graph {
        out.push(' ');
        out.push_str(&iri(graph));
    }
    out.push_str(" .\n");
}

fn term(t: &Term) -> String {
    match t {
        Term::Iri(s) => iri(s),
        Term::BlankNode(label) => format!("_:{label}"),
        Term::Literal(l) => lit(l),
    }
}

fn iri(s: &str) -> String {
    format!("<{s}>")
}

fn lit(l: &Literal) -> String {
    let escaped = escape(&l.lexical);
    match &l.language {
        Some(lang) => format!("\"{escaped}\"@{lang}"),
        None => format!("\"{escaped}\"^^<{}>", l.datatype),
    }
}

pub(super) fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::iris;

    fn sample() -> TripleStore {
        let mut store = TripleStore::new();
        let s = Term::iri("urn:a:1.0.0#Movement");
        store.add(s.clone(), iris::RDF_TYPE, Term::iri("urn:samm:org.eclipse.esmf.samm:meta-model:2.1.0#Aspect"));
        store.add(
            s.clone(),
            "urn:samm:org.eclipse.esmf.samm:meta-model:2.1.0#description",
            Term::Literal(Literal::lang("line \"one\"\nline two", "en")),
        );
        store.add(s, "urn:x#list", Term::blank("b0"));
        store
    }

    #[test]
    fn every_line_ends_with_period() {
        let nt = to_ntriples(&sample());
        assert_eq!(nt.lines().count(), 3);
        for line in nt.lines() {
            assert!(line.ends_with(" ."), "Line does not end with ' .': {line}");
        }
    }

    #[test]
    fn literals_are_escaped() {
        let nt = to_ntriples(&sample());
        assert!(nt.contains(r#""line \"one\"\nline two"@en"#));
        assert!(nt.contains("_:b0 ."));
    }

    #[test]
    fn typed_literals_keep_their_datatype() {
        let mut store = TripleStore::new();
        store.add(Term::iri("urn:x#s"), "urn:x#p", Term::Literal(Literal::typed("3", iris::XSD_INTEGER)));
        assert_eq!(
            to_ntriples(&store),
            format!("<urn:x#s> <urn:x#p> \"3\"^^<{}> .\n", iris::XSD_INTEGER)
        );
    }
}
