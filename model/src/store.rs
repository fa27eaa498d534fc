//! Read-mostly quad store handed to the loader.
//!
//! Terms are owned strings; blank nodes keep the label the parser gave them.
//! Subjects are indexed in first-seen order so every sweep over the store is
//! deterministic.

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;

use crate::vocab::iris;

/// An RDF literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    /// Lexical form as written in the source.
    pub lexical: String,
    /// Full datatype IRI. Language-tagged literals use `rdf:langString`.
    pub datatype: String,
    /// Language tag, lowercase as parsed.
    pub language: Option<String>,
}

impl Literal {
    /// A typed literal.
    pub fn typed(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: datatype.into(),
            language: None,
        }
    }

    /// An `xsd:string` literal.
    pub fn string(lexical: impl Into<String>) -> Self {
        Self::typed(lexical, iris::XSD_STRING)
    }

    /// A language-tagged string.
    pub fn lang(lexical: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: iris::RDF_LANG_STRING.to_owned(),
            language: Some(language.into()),
        }
    }

    /// An `xsd:boolean` literal.
    #[must_use]
    pub fn boolean(value: bool) -> Self {
        Self::typed(value.to_string(), iris::XSD_BOOLEAN)
    }
}

/// A subject or object position term.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// A named node.
    Iri(String),
    /// A blank node label, without the `_:` prefix.
    BlankNode(String),
    /// A literal.
    Literal(Literal),
}

impl Term {
    /// A named node.
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    /// A blank node.
    pub fn blank(label: impl Into<String>) -> Self {
        Term::BlankNode(label.into())
    }

    /// Returns true for blank nodes.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Term::BlankNode(_))
    }

    /// The IRI of a named node.
    #[must_use]
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// The literal, if this is one.
    #[must_use]
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Returns true for `rdf:nil`.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.as_iri() == Some(iris::RDF_NIL)
    }

    /// Key under which a node is addressed in the instance cache: the IRI for
    /// named nodes, `_:label` for blank nodes.
    #[must_use]
    pub fn cache_key(&self) -> String {
        match self {
            Term::Iri(iri) => iri.clone(),
            Term::BlankNode(label) => format!("_:{label}"),
            Term::Literal(lit) => lit.lexical.clone(),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{iri}>"),
            Term::BlankNode(label) => write!(f, "_:{label}"),
            Term::Literal(lit) => match &lit.language {
                Some(lang) => write!(f, "\"{}\"@{lang}", lit.lexical),
                None => write!(f, "\"{}\"^^<{}>", lit.lexical, lit.datatype),
            },
        }
    }
}

/// One statement. `graph` is `None` for the default graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quad {
    /// Subject (named or blank node).
    pub subject: Term,
    /// Predicate IRI.
    pub predicate: String,
    /// Object.
    pub object: Term,
    /// Named graph, if any.
    pub graph: Option<String>,
}

impl Quad {
    /// A default-graph quad.
    pub fn new(subject: Term, predicate: impl Into<String>, object: Term) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object,
            graph: None,
        }
    }
}

/// Insertion-ordered quad store with a subject index and a prefix table.
#[derive(Debug, Clone, Default)]
pub struct TripleStore {
    quads: Vec<Quad>,
    by_subject: IndexMap<Term, Vec<usize>>,
    prefixes: IndexMap<String, String>,
}

impl TripleStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a quad. Exact duplicates are ignored.
    pub fn insert(&mut self, quad: Quad) {
        if let Some(existing) = self.by_subject.get(&quad.subject) {
            if existing.iter().any(|&i| self.quads[i] == quad) {
                return;
            }
        }
        let index = self.quads.len();
        self.by_subject
            .entry(quad.subject.clone())
            .or_default()
            .push(index);
        self.quads.push(quad);
    }

    /// Shorthand for inserting a default-graph triple.
    pub fn add(&mut self, subject: Term, predicate: impl Into<String>, object: Term) {
        self.insert(Quad::new(subject, predicate, object));
    }

    /// Number of quads.
    #[must_use]
    pub fn len(&self) -> usize {
        self.quads.len()
    }

    /// Returns true if the store holds no quads.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    /// All quads in insertion order.
    pub fn quads(&self) -> impl Iterator<Item = &Quad> {
        self.quads.iter()
    }

    /// Distinct subjects in first-seen order.
    pub fn subjects(&self) -> impl Iterator<Item = &Term> {
        self.by_subject.keys()
    }

    /// Quads whose subject is `subject`, in insertion order.
    pub fn quads_for_subject<'a>(&'a self, subject: &Term) -> impl Iterator<Item = &'a Quad> + 'a {
        self.by_subject
            .get(subject)
            .into_iter()
            .flatten()
            .map(|&i| &self.quads[i])
    }

    /// Returns true if `subject` has at least one triple.
    #[must_use]
    pub fn has_triples(&self, subject: &Term) -> bool {
        self.by_subject.contains_key(subject)
    }

    /// First object of `subject predicate ?o`.
    #[must_use]
    pub fn object(&self, subject: &Term, predicate: &str) -> Option<&Term> {
        self.quads_for_subject(subject)
            .find(|q| q.predicate == predicate)
            .map(|q| &q.object)
    }

    /// Every object of `subject predicate ?o`.
    pub fn objects<'a>(
        &'a self,
        subject: &Term,
        predicate: &'a str,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        self.quads_for_subject(subject)
            .filter(move |q| q.predicate == predicate)
            .map(|q| &q.object)
    }

    /// IRIs asserted via `rdf:type` on `subject`.
    #[must_use]
    pub fn types_of(&self, subject: &Term) -> Vec<&str> {
        self.objects(subject, iris::RDF_TYPE)
            .filter_map(Term::as_iri)
            .collect()
    }

    /// Returns true if `subject rdf:type type_iri` is asserted.
    #[must_use]
    pub fn has_type(&self, subject: &Term, type_iri: &str) -> bool {
        self.types_of(subject).contains(&type_iri)
    }

    /// Subjects typed `type_iri`, in first-seen order.
    #[must_use]
    pub fn subjects_of_type(&self, type_iri: &str) -> Vec<Term> {
        self.by_subject
            .keys()
            .filter(|s| self.has_type(s, type_iri))
            .cloned()
            .collect()
    }

    /// Returns true if `node` is `rdf:nil` or a cell carrying `rdf:first`.
    #[must_use]
    pub fn is_list(&self, node: &Term) -> bool {
        node.is_nil() || self.object(node, iris::RDF_FIRST).is_some()
    }

    /// Walks the `rdf:first` / `rdf:rest` chain starting at `head` and returns
    /// the members in list order. A chain that loops back on itself stops at
    /// the first repeated cell; a cell without `rdf:first` ends the list.
    #[must_use]
    pub fn resolve_list(&self, head: &Term) -> Vec<Term> {
        let mut members = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor = head.clone();
        while !cursor.is_nil() && seen.insert(cursor.clone()) {
            let Some(first) = self.object(&cursor, iris::RDF_FIRST) else {
                break;
            };
            members.push(first.clone());
            match self.object(&cursor, iris::RDF_REST) {
                Some(rest) => cursor = rest.clone(),
                None => break,
            }
        }
        members
    }

    /// Subjects that reference `object` through `predicate`.
    pub fn subjects_with<'a>(
        &'a self,
        predicate: &'a str,
        object: &'a Term,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        self.quads
            .iter()
            .filter(move |q| q.predicate == predicate && &q.object == object)
            .map(|q| &q.subject)
    }

    /// Declared prefix aliases in declaration order.
    #[must_use]
    pub fn prefixes(&self) -> &IndexMap<String, String> {
        &self.prefixes
    }

    /// Declares (or redeclares) a prefix alias.
    pub fn set_prefix(&mut self, alias: impl Into<String>, iri: impl Into<String>) {
        self.prefixes.insert(alias.into(), iri.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(store: &mut TripleStore, items: &[&str]) -> Term {
        let mut next = Term::iri(iris::RDF_NIL);
        for (i, item) in items.iter().enumerate().rev() {
            let cell = Term::blank(format!("l{i}"));
            store.add(cell.clone(), iris::RDF_FIRST, Term::iri(*item));
            store.add(cell.clone(), iris::RDF_REST, next);
            next = cell;
        }
        next
    }

    #[test]
    fn resolves_list_in_order() {
        let mut store = TripleStore::new();
        let head = list(&mut store, &["urn:x#a", "urn:x#b", "urn:x#c"]);
        let members: Vec<_> = store
            .resolve_list(&head)
            .into_iter()
            .filter_map(|t| t.as_iri().map(str::to_owned))
            .collect();
        assert_eq!(members, ["urn:x#a", "urn:x#b", "urn:x#c"]);
    }

    #[test]
    fn cyclic_list_terminates() {
        let mut store = TripleStore::new();
        let cell = Term::blank("loop");
        store.add(cell.clone(), iris::RDF_FIRST, Term::iri("urn:x#a"));
        store.add(cell.clone(), iris::RDF_REST, cell.clone());
        assert_eq!(store.resolve_list(&cell).len(), 1);
    }

    #[test]
    fn empty_list_is_nil() {
        let store = TripleStore::new();
        let nil = Term::iri(iris::RDF_NIL);
        assert!(store.is_list(&nil));
        assert!(store.resolve_list(&nil).is_empty());
    }

    #[test]
    fn duplicates_are_ignored_and_subjects_keep_order() {
        let mut store = TripleStore::new();
        let b = Term::iri("urn:x#B");
        let a = Term::iri("urn:x#A");
        store.add(b.clone(), iris::RDF_TYPE, Term::iri("urn:x#T"));
        store.add(a.clone(), iris::RDF_TYPE, Term::iri("urn:x#T"));
        store.add(b.clone(), iris::RDF_TYPE, Term::iri("urn:x#T"));
        assert_eq!(store.len(), 2);
        assert_eq!(store.subjects_of_type("urn:x#T"), vec![b, a]);
    }

    #[test]
    fn cache_keys_distinguish_blank_nodes() {
        assert_eq!(Term::blank("b0").cache_key(), "_:b0");
        assert_eq!(Term::iri("urn:x#A").cache_key(), "urn:x#A");
    }
}
