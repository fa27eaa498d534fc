//! Turtle 1.1 writer.
//!
//! Subjects are written in first-seen order, one block each, with
//! `rdf:type` first as `a`. Blank nodes referenced exactly once are inlined
//! as `[ ... ]`, and well-formed `rdf:first`/`rdf:rest` chains as `( ... )`.
//! Every other blank node keeps a `_:label`.

use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;

use indexmap::IndexMap;

use super::ntriples::escape;
use super::PrefixTable;
use crate::store::{Literal, Term, TripleStore};
use crate::vocab::iris;

/// Writes `store` as a Turtle document using its declared prefixes.
#[must_use]
pub fn to_turtle(store: &TripleStore) -> String {
    Writer::new(store).write()
}

struct Writer<'s> {
    store: &'s TripleStore,
    prefixes: PrefixTable,
    references: HashMap<&'s Term, usize>,
    printed: HashSet<&'s Term>,
    out: String,
}

impl<'s> Writer<'s> {
    fn new(store: &'s TripleStore) -> Self {
        let mut references = HashMap::new();
        for quad in store.quads() {
            if quad.object.is_blank() {
                *references.entry(&quad.object).or_insert(0) += 1;
            }
        }
        Self {
            store,
            prefixes: PrefixTable::from_store(store),
            references,
            printed: HashSet::new(),
            out: String::with_capacity(store.len() * 64),
        }
    }

    fn write(mut self) -> String {
        let mut declared = false;
        for (alias, iri) in self.prefixes.iter() {
            let _ = writeln!(self.out, "@prefix {alias}: <{iri}> .");
            declared = true;
        }
        if declared {
            self.out.push('\n');
        }

        let store = self.store;
        for subject in store.subjects() {
            if self.printed.contains(subject) || (subject.is_blank() && self.inlinable(subject)) {
                continue;
            }
            self.block(subject);
        }
        // Blank nodes only reachable from each other.
        for subject in store.subjects() {
            if subject.is_blank() && !self.printed.contains(subject) {
                self.block(subject);
            }
        }
        self.out
    }

    fn inlinable(&self, term: &Term) -> bool {
        self.references.get(term) == Some(&1) && !self.printed.contains(term)
    }

    fn block(&mut self, subject: &'s Term) {
        self.printed.insert(subject);
        let head = self.term(subject);
        let body = self.predicate_objects(subject);
        let _ = write!(self.out, "{head}\n  {} .\n\n", body.join(" ;\n  "));
    }

    /// `predicate object, object` entries for `subject`, `rdf:type` first.
    fn predicate_objects(&mut self, subject: &'s Term) -> Vec<String> {
        let store = self.store;
        let mut grouped: IndexMap<&'s str, Vec<&'s Term>> = IndexMap::new();
        for quad in store.quads_for_subject(subject) {
            grouped.entry(quad.predicate.as_str()).or_default().push(&quad.object);
        }
        let mut entries: Vec<_> = grouped.into_iter().collect();
        entries.sort_by_key(|(predicate, _)| *predicate != iris::RDF_TYPE);

        entries
            .into_iter()
            .map(|(predicate, objects)| {
                let verb = if predicate == iris::RDF_TYPE {
                    "a".to_owned()
                } else {
                    self.name(predicate)
                };
                let rendered: Vec<String> = objects.into_iter().map(|o| self.object(o)).collect();
                format!("{verb} {}", rendered.join(", "))
            })
            .collect()
    }

    fn object(&mut self, term: &'s Term) -> String {
        if !(term.is_blank() && self.inlinable(term)) {
            return self.term(term);
        }
        if let Some((items, cells)) = self.list_items(term) {
            self.printed.extend(cells);
            let rendered: Vec<String> = items.into_iter().map(|item| self.object(item)).collect();
            return format!("( {} )", rendered.join(" "));
        }
        self.printed.insert(term);
        let body = self.predicate_objects(term);
        if body.is_empty() {
            "[]".to_owned()
        } else {
            format!("[ {} ]", body.join(" ; "))
        }
    }

    /// Members and cells of the list starting at `head`, if every cell is a
    /// singly-referenced blank node carrying exactly `rdf:first` and
    /// `rdf:rest`.
    fn list_items(&self, head: &'s Term) -> Option<(Vec<&'s Term>, Vec<&'s Term>)> {
        let store = self.store;
        let mut items = Vec::new();
        let mut cells: Vec<&'s Term> = Vec::new();
        let mut cursor = head;
        while !cursor.is_nil() {
            if !cursor.is_blank() || !self.inlinable(cursor) || cells.contains(&cursor) {
                return None;
            }
            let mut first = None;
            let mut rest = None;
            let mut other = false;
            for quad in store.quads_for_subject(cursor) {
                match quad.predicate.as_str() {
                    iris::RDF_FIRST if first.is_none() => first = Some(&quad.object),
                    iris::RDF_REST if rest.is_none() => rest = Some(&quad.object),
                    _ => other = true,
                }
            }
            let (Some(first), Some(rest), false) = (first, rest, other) else {
                return None;
            };
            items.push(first);
            cells.push(cursor);
            cursor = rest;
        }
        Some((items, cells))
    }

    fn term(&self, term: &Term) -> String {
        match term {
            Term::Iri(_) if term.is_nil() => "()".to_owned(),
            Term::Iri(iri) => self.name(iri),
            Term::BlankNode(label) => format!("_:{label}"),
            Term::Literal(literal) => self.literal(literal),
        }
    }

    fn name(&self, iri: &str) -> String {
        self.prefixes
            .shorten(iri)
            .unwrap_or_else(|| format!("<{iri}>"))
    }

    fn literal(&self, literal: &Literal) -> String {
        let escaped = escape(&literal.lexical);
        if let Some(lang) = &literal.language {
            return format!("\"{escaped}\"@{lang}");
        }
        match literal.datatype.as_str() {
            iris::XSD_STRING => format!("\"{escaped}\""),
            iris::XSD_BOOLEAN if matches!(literal.lexical.as_str(), "true" | "false") => {
                literal.lexical.clone()
            }
            iris::XSD_INTEGER if is_integer(&literal.lexical) => literal.lexical.clone(),
            datatype => format!("\"{escaped}\"^^{}", self.name(datatype)),
        }
    }
}

fn is_integer(lexical: &str) -> bool {
    let digits = lexical.strip_prefix(['+', '-']).unwrap_or(lexical);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
