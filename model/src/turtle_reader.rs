//! Turtle input through `sophia_turtle`.
//!
//! The parser is an outside collaborator: this module only converts the terms
//! it yields into the store's own [`Term`] type.

use sophia_api::source::TripleSource;
use sophia_api::term::{Term as _, TermKind};
use sophia_api::triple::Triple;
use sophia_turtle::parser::turtle;

use crate::error::ModelError;
use crate::store::{Literal, Term, TripleStore};
use crate::vocab::iris;

impl TripleStore {
    /// Parses a Turtle document into a new store.
    ///
    /// Prefix declarations are not surfaced by the parser; the writer derives
    /// its own prefix table.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Parse`] if the document is not valid Turtle.
    pub fn from_turtle(source: &str) -> Result<Self, ModelError> {
        let mut store = TripleStore::new();
        store.extend_from_turtle(source)?;
        Ok(store)
    }

    /// Parses a Turtle document and appends its triples to this store.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Parse`] if the document is not valid Turtle.
    pub fn extend_from_turtle(&mut self, source: &str) -> Result<(), ModelError> {
        let mut skipped = 0usize;
        turtle::parse_str(source)
            .for_each_triple(|t| {
                match (convert(t.s()), convert(t.p()), convert(t.o())) {
                    (Some(s), Some(Term::Iri(p)), Some(o)) => self.add(s, p, o),
                    _ => skipped += 1,
                }
            })
            .map_err(|e| ModelError::Parse(e.to_string()))?;
        if skipped > 0 {
            tracing::warn!(skipped, "turtle_triples_skipped");
        }
        Ok(())
    }
}

fn convert<T: sophia_api::term::Term>(term: T) -> Option<Term> {
    match term.kind() {
        TermKind::Iri => term.iri().map(|iri| Term::Iri(iri.as_str().to_owned())),
        TermKind::BlankNode => term
            .bnode_id()
            .map(|id| Term::BlankNode(id.as_str().to_owned())),
        TermKind::Literal => {
            let lexical = term.lexical_form()?.to_string();
            let language = term.language_tag().map(|tag| tag.as_str().to_owned());
            let datatype = match (&language, term.datatype()) {
                (Some(_), _) => iris::RDF_LANG_STRING.to_owned(),
                (None, Some(dt)) => dt.as_str().to_owned(),
                (None, None) => iris::XSD_STRING.to_owned(),
            };
            Some(Term::Literal(Literal {
                lexical,
                datatype,
                language,
            }))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_literals_and_blank_nodes() {
        let src = r#"
            @prefix ex: <urn:ex#> .
            @prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
            ex:a ex:p "1"^^xsd:integer , "hi"@en , "plain" ;
                 ex:q [ ex:r ex:b ] .
        "#;
        let store = match TripleStore::from_turtle(src) {
            Ok(store) => store,
            Err(e) => unreachable!("parse failed: {e}"),
        };
        let a = Term::iri("urn:ex#a");
        let literals: Vec<_> = store
            .objects(&a, "urn:ex#p")
            .filter_map(Term::as_literal)
            .cloned()
            .collect();
        assert_eq!(literals.len(), 3);
        assert!(literals.contains(&Literal::typed("1", iris::XSD_INTEGER)));
        assert!(literals.contains(&Literal::lang("hi", "en")));
        assert!(literals.contains(&Literal::string("plain")));
        assert!(store.object(&a, "urn:ex#q").is_some_and(Term::is_blank));
    }

    #[test]
    fn reports_parse_errors() {
        assert!(matches!(
            TripleStore::from_turtle("@prefix broken"),
            Err(ModelError::Parse(_))
        ));
    }
}
