//! Prefix aliases for shortening IRIs in Turtle output.

use indexmap::IndexMap;

use crate::store::TripleStore;
use crate::vocab::{iris, Samm};

/// Ordered alias → namespace IRI table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixTable {
    entries: IndexMap<String, String>,
}

impl PrefixTable {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The SAMM and RDF vocabulary aliases for `samm`'s version.
    #[must_use]
    pub fn standard(samm: &Samm) -> Self {
        let mut table = Self::new();
        table.insert("samm", samm.meta_ns());
        table.insert("samm-c", samm.characteristic_ns());
        table.insert("samm-e", samm.entity_ns());
        table.insert("unit", samm.unit_ns());
        table.insert("rdf", iris::RDF);
        table.insert("rdfs", iris::RDFS);
        table.insert("xsd", iris::XSD);
        table
    }

    /// Builds a table from the prefixes declared on a store.
    #[must_use]
    pub fn from_store(store: &TripleStore) -> Self {
        Self {
            entries: store.prefixes().clone(),
        }
    }

    /// Adds model namespaces (without the trailing `#`): the first becomes
    /// the empty alias `:`, later ones `ns1`, `ns2`, ... Namespaces already
    /// aliased are skipped.
    pub fn add_model_namespaces<'a>(&mut self, namespaces: impl IntoIterator<Item = &'a str>) {
        let mut counter = 0usize;
        for ns in namespaces {
            let iri = format!("{ns}#");
            if self.entries.values().any(|existing| *existing == iri) {
                continue;
            }
            let alias = if self.entries.contains_key("") {
                counter += 1;
                format!("ns{counter}")
            } else {
                String::new()
            };
            self.entries.insert(alias, iri);
        }
    }

    /// Declares `alias` for `iri`, replacing an earlier declaration.
    pub fn insert(&mut self, alias: impl Into<String>, iri: impl Into<String>) {
        self.entries.insert(alias.into(), iri.into());
    }

    /// Adds every entry of `extra`.
    pub fn extend(&mut self, extra: &IndexMap<String, String>) {
        for (alias, iri) in extra {
            self.insert(alias.clone(), iri.clone());
        }
    }

    /// Copies the table onto `store`.
    pub fn apply(&self, store: &mut TripleStore) {
        for (alias, iri) in &self.entries {
            store.set_prefix(alias.clone(), iri.clone());
        }
    }

    /// Aliases in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(a, i)| (a.as_str(), i.as_str()))
    }

    /// `alias:local` for `iri`, using the longest matching namespace whose
    /// remainder is a valid Turtle local name.
    #[must_use]
    pub fn shorten(&self, iri: &str) -> Option<String> {
        self.entries
            .iter()
            .filter_map(|(alias, ns)| {
                let local = iri.strip_prefix(ns.as_str())?;
                is_local_name(local).then_some((alias, ns.len(), local))
            })
            .max_by_key(|&(_, len, _)| len)
            .map(|(alias, _, local)| format!("{alias}:{local}"))
    }
}

/// Conservative `PN_LOCAL` check: letters, digits, `_`, `-` and inner `.`.
fn is_local_name(local: &str) -> bool {
    let Some(first) = local.chars().next() else {
        return false;
    };
    (first.is_alphanumeric() || first == '_')
        && !local.ends_with('.')
        && local
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
