//! URN-keyed instance cache.
//!
//! The cache is the only place element identity is decided: a URN maps to at
//! most one [`ElementId`]. One element may be reachable under several keys
//! (an anonymous element is registered under its blank-node key and its
//! synthesized URN). Every operation is total.

use indexmap::IndexMap;

use crate::graph::ElementId;

/// Outcome of [`InstanceCache::add_element`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The key was free.
    Inserted,
    /// The key was taken and `overwrite` was false; the existing entry won.
    Kept(ElementId),
    /// The key was taken and has been replaced; carries the previous entry.
    Replaced(ElementId),
}

/// Insertion-ordered URN → element index.
#[derive(Debug, Clone, Default)]
pub struct InstanceCache {
    entries: IndexMap<String, ElementId>,
}

impl InstanceCache {
    /// An empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up `urn`.
    #[must_use]
    pub fn get(&self, urn: &str) -> Option<ElementId> {
        self.entries.get(urn).copied()
    }

    /// Returns true if `urn` is registered.
    #[must_use]
    pub fn contains(&self, urn: &str) -> bool {
        self.entries.contains_key(urn)
    }

    /// Registers `id` under `urn`. An existing entry is kept unless
    /// `overwrite` is set.
    pub fn add_element(&mut self, urn: impl Into<String>, id: ElementId, overwrite: bool) -> Registration {
        let urn = urn.into();
        match self.entries.get(&urn).copied() {
            Some(existing) if existing == id => Registration::Kept(existing),
            Some(existing) if !overwrite => Registration::Kept(existing),
            Some(existing) => {
                self.entries.insert(urn, id);
                Registration::Replaced(existing)
            }
            None => {
                self.entries.insert(urn, id);
                Registration::Inserted
            }
        }
    }

    /// Moves the entry at `old` to `new`, keeping its position. Returns false
    /// (and changes nothing) if `old` is absent or `new` already names a
    /// different element.
    pub fn update_element_key(&mut self, old: &str, new: &str) -> bool {
        let Some(id) = self.get(old) else {
            return false;
        };
        if old == new {
            return true;
        }
        if self.get(new).is_some_and(|other| other != id) {
            return false;
        }
        let entries = std::mem::take(&mut self.entries);
        self.entries = entries
            .into_iter()
            .filter(|(key, _)| key != new)
            .map(|(key, value)| {
                if key == old {
                    (new.to_owned(), value)
                } else {
                    (key, value)
                }
            })
            .collect();
        true
    }

    /// Rewrites every key in namespace `old` (the part before `#`) to
    /// namespace `new`. Keys whose rewritten form would collide with a
    /// different element keep their old key and are returned.
    pub fn update_elements_namespace(&mut self, old: &str, new: &str) -> Vec<String> {
        let mut conflicts = Vec::new();
        let mut rebuilt: IndexMap<String, ElementId> = IndexMap::with_capacity(self.entries.len());
        let entries = std::mem::take(&mut self.entries);
        for (key, id) in &entries {
            let renamed = match key.split_once('#') {
                Some((ns, local)) if ns == old => format!("{new}#{local}"),
                _ => key.clone(),
            };
            let clash = renamed != *key
                && entries.get(&renamed).is_some_and(|other| other != id);
            if clash {
                conflicts.push(key.clone());
                rebuilt.insert(key.clone(), *id);
            } else {
                rebuilt.insert(renamed, *id);
            }
        }
        self.entries = rebuilt;
        conflicts
    }

    /// Drops `urn`, returning the element it named.
    pub fn remove(&mut self, urn: &str) -> Option<ElementId> {
        self.entries.shift_remove(urn)
    }

    /// Every key with its element, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ElementId)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Distinct elements in first-registration order.
    #[must_use]
    pub fn ids(&self) -> Vec<ElementId> {
        let mut seen = std::collections::HashSet::new();
        self.entries
            .values()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u32) -> ElementId {
        ElementId(n)
    }

    #[test]
    fn existing_entry_wins_without_overwrite() {
        let mut cache = InstanceCache::new();
        assert_eq!(cache.add_element("urn:a#X", id(0), false), Registration::Inserted);
        assert_eq!(cache.add_element("urn:a#X", id(1), false), Registration::Kept(id(0)));
        assert_eq!(cache.get("urn:a#X"), Some(id(0)));
        assert_eq!(cache.add_element("urn:a#X", id(1), true), Registration::Replaced(id(0)));
        assert_eq!(cache.get("urn:a#X"), Some(id(1)));
    }

    #[test]
    fn namespace_rename_keeps_every_entry() {
        let mut cache = InstanceCache::new();
        cache.add_element("urn:a#X", id(0), false);
        cache.add_element("urn:a#Y", id(1), false);
        cache.add_element("urn:b#Z", id(2), false);
        let conflicts = cache.update_elements_namespace("urn:a", "urn:c");
        assert!(conflicts.is_empty());
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get("urn:c#X"), Some(id(0)));
        assert_eq!(cache.get("urn:c#Y"), Some(id(1)));
        assert_eq!(cache.get("urn:b#Z"), Some(id(2)));
        assert!(cache.get("urn:a#X").is_none());
    }

    #[test]
    fn namespace_rename_reports_collisions_instead_of_dropping() {
        let mut cache = InstanceCache::new();
        cache.add_element("urn:a#X", id(0), false);
        cache.add_element("urn:c#X", id(1), false);
        let conflicts = cache.update_elements_namespace("urn:a", "urn:c");
        assert_eq!(conflicts, vec!["urn:a#X".to_owned()]);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("urn:a#X"), Some(id(0)));
        assert_eq!(cache.get("urn:c#X"), Some(id(1)));
    }

    #[test]
    fn key_update_preserves_position() {
        let mut cache = InstanceCache::new();
        cache.add_element("urn:a#X", id(0), false);
        cache.add_element("urn:a#Y", id(1), false);
        assert!(cache.update_element_key("urn:a#X", "urn:a#W"));
        let keys: Vec<_> = cache.iter().map(|(k, _)| k.to_owned()).collect();
        assert_eq!(keys, ["urn:a#W", "urn:a#Y"]);
        assert!(!cache.update_element_key("urn:a#W", "urn:a#Y"));
        assert!(!cache.update_element_key("urn:a#missing", "urn:a#Q"));
    }

    #[test]
    fn ids_are_deduplicated() {
        let mut cache = InstanceCache::new();
        cache.add_element("_:b0", id(3), false);
        cache.add_element("urn:a#characteristic_1", id(3), false);
        cache.add_element("urn:a#P", id(4), false);
        assert_eq!(cache.ids(), vec![id(3), id(4)]);
    }
}
