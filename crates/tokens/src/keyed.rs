//! Read-only keyed lookup, shared by token inventories and verse maps.

use std::collections::{BTreeMap, HashMap};

/// A string-keyed, read-only collection.
///
/// Validation and aggregation only need membership and lookup, so they take
/// `impl Keyed<T>` rather than a concrete inventory type.
pub trait Keyed<V> {
    fn lookup(&self, key: &str) -> Option<&V>;

    fn len(&self) -> usize;

    /// Keys in the collection's natural order.
    fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_>;

    fn contains_key(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V> Keyed<V> for BTreeMap<String, V> {
    fn lookup(&self, key: &str) -> Option<&V> {
        self.get(key)
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(BTreeMap::keys(self).map(String::as_str))
    }
}

impl<V> Keyed<V> for HashMap<String, V> {
    fn lookup(&self, key: &str) -> Option<&V> {
        self.get(key)
    }

    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(HashMap::keys(self).map(String::as_str))
    }
}
