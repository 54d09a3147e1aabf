//! Mapping where some keys accumulate instead of overwrite
//!
//! [`MultiValueMap`] is built from an alias table mapping *source* keys to
//! *collector* keys. Setting a source key appends the value to the list
//! stored under its collector; every other key is an ordinary
//! last-write-wins entry.
//!
//! ```rust
//! use gentest_core::{MultiValueMap, Slot};
//!
//! let mut map = MultiValueMap::new([("input", "inputs")]);
//! map.set("input", 1);
//! map.set("input", 2);
//! map.set("a", 7);
//! map.set("a", 8);
//!
//! assert_eq!(map.get(&"inputs"), Some(&Slot::Many(vec![1, 2])));
//! assert_eq!(map.get(&"a"), Some(&Slot::Single(8)));
//! assert!(!map.contains_key(&"input"));
//! ```

use indexmap::IndexMap;
use serde::Serialize;
use std::hash::Hash;

/// Value stored under a key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Slot<V> {
    /// Ordinary entry
    Single(V),
    /// Collector entry
    Many(Vec<V>),
}

impl<V> Slot<V> {
    /// The value of an ordinary entry
    #[inline]
    #[must_use]
    pub fn as_single(&self) -> Option<&V> {
        match self {
            Self::Single(v) => Some(v),
            Self::Many(_) => None,
        }
    }

    /// The values of a collector entry
    #[inline]
    #[must_use]
    pub fn as_many(&self) -> Option<&[V]> {
        match self {
            Self::Single(_) => None,
            Self::Many(values) => Some(values),
        }
    }

    /// All values held, in order
    #[must_use]
    pub fn into_values(self) -> Vec<V> {
        match self {
            Self::Single(v) => vec![v],
            Self::Many(values) => values,
        }
    }
}

/// Ordered mapping with aliased accumulation
///
/// Equality compares entries only, irrespective of order, as for an ordinary
/// mapping. The alias table does not take part.
#[derive(Debug, Clone)]
pub struct MultiValueMap<K, V> {
    aliases: IndexMap<K, K>,
    entries: IndexMap<K, Slot<V>>,
}

impl<K: Clone + Eq + Hash, V> MultiValueMap<K, V> {
    /// Create map from `(source, collector)` aliases
    ///
    /// Every distinct collector starts out holding an empty list.
    #[must_use]
    pub fn new(aliases: impl IntoIterator<Item = (K, K)>) -> Self {
        let aliases: IndexMap<K, K> = aliases.into_iter().collect();
        let mut entries = IndexMap::new();
        for collector in aliases.values() {
            entries
                .entry(collector.clone())
                .or_insert_with(|| Slot::Many(Vec::new()));
        }
        Self { aliases, entries }
    }

    /// Assign `value` to `key`
    ///
    /// A source key appends to its collector and is never stored itself. A
    /// collector that was overwritten with a single value is turned back into
    /// a list holding that value first.
    pub fn set(&mut self, key: K, value: V) {
        let Some(collector) = self.aliases.get(&key) else {
            self.entries.insert(key, Slot::Single(value));
            return;
        };

        let slot = self
            .entries
            .entry(collector.clone())
            .or_insert_with(|| Slot::Many(Vec::new()));
        if let Slot::Single(_) = slot {
            let previous = std::mem::replace(slot, Slot::Many(Vec::new()));
            *slot = Slot::Many(previous.into_values());
        }
        if let Slot::Many(values) = slot {
            values.push(value);
        }
    }

    /// Value stored under `key`
    #[inline]
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&Slot<V>> {
        self.entries.get(key)
    }

    /// Values accumulated under `collector`, empty if absent or not a list
    #[must_use]
    pub fn collected(&self, collector: &K) -> &[V] {
        self.entries
            .get(collector)
            .and_then(Slot::as_many)
            .unwrap_or(&[])
    }

    /// Remove `key`, returning what it held
    pub fn remove(&mut self, key: &K) -> Option<Slot<V>> {
        self.entries.shift_remove(key)
    }

    /// Collector a source key feeds, if `key` is aliased
    #[inline]
    #[must_use]
    pub fn collector_for(&self, key: &K) -> Option<&K> {
        self.aliases.get(key)
    }

    /// Check whether `key` is stored
    #[inline]
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Stored keys in first-insertion order
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    /// Stored entries in first-insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &Slot<V>)> {
        self.entries.iter()
    }

    /// Number of stored keys
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no key is stored
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the map, keeping only its entries
    #[must_use]
    pub fn into_entries(self) -> IndexMap<K, Slot<V>> {
        self.entries
    }
}

impl<K: Eq + Hash, V: PartialEq> PartialEq for MultiValueMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: Eq + Hash, V: Eq> Eq for MultiValueMap<K, V> {}

impl<K: Eq + Hash, V: PartialEq> PartialEq<IndexMap<K, Slot<V>>> for MultiValueMap<K, V> {
    fn eq(&self, other: &IndexMap<K, Slot<V>>) -> bool {
        self.entries == *other
    }
}

impl<K: Clone + Eq + Hash, V> Extend<(K, V)> for MultiValueMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl<K: Serialize + Eq + Hash, V: Serialize> Serialize for MultiValueMap<K, V> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}
