//! Read-only maps assembled through a builder.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use rpds::HashTrieMapSync;

/// An immutable map over a persistent hash trie.
///
/// Built once with [`FrozenMap::builder`]; there is no way to change it
/// afterwards. Iteration order is unspecified.
///
/// # Example
///
/// ```
/// use stdlib_tour::collection::FrozenMap;
///
/// let map = FrozenMap::builder()
///     .put("keyOne", "valueOne")
///     .put("keyTwo", "valueTwo")
///     .build();
///
/// assert_eq!(map.len(), 2);
/// assert_eq!(map.get("keyOne"), Some(&"valueOne"));
/// ```
#[derive(Clone)]
pub struct FrozenMap<K: Hash + Eq, V> {
    entries: HashTrieMapSync<K, V>,
}

/// Collects entries for a [`FrozenMap`].
#[derive(Clone)]
pub struct FrozenMapBuilder<K: Hash + Eq, V> {
    entries: HashTrieMapSync<K, V>,
}

impl<K: Hash + Eq, V> FrozenMap<K, V> {
    /// Start an empty builder.
    pub fn builder() -> FrozenMapBuilder<K, V> {
        FrozenMapBuilder {
            entries: HashTrieMapSync::new_sync(),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.size()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value stored under `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key)
    }

    /// Whether `key` has a value.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    /// Entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }

    /// Keys in unspecified order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }
}

impl<K: Hash + Eq, V> FrozenMapBuilder<K, V> {
    /// Add an entry. A repeated key takes the new value.
    pub fn put(mut self, key: K, value: V) -> Self {
        self.entries.insert_mut(key, value);
        self
    }

    /// Add every entry of `entries`.
    pub fn put_all(mut self, entries: impl IntoIterator<Item = (K, V)>) -> Self {
        for (key, value) in entries {
            self.entries.insert_mut(key, value);
        }
        self
    }

    /// Freeze the collected entries.
    pub fn build(self) -> FrozenMap<K, V> {
        FrozenMap {
            entries: self.entries,
        }
    }
}

impl<K: Hash + Eq + Clone, V: Clone> From<FrozenMap<K, V>> for HashMap<K, V> {
    fn from(map: FrozenMap<K, V>) -> Self {
        map.iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

impl<K: Hash + Eq + fmt::Debug, V: fmt::Debug> fmt::Debug for FrozenMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl<K: Hash + Eq + fmt::Debug, V: fmt::Debug> fmt::Debug for FrozenMapBuilder<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrozenMapBuilder")
            .field("len", &self.entries.size())
            .finish_non_exhaustive()
    }
}
