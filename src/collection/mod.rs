//! Ways of building the same key-value mapping.
//!
//! Each idiom produces `{"keyOne": "valueOne", "keyTwo": "valueTwo"}`
//! (the singleton idiom holds one entry). [`MapIdiom`] runs any of them and
//! normalises the result to a std [`HashMap`] for comparison.

mod frozen;

use std::collections::HashMap;
use std::hash::Hash;
use std::iter;

pub use frozen::{FrozenMap, FrozenMapBuilder};

/// Pairs every idiom in this module builds from.
pub const SAMPLE_ENTRIES: [(&str, &str); 2] = [("keyOne", "valueOne"), ("keyTwo", "valueTwo")];

/// A one-entry map.
pub fn singleton_map<K: Hash + Eq, V>(key: K, value: V) -> HashMap<K, V> {
    iter::once((key, value)).collect()
}

/// A map populated one `insert` at a time.
pub fn mutable_map() -> HashMap<String, String> {
    let mut map = HashMap::new();
    map.insert("keyOne".to_owned(), "valueOne".to_owned());
    map.insert("keyTwo".to_owned(), "valueTwo".to_owned());
    map
}

/// A map collected from a sequence of pairs. Later pairs win on repeated keys.
pub fn collected_map<K, V, I>(pairs: I) -> HashMap<K, V>
where
    K: Hash + Eq,
    I: IntoIterator<Item = (K, V)>,
{
    pairs.into_iter().collect()
}

/// A map written as a literal array of pairs.
pub fn literal_map() -> HashMap<&'static str, &'static str> {
    HashMap::from([("keyOne", "valueOne"), ("keyTwo", "valueTwo")])
}

/// A map grown through the persistent [`im::HashMap`], then converted to the
/// std map type.
///
/// Every `update` returns a new map and leaves its input untouched.
pub fn persistent_map() -> HashMap<String, String> {
    let map = SAMPLE_ENTRIES
        .iter()
        .fold(im::HashMap::new(), |map: im::HashMap<String, String>, (key, value)| {
            map.update((*key).to_owned(), (*value).to_owned())
        });
    map.into_iter().collect()
}

/// A read-only map assembled with a builder over a persistent hash trie.
pub fn frozen_map() -> FrozenMap<&'static str, &'static str> {
    FrozenMap::builder()
        .put("keyOne", "valueOne")
        .put("keyTwo", "valueTwo")
        .build()
}

// =============================================================================
// MapIdiom
// =============================================================================

/// One of the construction idioms above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapIdiom {
    /// [`singleton_map`] with the first sample entry.
    Singleton,
    /// [`mutable_map`].
    Mutable,
    /// [`collected_map`] over the sample entries.
    Collected,
    /// [`literal_map`].
    Literal,
    /// [`persistent_map`].
    Persistent,
    /// [`frozen_map`].
    Frozen,
}

impl MapIdiom {
    /// Every idiom, in declaration order.
    pub const ALL: [MapIdiom; 6] = [
        Self::Singleton,
        Self::Mutable,
        Self::Collected,
        Self::Literal,
        Self::Persistent,
        Self::Frozen,
    ];

    /// Build the mapping with this idiom.
    pub fn build(self) -> HashMap<String, String> {
        let owned = |(key, value): (&str, &str)| (key.to_owned(), value.to_owned());
        match self {
            Self::Singleton => {
                let (key, value) = SAMPLE_ENTRIES[0];
                singleton_map(key.to_owned(), value.to_owned())
            }
            Self::Mutable => mutable_map(),
            Self::Collected => collected_map(SAMPLE_ENTRIES.map(owned)),
            Self::Literal => literal_map().into_iter().map(owned).collect(),
            Self::Persistent => persistent_map(),
            Self::Frozen => HashMap::from(frozen_map()).into_iter().map(owned).collect(),
        }
    }

    /// Whether the idiom holds a single entry.
    pub fn is_singleton(self) -> bool {
        self == Self::Singleton
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_sample<M>(len: usize, get: M)
    where
        M: Fn(&str) -> Option<String>,
    {
        assert_eq!(len, 2);
        assert_eq!(get("keyOne").as_deref(), Some("valueOne"));
        assert_eq!(get("keyTwo").as_deref(), Some("valueTwo"));
        assert_eq!(get("keyThree"), None);
    }

    #[test]
    fn test_singleton_map_creation() {
        let map = singleton_map("key", "value");
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("key"), Some(&"value"));
    }

    #[test]
    fn test_mutable_map_creation() {
        let map = mutable_map();
        assert_sample(map.len(), |key| map.get(key).cloned());
    }

    #[test]
    fn test_collected_map_creation() {
        let map = collected_map(SAMPLE_ENTRIES);
        assert_sample(map.len(), |key| map.get(key).map(|v| v.to_string()));

        let repeated = collected_map([("k", 1), ("k", 2)]);
        assert_eq!(repeated.get("k"), Some(&2));
    }

    #[test]
    fn test_literal_map_creation() {
        let map = literal_map();
        assert_sample(map.len(), |key| map.get(key).map(|v| v.to_string()));
    }

    #[test]
    fn test_persistent_map_creation() {
        let map = persistent_map();
        assert_sample(map.len(), |key| map.get(key).cloned());
    }

    #[test]
    fn test_persistent_update_leaves_original_intact() {
        let one = im::HashMap::unit("keyOne", "valueOne");
        let two = one.update("keyTwo", "valueTwo");

        assert_eq!(one.len(), 1);
        assert_eq!(one.get("keyTwo"), None);
        assert_eq!(two.len(), 2);
        assert_eq!(two.get("keyTwo"), Some(&"valueTwo"));
    }

    #[test]
    fn test_frozen_map_creation() {
        let map = frozen_map();
        assert_sample(map.len(), |key| map.get(key).map(|v| v.to_string()));
    }

    #[test]
    fn test_idioms_agree() {
        let expected = literal_map();
        for idiom in MapIdiom::ALL {
            let map = idiom.build();
            if idiom.is_singleton() {
                assert_eq!(map.len(), 1, "{idiom:?}");
            } else {
                assert_eq!(map.len(), expected.len(), "{idiom:?}");
            }
            for (key, value) in &map {
                assert_eq!(expected.get(key.as_str()), Some(&value.as_str()), "{idiom:?}");
            }
        }
    }
}
