use std::borrow::Borrow;
use std::collections::hash_map;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

use bevy::log::{debug, warn};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::CollectionError;
use super::persist::Persist;

/// One persisted key/value pair.
///
/// The key is optional because persisted data may carry an entry whose key
/// was lost; such entries are dropped on rehydrate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "K: Deserialize<'de>, V: Deserialize<'de>"))]
pub struct MapEntry<K, V> {
    #[serde(default)]
    pub key: Option<K>,
    pub value: V,
}

impl<K, V> MapEntry<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self {
            key: Some(key),
            value,
        }
    }
}

#[derive(Serialize)]
struct MapEntryRef<'a, K, V> {
    key: Option<&'a K>,
    value: &'a V,
}

/// Hash map that persists as an ordered list of entries.
///
/// The hash table is authoritative. The entry list only exists transiently:
/// produced by `flatten`, consumed by `rehydrate`. Flattened order follows the
/// table's iteration order and is not stable across hasher implementations.
#[derive(Debug, Clone)]
pub struct PersistentMap<K, V> {
    table: FxHashMap<K, V>,
}

impl<K, V> Default for PersistentMap<K, V> {
    fn default() -> Self {
        Self {
            table: FxHashMap::default(),
        }
    }
}

impl<K, V> PersistentMap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }

    pub fn keys(&self) -> hash_map::Keys<'_, K, V> {
        self.table.keys()
    }

    pub fn values(&self) -> hash_map::Values<'_, K, V> {
        self.table.values()
    }

    pub fn values_mut(&mut self) -> hash_map::ValuesMut<'_, K, V> {
        self.table.values_mut()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, K, V> {
        self.table.iter()
    }
}

impl<K: Eq + Hash, V> PersistentMap<K, V> {
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.get(key)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.get_mut(key)
    }

    /// Indexer-style read: a missing key yields `V::default()`.
    pub fn get_or_default<Q>(&self, key: &Q) -> V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Default + Clone,
    {
        self.table.get(key).cloned().unwrap_or_default()
    }

    /// Indexer-style write: inserts or overwrites, returning the old value.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.table.insert(key, value)
    }

    /// Strict insert. Fails with [`CollectionError::DuplicateKey`] and leaves
    /// the existing value in place when `key` is already present.
    pub fn add(&mut self, key: K, value: V) -> Result<(), CollectionError> {
        match self.table.entry(key) {
            hash_map::Entry::Occupied(_) => Err(CollectionError::DuplicateKey),
            hash_map::Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(())
            }
        }
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.remove(key)
    }

    /// Remove `key` only if it currently maps to `value`.
    pub fn remove_entry_if_matches(&mut self, key: &K, value: &V) -> bool
    where
        V: PartialEq,
    {
        if self.contains_entry(key, value) {
            self.table.remove(key);
            true
        } else {
            false
        }
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.contains_key(key)
    }

    pub fn contains_entry(&self, key: &K, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.table.get(key).is_some_and(|stored| stored == value)
    }

    /// Independent copy of the runtime table.
    pub fn to_native(&self) -> FxHashMap<K, V>
    where
        K: Clone,
        V: Clone,
    {
        self.table.clone()
    }

    pub fn from_native<S: BuildHasher>(map: &HashMap<K, V, S>) -> Self
    where
        K: Clone,
        V: Clone,
    {
        map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    fn rebuild(&mut self, record: Vec<MapEntry<K, V>>) {
        self.table.clear();
        self.table.reserve(record.len());

        let mut keyless = 0usize;
        let mut duplicates = 0usize;
        for entry in record {
            let Some(key) = entry.key else {
                keyless += 1;
                continue;
            };
            match self.table.entry(key) {
                hash_map::Entry::Occupied(_) => duplicates += 1,
                hash_map::Entry::Vacant(slot) => {
                    slot.insert(entry.value);
                }
            }
        }

        if keyless + duplicates > 0 {
            warn!(
                "PersistentMap: dropped {} keyless and {} duplicate entries while rehydrating",
                keyless, duplicates
            );
        }
        debug!("PersistentMap: rehydrated {} entries", self.table.len());
    }
}

impl<K, V> Persist for PersistentMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    type Record = Vec<MapEntry<K, V>>;

    fn flatten(&self) -> Vec<MapEntry<K, V>> {
        self.table
            .iter()
            .map(|(k, v)| MapEntry::new(k.clone(), v.clone()))
            .collect()
    }

    fn rehydrate(&mut self, record: Vec<MapEntry<K, V>>) {
        self.rebuild(record);
    }
}

impl<K: Eq + Hash, V: PartialEq> PartialEq for PersistentMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.table == other.table
    }
}

impl<K: Eq + Hash, V: Eq> Eq for PersistentMap<K, V> {}

impl<K: Eq + Hash, V> FromIterator<(K, V)> for PersistentMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            table: iter.into_iter().collect(),
        }
    }
}

impl<K: Eq + Hash, V> Extend<(K, V)> for PersistentMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.table.extend(iter);
    }
}

impl<'a, K, V> IntoIterator for &'a PersistentMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = hash_map::Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.table.iter()
    }
}

impl<K, V> IntoIterator for PersistentMap<K, V> {
    type Item = (K, V);
    type IntoIter = hash_map::IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.table.into_iter()
    }
}

impl<K: Serialize, V: Serialize> Serialize for PersistentMap<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.table.iter().map(|(key, value)| MapEntryRef {
            key: Some(key),
            value,
        }))
    }
}

impl<'de, K, V> Deserialize<'de> for PersistentMap<K, V>
where
    K: Deserialize<'de> + Eq + Hash,
    V: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = Vec::<MapEntry<K, V>>::deserialize(deserializer)?;
        let mut map = Self::default();
        map.rebuild(record);
        Ok(map)
    }
}
