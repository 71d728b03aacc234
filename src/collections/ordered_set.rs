//! Insertion-ordered set backed by a uniqueness-checked `Vec`.
//!
//! There is no separate runtime structure: the vector is both the working set
//! and the persisted record. Lookups are linear, which keeps the element bound
//! down to `PartialEq` (floats and vectors qualify) at the cost of O(n)
//! membership tests. Intended for small to moderate sets.
//!
//! Mutation while iterating is rejected at compile time, since iterators
//! borrow the set.

use std::collections::HashSet;
use std::hash::{BuildHasher, Hash};

use bevy::log::warn;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::CollectionError;
use super::persist::Persist;

#[derive(Debug, Clone, PartialEq)]
pub struct OrderedSet<T> {
    items: Vec<T>,
}

impl<T> Default for OrderedSet<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> OrderedSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Read-only view in current order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn get(&self, index: usize) -> Result<&T, CollectionError> {
        self.items.get(index).ok_or(CollectionError::IndexOutOfRange {
            index,
            len: self.items.len(),
        })
    }

    /// First item matching `predicate`.
    pub fn find(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<&T> {
        self.items.iter().find(|item| predicate(item))
    }

    /// Remove every item matching `predicate`, returning how many went.
    pub fn remove_all(&mut self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !predicate(item));
        before - self.items.len()
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.clone()
    }
}

impl<T: PartialEq> OrderedSet<T> {
    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    /// Append `item` unless an equal item is already present.
    pub fn add(&mut self, item: T) -> bool {
        if self.items.contains(&item) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Insert `item` at `index` unless an equal item is already present.
    ///
    /// The duplicate check runs first, so an existing item returns `Ok(false)`
    /// even for an out-of-range index.
    pub fn add_at(&mut self, item: T, index: usize) -> Result<bool, CollectionError> {
        if self.items.contains(&item) {
            return Ok(false);
        }
        if index > self.items.len() {
            return Err(CollectionError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        self.items.insert(index, item);
        Ok(true)
    }

    /// Replace the item at `index`, returning the old one.
    ///
    /// Assigning a value equal to the item already at `index` is allowed;
    /// assigning one equal to any other item fails with
    /// [`CollectionError::DuplicateValue`].
    pub fn set(&mut self, index: usize, value: T) -> Result<T, CollectionError> {
        if index >= self.items.len() {
            return Err(CollectionError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        let clashes = self
            .items
            .iter()
            .enumerate()
            .any(|(i, existing)| i != index && *existing == value);
        if clashes {
            return Err(CollectionError::DuplicateValue);
        }
        Ok(std::mem::replace(&mut self.items[index], value))
    }

    pub fn remove(&mut self, item: &T) -> bool {
        match self.items.iter().position(|existing| existing == item) {
            Some(idx) => {
                self.items.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn to_native(&self) -> FxHashSet<T>
    where
        T: Eq + Hash + Clone,
    {
        self.items.iter().cloned().collect()
    }

    pub fn from_native<S: BuildHasher>(set: &HashSet<T, S>) -> Self
    where
        T: Clone,
    {
        set.iter().cloned().collect()
    }

    fn rebuild(&mut self, record: Vec<T>) {
        let total = record.len();
        self.items.clear();
        self.extend(record);

        let dropped = total - self.items.len();
        if dropped > 0 {
            warn!(
                "OrderedSet: dropped {} duplicate items while rehydrating",
                dropped
            );
        }
    }
}

impl<T: PartialEq> FromIterator<T> for OrderedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::default();
        set.extend(iter);
        set
    }
}

impl<T: PartialEq> Extend<T> for OrderedSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.add(item);
        }
    }
}

impl<'a, T> IntoIterator for &'a OrderedSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> IntoIterator for OrderedSet<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<T: PartialEq + Clone> Persist for OrderedSet<T> {
    type Record = Vec<T>;

    fn flatten(&self) -> Vec<T> {
        self.items.clone()
    }

    fn rehydrate(&mut self, record: Vec<T>) {
        self.rebuild(record);
    }
}

impl<T: Serialize> Serialize for OrderedSet<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for OrderedSet<T>
where
    T: Deserialize<'de> + PartialEq,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = Vec::<T>::deserialize(deserializer)?;
        let mut set = Self::default();
        set.rebuild(record);
        Ok(set)
    }
}
