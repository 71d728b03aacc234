//! FIFO queue with positional access, persisted as a plain list.
//!
//! # Architecture
//!
//! Two structures hold the same elements in the same order:
//!
//! - **Deque** (`VecDeque`): FIFO semantics, O(1) head operations, iteration
//! - **Record** (`Vec`): positional indexing, tail peek, persistence
//!
//! Every public mutation updates both. After a rehydrate the deque is rebuilt
//! from the record from scratch.
//!
//! # Legacy dedup
//!
//! Older save data was produced by a queue that collapsed equal values while
//! rebuilding its deque, leaving the record untouched. [`QueueConfig::dedup_on_rehydrate`]
//! reproduces that for parity: it applies wherever the deque is rebuilt
//! (`from_iter_with_config`, rehydrate, `sort_by` and `remove_all`). It is off
//! by default, and with it off the two structures never diverge. Serde always
//! deserializes with the default config; use `with_config` plus `rehydrate`
//! to load legacy data.

use std::cmp::Ordering;
use std::collections::VecDeque;

use bevy::log::{debug, warn};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::CollectionError;
use super::persist::Persist;

/// Configuration for [`PersistentQueue`] behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueueConfig {
    /// Collapse equal values when the deque is rebuilt from the record.
    /// The record keeps its duplicates, so positional access and `len()`
    /// stop agreeing with the record once this fires.
    pub dedup_on_rehydrate: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone)]
pub struct PersistentQueue<T> {
    items: Vec<T>,
    deque: VecDeque<T>,
    config: QueueConfig,
}

impl<T> Default for PersistentQueue<T> {
    fn default() -> Self {
        Self::with_config(QueueConfig::default())
    }
}

impl<T> PersistentQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: QueueConfig) -> Self {
        Self {
            items: Vec::new(),
            deque: VecDeque::new(),
            config,
        }
    }

    pub fn config(&self) -> QueueConfig {
        self.config
    }

    /// Number of queued elements, as seen by the deque.
    pub fn len(&self) -> usize {
        self.deque.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deque.is_empty()
    }

    /// Element `index` in enqueue order.
    pub fn get(&self, index: usize) -> Result<&T, CollectionError> {
        if index >= self.deque.len() {
            return Err(CollectionError::IndexOutOfRange {
                index,
                len: self.deque.len(),
            });
        }
        Ok(&self.items[index])
    }

    /// Remove and return the head, or `None` when empty.
    pub fn dequeue(&mut self) -> Option<T> {
        let head = self.deque.pop_front()?;
        if !self.items.is_empty() {
            self.items.remove(0);
        }
        Some(head)
    }

    pub fn peek_first(&self) -> Option<&T> {
        self.deque.front()
    }

    /// Most recently enqueued element, read from the record tail.
    pub fn peek_last(&self) -> Option<&T> {
        if self.deque.is_empty() {
            return None;
        }
        self.items.last()
    }

    pub fn clear(&mut self) {
        self.deque.clear();
        self.items.clear();
    }

    /// Iterate in FIFO order.
    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, T> {
        self.deque.iter()
    }

    /// Copy of the record in enqueue order.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.clone()
    }

    /// Whether deque and record currently hold the same elements in the same order.
    pub fn is_in_sync(&self) -> bool
    where
        T: PartialEq,
    {
        self.items.len() == self.deque.len() && self.items.iter().eq(self.deque.iter())
    }

    /// Independent copy as a plain `VecDeque`, built from the record.
    pub fn to_native(&self) -> VecDeque<T>
    where
        T: Clone,
    {
        self.items.iter().cloned().collect()
    }
}

impl<T: Clone + PartialEq> PersistentQueue<T> {
    pub fn from_native(queue: &VecDeque<T>) -> Self {
        queue.iter().cloned().collect()
    }

    /// Build from `items` in order, rebuilding the deque under `config`.
    pub fn from_iter_with_config(items: impl IntoIterator<Item = T>, config: QueueConfig) -> Self {
        let mut queue = Self::with_config(config);
        queue.items.extend(items);
        queue.sync_deque_from_items();
        queue
    }

    pub fn enqueue(&mut self, item: T) {
        self.deque.push_back(item.clone());
        self.items.push(item);
    }

    /// Enqueue each element of `items` in iteration order.
    pub fn enqueue_all(&mut self, items: impl IntoIterator<Item = T>) {
        for item in items {
            self.enqueue(item);
        }
    }

    pub fn contains(&self, item: &T) -> bool {
        self.deque.contains(item)
    }

    /// Remove the first element equal to `item` from both structures.
    pub fn remove(&mut self, item: &T) -> bool {
        let Some(pos) = self.deque.iter().position(|queued| queued == item) else {
            return false;
        };
        self.deque.remove(pos);

        if let Some(pos) = self.items.iter().position(|stored| stored == item) {
            self.items.remove(pos);
        }
        true
    }

    /// Remove every element matching `predicate`, then rebuild the deque.
    ///
    /// `predicate` sees each record element exactly once. Returns how many
    /// elements left the deque.
    pub fn remove_all(&mut self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        let before = self.deque.len();
        self.items.retain(|item| !predicate(item));
        self.sync_deque_from_items();
        before.saturating_sub(self.deque.len())
    }

    /// Stable sort by a derived key, then rebuild the deque from the sorted record.
    ///
    /// Keys that do not compare equal to themselves (`NaN`) sort last in
    /// either order.
    pub fn sort_by<K, F>(&mut self, mut key: F, order: SortOrder)
    where
        K: PartialOrd,
        F: FnMut(&T) -> K,
    {
        self.items.sort_by(|a, b| {
            let (ka, kb) = (key(a), key(b));
            compare_keys(&ka, &kb, order)
        });
        self.sync_deque_from_items();
    }

    fn sync_deque_from_items(&mut self) {
        self.deque.clear();
        if !self.config.dedup_on_rehydrate {
            self.deque.extend(self.items.iter().cloned());
            return;
        }

        for item in &self.items {
            if !self.deque.contains(item) {
                self.deque.push_back(item.clone());
            }
        }
        let collapsed = self.items.len() - self.deque.len();
        if collapsed > 0 {
            warn!(
                "PersistentQueue: collapsed {} duplicate values while rebuilding the deque",
                collapsed
            );
        }
    }
}

fn compare_keys<K: PartialOrd>(a: &K, b: &K, order: SortOrder) -> Ordering {
    let a_unordered = a.partial_cmp(a).is_none();
    let b_unordered = b.partial_cmp(b).is_none();
    match (a_unordered, b_unordered) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ordering = a.partial_cmp(b).unwrap_or(Ordering::Equal);
            match order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        }
    }
}

impl<T: Clone + PartialEq> FromIterator<T> for PersistentQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_iter_with_config(iter, QueueConfig::default())
    }
}

impl<T: Clone + PartialEq> Extend<T> for PersistentQueue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.enqueue_all(iter);
    }
}

impl<'a, T> IntoIterator for &'a PersistentQueue<T> {
    type Item = &'a T;
    type IntoIter = std::collections::vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.deque.iter()
    }
}

impl<T: PartialEq> PartialEq for PersistentQueue<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items && self.deque == other.deque
    }
}

impl<T: Clone + PartialEq> Persist for PersistentQueue<T> {
    type Record = Vec<T>;

    fn flatten(&self) -> Vec<T> {
        self.items.clone()
    }

    fn rehydrate(&mut self, record: Vec<T>) {
        self.items = record;
        self.sync_deque_from_items();
        debug!(
            "PersistentQueue: rehydrated {} items ({} queued)",
            self.items.len(),
            self.deque.len()
        );
    }
}

impl<T: Serialize> Serialize for PersistentQueue<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for PersistentQueue<T>
where
    T: Deserialize<'de> + Clone + PartialEq,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = Vec::<T>::deserialize(deserializer)?;
        Ok(Self::from_record(record))
    }
}
