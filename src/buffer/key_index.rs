use super::error::{TemporalError, TemporalResult};
use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use tracing::trace;

/// Identifier → record mapping with a hard capacity.
///
/// Eviction is by insertion order, not by access: once full, inserting a new
/// key drops the key that was inserted first, whether or not it was ever read.
/// Overwriting an existing key keeps its original position.
#[derive(Debug, Clone)]
pub struct BoundedKeyIndex<V> {
    entries: HashMap<String, (u64, V)>,
    order: BTreeMap<u64, String>, // Insertion sequence -> key
    next_seq: u64,
    capacity: usize,
}

impl<V> BoundedKeyIndex<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
            order: BTreeMap::new(),
            next_seq: 0,
            capacity,
        }
    }

    /// Inserts or overwrites `key`, returning the entry evicted to make room
    pub fn set(&mut self, key: impl Into<String>, value: V) -> Option<(String, V)> {
        let key = key.into();
        if let Some((_, slot)) = self.entries.get_mut(&key) {
            *slot = value;
            return None;
        }
        if self.capacity == 0 {
            return Some((key, value));
        }

        let evicted = if self.entries.len() >= self.capacity {
            self.evict_oldest()
        } else {
            None
        };

        let seq = self.next_seq;
        self.next_seq += 1;
        self.order.insert(seq, key.clone());
        self.entries.insert(key, (seq, value));
        evicted
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        String: Borrow<Q>,
        Q: std::hash::Hash + Eq + ?Sized,
    {
        self.entries.get(key).map(|(_, value)| value)
    }

    /// Looks up `key`, falling back to `default` when absent
    pub fn get_or<'a, Q>(&'a self, key: &Q, default: &'a V) -> &'a V
    where
        String: Borrow<Q>,
        Q: std::hash::Hash + Eq + ?Sized,
    {
        self.get(key).unwrap_or(default)
    }

    pub fn delete(&mut self, key: &str) -> TemporalResult<V> {
        self.remove(key)
            .ok_or_else(|| TemporalError::KeyNotFound(key.to_owned()))
    }

    /// Removes `key` if present; absence is not an error here
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let (seq, value) = self.entries.remove(key)?;
        self.order.remove(&seq);
        Some(value)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in insertion order, oldest first
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &str> + '_ {
        self.order.values().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    fn evict_oldest(&mut self) -> Option<(String, V)> {
        let (_, key) = self.order.pop_first()?;
        let (_, value) = self.entries.remove(&key)?;
        trace!(key = %key, capacity = self.capacity, "key index evicted oldest entry");
        Some((key, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(index: &BoundedKeyIndex<i32>) -> Vec<&str> {
        index.keys().collect()
    }

    #[test]
    fn test_set_and_get() {
        let mut index = BoundedKeyIndex::new(3);
        index.set("a", 1);
        index.set("b", 2);
        assert_eq!(index.get("a"), Some(&1));
        assert_eq!(index.get("z"), None);
        assert_eq!(*index.get_or("z", &-1), -1);
        assert!(index.contains("b"));
    }

    #[test]
    fn test_eviction_is_by_insertion_not_access() {
        let mut index = BoundedKeyIndex::new(2);
        index.set("a", 1);
        index.set("b", 2);
        // Reading "a" must not protect it
        assert_eq!(index.get("a"), Some(&1));
        let evicted = index.set("c", 3);
        assert_eq!(evicted, Some(("a".to_string(), 1)));
        assert_eq!(keys(&index), vec!["b", "c"]);
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut index = BoundedKeyIndex::new(2);
        index.set("a", 1);
        index.set("b", 2);
        assert_eq!(index.set("a", 10), None);
        assert_eq!(keys(&index), vec!["a", "b"]);

        let evicted = index.set("c", 3);
        assert_eq!(evicted, Some(("a".to_string(), 10)));
        assert_eq!(keys(&index), vec!["b", "c"]);
    }

    #[test]
    fn test_delete() {
        let mut index = BoundedKeyIndex::new(2);
        index.set("a", 1);
        assert_eq!(index.delete("a"), Ok(1));
        assert_eq!(
            index.delete("a"),
            Err(TemporalError::KeyNotFound("a".to_string()))
        );
        assert!(index.is_empty());
    }

    #[test]
    fn test_delete_frees_a_slot() {
        let mut index = BoundedKeyIndex::new(2);
        index.set("a", 1);
        index.set("b", 2);
        index.delete("a").unwrap();
        assert_eq!(index.set("c", 3), None);
        assert_eq!(keys(&index), vec!["b", "c"]);
    }

    #[test]
    fn test_keys_follow_insertion_order() {
        let mut index = BoundedKeyIndex::new(3);
        index.set("x", 1);
        index.set("y", 2);
        index.set("x", 3);
        assert_eq!(keys(&index), vec!["x", "y"]);
        assert_eq!(index.get("x"), Some(&3));
    }
}
