use super::error::{TemporalError, TemporalResult};
use std::collections::{vec_deque, VecDeque};

/// Fixed-capacity FIFO of records, addressed by distance from the newest.
///
/// Once full, every append drops the oldest record. A capacity of zero is
/// accepted and simply retains nothing.
#[derive(Debug, Clone)]
pub struct BoundedSequence<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedSequence<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Adds a record at the live end, returning the record it pushed out
    pub fn append(&mut self, value: T) -> Option<T> {
        if self.capacity == 0 {
            return Some(value);
        }
        let evicted = if self.items.len() == self.capacity {
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(value);
        evicted
    }

    /// Record `distance` steps behind the newest one (`0` is the newest)
    pub fn get(&self, distance: usize) -> TemporalResult<&T> {
        let len = self.items.len();
        if distance >= len {
            return Err(TemporalError::IndexOutOfRange {
                index: i64::try_from(distance).unwrap_or(i64::MAX),
                len,
            });
        }
        Ok(&self.items[len - 1 - distance])
    }

    /// Record at physical position `position`, counting from the oldest
    pub fn get_chronological(&self, position: usize) -> Option<&T> {
        self.items.get(position)
    }

    pub fn newest(&self) -> Option<&T> {
        self.items.back()
    }

    /// The last `n` records, oldest first; all of them if `n` exceeds the length
    pub fn last_n(&self, n: usize) -> vec_deque::Iter<'_, T> {
        let skip = self.items.len().saturating_sub(n);
        self.items.range(skip..)
    }

    pub fn iter(&self) -> vec_deque::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T: Clone> BoundedSequence<T> {
    /// All records as an ordered vector, oldest first
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}

impl<'a, T> IntoIterator for &'a BoundedSequence<T> {
    type Item = &'a T;
    type IntoIter = vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(capacity: usize, values: &[i32]) -> BoundedSequence<i32> {
        let mut seq = BoundedSequence::new(capacity);
        for &v in values {
            seq.append(v);
        }
        seq
    }

    #[test]
    fn test_append_within_capacity() {
        let mut seq = BoundedSequence::new(3);
        assert_eq!(seq.append(1), None);
        assert_eq!(seq.append(2), None);
        assert_eq!(seq.len(), 2);
        assert!(!seq.is_full());
    }

    #[test]
    fn test_append_evicts_oldest() {
        let mut seq = filled(3, &[1, 2, 3]);
        assert!(seq.is_full());
        assert_eq!(seq.append(4), Some(1));
        assert_eq!(seq.to_vec(), vec![2, 3, 4]);
        assert_eq!(seq.len(), 3);
    }

    #[test]
    fn test_distance_from_newest() {
        let seq = filled(3, &[1, 2, 3, 4]);
        assert_eq!(*seq.get(0).unwrap(), 4);
        assert_eq!(*seq.get(2).unwrap(), 2);
        assert_eq!(
            seq.get(3),
            Err(TemporalError::IndexOutOfRange { index: 3, len: 3 })
        );
    }

    #[test]
    fn test_chronological_position() {
        let seq = filled(3, &[1, 2, 3, 4]);
        assert_eq!(seq.get_chronological(0), Some(&2));
        assert_eq!(seq.get_chronological(3), None);
        assert_eq!(seq.newest(), Some(&4));
    }

    #[test]
    fn test_last_n() {
        let seq = filled(3, &[1, 2, 3, 4]);
        assert_eq!(seq.last_n(2).copied().collect::<Vec<_>>(), vec![3, 4]);
        assert_eq!(seq.last_n(10).copied().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(seq.last_n(0).count(), 0);
    }

    #[test]
    fn test_zero_capacity_retains_nothing() {
        let mut seq = BoundedSequence::new(0);
        assert_eq!(seq.append(1), Some(1));
        assert!(seq.is_empty());
    }

    #[test]
    fn test_get_on_empty() {
        let seq: BoundedSequence<i32> = BoundedSequence::new(2);
        assert!(seq.get(0).is_err());
    }
}
