use super::error::TemporalResult;
use super::key::TemporalKey;
use super::state::{StateRecord, TemporalIdentity};
use super::temporal::{BufferStats, TemporalBuffer};
use parking_lot::RwLock;
use std::sync::Arc;

/// Thread-safe handle around a [`TemporalBuffer`].
///
/// Each add holds the write lock across both containers, so readers never
/// observe the window and the identifier index out of step. Clones share the
/// same buffer.
#[derive(Debug)]
pub struct SharedTemporalBuffer<S = StateRecord> {
    inner: Arc<RwLock<TemporalBuffer<S>>>,
}

impl<S> Clone for SharedTemporalBuffer<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> SharedTemporalBuffer<S> {
    pub fn new(temporal_depth: usize) -> TemporalResult<Self> {
        TemporalBuffer::new(temporal_depth).map(Self::from)
    }

    pub fn add(&self, id: impl Into<String>, state: impl Into<Arc<S>>) -> Arc<S> {
        self.inner.write().add(id, state)
    }

    pub fn get(&self, key: impl Into<TemporalKey>) -> TemporalResult<Option<Arc<S>>> {
        self.inner.read().get(key).map(|found| found.cloned())
    }

    pub fn by_id(&self, id: &str) -> Option<Arc<S>> {
        self.inner.read().by_id(id).cloned()
    }

    pub fn current(&self) -> TemporalResult<Arc<S>> {
        self.inner.read().current().cloned()
    }

    pub fn get_last_n(&self, n: usize) -> Vec<Arc<S>> {
        self.inner.read().get_last_n(n)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner.read().contains(id)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn stats(&self) -> BufferStats {
        self.inner.read().stats()
    }

    /// Runs `f` with exclusive access, for multi-step operations that must not interleave
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut TemporalBuffer<S>) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// Runs `f` against a consistent view of the buffer
    pub fn with<R>(&self, f: impl FnOnce(&TemporalBuffer<S>) -> R) -> R {
        f(&self.inner.read())
    }
}

impl<S: TemporalIdentity> SharedTemporalBuffer<S> {
    pub fn update(&self, state: S) -> TemporalResult<Arc<S>> {
        self.inner.write().update(state)
    }
}

impl<S> From<TemporalBuffer<S>> for SharedTemporalBuffer<S> {
    fn from(buffer: TemporalBuffer<S>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(buffer)),
        }
    }
}

impl<S> Default for SharedTemporalBuffer<S> {
    fn default() -> Self {
        Self::from(TemporalBuffer::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread;

    fn state(value: i64) -> StateRecord {
        json!({ "value": value }).as_object().cloned().unwrap()
    }

    #[test]
    fn test_clones_share_state() {
        let shared: SharedTemporalBuffer = SharedTemporalBuffer::new(3).unwrap();
        let other = shared.clone();
        shared.add("a", state(1));
        assert!(other.contains("a"));
        assert_eq!(other.current().unwrap()["value"], 1);
    }

    #[test]
    fn test_concurrent_writers_stay_bounded() {
        let shared: SharedTemporalBuffer = SharedTemporalBuffer::new(8).unwrap();
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for i in 0..50 {
                        shared.add(format!("t{t}-{i}"), state(i));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(shared.len(), 8);
        shared.with(|buffer| {
            assert_eq!(buffer.ids().count(), 8);
            for id in buffer.ids() {
                let indexed = buffer.by_id(id).unwrap();
                assert!(buffer.iter().any(|s| Arc::ptr_eq(s, indexed)));
            }
        });
        assert_eq!(shared.stats().evictions, 192);
    }

    #[test]
    fn test_debug_output() {
        let shared: SharedTemporalBuffer = SharedTemporalBuffer::new(2).unwrap();
        shared.add("a", state(1));
        assert!(format!("{shared:?}").contains("SharedTemporalBuffer"));
    }

    #[test]
    fn test_with_mut_runs_under_one_lock() {
        let shared: SharedTemporalBuffer = SharedTemporalBuffer::new(2).unwrap();
        shared.with_mut(|buffer| {
            buffer.add("a", state(1));
            buffer.add("b", state(2));
        });
        assert_eq!(shared.get_last_n(2).len(), 2);
        assert!(shared.get(5).is_err());
    }
}
