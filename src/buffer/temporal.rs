use super::error::{TemporalError, TemporalResult};
use super::key::TemporalKey;
use super::key_index::BoundedKeyIndex;
use super::sequence::BoundedSequence;
use super::state::{StateRecord, TemporalIdentity};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, trace};

/// Configuration for a temporal buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemporalConfig {
    /// Number of most recent states retained
    pub temporal_depth: usize,
}

impl Default for TemporalConfig {
    fn default() -> Self {
        Self {
            temporal_depth: 100,
        }
    }
}

/// A state together with the identifier it was added under
#[derive(Debug)]
struct Snapshot<S> {
    id: String,
    generation: u64,
    state: Arc<S>,
}

/// Identifier index entry; `generation` names the add that produced it
#[derive(Debug)]
struct Indexed<S> {
    generation: u64,
    state: Arc<S>,
}

/// Sliding window of the most recent states.
///
/// Every state is stored once behind an [`Arc`] and shared by a
/// [`BoundedSequence`] (positional access) and a [`BoundedKeyIndex`]
/// (identifier access). Both are sized to the same depth and are only
/// advanced together by [`add`](Self::add), so when the sequence drops its
/// oldest state the identifier pointing at it is dropped in the same step.
///
/// Not synchronised; see [`SharedTemporalBuffer`](super::shared::SharedTemporalBuffer)
/// for use across threads.
#[derive(Debug)]
pub struct TemporalBuffer<S = StateRecord> {
    sequence: BoundedSequence<Snapshot<S>>,
    id_index: BoundedKeyIndex<Indexed<S>>,
    current_index: Option<usize>,
    next_generation: u64,
    evictions: u64,
}

impl<S> TemporalBuffer<S> {
    /// Creates a buffer holding at most `temporal_depth` states
    pub fn new(temporal_depth: usize) -> TemporalResult<Self> {
        if temporal_depth == 0 {
            return Err(TemporalError::InvalidCapacity(temporal_depth));
        }
        debug!(temporal_depth, "creating temporal buffer");
        Ok(Self::with_depth(temporal_depth))
    }

    pub fn with_config(config: &TemporalConfig) -> TemporalResult<Self> {
        Self::new(config.temporal_depth)
    }

    fn with_depth(temporal_depth: usize) -> Self {
        Self {
            sequence: BoundedSequence::new(temporal_depth),
            id_index: BoundedKeyIndex::new(temporal_depth),
            current_index: None,
            next_generation: 0,
            evictions: 0,
        }
    }

    fn next_generation(&mut self) -> u64 {
        let generation = self.next_generation;
        self.next_generation += 1;
        generation
    }

    /// Records `state` as the newest snapshot under `id`.
    ///
    /// Returns the shared handle now held by the buffer.
    pub fn add(&mut self, id: impl Into<String>, state: impl Into<Arc<S>>) -> Arc<S> {
        let id = id.into();
        let state = state.into();

        self.current_index = match self.current_index {
            Some(index) if self.sequence.is_full() => Some((index + 1) % self.capacity()),
            Some(index) => Some(index + 1),
            None => Some(0),
        };

        let generation = self.next_generation();
        let snapshot = Snapshot {
            id: id.clone(),
            generation,
            state: Arc::clone(&state),
        };
        if let Some(evicted) = self.sequence.append(snapshot) {
            self.evictions += 1;
            let released = self.release(&evicted);
            trace!(id = %evicted.id, released, "evicted oldest state");
        }

        let entry = Indexed {
            generation,
            state: Arc::clone(&state),
        };
        if let Some((key, _)) = self.id_index.set(id, entry) {
            trace!(key = %key, "identifier index evicted entry outside the window");
        }
        state
    }

    /// Drops the index entry for an evicted snapshot, unless the identifier
    /// has since been re-pointed by a later add.
    fn release(&mut self, evicted: &Snapshot<S>) -> bool {
        let stale = self
            .id_index
            .get(evicted.id.as_str())
            .is_some_and(|indexed| indexed.generation == evicted.generation);
        if stale {
            self.id_index.remove(&evicted.id);
        }
        stale
    }

    /// Reads by position, identifier or range.
    ///
    /// Identifier lookups return `Ok(None)` when the id is not indexed.
    pub fn get(&self, key: impl Into<TemporalKey>) -> TemporalResult<Option<&Arc<S>>> {
        match key.into() {
            TemporalKey::Position(index) => self.at(index).map(Some),
            TemporalKey::Id(id) => Ok(self.by_id(&id)),
            TemporalKey::Range => Err(TemporalError::NotSupported("range reads")),
            TemporalKey::Other(kind) => Err(TemporalError::InvalidArgumentType(kind)),
        }
    }

    /// State `|index|` steps behind the newest one.
    ///
    /// The sign is ignored: `at(2)` and `at(-2)` address the same state.
    pub fn at(&self, index: i64) -> TemporalResult<&Arc<S>> {
        let len = self.sequence.len();
        let out_of_range = TemporalError::IndexOutOfRange { index, len };
        let distance = usize::try_from(index.unsigned_abs()).map_err(|_| out_of_range.clone())?;
        self.sequence
            .get(distance)
            .map(|snapshot| &snapshot.state)
            .map_err(|_| out_of_range)
    }

    pub fn state_at_index(&self, index: i64) -> TemporalResult<&Arc<S>> {
        self.at(index)
    }

    pub fn by_id(&self, id: &str) -> Option<&Arc<S>> {
        self.id_index.get(id).map(|indexed| &indexed.state)
    }

    /// State at a physical window position: non-negative counts from the
    /// oldest state, negative from the newest (`-1` is the newest).
    pub fn chronological(&self, index: i64) -> TemporalResult<&Arc<S>> {
        let len = self.sequence.len();
        if len == 0 {
            return Err(TemporalError::EmptyBuffer);
        }
        let position = if index >= 0 {
            usize::try_from(index).ok()
        } else {
            usize::try_from(index.unsigned_abs())
                .ok()
                .and_then(|back| len.checked_sub(back))
        };
        position
            .and_then(|p| self.sequence.get_chronological(p))
            .map(|snapshot| &snapshot.state)
            .ok_or(TemporalError::IndexOutOfRange { index, len })
    }

    /// The most recently added state
    pub fn current(&self) -> TemporalResult<&Arc<S>> {
        self.sequence
            .newest()
            .map(|snapshot| &snapshot.state)
            .ok_or(TemporalError::EmptyBuffer)
    }

    /// The last `n` states, oldest first
    pub fn get_last_n(&self, n: usize) -> Vec<Arc<S>> {
        self.sequence
            .last_n(n)
            .map(|snapshot| Arc::clone(&snapshot.state))
            .collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.id_index.contains(id)
    }

    /// Points `id` at `state` in the identifier index only.
    ///
    /// The positional window is left untouched, so the index may name states
    /// the window no longer holds (or never held). Entries added this way
    /// still count against the index capacity, and are never released by
    /// window eviction.
    pub fn set_index_entry(&mut self, id: impl Into<String>, state: impl Into<Arc<S>>) {
        let entry = Indexed {
            generation: self.next_generation(),
            state: state.into(),
        };
        if let Some((key, _)) = self.id_index.set(id, entry) {
            trace!(key = %key, "identifier index evicted entry");
        }
    }

    /// Removes `id` from the identifier index only; the state stays in the window
    pub fn delete_index_entry(&mut self, id: &str) -> TemporalResult<Arc<S>> {
        self.id_index.delete(id).map(|indexed| indexed.state)
    }

    pub fn move_forward(&mut self) -> TemporalResult<&Arc<S>> {
        Err(TemporalError::NotImplemented("forward traversal"))
    }

    pub fn move_backward(&mut self) -> TemporalResult<&Arc<S>> {
        Err(TemporalError::NotImplemented("backward traversal"))
    }

    /// Logical position of the newest state; wraps modulo the depth once full.
    ///
    /// Reads never consult it.
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// States oldest first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Arc<S>> + ExactSizeIterator + '_ {
        self.sequence.iter().map(|snapshot| &snapshot.state)
    }

    pub fn states(&self) -> Vec<Arc<S>> {
        self.iter().cloned().collect()
    }

    /// Indexed identifiers, oldest first
    pub fn ids(&self) -> impl DoubleEndedIterator<Item = &str> + '_ {
        self.id_index.keys()
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.sequence.is_full()
    }

    pub fn capacity(&self) -> usize {
        self.sequence.capacity()
    }

    pub fn clear(&mut self) {
        self.sequence.clear();
        self.id_index.clear();
        self.current_index = None;
        self.evictions = 0;
    }

    pub fn stats(&self) -> BufferStats {
        BufferStats {
            len: self.sequence.len(),
            capacity: self.capacity(),
            indexed_ids: self.id_index.len(),
            evictions: self.evictions,
        }
    }
}

impl<S: TemporalIdentity> TemporalBuffer<S> {
    /// Adds a state under the identifier it carries itself
    pub fn update(&mut self, state: S) -> TemporalResult<Arc<S>> {
        let id = state
            .temporal_id()
            .ok_or(TemporalError::MissingTemporalId)?
            .to_owned();
        Ok(self.add(id, state))
    }
}

impl<S> Default for TemporalBuffer<S> {
    fn default() -> Self {
        Self::with_depth(TemporalConfig::default().temporal_depth)
    }
}

impl<'a, S> IntoIterator for &'a TemporalBuffer<S> {
    type Item = &'a Arc<S>;
    type IntoIter = Box<dyn Iterator<Item = &'a Arc<S>> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferStats {
    pub len: usize,
    pub capacity: usize,
    pub indexed_ids: usize,
    pub evictions: u64,
}
