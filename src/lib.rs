//! Bounded temporal buffer of state snapshots.
//!
//! Keeps a fixed-size sliding window of the most recent states and lets
//! callers address them by distance from the newest state or by the
//! identifier they were recorded under.

pub mod buffer;

pub use buffer::error::{TemporalError, TemporalResult};
pub use buffer::key::TemporalKey;
pub use buffer::key_index::BoundedKeyIndex;
pub use buffer::sequence::BoundedSequence;
pub use buffer::shared::SharedTemporalBuffer;
pub use buffer::state::{StateRecord, TemporalIdentity};
pub use buffer::temporal::{BufferStats, TemporalBuffer, TemporalConfig};
