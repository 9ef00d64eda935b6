//! Core containers for the temporal buffer.

pub mod error;
pub mod key;
pub mod key_index;
pub mod sequence;
pub mod shared;
pub mod state;
pub mod temporal;

pub use key_index::BoundedKeyIndex;
pub use sequence::BoundedSequence;
pub use temporal::TemporalBuffer;
