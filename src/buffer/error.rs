use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Index out of range: {index} (buffer holds {len} states)")]
    IndexOutOfRange { index: i64, len: usize },
    #[error("Invalid argument type: {0}")]
    InvalidArgumentType(&'static str),
    #[error("Not supported: {0}")]
    NotSupported(&'static str),
    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),
    #[error("Key not found: {0}")]
    KeyNotFound(String),
    #[error("No states in the buffer")]
    EmptyBuffer,
    #[error("Invalid capacity {0}: temporal depth must be at least 1")]
    InvalidCapacity(usize),
    #[error("State has no temporal_id")]
    MissingTemporalId,
}

pub type TemporalResult<T> = Result<T, TemporalError>;
