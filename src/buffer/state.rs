use serde_json::{Map, Value};

/// Field name read by [`TemporalIdentity`] on a [`StateRecord`]
pub const TEMPORAL_ID_FIELD: &str = "temporal_id";

/// Default opaque state payload: an arbitrary key-value mapping
pub type StateRecord = Map<String, Value>;

/// Anything that can name the snapshot it represents.
///
/// Used by [`TemporalBuffer::update`](super::TemporalBuffer::update) to pull
/// the identifier off the state itself.
pub trait TemporalIdentity {
    fn temporal_id(&self) -> Option<&str>;
}

impl TemporalIdentity for StateRecord {
    fn temporal_id(&self) -> Option<&str> {
        self.get(TEMPORAL_ID_FIELD).and_then(Value::as_str)
    }
}

impl<T: TemporalIdentity + ?Sized> TemporalIdentity for &T {
    fn temporal_id(&self) -> Option<&str> {
        (**self).temporal_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> StateRecord {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_record_with_id() {
        let state = record(json!({"temporal_id": "t1", "value": 10}));
        assert_eq!(state.temporal_id(), Some("t1"));
    }

    #[test]
    fn test_record_without_id() {
        let state = record(json!({"value": 10}));
        assert_eq!(state.temporal_id(), None);
    }

    #[test]
    fn test_non_string_id_is_ignored() {
        let state = record(json!({"temporal_id": 7}));
        assert_eq!(state.temporal_id(), None);
    }
}
