use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive};

/// Argument accepted by [`TemporalBuffer::get`](super::TemporalBuffer::get).
///
/// Integers address states by distance from the newest one, strings by the
/// identifier they were added under. Ranges are recognised but not served.
#[derive(Debug, Clone, PartialEq)]
pub enum TemporalKey {
    Position(i64),
    Id(String),
    Range,
    /// Any other argument kind; carries the type name for the error message
    Other(&'static str),
}

macro_rules! position_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for TemporalKey {
                fn from(index: $ty) -> Self {
                    // Saturate so oversized indices still report as out of range
                    TemporalKey::Position(i64::try_from(index).unwrap_or(i64::MAX))
                }
            }
        )*
    };
}

position_from!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! range_from {
    ($($ty:ty),*) => {
        $(
            impl<T> From<$ty> for TemporalKey {
                fn from(_: $ty) -> Self {
                    TemporalKey::Range
                }
            }
        )*
    };
}

range_from!(Range<T>, RangeFrom<T>, RangeTo<T>, RangeInclusive<T>, RangeToInclusive<T>);

impl From<RangeFull> for TemporalKey {
    fn from(_: RangeFull) -> Self {
        TemporalKey::Range
    }
}

impl From<&str> for TemporalKey {
    fn from(id: &str) -> Self {
        TemporalKey::Id(id.to_owned())
    }
}

impl From<String> for TemporalKey {
    fn from(id: String) -> Self {
        TemporalKey::Id(id)
    }
}

impl From<&String> for TemporalKey {
    fn from(id: &String) -> Self {
        TemporalKey::Id(id.clone())
    }
}

impl From<f32> for TemporalKey {
    fn from(_: f32) -> Self {
        TemporalKey::Other("f32")
    }
}

impl From<f64> for TemporalKey {
    fn from(_: f64) -> Self {
        TemporalKey::Other("f64")
    }
}

impl From<bool> for TemporalKey {
    fn from(_: bool) -> Self {
        TemporalKey::Other("bool")
    }
}

impl From<char> for TemporalKey {
    fn from(_: char) -> Self {
        TemporalKey::Other("char")
    }
}
