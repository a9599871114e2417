use derive_more::Display;
use std::fmt::Debug;

/// An error which can occur when converting a raw value into a type with a restricted value
/// range.
#[derive(Debug, Clone, Eq, PartialEq, Display)]
#[display(fmt = "conversion from value [{}] failed: {}", value, message)]
pub struct TryFromRangeError<V> {
    message: &'static str,
    value: V,
}

impl<V: Copy> TryFromRangeError<V> {
    pub(crate) fn new(message: &'static str, value: V) -> TryFromRangeError<V> {
        TryFromRangeError { message, value }
    }

    pub fn message(&self) -> &'static str {
        self.message
    }

    /// Returns the rejected raw value.
    pub fn value(&self) -> V {
        self.value
    }
}

impl<V: Copy + std::fmt::Display + Debug> std::error::Error for TryFromRangeError<V> {}
